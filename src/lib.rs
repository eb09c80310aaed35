//! Exact, approximate and heuristic solvers for the 0/1 knapsack problem.
//!
//! Every solver implements [`problem::Solver`] over the same immutable
//! [`problem::Instance`]:
//!
//! - **Brute force**: exhaustive search over all `2^n` selections.
//! - **Greedy**: single pass by descending price-to-weight ratio.
//! - **Branch and bound**: exhaustive search pruned by remaining-price sums.
//! - **Dynamic programming / FPTAS**: minimum-weight table indexed by
//!   (quantized) price; tolerance `0` is exact.
//! - **Genetic algorithm**: elitism, brawl tournaments, single-point
//!   crossover and bit-flip mutation with a population sized from `n`.
//!
//! The [`bench`] module parses instance files and compares the suite by
//! runtime and relative error.
//!
//! # Architecture
//!
//! Solvers share nothing but the problem model. None reorders the caller's
//! items, so every returned selection is indexed like
//! [`Instance::items`](problem::Instance::items).

pub mod bench;
pub mod bnb;
pub mod brute;
pub mod fptas;
pub mod ga;
pub mod greedy;
pub mod problem;
