//! Scaled dynamic programming: an FPTAS for the 0/1 knapsack problem.
//!
//! Prices are quantized by dropping low bits before a price-indexed
//! minimum-weight table is built, trading accuracy for table size.
//! A tolerance of `0` disables quantization and yields the exact DP solver.
//!
//! # Key Types
//!
//! - [`FptasConfig`]: tolerance, scale reference and table size guard
//! - [`ScaleReference`]: which reference price sets the quantization step
//! - [`FptasSolver`]: the solver
//!
//! # References
//!
//! - Ibarra & Kim (1975), "Fast Approximation Algorithms for the Knapsack and
//!   Sum of Subset Problems"
//! - Kellerer, Pferschy & Pisinger (2004), *Knapsack Problems*, ch. 2.6

mod config;
mod runner;

pub use config::{truncated_bits, FptasConfig, ScaleReference};
pub use runner::FptasSolver;
