//! Genetic solver for the 0/1 knapsack problem.
//!
//! Genomes are bit strings with one inclusion bit per item. Infeasible genomes
//! are kept in the population but always rank below feasible ones, which
//! pushes selection back toward feasibility.
//!
//! # Key Types
//!
//! - [`GaConfig`]: population sizing, selection and termination parameters
//! - [`GaRunner`]: executes the generational loop
//! - [`GaResult`]: final population best with run statistics
//! - [`GeneticSolver`]: the [`Solver`](crate::problem::Solver) wrapper
//! - [`StatsSink`], [`StatsDirectory`]: per-generation population output
//!
//! # Submodules
//!
//! - [`operators`]: random initialization, single-point crossover, bit-flip mutation
//! - [`selection`]: distinct elitism plus brawl (tournament) survivor selection
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod stats;
mod types;

pub use config::{GaConfig, MAX_POPULATION};
pub use runner::{GaResult, GaRunner, GeneticSolver};
pub use stats::{StatsDirectory, StatsSink};
pub use types::{fitness, Genome, Specimen, UNEVALUATED};
