//! Error taxonomy shared by every solver and the benchmark harness.

use thiserror::Error;

/// Failure signals returned by solvers and the harness.
///
/// An instance where only the empty subset fits is **not** an error: exact
/// solvers return the empty [`Solution`](super::Solution) for it.
#[derive(Debug, Error)]
pub enum KnapsackError {
    /// The instance (or an input record describing one) is malformed.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// The FPTAS tolerance is negative, NaN or infinite.
    #[error("invalid tolerance {0}: must be finite and >= 0")]
    InvalidTolerance(f64),

    /// A solver or harness configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dynamic-programming table would exceed the configured cell budget.
    #[error("dynamic programming table needs {cells} cells, limit is {limit}")]
    TableTooLarge { cells: u128, limit: usize },

    /// The genetic solver never produced a feasible genome.
    #[error("no feasible solution found after {generations} generations")]
    NoSolutionFound { generations: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
