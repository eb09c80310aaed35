//! Benchmark harness: parses instance files, runs a solver suite, and
//! aggregates runtime and relative-error figures per solver.
//!
//! # Key Types
//!
//! - [`BenchConfig`]: repeat counts, reference solver, size limits
//! - [`Benchmark`]: runs a suite over instances
//! - [`BenchReport`]: per-instance records plus per-solver summaries
//!
//! # Example
//!
//! ```
//! use u_knapsack::bench::{parse_instance, standard_suite, BenchConfig, Benchmark};
//! use u_knapsack::ga::GaConfig;
//!
//! let inst = parse_instance("1 4 5 2 3 3 4 4 5 5 6").unwrap();
//! let config = BenchConfig::default().with_repeats(1);
//! let bench = Benchmark::new(config, standard_suite(GaConfig::fast().with_seed(1))).unwrap();
//! let report = bench.run(&[inst]);
//! let dynamic = report.summaries.iter().find(|s| s.solver == "dynamic").unwrap();
//! assert_eq!(dynamic.max_relative_error, Some(0.0));
//! ```

mod parse;
mod runner;

pub use parse::{parse_instance, read_instances};
pub use runner::{
    relative_error, BenchConfig, BenchReport, Benchmark, InstanceRecord, RunOutcome, SolverRun,
    SolverSummary,
};

use crate::bnb::BranchAndBoundSolver;
use crate::brute::BruteForceSolver;
use crate::fptas::{FptasConfig, FptasSolver};
use crate::ga::{GaConfig, GeneticSolver};
use crate::greedy::GreedySolver;
use crate::problem::Solver;

/// Tolerances of the FPTAS variants in [`standard_suite`].
pub const FPTAS_TOLERANCES: [f64; 4] = [0.005, 0.01, 0.1, 0.5];

/// The full solver suite, in report order:
/// `brute`, `greedy`, `bnb`, `dynamic`, `fptas-*`, `genetic`.
pub fn standard_suite(ga: GaConfig) -> Vec<Box<dyn Solver>> {
    standard_suite_with(GeneticSolver::new(ga))
}

/// [`standard_suite`] with a preconfigured genetic solver, e.g. one carrying
/// a stats sink.
pub fn standard_suite_with(genetic: GeneticSolver) -> Vec<Box<dyn Solver>> {
    let mut suite: Vec<Box<dyn Solver>> = vec![
        Box::new(BruteForceSolver),
        Box::new(GreedySolver),
        Box::new(BranchAndBoundSolver),
        Box::new(FptasSolver::exact()),
    ];
    for tol in FPTAS_TOLERANCES {
        suite.push(Box::new(FptasSolver::new(FptasConfig::new(tol))));
    }
    suite.push(Box::new(genetic));
    suite
}
