//! Shared problem model for every solver in the suite.
//!
//! # Key Types
//!
//! - [`Item`], [`Instance`]: the immutable input
//! - [`Solution`]: an index-aligned selection plus its achieved price/weight
//! - [`Solver`]: the single operation every solver exposes
//! - [`KnapsackError`]: failure signals returned to the caller

mod error;
mod types;

pub use error::KnapsackError;
pub use types::{Instance, Item, Solution};

/// A 0/1 knapsack solver.
///
/// `solve` borrows the instance immutably: no solver reorders the caller's
/// items, and every returned selection is indexed like [`Instance::items`].
/// Repeated calls on the same instance return identical results for every
/// deterministic solver.
///
/// # Implementing
///
/// ```
/// use u_knapsack::problem::{Instance, KnapsackError, Solution, Solver};
///
/// struct TakeNothing;
///
/// impl Solver for TakeNothing {
///     fn name(&self) -> &str { "nothing" }
///     fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError> {
///         Ok(instance.empty_solution())
///     }
/// }
///
/// let inst = Instance::from_pairs(&[(1, 1)], 1).unwrap();
/// assert_eq!(TakeNothing.solve(&inst).unwrap().total_price, 0);
/// ```
pub trait Solver {
    /// Short name used in benchmark reports.
    fn name(&self) -> &str;

    /// Solves the instance.
    fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError> {
        (**self).solve(instance)
    }
}
