//! Exhaustive search over all `2^n` inclusion/exclusion choices.
//!
//! The reference solver of the suite: exact, deterministic, exponential.
//! Items are decided in index order, the "exclude" branch first; a later
//! candidate replaces the incumbent only when its price is strictly greater,
//! so among equally priced optima the first one found wins.

use crate::problem::{Instance, KnapsackError, Solution, Solver};

/// Brute-force exact solver.
///
/// Intended for small instances only; callers wanting bounded latency must
/// refuse large instances before calling it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSolver;

impl BruteForceSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for BruteForceSolver {
    fn name(&self) -> &str {
        "brute"
    }

    fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError> {
        let mut search = Search {
            instance,
            current: Vec::with_capacity(instance.len()),
            best: None,
        };
        search.visit(0, 0);

        // The empty subset is always feasible and is the first leaf visited.
        Ok(search.best.unwrap_or_else(|| instance.empty_solution()))
    }
}

struct Search<'a> {
    instance: &'a Instance,
    current: Vec<bool>,
    best: Option<Solution>,
}

impl Search<'_> {
    fn visit(&mut self, price: u64, weight: u64) {
        let position = self.current.len();
        if position == self.instance.len() {
            let improves = self.best.as_ref().is_none_or(|b| price > b.total_price);
            if weight <= self.instance.capacity() && improves {
                self.best = Some(Solution {
                    selection: self.current.clone(),
                    total_price: price,
                    total_weight: weight,
                });
            }
            return;
        }

        let item = self.instance.items()[position];

        self.current.push(false);
        self.visit(price, weight);
        self.current.pop();

        self.current.push(true);
        self.visit(price + item.price, weight + item.weight);
        self.current.pop();
    }
}
