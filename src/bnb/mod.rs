//! Branch-and-bound exact solver.
//!
//! Same search tree and tie-breaking as [`BruteForceSolver`](crate::brute::BruteForceSolver),
//! pruned two ways:
//!
//! - the "include" branch is entered only if the item still fits;
//! - the "exclude" branch at position `i` is entered only if
//!   `price_so_far + suffix[i + 1]` can still beat the incumbent, where
//!   `suffix[j]` is the total price of items `j..n`.
//!
//! The suffix bound assumes every remaining item fits, so it never
//! underestimates the achievable price and the result stays optimal.
//! The suffix table is built once per instance before the search starts.

use crate::problem::{Instance, KnapsackError, Solution, Solver};

/// Exact solver with suffix-price-sum pruning.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self
    }
}

/// `suffix[i]` = sum of prices of items `i..n`; `suffix[n] = 0`.
pub fn suffix_price_sums(instance: &Instance) -> Vec<u64> {
    let items = instance.items();
    let mut suffix = vec![0u64; items.len() + 1];
    for i in (0..items.len()).rev() {
        suffix[i] = suffix[i + 1] + items[i].price;
    }
    suffix
}

impl Solver for BranchAndBoundSolver {
    fn name(&self) -> &str {
        "bnb"
    }

    fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError> {
        let mut search = Search {
            instance,
            suffix: suffix_price_sums(instance),
            current: Vec::with_capacity(instance.len()),
            best: None,
            nodes: 0,
        };
        search.visit(0, 0);
        log::debug!(
            "bnb: instance {} visited {} nodes for {} items",
            instance.id(),
            search.nodes,
            instance.len()
        );

        Ok(search.best.unwrap_or_else(|| instance.empty_solution()))
    }
}

struct Search<'a> {
    instance: &'a Instance,
    suffix: Vec<u64>,
    current: Vec<bool>,
    best: Option<Solution>,
    nodes: u64,
}

impl Search<'_> {
    fn visit(&mut self, price: u64, weight: u64) {
        self.nodes += 1;
        let position = self.current.len();
        if position == self.instance.len() {
            // Only feasible branches reach a leaf.
            if self.best.as_ref().is_none_or(|b| price > b.total_price) {
                self.best = Some(Solution {
                    selection: self.current.clone(),
                    total_price: price,
                    total_weight: weight,
                });
            }
            return;
        }

        let item = self.instance.items()[position];

        let promising = match &self.best {
            None => true,
            Some(b) => price + self.suffix[position + 1] > b.total_price,
        };
        if promising {
            self.current.push(false);
            self.visit(price, weight);
            self.current.pop();
        }

        if weight + item.weight <= self.instance.capacity() {
            self.current.push(true);
            self.visit(price + item.price, weight + item.weight);
            self.current.pop();
        }
    }
}
