//! Single-pass greedy heuristic by descending price-to-weight ratio.
//!
//! The solver sorts a permutation of item indices rather than the items
//! themselves, so the caller's item order is left untouched and the returned
//! selection is indexed like [`Instance::items`].

use std::cmp::Ordering;

use crate::problem::{Instance, Item, KnapsackError, Solution, Solver};

/// Greedy ratio heuristic. Always feasible, not necessarily optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl GreedySolver {
    pub fn new() -> Self {
        Self
    }

    /// Item indices ordered by descending price-to-weight ratio.
    ///
    /// Zero-weight items have an infinite ratio and come first. The sort is
    /// stable, so equal ratios keep their input order.
    pub fn ratio_order(items: &[Item]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| compare_ratio(&items[b], &items[a]));
        order
    }
}

/// Compares `a.price / a.weight` with `b.price / b.weight` exactly.
///
/// Cross-multiplication in `u128` avoids both floating point and division by
/// zero; any zero weight counts as `+inf`.
fn compare_ratio(a: &Item, b: &Item) -> Ordering {
    match (a.weight == 0, b.weight == 0) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let lhs = a.price as u128 * b.weight as u128;
            let rhs = b.price as u128 * a.weight as u128;
            lhs.cmp(&rhs)
        }
    }
}

impl Solver for GreedySolver {
    fn name(&self) -> &str {
        "greedy"
    }

    fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError> {
        let items = instance.items();
        let mut selection = vec![false; items.len()];
        let mut weight = 0u64;
        let mut price = 0u64;

        for idx in Self::ratio_order(items) {
            let item = items[idx];
            if weight + item.weight <= instance.capacity() {
                selection[idx] = true;
                weight += item.weight;
                price += item.price;
            }
        }

        Ok(Solution {
            selection,
            total_price: price,
            total_weight: weight,
        })
    }
}
