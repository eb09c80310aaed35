//! Price-indexed dynamic programming with backtracking reconstruction.
//!
//! # Algorithm
//!
//! 1. Derive the truncation count `b` from the tolerance and the scale
//!    reference, then quantize each price as `q_i = p_i >> b`.
//! 2. Build a table `T[k][p]` = minimum weight of a subset of the first `k`
//!    items whose quantized price is exactly `p` (`None` if unreachable).
//!    Column `k = 0` is the explicit base case: only `T[0][0] = 0`.
//! 3. `T[k][p] = min(T[k-1][p], T[k-1][p - q_k] + w_k)`.
//! 4. The best quantized price is the highest row of the last column whose
//!    weight fits; the selection is recovered by walking back one column at a
//!    time, taking item `k` whenever `T[k][p] != T[k-1][p]`.
//! 5. The reported price is recomputed from the true prices.

use super::config::{truncated_bits, FptasConfig, ScaleReference};
use crate::problem::{Instance, KnapsackError, Solution, Solver};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Item with its solver-local quantized price.
#[derive(Debug, Clone, Copy)]
struct QuantizedItem {
    weight: u64,
    quantized_price: u64,
}

/// Column-major DP table with an explicit base column.
///
/// Column `k` covers the prefix of the first `k` items, so there are `n + 1`
/// columns of `rows = Σ q_i + 1` cells each.
struct DpTable {
    rows: usize,
    cells: Vec<Option<u64>>,
}

impl DpTable {
    fn build(items: &[QuantizedItem], rows: usize) -> Self {
        let mut cells = vec![None; rows * (items.len() + 1)];
        cells[0] = Some(0);

        for (k, item) in items.iter().enumerate() {
            let (done, rest) = cells.split_at_mut((k + 1) * rows);
            let prev = &done[k * rows..];
            let next = &mut rest[..rows];
            fill_column(prev, next, item);
        }

        Self { rows, cells }
    }

    fn column(&self, k: usize) -> &[Option<u64>] {
        &self.cells[k * self.rows..(k + 1) * self.rows]
    }

    fn get(&self, k: usize, price: usize) -> Option<u64> {
        self.cells[k * self.rows + price]
    }
}

fn transition(prev: &[Option<u64>], price: usize, item: &QuantizedItem) -> Option<u64> {
    let skip = prev[price];
    let take = (price as u64)
        .checked_sub(item.quantized_price)
        .and_then(|p| prev[p as usize])
        .map(|w| w + item.weight);
    match (skip, take) {
        (Some(s), Some(t)) => Some(s.min(t)),
        (s, None) => s,
        (None, t) => t,
    }
}

#[cfg(not(feature = "parallel"))]
fn fill_column(prev: &[Option<u64>], next: &mut [Option<u64>], item: &QuantizedItem) {
    for (price, cell) in next.iter_mut().enumerate() {
        *cell = transition(prev, price, item);
    }
}

#[cfg(feature = "parallel")]
fn fill_column(prev: &[Option<u64>], next: &mut [Option<u64>], item: &QuantizedItem) {
    next.par_iter_mut()
        .enumerate()
        .for_each(|(price, cell)| *cell = transition(prev, price, item));
}

/// Scaled dynamic-programming solver (an FPTAS).
///
/// With `tolerance = 0` the solver is exact; with `ε > 0` and
/// [`ScaleReference::MaxPrice`] the reported price is at least
/// `(1 - ε) · OPT`. Prices are quantized against the largest price among
/// items that fit the capacity on their own.
///
/// # Examples
///
/// ```
/// use u_knapsack::fptas::{FptasConfig, FptasSolver};
/// use u_knapsack::problem::{Instance, Solver};
///
/// let inst = Instance::from_pairs(&[(2, 3), (3, 4), (4, 5), (5, 6)], 5).unwrap();
/// let sol = FptasSolver::new(FptasConfig::exact()).solve(&inst).unwrap();
/// assert_eq!(sol.total_price, 7);
/// ```
#[derive(Debug, Clone)]
pub struct FptasSolver {
    config: FptasConfig,
    name: String,
}

impl FptasSolver {
    pub fn new(config: FptasConfig) -> Self {
        let name = if config.tolerance == 0.0 {
            "dynamic".to_string()
        } else {
            format!("fptas-{}", config.tolerance)
        };
        Self { config, name }
    }

    /// Exact dynamic-programming solver, reported as `dynamic`.
    pub fn exact() -> Self {
        Self::new(FptasConfig::exact())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(&self) -> &FptasConfig {
        &self.config
    }

    fn scale(&self, instance: &Instance) -> u64 {
        match self.config.scale {
            ScaleReference::MaxPrice => instance
                .items()
                .iter()
                .filter(|it| it.weight <= instance.capacity())
                .map(|it| it.price)
                .max()
                .unwrap_or(0),
            ScaleReference::PriceSum => instance.total_price(),
        }
    }
}

impl Solver for FptasSolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError> {
        self.config.validate()?;

        let n = instance.len();
        let bits = truncated_bits(self.config.tolerance, self.scale(instance), n);
        // Items that cannot fit on their own never enter a solution; giving
        // them no quantized price keeps them out of the table's price range.
        let items: Vec<QuantizedItem> = instance
            .items()
            .iter()
            .map(|it| QuantizedItem {
                weight: it.weight,
                quantized_price: if it.weight <= instance.capacity() {
                    it.price >> bits
                } else {
                    0
                },
            })
            .collect();

        // Bounded by the instance's total price, which fits in u64.
        let quantized_sum: u64 = items.iter().map(|it| it.quantized_price).sum();
        if quantized_sum == 0 {
            log::debug!(
                "fptas: instance {} quantized every price to 0 ({} bits), returning empty selection",
                instance.id(),
                bits
            );
            return Ok(instance.empty_solution());
        }

        let rows = quantized_sum as u128 + 1;
        let cells = rows * (n as u128 + 1);
        let limit = self.config.max_table_cells.unwrap_or(usize::MAX);
        if cells > limit as u128 {
            return Err(KnapsackError::TableTooLarge { cells, limit });
        }
        // cells fits in usize, so rows does too.
        let rows = rows as usize;
        log::debug!(
            "fptas: instance {} tolerance {} drops {} bits, table {} x {}",
            instance.id(),
            self.config.tolerance,
            bits,
            rows,
            n + 1
        );

        let table = DpTable::build(&items, rows);

        let best_row = table
            .column(n)
            .iter()
            .rposition(|cell| matches!(cell, Some(w) if *w <= instance.capacity()))
            .unwrap_or(0);

        let mut selection = vec![false; n];
        let mut row = best_row;
        for k in (1..=n).rev() {
            if table.get(k, row) != table.get(k - 1, row) {
                selection[k - 1] = true;
                row -= items[k - 1].quantized_price as usize;
            }
        }
        debug_assert_eq!(row, 0);

        Ok(instance.solution_from_selection(selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute::BruteForceSolver;

    fn classic() -> Instance {
        Instance::from_pairs(&[(2, 3), (3, 4), (4, 5), (5, 6)], 5).unwrap()
    }

    #[test]
    fn test_exact_reconstructs_optimum() {
        let sol = FptasSolver::exact().solve(&classic()).unwrap();
        assert_eq!(sol.total_price, 7);
        assert_eq!(sol.total_weight, 5);
        assert_eq!(sol.selection, vec![true, true, false, false]);
    }

    #[test]
    fn test_table_contents() {
        let items = [
            QuantizedItem { weight: 2, quantized_price: 1 },
            QuantizedItem { weight: 1, quantized_price: 2 },
        ];
        let table = DpTable::build(&items, 4);
        assert_eq!(table.column(0), &[Some(0), None, None, None]);
        assert_eq!(table.column(1), &[Some(0), Some(2), None, None]);
        assert_eq!(table.column(2), &[Some(0), Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::from_pairs(&[], 4).unwrap();
        let sol = FptasSolver::exact().solve(&inst).unwrap();
        assert_eq!(sol.total_price, 0);
        assert!(sol.selection.is_empty());
    }

    #[test]
    fn test_nothing_fits() {
        let inst = Instance::from_pairs(&[(10, 5)], 5).unwrap();
        let sol = FptasSolver::exact().solve(&inst).unwrap();
        assert_eq!(sol.total_price, 0);
        assert_eq!(sol.selection, vec![false]);
    }

    #[test]
    fn test_all_prices_quantized_to_zero() {
        // PriceSum scale: 3.0 * 12 / 4 = 9 -> 3 bits, and 3 >> 3 == 0.
        let inst = Instance::from_pairs(&[(1, 3), (1, 3), (1, 3), (1, 3)], 4).unwrap();
        let config = FptasConfig::new(3.0).with_scale(ScaleReference::PriceSum);
        let sol = FptasSolver::new(config).solve(&inst).unwrap();
        assert_eq!(sol.total_price, 0);
        assert_eq!(sol.selection, vec![false; 4]);
    }

    #[test]
    fn test_reported_price_is_exact() {
        let inst = Instance::from_pairs(&[(3, 1000), (4, 1001), (5, 999)], 7).unwrap();
        let sol = FptasSolver::new(FptasConfig::new(0.1)).solve(&inst).unwrap();
        assert!(sol.is_consistent(&inst));
        assert!(sol.is_feasible(&inst));
        let opt = BruteForceSolver.solve(&inst).unwrap();
        assert!(sol.total_price as f64 >= 0.9 * opt.total_price as f64);
    }

    #[test]
    fn test_heavy_expensive_item_ignored_for_scale() {
        // The 10^9 item never fits; quantizing against it would erase the rest.
        let inst = Instance::from_pairs(&[(100, 1_000_000_000), (1, 10), (1, 11)], 2).unwrap();
        let sol = FptasSolver::new(FptasConfig::new(0.5)).solve(&inst).unwrap();
        assert_eq!(sol.total_price, 21);
    }

    #[test]
    fn test_table_too_large() {
        let inst = Instance::from_pairs(&[(1, 1_000_000), (1, 1_000_000)], 2).unwrap();
        let solver = FptasSolver::new(FptasConfig::exact().with_max_table_cells(Some(1000)));
        let err = solver.solve(&inst).unwrap_err();
        assert!(matches!(err, KnapsackError::TableTooLarge { limit: 1000, .. }));
    }

    #[test]
    fn test_invalid_tolerance() {
        let solver = FptasSolver::new(FptasConfig::new(-1.0));
        let err = solver.solve(&classic()).unwrap_err();
        assert!(matches!(err, KnapsackError::InvalidTolerance(_)));
    }

    #[test]
    fn test_names() {
        assert_eq!(FptasSolver::exact().name(), "dynamic");
        assert_eq!(FptasSolver::new(FptasConfig::new(0.1)).name(), "fptas-0.1");
        assert_eq!(FptasSolver::exact().with_name("dp").name(), "dp");
    }
}
