//! FPTAS configuration.
//!
//! [`FptasConfig`] controls price quantization and the table size guard.

use crate::problem::KnapsackError;

/// Reference price used to derive the bit-truncation count.
///
/// With `n` items and tolerance `ε`, the solver truncates
/// `b = max(0, floor(log2(ε · scale / n)))` low bits of every price.
///
/// - [`MaxPrice`](Self::MaxPrice): `scale = max_i p_i`. Each item loses less
///   than `2^b ≤ ε · p_max / n` of price, so the optimum loses less than
///   `ε · p_max ≤ ε · OPT` and the result is at least `(1 - ε) · OPT`
///   (items heavier than the capacity can never be chosen, so `p_max` should
///   be taken over items that fit; see [`FptasSolver`](super::FptasSolver)).
/// - [`PriceSum`](Self::PriceSum): `scale = Σ p_i`. Coarser buckets and a
///   faster table, but the loss is only bounded by `ε · Σ p_i`, which can
///   exceed `ε · OPT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleReference {
    #[default]
    MaxPrice,
    PriceSum,
}

/// Configuration for the scaled dynamic-programming solver.
///
/// # Examples
///
/// ```
/// use u_knapsack::fptas::{FptasConfig, ScaleReference};
///
/// let exact = FptasConfig::exact();
/// assert_eq!(exact.tolerance, 0.0);
///
/// let approx = FptasConfig::new(0.1)
///     .with_scale(ScaleReference::PriceSum)
///     .with_max_table_cells(None);
/// assert!(approx.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FptasConfig {
    /// Desired relative error `ε ≥ 0`. `0` gives the exact DP.
    pub tolerance: f64,

    /// Reference price for the quantization step.
    pub scale: ScaleReference,

    /// Upper bound on DP table cells, `None` for unbounded.
    ///
    /// Each cell costs 16 bytes; the default of `2^26` cells caps the table
    /// at about 1 GiB.
    pub max_table_cells: Option<usize>,
}

impl Default for FptasConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.0,
            scale: ScaleReference::default(),
            max_table_cells: Some(1 << 26),
        }
    }
}

impl FptasConfig {
    /// Exact dynamic programming (`ε = 0`).
    pub fn exact() -> Self {
        Self::default()
    }

    /// Approximation with relative error `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_scale(mut self, scale: ScaleReference) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_max_table_cells(mut self, limit: Option<usize>) -> Self {
        self.max_table_cells = limit;
        self
    }

    pub fn validate(&self) -> Result<(), KnapsackError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(KnapsackError::InvalidTolerance(self.tolerance));
        }
        if self.max_table_cells == Some(0) {
            return Err(KnapsackError::InvalidConfig(
                "max_table_cells must be positive or None".into(),
            ));
        }
        Ok(())
    }
}

/// Number of low price bits to drop: `max(0, floor(log2(ε · scale / n)))`.
///
/// Returns `0` for `ε = 0`, an empty instance or a zero scale.
pub fn truncated_bits(tolerance: f64, scale: u64, item_count: usize) -> u32 {
    if tolerance <= 0.0 || scale == 0 || item_count == 0 {
        return 0;
    }
    let step = tolerance * scale as f64 / item_count as f64;
    if step < 2.0 {
        return 0;
    }
    (step.log2().floor() as u32).min(63)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_exact() {
        let config = FptasConfig::default();
        assert_eq!(config.tolerance, 0.0);
        assert_eq!(config.scale, ScaleReference::MaxPrice);
        assert_eq!(config.max_table_cells, Some(1 << 26));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        for tol in [-0.1, f64::NAN, f64::INFINITY] {
            let err = FptasConfig::exact().with_tolerance(tol).validate().unwrap_err();
            assert!(matches!(err, KnapsackError::InvalidTolerance(_)));
        }
    }

    #[test]
    fn test_validate_rejects_zero_cell_budget() {
        let config = FptasConfig::exact().with_max_table_cells(Some(0));
        assert!(matches!(config.validate(), Err(KnapsackError::InvalidConfig(_))));
    }

    #[test]
    fn test_truncated_bits() {
        assert_eq!(truncated_bits(0.0, 1000, 10), 0);
        assert_eq!(truncated_bits(0.5, 0, 10), 0);
        assert_eq!(truncated_bits(0.5, 100, 0), 0);
        // 0.1 * 100 / 10 = 1 -> log2 = 0
        assert_eq!(truncated_bits(0.1, 100, 10), 0);
        // 0.5 * 1000 / 10 = 50 -> floor(log2 50) = 5
        assert_eq!(truncated_bits(0.5, 1000, 10), 5);
        // exactly a power of two
        assert_eq!(truncated_bits(1.0, 64, 1), 6);
    }

    #[test]
    fn test_truncated_bits_capped() {
        assert_eq!(truncated_bits(1e30, u64::MAX, 1), 63);
    }
}
