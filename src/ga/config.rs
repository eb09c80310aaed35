//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the generational loop.
//! Population sizes are not fixed numbers: they scale with the item count.

use crate::problem::KnapsackError;

/// Largest population a run may allocate.
pub const MAX_POPULATION: usize = 1 << 24;

/// Configuration for the genetic solver.
///
/// The maximum population for an instance of `n` items is
/// `ceil(max_population_base · n^population_exponent)`; the minimum
/// population (the size selection shrinks each generation down to) is
/// `ceil(min_population_percent · max)`.
///
/// # Defaults
///
/// ```
/// use u_knapsack::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.brawl_size, 4);
/// assert_eq!(config.max_generations, 6000);
/// assert_eq!(config.break_on_generations_same, 250);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_knapsack::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_max_population_base(20.0)
///     .with_brawl_size(3)
///     .with_mutation_probability(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Base factor of the maximum population size.
    pub max_population_base: f64,

    /// Exponent applied to the item count when sizing the population.
    ///
    /// Sub-linear: larger instances get more specimens, with diminishing
    /// returns.
    pub population_exponent: f64,

    /// Minimum population as a fraction of the maximum (0.0–1.0].
    pub min_population_percent: f64,

    /// Fraction of the minimum population filled by distinct elites (0.0–1.0).
    pub best_percent_to_next_generation: f64,

    /// Probability that a child gets one random bit flipped (0.0–1.0).
    pub mutation_probability: f64,

    /// Number of specimens drawn into each tournament ("brawl").
    pub brawl_size: usize,

    /// Maximum number of generations.
    pub max_generations: usize,

    /// Stop after this many generations whose best fitness equals the best
    /// seen so far, once a feasible genome has been found.
    ///
    /// A generation whose best falls below the record neither counts nor
    /// resets the counter. Set to 0 to disable stagnation-based termination.
    pub break_on_generations_same: usize,

    /// Whether to evaluate offspring in parallel (needs the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            max_population_base: 15.0,
            population_exponent: 0.6,
            min_population_percent: 0.75,
            best_percent_to_next_generation: 0.05,
            mutation_probability: 0.2,
            brawl_size: 4,
            max_generations: 6000,
            break_on_generations_same: 250,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the base factor of the maximum population size.
    pub fn with_max_population_base(mut self, base: f64) -> Self {
        self.max_population_base = base;
        self
    }

    /// Sets the item-count exponent of the population size.
    pub fn with_population_exponent(mut self, exponent: f64) -> Self {
        self.population_exponent = exponent;
        self
    }

    /// Sets the minimum population fraction.
    pub fn with_min_population_percent(mut self, percent: f64) -> Self {
        self.min_population_percent = percent.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite fraction.
    pub fn with_best_percent(mut self, percent: f64) -> Self {
        self.best_percent_to_next_generation = percent.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size.
    pub fn with_brawl_size(mut self, size: usize) -> Self {
        self.brawl_size = size;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_break_on_generations_same(mut self, n: usize) -> Self {
        self.break_on_generations_same = n;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick runs: short budgets, early stagnation exit.
    ///
    /// - Generations: 500, Stagnation limit: 50
    pub fn fast() -> Self {
        Self {
            max_generations: 500,
            break_on_generations_same: 50,
            ..Self::default()
        }
    }

    /// Preset favoring solution quality over runtime.
    ///
    /// - Population base: 30, Generations: 10000, Stagnation limit: 500
    pub fn quality() -> Self {
        Self {
            max_population_base: 30.0,
            max_generations: 10_000,
            break_on_generations_same: 500,
            ..Self::default()
        }
    }

    /// Returns `(min, max)` population sizes for `item_count` items.
    ///
    /// The maximum is at least 2 so crossover always has parents; the
    /// minimum is between 1 and the maximum.
    ///
    /// # Errors
    /// [`KnapsackError::InvalidConfig`] if the maximum would exceed
    /// [`MAX_POPULATION`].
    pub fn population_bounds(&self, item_count: usize) -> Result<(usize, usize), KnapsackError> {
        let scaled = self.max_population_base * (item_count as f64).powf(self.population_exponent);
        if scaled.is_nan() || scaled.ceil() > MAX_POPULATION as f64 {
            return Err(KnapsackError::InvalidConfig(format!(
                "population of {scaled} for {item_count} items exceeds {MAX_POPULATION}"
            )));
        }
        let max = (scaled.ceil() as usize).max(2);
        let min = ((self.min_population_percent * max as f64).ceil() as usize).clamp(1, max);
        Ok((min, max))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), KnapsackError> {
        let invalid = |msg: &str| -> Result<(), KnapsackError> {
            Err(KnapsackError::InvalidConfig(msg.into()))
        };

        if !(self.max_population_base > 0.0 && self.max_population_base <= MAX_POPULATION as f64) {
            return invalid("max_population_base must be in (0, MAX_POPULATION]");
        }
        if !(self.population_exponent.is_finite() && self.population_exponent >= 0.0) {
            return invalid("population_exponent must be finite and non-negative");
        }
        if !(self.min_population_percent > 0.0 && self.min_population_percent <= 1.0) {
            return invalid("min_population_percent must be in (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.best_percent_to_next_generation) {
            return invalid("best_percent_to_next_generation must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return invalid("mutation_probability must be in [0, 1]");
        }
        if self.brawl_size == 0 {
            return invalid("brawl_size must be at least 1");
        }
        if self.max_generations == 0 {
            return invalid("max_generations must be at least 1");
        }
        Ok(())
    }
}
