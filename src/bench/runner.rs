//! Timed, repeated solver runs and per-solver aggregation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::{Duration, Instant};

use crate::problem::{Instance, KnapsackError, Solution, Solver};

/// Configuration for a benchmark run.
///
/// # Examples
///
/// ```
/// use u_knapsack::bench::BenchConfig;
///
/// let config = BenchConfig::default()
///     .with_repeats(5)
///     .with_reference("brute")
///     .with_size_limit("brute", 25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BenchConfig {
    /// Number of timed calls per solver and instance.
    pub repeats: usize,

    /// Solvers called once per instance regardless of `repeats`.
    pub dont_repeat: BTreeSet<String>,

    /// Solver whose price is the baseline for relative errors.
    pub reference: String,

    /// Whether to compute relative errors at all.
    pub compute_relative_errors: bool,

    /// Per-solver maximum item count; larger instances skip that solver.
    pub size_limits: BTreeMap<String, usize>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            repeats: 20,
            dont_repeat: ["brute", "dynamic", "genetic"]
                .into_iter()
                .map(String::from)
                .collect(),
            reference: "dynamic".into(),
            compute_relative_errors: true,
            size_limits: BTreeMap::new(),
        }
    }
}

impl BenchConfig {
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.reference = name.into();
        self
    }

    pub fn with_relative_errors(mut self, enabled: bool) -> Self {
        self.compute_relative_errors = enabled;
        self
    }

    pub fn with_size_limit(mut self, solver: impl Into<String>, max_items: usize) -> Self {
        self.size_limits.insert(solver.into(), max_items);
        self
    }

    pub fn validate(&self) -> Result<(), KnapsackError> {
        if self.repeats == 0 {
            return Err(KnapsackError::InvalidConfig(
                "repeats must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// What one solver produced on one instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunOutcome {
    Solved(Solution),
    /// The solver returned an error (its message).
    Failed(String),
    /// The instance exceeded the solver's size limit.
    Skipped,
}

impl RunOutcome {
    /// Achieved price; failures count as 0, skips have none.
    pub fn price(&self) -> Option<u64> {
        match self {
            RunOutcome::Solved(s) => Some(s.total_price),
            RunOutcome::Failed(_) => Some(0),
            RunOutcome::Skipped => None,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverRun {
    pub solver: String,
    pub outcome: RunOutcome,
    /// Mean wall-clock time per call.
    pub mean_time: Duration,
}

/// Results of every solver on one instance.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceRecord {
    pub id: u64,
    pub item_count: usize,
    pub runs: Vec<SolverRun>,
}

impl InstanceRecord {
    pub fn run(&self, solver: &str) -> Option<&SolverRun> {
        self.runs.iter().find(|r| r.solver == solver)
    }
}

/// Aggregate figures for one solver across all instances.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverSummary {
    pub solver: String,
    /// Instances the solver actually ran on.
    pub instances: usize,
    pub skipped: usize,
    pub failures: usize,
    pub mean_time: Duration,
    /// Mean of `(ref - price) / ref`; `None` when nothing was comparable.
    pub mean_relative_error: Option<f64>,
    pub max_relative_error: Option<f64>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchReport {
    pub records: Vec<InstanceRecord>,
    pub summaries: Vec<SolverSummary>,
}

/// Relative price error against the reference price.
///
/// `0` when the reference price is `0`; negative when the solver beats a
/// non-exact reference.
pub fn relative_error(reference: u64, price: u64) -> f64 {
    if reference == 0 {
        return 0.0;
    }
    (reference as f64 - price as f64) / reference as f64
}

/// `total / count` without narrowing `count`; zero for `count == 0`.
fn mean_duration(total: Duration, count: usize) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    total.div_f64(count as f64)
}

/// Runs a fixed suite of solvers over instances.
///
/// Every solver receives the same shared, immutable instance; none can
/// observe item reordering by another.
pub struct Benchmark {
    config: BenchConfig,
    solvers: Vec<Box<dyn Solver>>,
}

impl Benchmark {
    /// # Errors
    /// [`KnapsackError::InvalidConfig`] for an invalid config, duplicate solver
    /// names, or a reference solver missing from the suite while relative
    /// errors are enabled.
    pub fn new(config: BenchConfig, solvers: Vec<Box<dyn Solver>>) -> Result<Self, KnapsackError> {
        config.validate()?;
        let mut names = BTreeSet::new();
        for s in &solvers {
            if !names.insert(s.name().to_string()) {
                return Err(KnapsackError::InvalidConfig(format!(
                    "duplicate solver name {:?}",
                    s.name()
                )));
            }
        }
        if config.compute_relative_errors && !names.contains(&config.reference) {
            return Err(KnapsackError::InvalidConfig(format!(
                "reference solver {:?} is not in the suite",
                config.reference
            )));
        }
        Ok(Self { config, solvers })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs every solver on one instance.
    pub fn run_instance(&self, instance: &Instance) -> InstanceRecord {
        let runs = self
            .solvers
            .iter()
            .map(|solver| self.time_solver(solver.as_ref(), instance))
            .collect();
        InstanceRecord {
            id: instance.id(),
            item_count: instance.len(),
            runs,
        }
    }

    fn time_solver(&self, solver: &dyn Solver, instance: &Instance) -> SolverRun {
        let name = solver.name().to_string();
        if self
            .config
            .size_limits
            .get(&name)
            .is_some_and(|&limit| instance.len() > limit)
        {
            log::debug!("bench: {} skipped on instance {} ({} items)", name, instance.id(), instance.len());
            return SolverRun {
                solver: name,
                outcome: RunOutcome::Skipped,
                mean_time: Duration::ZERO,
            };
        }

        let repeats = if self.config.dont_repeat.contains(&name) {
            1
        } else {
            self.config.repeats
        };

        let mut total = Duration::ZERO;
        let mut last = None;
        for _ in 0..repeats {
            let start = Instant::now();
            let result = solver.solve(instance);
            total += start.elapsed();
            last = Some(result);
        }

        let outcome = match last {
            Some(Ok(solution)) => RunOutcome::Solved(solution),
            Some(Err(e)) => {
                log::warn!("bench: {} failed on instance {}: {}", name, instance.id(), e);
                RunOutcome::Failed(e.to_string())
            }
            None => RunOutcome::Skipped,
        };

        SolverRun {
            solver: name,
            outcome,
            mean_time: mean_duration(total, repeats),
        }
    }

    /// Runs the whole suite, calling `on_record` after each instance.
    pub fn run_with<F: FnMut(&InstanceRecord)>(&self, instances: &[Instance], mut on_record: F) -> BenchReport {
        let mut records = Vec::with_capacity(instances.len());
        for inst in instances {
            log::info!("bench: solving instance {} ({} items)", inst.id(), inst.len());
            let record = self.run_instance(inst);
            on_record(&record);
            records.push(record);
        }
        let summaries = self.summarize(&records);
        BenchReport { records, summaries }
    }

    /// Runs the whole suite.
    pub fn run(&self, instances: &[Instance]) -> BenchReport {
        self.run_with(instances, |_| {})
    }

    fn summarize(&self, records: &[InstanceRecord]) -> Vec<SolverSummary> {
        self.solvers
            .iter()
            .map(|solver| {
                let name = solver.name();
                let mut summary = SolverSummary {
                    solver: name.to_string(),
                    instances: 0,
                    skipped: 0,
                    failures: 0,
                    mean_time: Duration::ZERO,
                    mean_relative_error: None,
                    max_relative_error: None,
                };
                let mut total_time = Duration::ZERO;
                let mut errors = Vec::new();

                for record in records {
                    let Some(run) = record.run(name) else { continue };
                    match &run.outcome {
                        RunOutcome::Skipped => {
                            summary.skipped += 1;
                            continue;
                        }
                        RunOutcome::Failed(_) => summary.failures += 1,
                        RunOutcome::Solved(_) => {}
                    }
                    summary.instances += 1;
                    total_time += run.mean_time;

                    if !self.config.compute_relative_errors {
                        continue;
                    }
                    let reference = record
                        .run(&self.config.reference)
                        .and_then(|r| match &r.outcome {
                            RunOutcome::Solved(s) => Some(s.total_price),
                            _ => None,
                        });
                    if let (Some(reference), Some(price)) = (reference, run.outcome.price()) {
                        errors.push(relative_error(reference, price));
                    }
                }

                summary.mean_time = mean_duration(total_time, summary.instances);
                if !errors.is_empty() {
                    summary.mean_relative_error = Some(errors.iter().sum::<f64>() / errors.len() as f64);
                    summary.max_relative_error = errors.iter().copied().reduce(f64::max);
                }
                summary
            })
            .collect()
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_err = |e: Option<f64>| e.map_or_else(|| "-".to_string(), |v| format!("{v:.5}"));

        writeln!(f, "Mean runtime:")?;
        for s in &self.summaries {
            writeln!(f, "  {}: {:.5} s", s.solver, s.mean_time.as_secs_f64())?;
        }
        writeln!(f, "Mean relative error:")?;
        for s in &self.summaries {
            writeln!(f, "  {}: {}", s.solver, fmt_err(s.mean_relative_error))?;
        }
        writeln!(f, "Max relative error:")?;
        for s in &self.summaries {
            writeln!(f, "  {}: {}", s.solver, fmt_err(s.max_relative_error))?;
        }
        let troubled: Vec<&SolverSummary> = self
            .summaries
            .iter()
            .filter(|s| s.failures > 0 || s.skipped > 0)
            .collect();
        if !troubled.is_empty() {
            writeln!(f, "Failures / skipped:")?;
            for s in troubled {
                writeln!(f, "  {}: {} / {}", s.solver, s.failures, s.skipped)?;
            }
        }
        Ok(())
    }
}
