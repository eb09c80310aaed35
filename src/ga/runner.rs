//! GA generational loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → selection → crossbreeding → mutation → repeat, until the
//! generation budget runs out or the best fitness stagnates.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::GaConfig;
use super::operators::{flip_mutation, random_genome, single_point_crossover};
use super::selection::{next_generation, SelectionParams};
use super::stats::StatsSink;
use super::types::{fitness, Specimen};
use crate::problem::{Instance, KnapsackError, Solution, Solver};

/// Result of a GA run.
///
/// Contains the best specimen of the final population, along with
/// statistics about the evolutionary process.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// Best specimen of the final population. May be infeasible.
    pub best: Specimen,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Best fitness at the end of each generation.
    pub fitness_history: Vec<i64>,

    /// `(min, max)` population sizes used for this instance.
    pub population_bounds: (usize, usize),
}

impl GaResult {
    /// Decodes the best specimen, or reports that no feasible genome was found.
    pub fn into_solution(self, instance: &Instance) -> Result<Solution, KnapsackError> {
        if !self.best.genome.is_feasible(instance) {
            return Err(KnapsackError::NoSolutionFound {
                generations: self.generations,
            });
        }
        Ok(instance.solution_from_selection(self.best.genome.into_bits()))
    }
}

/// Executes the GA generational loop.
///
/// # Usage
///
/// ```
/// use u_knapsack::ga::{GaConfig, GaRunner};
/// use u_knapsack::problem::Instance;
///
/// let inst = Instance::from_pairs(&[(2, 3), (3, 4), (4, 5), (5, 6)], 5).unwrap();
/// let config = GaConfig::fast().with_seed(42);
/// let result = GaRunner::run(&inst, &config, None).unwrap();
/// assert!(result.best.fitness <= 7);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA on a non-empty instance.
    ///
    /// # Errors
    /// - [`KnapsackError::InvalidConfig`] for an invalid configuration or an
    ///   instance without items (no genome to evolve).
    /// - [`KnapsackError::Io`] if the stats sink fails.
    pub fn run(
        instance: &Instance,
        config: &GaConfig,
        sink: Option<&dyn StatsSink>,
    ) -> Result<GaResult, KnapsackError> {
        config.validate()?;
        if instance.is_empty() {
            return Err(KnapsackError::InvalidConfig(
                "genetic search needs at least one item".into(),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let n = instance.len();
        let (min_size, max_size) = config.population_bounds(n)?;
        let params = SelectionParams {
            min_size,
            best_percent: config.best_percent_to_next_generation,
            brawl_size: config.brawl_size,
        };
        log::debug!(
            "ga: instance {} with {} items, population {}..{}",
            instance.id(),
            n,
            min_size,
            max_size
        );

        // 1. Initialize population
        let mut population: Vec<Specimen> = (0..max_size)
            .map(|_| Specimen::unevaluated(random_genome(n, &mut rng)))
            .collect();
        evaluate_population(instance, &mut population, config.parallel);

        let mut fitness_history = Vec::with_capacity(config.max_generations.min(1024));
        let mut tracker = Stagnation::default();
        let mut generations = 0usize;
        let mut stagnated = false;

        // 2. Generational loop
        for gen in 0..config.max_generations {
            population = next_generation(population, params, &mut rng);
            crossbreed(instance, &mut population, max_size, config, &mut rng);

            if let Some(sink) = sink {
                sink.record(instance.id(), gen, &population)?;
            }

            generations = gen + 1;
            let gen_best = best_of(&population).map_or(i64::MIN, |s| s.fitness);
            fitness_history.push(gen_best);
            log::trace!("ga: instance {} generation {} best {}", instance.id(), gen, gen_best);

            tracker.observe(gen_best);
            if tracker.is_stagnant(config.break_on_generations_same) {
                stagnated = true;
                break;
            }
        }

        let best = best_of(&population).cloned().ok_or_else(|| {
            KnapsackError::InvalidConfig("population died out".into())
        })?;
        log::debug!(
            "ga: instance {} finished after {} generations (stagnated: {}), best fitness {}",
            instance.id(),
            generations,
            stagnated,
            best.fitness
        );

        Ok(GaResult {
            best,
            generations,
            stagnated,
            fitness_history,
            population_bounds: (min_size, max_size),
        })
    }
}

/// Counts generations whose best fitness repeats the record.
#[derive(Debug, Default)]
struct Stagnation {
    best: Option<i64>,
    same_rounds: usize,
}

impl Stagnation {
    fn observe(&mut self, gen_best: i64) {
        match self.best {
            Some(best) if gen_best == best => self.same_rounds += 1,
            // A regression leaves the counter untouched.
            Some(best) if gen_best < best => {}
            _ => {
                self.best = Some(gen_best);
                self.same_rounds = 0;
            }
        }
    }

    /// Only a positive-price record can stagnate; `limit == 0` never does.
    fn is_stagnant(&self, limit: usize) -> bool {
        limit > 0 && self.same_rounds >= limit && self.best.is_some_and(|b| b > 0)
    }
}

fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Refills `population` up to `max_size` with mutated offspring.
///
/// Parents are drawn uniformly with replacement from the whole current
/// population, including children produced earlier in the same pass. Both
/// children of a pair are kept, so the population may end one above
/// `max_size`. Fitness of the new tail is computed in one batch at the end.
fn crossbreed<R: Rng>(
    instance: &Instance,
    population: &mut Vec<Specimen>,
    max_size: usize,
    config: &GaConfig,
    rng: &mut R,
) {
    if population.is_empty() {
        return;
    }
    let first_child = population.len();
    while population.len() < max_size {
        let father = &population[rng.random_range(0..population.len())].genome;
        let mother = &population[rng.random_range(0..population.len())].genome;
        let (mut son, mut daughter) = single_point_crossover(father, mother, rng);

        flip_mutation(&mut son, config.mutation_probability, rng);
        flip_mutation(&mut daughter, config.mutation_probability, rng);

        population.push(Specimen::unevaluated(son));
        population.push(Specimen::unevaluated(daughter));
    }
    evaluate_population(instance, &mut population[first_child..], config.parallel);
}

/// Evaluate all specimens in the slice.
fn evaluate_population(instance: &Instance, population: &mut [Specimen], parallel: bool) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            population
                .par_iter_mut()
                .for_each(|s| s.fitness = fitness(&s.genome, instance));
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for s in population.iter_mut() {
        s.fitness = fitness(&s.genome, instance);
    }
}

/// Find the specimen with the highest fitness (first one on ties).
fn best_of(population: &[Specimen]) -> Option<&Specimen> {
    population
        .iter()
        .reduce(|best, s| if s.fitness > best.fitness { s } else { best })
}

/// Genetic metaheuristic solver.
///
/// Stochastic: unless [`GaConfig::seed`] is set, repeated calls may return
/// different solutions. Never returns an infeasible solution; if no feasible
/// genome is found it fails with [`KnapsackError::NoSolutionFound`].
#[derive(Clone, Default)]
pub struct GeneticSolver {
    config: GaConfig,
    sink: Option<Arc<dyn StatsSink>>,
}

impl std::fmt::Debug for GeneticSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneticSolver")
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl GeneticSolver {
    pub fn new(config: GaConfig) -> Self {
        Self { config, sink: None }
    }

    /// Attaches a sink receiving every generation's population.
    pub fn with_stats_sink(mut self, sink: Arc<dyn StatsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA and returns the full run statistics.
    pub fn run(&self, instance: &Instance) -> Result<GaResult, KnapsackError> {
        GaRunner::run(instance, &self.config, self.sink.as_deref())
    }
}

impl Solver for GeneticSolver {
    fn name(&self) -> &str {
        "genetic"
    }

    fn solve(&self, instance: &Instance) -> Result<Solution, KnapsackError> {
        if instance.is_empty() {
            self.config.validate()?;
            return Ok(instance.empty_solution());
        }
        self.run(instance)?.into_solution(instance)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute::BruteForceSolver;
    use crate::bench::relative_error;
    use crate::ga::Genome;
    use std::sync::Mutex;

    fn classic() -> Instance {
        Instance::from_pairs(&[(2, 3), (3, 4), (4, 5), (5, 6)], 5).unwrap()
    }

    fn p01() -> Instance {
        Instance::from_pairs(
            &[(23, 92), (31, 57), (29, 49), (44, 68), (53, 60), (38, 43), (63, 67), (85, 84), (89, 87), (82, 72)],
            165,
        )
        .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        generations: Mutex<Vec<(u64, usize, usize)>>,
    }

    impl StatsSink for Recorder {
        fn record(&self, id: u64, generation: usize, population: &[Specimen]) -> std::io::Result<()> {
            self.generations.lock().unwrap().push((id, generation, population.len()));
            Ok(())
        }
    }

    #[test]
    fn test_solves_classic_instance() {
        let config = GaConfig::fast().with_seed(42);
        let sol = GeneticSolver::new(config).solve(&classic()).unwrap();
        assert_eq!(sol.total_price, 7);
        assert!(sol.is_feasible(&classic()));
        assert!(sol.is_consistent(&classic()));
    }

    #[test]
    fn test_near_optimal_on_p01() {
        let inst = p01();
        let opt = BruteForceSolver.solve(&inst).unwrap().total_price;
        let config = GaConfig::default().with_seed(7).with_max_generations(2000);
        let sol = GeneticSolver::new(config).solve(&inst).unwrap();
        assert!(sol.is_feasible(&inst));
        assert!(
            sol.total_price as f64 >= 0.9 * opt as f64,
            "expected within 10% of {opt}, got {}",
            sol.total_price
        );
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = GaConfig::fast().with_seed(123);
        let a = GeneticSolver::new(config.clone()).run(&p01()).unwrap();
        let b = GeneticSolver::new(config).run(&p01()).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.generations, b.generations);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_best_fitness_never_decreases_with_elitism() {
        let config = GaConfig::default()
            .with_seed(42)
            .with_max_generations(200)
            .with_break_on_generations_same(0);
        let result = GeneticSolver::new(config).run(&p01()).unwrap();
        assert_eq!(result.generations, 200);
        assert!(!result.stagnated);
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best fitness should be non-decreasing with elitism: {} < {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_stagnation_termination() {
        let config = GaConfig::default()
            .with_seed(42)
            .with_max_generations(5000)
            .with_break_on_generations_same(10);
        let result = GeneticSolver::new(config).run(&classic()).unwrap();
        assert!(result.stagnated, "expected stagnation on a 4-item instance");
        assert!(result.generations < 5000);
        assert_eq!(result.fitness_history.len(), result.generations);
    }

    #[test]
    fn test_no_stagnation_exit_without_positive_fitness() {
        // Every item is too heavy: the best reachable fitness is 0 (empty genome),
        // so stagnation never triggers and the full budget is used.
        let inst = Instance::from_pairs(&[(10, 5), (11, 6), (12, 7)], 5).unwrap();
        let config = GaConfig::default()
            .with_seed(1)
            .with_max_generations(30)
            .with_break_on_generations_same(2);
        let result = GeneticSolver::new(config).run(&inst).unwrap();
        assert_eq!(result.generations, 30);
        assert!(!result.stagnated);
        assert!(result.best.fitness <= 0);
    }

    #[test]
    fn test_infeasible_best_is_reported_as_failure() {
        let inst = classic();
        let result = GaResult {
            best: Specimen::evaluated(Genome::new(vec![true; 4]), &inst),
            generations: 3,
            stagnated: false,
            fitness_history: vec![-4, -4, -4],
            population_bounds: (2, 2),
        };
        let err = result.into_solution(&inst).unwrap_err();
        assert!(matches!(err, KnapsackError::NoSolutionFound { generations: 3 }));
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::from_pairs(&[], 10).unwrap();
        let sol = GeneticSolver::default().solve(&inst).unwrap();
        assert_eq!(sol.total_price, 0);
        assert!(sol.selection.is_empty());
        assert!(GaRunner::run(&inst, &GaConfig::default(), None).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let config = GaConfig::default().with_brawl_size(0);
        let err = GeneticSolver::new(config).solve(&classic()).unwrap_err();
        assert!(matches!(err, KnapsackError::InvalidConfig(_)));
    }

    #[test]
    fn test_stats_sink_sees_every_generation() {
        let recorder = Arc::new(Recorder::default());
        let config = GaConfig::default()
            .with_seed(5)
            .with_max_generations(12)
            .with_break_on_generations_same(0);
        let inst = classic().with_id(99);
        let solver = GeneticSolver::new(config).with_stats_sink(recorder.clone());
        let result = solver.run(&inst).unwrap();

        let seen = recorder.generations.lock().unwrap();
        assert_eq!(seen.len(), 12);
        let (_, max) = result.population_bounds;
        for (i, &(id, gen, size)) in seen.iter().enumerate() {
            assert_eq!(id, 99);
            assert_eq!(gen, i);
            assert!(size >= max && size <= max + 1, "population {size} outside {max}..={}", max + 1);
        }
    }

    #[test]
    fn test_population_bounds_reported() {
        let config = GaConfig::fast().with_seed(2);
        let result = GeneticSolver::new(config.clone()).run(&p01()).unwrap();
        assert_eq!(result.population_bounds, config.population_bounds(10).unwrap());
    }

    #[test]
    fn test_stagnation_counts_only_repeats() {
        let mut tracker = Stagnation::default();
        for f in [5, 5, 3, 5] {
            tracker.observe(f);
        }
        // The drop to 3 is ignored: two repeats of the record 5.
        assert_eq!(tracker.best, Some(5));
        assert_eq!(tracker.same_rounds, 2);
        assert!(tracker.is_stagnant(2));
        assert!(!tracker.is_stagnant(3));
        assert!(!tracker.is_stagnant(0));

        tracker.observe(6);
        assert_eq!(tracker.same_rounds, 0);
        assert_eq!(tracker.best, Some(6));
    }

    #[test]
    fn test_stagnation_needs_positive_record() {
        let mut tracker = Stagnation::default();
        for _ in 0..10 {
            tracker.observe(0);
        }
        assert_eq!(tracker.same_rounds, 9);
        assert!(!tracker.is_stagnant(1));
    }

    #[test]
    fn test_larger_budget_improves_quality() {
        // Fixed batch of random instances, each solved with the same seeds
        // under a tiny and under the default budget.
        let mut rng = StdRng::seed_from_u64(2024);
        let instances: Vec<Instance> = (0..6)
            .map(|id| {
                let pairs: Vec<(u64, u64)> = (0..12)
                    .map(|_| (rng.random_range(1..50), rng.random_range(1..100)))
                    .collect();
                let capacity = pairs.iter().map(|&(w, _)| w).sum::<u64>() / 3;
                Instance::from_pairs(&pairs, capacity).unwrap().with_id(id)
            })
            .collect();
        let optima: Vec<u64> = instances
            .iter()
            .map(|inst| BruteForceSolver.solve(inst).unwrap().total_price)
            .collect();

        let measure = |base: GaConfig| {
            let mut feasible = 0usize;
            let mut total_error = 0.0;
            let mut runs = 0usize;
            for (inst, &opt) in instances.iter().zip(&optima) {
                for seed in 0..4 {
                    let solver = GeneticSolver::new(base.clone().with_seed(seed));
                    let price = match solver.solve(inst) {
                        Ok(sol) => {
                            feasible += 1;
                            sol.total_price
                        }
                        Err(_) => 0,
                    };
                    total_error += relative_error(opt, price);
                    runs += 1;
                }
            }
            (feasible as f64 / runs as f64, total_error / runs as f64)
        };

        let small = GaConfig::default()
            .with_max_population_base(2.0)
            .with_max_generations(5);
        let (small_rate, small_error) = measure(small);
        let (large_rate, large_error) = measure(GaConfig::default());

        assert!(
            large_rate >= small_rate,
            "feasible rate dropped: {large_rate} < {small_rate}"
        );
        assert!(
            large_error <= small_error,
            "mean relative error grew: {large_error} > {small_error}"
        );
    }

    #[test]
    fn test_best_of_prefers_first_on_ties() {
        let pop = vec![
            Specimen { genome: Genome::new(vec![false]), fitness: 3 },
            Specimen { genome: Genome::new(vec![true]), fitness: 3 },
        ];
        assert_eq!(best_of(&pop).unwrap().genome, Genome::new(vec![false]));
        assert!(best_of(&[]).is_none());
    }
}
