use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};

use u_knapsack::bench::{read_instances, standard_suite_with, BenchConfig, Benchmark, RunOutcome};
use u_knapsack::ga::{GaConfig, GeneticSolver, StatsDirectory};
use u_knapsack::problem::Solver;

/// Runs the knapsack solver suite over an instance file and reports runtime
/// and relative error per solver.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Instance file, one `id n capacity w0 p0 w1 p1 ...` record per line.
    #[arg(value_name = "FILE")]
    input: PathBuf,
    /// Timed calls per solver and instance (solvers in the no-repeat set run once).
    #[arg(short, long)]
    repeats: Option<usize>,
    /// Solver whose prices are the baseline for relative errors.
    #[arg(long, value_name = "NAME")]
    reference: Option<String>,
    /// JSON file with a genetic solver configuration.
    #[arg(long, value_name = "FILE")]
    ga_config: Option<PathBuf>,
    /// Directory receiving per-generation genetic solver statistics.
    #[arg(long, value_name = "DIR")]
    stats_dir: Option<PathBuf>,
    /// Seed for the genetic solver.
    #[arg(long)]
    seed: Option<u64>,
    /// Skip brute force and branch-and-bound above this many items.
    #[arg(long, value_name = "N")]
    max_brute_items: Option<usize>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    env_logger::Builder::new().filter_level(args.log_level).init();

    let mut ga = match &args.ga_config {
        None => GaConfig::default(),
        Some(path) => {
            let reader = BufReader::new(
                File::open(path).with_context(|| format!("could not open {}", path.display()))?,
            );
            serde_json::from_reader(reader).context("incorrect GA config file format")?
        }
    };
    if let Some(seed) = args.seed {
        ga = ga.with_seed(seed);
    }
    ga.validate()?;
    info!("GA config: {ga:?}");

    let mut config = BenchConfig::default();
    if let Some(repeats) = args.repeats {
        config = config.with_repeats(repeats);
    }
    if let Some(reference) = &args.reference {
        config = config.with_reference(reference.clone());
    }
    if let Some(limit) = args.max_brute_items {
        config = config.with_size_limit("brute", limit).with_size_limit("bnb", limit);
    }

    let suite = build_suite(ga, args.stats_dir.as_ref())?;
    let bench = Benchmark::new(config, suite)?;

    let reader = BufReader::new(
        File::open(&args.input)
            .with_context(|| format!("could not open {}", args.input.display()))?,
    );
    let instances = read_instances(reader)?;
    if instances.is_empty() {
        warn!("no instances in {}", args.input.display());
    }
    info!("loaded {} instances from {}", instances.len(), args.input.display());

    let report = bench.run_with(&instances, |record| {
        println!("instance {} ({} items)", record.id, record.item_count);
        for run in &record.runs {
            match &run.outcome {
                RunOutcome::Solved(sol) => println!(
                    "  {:<12} price {:>8} weight {:>8} {:>10.6} s  {}",
                    run.solver,
                    sol.total_price,
                    sol.total_weight,
                    run.mean_time.as_secs_f64(),
                    sol.selection.iter().map(|&b| if b { '1' } else { '0' }).collect::<String>()
                ),
                RunOutcome::Failed(msg) => println!("  {:<12} failed: {msg}", run.solver),
                RunOutcome::Skipped => println!("  {:<12} skipped", run.solver),
            }
        }
    });

    println!();
    print!("{report}");
    Ok(())
}

fn build_suite(ga: GaConfig, stats_dir: Option<&PathBuf>) -> Result<Vec<Box<dyn Solver>>> {
    let mut genetic = GeneticSolver::new(ga);
    if let Some(dir) = stats_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create stats directory {}", dir.display()))?;
        genetic = genetic.with_stats_sink(Arc::new(StatsDirectory::new(dir)));
    }
    Ok(standard_suite_with(genetic))
}
