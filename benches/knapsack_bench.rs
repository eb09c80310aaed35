//! Criterion benchmarks for the knapsack solvers.
//!
//! Uses seeded random instances with correlated weights and prices so the
//! exact and approximate solvers do comparable amounts of work.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_knapsack::bnb::BranchAndBoundSolver;
use u_knapsack::brute::BruteForceSolver;
use u_knapsack::fptas::{FptasConfig, FptasSolver};
use u_knapsack::ga::{GaConfig, GeneticSolver};
use u_knapsack::greedy::GreedySolver;
use u_knapsack::problem::{Instance, Solver};

// ===========================================================================
// Instance generation
// ===========================================================================

fn random_instance(n: usize, seed: u64) -> Instance {
    let mut rng = StdRng::seed_from_u64(seed);
    let pairs: Vec<(u64, u64)> = (0..n)
        .map(|_| {
            let w = rng.random_range(1..100);
            (w, w + rng.random_range(0..20))
        })
        .collect();
    let capacity = pairs.iter().map(|&(w, _)| w).sum::<u64>() / 2;
    Instance::from_pairs(&pairs, capacity).expect("generated instance is valid")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    group.sample_size(10);

    for &n in &[10usize, 15, 20] {
        let inst = random_instance(n, 42);
        let solvers: Vec<Box<dyn Solver>> = vec![
            Box::new(BruteForceSolver),
            Box::new(BranchAndBoundSolver),
            Box::new(FptasSolver::exact()),
        ];
        for solver in solvers {
            group.bench_with_input(BenchmarkId::new(solver.name().to_string(), n), &inst, |b, inst| {
                b.iter(|| black_box(solver.solve(black_box(inst))))
            });
        }
    }
    group.finish();
}

fn bench_fptas_tolerance(c: &mut Criterion) {
    let mut group = c.benchmark_group("fptas");
    group.sample_size(10);

    let inst = random_instance(100, 7);
    for &tol in &[0.0, 0.005, 0.01, 0.1, 0.5] {
        let solver = FptasSolver::new(FptasConfig::new(tol));
        group.bench_with_input(BenchmarkId::from_parameter(tol), &inst, |b, inst| {
            b.iter(|| black_box(solver.solve(black_box(inst))))
        });
    }
    group.finish();
}

fn bench_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristics");
    group.sample_size(10);

    for &n in &[40usize, 100] {
        let inst = random_instance(n, 11);
        group.bench_with_input(BenchmarkId::new("greedy", n), &inst, |b, inst| {
            b.iter(|| black_box(GreedySolver.solve(black_box(inst))))
        });

        let genetic = GeneticSolver::new(GaConfig::fast().with_seed(42).with_max_generations(100));
        group.bench_with_input(BenchmarkId::new("genetic", n), &inst, |b, inst| {
            b.iter(|| black_box(genetic.solve(black_box(inst))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_exact, bench_fptas_tolerance, bench_heuristics);
criterion_main!(benches);
