//! Survivor selection: distinct elites plus brawl tournaments.
//!
//! The next generation is built from the current one in two phases:
//!
//! 1. **Elitism**: walk the population in descending fitness order and keep
//!    distinct genomes until `ceil(best_percent · min_size)` are kept.
//! 2. **Brawls**: repeatedly draw up to `brawl_size` specimens at random
//!    (without replacement) from what is left, rank the brawl by fitness, and
//!    admit its distinct members best first. Brawls continue until the new
//!    generation reaches `min_size` or the old one is exhausted.
//!
//! Specimens that lose a brawl or duplicate an admitted genome are dropped.
//!
//! # References
//!
//! - Miller & Goldberg (1995), "Genetic Algorithms, Tournament Selection, and
//!   the Effects of Noise"

use std::collections::HashSet;

use rand::Rng;

use super::types::{Genome, Specimen};

/// Parameters of one selection step.
#[derive(Debug, Clone, Copy)]
pub struct SelectionParams {
    /// Target size of the new generation.
    pub min_size: usize,
    /// Fraction of `min_size` reserved for elites.
    pub best_percent: f64,
    /// Tournament size.
    pub brawl_size: usize,
}

/// Builds the next generation from `population`, consuming it.
///
/// The result holds distinct genomes only and is never empty when
/// `population` is non-empty and `min_size >= 1`.
pub fn next_generation<R: Rng>(
    mut population: Vec<Specimen>,
    params: SelectionParams,
    rng: &mut R,
) -> Vec<Specimen> {
    sort_by_fitness(&mut population);

    let elite_target = (params.best_percent * params.min_size as f64).ceil() as usize;
    let mut seen: HashSet<Genome> = HashSet::with_capacity(params.min_size);
    let mut next = Vec::with_capacity(params.min_size);

    let mut ranked = population.into_iter();
    while next.len() < elite_target {
        match ranked.next() {
            Some(s) => admit(&mut next, &mut seen, s),
            None => break,
        }
    }

    let mut pool: Vec<Specimen> = ranked.collect();
    let brawl_size = params.brawl_size.max(1);
    let mut brawl = Vec::with_capacity(brawl_size);
    while next.len() < params.min_size && !pool.is_empty() {
        while brawl.len() < brawl_size && !pool.is_empty() {
            let idx = rng.random_range(0..pool.len());
            brawl.push(pool.swap_remove(idx));
        }
        sort_by_fitness(&mut brawl);
        for s in brawl.drain(..) {
            admit(&mut next, &mut seen, s);
        }
    }

    next
}

/// Stable sort, best (highest) fitness first.
pub fn sort_by_fitness(specimens: &mut [Specimen]) {
    specimens.sort_by(|a, b| b.fitness.cmp(&a.fitness));
}

fn admit(next: &mut Vec<Specimen>, seen: &mut HashSet<Genome>, specimen: Specimen) {
    if seen.insert(specimen.genome.clone()) {
        next.push(specimen);
    }
}
