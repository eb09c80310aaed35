//! Bit-string genetic operators.
//!
//! # Operators
//!
//! - [`random_genome`]: uniform random initialization
//! - [`single_point_crossover`]: splice two parents at one random point
//! - [`flip_mutation`]: flip one random bit with a given probability
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

use rand::Rng;

use super::types::Genome;

/// Genome of `len` independent, uniformly drawn bits.
pub fn random_genome<R: Rng>(len: usize, rng: &mut R) -> Genome {
    Genome::new((0..len).map(|_| rng.random_bool(0.5)).collect())
}

/// Single-point crossover.
///
/// Picks a point `k` in `0..n`; the first child takes `father[..k]` and
/// `mother[k..]`, the second child the complement.
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn single_point_crossover<R: Rng>(
    father: &Genome,
    mother: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let n = father.len();
    assert_eq!(n, mother.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    let point = rng.random_range(0..n);
    splice(father, mother, point)
}

fn splice(father: &Genome, mother: &Genome, point: usize) -> (Genome, Genome) {
    let (f, m) = (father.bits(), mother.bits());
    let mut son = Vec::with_capacity(f.len());
    son.extend_from_slice(&f[..point]);
    son.extend_from_slice(&m[point..]);
    let mut daughter = Vec::with_capacity(f.len());
    daughter.extend_from_slice(&m[..point]);
    daughter.extend_from_slice(&f[point..]);
    (Genome::new(son), Genome::new(daughter))
}

/// With probability `probability`, flips one uniformly chosen bit.
///
/// Returns whether a bit was flipped. Empty genomes are never mutated.
///
/// # Panics
/// Panics if `probability` is outside `[0, 1]`.
pub fn flip_mutation<R: Rng>(genome: &mut Genome, probability: f64, rng: &mut R) -> bool {
    if genome.is_empty() || !rng.random_bool(probability) {
        return false;
    }
    let idx = rng.random_range(0..genome.len());
    genome.flip(idx);
    true
}
