//! Genome encoding and fitness.
//!
//! A [`Genome`] holds one inclusion bit per item; a [`Specimen`] pairs it
//! with its cached fitness.

use std::fmt;

use crate::problem::Instance;

/// Fitness of a specimen that has not been evaluated yet.
pub const UNEVALUATED: i64 = i64::MIN;

/// Inclusion/exclusion bit sequence, one bit per item in index order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome(Vec<bool>);

impl Genome {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inverts the bit at `index`.
    pub fn flip(&mut self, index: usize) {
        self.0[index] = !self.0[index];
    }

    pub fn into_bits(self) -> Vec<bool> {
        self.0
    }

    /// Total `(weight, price, selected count)` of the encoded subset.
    pub fn totals(&self, instance: &Instance) -> (u64, u64, usize) {
        self.0
            .iter()
            .zip(instance.items())
            .filter(|(&bit, _)| bit)
            .fold((0, 0, 0), |(w, p, c), (_, it)| (w + it.weight, p + it.price, c + 1))
    }

    /// Whether the encoded subset fits the instance capacity.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        self.totals(instance).0 <= instance.capacity()
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A genome together with its cached fitness.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Specimen {
    pub genome: Genome,
    pub fitness: i64,
}

impl Specimen {
    /// Wraps a genome whose fitness is still to be computed.
    pub fn unevaluated(genome: Genome) -> Self {
        Self {
            genome,
            fitness: UNEVALUATED,
        }
    }

    /// Wraps a genome and evaluates it against `instance`.
    pub fn evaluated(genome: Genome, instance: &Instance) -> Self {
        let fitness = fitness(&genome, instance);
        Self { genome, fitness }
    }
}

/// Fitness of a genome.
///
/// - Feasible: total selected price (`>= 0`).
/// - Infeasible: minus the number of selected items (`< 0`), so every
///   infeasible genome ranks below every feasible one, and less overloaded
///   genomes rank above more overloaded ones.
pub fn fitness(genome: &Genome, instance: &Instance) -> i64 {
    let (weight, price, count) = genome.totals(instance);
    if weight <= instance.capacity() {
        i64::try_from(price).unwrap_or(i64::MAX)
    } else {
        -(count as i64)
    }
}
