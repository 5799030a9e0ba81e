//! Weighted token sampling.
//!
//! `TrigramModel::generate_with` takes any [`TokenSampler`], so tests can
//! pin the random source while normal generation stays unseeded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks one index from a set of non-negative weights.
pub trait TokenSampler {
    /// Choose an index into `weights`. `weights` is non-empty and sums to a
    /// positive value.
    fn choose(&mut self, weights: &[f64]) -> usize;
}

impl<S: TokenSampler + ?Sized> TokenSampler for &mut S {
    fn choose(&mut self, weights: &[f64]) -> usize {
        (**self).choose(weights)
    }
}

/// Random weighted sampling over a `rand` generator.
///
/// Draws `u * total` with `u` uniform in [0, 1) and returns the first index
/// whose cumulative weight exceeds it.
#[derive(Clone, Debug)]
pub struct RandomSampler<R> {
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSampler<StdRng> {
    /// Deterministic sampler: the same seed always yields the same choices.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> TokenSampler for RandomSampler<R> {
    fn choose(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let r = self.rng.gen::<f64>() * total;
        let mut cumsum = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            cumsum += w;
            if r < cumsum {
                return i;
            }
        }
        // Rounding can leave r at the very top of the range
        weights.len().saturating_sub(1)
    }
}

/// Always picks the heaviest option (the first one on ties).
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedySampler;

impl TokenSampler for GreedySampler {
    fn choose(&mut self, weights: &[f64]) -> usize {
        let mut best = 0;
        for (i, &w) in weights.iter().enumerate().skip(1) {
            if w > weights[best] {
                best = i;
            }
        }
        best
    }
}
