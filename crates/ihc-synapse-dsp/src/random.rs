// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Injectable pseudorandom source for the synapse model.

Every stochastic stage (fGn synthesis, release-site initialization, redocking and
refractory draws) takes a `&mut impl RandomSource`. Callers own the generator, so two
simulations never share hidden state and a fixed seed makes a run reproducible.
*/

use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Source of uniform and standard-normal draws
pub trait RandomSource {
    /// Uniform draw on the open interval (0, 1), so `ln(u)` is always finite
    fn uniform01(&mut self) -> f64;

    /// Standard normal draw (mean 0, variance 1)
    fn standard_normal(&mut self) -> f64;

    /// Restart the sequence from `seed`
    fn reseed(&mut self, seed: u64);

    /// Vector of `n` standard normal draws
    fn standard_normal_vec(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.standard_normal()).collect()
    }
}

/// Production random source backed by `StdRng`
#[derive(Debug, Clone)]
pub struct SynapseRng {
    seed: u64,
    rng: StdRng,
}

impl SynapseRng {
    /// Create a generator starting at `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed of the current sequence
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SynapseRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for SynapseRng {
    #[inline]
    fn uniform01(&mut self) -> f64 {
        self.rng.sample(Open01)
    }

    #[inline]
    fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SynapseRng::new(7);
        let mut b = SynapseRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.uniform01(), b.uniform01());
            assert_eq!(a.standard_normal(), b.standard_normal());
        }
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let mut rng = SynapseRng::new(3);
        let first: Vec<f64> = (0..10).map(|_| rng.uniform01()).collect();
        rng.reseed(3);
        let again: Vec<f64> = (0..10).map(|_| rng.uniform01()).collect();
        assert_eq!(first, again);
        assert_eq!(rng.seed(), 3);
    }

    #[test]
    fn test_uniform_open_interval() {
        let mut rng = SynapseRng::default();
        for _ in 0..10_000 {
            let u = rng.uniform01();
            assert!(u > 0.0 && u < 1.0);
            assert!(u.ln().is_finite());
        }
    }

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = SynapseRng::new(11);
        let draws = rng.standard_normal_vec(20_000);
        assert_eq!(draws.len(), 20_000);
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.05, "mean = {}", mean);
        assert!((var - 1.0).abs() < 0.05, "variance = {}", var);
    }
}
