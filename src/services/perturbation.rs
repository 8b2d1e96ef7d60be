//! Randomness used to vary the numbers on recommendation cards.
//!
//! Production code draws from a seeded `StdRng`; tests inject fixed sources.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of bounded random draws.
pub trait PerturbationSource: Send {
    /// Uniform integer in `[min, max]` inclusive. Requires `min <= max`.
    fn uniform_u32(&mut self, min: u32, max: u32) -> u32;

    /// Uniform float in `[min, max]` inclusive. Requires `min <= max`.
    fn uniform_f64(&mut self, min: f64, max: f64) -> f64;
}

/// `StdRng`-backed source, reproducible when given a seed
#[derive(Debug, Clone)]
pub struct SeededPerturbation {
    rng: StdRng,
}

impl SeededPerturbation {
    /// Seeds from `seed`, or from the thread RNG when none is configured
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }
}

impl PerturbationSource for SeededPerturbation {
    fn uniform_u32(&mut self, min: u32, max: u32) -> u32 {
        self.rng.random_range(min..=max)
    }

    fn uniform_f64(&mut self, min: f64, max: f64) -> f64 {
        self.rng.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = SeededPerturbation::new(Some(42));
        let mut b = SeededPerturbation::new(Some(42));
        for _ in 0..16 {
            assert_eq!(a.uniform_u32(0, 1000), b.uniform_u32(0, 1000));
            assert_eq!(a.uniform_f64(1.0, 10.0), b.uniform_f64(1.0, 10.0));
        }
    }

    #[test]
    fn test_draws_stay_in_bounds() {
        let mut source = SeededPerturbation::new(None);
        for _ in 0..256 {
            let n = source.uniform_u32(90, 120);
            assert!((90..=120).contains(&n));
            let x = source.uniform_f64(6.0, 8.5);
            assert!((6.0..=8.5).contains(&x));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut source = SeededPerturbation::new(Some(7));
        assert_eq!(source.uniform_u32(100, 100), 100);
        assert_eq!(source.uniform_f64(7.5, 7.5), 7.5);
    }
}
