//! Deterministic random number generation.
//!
//! Every generator owns one `SocRng`, constructed once from an explicit
//! seed and consumed in a fixed draw order.
//!
//! # Reproducibility Guarantee
//!
//! Given the same seed, the sequence of draws is bitwise-identical across
//! runs and platforms. Each normal draw consumes exactly two uniforms.

use rand::prelude::*;
use rand_pcg::Pcg64;

/// Seeded PCG stream.
#[derive(Debug, Clone)]
pub struct SocRng {
    /// Seed the stream was constructed from.
    seed: u64,
    /// Number of uniform draws consumed so far.
    draws: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl SocRng {
    /// Create a new stream from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Seed this stream was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draws consumed so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen()
    }

    /// Generate a random f64 in `[low, high)`.
    ///
    /// A degenerate range (`low == high`) returns `low` but still consumes
    /// one draw so the stream position does not depend on the bounds.
    pub fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        debug_assert!(low <= high, "Invalid range: low > high");
        low + (high - low) * self.gen_f64()
    }

    /// Generate a standard normal sample using the Box-Muller transform.
    pub fn gen_standard_normal(&mut self) -> f64 {
        let u1 = self.gen_f64();
        let u2 = self.gen_f64();

        // Avoid log(0)
        let u1 = if u1 < f64::EPSILON { f64::EPSILON } else { u1 };

        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Generate a normal sample with given mean and std.
    pub fn gen_normal(&mut self, mean: f64, std: f64) -> f64 {
        mean + std * self.gen_standard_normal()
    }

    /// Draw `n` independent normals, in index order.
    #[must_use]
    pub fn normal_n(&mut self, n: usize, mean: f64, std: f64) -> Vec<f64> {
        (0..n).map(|_| self.gen_normal(mean, std)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Property: Same seed produces same sequence.
    #[test]
    fn test_reproducibility() {
        let mut rng1 = SocRng::new(42);
        let mut rng2 = SocRng::new(42);

        let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
        let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

        assert_eq!(seq1, seq2, "Same seed must produce identical sequences");
    }

    /// Property: Different seeds produce different sequences.
    #[test]
    fn test_different_seeds() {
        let mut rng1 = SocRng::new(42);
        let mut rng2 = SocRng::new(43);

        let seq1: Vec<f64> = (0..100).map(|_| rng1.gen_f64()).collect();
        let seq2: Vec<f64> = (0..100).map(|_| rng2.gen_f64()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = SocRng::new(42);
        for _ in 0..1000 {
            let v = rng.gen_range_f64(40.0, 75.0);
            assert!((40.0..75.0).contains(&v), "Value out of range: {v}");
        }
    }

    #[test]
    fn test_degenerate_range_consumes_draw() {
        let mut rng = SocRng::new(7);
        let v = rng.gen_range_f64(50.0, 50.0);
        assert!((v - 50.0).abs() < f64::EPSILON);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_normal_distribution() {
        let mut rng = SocRng::new(42);
        let n = 10000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gen_standard_normal()).collect();

        let mean: f64 = samples.iter().sum::<f64>() / n as f64;
        let variance: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        assert!(mean.abs() < 0.1, "Mean {mean} too far from 0");
        assert!(
            (variance - 1.0).abs() < 0.1,
            "Variance {variance} too far from 1"
        );
    }

    /// Each normal draw consumes exactly two uniforms.
    #[test]
    fn test_normal_consumes_two_uniforms() {
        let mut rng = SocRng::new(1);
        let _ = rng.normal_n(5, 0.0, 1.0);
        assert_eq!(rng.draws(), 10);
    }

    /// `normal_n` is the same stream as repeated `gen_normal`.
    #[test]
    fn test_normal_n_matches_sequential_draws() {
        let mut a = SocRng::new(99);
        let mut b = SocRng::new(99);
        let batch = a.normal_n(8, 0.02, 0.12);
        let single: Vec<f64> = (0..8).map(|_| b.gen_normal(0.02, 0.12)).collect();
        assert_eq!(batch, single);
    }

    /// With std=0 the mean must be returned exactly.
    #[test]
    fn test_gen_normal_mean_is_added() {
        let mut rng = SocRng::new(42);
        for _ in 0..10 {
            let v = rng.gen_normal(100.0, 0.0);
            assert!((v - 100.0).abs() < 1e-10, "got {v}");
        }
    }

    #[test]
    fn test_gen_normal_std_is_multiplied() {
        let mut rng = SocRng::new(42);
        let samples = rng.normal_n(10000, 0.0, 10.0);
        let mean: f64 = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance: f64 =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(
            (variance - 100.0).abs() < 15.0,
            "Variance {variance} not close to 100"
        );
    }

    #[test]
    fn test_standard_normal_finite() {
        let mut rng = SocRng::new(12345);
        for _ in 0..50000 {
            let v = rng.gen_standard_normal();
            assert!(v.is_finite(), "non-finite value: {v}");
        }
    }

    #[test]
    fn test_seed_accessor() {
        let rng = SocRng::new(43);
        assert_eq!(rng.seed(), 43);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_clone_continues_stream() {
        let mut rng = SocRng::new(11);
        let _ = rng.gen_standard_normal();
        let mut fork = rng.clone();
        assert_eq!(fork.draws(), 2);
        for _ in 0..50 {
            assert_eq!(rng.gen_f64().to_bits(), fork.gen_f64().to_bits());
        }
    }
}
