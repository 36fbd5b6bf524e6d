//! Randomness for invasion trials. The estimator never touches process-global
//! random state: every caller hands in a [TrialRng].
//!
//! [Rng] is SplitMix64: fast, deterministic for a given seed, not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Source of uniform 64-bit values consumed by the trial loop.
pub trait TrialRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform value in `[0, 1)` built from the top 53 bits.
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Two independent standard normal draws (Box–Muller).
    /// Always consumes exactly two values from the underlying stream.
    fn standard_normal_pair(&mut self) -> (f64, f64) {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = std::f64::consts::TAU * u2;
        (radius * theta.cos(), radius * theta.sin())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed for an independent stream derived from a base seed and a stream index.
    /// Used to give every parallel chunk its own reproducible sequence.
    pub fn stream_seed(seed: u64, stream: u64) -> u64 {
        let mut mixer = Rng::new(seed ^ stream.wrapping_mul(SPLITMIX64_M2));
        mixer.next_u64()
    }
}

impl TrialRng for Rng {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = Rng::new(99);
        for _ in 0..10_000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn normal_pairs_are_finite_and_roughly_centered() {
        let mut rng = Rng::new(3);
        let mut sum = 0.0;
        let n = 20_000;
        for _ in 0..n {
            let (a, b) = rng.standard_normal_pair();
            assert!(a.is_finite() && b.is_finite());
            sum += a + b;
        }
        let mean = sum / (2 * n) as f64;
        assert!(mean.abs() < 0.05, "mean drifted: {mean}");
    }

    #[test]
    fn stream_seeds_differ_per_stream() {
        assert_ne!(Rng::stream_seed(7, 0), Rng::stream_seed(7, 1));
        assert_eq!(Rng::stream_seed(7, 3), Rng::stream_seed(7, 3));
    }
}
