//! The injectable randomness seam.
//!
//! Production code uses [`SystemRandom`]; tests implement [`RandomSource`]
//! with scripted values so every randomization is reproducible.

use rand::Rng;

/// A source of uniformly distributed random draws.
pub trait RandomSource {
    /// A uniform `f64` in `[lo, hi]` inclusive.
    fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64;

    /// A uniform `i64` in `[lo, hi]` inclusive.
    fn uniform_i64(&mut self, lo: i64, hi: i64) -> i64;
}

/// The thread-local system RNG.
pub struct SystemRandom(rand::rngs::ThreadRng);

impl SystemRandom {
    pub fn new() -> Self {
        Self(rand::thread_rng())
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    fn uniform_i64(&mut self, lo: i64, hi: i64) -> i64 {
        if lo >= hi {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }
}
