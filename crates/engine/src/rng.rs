//! Injectable randomness.
//!
//! Every random decision the engine makes goes through [`RandomSource`], so
//! a seeded generator (or a scripted stub) reproduces a run exactly.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The three kinds of draw the growth engine needs.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn below(&mut self, bound: u32) -> u32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn below(&mut self, bound: u32) -> u32 {
        self.gen_range(0..bound)
    }

    fn unit(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }

    fn index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// The default deterministic stream used by [`GrowthEngine::seeded`](crate::engine::GrowthEngine::seeded).
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
