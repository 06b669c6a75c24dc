//! OS-backed secure random source.
//!
//! `OsRng` draws from the operating system's entropy source and
//! implements `CryptoRng`, which is what makes the selector's draws
//! unpredictable to any external observer. A seedable general-purpose
//! PRNG must never be substituted here.

use rand::rngs::OsRng;
use rand::Rng;

use crate::domain::roll::RandomSource;

/// `RandomSource` over the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl OsRandomSource {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for OsRandomSource {
    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn below(&self, bound: u32) -> u32 {
        OsRng.gen_range(0..bound)
    }
}
