//! Random number generator construction.
//!
//! Every component that needs randomness takes an explicit generator.
//! Workers of a parallel run each own one, seeded from a master stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, drawing a fresh one if absent.
pub fn rng_from_option(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Draws `count` independent seeds from `master`.
pub fn derive_seeds<R: Rng>(master: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| master.random()).collect()
}
