//! Random-number utilities shared by the samplers.
//!
//! A thin wrapper around `rand`'s `StdRng` that draws sets of distinct
//! indices. Every estimation call owns its generator, so there is no
//! process-wide random state.

use rand::prelude::*;
use rand::seq::index;

/// Uniform index generator drawing samples without replacement.
///
/// By default this uses an entropy-seeded RNG, but callers can construct it
/// from a fixed seed for reproducible runs.
pub struct UniformRandomGenerator {
    rng: StdRng,
}

impl Default for UniformRandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandomGenerator {
    /// Construct with a random seed (suitable for production use).
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Construct with a fixed seed (useful for tests).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is set, entropy-seeded otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }

    /// Draw a single index in `[lower, upper)`.
    pub fn next_index(&mut self, lower: usize, upper: usize) -> usize {
        self.rng.gen_range(lower..upper)
    }

    /// Fill `out` with distinct indices drawn uniformly from `[lower, upper)`.
    ///
    /// Small samples use rejection sampling: draw, keep only if not already
    /// chosen. Samples covering more than half of the range go through
    /// [`rand::seq::index::sample`] instead.
    pub fn gen_unique(&mut self, out: &mut [usize], lower: usize, upper: usize) {
        let amount = out.len();
        if amount == 0 {
            return;
        }
        debug_assert!(
            upper >= lower && upper - lower >= amount,
            "cannot draw {amount} distinct indices from [{lower}, {upper})"
        );

        let range = upper - lower;
        if amount * 2 > range {
            let picked = index::sample(&mut self.rng, range, amount);
            for (dst, idx) in out.iter_mut().zip(picked.iter()) {
                *dst = lower + idx;
            }
            return;
        }

        for i in 0..amount {
            loop {
                let candidate = self.next_index(lower, upper);
                if out[..i].iter().all(|&v| v != candidate) {
                    out[i] = candidate;
                    break;
                }
            }
        }
    }
}
