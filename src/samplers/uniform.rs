//! Uniform random sampler drawing minimal samples without replacement.

use crate::core::Sampler;
use crate::utils::UniformRandomGenerator;

/// Uniform random sampler drawing minimal samples without replacement.
pub struct UniformRandomSampler {
    rng: UniformRandomGenerator,
}

impl Default for UniformRandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRandomSampler {
    /// Construct a new sampler with a random seed.
    pub fn new() -> Self {
        Self::with_generator(UniformRandomGenerator::new())
    }

    /// Construct a sampler from a fixed seed (primarily for tests).
    pub fn from_seed(seed: u64) -> Self {
        Self::with_generator(UniformRandomGenerator::from_seed(seed))
    }

    pub fn with_generator(rng: UniformRandomGenerator) -> Self {
        Self { rng }
    }
}

impl Sampler for UniformRandomSampler {
    fn sample(&mut self, point_count: usize, sample_size: usize, out_indices: &mut [usize]) -> bool {
        if sample_size > point_count || out_indices.len() < sample_size {
            return false;
        }

        self.rng
            .gen_unique(&mut out_indices[..sample_size], 0, point_count);
        true
    }
}
