//! PROSAC sampler: progressively grows the subset of high-priority points.
//!
//! Indices produced here live in rank space: index 0 is the point with the
//! highest quality score. Translating back to dataset indices is up to the
//! caller.

use log::trace;

use crate::core::Sampler;
use crate::settings::DEFAULT_PROSAC_CONVERGENCE_TRIALS;
use crate::utils::UniformRandomGenerator;

/// PROSAC sampler drawing from a pool of top-ranked points that grows on a
/// fixed schedule.
pub struct ProsacSampler {
    rng: UniformRandomGenerator,
    /// `T_N`: trials after which the pool would span all points.
    convergence_trials: usize,
    sample_size: Option<usize>,
    point_count: usize,
    /// `n`: number of top-ranked points currently in the pool.
    subset_size: usize,
    /// `T_n`: expected trials before the pool grows again.
    growth: f64,
    /// `T'_n`: trial count at which the pool grows next.
    growth_threshold: f64,
    /// `t`: trials drawn so far.
    trial: usize,
}

impl Default for ProsacSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProsacSampler {
    pub fn new() -> Self {
        Self::with_generator(UniformRandomGenerator::new(), DEFAULT_PROSAC_CONVERGENCE_TRIALS)
    }

    /// Construct from a fixed RNG seed (useful for tests).
    pub fn from_seed(seed: u64, convergence_trials: usize) -> Self {
        Self::with_generator(UniformRandomGenerator::from_seed(seed), convergence_trials)
    }

    pub fn with_generator(rng: UniformRandomGenerator, convergence_trials: usize) -> Self {
        Self {
            rng,
            convergence_trials,
            sample_size: None,
            point_count: 0,
            subset_size: 0,
            growth: 0.0,
            growth_threshold: 1.0,
            trial: 0,
        }
    }

    /// Current pool size `n`.
    pub fn subset_size(&self) -> usize {
        self.subset_size
    }

    /// Number of samples drawn since initialization.
    pub fn trials(&self) -> usize {
        self.trial
    }

    /// Reset the growth schedule for `point_count` ranked points and minimal
    /// samples of `sample_size`. Requires `sample_size <= point_count`.
    pub fn initialize(&mut self, point_count: usize, sample_size: usize) {
        self.point_count = point_count;
        self.sample_size = Some(sample_size);
        self.subset_size = sample_size;

        let mut t_n = self.convergence_trials as f64;
        for i in 0..sample_size {
            t_n *= (sample_size - i) as f64 / (point_count - i) as f64;
        }
        self.growth = t_n;
        self.growth_threshold = 1.0;
        self.trial = 0;
    }

    fn increment_trial(&mut self, sample_size: usize) {
        self.trial += 1;

        if self.trial as f64 >= self.growth_threshold && self.subset_size < self.point_count {
            self.subset_size += 1;

            let n = self.subset_size as f64;
            let previous = self.growth;
            self.growth *= (n + 1.0) / (n + 1.0 - sample_size as f64);
            self.growth_threshold += (self.growth - previous).ceil();

            trace!(
                "PROSAC pool grew to {} of {} points at trial {} (next growth at {})",
                self.subset_size, self.point_count, self.trial, self.growth_threshold
            );
        }
    }
}

impl Sampler for ProsacSampler {
    fn sample(&mut self, point_count: usize, sample_size: usize, out_indices: &mut [usize]) -> bool {
        if sample_size > point_count || out_indices.len() < sample_size {
            return false;
        }

        if self.sample_size != Some(sample_size) || self.point_count != point_count {
            self.initialize(point_count, sample_size);
        }

        self.increment_trial(sample_size);

        let out = &mut out_indices[..sample_size];
        let n = self.subset_size;
        if sample_size > 0 && self.trial as f64 > self.growth_threshold {
            // The schedule ran past the last growth step: the newest pool
            // member is always part of the sample.
            out[0] = n - 1;
            self.rng.gen_unique(&mut out[1..], 0, n - 1);
        } else if n > sample_size {
            // The newest pool member waits until the schedule forces it in.
            self.rng.gen_unique(out, 0, n - 1);
        } else {
            // Only when every point is needed (`n == m == N`).
            self.rng.gen_unique(out, 0, n);
        }
        true
    }
}
