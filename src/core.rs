//! Core consensus traits and the RANSAC / PROSAC estimator.
//!
//! - [`Estimator`] ties a data type to a model type: minimal sample size,
//!   model construction, and per-point residual.
//! - [`Sampler`] draws minimal samples of distinct indices.
//! - [`RobustEstimator`] runs the sampling loop in either mode and keeps the
//!   model with the largest inlier set.

use std::cmp::Reverse;
use std::marker::PhantomData;

use log::{debug, trace};
use ordered_float::OrderedFloat;

use crate::error::EstimationError;
use crate::samplers::{ProsacSampler, UniformRandomSampler};
use crate::settings::{ConsensusSettings, IterationLimit};
use crate::termination::{RansacTerminationCriterion, iteration_bound};
use crate::utils::UniformRandomGenerator;

/// Validity flag carried by every model.
///
/// A model built from a degenerate sample (e.g. coincident points for a
/// line) reports `false`; such models are skipped without being scored.
pub trait ModelValidity {
    fn is_valid(&self) -> bool;
}

/// Estimator responsible for generating model hypotheses from minimal samples.
pub trait Estimator {
    /// Data point type.
    type Datum: Clone;
    /// Model type produced by this estimator.
    type Model: ModelValidity;

    /// Size of a minimal sample for this estimator.
    fn sample_size(&self) -> usize;

    /// Build a model from exactly `sample_size()` data points.
    fn estimate_model(&self, sample: &[Self::Datum]) -> Self::Model;

    /// Non-negative error of `datum` with respect to a valid `model`.
    fn residual(&self, datum: &Self::Datum, model: &Self::Model) -> f64;
}

/// [`Estimator`] assembled from a model factory closure and a residual closure.
pub struct FnEstimator<D, M, F, R> {
    sample_size: usize,
    factory: F,
    residual: R,
    _marker: PhantomData<fn(&D) -> M>,
}

impl<D, M, F, R> FnEstimator<D, M, F, R>
where
    F: Fn(&[D]) -> M,
    R: Fn(&D, &M) -> f64,
{
    pub fn new(sample_size: usize, factory: F, residual: R) -> Self {
        Self {
            sample_size,
            factory,
            residual,
            _marker: PhantomData,
        }
    }
}

impl<D, M, F, R> Estimator for FnEstimator<D, M, F, R>
where
    D: Clone,
    M: ModelValidity,
    F: Fn(&[D]) -> M,
    R: Fn(&D, &M) -> f64,
{
    type Datum = D;
    type Model = M;

    fn sample_size(&self) -> usize {
        self.sample_size
    }

    fn estimate_model(&self, sample: &[D]) -> M {
        (self.factory)(sample)
    }

    fn residual(&self, datum: &D, model: &M) -> f64 {
        (self.residual)(datum, model)
    }
}

/// Sampler responsible for drawing minimal samples of distinct indices.
pub trait Sampler {
    /// Draw `sample_size` distinct indices below `point_count` into
    /// `out_indices`.
    ///
    /// Returns `false` if a valid sample could not be drawn.
    fn sample(&mut self, point_count: usize, sample_size: usize, out_indices: &mut [usize]) -> bool;
}

/// Outcome of the model search.
#[derive(Debug, Clone, PartialEq)]
pub enum Consensus<M> {
    /// No valid model gathered any inliers.
    NoModel,
    Found(M),
}

impl<M> Consensus<M> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn model(&self) -> Option<&M> {
        match self {
            Self::Found(model) => Some(model),
            Self::NoModel => None,
        }
    }

    pub fn into_option(self) -> Option<M> {
        match self {
            Self::Found(model) => Some(model),
            Self::NoModel => None,
        }
    }
}

impl<M> From<Option<M>> for Consensus<M> {
    fn from(model: Option<M>) -> Self {
        model.map_or(Self::NoModel, Self::Found)
    }
}

/// Result of a RANSAC or PROSAC run.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult<M> {
    /// The model with the largest inlier set.
    pub model: Consensus<M>,
    /// Ascending dataset indices of the inliers; empty for [`Consensus::NoModel`].
    pub inliers: Vec<usize>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Size of the dataset the run was given.
    pub point_count: usize,
}

impl<M> EstimationResult<M> {
    /// Fraction of the dataset explained by the model.
    pub fn inlier_ratio(&self) -> f64 {
        if self.point_count == 0 {
            return 0.0;
        }
        self.inliers.len() as f64 / self.point_count as f64
    }
}

/// Best model seen so far together with its inlier set.
///
/// Only a strictly larger inlier set replaces the current best; ties keep
/// the earlier model.
#[derive(Debug, Clone)]
pub struct BestState<M> {
    model: Option<M>,
    inliers: Vec<usize>,
}

impl<M> Default for BestState<M> {
    fn default() -> Self {
        Self {
            model: None,
            inliers: Vec::new(),
        }
    }
}

impl<M> BestState<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inlier_count(&self) -> usize {
        self.inliers.len()
    }

    pub fn inliers(&self) -> &[usize] {
        &self.inliers
    }

    /// Offer a candidate; returns `true` if it became the new best.
    pub fn offer(&mut self, model: M, inliers: &[usize]) -> bool {
        if inliers.len() <= self.inliers.len() {
            return false;
        }
        self.model = Some(model);
        self.inliers.clear();
        self.inliers.extend_from_slice(inliers);
        true
    }

    pub fn into_parts(self) -> (Consensus<M>, Vec<usize>) {
        match self.model {
            Some(model) => (Consensus::Found(model), self.inliers),
            None => (Consensus::NoModel, Vec::new()),
        }
    }
}

/// Dataset seen through an optional rank permutation.
struct RankedData<'a, D> {
    data: &'a [D],
    ranking: Option<&'a [usize]>,
}

impl<'a, D> RankedData<'a, D> {
    fn get(&self, index: usize) -> &'a D {
        match self.ranking {
            Some(ranking) => &self.data[ranking[index]],
            None => &self.data[index],
        }
    }
}

/// Generic RANSAC / PROSAC estimator over an [`Estimator`].
///
/// Each call owns its random generator; a shared estimator can be used from
/// several threads at once.
#[derive(Debug, Clone)]
pub struct RobustEstimator<E> {
    pub estimator: E,
    pub settings: ConsensusSettings,
}

impl<D, M, F, R> RobustEstimator<FnEstimator<D, M, F, R>>
where
    D: Clone,
    M: ModelValidity,
    F: Fn(&[D]) -> M,
    R: Fn(&D, &M) -> f64,
{
    /// Build an estimator from a model factory and a residual function.
    pub fn from_fns(sample_size: usize, factory: F, residual: R) -> Self {
        Self::new(FnEstimator::new(sample_size, factory, residual))
    }
}

impl<E: Estimator> RobustEstimator<E> {
    pub fn new(estimator: E) -> Self {
        Self::with_settings(estimator, ConsensusSettings::default())
    }

    pub fn with_settings(estimator: E, settings: ConsensusSettings) -> Self {
        Self {
            estimator,
            settings,
        }
    }

    /// Use a fixed seed so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }

    /// RANSAC with an explicit iteration count.
    ///
    /// The budget still shrinks as better models appear, using the
    /// configured confidence.
    pub fn solve_ransac(
        &self,
        data: &[E::Datum],
        max_error: f64,
        iterations: usize,
    ) -> Result<EstimationResult<E::Model>, EstimationError> {
        self.ransac(data, max_error, IterationLimit::Fixed(iterations))
    }

    /// RANSAC with the budget derived from an expected outlier ratio.
    pub fn solve_ransac_adaptive(
        &self,
        data: &[E::Datum],
        max_error: f64,
        expected_outlier_ratio: f64,
        probability: f64,
    ) -> Result<EstimationResult<E::Model>, EstimationError> {
        self.ransac(
            data,
            max_error,
            IterationLimit::Adaptive {
                expected_outlier_ratio,
                probability,
            },
        )
    }

    /// PROSAC with an explicit iteration count.
    pub fn solve_prosac(
        &self,
        data: &[E::Datum],
        qualities: &[f64],
        max_error: f64,
        iterations: usize,
    ) -> Result<EstimationResult<E::Model>, EstimationError> {
        self.prosac(data, qualities, max_error, IterationLimit::Fixed(iterations))
    }

    /// PROSAC with the budget derived from an expected outlier ratio.
    pub fn solve_prosac_adaptive(
        &self,
        data: &[E::Datum],
        qualities: &[f64],
        max_error: f64,
        expected_outlier_ratio: f64,
        probability: f64,
    ) -> Result<EstimationResult<E::Model>, EstimationError> {
        self.prosac(
            data,
            qualities,
            max_error,
            IterationLimit::Adaptive {
                expected_outlier_ratio,
                probability,
            },
        )
    }

    /// Run RANSAC: uniform minimal samples over the whole dataset.
    pub fn ransac(
        &self,
        data: &[E::Datum],
        max_error: f64,
        limit: IterationLimit,
    ) -> Result<EstimationResult<E::Model>, EstimationError> {
        self.check_sample_count(data.len())?;

        let (iterations, probability) = self.resolve_limit(limit);
        let mut sampler = UniformRandomSampler::with_generator(self.generator());
        let view = RankedData {
            data,
            ranking: None,
        };

        let (best, performed) = self.search(&view, &mut sampler, max_error, iterations, probability);
        let (model, inliers) = best.into_parts();

        debug!(
            "RANSAC finished after {performed} iterations with {} of {} inliers",
            inliers.len(),
            data.len()
        );

        Ok(EstimationResult {
            model,
            inliers,
            iterations: performed,
            point_count: data.len(),
        })
    }

    /// Run PROSAC: samples start from the highest-quality points and the
    /// pool widens over time.
    pub fn prosac(
        &self,
        data: &[E::Datum],
        qualities: &[f64],
        max_error: f64,
        limit: IterationLimit,
    ) -> Result<EstimationResult<E::Model>, EstimationError> {
        self.check_sample_count(data.len())?;
        if qualities.len() != data.len() {
            return Err(EstimationError::QualityLengthMismatch {
                expected: data.len(),
                provided: qualities.len(),
            });
        }

        // Stable sort: equal qualities keep their dataset order.
        let mut ranking: Vec<usize> = (0..data.len()).collect();
        ranking.sort_by_key(|&i| Reverse(OrderedFloat(qualities[i])));

        let (iterations, probability) = self.resolve_limit(limit);
        let mut sampler = ProsacSampler::with_generator(
            self.generator(),
            self.settings.prosac_convergence_trials,
        );
        let view = RankedData {
            data,
            ranking: Some(&ranking),
        };

        let (best, performed) = self.search(&view, &mut sampler, max_error, iterations, probability);
        let (model, ranked_inliers) = best.into_parts();

        let mut inliers: Vec<usize> = ranked_inliers.iter().map(|&rank| ranking[rank]).collect();
        inliers.sort_unstable();

        debug!(
            "PROSAC finished after {performed} iterations with {} of {} inliers",
            inliers.len(),
            data.len()
        );

        Ok(EstimationResult {
            model,
            inliers,
            iterations: performed,
            point_count: data.len(),
        })
    }

    fn check_sample_count(&self, point_count: usize) -> Result<(), EstimationError> {
        let required = self.estimator.sample_size();
        if point_count < required {
            return Err(EstimationError::NotEnoughSamples {
                required,
                provided: point_count,
            });
        }
        Ok(())
    }

    fn resolve_limit(&self, limit: IterationLimit) -> (usize, f64) {
        match limit {
            IterationLimit::Fixed(iterations) => (iterations, self.settings.confidence),
            IterationLimit::Adaptive {
                expected_outlier_ratio,
                probability,
            } => (
                iteration_bound(expected_outlier_ratio, probability, self.estimator.sample_size()),
                probability,
            ),
        }
    }

    fn generator(&self) -> UniformRandomGenerator {
        UniformRandomGenerator::from_optional_seed(self.settings.seed)
    }

    /// The sampling loop shared by both modes. Indices in the returned best
    /// state are positions in `view`.
    fn search<S: Sampler>(
        &self,
        view: &RankedData<'_, E::Datum>,
        sampler: &mut S,
        max_error: f64,
        iterations: usize,
        probability: f64,
    ) -> (BestState<E::Model>, usize) {
        let point_count = view.data.len();
        let sample_size = self.estimator.sample_size();
        let termination = RansacTerminationCriterion::new(probability);

        let mut max_iterations = iterations;
        let mut best = BestState::new();
        let mut sample = vec![0usize; sample_size];
        let mut minimal_sample: Vec<E::Datum> = Vec::with_capacity(sample_size);
        let mut inliers = Vec::with_capacity(point_count);

        let mut iteration = 0;
        while iteration < max_iterations {
            iteration += 1;

            if !sampler.sample(point_count, sample_size, &mut sample) {
                trace!("iteration {iteration}: no sample could be drawn");
                continue;
            }

            minimal_sample.clear();
            minimal_sample.extend(sample.iter().map(|&i| view.get(i).clone()));

            let model = self.estimator.estimate_model(&minimal_sample);
            if !model.is_valid() {
                trace!("iteration {iteration}: degenerate sample {sample:?}");
                continue;
            }

            inliers.clear();
            inliers.extend(
                (0..point_count).filter(|&i| self.estimator.residual(view.get(i), &model) < max_error),
            );

            if best.offer(model, &inliers) {
                let previous = max_iterations;
                termination.check(best.inlier_count(), point_count, sample_size, &mut max_iterations);
                debug!(
                    "iteration {iteration}: {} of {point_count} inliers, budget {previous} -> {max_iterations}",
                    best.inlier_count()
                );
            }
        }

        (best, iteration)
    }
}
