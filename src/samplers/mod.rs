//! Minimal-sample strategies behind the [`Sampler`](crate::core::Sampler) trait.
//!
//! - [`UniformRandomSampler`] draws uniformly over the whole dataset (RANSAC).
//! - [`ProsacSampler`] draws from a growing pool of top-ranked points (PROSAC).

pub mod prosac;
pub mod uniform;

pub use prosac::ProsacSampler;
pub use uniform::UniformRandomSampler;
