//! The contract between the driver and an algorithm-specific step strategy.
use crate::pyramid::Pyramid;
use crate::warp::Warp;
use nalgebra::SVector;

use super::driver::LevelContext;

/// Outcome of one step-computation attempt.
///
/// `num_constraints == 0` is the canonical "no step available" signal: a
/// strategy reports it when no valid pixel correspondences exist or when
/// its linear system is degenerate. The driver treats it as the per-level
/// convergence signal, never as an error.
#[derive(Clone, Debug)]
pub struct StepResult<const N: usize> {
    /// Proposed parameter increment.
    pub delta: SVector<f32, N>,
    /// Accumulated residual magnitude over all valid correspondences.
    pub sum_errors: f32,
    /// Number of valid correspondences that contributed.
    pub num_constraints: usize,
}

impl<const N: usize> StepResult<N> {
    /// A result carrying no constraints (the "could not propose" signal).
    pub fn empty() -> Self {
        Self {
            delta: SVector::zeros(),
            sum_errors: 0.0,
            num_constraints: 0,
        }
    }

    /// Mean residual per constraint. Caller must check `num_constraints > 0`.
    pub fn mean_error(&self) -> f32 {
        self.sum_errors / self.num_constraints as f32
    }
}

impl<const N: usize> Default for StepResult<N> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Capability set the driver requires from an alignment algorithm.
///
/// Implementations keep whatever per-level caches they need (gradients,
/// steepest-descent images) in their own state; the driver never inspects
/// them. `compute_step` must be side-effect free on shared state and must
/// return [`StepResult::empty`] instead of failing.
pub trait StepStrategy<W: Warp<N>, const N: usize> {
    /// One-time setup after pyramids are built, before the first iteration.
    fn prepare(&mut self, template: &Pyramid, target: &Pyramid, warp: &W);

    /// Propose a parameter increment for the current level and warp.
    fn compute_step(&self, ctx: &LevelContext<'_>, warp: &W) -> StepResult<N>;

    /// Combine a warp with an accepted increment. The combination rule
    /// (additive vs. compositional) belongs to the strategy.
    fn apply_step(&self, warp: &W, step: &StepResult<N>) -> W;
}
