//! Forward-additive Lucas-Kanade step computation.
//!
//! For every interior template pixel `x` the strategy warps the point into
//! the target, samples value and gradient bilinearly, and accumulates the
//! Gauss-Newton normal equations over the steepest-descent images
//! `J(x)^T ∇I(W(x))`. The solved increment is applied additively to the
//! warp parameters.
//!
//! Per-level target gradients are precomputed once in the prepare hook. A
//! singular normal system is reported as a zero-constraint step, which the
//! driver reads as "advance to the next finer level".
use crate::align::{is_in_image, LevelContext, StepResult, StepStrategy};
use crate::gradient::{gradients, Grad, GradientKernel};
use crate::image::sample_bilinear;
use crate::pyramid::Pyramid;
use crate::warp::Warp;
use nalgebra::{SMatrix, SVector, Vector2};
use serde::Deserialize;

/// Knobs for the forward-additive strategy.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ForwardAdditiveOptions {
    /// Pixels to skip along every border of both images; correspondences
    /// whose gradient/interpolation support would straddle the edge are
    /// discarded.
    pub margin: usize,
    /// Kernel used for the per-level target gradient caches.
    pub kernel: GradientKernel,
}

impl Default for ForwardAdditiveOptions {
    fn default() -> Self {
        Self {
            margin: 2,
            kernel: GradientKernel::Scharr,
        }
    }
}

/// Forward-additive Lucas-Kanade, generic over the warp family.
#[derive(Clone, Debug, Default)]
pub struct ForwardAdditive {
    opts: ForwardAdditiveOptions,
    target_grads: Vec<Grad>,
}

impl ForwardAdditive {
    pub fn new(opts: ForwardAdditiveOptions) -> Self {
        Self {
            opts,
            target_grads: Vec::new(),
        }
    }
}

/// Accumulated normal equations for one step attempt.
struct Normal<const N: usize> {
    h: SMatrix<f32, N, N>,
    b: SVector<f32, N>,
    sum_errors: f32,
    num_constraints: usize,
}

impl<const N: usize> Normal<N> {
    fn zero() -> Self {
        Self {
            h: SMatrix::zeros(),
            b: SVector::zeros(),
            sum_errors: 0.0,
            num_constraints: 0,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.h += other.h;
        self.b += other.b;
        self.sum_errors += other.sum_errors;
        self.num_constraints += other.num_constraints;
        self
    }
}

fn accumulate_row<W: Warp<N>, const N: usize>(
    ctx: &LevelContext<'_>,
    grad: &Grad,
    warp: &W,
    margin: usize,
    y: usize,
) -> Normal<N> {
    let mut acc = Normal::zero();
    let target = ctx.target;
    for x in margin..ctx.template.w - margin {
        // Pixel-center convention: pixel (x, y) sits at (x + 0.5, y + 0.5).
        let p = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
        let q = warp.map(p);
        if !is_in_image(q, target.w, target.h, margin as i32) {
            continue;
        }

        let value = sample_bilinear(target, q.x - 0.5, q.y - 0.5);
        let gx = sample_bilinear(&grad.gx, q.x - 0.5, q.y - 0.5);
        let gy = sample_bilinear(&grad.gy, q.x - 0.5, q.y - 0.5);

        let residual = ctx.template.get(x, y) - value;
        let sd = warp.jacobian(p).transpose() * Vector2::new(gx, gy);

        acc.h += sd * sd.transpose();
        acc.b += sd * residual;
        acc.sum_errors += residual * residual;
        acc.num_constraints += 1;
    }
    acc
}

#[cfg(not(feature = "parallel"))]
fn accumulate<W: Warp<N>, const N: usize>(
    ctx: &LevelContext<'_>,
    grad: &Grad,
    warp: &W,
    margin: usize,
) -> Normal<N> {
    (margin..ctx.template.h - margin)
        .map(|y| accumulate_row(ctx, grad, warp, margin, y))
        .fold(Normal::zero(), Normal::merge)
}

#[cfg(feature = "parallel")]
fn accumulate<W, const N: usize>(
    ctx: &LevelContext<'_>,
    grad: &Grad,
    warp: &W,
    margin: usize,
) -> Normal<N>
where
    W: Warp<N> + Sync,
{
    use rayon::prelude::*;

    (margin..ctx.template.h - margin)
        .into_par_iter()
        .map(|y| accumulate_row(ctx, grad, warp, margin, y))
        .reduce(Normal::zero, Normal::merge)
}

fn solve<const N: usize>(acc: Normal<N>) -> StepResult<N> {
    if acc.num_constraints == 0 {
        return StepResult::empty();
    }
    match acc.h.cholesky() {
        Some(chol) => StepResult {
            delta: chol.solve(&acc.b),
            sum_errors: acc.sum_errors,
            num_constraints: acc.num_constraints,
        },
        // Degenerate system (e.g. textureless region): no step to propose.
        None => StepResult::empty(),
    }
}

impl<W, const N: usize> StepStrategy<W, N> for ForwardAdditive
where
    W: Warp<N> + Sync,
{
    fn prepare(&mut self, _template: &Pyramid, target: &Pyramid, _warp: &W) {
        self.target_grads = (0..target.num_levels())
            .map(|i| gradients(target.level(i), self.opts.kernel))
            .collect();
    }

    fn compute_step(&self, ctx: &LevelContext<'_>, warp: &W) -> StepResult<N> {
        let Some(grad) = self.target_grads.get(ctx.level) else {
            return StepResult::empty();
        };
        let margin = self.opts.margin;
        if ctx.template.w <= 2 * margin || ctx.template.h <= 2 * margin {
            return StepResult::empty();
        }
        solve(accumulate(ctx, grad, warp, margin))
    }

    fn apply_step(&self, warp: &W, step: &StepResult<N>) -> W {
        W::from_params(warp.params() + step.delta)
    }
}
