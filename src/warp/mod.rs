//! Parametric warps mapping template coordinates to target coordinates.
//!
//! A warp is an immutable value: applying a parameter increment produces a
//! new warp. Besides mapping points and exposing the 2×N Jacobian used by
//! gradient-based strategies, every family implements [`Warp::scaled`], the
//! coordinate-frame transform the aligner uses to move an estimate between
//! pyramid levels.
//!
//! ## Cross-level scaling
//!
//! `scaled(k)` returns the warp expressed for pixel coordinates scaled by
//! 2^k relative to the finest resolution (negative `k` = coarser). It must
//! satisfy `scaled(a).scaled(b) == scaled(a + b)` and `scaled(0) == self`.
//!
//! Scaling is a frame change, not a blanket multiply: which parameters pick
//! up the 2^k factor depends on the family. Translations scale linearly,
//! rotation angles and linear (matrix) parts do not. Each family documents
//! its own rule next to its definition; the driver never needs to know.
mod affine;
mod euclidean;
mod translation;

pub use affine::AffineWarp;
pub use euclidean::EuclideanWarp;
pub use translation::TranslationWarp;

use nalgebra::{SMatrix, SVector, Vector2};

/// Capability set the aligner and gradient strategies need from a warp
/// family with `N` free parameters.
pub trait Warp<const N: usize>: Clone {
    /// The warp that maps every point to itself.
    fn identity() -> Self;

    /// Current parameter vector.
    fn params(&self) -> SVector<f32, N>;

    /// Construct a warp from a parameter vector.
    fn from_params(params: SVector<f32, N>) -> Self;

    /// Map a template coordinate into the target frame.
    fn map(&self, p: Vector2<f32>) -> Vector2<f32>;

    /// Jacobian of the mapped point with respect to the parameters,
    /// evaluated at template coordinate `p`.
    fn jacobian(&self, p: Vector2<f32>) -> SMatrix<f32, 2, N>;

    /// The same warp expressed for coordinates scaled by 2^k relative to
    /// the finest resolution. See the module docs for the invariants.
    fn scaled(&self, k: i32) -> Self;
}

/// 2^k as f32, the linear factor between the finest frame and level `-k`.
#[inline]
pub(crate) fn level_scale(k: i32) -> f32 {
    2f32.powi(k)
}
