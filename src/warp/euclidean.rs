//! Rigid motion: translation plus rotation, parameters `(tx, ty, theta)`.
//!
//! Scaling rule: the translation components scale linearly with 2^k; the
//! rotation angle is frame-invariant and stays untouched. This asymmetry is
//! exactly why scaling lives with the family and not in the driver.
use super::{level_scale, Warp};
use nalgebra::{SMatrix, SVector, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EuclideanWarp {
    tx: f32,
    ty: f32,
    theta: f32,
}

impl EuclideanWarp {
    pub fn new(tx: f32, ty: f32, theta: f32) -> Self {
        Self { tx, ty, theta }
    }

    pub fn translation(&self) -> Vector2<f32> {
        Vector2::new(self.tx, self.ty)
    }

    pub fn angle(&self) -> f32 {
        self.theta
    }
}

impl Warp<3> for EuclideanWarp {
    fn identity() -> Self {
        Self::default()
    }

    fn params(&self) -> SVector<f32, 3> {
        SVector::<f32, 3>::new(self.tx, self.ty, self.theta)
    }

    fn from_params(params: SVector<f32, 3>) -> Self {
        Self {
            tx: params[0],
            ty: params[1],
            theta: params[2],
        }
    }

    fn map(&self, p: Vector2<f32>) -> Vector2<f32> {
        let (s, c) = self.theta.sin_cos();
        Vector2::new(
            c * p.x - s * p.y + self.tx,
            s * p.x + c * p.y + self.ty,
        )
    }

    fn jacobian(&self, p: Vector2<f32>) -> SMatrix<f32, 2, 3> {
        let (s, c) = self.theta.sin_cos();
        // Columns: d/dtx, d/dty, d/dtheta.
        SMatrix::<f32, 2, 3>::new(
            1.0, 0.0, -s * p.x - c * p.y, //
            0.0, 1.0, c * p.x - s * p.y,
        )
    }

    fn scaled(&self, k: i32) -> Self {
        let s = level_scale(k);
        Self {
            tx: self.tx * s,
            ty: self.ty * s,
            theta: self.theta,
        }
    }
}
