//! Affine warp, parameters `(a00, a10, a01, a11, tx, ty)` mapping
//! `q = A p + t` with `A` stored column-major.
//!
//! Scaling rule: the linear part `A` is frame-invariant (it relates scaled
//! coordinates to scaled coordinates), only the translation column picks up
//! the 2^k factor. This mirrors conjugating the transform with the level
//! scale matrix.
use super::{level_scale, Warp};
use nalgebra::{Matrix2, SMatrix, SVector, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineWarp {
    a: Matrix2<f32>,
    t: Vector2<f32>,
}

impl AffineWarp {
    pub fn new(a: Matrix2<f32>, t: Vector2<f32>) -> Self {
        Self { a, t }
    }

    pub fn linear(&self) -> Matrix2<f32> {
        self.a
    }

    pub fn translation(&self) -> Vector2<f32> {
        self.t
    }
}

impl Default for AffineWarp {
    fn default() -> Self {
        Self {
            a: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }
}

impl Warp<6> for AffineWarp {
    fn identity() -> Self {
        Self::default()
    }

    fn params(&self) -> SVector<f32, 6> {
        SVector::<f32, 6>::new(
            self.a[(0, 0)],
            self.a[(1, 0)],
            self.a[(0, 1)],
            self.a[(1, 1)],
            self.t.x,
            self.t.y,
        )
    }

    fn from_params(params: SVector<f32, 6>) -> Self {
        Self {
            a: Matrix2::new(params[0], params[2], params[1], params[3]),
            t: Vector2::new(params[4], params[5]),
        }
    }

    fn map(&self, p: Vector2<f32>) -> Vector2<f32> {
        self.a * p + self.t
    }

    fn jacobian(&self, p: Vector2<f32>) -> SMatrix<f32, 2, 6> {
        // Columns: d/da00, d/da10, d/da01, d/da11, d/dtx, d/dty.
        SMatrix::<f32, 2, 6>::new(
            p.x, 0.0, p.y, 0.0, 1.0, 0.0, //
            0.0, p.x, 0.0, p.y, 0.0, 1.0,
        )
    }

    fn scaled(&self, k: i32) -> Self {
        Self {
            a: self.a,
            t: self.t * level_scale(k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_round_trip_and_invariant_linear_part() {
        let w = AffineWarp::new(Matrix2::new(1.1, 0.2, -0.1, 0.9), Vector2::new(6.0, -3.0));
        let coarse = w.scaled(-3);
        assert_eq!(coarse.linear(), w.linear());
        assert!((coarse.translation() - Vector2::new(0.75, -0.375)).norm() < 1e-6);
        let back = coarse.scaled(3);
        assert!((back.params() - w.params()).norm() < 1e-5);
    }

    #[test]
    fn params_round_trip() {
        let w = AffineWarp::new(Matrix2::new(1.0, 0.5, -0.25, 2.0), Vector2::new(3.0, 4.0));
        let again = AffineWarp::from_params(w.params());
        assert_eq!(w, again);
    }

    #[test]
    fn identity_maps_points_unchanged() {
        let p = Vector2::new(7.0, -2.5);
        assert!((AffineWarp::identity().map(p) - p).norm() < 1e-6);
    }
}
