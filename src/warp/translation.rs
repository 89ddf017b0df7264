//! Pure 2D translation, the smallest useful warp family.
//!
//! Scaling rule: both translation components scale linearly with 2^k, there
//! is nothing else to adjust.
use super::{level_scale, Warp};
use nalgebra::{Matrix2, SMatrix, SVector, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationWarp {
    t: Vector2<f32>,
}

impl TranslationWarp {
    pub fn new(tx: f32, ty: f32) -> Self {
        Self {
            t: Vector2::new(tx, ty),
        }
    }

    pub fn tx(&self) -> f32 {
        self.t.x
    }

    pub fn ty(&self) -> f32 {
        self.t.y
    }
}

impl Warp<2> for TranslationWarp {
    fn identity() -> Self {
        Self::default()
    }

    fn params(&self) -> SVector<f32, 2> {
        self.t
    }

    fn from_params(params: SVector<f32, 2>) -> Self {
        Self { t: params }
    }

    fn map(&self, p: Vector2<f32>) -> Vector2<f32> {
        p + self.t
    }

    fn jacobian(&self, _p: Vector2<f32>) -> SMatrix<f32, 2, 2> {
        Matrix2::identity()
    }

    fn scaled(&self, k: i32) -> Self {
        Self {
            t: self.t * level_scale(k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_round_trip() {
        let w = TranslationWarp::new(3.5, -1.25);
        for k in -4..=4 {
            let back = w.scaled(k).scaled(-k);
            assert!((back.params() - w.params()).norm() < 1e-5, "k={k}");
        }
    }

    #[test]
    fn scaled_composes_additively() {
        let w = TranslationWarp::new(8.0, 2.0);
        let a = w.scaled(-2).scaled(-1);
        let b = w.scaled(-3);
        assert!((a.params() - b.params()).norm() < 1e-6);
        assert_eq!(w.scaled(0), w);
    }

    #[test]
    fn maps_by_offset() {
        let w = TranslationWarp::new(2.0, -1.0);
        let q = w.map(Vector2::new(1.0, 1.0));
        assert!((q - Vector2::new(3.0, 0.0)).norm() < 1e-6);
    }
}
