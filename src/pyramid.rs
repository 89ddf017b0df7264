//! Grayscale image pyramid with separable Gaussian blur and 2× decimation.
//!
//! Purpose
//! - Build the multi-resolution representation the aligner walks from
//!   coarse to fine: large displacements are absorbed on low-res levels,
//!   precision comes from the finer ones.
//!
//! Design
//! - Level 0 is the input at full resolution (8-bit input is converted to
//!   `ImageF32` in [0,1] first).
//! - Each subsequent level applies a separable 5-tap Gaussian blur
//!   (kernel ≈ [1,4,6,4,1]/16) followed by 2× decimation.
//! - Boundary handling uses clamping (replicate border) via saturating/`min`.
//! - Pyramids are immutable after construction. A pre-built target pyramid
//!   can be shared across many aligners; [`Pyramid::truncate`] produces the
//!   prefix a given alignment needs without rebuilding.
//!
//! Notes
//! - Values remain in [0,1] due to linear filtering on [0,1] input.
//! - [`Pyramid::max_levels_for_size`] bounds the depth so that no level
//!   shrinks below [`Pyramid::MIN_LEVEL_DIM`] pixels on its short side.
//! - The decimation is center-aligned by picking every other pixel post-blur.
//!
//! Complexity
//! - Per level O(W·H) with two 1D passes (horizontal + vertical).
//! - Memory O(sum of levels), typically ~4/3 of base image for 2× pyramids.
use crate::image::{ImageF32, ImageU8};

#[derive(Clone, Debug, Default)]
pub struct Pyramid {
    levels: Vec<ImageF32>, // grayscale float 0..1, index 0 = finest
}

impl Pyramid {
    /// Minimum width/height a level may have; halving stops before going below.
    pub const MIN_LEVEL_DIM: usize = 4;

    /// Build a pyramid from a float image, with `levels` entries (at least 1).
    pub fn build_f32(image: &ImageF32, levels: usize) -> Self {
        let levels = levels.max(1);
        let mut out = Vec::with_capacity(levels);
        out.push(image.clone());
        for lvl in 1..levels {
            let prev = &out[lvl - 1];
            let (nw, nh) = ((prev.w + 1) / 2, (prev.h + 1) / 2);
            let mut tmp = ImageF32::new(prev.w, prev.h);
            gaussian5x5_sep(prev, &mut tmp);
            let mut down = ImageF32::new(nw, nh);
            // 2x decimation (pick every other pixel)
            for y in 0..nh {
                for x in 0..nw {
                    down.set(x, y, tmp.get((x * 2).min(prev.w - 1), (y * 2).min(prev.h - 1)));
                }
            }
            out.push(down);
        }
        Self { levels: out }
    }

    /// Build a pyramid from an 8-bit grayscale view, converting L0 to [0,1].
    pub fn build_u8(gray: ImageU8<'_>, levels: usize) -> Self {
        Self::build_f32(&ImageF32::from_u8(&gray), levels)
    }

    /// How many levels an image of the given size supports before the short
    /// side of a level would drop below [`Self::MIN_LEVEL_DIM`].
    pub fn max_levels_for_size(width: usize, height: usize) -> usize {
        let mut dim = width.min(height);
        if dim < Self::MIN_LEVEL_DIM {
            return if dim == 0 { 0 } else { 1 };
        }
        let mut levels = 1;
        while (dim + 1) / 2 >= Self::MIN_LEVEL_DIM {
            dim = (dim + 1) / 2;
            levels += 1;
        }
        levels
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Access level `i`; index 0 is the finest (original resolution).
    pub fn level(&self, i: usize) -> &ImageF32 {
        &self.levels[i]
    }

    /// Finest level (index 0). Panics on an empty pyramid.
    pub fn finest(&self) -> &ImageF32 {
        &self.levels[0]
    }

    /// A copy keeping only the first `count` levels (relative order
    /// preserved). `count` is clamped to the available depth; asking for
    /// more levels than exist returns a full copy.
    pub fn truncate(&self, count: usize) -> Self {
        let count = count.min(self.levels.len());
        Self {
            levels: self.levels[..count].to_vec(),
        }
    }
}

/// Simple 5-tap separable Gaussian (approx sigma≈1)
fn gaussian5x5_sep(inp: &ImageF32, out: &mut ImageF32) {
    // 1D kernel [1,4,6,4,1]/16 applied separably
    let w = inp.w;
    let h = inp.h;
    let mut tmp = ImageF32::new(w, h);
    // horizontal
    for y in 0..h {
        for x in 0..w {
            let xm1 = x.saturating_sub(1);
            let xm2 = x.saturating_sub(2);
            let xp1 = (x + 1).min(w - 1);
            let xp2 = (x + 2).min(w - 1);
            let v = (inp.get(xm2, y)
                + 4.0 * inp.get(xm1, y)
                + 6.0 * inp.get(x, y)
                + 4.0 * inp.get(xp1, y)
                + inp.get(xp2, y))
                * (1.0 / 16.0);
            tmp.set(x, y, v);
        }
    }
    // vertical
    for y in 0..h {
        let ym1 = y.saturating_sub(1);
        let ym2 = y.saturating_sub(2);
        let yp1 = (y + 1).min(h - 1);
        let yp2 = (y + 2).min(h - 1);
        for x in 0..w {
            let v = (tmp.get(x, ym2)
                + 4.0 * tmp.get(x, ym1)
                + 6.0 * tmp.get(x, y)
                + 4.0 * tmp.get(x, yp1)
                + tmp.get(x, yp2))
                * (1.0 / 16.0);
            out.set(x, y, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_sizes_halve() {
        let img = ImageF32::new(64, 48);
        let pyr = Pyramid::build_f32(&img, 3);
        assert_eq!(pyr.num_levels(), 3);
        assert_eq!((pyr.level(0).w, pyr.level(0).h), (64, 48));
        assert_eq!((pyr.level(1).w, pyr.level(1).h), (32, 24));
        assert_eq!((pyr.level(2).w, pyr.level(2).h), (16, 12));
    }

    #[test]
    fn max_levels_respects_min_dim() {
        // 64 -> 32 -> 16 -> 8 -> 4, stop before 2.
        assert_eq!(Pyramid::max_levels_for_size(64, 64), 5);
        assert_eq!(Pyramid::max_levels_for_size(64, 256), 5);
        assert_eq!(Pyramid::max_levels_for_size(4, 4), 1);
        assert_eq!(Pyramid::max_levels_for_size(3, 100), 1);
        assert_eq!(Pyramid::max_levels_for_size(0, 100), 0);
    }

    #[test]
    fn zero_requested_levels_builds_one() {
        let img = ImageF32::new(8, 8);
        let pyr = Pyramid::build_f32(&img, 0);
        assert_eq!(pyr.num_levels(), 1);
    }

    #[test]
    fn truncate_keeps_prefix() {
        let img = ImageF32::new(64, 64);
        let pyr = Pyramid::build_f32(&img, 4);
        let cut = pyr.truncate(2);
        assert_eq!(cut.num_levels(), 2);
        assert_eq!((cut.level(1).w, cut.level(1).h), (32, 32));
        // Original untouched, over-large counts clamp.
        assert_eq!(pyr.num_levels(), 4);
        assert_eq!(pyr.truncate(10).num_levels(), 4);
    }

    #[test]
    fn blur_preserves_constant_image() {
        let img = ImageF32::from_fn(16, 16, |_, _| 0.5);
        let pyr = Pyramid::build_f32(&img, 3);
        for lvl in 0..3 {
            let l = pyr.level(lvl);
            for &v in &l.data {
                assert!((v - 0.5).abs() < 1e-6);
            }
        }
    }
}
