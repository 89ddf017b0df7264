//! Image gradients (Sobel/Scharr) for gradient-based step strategies.
//!
//! - Convolves a 3×3 kernel pair (`X` and `Y`) with border clamping.
//! - Outputs per-pixel `gx`, `gy` buffers matching the input size.
//!
//! Step strategies cache one [`Grad`] per target pyramid level during their
//! prepare hook and sample it bilinearly at warped positions.
//!
//! Complexity: O(W·H) per pass; memory: two float buffers per level.
use crate::image::{ImageF32, ImageView, ImageViewMut};
use serde::Deserialize;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const SCHARR_KERNEL_X: Kernel3 = [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]];
const SCHARR_KERNEL_Y: Kernel3 = [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]];

// Normalization so that a unit ramp yields a unit derivative.
const SOBEL_NORM: f32 = 1.0 / 8.0;
const SCHARR_NORM: f32 = 1.0 / 32.0;

/// Kernel choice for the per-level gradient caches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum GradientKernel {
    Sobel,
    #[default]
    Scharr,
}

/// Per-pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative (convolution with kernel X)
    pub gx: ImageF32,
    /// Vertical derivative (convolution with kernel Y)
    pub gy: ImageF32,
}

fn gradients_with_kernels(l: &ImageF32, kernel_x: &Kernel3, kernel_y: &Kernel3, norm: f32) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, yy_row) in rows.iter().enumerate() {
                let kx_row = &kernel_x[ky];
                let ky_row = &kernel_y[ky];
                sum_x += yy_row[x_idx[0]] * kx_row[0]
                    + yy_row[x_idx[1]] * kx_row[1]
                    + yy_row[x_idx[2]] * kx_row[2];
                sum_y += yy_row[x_idx[0]] * ky_row[0]
                    + yy_row[x_idx[1]] * ky_row[1]
                    + yy_row[x_idx[2]] * ky_row[2];
            }

            out_gx[x] = sum_x * norm;
            out_gy[x] = sum_y * norm;
        }
    }

    Grad { gx, gy }
}

/// Compute Sobel gradients on a single-channel float image.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    gradients_with_kernels(l, &SOBEL_KERNEL_X, &SOBEL_KERNEL_Y, SOBEL_NORM)
}

/// Compute Scharr gradients (better rotational symmetry than Sobel).
pub fn scharr_gradients(l: &ImageF32) -> Grad {
    gradients_with_kernels(l, &SCHARR_KERNEL_X, &SCHARR_KERNEL_Y, SCHARR_NORM)
}

/// Gradients with the requested kernel.
pub fn gradients(l: &ImageF32, kernel: GradientKernel) -> Grad {
    match kernel {
        GradientKernel::Sobel => sobel_gradients(l),
        GradientKernel::Scharr => scharr_gradients(l),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_ramp_has_unit_gradient() {
        let img = ImageF32::from_fn(16, 16, |x, _| x as f32);
        for kernel in [GradientKernel::Sobel, GradientKernel::Scharr] {
            let g = gradients(&img, kernel);
            // Interior pixels: d/dx = 1, d/dy = 0.
            for y in 2..14 {
                for x in 2..14 {
                    assert!((g.gx.get(x, y) - 1.0).abs() < 1e-5, "{kernel:?} gx");
                    assert!(g.gy.get(x, y).abs() < 1e-5, "{kernel:?} gy");
                }
            }
        }
    }
}
