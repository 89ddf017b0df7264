//! Bilinear sampling with clamped (replicate) borders.
//!
//! Coordinates are grid-based: `(x, y) = (0, 0)` is the center of the
//! top-left pixel, integer coordinates land exactly on pixel values. Callers
//! working in pixel-center convention subtract 0.5 before sampling.
use super::ImageF32;

#[inline]
fn at_clamped(img: &ImageF32, x: isize, y: isize) -> f32 {
    let xc = x.clamp(0, img.w as isize - 1) as usize;
    let yc = y.clamp(0, img.h as isize - 1) as usize;
    img.get(xc, yc)
}

/// Bilinear lookup at fractional grid coordinates, clamping at the borders.
pub fn sample_bilinear(img: &ImageF32, x: f32, y: f32) -> f32 {
    if img.is_empty() {
        return 0.0;
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let dx = x - x0;
    let dy = y - y0;
    let xi = x0 as isize;
    let yi = y0 as isize;

    let p00 = at_clamped(img, xi, yi);
    let p10 = at_clamped(img, xi + 1, yi);
    let p01 = at_clamped(img, xi, yi + 1);
    let p11 = at_clamped(img, xi + 1, yi + 1);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilinear_on_2x2_center_and_borders() {
        let img = ImageF32 {
            w: 2,
            h: 2,
            stride: 2,
            data: vec![0.0, 10.0, 20.0, 30.0],
        };

        let center = sample_bilinear(&img, 0.5, 0.5);
        assert!((center - 15.0).abs() < 1e-6);

        // Integer coordinates reproduce pixel values exactly.
        assert!((sample_bilinear(&img, 1.0, 0.0) - 10.0).abs() < 1e-6);

        // Outside coordinates clamp to the nearest border pixel.
        assert!((sample_bilinear(&img, -3.0, -3.0) - 0.0).abs() < 1e-6);
        assert!((sample_bilinear(&img, 5.0, 5.0) - 30.0).abs() < 1e-6);
    }
}
