use image_align::image::ImageF32;

/// Smooth low-frequency analytic pattern with texture along both axes.
fn pattern_value(x: f32, y: f32) -> f32 {
    0.5 + 0.2 * (x * 0.15).sin() + 0.2 * (y * 0.11).cos()
}

/// Generates the pattern at full resolution.
pub fn smooth_pattern(width: usize, height: usize) -> ImageF32 {
    shifted_pattern(width, height, 0.0, 0.0)
}

/// Generates the pattern translated by `(dx, dy)` pixels: the returned
/// image holds `pattern(x - dx, y - dy)`, i.e. content moved by `+dx, +dy`.
pub fn shifted_pattern(width: usize, height: usize, dx: f32, dy: f32) -> ImageF32 {
    ImageF32::from_fn(width, height, |x, y| {
        pattern_value(x as f32 - dx, y as f32 - dy)
    })
}
