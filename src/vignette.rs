//! Radial corner vignette.

use image::{Rgba, RgbaImage};

/// Render a tinted mask that is clear at the centre and thickens toward the corners.
///
/// With `cx = width / 2` and `cy = height / 2`, a pixel's normalized distance is
/// `d = sqrt(((x - cx) / cx)^2 + ((y - cy) / cy)^2)` and its alpha is
/// `255 * strength * d^2`, clamped to `[0, 255]`. Every pixel is evaluated.
#[must_use]
pub fn radial_vignette(width: u32, height: u32, color: [u8; 3], strength: f32) -> RgbaImage {
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let strength = f64::from(strength);

    RgbaImage::from_fn(width, height, |x, y| {
        let nx = (f64::from(x) - cx) / cx;
        let ny = (f64::from(y) - cy) / cy;
        let d2 = nx * nx + ny * ny;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let alpha = (255.0 * strength * d2).round().clamp(0.0, 255.0) as u8;
        Rgba([color[0], color[1], color[2], alpha])
    })
}
