//! Vertical two-colour backdrop gradient.

use image::{Rgba, RgbaImage};

/// Render an opaque gradient from `top` at row 0 to `bottom` at the last row.
///
/// Each row is a single colour; channel values are linearly interpolated and
/// rounded to the nearest integer.
#[must_use]
pub fn vertical_gradient(width: u32, height: u32, top: [u8; 3], bottom: [u8; 3]) -> RgbaImage {
    let span = f64::from(height.saturating_sub(1).max(1));

    let rows: Vec<Rgba<u8>> = (0..height)
        .map(|y| {
            let t = f64::from(y) / span;
            let mut px = [0u8, 0, 0, 255];
            for ((dst, &a), &b) in px.iter_mut().zip(&top).zip(&bottom) {
                let (a, b) = (f64::from(a), f64::from(b));
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    *dst = (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
                }
            }
            Rgba(px)
        })
        .collect();

    RgbaImage::from_fn(width, height, |_, y| rows[y as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_the_requested_colours() {
        let top = [255, 245, 245];
        let bottom = [240, 200, 200];
        let img = vertical_gradient(37, 64, top, bottom);
        for x in 0..37 {
            assert_eq!(img.get_pixel(x, 0).0, [255, 245, 245, 255]);
            assert_eq!(img.get_pixel(x, 63).0, [240, 200, 200, 255]);
        }
    }

    #[test]
    fn output_is_fully_opaque_and_rows_are_uniform() {
        let img = vertical_gradient(16, 20, [10, 200, 30], [250, 0, 90]);
        for y in 0..20 {
            let first = *img.get_pixel(0, y);
            for x in 0..16 {
                let px = img.get_pixel(x, y);
                assert_eq!(px[3], 255);
                assert_eq!(*px, first, "row {y} varies horizontally");
            }
        }
    }

    #[test]
    fn midpoint_is_the_rounded_average() {
        let img = vertical_gradient(1, 3, [0, 100, 255], [255, 0, 0]);
        // t = 0.5 at the middle row; 127.5 rounds away from zero.
        assert_eq!(img.get_pixel(0, 1).0, [128, 50, 128, 255]);
    }

    #[test]
    fn channels_move_monotonically() {
        let img = vertical_gradient(2, 50, [255, 255, 255], [0, 0, 0]);
        for y in 1..50 {
            assert!(img.get_pixel(0, y)[0] <= img.get_pixel(0, y - 1)[0]);
        }
    }

    #[test]
    fn single_row_is_the_top_colour() {
        let img = vertical_gradient(5, 1, [1, 2, 3], [200, 200, 200]);
        assert_eq!(img.get_pixel(4, 0).0, [1, 2, 3, 255]);
    }
}
