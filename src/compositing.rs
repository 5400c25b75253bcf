//! Source-over alpha compositing on straight (non-premultiplied) RGBA.
//!
//! For a top pixel with alpha `ta` over a bottom pixel with alpha `ba`:
//! `out_a = ta + ba * (1 - ta/255)` and
//! `out_c = (top_c * ta + bottom_c * ba * (1 - ta/255)) / out_a`,
//! with colour forced to 0 when `out_a` is 0.

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Blend one straight-alpha pixel over another.
#[must_use]
pub fn blend_pixel(top: Rgba<u8>, bottom: Rgba<u8>) -> Rgba<u8> {
    let ta = f32::from(top[3]);
    let ba = f32::from(bottom[3]);
    let rest = ba * (1.0 - ta / 255.0);
    let out_a = ta + rest;

    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for (ch, dst) in out.iter_mut().take(3).enumerate() {
        let c = (f32::from(top[ch]) * ta + f32::from(bottom[ch]) * rest) / out_a;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            *dst = c.round().clamp(0.0, 255.0) as u8;
        }
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        out[3] = out_a.round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// Composite `top` over `bottom` into a new raster.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the layers differ in size. Layers
/// are never resized or cropped to fit.
pub fn over(top: &RgbaImage, bottom: &RgbaImage) -> Result<RgbaImage> {
    check_same_size(top, bottom)?;
    let mut out = bottom.clone();
    for (dst, src) in out.pixels_mut().zip(top.pixels()) {
        *dst = blend_pixel(*src, *dst);
    }
    Ok(out)
}

/// Composite an ordered stack, bottom layer first.
///
/// Returns `None` for an empty stack.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if any layer differs in size from the first.
pub fn flatten(layers: &[&RgbaImage]) -> Result<Option<RgbaImage>> {
    let Some((first, rest)) = layers.split_first() else {
        return Ok(None);
    };
    let mut acc = (*first).clone();
    for layer in rest {
        acc = over(layer, &acc)?;
    }
    Ok(Some(acc))
}

/// Blend `top` onto `base` in place with its top-left corner at `(x, y)`.
///
/// The offset may be negative or push `top` past the edges; only the
/// overlapping region is touched.
pub fn overlay_at(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    for_overlap(base, top, x, y, |dst, src| *dst = blend_pixel(src, *dst));
}

/// Copy `top` into `base` in place with its top-left corner at `(x, y)`,
/// replacing the pixels underneath. Clipped like [`overlay_at`].
pub fn paste_at(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    for_overlap(base, top, x, y, |dst, src| *dst = src);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn for_overlap(
    base: &mut RgbaImage,
    top: &RgbaImage,
    x: i64,
    y: i64,
    mut op: impl FnMut(&mut Rgba<u8>, Rgba<u8>),
) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(top.width())).min(i64::from(base.width()));
    let y1 = (y + i64::from(top.height())).min(i64::from(base.height()));

    for by in y0..y1 {
        for bx in x0..x1 {
            let src = *top.get_pixel((bx - x) as u32, (by - y) as u32);
            op(base.get_pixel_mut(bx as u32, by as u32), src);
        }
    }
}

fn check_same_size(top: &RgbaImage, bottom: &RgbaImage) -> Result<()> {
    if top.dimensions() == bottom.dimensions() {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            top_width: top.width(),
            top_height: top.height(),
            bottom_width: bottom.width(),
            bottom_height: bottom.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_possible_truncation)]
    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            let v = ((x * 37 + y * 11) % 256) as u8;
            Rgba([v, 255 - v, v / 2, ((x + y) * 9 % 256) as u8])
        })
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn opaque_top_occludes_completely() {
        let top = RgbaImage::from_fn(30, 20, |x, y| {
            Rgba([(x * 7) as u8, (y * 9) as u8, 42, 255])
        });
        let bottom = checker(30, 20);
        let out = over(&top, &bottom).unwrap();
        assert_eq!(out, top);
    }

    #[test]
    fn transparent_top_leaves_bottom_unchanged() {
        let top = RgbaImage::from_pixel(12, 12, Rgba([255, 0, 0, 0]));
        let bottom = checker(12, 12);
        let out = over(&top, &bottom).unwrap();
        for (o, b) in out.pixels().zip(bottom.pixels()) {
            if b[3] == 0 {
                assert_eq!(*o, Rgba([0, 0, 0, 0]));
            } else {
                assert_eq!(o, b);
            }
        }
    }

    #[test]
    fn both_transparent_yields_zero_colour() {
        let out = blend_pixel(Rgba([200, 100, 50, 0]), Rgba([10, 20, 30, 0]));
        assert_eq!(out, Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn half_alpha_over_opaque_mixes_evenly() {
        let out = blend_pixel(Rgba([255, 0, 0, 128]), Rgba([0, 0, 255, 255]));
        assert_eq!(out[3], 255);
        assert_eq!(out[0], 128);
        assert_eq!(out[2], 127);
    }

    #[test]
    fn semi_transparent_over_transparent_keeps_its_colour() {
        // Dividing by out_a avoids darkening edge pixels toward black.
        let out = blend_pixel(Rgba([200, 150, 100, 60]), Rgba([0, 0, 0, 0]));
        assert_eq!(out, Rgba([200, 150, 100, 60]));
    }

    #[test]
    fn semi_transparent_layers_combine_alpha() {
        let out = blend_pixel(Rgba([255, 255, 255, 128]), Rgba([0, 0, 0, 128]));
        // 128 + 128 * (1 - 128/255) = 191.75
        assert_eq!(out[3], 192);
        // 255 * 128 / 191.75
        assert_eq!(out[0], 170);
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let a = RgbaImage::new(10, 10);
        let b = RgbaImage::new(10, 11);
        assert!(matches!(over(&a, &b), Err(Error::DimensionMismatch { .. })));
        assert!(matches!(flatten(&[&a, &b]), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn flatten_applies_layers_bottom_up() {
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let green = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
        let out = flatten(&[&red, &green]).unwrap().unwrap();
        assert_eq!(out, green);
        assert!(flatten(&[]).unwrap().is_none());
    }

    #[test]
    fn overlay_clips_negative_offsets() {
        let mut base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let top = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        overlay_at(&mut base, &top, -2, -2);
        assert_eq!(base.get_pixel(0, 0)[0], 255);
        assert_eq!(base.get_pixel(1, 1)[0], 255);
        assert_eq!(base.get_pixel(2, 2)[0], 0);

        overlay_at(&mut base, &top, 8, 8);
        assert_eq!(base.get_pixel(9, 9)[0], 255);
        assert_eq!(base.get_pixel(7, 7)[0], 0);

        // Entirely outside: no panic, no change.
        let before = base.clone();
        overlay_at(&mut base, &top, 20, -20);
        assert_eq!(base, before);
    }

    #[test]
    fn paste_replaces_rather_than_blends() {
        let mut base = RgbaImage::from_pixel(6, 6, Rgba([0, 0, 255, 255]));
        let top = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 100]));
        paste_at(&mut base, &top, 1, 1);
        assert_eq!(*base.get_pixel(1, 1), Rgba([255, 0, 0, 100]));
        assert_eq!(*base.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }
}
