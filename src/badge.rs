//! Watermark badge: a translucent rounded bubble carrying the scaled logo,
//! anchored near the bottom-right corner of the base image.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::compositing;
use crate::config::WatermarkConfig;

/// Pixel layout of a badge for a given base image and logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeGeometry {
    /// Width of the resized logo.
    pub logo_width: u32,
    /// Height of the resized logo.
    pub logo_height: u32,
    /// Gap between the logo and the bubble edge.
    pub padding: u32,
    /// Bubble width.
    pub width: u32,
    /// Bubble height.
    pub height: u32,
    /// Corner radius of the bubble.
    pub radius: u32,
    /// Left edge on the base image; negative when the base is too small.
    pub x: i64,
    /// Top edge on the base image; negative when the base is too small.
    pub y: i64,
}

impl BadgeGeometry {
    /// Lay out a badge for a `base_width` x `base_height` image and a
    /// `logo_width` x `logo_height` logo.
    ///
    /// Returns `None` if the logo has a zero dimension.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compute(
        base_width: u32,
        base_height: u32,
        logo_width: u32,
        logo_height: u32,
        config: &WatermarkConfig,
    ) -> Option<Self> {
        if logo_width == 0 || logo_height == 0 {
            return None;
        }

        let scaled_w = (floor_scaled(f64::from(base_width), config.scale) as u32).max(1);
        let scaled_h =
            ((u64::from(logo_height) * u64::from(scaled_w) / u64::from(logo_width)) as u32).max(1);

        let longest = f64::from(scaled_w.max(scaled_h));
        let padding = floor_scaled(longest, config.padding) as u32;
        let width = scaled_w + 2 * padding;
        let height = scaled_h + 2 * padding;
        let radius = ((f64::from(height) * config.corner_radius).round() as u32)
            .min(width.min(height) / 2);
        let margin = floor_scaled(f64::from(base_width), config.margin) as i64;

        Some(Self {
            logo_width: scaled_w,
            logo_height: scaled_h,
            padding,
            width,
            height,
            radius,
            x: i64::from(base_width) - i64::from(width) - margin,
            y: i64::from(base_height) - i64::from(height) - margin,
        })
    }
}

/// `floor(len * ratio)`, tolerant of ratios like 0.02 that sit a hair below
/// their decimal value in binary.
fn floor_scaled(len: f64, ratio: f64) -> f64 {
    (len * ratio + 1e-9).floor()
}

/// A rendered bubble and where it goes on the base image.
#[derive(Debug, Clone)]
pub struct Badge {
    /// Bubble with the logo already composited in.
    pub image: RgbaImage,
    /// Layout the bubble was rendered from.
    pub geometry: BadgeGeometry,
}

impl Badge {
    /// Render the badge for a base image of the given size.
    ///
    /// Returns `None` if the logo has a zero dimension.
    #[must_use]
    pub fn render(
        base_width: u32,
        base_height: u32,
        logo: &RgbaImage,
        config: &WatermarkConfig,
    ) -> Option<Self> {
        let (logo_w, logo_h) = logo.dimensions();
        let geometry = BadgeGeometry::compute(base_width, base_height, logo_w, logo_h, config)?;
        log::debug!("badge geometry: {geometry:?}");

        let fill = Rgba([255, 255, 255, config.fill_alpha]);
        let mut image = rounded_rect(geometry.width, geometry.height, geometry.radius, fill);

        let scaled = imageops::resize(
            logo,
            geometry.logo_width,
            geometry.logo_height,
            FilterType::Lanczos3,
        );
        let offset = i64::from(geometry.padding);
        compositing::overlay_at(&mut image, &scaled, offset, offset);

        Some(Self { image, geometry })
    }

    /// Place the badge on a transparent layer of the base image's size.
    #[must_use]
    pub fn to_layer(&self, base_width: u32, base_height: u32) -> RgbaImage {
        let mut layer = RgbaImage::new(base_width, base_height);
        compositing::paste_at(&mut layer, &self.image, self.geometry.x, self.geometry.y);
        layer
    }
}

/// Render a full-size transparent layer carrying the watermark badge.
///
/// The caller composites the layer over the finished photo. Positions are not
/// clamped, so on very small bases the badge is partially cut off.
#[must_use]
pub fn render_badge_layer(
    base_width: u32,
    base_height: u32,
    logo: &RgbaImage,
    config: &WatermarkConfig,
) -> Option<RgbaImage> {
    Badge::render(base_width, base_height, logo, config)
        .map(|b| b.to_layer(base_width, base_height))
}

/// Fill a rounded rectangle; pixels are in when their centre is.
fn rounded_rect(width: u32, height: u32, radius: u32, fill: Rgba<u8>) -> RgbaImage {
    let w = f64::from(width);
    let h = f64::from(height);
    let r = f64::from(radius);

    RgbaImage::from_fn(width, height, |x, y| {
        let px = f64::from(x) + 0.5;
        let py = f64::from(y) + 0.5;
        let qx = px.clamp(r, w - r);
        let qy = py.clamp(r, h - r);
        let (dx, dy) = (px - qx, py - qy);
        if dx * dx + dy * dy <= r * r {
            fill
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_for_reference_layout() {
        let g = BadgeGeometry::compute(1000, 800, 300, 100, &WatermarkConfig::default()).unwrap();
        assert_eq!((g.logo_width, g.logo_height), (150, 50));
        assert_eq!(g.padding, 27);
        assert_eq!((g.width, g.height), (204, 104));
        assert_eq!(g.radius, 23);
        assert_eq!((g.x, g.y), (776, 676));
    }

    #[test]
    fn margin_floors_whole_products_exactly() {
        // 0.02 * 50 and 0.02 * 1000 are whole numbers and must not lose a pixel.
        let config = WatermarkConfig::default();
        let g = BadgeGeometry::compute(50, 40, 10, 10, &config).unwrap();
        assert_eq!((g.logo_width, g.padding, g.width), (7, 1, 9));
        assert_eq!(g.x, 50 - 9 - 1);
        assert_eq!(g.y, 40 - 9 - 1);

        let g = BadgeGeometry::compute(1000, 1000, 300, 100, &config).unwrap();
        assert_eq!((g.x, g.y), (776, 876));
    }

    #[test]
    fn floor_scaled_absorbs_binary_rounding() {
        assert!((floor_scaled(1000.0, 0.02) - 20.0).abs() < f64::EPSILON);
        assert!((floor_scaled(100.0, 0.29) - 29.0).abs() < f64::EPSILON);
        assert!((floor_scaled(99.0, 0.02) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn small_base_gives_negative_position() {
        let config = WatermarkConfig {
            scale: 1.0,
            ..WatermarkConfig::default()
        };
        let g = BadgeGeometry::compute(50, 20, 10, 10, &config).unwrap();
        assert!(g.x < 0 && g.y < 0, "{g:?}");
    }

    #[test]
    fn zero_sized_logo_has_no_geometry() {
        let config = WatermarkConfig::default();
        assert!(BadgeGeometry::compute(1000, 800, 0, 100, &config).is_none());
        assert!(Badge::render(1000, 800, &RgbaImage::new(10, 0), &config).is_none());
    }

    #[test]
    fn rounded_corners_are_cut() {
        let fill = Rgba([255, 255, 255, 220]);
        let rect = rounded_rect(40, 20, 8, fill);
        assert_eq!(rect.get_pixel(0, 0)[3], 0);
        assert_eq!(rect.get_pixel(39, 19)[3], 0);
        assert_eq!(*rect.get_pixel(20, 10), fill);
        assert_eq!(*rect.get_pixel(0, 10), fill);
        assert_eq!(*rect.get_pixel(20, 0), fill);
    }

    #[test]
    fn badge_has_translucent_white_fill_and_logo_inside() {
        let logo = RgbaImage::from_pixel(300, 100, Rgba([10, 20, 200, 255]));
        let badge = Badge::render(1000, 800, &logo, &WatermarkConfig::default()).unwrap();
        assert_eq!(badge.image.dimensions(), (204, 104));
        // Padding band, away from corners.
        assert_eq!(*badge.image.get_pixel(102, 5), Rgba([255, 255, 255, 220]));
        // Logo centre.
        let centre = badge.image.get_pixel(102, 52);
        assert_eq!(centre[3], 255);
        assert!(centre[2] > 150 && centre[0] < 60, "{centre:?}");
    }

    #[test]
    fn layer_is_transparent_outside_the_badge() {
        let logo = RgbaImage::from_pixel(300, 100, Rgba([0, 0, 0, 255]));
        let layer = render_badge_layer(1000, 800, &logo, &WatermarkConfig::default()).unwrap();
        assert_eq!(layer.dimensions(), (1000, 800));
        assert_eq!(layer.get_pixel(500, 400)[3], 0);
        assert_eq!(layer.get_pixel(775, 720)[3], 0);
        assert_eq!(layer.get_pixel(990, 790)[3], 0);
        // Top edge of the badge, mid-span.
        assert_eq!(*layer.get_pixel(878, 676), Rgba([255, 255, 255, 220]));
        // Logo area.
        assert_eq!(layer.get_pixel(878, 728)[3], 255);
    }

    #[test]
    fn layer_survives_a_tiny_base() {
        let logo = RgbaImage::from_pixel(64, 64, Rgba([200, 0, 0, 255]));
        let layer = render_badge_layer(3, 2, &logo, &WatermarkConfig::default()).unwrap();
        assert_eq!(layer.dimensions(), (3, 2));
    }
}
