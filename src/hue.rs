//! Dominant-hue extraction from the subject's visible pixels.

use std::fmt;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::config::HueConfig;

/// Outcome of hue analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantHue {
    /// Start of the most frequent hue bucket, in degrees.
    Bucket(u16),
    /// No opaque pixel carried a usable hue.
    Neutral,
}

impl fmt::Display for DominantHue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket(deg) => write!(f, "{deg}\u{b0}"),
            Self::Neutral => f.write_str("neutral"),
        }
    }
}

/// Convert 8-bit RGB to HSV with hue in `[0, 360)` and saturation/value in `[0, 1]`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    // rem_euclid can round up to exactly 6.0 for tiny negative inputs.
    if h >= 360.0 {
        h -= 360.0;
    }

    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

/// Floor a hue angle to the start of its bucket.
#[must_use]
pub fn bucket(hue: f32, width: u16) -> u16 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (hue / f32::from(width)).floor() as u16;
    index * width
}

/// Find the most frequent hue bucket among the subject's visible, colourful pixels.
///
/// The subject is resampled to a `sample_grid` square with Lanczos filtering,
/// then pixels at or below `alpha_cutoff` are dropped along with those too
/// grey, too dark or too bright to carry hue. Ties go to the bucket first seen
/// in row-major scan order.
#[must_use]
pub fn dominant_hue(subject: &RgbaImage, config: &HueConfig) -> DominantHue {
    if subject.width() == 0 || subject.height() == 0 {
        return DominantHue::Neutral;
    }

    let grid = config.sample_grid;
    let sample = imageops::resize(subject, grid, grid, FilterType::Lanczos3);

    // Insertion-ordered counts; at most 360 / bucket_width entries.
    let mut counts: Vec<(u16, u32)> = Vec::new();
    let mut opaque = 0u32;

    for px in sample.pixels() {
        let [r, g, b, a] = px.0;
        if a <= config.alpha_cutoff {
            continue;
        }
        opaque += 1;

        let (h, s, v) = rgb_to_hsv(r, g, b);
        if s <= config.min_saturation || v <= config.min_value || v >= config.max_value {
            continue;
        }

        let key = bucket(h, config.bucket_width);
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut best: Option<(u16, u32)> = None;
    for &(key, n) in &counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((key, n));
        }
    }

    log::debug!(
        "hue analysis: {opaque} opaque samples, {} buckets, winner {best:?}",
        counts.len()
    );

    best.map_or(DominantHue::Neutral, |(key, _)| DominantHue::Bucket(key))
}
