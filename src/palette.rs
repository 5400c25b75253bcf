//! Backdrop palettes and hue-driven palette selection.
//!
//! The table is a priority list, not a partition: ranges may overlap at their
//! boundaries and the first matching preset in declaration order wins.

use serde::{Deserialize, Serialize};

use crate::hue::DominantHue;

/// Inclusive hue interval in degrees.
///
/// When `low > high` the interval wraps through 0°, so `(340, 20)` covers
/// `340..=359` and `0..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueRange {
    /// Lower bound in degrees.
    pub low: u16,
    /// Upper bound in degrees.
    pub high: u16,
}

impl HueRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Whether `bucket` lies inside this range, applying the wrap rule.
    #[must_use]
    pub fn contains(&self, bucket: u16) -> bool {
        if self.low <= self.high {
            (self.low..=self.high).contains(&bucket)
        } else {
            bucket >= self.low || bucket <= self.high
        }
    }
}

/// A named backdrop colour scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Preset name, e.g. `rose_cream`.
    pub name: String,
    /// Hue interval claimed by this preset; `None` for the neutral fallback.
    pub hue_range: Option<HueRange>,
    /// Gradient colour at the top row.
    pub top: [u8; 3],
    /// Gradient colour at the bottom row.
    pub bottom: [u8; 3],
    /// Tint used by the corner vignette.
    pub vignette: [u8; 3],
}

impl Palette {
    fn preset(
        name: &str,
        range: HueRange,
        top: [u8; 3],
        bottom: [u8; 3],
        vignette: [u8; 3],
    ) -> Self {
        Self {
            name: name.to_string(),
            hue_range: Some(range),
            top,
            bottom,
            vignette,
        }
    }
}

/// Stock presets: name, hue range, top, bottom, vignette.
type PresetRow = (&'static str, (u16, u16), [u8; 3], [u8; 3], [u8; 3]);

const STOCK_PRESETS: [PresetRow; 10] = [
    ("rose_cream", (340, 20), [255, 245, 245], [240, 200, 200], [196, 150, 150]),
    ("ivory_blush", (0, 20), [255, 250, 240], [245, 215, 200], [200, 165, 150]),
    ("warm_sand", (20, 45), [250, 240, 225], [225, 200, 170], [180, 150, 120]),
    ("pale_gold", (45, 65), [255, 250, 225], [235, 220, 170], [190, 170, 120]),
    ("light_mint", (65, 90), [245, 255, 240], [205, 230, 200], [150, 180, 145]),
    ("soft_sage", (90, 150), [240, 248, 240], [195, 215, 195], [140, 165, 140]),
    ("light_aqua", (150, 200), [240, 252, 252], [190, 225, 225], [130, 170, 170]),
    ("pale_blue", (200, 240), [240, 246, 255], [195, 210, 240], [140, 155, 190]),
    ("lavender", (240, 290), [246, 240, 255], [210, 195, 235], [160, 145, 190]),
    ("soft_pink", (290, 340), [255, 242, 250], [240, 200, 225], [190, 145, 175]),
];

/// Ordered presets plus the neutral fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteTable {
    /// Presets scanned in order; the first match wins.
    pub presets: Vec<Palette>,
    /// Used when no dominant hue exists or nothing matches.
    pub neutral: Palette,
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self {
            presets: STOCK_PRESETS
                .iter()
                .map(|&(name, (low, high), top, bottom, vignette)| {
                    Palette::preset(name, HueRange::new(low, high), top, bottom, vignette)
                })
                .collect(),
            neutral: Palette {
                name: "neutral_white".to_string(),
                hue_range: None,
                top: [255, 255, 255],
                bottom: [225, 225, 225],
                vignette: [160, 160, 160],
            },
        }
    }
}

impl PaletteTable {
    /// Pick the palette for a dominant hue.
    ///
    /// `Neutral` short-circuits to the fallback. Otherwise presets are scanned
    /// in declaration order and the first whose range contains the bucket is
    /// returned, so hue 0 resolves to `rose_cream` even though `ivory_blush`
    /// also claims it.
    #[must_use]
    pub fn select(&self, hue: DominantHue) -> &Palette {
        let DominantHue::Bucket(bucket) = hue else {
            return &self.neutral;
        };
        self.presets
            .iter()
            .find(|p| p.hue_range.is_some_and(|r| r.contains(bucket)))
            .unwrap_or(&self.neutral)
    }

    /// Look up a preset (or the neutral palette) by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Palette> {
        self.presets
            .iter()
            .chain(std::iter::once(&self.neutral))
            .find(|p| p.name == name)
    }
}
