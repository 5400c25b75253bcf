//! Tunable constants, overridable at startup from a JSON file.
//!
//! Every section implements [`Default`] with the stock values, and missing
//! fields in an override file fall back to those defaults:
//!
//! ```json
//! { "vignette_strength": 0.35, "watermark": { "scale": 0.12 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::palette::PaletteTable;

/// Largest accepted hue sampling grid side.
pub const MAX_SAMPLE_GRID: u32 = 4096;

/// Largest accepted unsharp-mask sigma.
pub const MAX_SHARPEN_SIGMA: f32 = 50.0;

/// Parameters for dominant-hue analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HueConfig {
    /// Side of the square grid the subject is resampled to before sampling.
    pub sample_grid: u32,
    /// Pixels with alpha at or below this value are treated as background.
    pub alpha_cutoff: u8,
    /// Width of a hue bucket in degrees.
    pub bucket_width: u16,
    /// Samples need saturation strictly above this.
    pub min_saturation: f32,
    /// Samples need value strictly above this.
    pub min_value: f32,
    /// Samples need value strictly below this.
    pub max_value: f32,
}

impl Default for HueConfig {
    fn default() -> Self {
        Self {
            sample_grid: 80,
            alpha_cutoff: 128,
            bucket_width: 10,
            min_saturation: 0.15,
            min_value: 0.15,
            max_value: 0.95,
        }
    }
}

/// Geometry and fill of the watermark badge, as ratios of the base image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Scaled logo width as a fraction of the base width.
    pub scale: f64,
    /// Padding as a fraction of the larger scaled logo side.
    pub padding: f64,
    /// Corner radius as a fraction of the badge height.
    pub corner_radius: f64,
    /// Distance from the bottom-right corner as a fraction of the base width.
    pub margin: f64,
    /// Alpha of the white badge fill.
    pub fill_alpha: u8,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            scale: 0.15,
            padding: 0.18,
            corner_radius: 0.22,
            margin: 0.02,
            fill_alpha: 220,
        }
    }
}

/// Unsharp-mask settings for the optional cutout edge pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenConfig {
    /// Gaussian sigma of the blur used by the mask.
    pub sigma: f32,
    /// Minimum channel difference before sharpening applies.
    pub threshold: i32,
}

impl Default for SharpenConfig {
    fn default() -> Self {
        Self {
            sigma: 1.2,
            threshold: 3,
        }
    }
}

/// All constants consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Backdrop presets and neutral fallback.
    pub palettes: PaletteTable,
    /// Dominant-hue analysis parameters.
    pub hue: HueConfig,
    /// Vignette opacity factor at normalized distance 1.
    pub vignette_strength: f32,
    /// Watermark badge parameters.
    pub watermark: WatermarkConfig,
    /// Edge sharpening parameters.
    pub sharpen: SharpenConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            palettes: PaletteTable::default(),
            hue: HueConfig::default(),
            vignette_strength: 0.28,
            watermark: WatermarkConfig::default(),
            sharpen: SharpenConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Load overrides from a JSON file, filling gaps with stock values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::Config`] if
    /// it is not valid JSON for this schema, and [`Error::InvalidConfig`] if a
    /// value is out of range.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| match e {
            Error::Config { source, .. } => Error::Config {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse overrides from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed JSON and
    /// [`Error::InvalidConfig`] if a value is out of range.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|source| Error::Config {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first offending value.
    pub fn validate(&self) -> Result<()> {
        let hue = &self.hue;
        if !(1..=MAX_SAMPLE_GRID).contains(&hue.sample_grid) {
            return invalid(&format!(
                "hue.sample_grid must be in 1..={MAX_SAMPLE_GRID}, got {}",
                hue.sample_grid
            ));
        }
        if !(1..=360).contains(&hue.bucket_width) {
            return invalid("hue.bucket_width must be in 1..=360");
        }
        for (name, v) in [
            ("hue.min_saturation", hue.min_saturation),
            ("hue.min_value", hue.min_value),
            ("hue.max_value", hue.max_value),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return invalid(&format!("{name} must be within [0, 1], got {v}"));
            }
        }
        if hue.min_value >= hue.max_value {
            return invalid("hue.min_value must be below hue.max_value");
        }
        if !(0.0..=1.0).contains(&self.vignette_strength) {
            return invalid("vignette_strength must be within [0, 1]");
        }

        let wm = &self.watermark;
        for (name, v) in [
            ("watermark.scale", wm.scale),
            ("watermark.padding", wm.padding),
            ("watermark.corner_radius", wm.corner_radius),
            ("watermark.margin", wm.margin),
        ] {
            if !v.is_finite() || v < 0.0 {
                return invalid(&format!("{name} must be a non-negative number, got {v}"));
            }
        }
        if wm.scale <= 0.0 || wm.scale > 1.0 {
            return invalid("watermark.scale must be within (0, 1]");
        }
        if wm.corner_radius > 0.5 {
            return invalid("watermark.corner_radius cannot exceed half the badge height");
        }

        let sigma = self.sharpen.sigma;
        if !sigma.is_finite() || sigma <= 0.0 || sigma > MAX_SHARPEN_SIGMA {
            return invalid(&format!(
                "sharpen.sigma must be within (0, {MAX_SHARPEN_SIGMA}], got {sigma}"
            ));
        }

        let palettes = &self.palettes;
        for p in palettes.presets.iter().chain(std::iter::once(&palettes.neutral)) {
            if p.name.is_empty() {
                return invalid("palette names cannot be empty");
            }
            if let Some(r) = p.hue_range {
                if r.low >= 360 || r.high >= 360 {
                    return invalid(&format!("palette {} has a hue bound outside [0, 360)", p.name));
                }
            }
        }
        Ok(())
    }

    /// Serialize as pretty JSON, suitable as a starting override file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

fn invalid(msg: &str) -> Result<()> {
    Err(Error::InvalidConfig(msg.to_string()))
}
