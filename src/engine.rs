//! Pipeline driver and file-level processing.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{imageops, RgbaImage};

use crate::badge;
use crate::compositing;
use crate::config::StudioConfig;
use crate::error::{Error, Result};
use crate::gradient;
use crate::hue::{self, DominantHue};
use crate::palette::Palette;
use crate::vignette;

/// Options controlling file processing behavior.
///
/// Log verbosity is not an option here; it follows whatever `log` backend
/// the caller installs.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Stamp the watermark badge when a logo is available.
    pub add_watermark: bool,
    /// Run the unsharp-mask edge pass on the cutout before rendering.
    pub sharpen: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            add_watermark: true,
            sharpen: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Name of the backdrop palette, when rendering got that far.
    pub palette: Option<String>,
    /// Whether a watermark badge was stamped.
    pub watermarked: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            palette: None,
            watermarked: false,
            message,
        }
    }
}

/// A finished photo together with the analysis that shaped it.
#[derive(Debug, Clone)]
pub struct Rendering {
    /// Final RGBA image, same size as the subject.
    pub image: RgbaImage,
    /// Dominant hue found in the subject.
    pub hue: DominantHue,
    /// Name of the backdrop palette used.
    pub palette: String,
    /// Whether the watermark badge was composited.
    pub watermarked: bool,
}

/// The studio engine holding validated configuration and the watermark logo.
///
/// Create once and share across threads; rendering never mutates the engine.
#[derive(Debug, Clone, Default)]
pub struct StudioEngine {
    config: StudioConfig,
    logo: Option<RgbaImage>,
}

impl StudioEngine {
    /// Create an engine from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration fails validation.
    pub fn new(config: StudioConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, logo: None })
    }

    /// Attach the watermark logo. `None` disables the badge stage.
    #[must_use]
    pub fn with_logo(mut self, logo: Option<RgbaImage>) -> Self {
        self.logo = logo.filter(|l| l.width() > 0 && l.height() > 0);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// The attached logo, if any.
    #[must_use]
    pub fn logo(&self) -> Option<&RgbaImage> {
        self.logo.as_ref()
    }

    /// Find the subject's dominant hue and the palette it maps to.
    #[must_use]
    pub fn analyze(&self, subject: &RgbaImage) -> (DominantHue, &Palette) {
        let hue = hue::dominant_hue(subject, &self.config.hue);
        let palette = self.config.palettes.select(hue);
        log::debug!("dominant hue {hue} -> palette {}", palette.name);
        (hue, palette)
    }

    /// Build the gradient-plus-vignette backdrop for `palette`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] only on an internal layering bug.
    pub fn backdrop(&self, width: u32, height: u32, palette: &Palette) -> Result<RgbaImage> {
        let gradient = gradient::vertical_gradient(width, height, palette.top, palette.bottom);
        let strength = self.config.vignette_strength;
        let vignette = vignette::radial_vignette(width, height, palette.vignette, strength);
        compositing::over(&vignette, &gradient)
    }

    /// Render the subject with the engine's own logo.
    ///
    /// # Errors
    ///
    /// See [`StudioEngine::render_with_logo`].
    pub fn render(&self, subject: &RgbaImage, add_watermark: bool) -> Result<Rendering> {
        self.render_with_logo(subject, self.logo.as_ref(), add_watermark)
    }

    /// Place `subject` on a hue-matched backdrop and optionally stamp `logo`.
    ///
    /// The badge stage is skipped when `add_watermark` is false or no usable
    /// logo is given; the result is then exactly the backdrop-plus-subject
    /// composite.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySubject`] if the subject has a zero dimension.
    pub fn render_with_logo(
        &self,
        subject: &RgbaImage,
        logo: Option<&RgbaImage>,
        add_watermark: bool,
    ) -> Result<Rendering> {
        let (width, height) = subject.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::EmptySubject { width, height });
        }

        let (hue, palette) = self.analyze(subject);
        let backdrop = self.backdrop(width, height, palette)?;
        let mut image = compositing::over(subject, &backdrop)?;

        let mut watermarked = false;
        if add_watermark {
            let layer = logo.and_then(|l| {
                badge::render_badge_layer(width, height, l, &self.config.watermark)
            });
            if let Some(layer) = layer {
                image = compositing::over(&layer, &image)?;
                watermarked = true;
            } else {
                log::debug!("no usable logo, skipping watermark");
            }
        }

        Ok(Rendering {
            image,
            hue,
            palette: palette.name.clone(),
            watermarked,
        })
    }

    /// Process a single image file: load, optionally sharpen, render, save.
    ///
    /// Returns a [`ProcessResult`] indicating success or failure. A failed
    /// run leaves nothing at `output`.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        opts: &ProcessOptions,
    ) -> ProcessResult {
        let dyn_img = match image::open(input) {
            Ok(img) => img,
            Err(e) => return ProcessResult::failed(input, format!("Failed to load: {e}")),
        };

        if !dyn_img.color().has_alpha() {
            log::warn!(
                "{} has no alpha channel; the whole frame is treated as subject",
                input.display()
            );
        }

        let mut subject = dyn_img.to_rgba8();
        if opts.sharpen {
            let s = &self.config.sharpen;
            subject = imageops::unsharpen(&subject, s.sigma, s.threshold);
        }

        let rendering = match self.render(&subject, opts.add_watermark) {
            Ok(r) => r,
            Err(e) => return ProcessResult::failed(input, format!("Failed to render: {e}")),
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return ProcessResult::failed(
                        input,
                        format!("Failed to create output directory: {e}"),
                    );
                }
            }
        }

        if let Err(e) = save_png(&rendering.image, output) {
            return ProcessResult::failed(input, format!("Failed to save: {e}"));
        }

        ProcessResult {
            path: input.to_path_buf(),
            success: true,
            message: format!(
                "{} backdrop (hue {}){}",
                rendering.palette,
                rendering.hue,
                if rendering.watermarked { ", watermarked" } else { "" }
            ),
            palette: Some(rendering.palette),
            watermarked: rendering.watermarked,
        }
    }

    /// Process all supported images in a directory.
    ///
    /// Each `name.ext` is written as `name.png` under `output_dir`. Uses
    /// parallel iteration when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failed(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let job = |input_path: &PathBuf| {
            let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
            let output_path = output_dir.join(format!("{stem}.png"));
            self.process_file(input_path, &output_path, opts)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(job).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries.iter().map(job).collect()
        }
    }
}

/// Render a product photo with the stock configuration.
///
/// `logo` may be `None`, in which case no badge is drawn. The output has the
/// subject's dimensions.
///
/// # Errors
///
/// Returns [`Error::EmptySubject`] if the subject has a zero dimension.
pub fn render_product_photo(
    subject: &RgbaImage,
    logo: Option<&RgbaImage>,
    add_watermark: bool,
) -> Result<RgbaImage> {
    StudioEngine::default()
        .render_with_logo(subject, logo, add_watermark)
        .map(|r| r.image)
}

/// Load the watermark logo, returning `None` when it is missing or unreadable.
///
/// A missing logo only disables the badge, so failures are logged rather than
/// returned.
#[must_use]
pub fn load_logo(path: &Path) -> Option<RgbaImage> {
    if !path.exists() {
        log::warn!("watermark logo {} not found; badge disabled", path.display());
        return None;
    }
    match image::open(path) {
        Ok(img) if img.width() > 0 && img.height() > 0 => Some(img.to_rgba8()),
        Ok(_) => {
            log::warn!("watermark logo {} is empty; badge disabled", path.display());
            None
        }
        Err(e) => {
            log::warn!(
                "cannot read watermark logo {}: {e}; badge disabled",
                path.display()
            );
            None
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGBA image as a lossless PNG.
///
/// The data is written to a temporary file beside `path` and renamed into
/// place, so a failed save never leaves a truncated file behind.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] unless `path` ends in `.png`, or an
/// I/O or encoding error if writing fails.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => {}
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "{} (output is always PNG)",
                other.unwrap_or("no extension")
            )));
        }
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".studio-")
        .suffix(".png.part")
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let encoder = PngEncoder::new_with_quality(
            &mut writer,
            CompressionType::Fast,
            PngFilterType::NoFilter,
        );
        img.write_with_encoder(encoder)?;
        writer.flush()?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"shoe.jpg"` becomes `"shoe_studio.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_studio.png"))
}
