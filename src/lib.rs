//! Finish product cutouts for e-commerce listings.
//!
//! Given a subject whose alpha channel already separates it from its
//! background, this crate picks a studio gradient that complements the
//! subject's dominant hue, darkens the corners with a tinted vignette,
//! composites the subject on top and stamps a translucent watermark badge in
//! the bottom-right corner.
//!
//! # Quick Start
//!
//! ```no_run
//! use studio_backdrop::{load_logo, StudioConfig, StudioEngine};
//!
//! let engine = StudioEngine::new(StudioConfig::default())
//!     .expect("valid config")
//!     .with_logo(load_logo("logo.png".as_ref()));
//! let subject = image::open("cutout.png").unwrap().to_rgba8();
//! let rendering = engine.render(&subject, true).unwrap();
//! println!("palette: {}", rendering.palette);
//! rendering.image.save("listing.png").unwrap();
//! ```
//!
//! # Pipeline
//!
//! 1. [`hue::dominant_hue`] buckets the hue of visible, colourful pixels.
//! 2. [`PaletteTable::select`] maps the bucket to a preset, first match wins.
//! 3. [`gradient::vertical_gradient`] and [`vignette::radial_vignette`] build the backdrop.
//! 4. [`compositing::over`] stacks vignette, subject and badge layer in that order.
//! 5. [`badge::render_badge_layer`] draws the watermark when a logo is available.
//!
//! Every stage is a pure function of its inputs and the read-only
//! [`StudioConfig`], so one engine can serve many threads.

#![deny(missing_docs)]

pub mod badge;
pub mod compositing;
pub mod config;
mod engine;
pub mod error;
pub mod gradient;
pub mod hue;
pub mod palette;
pub mod vignette;

pub use config::StudioConfig;
pub use engine::{
    default_output_path, is_supported_image, load_logo, render_product_photo, save_png,
    ProcessOptions, ProcessResult, Rendering, StudioEngine,
};
pub use error::{Error, Result};
pub use hue::DominantHue;
pub use palette::{Palette, PaletteTable};
