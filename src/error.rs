//! Error types for the studio-backdrop crate.

use std::path::PathBuf;

/// Errors that can occur while rendering a product photo.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The subject raster has a zero dimension.
    #[error("subject image is empty ({width}x{height})")]
    EmptySubject {
        /// Subject width in pixels.
        width: u32,
        /// Subject height in pixels.
        height: u32,
    },

    /// Two layers handed to the compositor differ in size.
    ///
    /// Backgrounds are synthesized at the subject's exact size, so this
    /// indicates a bug rather than bad input.
    #[error(
        "layer size mismatch: top is {top_width}x{top_height}, \
         bottom is {bottom_width}x{bottom_height}"
    )]
    DimensionMismatch {
        /// Width of the upper layer.
        top_width: u32,
        /// Height of the upper layer.
        top_height: u32,
        /// Width of the lower layer.
        bottom_width: u32,
        /// Height of the lower layer.
        bottom_height: u32,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image decoding or encoding.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("jpeg".to_string());
        assert!(unsupported.to_string().contains("jpeg"));

        let empty = Error::EmptySubject {
            width: 0,
            height: 20,
        };
        assert!(empty.to_string().contains("0x20"));

        let mismatch = Error::DimensionMismatch {
            top_width: 10,
            top_height: 20,
            bottom_width: 30,
            bottom_height: 40,
        };
        let msg = mismatch.to_string();
        assert!(msg.contains("10x20"));
        assert!(msg.contains("30x40"));
    }

    #[test]
    fn config_error_names_the_file() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = Error::Config {
            path: PathBuf::from("studio.json"),
            source,
        };
        assert!(err.to_string().contains("studio.json"));
    }
}
