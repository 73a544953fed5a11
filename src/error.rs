use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with [`FootprintError`].
pub type FootprintResult<T> = std::result::Result<T, FootprintError>;

/// Error types that can occur while processing a foot photograph.
///
/// Only [`FootprintError::ImageLoad`] and [`FootprintError::NoRegionFound`] escape
/// the main pipeline. A missing logo is reported as
/// [`FootprintError::LogoUnavailable`] by [`crate::logo::load_logo`] and swallowed by
/// [`crate::logo::composite_logo`].
#[derive(Debug, Error)]
pub enum FootprintError {
    /// The source photograph is missing or cannot be decoded.
    #[error("Failed to load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Segmentation produced no usable contour.
    #[error("No foot-shaped region found in the image")]
    NoRegionFound,
    /// The logo asset is missing or cannot be decoded.
    #[error("Logo unavailable at {}: {source}", path.display())]
    LogoUnavailable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Mask dimensions do not match the image they select from.
    #[error("Mask size {found:?} does not match image size {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// Image encoding or decoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
