use std::path::PathBuf;

use thiserror::Error;

use crate::format::ImageFormat;

/// Failure reported by a codec back-end (decoder, property reader or writer).
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong during a conversion.
///
/// Every step fails fast with one of these, except metadata capture
/// (degrades to no metadata) and source deletion (best-effort).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("destination file already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("cannot overwrite destination file {}: {source}", path.display())]
    CannotOverwrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read image {}: {source}", path.display())]
    FailedToReadImage {
        path: PathBuf,
        #[source]
        source: BackendError,
    },

    /// Neither the settings, the source type nor the destination extension name a known format
    #[error("unsupported image format")]
    UnsupportedFormat,

    /// Settings reached the encoder without a resolved format
    #[error("image format was not resolved before encoding")]
    UnknownImageFormat,

    #[error("failed to create {format} image file {}: {source}", path.display())]
    FailedToCreateImageFile {
        path: PathBuf,
        format: ImageFormat,
        #[source]
        source: BackendError,
    },

    #[error("failed to save {format} image to {}", path.display())]
    FailedToSaveImage {
        path: PathBuf,
        format: ImageFormat,
        #[source]
        source: Option<BackendError>,
    },
}
