//! Error types for the gallery renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning, rendering or delivering a page
#[derive(Error, Debug)]
pub enum Error {
    /// No grid shape can hold the items under the configured caps
    #[error("Invalid layout constraints: {0}")]
    InvalidLayout(String),

    /// A font or background asset could not be loaded
    #[error("Failed to load asset: {0}")]
    AssetLoad(String),

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// A rendered page could not be encoded
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Network error while fetching covers
    #[error("Network error: {0}")]
    Network(String),

    /// Filesystem error (cache, manifest, output)
    #[error("I/O error: {0}")]
    Io(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => Error::Decode(e.to_string()),
            image::ImageError::Encoding(e) => Error::Encode(e.to_string()),
            image::ImageError::IoError(e) => Error::Io(e.to_string()),
            other => Error::Other(other.to_string()),
        }
    }
}
