//! Custom error types for dataset access

use std::fmt;
use std::io;

/// Dataset-specific error types
#[derive(Debug)]
pub enum DatasetError {
    /// I/O error while opening or reading the archive
    IoError(io::Error),
    /// No archive member at the expected path
    NotFound(String),
    /// Image member whose name does not follow the filename encoding
    MalformedFilename(String),
    /// Plate code not in metadata form
    InvalidPlate(String),
    /// Member bytes could not be decoded as an image
    DecodeError(image::ImageError),
    /// Metadata table could not be read
    MetadataError(String),
    /// Configuration could not be parsed
    ConfigError(String),
    /// Unknown archive compression
    UnsupportedCompression(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::IoError(e) => write!(f, "I/O error: {}", e),
            DatasetError::NotFound(path) => write!(f, "Archive member not found: {}", path),
            DatasetError::MalformedFilename(name) => write!(f, "Malformed image filename: {}", name),
            DatasetError::InvalidPlate(plate) => write!(f, "Invalid plate code: {}", plate),
            DatasetError::DecodeError(e) => write!(f, "Image decode error: {}", e),
            DatasetError::MetadataError(msg) => write!(f, "Metadata error: {}", msg),
            DatasetError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            DatasetError::UnsupportedCompression(name) => write!(f, "Unsupported archive compression: {}", name),
            DatasetError::GenericError(msg) => write!(f, "Dataset error: {}", msg),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::IoError(e) => Some(e),
            DatasetError::DecodeError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(error: io::Error) -> Self {
        DatasetError::IoError(error)
    }
}

impl From<image::ImageError> for DatasetError {
    fn from(error: image::ImageError) -> Self {
        DatasetError::DecodeError(error)
    }
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

impl From<String> for DatasetError {
    fn from(msg: String) -> Self {
        DatasetError::GenericError(msg)
    }
}
