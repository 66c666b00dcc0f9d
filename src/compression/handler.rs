//! Compression handler trait definition

use std::io::Read;
use crate::dataset::errors::DatasetResult;

/// Strategy trait for reading differently compressed archives
pub trait CompressionHandler: Send + Sync {
    /// Wrap a raw archive stream in a decoder yielding plain tar bytes
    fn decoder<'a>(&self, reader: Box<dyn Read + 'a>) -> DatasetResult<Box<dyn Read + 'a>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// File name endings this handler claims, longest first
    fn extensions(&self) -> &'static [&'static str];

    /// Whether decoded offsets are also offsets into the raw file
    fn is_seekable(&self) -> bool {
        false
    }
}
