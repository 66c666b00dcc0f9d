//! Handler for plain tar archives

use std::io::Read;
use crate::dataset::errors::DatasetResult;
use super::handler::CompressionHandler;

/// Uncompressed tar handler
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decoder<'a>(&self, reader: Box<dyn Read + 'a>) -> DatasetResult<Box<dyn Read + 'a>> {
        Ok(reader)
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".tar"]
    }

    fn is_seekable(&self) -> bool {
        true
    }
}
