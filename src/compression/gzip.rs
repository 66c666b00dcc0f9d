//! Handler for gzip compressed archives

use std::io::Read;
use flate2::read::MultiGzDecoder;
use log::debug;
use crate::dataset::errors::DatasetResult;
use super::handler::CompressionHandler;

/// Gzip handler
///
/// Uses a multi-member decoder, since concatenated gzip streams are
/// common for archives produced by parallel compressors.
pub struct GzipHandler;

impl CompressionHandler for GzipHandler {
    fn decoder<'a>(&self, reader: Box<dyn Read + 'a>) -> DatasetResult<Box<dyn Read + 'a>> {
        debug!("Opening gzip decoder");
        Ok(Box::new(MultiGzDecoder::new(reader)))
    }

    fn name(&self) -> &'static str {
        "Gzip"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".tar.gz", ".tgz"]
    }
}
