//! Handler for ZSTD compressed archives

use std::io::Read;
use log::{debug, warn};
use crate::dataset::errors::{DatasetError, DatasetResult};
use super::handler::CompressionHandler;

/// ZSTD handler
pub struct ZstdHandler {
    /// Log2 of the largest decoder window accepted
    window_log_max: Option<u32>,
}

impl ZstdHandler {
    pub const NAME: &'static str = "ZSTD";

    /// Create a new ZSTD handler with the library's default window limit
    pub fn new() -> Self {
        ZstdHandler {
            window_log_max: None
        }
    }

    /// Create a handler that accepts frames written with `--long`
    pub fn with_window_log_max(window_log_max: u32) -> Self {
        ZstdHandler {
            window_log_max: Some(window_log_max.clamp(10, 31))
        }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decoder<'a>(&self, reader: Box<dyn Read + 'a>) -> DatasetResult<Box<dyn Read + 'a>> {
        debug!("Opening ZSTD decoder (window_log_max: {:?})", self.window_log_max);
        let mut decoder = match zstd::stream::read::Decoder::new(reader) {
            Ok(decoder) => decoder,
            Err(e) => {
                warn!("ZSTD decoder initialisation error: {}", e);
                return Err(DatasetError::IoError(e));
            }
        };

        if let Some(window_log_max) = self.window_log_max {
            decoder.window_log_max(window_log_max)?;
        }

        Ok(Box::new(decoder))
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".tar.zst", ".tzst"]
    }
}
