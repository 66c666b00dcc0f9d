//! Factory for creating compression handlers

use std::fs::File;
use std::io::Read;
use std::path::Path;
use log::debug;
use crate::dataset::errors::{DatasetError, DatasetResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::gzip::GzipHandler;
use super::zstd::ZstdHandler;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Get a handler by name
    pub fn get_handler_by_name(name: &str) -> DatasetResult<Box<dyn CompressionHandler>> {
        match name.to_lowercase().as_str() {
            "uncompressed" | "none" | "tar" => Ok(Box::new(UncompressedHandler)),
            "gzip" | "gz" | "tgz" => Ok(Box::new(GzipHandler)),
            "zstd" | "zst" => Ok(Box::new(ZstdHandler::new())),
            _ => Err(DatasetError::UnsupportedCompression(name.to_string()))
        }
    }

    /// Pick a handler from the archive's file name, if its ending is known
    pub fn for_path(path: &Path) -> Option<Box<dyn CompressionHandler>> {
        let file_name = path.file_name()?.to_str()?.to_lowercase();
        Self::get_available_handlers()
            .into_iter()
            .find(|h| h.extensions().iter().any(|ext| file_name.ends_with(ext)))
    }

    /// Pick a handler from the first bytes of a stream
    pub fn detect(magic: &[u8]) -> Box<dyn CompressionHandler> {
        if magic.starts_with(&ZSTD_MAGIC) {
            Box::new(ZstdHandler::new())
        } else if magic.starts_with(&GZIP_MAGIC) {
            Box::new(GzipHandler)
        } else {
            Box::new(UncompressedHandler)
        }
    }

    /// Resolve the handler for an archive
    ///
    /// `name` is a configured compression name or "auto". With "auto" the
    /// file name is consulted first and the magic bytes second. A
    /// `zstd_window_log_max` only affects a zstd handler.
    pub fn resolve(name: &str,
                   path: &Path,
                   zstd_window_log_max: Option<u32>) -> DatasetResult<Box<dyn CompressionHandler>> {
        let handler = if !name.eq_ignore_ascii_case("auto") {
            Self::get_handler_by_name(name)?
        } else if let Some(handler) = Self::for_path(path) {
            debug!("Compression {} chosen from file name {}", handler.name(), path.display());
            handler
        } else {
            let mut magic = Vec::with_capacity(ZSTD_MAGIC.len());
            File::open(path)?
                .take(ZSTD_MAGIC.len() as u64)
                .read_to_end(&mut magic)?;
            let handler = Self::detect(&magic);
            debug!("Compression {} detected from magic bytes {:02x?}", handler.name(), magic);
            handler
        };

        match zstd_window_log_max {
            Some(window_log_max) if handler.name() == ZstdHandler::NAME => {
                Ok(Box::new(ZstdHandler::with_window_log_max(window_log_max)))
            }
            _ => Ok(handler),
        }
    }

    /// Get all available compression handlers
    pub fn get_available_handlers() -> Vec<Box<dyn CompressionHandler>> {
        vec![
            Box::new(GzipHandler),
            Box::new(ZstdHandler::new()),
            Box::new(UncompressedHandler)
        ]
    }
}
