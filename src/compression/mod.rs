//! Compression handling for dataset archives
//!
//! This module implements strategies for reading tar archives stored with
//! different outer compressions.

mod handler;
mod uncompressed;
mod gzip;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use gzip::GzipHandler;
pub use factory::CompressionFactory;
pub use self::zstd::ZstdHandler;
