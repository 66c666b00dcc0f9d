//! Owned handle on a dataset archive file

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use log::{debug, info};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::dataset::errors::{DatasetError, DatasetResult};
use crate::dataset::index::IndexedMember;
use crate::io::SequentialReader;

/// An open archive and the decoder used to read it
///
/// The file is closed when the handle is dropped.
pub struct ArchiveHandle {
    path: PathBuf,
    file: File,
    handler: Box<dyn CompressionHandler>,
}

impl ArchiveHandle {
    /// Open an archive, resolving its compression from `compression`
    ///
    /// # Arguments
    /// * `path` - Archive on disk
    /// * `compression` - Compression name, or "auto"
    /// * `zstd_window_log_max` - Largest zstd window accepted, if not the default
    pub fn open(path: &Path, compression: &str, zstd_window_log_max: Option<u32>) -> DatasetResult<Self> {
        let handler = CompressionFactory::resolve(compression, path, zstd_window_log_max)?;
        Self::with_handler(path, handler)
    }

    /// Open an archive with an explicit handler
    pub fn with_handler(path: &Path, handler: Box<dyn CompressionHandler>) -> DatasetResult<Self> {
        let file = File::open(path).map_err(|e| {
            DatasetError::IoError(std::io::Error::new(
                e.kind(),
                format!("cannot open archive {}: {}", path.display(), e),
            ))
        })?;
        info!("Opened archive {} ({})", path.display(), handler.name());

        Ok(ArchiveHandle {
            path: path.to_path_buf(),
            file,
            handler,
        })
    }

    /// Path the archive was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the compression in use
    pub fn compression_name(&self) -> &'static str {
        self.handler.name()
    }

    /// A fresh decoded stream over the whole archive
    pub fn stream(&mut self) -> DatasetResult<Box<dyn Read + '_>> {
        self.file.seek(SeekFrom::Start(0))?;
        self.handler.decoder(Box::new(BufReader::new(&mut self.file)))
    }

    /// A forward-only reader over a fresh decoded stream
    pub fn sequential(&mut self) -> DatasetResult<SequentialReader<'_>> {
        Ok(SequentialReader::new(self.stream()?))
    }

    /// Read the data of one member
    ///
    /// Plain archives are read in place. Compressed archives are decoded
    /// from the start up to the member.
    pub fn read_member(&mut self, member: &IndexedMember) -> DatasetResult<Vec<u8>> {
        debug!("Reading {} ({} bytes at offset {})", member.path, member.size, member.offset);

        if self.handler.is_seekable() {
            self.file.seek(SeekFrom::Start(member.offset))?;
            let mut buffer = Vec::with_capacity(member.size as usize);
            (&mut self.file).take(member.size).read_to_end(&mut buffer)?;
            if (buffer.len() as u64) < member.size {
                return Err(DatasetError::IoError(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("member {} truncated", member.path),
                )));
            }
            return Ok(buffer);
        }

        Ok(self.sequential()?.read_at(member.offset, member.size)?)
    }
}
