//! Dataset accessor: single and bulk image lookups

use image::{DynamicImage, ImageFormat};
use log::{debug, info};

use crate::dataset::archive::ArchiveHandle;
use crate::dataset::codec::FilenameCodec;
use crate::dataset::config::DatasetConfig;
use crate::dataset::errors::{DatasetError, DatasetResult};
use crate::dataset::fetch_all::FetchAll;
use crate::dataset::index::ArchiveIndex;
use crate::dataset::key::ImageKey;
use crate::dataset::metadata::MetadataTable;

/// Read access to the images of one dataset archive
///
/// The archive is opened and indexed once in [`DatasetAccessor::open`] and
/// closed when the accessor is dropped. Lookups take `&mut self` because
/// they share the underlying file position.
pub struct DatasetAccessor {
    config: DatasetConfig,
    codec: FilenameCodec,
    archive: ArchiveHandle,
    index: ArchiveIndex,
}

impl DatasetAccessor {
    /// Open and index the archive named by `config`
    pub fn open(config: DatasetConfig) -> DatasetResult<Self> {
        let mut archive = ArchiveHandle::open(
            &config.archive_path,
            &config.compression,
            config.zstd_window_log_max,
        )?;
        let codec = FilenameCodec::new(&config);
        let index = ArchiveIndex::build(archive.stream()?, &codec)?;

        info!(
            "Dataset {} ready: {} images across {} targets",
            config.archive_path.display(),
            index.image_count(),
            index.targets().len()
        );

        Ok(DatasetAccessor {
            config,
            codec,
            archive,
            index,
        })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    pub fn codec(&self) -> &FilenameCodec {
        &self.codec
    }

    /// Name of the archive's compression
    pub fn compression_name(&self) -> &'static str {
        self.archive.compression_name()
    }

    /// Describe the opened archive
    ///
    /// # Returns
    /// Multi-line report of archive path, compression, member counts,
    /// targets and plates
    pub fn summary(&self) -> String {
        let index = &self.index;

        let mut result = "Dataset Summary:\n".to_string();
        result.push_str(&format!("  Archive: {}\n", self.config.archive_path.display()));
        result.push_str(&format!("  Compression: {}\n", self.compression_name()));
        result.push_str(&format!("  Members: {}\n", index.len()));
        result.push_str(&format!("  Images: {}\n", index.image_count()));
        result.push_str(&format!("  Malformed image names: {}\n", index.malformed_count()));

        let targets = index.targets();
        result.push_str(&format!("  Targets ({}): {}\n", targets.len(), targets.join(", ")));
        let plates = index.plates();
        result.push_str(&format!("  Plates ({}): {}\n", plates.len(), plates.join(", ")));

        result
    }

    /// Member path an image is stored under
    pub fn member_path(&self, key: &ImageKey) -> DatasetResult<String> {
        self.codec.member_path(key)
    }

    /// Load the single image identified by its metadata fields
    ///
    /// # Arguments
    /// * `target` - Mechanism of action, e.g. "adrenoceptor"
    /// * `plate` - Plate in metadata form, e.g. "P1"
    /// * `cell_id` - Identification number of the cell
    /// * `replicate` - Replicate number
    /// * `well` - Well relative to the well plate, e.g. "C10"
    /// * `field` - Field number
    ///
    /// The plate must carry the metadata letter. A plate already in archive
    /// form ("S1") is rejected with `InvalidPlate` rather than used as is.
    ///
    /// # Returns
    /// The decoded image, or `NotFound` naming the expected member path
    pub fn fetch_one(
        &mut self,
        target: &str,
        plate: &str,
        cell_id: u32,
        replicate: u32,
        well: &str,
        field: u32,
    ) -> DatasetResult<DynamicImage> {
        self.fetch(&ImageKey::new(target, plate, cell_id, replicate, well, field))
    }

    /// Load the single image identified by `key`
    pub fn fetch(&mut self, key: &ImageKey) -> DatasetResult<DynamicImage> {
        let path = self.codec.member_path(key)?;
        debug!("Looking up {}", path);

        let member = self
            .index
            .get_by_path(&path)
            .ok_or_else(|| DatasetError::NotFound(path.clone()))?;

        let bytes = self.archive.read_member(member)?;
        decode_image(&bytes)
    }

    /// Lazily load every archive image that matches a row of `metadata`
    ///
    /// The iterator walks the archive once, in archive order, and cannot be
    /// restarted.
    pub fn fetch_all<'a>(&'a mut self, metadata: &'a MetadataTable) -> DatasetResult<FetchAll<'a>> {
        let DatasetAccessor { archive, index, .. } = self;
        let reader = archive.sequential()?;
        Ok(FetchAll::new(reader, index.members(), metadata))
    }
}

/// Decode member bytes as a TIFF image
pub(crate) fn decode_image(bytes: &[u8]) -> DatasetResult<DynamicImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Tiff)?)
}
