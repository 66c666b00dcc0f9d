use std::path::Path;
use image::DynamicImage;
use log::info;
use crate::dataset::errors::DatasetResult;
use crate::dataset::{DatasetAccessor, DatasetConfig, ImageKey, MetadataTable};
use crate::export::{ExportSummary, ImageExporter};
use crate::utils::logger::Logger;

/// Main interface to the CellKit library
pub struct CellKit {
    logger: Logger,
    accessor: DatasetAccessor,
}

impl CellKit {
    /// Open a dataset and create a CellKit instance
    ///
    /// # Arguments
    /// * `config` - Dataset layout and archive location
    /// * `log_file` - Optional path to log file, defaults to "cellkit.log"
    ///
    /// # Returns
    /// A CellKit instance or an error if the archive cannot be opened
    pub fn new(config: DatasetConfig, log_file: Option<&str>) -> DatasetResult<Self> {
        let log_path = log_file.unwrap_or("cellkit.log");
        let logger = Logger::new(log_path)?;
        let accessor = DatasetAccessor::open(config)?;
        Ok(CellKit { logger, accessor })
    }

    /// Open the archive at `archive_path` with the default layout
    pub fn open<P: AsRef<Path>>(archive_path: P, log_file: Option<&str>) -> DatasetResult<Self> {
        Self::new(DatasetConfig::for_archive(archive_path), log_file)
    }

    /// The underlying accessor
    pub fn accessor(&mut self) -> &mut DatasetAccessor {
        &mut self.accessor
    }

    /// Describe the opened archive
    pub fn summary(&self) -> String {
        self.accessor.summary()
    }

    /// Load one image by its metadata fields
    ///
    /// `plate` is in metadata form ("P1"); see [`DatasetAccessor::fetch_one`].
    ///
    /// # Returns
    /// The decoded image, `NotFound`, or `InvalidPlate` for an archive-form plate
    pub fn fetch_one(&mut self,
                     target: &str,
                     plate: &str,
                     cell_id: u32,
                     replicate: u32,
                     well: &str,
                     field: u32) -> DatasetResult<DynamicImage> {
        let key = ImageKey::new(target, plate, cell_id, replicate, well, field);
        info!("Fetching {}", key);
        let image = self.accessor.fetch(&key)?;
        self.logger.log(&format!("Fetched {} ({}x{})", key, image.width(), image.height()))?;
        Ok(image)
    }

    /// Export every image matched by a metadata CSV
    ///
    /// # Arguments
    /// * `metadata_csv` - CSV with target, cell_id, well, plate, field, replicate and cell_code columns
    /// * `output_dir` - Directory receiving `<target>/<cell_code>.<format>` files
    /// * `format` - Output extension such as "tiff" or "png"
    ///
    /// # Returns
    /// Counts of written, failed and ambiguous images
    pub fn fetch_all_into<P: AsRef<Path>, Q: AsRef<Path>>(&mut self,
                                                          metadata_csv: P,
                                                          output_dir: Q,
                                                          format: &str) -> DatasetResult<ExportSummary> {
        let metadata = MetadataTable::from_csv_path(metadata_csv)?;
        ImageExporter::new(&self.logger)
            .with_progress(false)
            .export_matches(&mut self.accessor, &metadata, output_dir.as_ref(), format)
    }
}
