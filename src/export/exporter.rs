//! Bulk image exporter

use std::fs;
use std::path::{Path, PathBuf};
use image::{DynamicImage, ImageFormat};
use log::{error, info, warn};

use crate::dataset::errors::{DatasetError, DatasetResult};
use crate::dataset::{DatasetAccessor, MetadataTable};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;
use crate::utils::string_utils::sanitize_file_stem;

/// Outcome of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Images written to disk
    pub written: usize,
    /// Items that failed to load or save
    pub failed: usize,
    /// Images that matched more than one metadata row
    pub ambiguous: usize,
}

/// Writes images matched by a metadata table to a directory tree
pub struct ImageExporter<'a> {
    /// Logger for recording operations
    logger: &'a Logger,
    /// Whether to draw a progress bar
    show_progress: bool,
}

impl<'a> ImageExporter<'a> {
    /// Create a new exporter
    ///
    /// # Arguments
    /// * `logger` - Logger for recording operations
    pub fn new(logger: &'a Logger) -> Self {
        ImageExporter {
            logger,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Export every image that matches a row of `metadata`
    ///
    /// Failures of individual images are logged and counted. A failed read
    /// ends the scan, and the export stops with what was written so far.
    ///
    /// # Arguments
    /// * `accessor` - Open dataset
    /// * `metadata` - Rows selecting the images
    /// * `output_dir` - Directory receiving one sub-directory per target
    /// * `format` - Output extension such as "tiff" or "png"
    ///
    /// # Returns
    /// Counts of written, failed and ambiguous images
    pub fn export_matches(&self,
                          accessor: &mut DatasetAccessor,
                          metadata: &MetadataTable,
                          output_dir: &Path,
                          format: &str) -> DatasetResult<ExportSummary> {
        let format = format.trim_start_matches('.').to_lowercase();
        if ImageFormat::from_extension(&format).is_none() {
            return Err(DatasetError::GenericError(format!("Unknown output format: {}", format)));
        }
        fs::create_dir_all(output_dir)?;

        info!("Exporting images for {} metadata rows to {}", metadata.len(), output_dir.display());

        let mut summary = ExportSummary::default();
        let mut fetch_all = accessor.fetch_all(metadata)?;

        let progress = if self.show_progress {
            ProgressTracker::new(fetch_all.pending() as u64, "Exporting images")
        } else {
            ProgressTracker::hidden()
        };

        for item in fetch_all.by_ref() {
            progress.increment(1);
            let fetched = match item {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!("Skipping archive member: {}", e);
                    summary.failed += 1;
                    continue;
                }
            };

            let path = output_path(output_dir, &fetched.target, &fetched.cell_code, &format);
            if path.exists() {
                warn!("Overwriting {}", path.display());
            }

            match save_image(&fetched.image, &path) {
                Ok(()) => {
                    summary.written += 1;
                    progress.set_message(&fetched.cell_code);
                }
                Err(e) => {
                    error!("Failed to write {}: {}", path.display(), e);
                    summary.failed += 1;
                }
            }
        }

        summary.ambiguous = fetch_all.ambiguous_matches();
        progress.finish();

        info!("Export finished: {} written, {} failed, {} ambiguous",
              summary.written, summary.failed, summary.ambiguous);
        self.logger.log_section("Export", &[
            ("output", output_dir.display().to_string()),
            ("written", summary.written.to_string()),
            ("failed", summary.failed.to_string()),
            ("ambiguous", summary.ambiguous.to_string()),
        ])?;

        Ok(summary)
    }
}

/// Destination of one exported image
pub(crate) fn output_path(output_dir: &Path, target: &str, cell_code: &str, format: &str) -> PathBuf {
    output_dir
        .join(sanitize_file_stem(target))
        .join(format!("{}.{}", sanitize_file_stem(cell_code), format))
}

/// Save an image, creating parent directories and choosing the format from
/// the file extension
pub fn save_image(image: &DynamicImage, path: &Path) -> DatasetResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    image.save(path)?;
    Ok(())
}
