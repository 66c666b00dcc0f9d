//! Bulk export command

use std::path::PathBuf;
use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::{config_from_args, required_arg};
use crate::dataset::{DatasetAccessor, DatasetConfig, DatasetResult, MetadataTable};
use crate::export::ImageExporter;
use crate::utils::logger::Logger;

/// Command for exporting every image a metadata CSV selects
pub struct ExportCommand<'a> {
    /// Dataset to open
    config: DatasetConfig,
    /// Metadata CSV selecting the images
    metadata_file: String,
    /// Directory receiving the images
    output_dir: PathBuf,
    /// Output image format
    format: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ExportCommand<'a> {
    /// Create a new export command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> DatasetResult<Self> {
        Ok(ExportCommand {
            config: config_from_args(args)?,
            metadata_file: required_arg(args, "metadata")?,
            output_dir: PathBuf::from(required_arg(args, "output-dir")?),
            format: args.get_one::<String>("format").cloned().unwrap_or_else(|| "tiff".to_string()),
            logger,
        })
    }
}

impl<'a> Command for ExportCommand<'a> {
    fn execute(&self) -> DatasetResult<()> {
        let metadata = MetadataTable::from_csv_path(&self.metadata_file)?;
        info!("Loaded {} metadata rows from {}", metadata.len(), self.metadata_file);

        let mut accessor = DatasetAccessor::open(self.config.clone())?;
        let summary = ImageExporter::new(self.logger)
            .export_matches(&mut accessor, &metadata, &self.output_dir, &self.format)?;

        println!("Exported {} images to {} ({} failed, {} ambiguous)",
                 summary.written, self.output_dir.display(), summary.failed, summary.ambiguous);
        Ok(())
    }
}
