//! Single image extraction command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::{config_from_args, required_arg, required_number};
use crate::dataset::{DatasetAccessor, DatasetConfig, DatasetResult, ImageKey};
use crate::export::save_image;
use crate::utils::logger::Logger;

/// Command for extracting one image to a file
pub struct FetchCommand<'a> {
    /// Dataset to open
    config: DatasetConfig,
    /// Image to extract
    key: ImageKey,
    /// Destination file; its extension picks the format
    output_file: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> FetchCommand<'a> {
    /// Create a new fetch command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> DatasetResult<Self> {
        let key = ImageKey {
            target: required_arg(args, "target")?,
            plate: required_arg(args, "plate")?,
            cell_id: required_number(args, "cell-id")?,
            replicate: required_number(args, "replicate")?,
            well: required_arg(args, "well")?,
            field: required_number(args, "field")?,
        };

        Ok(FetchCommand {
            config: config_from_args(args)?,
            key,
            output_file: required_arg(args, "output")?,
            logger,
        })
    }
}

impl<'a> Command for FetchCommand<'a> {
    fn execute(&self) -> DatasetResult<()> {
        let mut accessor = DatasetAccessor::open(self.config.clone())?;
        info!("Fetching {}", self.key);

        let image = accessor.fetch(&self.key)?;
        save_image(&image, self.output_file.as_ref())?;

        info!("Wrote {}x{} image to {}", image.width(), image.height(), self.output_file);
        self.logger.log(&format!("Fetched {} -> {}", self.key, self.output_file))?;
        Ok(())
    }
}
