//! CLI command implementations
//!
//! This module contains implementations of the commands supported by the
//! CLI application using the Command pattern.

pub mod command_traits;
pub mod info_command;
pub mod fetch_command;
pub mod export_command;

pub use command_traits::{Command, CommandFactory};
pub use info_command::InfoCommand;
pub use fetch_command::FetchCommand;
pub use export_command::ExportCommand;

use clap::ArgMatches;
use log::info;
use crate::dataset::{DatasetConfig, DatasetError, DatasetResult};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
pub struct CellkitCommandFactory;

impl CellkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        CellkitCommandFactory
    }
}

impl Default for CellkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for CellkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> DatasetResult<Box<dyn Command + 'a>> {
        if args.get_flag("fetch") {
            Ok(Box::new(FetchCommand::new(args, logger)?))
        } else if args.get_flag("export") {
            Ok(Box::new(ExportCommand::new(args, logger)?))
        } else {
            // Default to the archive summary
            Ok(Box::new(InfoCommand::new(args, logger)?))
        }
    }
}

/// Build the dataset configuration from `--config` and the input archive
pub(crate) fn config_from_args(args: &ArgMatches) -> DatasetResult<DatasetConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => {
            info!("Loading configuration from {}", path);
            DatasetConfig::from_file(path)?
        }
        None => DatasetConfig::default(),
    };

    let input = args.get_one::<String>("input")
        .ok_or_else(|| DatasetError::GenericError("Missing input archive".to_string()))?;
    config.archive_path = input.into();

    if let Some(compression) = args.get_one::<String>("compression") {
        config.compression = compression.to_lowercase();
    }

    Ok(config)
}

/// Fetch a required string argument
pub(crate) fn required_arg(args: &ArgMatches, name: &str) -> DatasetResult<String> {
    args.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| DatasetError::GenericError(format!("Missing --{}", name)))
}

/// Fetch and parse a required numeric argument
pub(crate) fn required_number(args: &ArgMatches, name: &str) -> DatasetResult<u32> {
    let value = required_arg(args, name)?;
    value.parse::<u32>()
        .map_err(|_| DatasetError::GenericError(format!("Invalid --{}: {}", name, value)))
}
