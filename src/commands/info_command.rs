//! Archive summary command
//!
//! Opens and indexes an archive, then reports what it contains.

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::commands::config_from_args;
use crate::dataset::{DatasetAccessor, DatasetConfig, DatasetResult, MemberKind};
use crate::utils::logger::Logger;

/// Command for summarising an archive
pub struct InfoCommand<'a> {
    /// Dataset to open
    config: DatasetConfig,
    /// Whether to list malformed members
    verbose: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    /// Create a new info command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> DatasetResult<Self> {
        Ok(InfoCommand {
            config: config_from_args(args)?,
            verbose: args.get_flag("verbose"),
            logger,
        })
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> DatasetResult<()> {
        let accessor = DatasetAccessor::open(self.config.clone())?;
        let index = accessor.index();
        print!("{}", accessor.summary());

        if self.verbose {
            for member in index.members() {
                match &member.kind {
                    MemberKind::Malformed(reason) => println!("  malformed: {}", reason),
                    _ => debug!("{} ({} bytes)", member.path, member.size),
                }
            }
        }

        self.logger.log_section("Dataset", &[
            ("archive", self.config.archive_path.display().to_string()),
            ("images", index.image_count().to_string()),
            ("targets", index.targets().len().to_string()),
        ])?;
        info!("Summary complete");
        Ok(())
    }
}
