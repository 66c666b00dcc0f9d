use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::error;

use cellkit::utils::logger::Logger;
use cellkit::commands::{CommandFactory, CellkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("CellKit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract TIFF images from microscopy dataset archives")
        .arg(
            Arg::new("input")
                .help("Dataset archive (.tar, .tar.gz, .tar.zst)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file describing the archive layout")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("compression")
                .long("compression")
                .help("Archive compression (auto, none, gzip, zstd)")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fetch")
                .short('f')
                .long("fetch")
                .help("Extract a single image")
                .action(ArgAction::SetTrue)
                .conflicts_with("export"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .help("Mechanism of action, e.g. adrenoceptor")
                .value_name("TARGET")
                .required_if_eq("fetch", "true"),
        )
        .arg(
            Arg::new("plate")
                .long("plate")
                .help("Plate name, e.g. P1")
                .value_name("PLATE")
                .required_if_eq("fetch", "true"),
        )
        .arg(
            Arg::new("cell-id")
                .long("cell-id")
                .help("Identification number of the cell")
                .value_name("N")
                .required_if_eq("fetch", "true"),
        )
        .arg(
            Arg::new("replicate")
                .long("replicate")
                .help("Replicate number")
                .value_name("N")
                .required_if_eq("fetch", "true"),
        )
        .arg(
            Arg::new("well")
                .long("well")
                .help("Well relative to the well plate, e.g. C10")
                .value_name("WELL")
                .required_if_eq("fetch", "true"),
        )
        .arg(
            Arg::new("field")
                .long("field")
                .help("Field number")
                .value_name("N")
                .required_if_eq("fetch", "true"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output image file for --fetch")
                .value_name("FILE")
                .required_if_eq("fetch", "true"),
        )
        .arg(
            Arg::new("export")
                .short('e')
                .long("export")
                .help("Export every image matched by a metadata CSV")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("metadata")
                .long("metadata")
                .help("Metadata CSV (target, cell_id, well, plate, field, replicate, cell_code)")
                .value_name("CSV")
                .required_if_eq("export", "true"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory receiving <target>/<cell_code> images")
                .value_name("DIR")
                .required_if_eq("export", "true"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format for --export (tiff, png, ...)")
                .value_name("FORMAT")
                .default_value("tiff"),
        )
        .get_matches();

    let logger = match Logger::new("cellkit.log") {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("cellkit-global.log", matches.get_flag("verbose")) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = CellkitCommandFactory::new();

    match factory.create_command(&matches, &logger) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            process::exit(1);
        }
    };
}
