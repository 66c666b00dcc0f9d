pub mod io;
pub mod dataset;
pub mod utils;
pub mod compression;
pub mod export;
pub mod commands;
pub mod api;

pub use crate::api::CellKit;

pub use dataset::{DatasetAccessor, DatasetConfig, DatasetError, DatasetResult, FetchAll, FetchedImage, ImageKey, MetadataRow, MetadataTable};
pub use export::{ExportSummary, ImageExporter};
