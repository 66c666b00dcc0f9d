//! Writing fetched images to disk
//!
//! This module drains a metadata-driven scan and stores every matched image
//! under `<output>/<target>/<cell_code>.<format>`.

mod exporter;

pub use exporter::{save_image, ExportSummary, ImageExporter};
