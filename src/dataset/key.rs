//! Identity of a single image in the dataset

use std::fmt;

/// The six fields that identify one image
///
/// `plate` is always kept in metadata form (for example `P1`); the archive
/// form is produced by [`FilenameCodec`](crate::dataset::FilenameCodec).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageKey {
    /// Mechanism of action, also the directory name inside the archive
    pub target: String,
    /// Plate name, e.g. "P1"
    pub plate: String,
    /// Identification number of the cell
    pub cell_id: u32,
    /// Replicate number
    pub replicate: u32,
    /// Well relative to the well plate, e.g. "C10"
    pub well: String,
    /// Field number
    pub field: u32,
}

impl ImageKey {
    pub fn new(target: &str, plate: &str, cell_id: u32, replicate: u32, well: &str, field: u32) -> Self {
        ImageKey {
            target: target.to_string(),
            plate: plate.to_string(),
            cell_id,
            replicate,
            well: well.to_string(),
            field,
        }
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target={} plate={} cell_id={} replicate={} well={} field={}",
            self.target, self.plate, self.cell_id, self.replicate, self.well, self.field
        )
    }
}
