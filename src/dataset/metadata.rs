//! Metadata table describing which images to load
//!
//! Rows carry the six identifying fields of an image plus the `cell_code`
//! returned alongside it. Row order is significant: when several rows match
//! the same image the first one wins.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::dataset::errors::{DatasetError, DatasetResult};
use crate::dataset::key::ImageKey;

/// Columns a metadata CSV must provide
pub const REQUIRED_COLUMNS: [&str; 7] = ["target", "cell_id", "well", "plate", "field", "replicate", "cell_code"];

/// One row of the metadata table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    pub target: String,
    pub cell_id: u32,
    pub well: String,
    pub plate: String,
    pub field: u32,
    pub replicate: u32,
    /// Identifier handed back with each matched image
    pub cell_code: String,
}

impl MetadataRow {
    /// The fields this row is matched on
    pub fn key(&self) -> ImageKey {
        ImageKey {
            target: self.target.clone(),
            plate: self.plate.clone(),
            cell_id: self.cell_id,
            replicate: self.replicate,
            well: self.well.clone(),
            field: self.field,
        }
    }
}

/// Ordered collection of metadata rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTable {
    rows: Vec<MetadataRow>,
}

impl MetadataTable {
    pub fn new() -> Self {
        MetadataTable::default()
    }

    pub fn from_rows(rows: Vec<MetadataRow>) -> Self {
        MetadataTable { rows }
    }

    pub fn push(&mut self, row: MetadataRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    /// Rows matching `key` on all six fields, in table order
    pub fn matching(&self, key: &ImageKey) -> Vec<&MetadataRow> {
        self.rows
            .iter()
            .filter(|row| {
                row.target == key.target
                    && row.cell_id == key.cell_id
                    && row.well == key.well
                    && row.plate == key.plate
                    && row.field == key.field
                    && row.replicate == key.replicate
            })
            .collect()
    }

    /// Group rows by key, keeping table order inside each group
    pub(crate) fn group_by_key(&self) -> HashMap<ImageKey, Vec<&MetadataRow>> {
        let mut groups: HashMap<ImageKey, Vec<&MetadataRow>> = HashMap::new();
        for row in &self.rows {
            groups.entry(row.key()).or_default().push(row);
        }
        groups
    }

    /// Load a table from a CSV file with a header row
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let reader = csv::Reader::from_path(path.as_ref()).map_err(|e| {
            DatasetError::MetadataError(format!("opening {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_csv(reader)
    }

    /// Load a table from CSV data with a header row
    ///
    /// Columns are located by name; extra columns such as an unnamed
    /// pandas index are ignored.
    pub fn from_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> DatasetResult<Self> {
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DatasetError::MetadataError(format!("reading CSV headers: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| DatasetError::MetadataError(format!("CSV missing '{}' column", column)))?;
        }
        let [target, cell_id, well, plate, field, replicate, cell_code] = positions;

        let mut rows = Vec::new();
        for (row_no, result) in reader.records().enumerate() {
            let record = result.map_err(|e| DatasetError::MetadataError(format!("CSV row {}: {}", row_no, e)))?;
            let text = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
            let number = |idx: usize, column: &str| parse_integer(record.get(idx).unwrap_or(""), row_no, column);

            rows.push(MetadataRow {
                target: text(target),
                cell_id: number(cell_id, "cell_id")?,
                well: text(well),
                plate: text(plate),
                field: number(field, "field")?,
                replicate: number(replicate, "replicate")?,
                cell_code: text(cell_code),
            });
        }

        Ok(MetadataTable { rows })
    }
}

/// Parse an integer cell, accepting the `1.0` form pandas writes for
/// integer columns that once held NaN
fn parse_integer(value: &str, row: usize, column: &str) -> DatasetResult<u32> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u32>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(DatasetError::MetadataError(format!(
            "CSV row {}, {}: '{}' is not a non-negative integer",
            row, column, value
        ))),
    }
}
