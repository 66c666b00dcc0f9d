//! Encoding and decoding of archive member names
//!
//! Image members live at `<root>/<target>/<prefix>_<plate>_<replicate>_<well>_<field>_<cell_id><suffix>`,
//! for example `training/adrenoceptor/211_11_17_X_Man_LOPAC_X5_LP_S1_1_C10_1_1.tiff`.
//! The prefix is a run of literal tokens whose values are not checked on
//! decode, only their count.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dataset::config::DatasetConfig;
use crate::dataset::errors::{DatasetError, DatasetResult};
use crate::dataset::key::ImageKey;

lazy_static! {
    // plate, replicate, well, field, cell id
    static ref VARIABLE_FIELDS: Regex =
        Regex::new(r"^([A-Za-z][A-Za-z0-9]*)_(\d+)_([A-Za-z]+\d+)_(\d+)_(\d+)$").unwrap();
}

/// How an archive member was classified by the codec
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    /// A well-formed image member
    Image(ImageKey),
    /// Carries the image suffix but does not follow the encoding
    Malformed(String),
    /// Anything else
    Other,
}

/// Translates between [`ImageKey`]s and archive member names
#[derive(Debug, Clone)]
pub struct FilenameCodec {
    root_dir: String,
    prefix: String,
    prefix_tokens: usize,
    suffix: String,
    metadata_letter: char,
    archive_letter: char,
}

impl FilenameCodec {
    /// Create a codec from the dataset configuration
    pub fn new(config: &DatasetConfig) -> Self {
        let prefix = config.filename_prefix.trim_matches('_').to_string();
        let prefix_tokens = if prefix.is_empty() { 0 } else { prefix.split('_').count() };
        FilenameCodec {
            root_dir: config.root_dir.clone(),
            prefix,
            prefix_tokens,
            suffix: config.image_suffix.clone(),
            metadata_letter: config.metadata_plate_letter,
            archive_letter: config.archive_plate_letter,
        }
    }

    /// Suffix that marks a member as an image
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Rewrite a metadata plate code (`P1`) into its archive form (`S1`)
    pub fn to_archive_plate(&self, plate: &str) -> DatasetResult<String> {
        swap_leading_letter(plate, self.metadata_letter, self.archive_letter)
            .ok_or_else(|| DatasetError::InvalidPlate(plate.to_string()))
    }

    /// Rewrite an archive plate code (`S1`) into its metadata form (`P1`)
    pub fn to_metadata_plate(&self, plate: &str) -> DatasetResult<String> {
        swap_leading_letter(plate, self.archive_letter, self.metadata_letter)
            .ok_or_else(|| DatasetError::InvalidPlate(plate.to_string()))
    }

    /// File name (without directories) an image is stored under
    pub fn encode_filename(&self, key: &ImageKey) -> DatasetResult<String> {
        let plate = self.to_archive_plate(&key.plate)?;
        let fields = format!("{}_{}_{}_{}_{}", plate, key.replicate, key.well, key.field, key.cell_id);
        Ok(if self.prefix.is_empty() {
            format!("{}{}", fields, self.suffix)
        } else {
            format!("{}_{}{}", self.prefix, fields, self.suffix)
        })
    }

    /// Full member path an image is stored under
    pub fn member_path(&self, key: &ImageKey) -> DatasetResult<String> {
        let filename = self.encode_filename(key)?;
        Ok(if self.root_dir.is_empty() {
            format!("{}/{}", key.target, filename)
        } else {
            format!("{}/{}/{}", self.root_dir, key.target, filename)
        })
    }

    /// Classify a member path and decode it when it names an image
    pub fn parse_member_path(&self, path: &str) -> MemberKind {
        let (parent, name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        };

        let stem = match name.strip_suffix(self.suffix.as_str()) {
            Some(stem) => stem,
            None => return MemberKind::Other,
        };

        match self.decode(parent, stem) {
            Ok(key) => MemberKind::Image(key),
            Err(reason) => MemberKind::Malformed(format!("{}: {}", path, reason)),
        }
    }

    fn decode(&self, parent: &str, stem: &str) -> Result<ImageKey, String> {
        let target = parent.rsplit('/').next().unwrap_or("");
        if target.is_empty() {
            return Err("no target directory".to_string());
        }

        let tokens: Vec<&str> = stem.split('_').collect();
        let expected = self.prefix_tokens + 5;
        if tokens.len() != expected {
            return Err(format!("expected {} '_'-separated tokens, found {}", expected, tokens.len()));
        }

        let variable = tokens[self.prefix_tokens..].join("_");
        let caps = VARIABLE_FIELDS
            .captures(&variable)
            .ok_or_else(|| format!("unexpected field layout '{}'", variable))?;

        let plate = self
            .to_metadata_plate(&caps[1])
            .map_err(|_| format!("plate '{}' does not start with '{}'", &caps[1], self.archive_letter))?;

        Ok(ImageKey {
            target: target.to_string(),
            plate,
            replicate: parse_number(&caps[2], "replicate")?,
            well: caps[3].to_string(),
            field: parse_number(&caps[4], "field")?,
            cell_id: parse_number(&caps[5], "cell id")?,
        })
    }
}

fn swap_leading_letter(plate: &str, from: char, to: char) -> Option<String> {
    let rest = plate.strip_prefix(from)?;
    Some(format!("{}{}", to, rest))
}

fn parse_number(token: &str, what: &str) -> Result<u32, String> {
    token.parse::<u32>().map_err(|_| format!("{} '{}' is out of range", what, token))
}
