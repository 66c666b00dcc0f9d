//! Dataset configuration
//!
//! The layout of the dataset archive (where it lives, how its members are
//! named and how plate codes are rewritten) is described by a small TOML
//! document. The shipped `dataset.toml` is compiled in and acts as the default.

use std::fs;
use std::path::{Path, PathBuf};
use lazy_static::lazy_static;
use log::warn;
use crate::dataset::errors::{DatasetError, DatasetResult};

lazy_static! {
    // Parse the embedded defaults once
    static ref DEFAULT_CONFIG: DatasetConfig = {
        let content = include_str!("../../dataset.toml");
        DatasetConfig::from_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse embedded dataset.toml: {}", e);
            DatasetConfig::builtin()
        })
    };
}

/// Layout and location of a dataset archive
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetConfig {
    /// Path to the archive on disk
    pub archive_path: PathBuf,
    /// Top-level directory inside the archive
    pub root_dir: String,
    /// Compression name, or "auto" to detect it
    pub compression: String,
    /// Log2 of the largest zstd window the decoder accepts, for archives
    /// written with `zstd --long`
    pub zstd_window_log_max: Option<u32>,
    /// Literal tokens every image filename starts with
    pub filename_prefix: String,
    /// Suffix that marks a member as an image
    pub image_suffix: String,
    /// Leading plate letter used by the metadata
    pub metadata_plate_letter: char,
    /// Leading plate letter used inside the archive
    pub archive_plate_letter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl DatasetConfig {
    fn builtin() -> Self {
        DatasetConfig {
            archive_path: PathBuf::from("1.download-data/data/training.tar.gz"),
            root_dir: "training".to_string(),
            compression: "auto".to_string(),
            zstd_window_log_max: None,
            filename_prefix: "211_11_17_X_Man_LOPAC_X5_LP".to_string(),
            image_suffix: ".tiff".to_string(),
            metadata_plate_letter: 'P',
            archive_plate_letter: 'S',
        }
    }

    /// Default configuration pointing at another archive
    pub fn for_archive<P: AsRef<Path>>(path: P) -> Self {
        DatasetConfig {
            archive_path: path.as_ref().to_path_buf(),
            ..DatasetConfig::default()
        }
    }

    /// Parse a configuration from a TOML string
    ///
    /// Keys that are absent keep their built-in values.
    pub fn from_str(content: &str) -> DatasetResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(DatasetError::ConfigError(format!("Failed to parse TOML: {}", e))),
        };

        let mut config = DatasetConfig::builtin();

        if let Some(path) = Self::get_str(&toml_value, "archive", "path")? {
            config.archive_path = PathBuf::from(path);
        }
        if let Some(root) = Self::get_str(&toml_value, "archive", "root_dir")? {
            config.root_dir = root.trim_matches('/').to_string();
        }
        if let Some(compression) = Self::get_str(&toml_value, "archive", "compression")? {
            config.compression = compression.to_lowercase();
        }
        if let Some(window_log) = Self::get_int(&toml_value, "archive", "zstd_window_log_max")? {
            if !(10..=31).contains(&window_log) {
                return Err(DatasetError::ConfigError(format!(
                    "archive.zstd_window_log_max must be between 10 and 31, got {}", window_log
                )));
            }
            config.zstd_window_log_max = Some(window_log as u32);
        }
        if let Some(prefix) = Self::get_str(&toml_value, "filename", "prefix")? {
            config.filename_prefix = prefix.to_string();
        }
        if let Some(suffix) = Self::get_str(&toml_value, "filename", "suffix")? {
            if suffix.is_empty() {
                return Err(DatasetError::ConfigError("filename.suffix must not be empty".to_string()));
            }
            config.image_suffix = suffix.to_string();
        }
        if let Some(letter) = Self::get_str(&toml_value, "plate", "metadata_letter")? {
            config.metadata_plate_letter = Self::single_letter("plate.metadata_letter", letter)?;
        }
        if let Some(letter) = Self::get_str(&toml_value, "plate", "archive_letter")? {
            config.archive_plate_letter = Self::single_letter("plate.archive_letter", letter)?;
        }

        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_str(&contents)
    }

    /// Look up `[table].key` as a string, if present
    fn get_str<'v>(toml_value: &'v toml::Value, table: &str, key: &str) -> DatasetResult<Option<&'v str>> {
        match toml_value.get(table).and_then(|t| t.get(key)) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| {
                DatasetError::ConfigError(format!("{}.{} must be a string", table, key))
            }),
        }
    }

    fn get_int(toml_value: &toml::Value, table: &str, key: &str) -> DatasetResult<Option<i64>> {
        match toml_value.get(table).and_then(|t| t.get(key)) {
            None => Ok(None),
            Some(value) => value.as_integer().map(Some).ok_or_else(|| {
                DatasetError::ConfigError(format!("{}.{} must be an integer", table, key))
            }),
        }
    }

    fn single_letter(key: &str, value: &str) -> DatasetResult<char> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
            _ => Err(DatasetError::ConfigError(format!("{} must be a single letter, got '{}'", key, value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_builtin() {
        assert_eq!(DatasetConfig::default(), DatasetConfig::builtin());
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = DatasetConfig::from_str("[archive]\npath = \"/data/set.tar.zst\"\n").unwrap();
        assert_eq!(config.archive_path, PathBuf::from("/data/set.tar.zst"));
        assert_eq!(config.root_dir, "training");
        assert_eq!(config.image_suffix, ".tiff");
        assert_eq!(config.archive_plate_letter, 'S');
    }

    #[test]
    fn rejects_wrong_types_and_letters() {
        assert!(matches!(
            DatasetConfig::from_str("[archive]\npath = 3\n"),
            Err(DatasetError::ConfigError(_))
        ));
        assert!(matches!(
            DatasetConfig::from_str("[plate]\narchive_letter = \"SS\"\n"),
            Err(DatasetError::ConfigError(_))
        ));
        assert!(matches!(
            DatasetConfig::from_str("not = [valid"),
            Err(DatasetError::ConfigError(_))
        ));
    }

    #[test]
    fn zstd_window_limit_is_optional_and_bounded() {
        assert_eq!(DatasetConfig::default().zstd_window_log_max, None);

        let config = DatasetConfig::from_str("[archive]\nzstd_window_log_max = 31\n").unwrap();
        assert_eq!(config.zstd_window_log_max, Some(31));

        for bad in ["9", "32", "\"27\""] {
            let doc = format!("[archive]\nzstd_window_log_max = {}\n", bad);
            assert!(matches!(DatasetConfig::from_str(&doc), Err(DatasetError::ConfigError(_))), "{}", bad);
        }
    }
}
