use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::writer::{OutputFormat, WriterOptions};

#[derive(Deserialize, Serialize, Debug, PartialEq, Default)]
pub struct ReaderConfig {
    /// Input format; detected from the file extension when absent.
    pub format: Option<String>,
    /// Stop after this many records per input.
    pub max_entries: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Default)]
pub struct WriterConfig {
    pub format: Option<String>,
    pub sort_features: Option<bool>,
    pub write_sequence: Option<bool>,
    pub gff_source: Option<String>,
}

///
/// Conversion settings read from a TOML document:
///
/// ```toml
/// [reader]
/// format = "agp"
///
/// [writer]
/// format = "embl"
/// sort_features = true
/// ```
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Default)]
pub struct ConversionConfig {
    pub reader: Option<ReaderConfig>,
    pub writer: Option<WriterConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing or invalid file extension in conversion config file. It must be `toml`")]
    InvalidFileType,
    #[error("Invalid output format in config file: {0}")]
    InvalidOutputFormat(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ConversionConfig {
    pub fn input_format(&self) -> Option<&str> {
        self.reader.as_ref().and_then(|r| r.format.as_deref())
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.reader.as_ref().and_then(|r| r.max_entries)
    }

    pub fn output_format(&self) -> ConfigResult<Option<OutputFormat>> {
        match self.writer.as_ref().and_then(|w| w.format.as_deref()) {
            Some(format) => format
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidOutputFormat(format.to_string())),
            None => Ok(None),
        }
    }

    /// Writer options with every configured value applied over the defaults.
    pub fn writer_options(&self) -> WriterOptions {
        let mut options = WriterOptions::default();
        if let Some(writer) = &self.writer {
            if let Some(sort_features) = writer.sort_features {
                options.sort_features = sort_features;
            }
            if let Some(write_sequence) = writer.write_sequence {
                options.write_sequence = write_sequence;
            }
            if let Some(gff_source) = &writer.gff_source {
                options.gff_source = gff_source.clone();
            }
        }
        options
    }
}

impl TryFrom<&Path> for ConversionConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        if path.extension().and_then(OsStr::to_str) != Some("toml") {
            return Err(ConfigError::InvalidFileType);
        }
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
