//! Error types for palette extraction and light control.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The bitmap could not be decoded.
    #[error("Unable to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is outside its documented range.
    #[error("Invalid configuration value: {key} = {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Unable to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A capture region string was not of the form `x1,y1,x2,y2`.
    #[error("Invalid capture region: {0}")]
    InvalidRegion(String),

    #[error("Invalid hex color: {0}")]
    InvalidHex(String),

    #[error("Unknown harmony scheme: {0}")]
    UnknownScheme(String),

    /// A light refused a color update.
    #[error("Failed to set light {index}: {message}")]
    Light { index: usize, message: String },
}

impl Error {
    pub(crate) fn invalid_config(key: &'static str, value: impl ToString) -> Self {
        Self::InvalidConfig {
            key,
            value: value.to_string(),
        }
    }
}
