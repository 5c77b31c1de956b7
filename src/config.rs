//! Analyzer configuration.
//!
//! The configuration is a flat set of keys with documented defaults. It can be
//! built programmatically or loaded from JSON:
//!
//! ```no_run
//! use wallpaper_light::AnalyzerConfig;
//!
//! let config = AnalyzerConfig::from_json_str(r#"{ "num_colors": 3, "algorithm": "quantile" }"#)?;
//! assert_eq!(config.num_colors, 3);
//! # Ok::<(), wallpaper_light::Error>(())
//! ```
//!
//! Values are checked by [`AnalyzerConfig::validate`]; out-of-range values
//! are rejected, never clamped.

use std::fmt;
use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::ExtractOptions;
use crate::harmony::HarmonyScheme;

pub const DEFAULT_NUM_COLORS: usize = 5;
pub const DEFAULT_RESIZE: u32 = 100;
pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_KMEANS_SEED: u64 = 42;

/// Palette extraction strategy.
///
/// Parsed case-insensitively. Unrecognized names fall back to
/// [`Algorithm::Clustering`] with a warning instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    /// K-means in RGB space, ordered by cluster population.
    #[default]
    Clustering,
    /// Per-channel quantiles.
    Quantile,
    /// Most populated bins of a 25×25×25 RGB histogram.
    Histogram,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Clustering => "kmeans",
            Algorithm::Quantile => "quantile",
            Algorithm::Histogram => "histogram",
        }
    }

    /// Resolve an algorithm name. Never fails.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "kmeans" | "k-means" | "clustering" => Algorithm::Clustering,
            "quantile" => Algorithm::Quantile,
            "histogram" => Algorithm::Histogram,
            other => {
                log::warn!("Unknown algorithm: {other}, falling back to K-means");
                Algorithm::Clustering
            }
        }
    }
}

impl From<String> for Algorithm {
    fn from(name: String) -> Self {
        Self::parse_lenient(&name)
    }
}

impl From<Algorithm> for String {
    fn from(algorithm: Algorithm) -> Self {
        algorithm.as_str().to_string()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resampling filter used when shrinking the bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic.
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Palette size `k`.
    pub num_colors: usize,
    pub resize_width: u32,
    pub resize_height: u32,
    pub resize_filter: ResizeFilter,
    pub algorithm: Algorithm,
    /// Reshape the extracted palette with a harmony scheme.
    pub color_harmony: bool,
    /// Fixed scheme; a weighted random one is drawn per analysis when unset.
    pub harmony_scheme: Option<HarmonyScheme>,
    /// Seed for harmony selection; OS entropy when unset.
    pub harmony_seed: Option<u64>,
    /// Drop near-black, near-white and near-gray pixels before extraction.
    pub filter_pixels: bool,
    pub brightness_threshold: f64,
    pub saturation_threshold: f64,
    pub kmeans_seed: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            num_colors: DEFAULT_NUM_COLORS,
            resize_width: DEFAULT_RESIZE,
            resize_height: DEFAULT_RESIZE,
            resize_filter: ResizeFilter::default(),
            algorithm: Algorithm::default(),
            color_harmony: true,
            harmony_scheme: None,
            harmony_seed: None,
            filter_pixels: true,
            brightness_threshold: DEFAULT_THRESHOLD,
            saturation_threshold: DEFAULT_THRESHOLD,
            kmeans_seed: DEFAULT_KMEANS_SEED,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        // Cluster labels are stored as u8.
        if !(1..=255).contains(&self.num_colors) {
            return Err(Error::invalid_config("num_colors", self.num_colors));
        }
        if self.resize_width == 0 {
            return Err(Error::invalid_config("resize_width", self.resize_width));
        }
        if self.resize_height == 0 {
            return Err(Error::invalid_config("resize_height", self.resize_height));
        }
        if !(0.0..=1.0).contains(&self.brightness_threshold) {
            return Err(Error::invalid_config(
                "brightness_threshold",
                self.brightness_threshold,
            ));
        }
        if !(0.0..=1.0).contains(&self.saturation_threshold) {
            return Err(Error::invalid_config(
                "saturation_threshold",
                self.saturation_threshold,
            ));
        }
        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            num_colors: self.num_colors,
            width: self.resize_width,
            height: self.resize_height,
            filter: self.resize_filter,
            algorithm: self.algorithm,
            filter_pixels: self.filter_pixels,
            brightness_threshold: self.brightness_threshold,
            saturation_threshold: self.saturation_threshold,
            seed: self.kmeans_seed,
        }
    }
}
