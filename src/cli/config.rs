//! TOML configuration file support.
//!
//! Instead of passing flags on every run, settings can live in a config file:
//!
//! ```toml
//! # spectre.toml
//! [sampling]
//! resolution = 0.01
//!
//! [preprocess]
//! peak_width = 5.0
//! baseline_factor = 10.0
//! max_savgol_degree = 3
//! min_bin_intensity = 100.0
//! ```
//!
//! Command-line flags take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use spectre::preprocess::PreprocessConfig;

/// Root configuration structure for spectre.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Scan-to-bin sampling settings.
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Denoising and baseline settings.
    #[serde(default)]
    pub preprocess: PreprocessSection,
}

/// Configuration for the sampler.
#[derive(Debug, Default, Deserialize)]
pub struct SamplingConfig {
    /// Mass-bin width.
    pub resolution: Option<f64>,
}

/// Configuration for the preprocess pipeline.
#[derive(Debug, Default, Deserialize)]
pub struct PreprocessSection {
    /// Typical peak width, in scans.
    pub peak_width: Option<f64>,

    /// Baseline window as a multiple of the peak width.
    pub baseline_factor: Option<f64>,

    /// Maximum Savitzky-Golay degree.
    pub max_savgol_degree: Option<usize>,

    /// Clear mass bins whose maximum stays below this intensity.
    pub min_bin_intensity: Option<f64>,
}

impl PreprocessSection {
    /// Fill unset values from the library defaults.
    pub fn resolve(&self, peak_width: Option<f64>) -> PreprocessConfig {
        let defaults = PreprocessConfig::default();
        PreprocessConfig {
            peak_width: peak_width.or(self.peak_width).unwrap_or(defaults.peak_width),
            baseline_factor: self.baseline_factor.unwrap_or(defaults.baseline_factor),
            max_savgol_degree: self.max_savgol_degree.unwrap_or(defaults.max_savgol_degree),
            min_bin_intensity: self.min_bin_intensity.unwrap_or(defaults.min_bin_intensity),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }
}
