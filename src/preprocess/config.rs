use serde::{Deserialize, Serialize};

use crate::sparse::SparseError;

/// Parameters of [`preprocess_with`](super::preprocess_with).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Typical chromatographic peak width, in scans
    pub peak_width: f64,

    /// Baseline window as a multiple of the peak width
    pub baseline_factor: f64,

    /// Upper bound on the Savitzky-Golay polynomial degree
    pub max_savgol_degree: usize,

    /// Mass bins whose smoothed maximum stays below this are cleared
    /// (0 keeps every bin)
    pub min_bin_intensity: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            peak_width: 5.0,
            baseline_factor: 10.0,
            max_savgol_degree: 3,
            min_bin_intensity: 0.0,
        }
    }
}

impl PreprocessConfig {
    /// Defaults with a custom peak width
    pub fn new(peak_width: f64) -> Self {
        Self {
            peak_width,
            ..Default::default()
        }
    }

    /// Set the baseline window factor
    pub fn with_baseline_factor(mut self, factor: f64) -> Self {
        self.baseline_factor = factor;
        self
    }

    /// Set the maximum smoothing degree
    pub fn with_max_savgol_degree(mut self, degree: usize) -> Self {
        self.max_savgol_degree = degree;
        self
    }

    /// Set the weak-bin threshold
    pub fn with_min_bin_intensity(mut self, intensity: f64) -> Self {
        self.min_bin_intensity = intensity;
        self
    }

    /// Check that every parameter is in its domain.
    pub fn validate(&self) -> Result<(), SparseError> {
        if !self.peak_width.is_finite() || self.peak_width <= 0.0 {
            return Err(SparseError::InvalidParameter(format!(
                "peak width must be positive, got {}",
                self.peak_width
            )));
        }
        if !self.baseline_factor.is_finite() || self.baseline_factor <= 0.0 {
            return Err(SparseError::InvalidParameter(format!(
                "baseline factor must be positive, got {}",
                self.baseline_factor
            )));
        }
        if !self.min_bin_intensity.is_finite() || self.min_bin_intensity < 0.0 {
            return Err(SparseError::InvalidParameter(format!(
                "minimum bin intensity must be non-negative, got {}",
                self.min_bin_intensity
            )));
        }
        Ok(())
    }

    /// Odd smoothing window closest to the peak width
    pub fn noise_window(&self) -> usize {
        super::noise::odd_window(self.peak_width)
    }

    /// Requested baseline window, before it is fitted to the scan count
    pub fn baseline_window(&self) -> usize {
        (self.baseline_factor * self.peak_width) as usize
    }
}
