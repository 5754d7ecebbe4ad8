//! # Preprocessing Module
//!
//! Denoising and baseline correction of sampled XIC matrices.
//!
//! The pipeline runs in two stages along retention time:
//!
//! 1. **Noise removal**: Savitzky-Golay smoothing over roughly one peak
//!    width, followed by dropping negative intensities.
//!
//! 2. **Baseline removal**: a robust background estimate (rolling median
//!    clipped to a rolling-minimum envelope, then averaged) is subtracted
//!    over a window of many peak widths.

mod baseline;
mod config;
mod noise;


use log::info;

pub use baseline::{baseline_window, remove_baseline};
pub use config::PreprocessConfig;
pub use noise::{drop_weak_bins, remove_noise, remove_noise_with};

use crate::sparse::{Scalar, SparseError, SparseMatrix};

/// Denoise and baseline-correct with the default parameters and the given
/// peak width.
pub fn preprocess<T: Scalar>(matrix: &SparseMatrix<T>, peak_width: f64) -> Result<SparseMatrix<T>, SparseError> {
    preprocess_with(matrix, &PreprocessConfig::new(peak_width))
}

/// Denoise and baseline-correct a scan × mass-bin matrix.
pub fn preprocess_with<T: Scalar>(
    matrix: &SparseMatrix<T>,
    config: &PreprocessConfig,
) -> Result<SparseMatrix<T>, SparseError> {
    config.validate()?;
    info!(
        "Preprocessing {}x{} matrix ({} non-zero, peak width {})",
        matrix.n_rows(),
        matrix.n_cols(),
        matrix.nnz(),
        config.peak_width
    );

    let mut denoised = remove_noise_with(matrix, config.peak_width, config.max_savgol_degree)?;
    if config.min_bin_intensity > 0.0 {
        denoised = drop_weak_bins(&denoised, T::from_f64(config.min_bin_intensity));
    }

    let corrected = remove_baseline(&denoised, config.baseline_window())?;
    info!(
        "Preprocessing kept {} of {} entries",
        corrected.nnz(),
        matrix.nnz()
    );
    Ok(corrected)
}
