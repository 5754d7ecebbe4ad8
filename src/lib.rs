//! # Spectre - Sparse Preprocessing for LC-MS Data
//!
//! `spectre` turns the irregular peak lists of a chromatography/mass
//! spectrometry run into a denoised, baseline-corrected scan × mass-bin
//! intensity matrix, ready for spectral deconvolution.
//!
//! ## Key Features
//!
//! - **Never Dense**: Every kernel works on compressed-row or compressed-column
//!   storage. A run of thousands of scans over a high-resolution mass axis
//!   stays as small as its peak list.
//!
//! - **Exact Implicit Zeros**: Rolling minimum, maximum, mean and median count
//!   the zeros that are not stored, so results match a dense computation.
//!
//! - **Max-Pooled Sampling**: Peaks of one scan falling into the same mass bin
//!   keep the larger intensity instead of adding up.
//!
//! - **Parallel by Slice**: Rows or columns are processed independently with
//!   `rayon` and stitched back together in order.
//!
//! ## Quick Start
//!
//! ```rust
//! use spectre::prelude::*;
//!
//! let scans = ScanTable::from_scans(vec![
//!     Scan::new(0.5, vec![100.02, 100.04, 250.1], vec![5.0f32, 9.0, 1.0]),
//!     Scan::new(1.0, vec![100.03, 250.1], vec![7.0, 2.0]),
//!     Scan::new(1.5, vec![100.01], vec![6.0]),
//!     Scan::new(2.0, vec![250.08], vec![3.0]),
//! ])?;
//!
//! // 0.1 m/z bins; colliding peaks keep the larger intensity
//! let xic = Xic::from_scans(&scans, 0.1)?;
//! assert_eq!(xic.data.get(0, 0), 9.0);
//!
//! let config = PreprocessConfig::new(1.0).with_baseline_factor(3.0);
//! let corrected = preprocess_with(&xic.data, &config)?;
//! assert!(corrected.values().iter().all(|&v| v > 0.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`sparse`]: compressed matrices, canonicalization, rolling windows and
//!   Savitzky-Golay smoothing
//! - [`sampling`]: scan tables, the scan-to-bin sampler and the [`Xic`](sampling::Xic) container
//! - [`preprocess`]: noise and baseline removal
//! - [`validator`]: integrity reports for stored matrices

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod preprocess;
pub mod sampling;
pub mod sparse;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::preprocess::{
        preprocess, preprocess_with, remove_baseline, remove_noise, PreprocessConfig,
    };
    pub use crate::sampling::{
        read_peak_table, sample, MassAxis, SamplingError, Scan, ScanTable, Xic,
    };
    pub use crate::sparse::{
        rolling, savgol, Axis, Layout, PaddingMode, Reduction, RollingOp, Scalar, SparseError,
        SparseMatrix,
    };
    pub use crate::validator::{validate_parts, validate_xic_file, ValidationReport};
}
