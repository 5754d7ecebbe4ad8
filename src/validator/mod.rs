//! # Validation Module
//!
//! Integrity checks for stored XIC matrices, run on the raw storage before
//! any constructor would reject it, so that every problem is reported at once.
//!
//! ## Validation Checklist
//!
//! 1. **Structure**: pointer array shape, offsets, value count, index bounds
//! 2. **Canonical Form**: sorted and duplicate-free slices
//! 3. **Values**: explicit zeros, non-finite and negative intensities
//! 4. **Axes** (XIC files): one strictly increasing entry per row and column
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spectre::validator::validate_xic_file;
//! use std::path::Path;
//!
//! match validate_xic_file(Path::new("run.json")) {
//!     Ok(report) => println!("{}", report),
//!     Err(e) => eprintln!("Validation failed: {}", e),
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::sparse::{Scalar, SparseParts};

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod data;
mod report;
mod structure;


/// Errors that prevent validation from running
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file is not an XIC JSON document
    #[error("JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

/// XIC document as stored, before any validation.
#[derive(Debug, Deserialize)]
struct RawXic {
    data: SparseParts<f64>,
    mz_axis: Vec<f64>,
    rt_axis: Vec<f64>,
}

/// Validate raw matrix storage.
pub fn validate_parts<T: Scalar>(parts: &SparseParts<T>) -> ValidationReport {
    let mut report = ValidationReport::new(format!(
        "{:?} matrix {}x{}",
        parts.layout, parts.shape.0, parts.shape.1
    ));
    check_parts(parts, &mut report);
    report
}

fn check_parts<T: Scalar>(parts: &SparseParts<T>, report: &mut ValidationReport) {
    if structure::check_structure(parts, report) {
        structure::check_canonical(parts, report);
    }
    data::check_values(&parts.values, report);
}

/// Validate an XIC JSON file written by `Xic::save_json`.
pub fn validate_xic_file(path: &Path) -> Result<ValidationReport, ValidationError> {
    let reader = BufReader::new(File::open(path)?);
    let raw: RawXic = serde_json::from_reader(reader)?;

    let mut report = ValidationReport::new(path.display().to_string());
    check_parts(&raw.data, &mut report);
    data::check_axis("Retention time", &raw.rt_axis, raw.data.shape.0, &mut report);
    data::check_axis("Mass", &raw.mz_axis, raw.data.shape.1, &mut report);
    Ok(report)
}
