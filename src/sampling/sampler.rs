use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::SamplingError;
use crate::sparse::{merge_duplicates, sort_within_rows, Layout, Reduction, Scalar, SparseMatrix};

/// Evenly spaced mass bins.
///
/// Column `j` of a sampled matrix is centred on `(min_bin + j) * resolution`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassAxis {
    /// Bin number of the first column
    pub min_bin: i64,
    /// Bin width
    pub resolution: f64,
    /// Number of bins
    pub len: usize,
}

impl MassAxis {
    /// Centre of column `column`
    pub fn center(&self, column: usize) -> f64 {
        (self.min_bin + column as i64) as f64 * self.resolution
    }

    /// All bin centres, in column order
    pub fn centers(&self) -> Vec<f64> {
        (0..self.len).map(|column| self.center(column)).collect()
    }

    /// Column holding `mass`, if it falls inside the axis
    pub fn column_of(&self, mass: f64) -> Option<usize> {
        let offset = (mass / self.resolution).round() as i64 - self.min_bin;
        usize::try_from(offset).ok().filter(|&column| column < self.len)
    }
}

/// Check that `pointers` starts at zero, never decreases and ends at the
/// length of both peak arrays.
pub fn check_scan_pointers(
    pointers: &[usize],
    n_masses: usize,
    n_intensities: usize,
) -> Result<(), SamplingError> {
    let invalid = |message: String| Err(SamplingError::InvalidScanBoundaries(message));

    match (pointers.first(), pointers.last()) {
        (Some(&0), Some(&last)) => {
            if let Some(scan) = pointers.windows(2).position(|w| w[0] > w[1]) {
                return invalid(format!("pointer of scan {} decreases", scan + 1));
            }
            if last != n_masses || last != n_intensities {
                return invalid(format!(
                    "pointers end at {} but there are {} masses and {} intensities",
                    last, n_masses, n_intensities
                ));
            }
            Ok(())
        }
        (Some(&first), _) => invalid(format!("pointers start at {} instead of 0", first)),
        (None, _) => invalid("pointer array is empty".to_string()),
    }
}

/// Check that there is one strictly increasing retention time per scan.
pub fn check_retention_times(retention_times: &[f64], n_scans: usize) -> Result<(), SamplingError> {
    if retention_times.len() != n_scans {
        return Err(SamplingError::AxisMismatch {
            axis: "retention time",
            expected: n_scans,
            actual: retention_times.len(),
        });
    }
    match retention_times.windows(2).position(|w| !(w[0] < w[1])) {
        Some(scan) => Err(SamplingError::UnsortedRetentionTimes { index: scan + 1 }),
        None => Ok(()),
    }
}

/// Quantize scans into a canonical row-major matrix of mass bins.
///
/// Rows are the scans in input order. Peaks of one scan that fall into the
/// same bin keep the larger intensity.
pub fn sample<T: Scalar>(
    pointers: &[usize],
    masses: &[f64],
    intensities: &[T],
    resolution: f64,
) -> Result<SparseMatrix<T>, SamplingError> {
    sample_with_axis(pointers, masses, intensities, resolution).map(|(matrix, _)| matrix)
}

/// [`sample`], also returning the mass axis of the columns.
pub fn sample_with_axis<T: Scalar>(
    pointers: &[usize],
    masses: &[f64],
    intensities: &[T],
    resolution: f64,
) -> Result<(SparseMatrix<T>, MassAxis), SamplingError> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(SamplingError::InvalidResolution(resolution));
    }
    check_scan_pointers(pointers, masses.len(), intensities.len())?;
    if let Some(index) = masses.par_iter().position_first(|mass| !mass.is_finite()) {
        return Err(SamplingError::NonFiniteMass { index });
    }

    let n_scans = pointers.len() - 1;
    let bins: Vec<i64> = masses
        .par_iter()
        .map(|&mass| (mass / resolution).round() as i64)
        .collect();

    let (min_bin, max_bin) = match bins.iter().copied().fold(None, |range, bin| match range {
        None => Some((bin, bin)),
        Some((lo, hi)) => Some((bin.min(lo), bin.max(hi))),
    }) {
        Some(range) => range,
        None => {
            let axis = MassAxis {
                min_bin: 0,
                resolution,
                len: 0,
            };
            return Ok((SparseMatrix::zeros(Layout::RowMajor, (n_scans, 0)), axis));
        }
    };

    let len = max_bin
        .checked_sub(min_bin)
        .and_then(|span| usize::try_from(span).ok())
        .and_then(|span| span.checked_add(1))
        .ok_or(SamplingError::MassRangeTooWide { resolution })?;
    let axis = MassAxis {
        min_bin,
        resolution,
        len,
    };
    debug!(
        "sampling {} peaks of {} scans into {} bins of {}",
        masses.len(),
        n_scans,
        axis.len,
        resolution
    );

    let mut indices: Vec<usize> = bins.par_iter().map(|&bin| (bin - min_bin) as usize).collect();
    let mut values = intensities.to_vec();
    sort_within_rows(pointers, &mut indices, &mut values)?;
    let (pointers, indices, values) = merge_duplicates(pointers, &indices, &values, Reduction::Max)?;

    let matrix = SparseMatrix::new(Layout::RowMajor, (n_scans, axis.len), pointers, indices, values)?;
    Ok((matrix.eliminate_zeros(), axis))
}
