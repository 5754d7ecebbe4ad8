use log::debug;

use crate::sparse::{rolling, Axis, PaddingMode, RollingOp, Scalar, SparseError, SparseMatrix};

/// Fit a requested baseline window to a run of `n_scans` scans.
///
/// The window is capped at `n_scans - 2` and made odd by stepping down.
pub fn baseline_window(requested: usize, n_scans: usize) -> Result<usize, SparseError> {
    if n_scans < 3 {
        return Err(SparseError::WindowTooLarge {
            window: requested,
            extent: n_scans,
        });
    }
    if requested == 0 {
        return Err(SparseError::InvalidParameter(
            "baseline window must be at least 1".to_string(),
        ));
    }

    let window = requested.min(n_scans - 2);
    Ok(if window % 2 == 0 { window - 1 } else { window })
}

/// Estimate and subtract a slowly varying background along retention time.
///
/// The baseline is the rolling median clipped to the rolling minimum plus
/// that minimum's per-bin standard deviation, smoothed by a rolling mean.
/// Every rolling step mirrors the run at both ends. The result has no
/// negative entries and keeps the layout of `matrix`.
pub fn remove_baseline<T: Scalar>(
    matrix: &SparseMatrix<T>,
    window: usize,
) -> Result<SparseMatrix<T>, SparseError> {
    let window = baseline_window(window, matrix.n_rows())?;
    debug!("baseline removal: window {}", window);

    let step = |input: &SparseMatrix<T>, op| rolling(input, window, Axis::Rows, op, PaddingMode::Symmetric);

    let floor = step(matrix, RollingOp::Min)?;
    let noise = floor.major_std();

    let median = step(matrix, RollingOp::Median)?;
    let clipped = median.clip_to_floor(&floor, &noise)?;
    let base = step(&clipped, RollingOp::Mean)?;
    debug!("baseline estimate has {} entries", base.nnz());

    Ok(matrix.sub(&base)?.clip_negative())
}
