use log::debug;

use crate::sparse::{savgol, Axis, Layout, Reduction, Scalar, SparseError, SparseMatrix};

/// `round(peak_width)`, bumped to the next odd number.
pub(crate) fn odd_window(peak_width: f64) -> usize {
    let window = peak_width.round().max(0.0) as usize;
    if window % 2 == 0 {
        window + 1
    } else {
        window
    }
}

/// Smooth every mass trace along retention time and drop negative
/// intensities.
///
/// Uses a cubic Savitzky-Golay filter over the odd window closest to
/// `peak_width`.
pub fn remove_noise<T: Scalar>(
    matrix: &SparseMatrix<T>,
    peak_width: f64,
) -> Result<SparseMatrix<T>, SparseError> {
    remove_noise_with(matrix, peak_width, 3)
}

/// [`remove_noise`] with an explicit upper bound on the polynomial degree.
pub fn remove_noise_with<T: Scalar>(
    matrix: &SparseMatrix<T>,
    peak_width: f64,
    max_degree: usize,
) -> Result<SparseMatrix<T>, SparseError> {
    if !peak_width.is_finite() || peak_width < 0.0 {
        return Err(SparseError::InvalidParameter(format!(
            "peak width must be non-negative, got {}",
            peak_width
        )));
    }

    let window = odd_window(peak_width);
    let degree = max_degree.min(window - 1);
    debug!("noise removal: window {}, degree {}", window, degree);

    let smoothed = if degree > 0 {
        savgol(matrix, window, degree, Axis::Rows)?.to_layout(matrix.layout())
    } else {
        matrix.clone()
    };
    smoothed.clip_negative().canonicalize(Reduction::Sum)
}

/// Clear every mass bin whose largest intensity is below `threshold`.
pub fn drop_weak_bins<T: Scalar>(matrix: &SparseMatrix<T>, threshold: T) -> SparseMatrix<T> {
    let by_bin = matrix.to_layout(Layout::ColumnMajor);
    let kept = by_bin.retain_slices(|_, values| values.iter().any(|&value| value >= threshold));
    debug!(
        "dropped {} of {} entries in bins below {:?}",
        by_bin.nnz() - kept.nnz(),
        by_bin.nnz(),
        threshold
    );
    kept.to_layout(matrix.layout())
}
