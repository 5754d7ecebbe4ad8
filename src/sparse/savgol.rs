//! Savitzky-Golay smoothing of sparse signals.

use log::debug;
use nalgebra::DMatrix;

use super::rolling::{apply_window, PaddingMode, WindowKernel};
use super::{Axis, Scalar, SparseError, SparseMatrix};

/// Least-squares smoothing coefficients for `window` samples and a
/// polynomial of `degree`, evaluated at the window centre.
///
/// Windows of at most three samples clamp the degree to `window - 1`.
pub fn savgol_coefficients(window: usize, degree: usize) -> Result<Vec<f64>, SparseError> {
    if window == 0 {
        return Err(SparseError::InvalidParameter(
            "Savitzky-Golay window must be at least 1".to_string(),
        ));
    }
    let degree = if window <= 3 { degree.min(window - 1) } else { degree };
    if degree >= window {
        return Err(SparseError::InvalidParameter(format!(
            "polynomial degree {} must be smaller than the window {}",
            degree, window
        )));
    }

    let half = (window / 2) as f64;
    let centre = if window % 2 == 0 { half - 0.5 } else { half };

    let design = DMatrix::from_fn(window, degree + 1, |i, power| {
        (i as f64 - centre).powi(power as i32)
    });
    let pseudo_inverse = design
        .pseudo_inverse(f64::EPSILON)
        .map_err(|e| SparseError::InvalidParameter(e.to_string()))?;

    Ok(pseudo_inverse.row(0).iter().copied().collect())
}

struct SavgolKernel<T> {
    coefficients: Vec<T>,
}

impl<T: Scalar> WindowKernel<T> for SavgolKernel<T> {
    fn evaluate(
        &self,
        start: usize,
        _window: usize,
        entries: &[(usize, T)],
        _samples: &mut Vec<T>,
        _sorted: &mut Vec<T>,
    ) -> T {
        entries
            .iter()
            .map(|&(position, value)| self.coefficients[position - start] * value)
            .sum()
    }
}

/// Smooth every line along `axis` with a Savitzky-Golay filter.
///
/// The signal is zero-padded so the output keeps the input extent; implicit
/// zeros contribute nothing to the weighted sums.
pub fn savgol<T: Scalar>(
    matrix: &SparseMatrix<T>,
    window: usize,
    degree: usize,
    axis: Axis,
) -> Result<SparseMatrix<T>, SparseError> {
    let coefficients = savgol_coefficients(window, degree)?
        .into_iter()
        .map(T::from_f64)
        .collect();
    debug!(
        "savgol over {:?} (window {}, degree {}, {} stored)",
        axis,
        window,
        degree,
        matrix.nnz()
    );
    apply_window(
        matrix,
        window,
        axis,
        PaddingMode::Constant,
        &SavgolKernel { coefficients },
    )
}
