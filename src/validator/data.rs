//! Checks on stored values and on the axes of an XIC.

use rayon::prelude::*;

use super::report::{ValidationCheck, ValidationReport};
use crate::sparse::Scalar;

/// Explicit zeros and negatives are suspicious, non-finite values are errors.
pub(crate) fn check_values<T: Scalar>(values: &[T], report: &mut ValidationReport) {
    let zeros = values.par_iter().filter(|&&v| v == T::ZERO).count();
    report.add_check(ValidationCheck::warning_if(
        "Explicit zeros",
        (zeros > 0).then(|| format!("{} stored zeros", zeros)),
    ));

    let non_finite = values.par_iter().filter(|v| !v.is_finite()).count();
    report.add_check(ValidationCheck::failed_if(
        "Finite values",
        (non_finite > 0).then(|| format!("{} NaN or infinite values", non_finite)),
    ));

    let negative = values.par_iter().filter(|&&v| v < T::ZERO).count();
    report.add_check(ValidationCheck::warning_if(
        "Non-negative values",
        (negative > 0).then(|| format!("{} negative intensities", negative)),
    ));
}

/// The axis must have one entry per matrix line and increase strictly.
pub(crate) fn check_axis(name: &str, axis: &[f64], expected: usize, report: &mut ValidationReport) {
    report.add_check(ValidationCheck::failed_if(
        format!("{} axis length", name),
        (axis.len() != expected)
            .then(|| format!("{} entries for {} matrix lines", axis.len(), expected)),
    ));

    report.add_check(ValidationCheck::failed_if(
        format!("{} axis order", name),
        axis.windows(2)
            .position(|w| !(w[0] < w[1]))
            .map(|i| format!("entry {} does not exceed its predecessor", i + 1)),
    ));
}
