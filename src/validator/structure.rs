//! Structural checks on raw compressed storage.

use rayon::prelude::*;

use super::report::{ValidationCheck, ValidationReport};
use crate::sparse::{is_sorted_within_rows, unique_mask, Scalar, SparseParts};

/// Check the pointer/index/value triple. Returns whether the storage can be
/// walked slice by slice.
pub(crate) fn check_structure<T: Scalar>(parts: &SparseParts<T>, report: &mut ValidationReport) -> bool {
    let major = parts.major_extent();
    let minor = parts.minor_extent();
    let pointers = &parts.pointers;

    let shape_ok = report.record(ValidationCheck::failed_if(
        "Pointer array length",
        (pointers.len() != major + 1).then(|| {
            format!(
                "{} pointers for {} slices of a {:?} {:?} matrix",
                pointers.len(),
                major,
                parts.shape,
                parts.layout
            )
        }),
    ));
    if !shape_ok {
        return false;
    }

    let first_ok = report.record(ValidationCheck::failed_if(
        "First offset",
        (pointers[0] != 0).then(|| format!("first offset is {}", pointers[0])),
    ));

    let monotonic_ok = report.record(ValidationCheck::failed_if(
        "Pointer monotonicity",
        pointers
            .windows(2)
            .position(|w| w[0] > w[1])
            .map(|slice| format!("pointer of slice {} decreases", slice + 1)),
    ));

    let last = pointers[major];
    let last_ok = report.record(ValidationCheck::failed_if(
        "Last offset",
        (last != parts.indices.len())
            .then(|| format!("last offset is {} but {} indices are stored", last, parts.indices.len())),
    ));

    let values_ok = report.record(ValidationCheck::failed_if(
        "Value count",
        (parts.values.len() != parts.indices.len()).then(|| {
            format!(
                "{} values for {} indices",
                parts.values.len(),
                parts.indices.len()
            )
        }),
    ));

    let out_of_bounds = parts.indices.par_iter().filter(|&&index| index >= minor).count();
    let bounds_ok = report.record(ValidationCheck::failed_if(
        "Index bounds",
        (out_of_bounds > 0).then(|| {
            format!(
                "{} indices outside the minor extent {}",
                out_of_bounds, minor
            )
        }),
    ));

    first_ok && monotonic_ok && last_ok && values_ok && bounds_ok
}

/// Check that every slice is sorted and duplicate-free. Requires a walkable
/// structure.
pub(crate) fn check_canonical<T: Scalar>(parts: &SparseParts<T>, report: &mut ValidationReport) {
    let sorted = match is_sorted_within_rows(&parts.pointers, &parts.indices) {
        Ok(sorted) => sorted,
        Err(e) => {
            report.add_check(ValidationCheck::failed("Sorted indices", e.to_string()));
            return;
        }
    };

    if !sorted {
        let unsorted = parts
            .pointers
            .windows(2)
            .filter(|w| parts.indices[w[0]..w[1]].windows(2).any(|pair| pair[0] > pair[1]))
            .count();
        report.add_check(ValidationCheck::failed(
            "Sorted indices",
            format!("{} slices are not sorted", unsorted),
        ));
        return;
    }
    report.add_check(ValidationCheck::ok("Sorted indices"));

    match unique_mask(&parts.pointers, &parts.indices) {
        Ok(mask) => {
            let duplicates = mask.iter().filter(|&&unique| !unique).count();
            report.add_check(ValidationCheck::failed_if(
                "Duplicate entries",
                (duplicates > 0).then(|| format!("{} duplicate entries", duplicates)),
            ));
        }
        Err(e) => report.add_check(ValidationCheck::failed("Duplicate entries", e.to_string())),
    }
}
