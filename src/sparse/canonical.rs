//! Structural checks and in-place canonicalization of compressed indices.
//!
//! All functions work on raw `(pointers, indices, values)` buffers so that
//! they can be applied to transient buffers before a
//! [`SparseMatrix`](super::SparseMatrix) exists. A major slice `i` owns the
//! entries `pointers[i]..pointers[i + 1]`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::assemble::{assemble, split_major_mut};
use super::{Scalar, SparseError};

/// How a run of duplicate minor indices collapses into one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Keep the largest value, ignoring NaN (max-pooling)
    Max,
    /// Add the values up
    Sum,
}

impl Reduction {
    /// Reduce a non-empty run of values.
    pub fn reduce<T: Scalar>(self, run: &[T]) -> T {
        match self {
            Reduction::Max => run.iter().copied().fold(T::NAN, |acc, value| {
                if acc.is_nan() || value > acc {
                    value
                } else {
                    acc
                }
            }),
            Reduction::Sum => run.iter().copied().sum(),
        }
    }
}

/// True iff `pointers` is non-empty, non-decreasing and its last offset fits
/// inside `indices`.
///
/// Offsets are unsigned, so the first offset is never negative.
pub fn is_valid_indexing(pointers: &[usize], indices: &[usize]) -> bool {
    match pointers.last() {
        Some(&last) => last <= indices.len() && pointers.windows(2).all(|w| w[0] <= w[1]),
        None => false,
    }
}

/// [`is_valid_indexing`] plus one value per index.
pub fn is_valid_matrix<T>(pointers: &[usize], indices: &[usize], values: &[T]) -> bool {
    is_valid_indexing(pointers, indices) && indices.len() == values.len()
}

/// True iff indices are non-decreasing within every major slice.
pub fn is_sorted_within_rows(pointers: &[usize], indices: &[usize]) -> Result<bool, SparseError> {
    ensure_indexing(pointers, indices)?;
    Ok(pointers
        .par_windows(2)
        .all(|w| is_sorted(&indices[w[0]..w[1]])))
}

/// True iff indices are strictly increasing within every major slice.
pub fn is_canonical(pointers: &[usize], indices: &[usize]) -> Result<bool, SparseError> {
    ensure_indexing(pointers, indices)?;
    Ok(pointers
        .par_windows(2)
        .all(|w| indices[w[0]..w[1]].windows(2).all(|pair| pair[0] < pair[1])))
}

/// Stable in-place sort of `(index, value)` pairs within every major slice.
///
/// Slices that are already sorted are left untouched.
pub fn sort_within_rows<T: Scalar>(
    pointers: &[usize],
    indices: &mut [usize],
    values: &mut [T],
) -> Result<(), SparseError> {
    ensure_matrix(pointers, indices, values)?;

    split_major_mut(indices, pointers)
        .into_par_iter()
        .zip(split_major_mut(values, pointers))
        .for_each_init(Vec::new, |pairs: &mut Vec<(usize, T)>, (index_slice, value_slice)| {
            if is_sorted(index_slice) {
                return;
            }

            pairs.clear();
            pairs.extend(index_slice.iter().copied().zip(value_slice.iter().copied()));
            pairs.sort_by_key(|&(index, _)| index);

            for ((index, value), &(sorted_index, sorted_value)) in
                index_slice.iter_mut().zip(value_slice.iter_mut()).zip(pairs.iter())
            {
                *index = sorted_index;
                *value = sorted_value;
            }
        });

    Ok(())
}

/// Marks the first entry of every run of equal indices within a slice.
///
/// `mask[k]` is false iff `indices[k] == indices[k - 1]` inside the same
/// slice. Entries outside `pointers[0]..pointers[last]` are marked true.
pub fn unique_mask(pointers: &[usize], indices: &[usize]) -> Result<Vec<bool>, SparseError> {
    ensure_sorted(pointers, indices)?;

    let mut mask = vec![true; indices.len()];
    split_major_mut(&mut mask, pointers)
        .into_par_iter()
        .zip(pointers.par_windows(2))
        .for_each(|(slice_mask, w)| {
            let slice = &indices[w[0]..w[1]];
            for k in 1..slice.len() {
                slice_mask[k] = slice[k] != slice[k - 1];
            }
        });

    Ok(mask)
}

/// Collapse runs of equal indices within each slice into a single entry.
///
/// The output pointers start at zero and are the prefix sum of the per-slice
/// unique counts.
pub fn merge_duplicates<T: Scalar>(
    pointers: &[usize],
    indices: &[usize],
    values: &[T],
    reduction: Reduction,
) -> Result<(Vec<usize>, Vec<usize>, Vec<T>), SparseError> {
    ensure_matrix(pointers, indices, values)?;
    let mask = unique_mask(pointers, indices)?;

    let n_major = pointers.len() - 1;
    Ok(assemble(
        n_major,
        |major| {
            let (a, b) = (pointers[major], pointers[major + 1]);
            mask[a..b].iter().filter(|&&unique| unique).count()
        },
        |major, index_out, value_out| {
            let (a, b) = (pointers[major], pointers[major + 1]);
            let mut written = 0;
            let mut run_start = a;
            while run_start < b {
                let mut run_end = run_start + 1;
                while run_end < b && !mask[run_end] {
                    run_end += 1;
                }
                index_out[written] = indices[run_start];
                value_out[written] = reduction.reduce(&values[run_start..run_end]);
                written += 1;
                run_start = run_end;
            }
            written
        },
    ))
}

fn is_sorted(indices: &[usize]) -> bool {
    indices.windows(2).all(|pair| pair[0] <= pair[1])
}

fn ensure_indexing(pointers: &[usize], indices: &[usize]) -> Result<(), SparseError> {
    if is_valid_indexing(pointers, indices) {
        Ok(())
    } else {
        Err(SparseError::structural(format!(
            "pointer array of length {} is not a valid indexing of {} entries",
            pointers.len(),
            indices.len()
        )))
    }
}

fn ensure_matrix<T>(pointers: &[usize], indices: &[usize], values: &[T]) -> Result<(), SparseError> {
    ensure_indexing(pointers, indices)?;
    if indices.len() != values.len() {
        return Err(SparseError::structural(format!(
            "{} indices but {} values",
            indices.len(),
            values.len()
        )));
    }
    Ok(())
}

fn ensure_sorted(pointers: &[usize], indices: &[usize]) -> Result<(), SparseError> {
    if is_sorted_within_rows(pointers, indices)? {
        Ok(())
    } else {
        Err(SparseError::structural("indices are not sorted within each slice"))
    }
}
