//! Two-pass assembly of a compressed matrix from independent major slices.
//!
//! The first pass asks every slice for an upper bound on the number of entries
//! it may produce, the prefix sum of those bounds sizes the output buffers, and
//! the second pass lets every slice fill its own disjoint window of those
//! buffers in parallel. A final sequential pass squeezes out the unused tail of
//! each window while keeping slices in major order.

use rayon::prelude::*;

use super::Scalar;

/// Assembled `(pointers, indices, values)` triple.
pub(crate) type Assembled<T> = (Vec<usize>, Vec<usize>, Vec<T>);

/// Split `buffer` into the per-slice windows described by `pointers`.
///
/// Entries before `pointers[0]` or after the last offset are not handed out.
pub(crate) fn split_major_mut<'a, X>(buffer: &'a mut [X], pointers: &[usize]) -> Vec<&'a mut [X]> {
    let first = pointers.first().copied().unwrap_or(0);
    let last = pointers.last().copied().unwrap_or(first);
    let (_, mut rest) = buffer[..last].split_at_mut(first);

    let mut slices = Vec::with_capacity(pointers.len().saturating_sub(1));
    for bounds in pointers.windows(2) {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(bounds[1] - bounds[0]);
        slices.push(head);
        rest = tail;
    }
    slices
}

/// Exclusive prefix sum, one element longer than `counts`.
pub(crate) fn prefix_sum(counts: &[usize]) -> Vec<usize> {
    let mut pointers = Vec::with_capacity(counts.len() + 1);
    let mut total = 0;
    pointers.push(total);
    for &count in counts {
        total += count;
        pointers.push(total);
    }
    pointers
}

/// Run the bound pass only.
pub(crate) fn bounds_with<S, I, B>(n_major: usize, init: I, bound: B) -> Vec<usize>
where
    I: Fn() -> S + Sync + Send,
    B: Fn(&mut S, usize) -> usize + Sync + Send,
{
    (0..n_major)
        .into_par_iter()
        .map_init(&init, |scratch, major| bound(scratch, major))
        .collect()
}

/// Assemble a matrix slice by slice with per-worker scratch state.
///
/// `fill` receives its slice's output windows, sized by `bound`, and returns
/// how many entries it wrote.
pub(crate) fn assemble_with<T, S, I, B, F>(n_major: usize, init: I, bound: B, fill: F) -> Assembled<T>
where
    T: Scalar,
    I: Fn() -> S + Sync + Send,
    B: Fn(&mut S, usize) -> usize + Sync + Send,
    F: Fn(&mut S, usize, &mut [usize], &mut [T]) -> usize + Sync + Send,
{
    let bounds = bounds_with(n_major, &init, bound);
    let offsets = prefix_sum(&bounds);
    let total = offsets[n_major];

    let mut indices = vec![0usize; total];
    let mut values = vec![T::ZERO; total];

    let written: Vec<usize> = split_major_mut(&mut indices, &offsets)
        .into_par_iter()
        .zip(split_major_mut(&mut values, &offsets))
        .enumerate()
        .map_init(&init, |scratch, (major, (index_out, value_out))| {
            fill(scratch, major, index_out, value_out)
        })
        .collect();

    compact(&offsets, &written, indices, values)
}

/// Scratch-free variant of [`assemble_with`].
pub(crate) fn assemble<T, B, F>(n_major: usize, bound: B, fill: F) -> Assembled<T>
where
    T: Scalar,
    B: Fn(usize) -> usize + Sync + Send,
    F: Fn(usize, &mut [usize], &mut [T]) -> usize + Sync + Send,
{
    assemble_with(
        n_major,
        || (),
        |_, major| bound(major),
        |_, major, index_out, value_out| fill(major, index_out, value_out),
    )
}

fn compact<T: Scalar>(
    offsets: &[usize],
    written: &[usize],
    mut indices: Vec<usize>,
    mut values: Vec<T>,
) -> Assembled<T> {
    let mut pointers = Vec::with_capacity(written.len() + 1);
    let mut cursor = 0;
    pointers.push(cursor);

    for (major, &count) in written.iter().enumerate() {
        let start = offsets[major];
        debug_assert!(count <= offsets[major + 1] - start);
        if start != cursor {
            indices.copy_within(start..start + count, cursor);
            values.copy_within(start..start + count, cursor);
        }
        cursor += count;
        pointers.push(cursor);
    }

    indices.truncate(cursor);
    values.truncate(cursor);
    (pointers, indices, values)
}
