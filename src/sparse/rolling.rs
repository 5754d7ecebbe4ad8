//! Sliding-window kernels over sparse storage.
//!
//! The matrix is brought into the layout whose slices run along the windowed
//! axis, every slice is padded according to the [`PaddingMode`], and the
//! result is assembled in two passes: the allocation pass counts the output
//! positions reachable from a stored entry, the compute pass evaluates the
//! window at exactly those positions. Positions no stored entry can reach see
//! an all-zero window and stay implicit.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::assemble::{assemble_with, bounds_with};
use super::window::{window_statistic, RollingOp};
use super::{Axis, Layout, Scalar, SparseError, SparseMatrix};

/// Edge handling of a sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingMode {
    /// No padding, the output shrinks by `window - 1`
    Valid,
    /// Zero padding of `window - 1` on both sides, the output grows by `window - 1`
    Full,
    /// Mirror the axis at both ends, repeating the edge sample
    Symmetric,
    /// Zero padding, the output keeps the input extent
    Constant,
}

impl PaddingMode {
    /// Lower-case mode name
    pub fn as_str(self) -> &'static str {
        match self {
            PaddingMode::Valid => "valid",
            PaddingMode::Full => "full",
            PaddingMode::Symmetric => "symmetric",
            PaddingMode::Constant => "constant",
        }
    }

    /// Samples added before and after the axis.
    pub fn padding(self, window: usize) -> (usize, usize) {
        match self {
            PaddingMode::Valid => (0, 0),
            PaddingMode::Full => (window.saturating_sub(1), window.saturating_sub(1)),
            PaddingMode::Symmetric | PaddingMode::Constant => {
                (window / 2, window.saturating_sub(1) / 2)
            }
        }
    }

    /// Number of window positions over an axis of `extent` samples.
    pub fn output_extent(self, extent: usize, window: usize) -> usize {
        let (left, right) = self.padding(window);
        (extent + left + right + 1).saturating_sub(window)
    }
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaddingMode {
    type Err = SparseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(PaddingMode::Valid),
            "full" => Ok(PaddingMode::Full),
            "symmetric" => Ok(PaddingMode::Symmetric),
            "constant" => Ok(PaddingMode::Constant),
            other => Err(SparseError::UnsupportedPaddingMode(other.to_string())),
        }
    }
}

/// Scratch buffers owned by one worker.
#[derive(Debug)]
pub(crate) struct KernelScratch<T> {
    /// Padded `(position, value)` entries of the current slice
    padded: Vec<(usize, T)>,
    /// Values of the current window
    pub(crate) samples: Vec<T>,
    /// Sort buffer
    pub(crate) sorted: Vec<T>,
}

impl<T> Default for KernelScratch<T> {
    fn default() -> Self {
        Self {
            padded: Vec::new(),
            samples: Vec::new(),
            sorted: Vec::new(),
        }
    }
}

/// Reduces the stored entries of one window to a value.
pub(crate) trait WindowKernel<T: Scalar>: Sync {
    /// `entries` holds the padded `(position, value)` pairs in
    /// `[start, start + window)`; every other sample of the window is zero.
    fn evaluate(
        &self,
        start: usize,
        window: usize,
        entries: &[(usize, T)],
        samples: &mut Vec<T>,
        sorted: &mut Vec<T>,
    ) -> T;
}

struct StatisticKernel(RollingOp);

impl<T: Scalar> WindowKernel<T> for StatisticKernel {
    fn evaluate(
        &self,
        _start: usize,
        window: usize,
        entries: &[(usize, T)],
        samples: &mut Vec<T>,
        sorted: &mut Vec<T>,
    ) -> T {
        samples.clear();
        samples.extend(entries.iter().map(|&(_, value)| value));
        window_statistic(self.0, samples, window - entries.len(), sorted)
    }
}

/// Window placement along one axis.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    mode: PaddingMode,
    window: usize,
    extent: usize,
    left: usize,
    right: usize,
    out_extent: usize,
}

impl Geometry {
    fn new(mode: PaddingMode, window: usize, extent: usize) -> Result<Self, SparseError> {
        if window == 0 {
            return Err(SparseError::InvalidParameter(
                "window must be at least 1".to_string(),
            ));
        }

        let (left, right) = mode.padding(window);
        let too_large = match mode {
            PaddingMode::Valid => window > extent,
            PaddingMode::Symmetric => left > extent,
            PaddingMode::Full | PaddingMode::Constant => false,
        };
        if too_large {
            return Err(SparseError::WindowTooLarge { window, extent });
        }

        Ok(Self {
            mode,
            window,
            extent,
            left,
            right,
            out_extent: mode.output_extent(extent, window),
        })
    }

    /// Write the padded entries of a canonical slice, ordered by position.
    fn pad<T: Scalar>(&self, indices: &[usize], values: &[T], padded: &mut Vec<(usize, T)>) {
        padded.clear();
        let entries = || indices.iter().copied().zip(values.iter().copied());

        if self.mode == PaddingMode::Symmetric {
            // mirrored head, nearest sample last
            padded.extend(
                entries()
                    .rev()
                    .filter(|&(src, _)| src < self.left)
                    .map(|(src, value)| (self.left - 1 - src, value)),
            );
        }

        padded.extend(entries().map(|(src, value)| (src + self.left, value)));

        if self.mode == PaddingMode::Symmetric {
            let tail = self.left + self.extent;
            padded.extend(
                entries()
                    .rev()
                    .filter(|&(src, _)| src + self.right >= self.extent)
                    .map(|(src, value)| (tail + self.extent - 1 - src, value)),
            );
        }
    }

    /// Visit the disjoint, ascending ranges of output positions whose window
    /// contains at least one padded entry.
    fn touched<T>(&self, padded: &[(usize, T)], mut visit: impl FnMut(Range<usize>)) {
        let mut next = 0;
        for &(position, _) in padded {
            let start = next.max((position + 1).saturating_sub(self.window));
            let end = (position + 1).min(self.out_extent);
            if start < end {
                visit(start..end);
                next = end;
            }
        }
    }

    fn bound<T>(&self, padded: &[(usize, T)]) -> usize {
        let mut count = 0;
        self.touched(padded, |range| count += range.len());
        count
    }

    fn output_shape(&self, axis: Axis, shape: (usize, usize)) -> (usize, usize) {
        match axis {
            Axis::Rows => (self.out_extent, shape.1),
            Axis::Columns => (shape.0, self.out_extent),
        }
    }
}

/// Per-slice upper bounds on the entries a window kernel may produce.
///
/// Slices follow the layout whose minor axis is `axis`.
pub fn allocation_bounds<T: Scalar>(
    matrix: &SparseMatrix<T>,
    window: usize,
    axis: Axis,
    mode: PaddingMode,
) -> Result<Vec<usize>, SparseError> {
    let geometry = Geometry::new(mode, window, matrix.extent(axis))?;
    let source = matrix.canonical_in(Layout::sliding_along(axis))?;
    let source = source.as_ref();

    Ok(bounds_with(
        source.major_extent(),
        Vec::new,
        |padded: &mut Vec<(usize, T)>, major| {
            let (indices, values) = source.slice(major);
            geometry.pad(indices, values, padded);
            geometry.bound(padded)
        },
    ))
}

/// Apply `kernel` at every window position along `axis`.
pub(crate) fn apply_window<T, K>(
    matrix: &SparseMatrix<T>,
    window: usize,
    axis: Axis,
    mode: PaddingMode,
    kernel: &K,
) -> Result<SparseMatrix<T>, SparseError>
where
    T: Scalar,
    K: WindowKernel<T>,
{
    let geometry = Geometry::new(mode, window, matrix.extent(axis))?;
    let layout = Layout::sliding_along(axis);
    let source = matrix.canonical_in(layout)?;
    let source = source.as_ref();

    let assembled = assemble_with(
        source.major_extent(),
        KernelScratch::<T>::default,
        |scratch, major| {
            let (indices, values) = source.slice(major);
            geometry.pad(indices, values, &mut scratch.padded);
            geometry.bound(&scratch.padded)
        },
        |scratch, major, index_out, value_out| {
            let (indices, values) = source.slice(major);
            let KernelScratch {
                padded,
                samples,
                sorted,
            } = scratch;
            geometry.pad(indices, values, padded);

            let (mut lo, mut hi, mut written) = (0, 0, 0);
            geometry.touched(&padded[..], |range| {
                for start in range {
                    while hi < padded.len() && padded[hi].0 < start + window {
                        hi += 1;
                    }
                    while lo < hi && padded[lo].0 < start {
                        lo += 1;
                    }
                    let value = kernel.evaluate(start, window, &padded[lo..hi], samples, sorted);
                    if value != T::ZERO {
                        index_out[written] = start;
                        value_out[written] = value;
                        written += 1;
                    }
                }
            });
            written
        },
    );

    Ok(SparseMatrix::from_assembled(
        layout,
        geometry.output_shape(axis, matrix.shape()),
        assembled,
    ))
}

/// Rolling `op` with a window of `window` samples sliding along `axis`.
///
/// The result is canonical and stored in the layout whose slices run along
/// `axis` (column-major for [`Axis::Rows`]).
pub fn rolling<T: Scalar>(
    matrix: &SparseMatrix<T>,
    window: usize,
    axis: Axis,
    op: RollingOp,
    mode: PaddingMode,
) -> Result<SparseMatrix<T>, SparseError> {
    debug!(
        "rolling {} over {:?} (window {}, {} padding, {} stored)",
        op,
        axis,
        window,
        mode,
        matrix.nnz()
    );
    apply_window(matrix, window, axis, mode, &StatisticKernel(op))
}
