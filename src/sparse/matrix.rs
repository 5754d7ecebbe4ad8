use std::borrow::Cow;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::assemble::{assemble, prefix_sum, Assembled};
use super::canonical::{self, Reduction};
use super::{Scalar, SparseError};

/// One of the two axes of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Axis 0, indexed by the row number (scans / retention time)
    Rows,
    /// Axis 1, indexed by the column number (mass bins)
    Columns,
}

impl Axis {
    /// Numeric axis id (0 or 1)
    pub fn index(self) -> usize {
        match self {
            Axis::Rows => 0,
            Axis::Columns => 1,
        }
    }

    /// The other axis
    pub fn other(self) -> Self {
        match self {
            Axis::Rows => Axis::Columns,
            Axis::Columns => Axis::Rows,
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = SparseError;

    fn try_from(axis: usize) -> Result<Self, Self::Error> {
        match axis {
            0 => Ok(Axis::Rows),
            1 => Ok(Axis::Columns),
            other => Err(SparseError::UnsupportedAxis(other)),
        }
    }
}

/// Which axis the pointer array compresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Compressed rows (CSR): slices are rows, indices are columns
    RowMajor,
    /// Compressed columns (CSC): slices are columns, indices are rows
    ColumnMajor,
}

impl Layout {
    /// Axis enumerated by the pointer array
    pub fn major_axis(self) -> Axis {
        match self {
            Layout::RowMajor => Axis::Rows,
            Layout::ColumnMajor => Axis::Columns,
        }
    }

    /// Axis stored in the index array
    pub fn minor_axis(self) -> Axis {
        self.major_axis().other()
    }

    /// Layout whose slices run along `axis`, so a window sliding along
    /// `axis` walks a single slice.
    pub fn sliding_along(axis: Axis) -> Self {
        match axis {
            Axis::Rows => Layout::ColumnMajor,
            Axis::Columns => Layout::RowMajor,
        }
    }
}

fn extent_of(shape: (usize, usize), axis: Axis) -> usize {
    match axis {
        Axis::Rows => shape.0,
        Axis::Columns => shape.1,
    }
}

/// Unvalidated storage of a sparse matrix, as found on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseParts<T> {
    /// Compression layout
    pub layout: Layout,
    /// `(rows, columns)`
    pub shape: (usize, usize),
    /// Slice offsets, one more than the major extent
    pub pointers: Vec<usize>,
    /// Minor-axis coordinate of every stored entry
    pub indices: Vec<usize>,
    /// Stored values, one per index
    pub values: Vec<T>,
}

impl<T> SparseParts<T> {
    /// Extent of the axis enumerated by `pointers`
    pub fn major_extent(&self) -> usize {
        extent_of(self.shape, self.layout.major_axis())
    }

    /// Extent of the axis stored in `indices`
    pub fn minor_extent(&self) -> usize {
        extent_of(self.shape, self.layout.minor_axis())
    }
}

/// A structurally valid sparse matrix in CSR or CSC form.
///
/// Indices are not required to be canonical (sorted and unique within each
/// slice); kernels canonicalize their inputs on entry and always return
/// canonical matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "SparseParts<T>",
    into = "SparseParts<T>",
    bound(
        serialize = "T: Scalar + Serialize",
        deserialize = "T: Scalar + Deserialize<'de>"
    )
)]
pub struct SparseMatrix<T> {
    layout: Layout,
    shape: (usize, usize),
    pointers: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> SparseMatrix<T> {
    /// Build a matrix, checking every structural invariant.
    pub fn new(
        layout: Layout,
        shape: (usize, usize),
        pointers: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, SparseError> {
        Self::from_parts(SparseParts {
            layout,
            shape,
            pointers,
            indices,
            values,
        })
    }

    /// Validate raw parts and take ownership of them.
    pub fn from_parts(parts: SparseParts<T>) -> Result<Self, SparseError> {
        let major = parts.major_extent();
        let minor = parts.minor_extent();

        if parts.pointers.len() != major + 1 {
            return Err(SparseError::structural(format!(
                "expected {} pointers for a major extent of {}, got {}",
                major + 1,
                major,
                parts.pointers.len()
            )));
        }
        if !canonical::is_valid_matrix(&parts.pointers, &parts.indices, &parts.values) {
            return Err(SparseError::structural(
                "pointers must be non-decreasing and indices must match values",
            ));
        }
        if parts.pointers[0] != 0 || parts.pointers[major] != parts.indices.len() {
            return Err(SparseError::structural(format!(
                "pointers must span exactly 0..{}",
                parts.indices.len()
            )));
        }
        if let Some(index) = parts.indices.par_iter().find_any(|&&index| index >= minor) {
            return Err(SparseError::structural(format!(
                "index {} out of bounds for minor extent {}",
                index, minor
            )));
        }

        Ok(Self {
            layout: parts.layout,
            shape: parts.shape,
            pointers: parts.pointers,
            indices: parts.indices,
            values: parts.values,
        })
    }

    /// Wrap buffers produced by a kernel that upholds the invariants itself.
    pub(crate) fn from_assembled(
        layout: Layout,
        shape: (usize, usize),
        (pointers, indices, values): Assembled<T>,
    ) -> Self {
        debug_assert!(canonical::is_valid_matrix(&pointers, &indices, &values));
        debug_assert_eq!(pointers.len(), extent_of(shape, layout.major_axis()) + 1);
        Self {
            layout,
            shape,
            pointers,
            indices,
            values,
        }
    }

    /// Matrix without stored entries.
    pub fn zeros(layout: Layout, shape: (usize, usize)) -> Self {
        let major = extent_of(shape, layout.major_axis());
        Self {
            layout,
            shape,
            pointers: vec![0; major + 1],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Row-major matrix holding the non-zero entries of a dense row list.
    pub fn from_dense(rows: &[Vec<T>]) -> Result<Self, SparseError> {
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(SparseError::structural(format!(
                "ragged dense input: row of length {} in a matrix of width {}",
                row.len(),
                n_cols
            )));
        }

        let mut pointers = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        pointers.push(0);
        for row in rows {
            for (col, &value) in row.iter().enumerate() {
                if value != T::ZERO {
                    indices.push(col);
                    values.push(value);
                }
            }
            pointers.push(indices.len());
        }

        Self::new(Layout::RowMajor, (rows.len(), n_cols), pointers, indices, values)
    }

    /// Dense copy as a list of rows; duplicate entries are summed.
    pub fn to_dense(&self) -> Vec<Vec<T>> {
        let mut dense = vec![vec![T::ZERO; self.shape.1]; self.shape.0];
        for major in 0..self.major_extent() {
            let (indices, values) = self.slice(major);
            for (&minor, &value) in indices.iter().zip(values) {
                let (row, col) = self.coordinates(major, minor);
                dense[row][col] += value;
            }
        }
        dense
    }

    /// Give up ownership of the buffers.
    pub fn into_parts(self) -> SparseParts<T> {
        SparseParts {
            layout: self.layout,
            shape: self.shape,
            pointers: self.pointers,
            indices: self.indices,
            values: self.values,
        }
    }

    /// Compression layout
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.shape.0
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.shape.1
    }

    /// Extent of `axis`
    pub fn extent(&self, axis: Axis) -> usize {
        extent_of(self.shape, axis)
    }

    /// Number of slices
    pub fn major_extent(&self) -> usize {
        self.extent(self.layout.major_axis())
    }

    /// Length of every slice
    pub fn minor_extent(&self) -> usize {
        self.extent(self.layout.minor_axis())
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Slice offsets
    pub fn pointers(&self) -> &[usize] {
        &self.pointers
    }

    /// Minor-axis coordinates
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Indices and values of slice `major`.
    pub fn slice(&self, major: usize) -> (&[usize], &[T]) {
        let (a, b) = (self.pointers[major], self.pointers[major + 1]);
        (&self.indices[a..b], &self.values[a..b])
    }

    /// Value at `(row, col)`; implicit entries read as zero.
    pub fn get(&self, row: usize, col: usize) -> T {
        let (major, minor) = match self.layout {
            Layout::RowMajor => (row, col),
            Layout::ColumnMajor => (col, row),
        };
        let (indices, values) = self.slice(major);
        indices
            .iter()
            .zip(values)
            .filter(|&(&index, _)| index == minor)
            .map(|(_, &value)| value)
            .sum()
    }

    /// Strictly increasing indices within every slice
    pub fn is_canonical(&self) -> bool {
        self.pointers
            .par_windows(2)
            .all(|w| self.indices[w[0]..w[1]].windows(2).all(|pair| pair[0] < pair[1]))
    }

    /// Sort every slice and merge duplicate indices with `reduction`.
    pub fn canonicalize(self, reduction: Reduction) -> Result<Self, SparseError> {
        if self.is_canonical() {
            return Ok(self);
        }

        let Self {
            layout,
            shape,
            pointers,
            mut indices,
            mut values,
        } = self;
        canonical::sort_within_rows(&pointers, &mut indices, &mut values)?;
        let merged = canonical::merge_duplicates(&pointers, &indices, &values, reduction)?;
        Ok(Self::from_assembled(layout, shape, merged))
    }

    /// Canonical view of this matrix in `layout`, converting and summing
    /// duplicates only when needed.
    pub(crate) fn canonical_in(&self, layout: Layout) -> Result<Cow<'_, Self>, SparseError> {
        let converted = if self.layout == layout {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.to_layout(layout))
        };

        if converted.is_canonical() {
            Ok(converted)
        } else {
            Ok(Cow::Owned(converted.into_owned().canonicalize(Reduction::Sum)?))
        }
    }

    /// Same matrix stored in `layout`.
    ///
    /// Uses a counting sort over the minor indices, so sorted slices stay
    /// sorted after the conversion.
    pub fn to_layout(&self, layout: Layout) -> Self {
        if layout == self.layout {
            return self.clone();
        }

        let new_major = self.minor_extent();
        let mut counts = vec![0usize; new_major];
        for &index in &self.indices {
            counts[index] += 1;
        }

        let pointers = prefix_sum(&counts);
        let mut cursor = pointers[..new_major].to_vec();
        let mut indices = vec![0usize; self.nnz()];
        let mut values = vec![T::ZERO; self.nnz()];

        for old_major in 0..self.major_extent() {
            let (slice_indices, slice_values) = self.slice(old_major);
            for (&minor, &value) in slice_indices.iter().zip(slice_values) {
                let dst = &mut cursor[minor];
                indices[*dst] = old_major;
                values[*dst] = value;
                *dst += 1;
            }
        }

        Self {
            layout,
            shape: self.shape,
            pointers,
            indices,
            values,
        }
    }

    /// Drop explicitly stored zeros.
    pub fn eliminate_zeros(&self) -> Self {
        self.filter_map_values(|value| value)
    }

    /// Replace negative entries by zero and drop every zero.
    pub fn clip_negative(&self) -> Self {
        self.filter_map_values(|value| if value < T::ZERO { T::ZERO } else { value })
    }

    /// Clear every slice for which `keep(major, values)` is false.
    pub fn retain_slices<F>(&self, keep: F) -> Self
    where
        F: Fn(usize, &[T]) -> bool + Sync + Send,
    {
        let assembled = assemble(
            self.major_extent(),
            |major| self.pointers[major + 1] - self.pointers[major],
            |major, index_out, value_out| {
                let (indices, values) = self.slice(major);
                if !keep(major, values) {
                    return 0;
                }
                index_out.copy_from_slice(indices);
                value_out.copy_from_slice(values);
                indices.len()
            },
        );
        Self::from_assembled(self.layout, self.shape, assembled)
    }

    /// Element-wise `self - other`, in the layout of `self`.
    ///
    /// Entries that cancel out are not stored.
    pub fn sub(&self, other: &Self) -> Result<Self, SparseError> {
        self.zip_union(other, |_, a, b| a - b)
    }

    /// Element-wise `min(self, floor + offsets[major])`.
    ///
    /// `offsets` holds one value per slice of `self`. Positions where neither
    /// matrix stores an entry keep their implicit zero, so offsets must not be
    /// negative.
    pub fn clip_to_floor(&self, floor: &Self, offsets: &[T]) -> Result<Self, SparseError> {
        if offsets.len() != self.major_extent() {
            return Err(SparseError::InvalidParameter(format!(
                "{} offsets for {} slices",
                offsets.len(),
                self.major_extent()
            )));
        }
        if offsets.iter().any(|&offset| offset < T::ZERO) {
            return Err(SparseError::InvalidParameter(
                "floor offsets must be non-negative".to_string(),
            ));
        }
        self.zip_union(floor, |major, value, bound| value.min_of(bound + offsets[major]))
    }

    /// Population standard deviation of every slice over the full minor
    /// extent, implicit zeros included.
    pub fn major_std(&self) -> Vec<T> {
        let minor = self.minor_extent();
        if minor == 0 {
            return vec![T::ZERO; self.major_extent()];
        }

        let n = T::from_usize(minor);
        self.pointers
            .par_windows(2)
            .map(|w| {
                let slice = &self.values[w[0]..w[1]];
                let mean = slice.iter().copied().sum::<T>() / n;
                // implicit zeros each deviate by `mean`
                let implicit = T::from_usize(minor.saturating_sub(slice.len()));
                let stored: T = slice
                    .iter()
                    .map(|&value| (value - mean) * (value - mean))
                    .sum();
                ((stored + implicit * mean * mean) / n).sqrt()
            })
            .collect()
    }

    fn coordinates(&self, major: usize, minor: usize) -> (usize, usize) {
        match self.layout {
            Layout::RowMajor => (major, minor),
            Layout::ColumnMajor => (minor, major),
        }
    }

    fn filter_map_values<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T + Sync + Send,
    {
        let assembled = assemble(
            self.major_extent(),
            |major| self.pointers[major + 1] - self.pointers[major],
            |major, index_out, value_out| {
                let (indices, values) = self.slice(major);
                let mut written = 0;
                for (&index, &value) in indices.iter().zip(values) {
                    let mapped = f(value);
                    if mapped != T::ZERO {
                        index_out[written] = index;
                        value_out[written] = mapped;
                        written += 1;
                    }
                }
                written
            },
        );
        Self::from_assembled(self.layout, self.shape, assembled)
    }

    /// Combine two matrices over the union of their stored positions.
    ///
    /// `f(major, a, b)` sees implicit entries as zero; zero results are not
    /// stored.
    fn zip_union<F>(&self, other: &Self, f: F) -> Result<Self, SparseError>
    where
        F: Fn(usize, T, T) -> T + Sync + Send,
    {
        if self.shape != other.shape {
            return Err(SparseError::ShapeMismatch {
                left: self.shape,
                right: other.shape,
            });
        }

        let left = self.canonical_in(self.layout)?;
        let right = other.canonical_in(self.layout)?;
        let (left, right) = (left.as_ref(), right.as_ref());

        let assembled = assemble(
            self.major_extent(),
            |major| {
                (left.pointers[major + 1] - left.pointers[major])
                    + (right.pointers[major + 1] - right.pointers[major])
            },
            |major, index_out, value_out| {
                let (a_indices, a_values) = left.slice(major);
                let (b_indices, b_values) = right.slice(major);
                let (mut i, mut j, mut written) = (0, 0, 0);

                while i < a_indices.len() || j < b_indices.len() {
                    let a_index = a_indices.get(i).copied().unwrap_or(usize::MAX);
                    let b_index = b_indices.get(j).copied().unwrap_or(usize::MAX);
                    let index = a_index.min(b_index);

                    let a = if a_index == index {
                        i += 1;
                        a_values[i - 1]
                    } else {
                        T::ZERO
                    };
                    let b = if b_index == index {
                        j += 1;
                        b_values[j - 1]
                    } else {
                        T::ZERO
                    };

                    let value = f(major, a, b);
                    if value != T::ZERO {
                        index_out[written] = index;
                        value_out[written] = value;
                        written += 1;
                    }
                }
                written
            },
        );

        Ok(Self::from_assembled(self.layout, self.shape, assembled))
    }
}

impl<T: Scalar> TryFrom<SparseParts<T>> for SparseMatrix<T> {
    type Error = SparseError;

    fn try_from(parts: SparseParts<T>) -> Result<Self, Self::Error> {
        Self::from_parts(parts)
    }
}

impl<T> From<SparseMatrix<T>> for SparseParts<T> {
    fn from(matrix: SparseMatrix<T>) -> Self {
        SparseParts {
            layout: matrix.layout,
            shape: matrix.shape,
            pointers: matrix.pointers,
            indices: matrix.indices,
            values: matrix.values,
        }
    }
}
