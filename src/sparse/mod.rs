//! # Sparse Kernel Module
//!
//! Compressed sparse matrices and the kernels of the preprocessing pipeline,
//! all operating on `(pointers, indices, values)` storage without ever
//! densifying it.
//!
//! ## Design Principles
//!
//! 1. **Two-Pass Assembly**: Kernels first bound the number of entries every
//!    major slice can produce, allocate once, then fill the slices in parallel.
//!
//! 2. **Canonical Outputs**: Every kernel returns sorted, duplicate-free
//!    slices and never stores an explicit zero.
//!
//! 3. **Implicit Zeros Are Samples**: Window statistics count the zeros that
//!    are not stored, so results match a dense computation exactly.
//!
//! 4. **Slice Parallelism**: Slices are independent; work is spread over
//!    them with `rayon` and stitched back together in slice order.

mod assemble;
mod canonical;
mod error;
mod matrix;
mod rolling;
mod savgol;
mod scalar;
mod window;


pub use canonical::{
    is_canonical, is_sorted_within_rows, is_valid_indexing, is_valid_matrix, merge_duplicates,
    sort_within_rows, unique_mask, Reduction,
};
pub use error::SparseError;
pub use matrix::{Axis, Layout, SparseMatrix, SparseParts};
pub use rolling::{allocation_bounds, rolling, PaddingMode};
pub use savgol::{savgol, savgol_coefficients};
pub use scalar::Scalar;
pub use window::{window_statistic, RollingOp};
