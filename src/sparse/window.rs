//! Window statistics with exact accounting of implicit zeros.
//!
//! A window over sparse storage sees a handful of stored values plus a run of
//! implicit zeros. The functions here compute statistics over that multiset
//! without materializing the zeros.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Scalar, SparseError};

/// Statistic computed over every window position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollingOp {
    /// Smallest sample
    Min,
    /// Largest sample
    Max,
    /// Arithmetic mean over the full window width
    Mean,
    /// Upper median over the full window width
    Median,
}

impl RollingOp {
    /// Lower-case operation name
    pub fn as_str(self) -> &'static str {
        match self {
            RollingOp::Min => "min",
            RollingOp::Max => "max",
            RollingOp::Mean => "mean",
            RollingOp::Median => "median",
        }
    }
}

impl fmt::Display for RollingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollingOp {
    type Err = SparseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(RollingOp::Min),
            "max" => Ok(RollingOp::Max),
            "mean" => Ok(RollingOp::Mean),
            "median" => Ok(RollingOp::Median),
            other => Err(SparseError::InvalidParameter(format!(
                "unknown rolling operation '{}'",
                other
            ))),
        }
    }
}

/// Evaluate `op` over `explicit` plus `implicit_count` zero samples.
///
/// The window width is `explicit.len() + implicit_count`; an empty window
/// yields zero. `scratch` is only used by [`RollingOp::Median`] and may hold
/// anything on entry.
///
/// For the median the window is conceptually sorted as
/// `[negatives.., zeros.., positives..]`. The middle rank falls into the
/// negatives or the positives only when enough of them are stored; otherwise
/// it lands on a zero, stored or implicit.
pub fn window_statistic<T: Scalar>(
    op: RollingOp,
    explicit: &[T],
    implicit_count: usize,
    scratch: &mut Vec<T>,
) -> T {
    let width = explicit.len() + implicit_count;
    if width == 0 {
        return T::ZERO;
    }

    match op {
        RollingOp::Min => {
            let seed = if implicit_count > 0 { Some(T::ZERO) } else { None };
            fold(explicit, seed, T::min_of)
        }
        RollingOp::Max => {
            let seed = if implicit_count > 0 { Some(T::ZERO) } else { None };
            fold(explicit, seed, T::max_of)
        }
        RollingOp::Mean => explicit.iter().copied().sum::<T>() / T::from_usize(width),
        RollingOp::Median => {
            scratch.clear();
            scratch.extend_from_slice(explicit);
            scratch.sort_unstable_by(T::total_cmp);

            let rank = width / 2;
            let negatives = scratch.partition_point(|&v| v < T::ZERO);
            let positives = scratch.len() - scratch.partition_point(|&v| v <= T::ZERO);

            if rank < negatives {
                scratch[rank]
            } else if rank >= width - positives {
                scratch[rank - implicit_count]
            } else {
                T::ZERO
            }
        }
    }
}

fn fold<T: Scalar>(values: &[T], seed: Option<T>, pick: fn(T, T) -> T) -> T {
    let mut iter = values.iter().copied();
    let first = match seed.or_else(|| iter.next()) {
        Some(first) => first,
        None => return T::ZERO,
    };
    iter.fold(first, pick)
}
