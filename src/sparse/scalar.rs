use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Numeric element type stored in a [`SparseMatrix`](super::SparseMatrix).
///
/// Implemented for `f32` and `f64`; intensities keep whichever of the two the
/// scan loader produced.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialOrd
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + Sum
    + 'static
{
    /// Additive identity
    const ZERO: Self;

    /// Quiet NaN
    const NAN: Self;

    /// Lossy conversion from `f64`
    fn from_f64(value: f64) -> Self;

    /// Widening conversion to `f64`
    fn to_f64(self) -> f64;

    /// Conversion from a sample count
    fn from_usize(value: usize) -> Self;

    /// True for NaN
    fn is_nan(self) -> bool;

    /// True unless NaN or infinite
    fn is_finite(self) -> bool;

    /// Square root
    fn sqrt(self) -> Self;

    /// Total ordering used when sorting window samples
    fn total_cmp(&self, other: &Self) -> std::cmp::Ordering;

    /// Smaller of two values
    fn min_of(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Larger of two values
    fn max_of(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }
}

macro_rules! impl_scalar {
    ($ty:ty) => {
        impl Scalar for $ty {
            const ZERO: Self = 0.0;
            const NAN: Self = <$ty>::NAN;

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_usize(value: usize) -> Self {
                value as $ty
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$ty>::is_nan(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            #[inline]
            fn sqrt(self) -> Self {
                <$ty>::sqrt(self)
            }

            #[inline]
            fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
                <$ty>::total_cmp(self, other)
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);
