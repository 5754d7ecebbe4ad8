/// Errors raised by the sparse kernels.
///
/// Every kernel checks its preconditions before touching any buffer, so an
/// error never leaves a partially transformed matrix behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SparseError {
    /// The pointer/index/value triple breaks a structural invariant
    #[error("Structural invariant violation: {0}")]
    StructuralInvariantViolation(String),

    /// Axis other than 0 (rows) or 1 (columns)
    #[error("Unsupported axis {0} for a 2 dimensional matrix")]
    UnsupportedAxis(usize),

    /// The window does not fit the windowed axis
    #[error("Window of {window} does not fit an axis of extent {extent}")]
    WindowTooLarge {
        /// Requested window width
        window: usize,
        /// Extent of the windowed axis
        extent: usize,
    },

    /// Unknown edge-handling mode name
    #[error("Unsupported padding mode '{0}'")]
    UnsupportedPaddingMode(String),

    /// Two operands do not have the same shape
    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Shape of the left operand
        left: (usize, usize),
        /// Shape of the right operand
        right: (usize, usize),
    },

    /// A numeric parameter is outside its domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl SparseError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Self::StructuralInvariantViolation(message.into())
    }
}
