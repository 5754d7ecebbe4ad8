use crate::sparse::SparseError;

/// Errors raised while turning scans into a sampled matrix
#[derive(Debug, thiserror::Error)]
pub enum SamplingError {
    /// Scan pointers do not bound the mass and intensity arrays
    #[error("Invalid scan boundaries: {0}")]
    InvalidScanBoundaries(String),

    /// Retention times are not strictly increasing
    #[error("Scans are not sorted by retention time (scan {index})")]
    UnsortedRetentionTimes {
        /// First scan whose retention time does not exceed its predecessor
        index: usize,
    },

    /// Sampling resolution is not a finite positive number
    #[error("Invalid sampling resolution: {0}")]
    InvalidResolution(f64),

    /// The mass range has more bins than can be indexed
    #[error("Mass range cannot be indexed at resolution {resolution}")]
    MassRangeTooWide {
        /// Requested bin width
        resolution: f64,
    },

    /// A mass is NaN or infinite
    #[error("Non-finite mass at peak {index}")]
    NonFiniteMass {
        /// Position in the flat mass array
        index: usize,
    },

    /// An axis does not match the matrix it describes
    #[error("{axis} axis has {actual} entries, expected {expected}")]
    AxisMismatch {
        /// Axis name
        axis: &'static str,
        /// Extent of the matching matrix dimension
        expected: usize,
        /// Length of the axis
        actual: usize,
    },

    /// Malformed CSV peak table
    #[error("Invalid peak table: {0}")]
    InvalidPeakTable(String),

    /// Error from the sparse kernels
    #[error("Sparse error: {0}")]
    SparseError(#[from] SparseError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reading or writing CSV
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing/deserializing JSON
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}
