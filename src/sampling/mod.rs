//! # Sampling Module
//!
//! Turns irregular per-scan peak lists into a sparse scan × mass-bin matrix.
//!
//! Masses are quantized to bins of a fixed width, peaks of one scan landing
//! in the same bin are max-pooled, and the result is bundled with its
//! retention-time and mass axes as an [`Xic`].

mod error;
mod sampler;
mod scans;
mod xic;

#[cfg(test)]
mod tests;

pub use error::SamplingError;
pub use sampler::{check_retention_times, check_scan_pointers, sample, sample_with_axis, MassAxis};
pub use scans::{
    read_peak_table, read_peak_table_from, write_peak_table, write_peak_table_to, PeakRecord, Scan,
    ScanTable,
};
pub use xic::Xic;
