use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{check_retention_times, sample_with_axis, SamplingError, ScanTable};
use crate::sparse::{Scalar, SparseMatrix};

/// Extracted-ion chromatogram matrix with its axes.
///
/// Rows follow `rt_axis`, columns follow `mz_axis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct Xic<T> {
    /// Intensities, one row per scan and one column per mass bin
    pub data: SparseMatrix<T>,
    /// Mass-bin centres
    pub mz_axis: Vec<f64>,
    /// Retention times
    pub rt_axis: Vec<f64>,
}

impl<T: Scalar> Xic<T> {
    /// Bundle a matrix with its axes, checking the axis lengths.
    pub fn new(data: SparseMatrix<T>, mz_axis: Vec<f64>, rt_axis: Vec<f64>) -> Result<Self, SamplingError> {
        check_axis("retention time", data.n_rows(), rt_axis.len())?;
        check_axis("mass", data.n_cols(), mz_axis.len())?;
        Ok(Self {
            data,
            mz_axis,
            rt_axis,
        })
    }

    /// Sample a scan table at `resolution`.
    pub fn from_scans(scans: &ScanTable<T>, resolution: f64) -> Result<Self, SamplingError> {
        check_retention_times(&scans.retention_times, scans.n_scans())?;
        let (data, axis) = sample_with_axis(&scans.pointers, &scans.masses, &scans.intensities, resolution)?;
        info!(
            "Sampled {} scans into {} mass bins ({} non-zero)",
            data.n_rows(),
            data.n_cols(),
            data.nnz()
        );
        Self::new(data, axis.centers(), scans.retention_times.clone())
    }

    /// Replace the matrix, keeping the axes.
    pub fn with_data(self, data: SparseMatrix<T>) -> Result<Self, SamplingError> {
        Self::new(data, self.mz_axis, self.rt_axis)
    }

    /// Number of scans
    pub fn n_scans(&self) -> usize {
        self.rt_axis.len()
    }

    /// Number of mass bins
    pub fn n_bins(&self) -> usize {
        self.mz_axis.len()
    }

    /// Write the project as JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SamplingError>
    where
        T: Serialize,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a project written by [`Xic::save_json`].
    ///
    /// The matrix is structurally validated and the axes must match it.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SamplingError>
    where
        T: DeserializeOwned,
    {
        let reader = BufReader::new(File::open(path)?);
        let xic: Self = serde_json::from_reader(reader)?;
        Self::new(xic.data, xic.mz_axis, xic.rt_axis)
    }
}

fn check_axis(axis: &'static str, expected: usize, actual: usize) -> Result<(), SamplingError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SamplingError::AxisMismatch {
            axis,
            expected,
            actual,
        })
    }
}
