//! Flat scan tables and the CSV peak-table format.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::SamplingError;
use crate::sparse::Scalar;

/// A single scan: one retention time and its peak list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan<T> {
    /// Retention time
    pub retention_time: f64,
    /// Peak masses (m/z)
    pub masses: Vec<f64>,
    /// Peak intensities, one per mass
    pub intensities: Vec<T>,
}

impl<T> Scan<T> {
    /// Create a scan from its parts
    pub fn new(retention_time: f64, masses: Vec<f64>, intensities: Vec<T>) -> Self {
        Self {
            retention_time,
            masses,
            intensities,
        }
    }
}

/// Concatenated peak lists of a run.
///
/// Scan `i` owns the peaks `pointers[i]..pointers[i + 1]` of `masses` and
/// `intensities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanTable<T> {
    /// Scan boundaries, one more than the number of scans
    pub pointers: Vec<usize>,
    /// Flat mass array
    pub masses: Vec<f64>,
    /// Flat intensity array
    pub intensities: Vec<T>,
    /// One retention time per scan
    pub retention_times: Vec<f64>,
}

impl<T: Scalar> Default for ScanTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> ScanTable<T> {
    /// Table without scans
    pub fn new() -> Self {
        Self {
            pointers: vec![0],
            masses: Vec::new(),
            intensities: Vec::new(),
            retention_times: Vec::new(),
        }
    }

    /// Concatenate per-scan records.
    pub fn from_scans<I>(scans: I) -> Result<Self, SamplingError>
    where
        I: IntoIterator<Item = Scan<T>>,
    {
        let mut table = Self::new();
        for scan in scans {
            table.push_scan(scan.retention_time, &scan.masses, &scan.intensities)?;
        }
        Ok(table)
    }

    /// Append one scan.
    pub fn push_scan(
        &mut self,
        retention_time: f64,
        masses: &[f64],
        intensities: &[T],
    ) -> Result<(), SamplingError> {
        if masses.len() != intensities.len() {
            return Err(SamplingError::InvalidScanBoundaries(format!(
                "scan {} has {} masses but {} intensities",
                self.n_scans(),
                masses.len(),
                intensities.len()
            )));
        }
        self.masses.extend_from_slice(masses);
        self.intensities.extend_from_slice(intensities);
        self.retention_times.push(retention_time);
        self.pointers.push(self.masses.len());
        Ok(())
    }

    /// Number of scans
    pub fn n_scans(&self) -> usize {
        self.pointers.len().saturating_sub(1)
    }

    /// Total number of peaks
    pub fn n_peaks(&self) -> usize {
        self.masses.len()
    }

    /// Masses and intensities of scan `index`
    pub fn peaks(&self, index: usize) -> (&[f64], &[T]) {
        let (a, b) = (self.pointers[index], self.pointers[index + 1]);
        (&self.masses[a..b], &self.intensities[a..b])
    }

    /// Iterate the scans as owned records
    pub fn scans(&self) -> impl Iterator<Item = Scan<T>> + '_ {
        (0..self.n_scans()).map(move |index| {
            let (masses, intensities) = self.peaks(index);
            Scan::new(self.retention_times[index], masses.to_vec(), intensities.to_vec())
        })
    }

    /// Check the scan boundaries and the retention-time axis.
    pub fn validate(&self) -> Result<(), SamplingError> {
        super::check_scan_pointers(&self.pointers, self.masses.len(), self.intensities.len())?;
        super::check_retention_times(&self.retention_times, self.n_scans())
    }
}

/// One row of a peak table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    /// Scan number; rows of a scan are contiguous
    pub scan: usize,
    /// Retention time of the scan
    pub retention_time: f64,
    /// Peak mass
    pub mz: f64,
    /// Peak intensity
    pub intensity: f32,
}

/// Read a CSV peak table (`scan,retention_time,mz,intensity`).
pub fn read_peak_table<P: AsRef<Path>>(path: P) -> Result<ScanTable<f32>, SamplingError> {
    let file = File::open(path)?;
    read_peak_table_from(BufReader::new(file))
}

/// Read a CSV peak table from any reader.
///
/// Rows of one scan must be contiguous, scan numbers must increase from one
/// group to the next and every row of a scan must carry the same retention
/// time.
pub fn read_peak_table_from<R: BufRead>(reader: R) -> Result<ScanTable<f32>, SamplingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = ScanTable::new();
    let mut current: Option<usize> = None;

    for (row, record) in csv_reader.deserialize::<PeakRecord>().enumerate() {
        let record = record?;

        match current {
            Some(scan) if scan == record.scan => {
                if table.retention_times.last() != Some(&record.retention_time) {
                    return Err(SamplingError::InvalidPeakTable(format!(
                        "row {}: retention time changes within scan {}",
                        row + 1,
                        scan
                    )));
                }
            }
            Some(scan) if record.scan < scan => {
                return Err(SamplingError::InvalidPeakTable(format!(
                    "row {}: scan {} follows scan {}",
                    row + 1,
                    record.scan,
                    scan
                )));
            }
            _ => {
                table.retention_times.push(record.retention_time);
                table.pointers.push(table.masses.len());
                current = Some(record.scan);
            }
        }

        table.masses.push(record.mz);
        table.intensities.push(record.intensity);
        if let Some(last) = table.pointers.last_mut() {
            *last = table.masses.len();
        }
    }

    Ok(table)
}

/// Write a scan table as a CSV peak table, numbering scans from zero.
///
/// Scans without peaks have no rows and are lost.
pub fn write_peak_table<P: AsRef<Path>>(
    path: P,
    table: &ScanTable<f32>,
) -> Result<(), SamplingError> {
    let file = File::create(path)?;
    write_peak_table_to(BufWriter::new(file), table)
}

/// Write a CSV peak table to any writer.
pub fn write_peak_table_to<W: Write>(writer: W, table: &ScanTable<f32>) -> Result<(), SamplingError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for scan in 0..table.n_scans() {
        let (masses, intensities) = table.peaks(scan);
        for (&mz, &intensity) in masses.iter().zip(intensities) {
            csv_writer.serialize(PeakRecord {
                scan,
                retention_time: table.retention_times[scan],
                mz,
                intensity,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}
