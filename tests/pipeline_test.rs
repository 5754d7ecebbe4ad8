//! End-to-end tests of the peak table to corrected XIC workflow
//!
//! A synthetic run goes through every stage the command line tool runs:
//! peak table on disk, sampling, preprocessing, JSON persistence and
//! validation of the written file.

use spectre::preprocess::{preprocess, preprocess_with, PreprocessConfig};
use spectre::sampling::{read_peak_table, write_peak_table, ScanTable, Xic};
use spectre::sparse::SparseError;
use spectre::validator::validate_xic_file;
use tempfile::tempdir;

// ============================================================================
// Helper Functions
// ============================================================================

const N_SCANS: usize = 300;
const RESOLUTION: f64 = 0.01;

const BACKGROUND_MZ: f64 = 200.0;
const PEAK_MZ: f64 = 300.0;
const WEAK_MZ: f64 = 400.0;
const APEX_SCAN: usize = 150;

/// Constant background ion, one Gaussian compound and a weak ion that only
/// shows up in a handful of scans.
fn synthetic_run() -> ScanTable<f32> {
    let mut table = ScanTable::new();
    for scan in 0..N_SCANS {
        let mut masses = vec![BACKGROUND_MZ];
        let mut intensities = vec![500.0f32];

        let offset = scan as f64 - APEX_SCAN as f64;
        let apex = 5000.0 * (-offset * offset / (2.0 * 3.0 * 3.0)).exp();
        if apex > 1.0 {
            masses.push(PEAK_MZ);
            intensities.push(apex as f32);
        }

        if scan % 50 == 7 {
            masses.push(WEAK_MZ);
            intensities.push(20.0);
        }

        table
            .push_scan(scan as f64 * 0.5, &masses, &intensities)
            .expect("matching lengths");
    }
    table
}

fn column_of(xic: &Xic<f32>, mz: f64) -> usize {
    xic.mz_axis
        .iter()
        .position(|&center| (center - mz).abs() < RESOLUTION / 2.0)
        .expect("mass is on the axis")
}

fn column_max(xic: &Xic<f32>, column: usize) -> f32 {
    (0..xic.n_scans())
        .map(|row| xic.data.get(row, column))
        .fold(0.0, f32::max)
}

// ============================================================================
// Workflow
// ============================================================================

#[test]
fn test_peak_table_round_trip_preserves_scans() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.csv");
    let table = synthetic_run();

    write_peak_table(&path, &table).unwrap();
    let loaded = read_peak_table(&path).unwrap();

    assert_eq!(loaded.n_scans(), N_SCANS);
    assert_eq!(loaded.n_peaks(), table.n_peaks());
    assert_eq!(loaded.pointers, table.pointers);
    assert_eq!(loaded.retention_times, table.retention_times);
}

#[test]
fn test_full_workflow_removes_background_and_keeps_peak() {
    let dir = tempdir().unwrap();
    let table_path = dir.path().join("run.csv");
    let xic_path = dir.path().join("run.xic.json");

    write_peak_table(&table_path, &synthetic_run()).unwrap();
    let table = read_peak_table(&table_path).unwrap();
    let xic = Xic::from_scans(&table, RESOLUTION).unwrap();
    assert_eq!(xic.n_scans(), N_SCANS);

    let config = PreprocessConfig::new(5.0).with_min_bin_intensity(100.0);
    let corrected = preprocess_with(&xic.data, &config).unwrap();
    let xic = xic.with_data(corrected).unwrap();

    let peak = column_of(&xic, PEAK_MZ);
    assert!(xic.data.get(APEX_SCAN, peak) > 4000.0);

    // Away from the run edges the flat background is subtracted entirely
    let background = column_of(&xic, BACKGROUND_MZ);
    for row in 50..N_SCANS - 50 {
        assert!(xic.data.get(row, background) < 1.0, "background left in scan {}", row);
    }

    let weak = column_of(&xic, WEAK_MZ);
    assert_eq!(column_max(&xic, weak), 0.0);

    assert!(xic.data.values().iter().all(|&v| v > 0.0));

    xic.save_json(&xic_path).unwrap();
    let report = validate_xic_file(&xic_path).unwrap();
    assert!(!report.has_failures(), "{}", report);

    let reloaded: Xic<f32> = Xic::load_json(&xic_path).unwrap();
    assert_eq!(reloaded, xic);
}

#[test]
fn test_sampled_only_project_validates() {
    let dir = tempdir().unwrap();
    let xic_path = dir.path().join("sampled.xic.json");

    let xic = Xic::from_scans(&synthetic_run(), RESOLUTION).unwrap();
    xic.save_json(&xic_path).unwrap();

    let report = validate_xic_file(&xic_path).unwrap();
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
    assert_eq!(column_max(&xic, column_of(&xic, WEAK_MZ)), 20.0);
}

#[test]
fn test_short_run_is_rejected() {
    let mut table = ScanTable::<f32>::new();
    table.push_scan(0.0, &[100.0], &[10.0]).unwrap();
    table.push_scan(1.0, &[100.0], &[12.0]).unwrap();
    let xic = Xic::from_scans(&table, RESOLUTION).unwrap();

    let result = preprocess(&xic.data, 3.0);
    assert!(matches!(result, Err(SparseError::WindowTooLarge { .. })));
}
