use super::*;
use crate::sparse::Layout;
use std::io::Cursor;
use tempfile::tempdir;

fn two_scans() -> ScanTable<f64> {
    ScanTable::from_scans(vec![
        Scan::new(1.0, vec![100.02, 100.04, 101.0], vec![5.0, 9.0, 2.0]),
        Scan::new(2.5, vec![99.0, 101.01], vec![1.0, 3.0]),
    ])
    .unwrap()
}

#[test]
fn test_sample_max_pools_collisions() -> Result<(), SamplingError> {
    let table = two_scans();
    let (matrix, axis) = sample_with_axis(&table.pointers, &table.masses, &table.intensities, 0.1)?;

    assert_eq!(axis.min_bin, 990);
    assert_eq!(axis.len, 21);
    assert_eq!(matrix.layout(), Layout::RowMajor);
    assert_eq!(matrix.shape(), (2, 21));
    assert!(matrix.is_canonical());

    // 100.02 and 100.04 share bin 1000
    assert_eq!(matrix.get(0, 10), 9.0);
    assert_eq!(matrix.get(0, 20), 2.0);
    assert_eq!(matrix.get(1, 0), 1.0);
    assert_eq!(matrix.get(1, 20), 3.0);
    assert_eq!(matrix.nnz(), 4);
    Ok(())
}

#[test]
fn test_sample_keeps_empty_scans() -> Result<(), SamplingError> {
    let matrix = sample(&[0, 0, 2, 2], &[10.0, 12.0], &[1.0f32, 4.0], 1.0)?;
    assert_eq!(matrix.shape(), (3, 3));
    assert_eq!(matrix.pointers(), &[0, 0, 2, 2]);
    Ok(())
}

#[test]
fn test_sample_without_peaks() -> Result<(), SamplingError> {
    let matrix = sample::<f64>(&[0, 0, 0], &[], &[], 0.5)?;
    assert_eq!(matrix.shape(), (2, 0));
    assert_eq!(matrix.nnz(), 0);
    Ok(())
}

#[test]
fn test_sample_rejects_bad_boundaries() {
    let masses = [1.0, 2.0, 3.0];
    let intensities = [1.0, 1.0, 1.0];
    for pointers in [&[1, 3][..], &[0, 2, 1, 3][..], &[0, 2][..], &[][..]] {
        assert!(matches!(
            sample(pointers, &masses, &intensities, 1.0),
            Err(SamplingError::InvalidScanBoundaries(_))
        ));
    }
    assert!(matches!(
        sample(&[0, 3], &masses, &intensities[..2], 1.0),
        Err(SamplingError::InvalidScanBoundaries(_))
    ));
}

#[test]
fn test_sample_rejects_bad_resolution_and_masses() {
    for resolution in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            sample(&[0, 1], &[1.0], &[1.0], resolution),
            Err(SamplingError::InvalidResolution(_))
        ));
    }
    assert!(matches!(
        sample(&[0, 2], &[1.0, f64::NAN], &[1.0, 1.0], 1.0),
        Err(SamplingError::NonFiniteMass { index: 1 })
    ));
}

#[test]
fn test_mass_axis() {
    let axis = MassAxis {
        min_bin: 990,
        resolution: 0.1,
        len: 21,
    };
    assert!((axis.center(10) - 100.0).abs() < 1e-9);
    assert_eq!(axis.centers().len(), 21);
    assert_eq!(axis.column_of(100.04), Some(10));
    assert_eq!(axis.column_of(98.0), None);
    assert_eq!(axis.column_of(103.0), None);
}

#[test]
fn test_retention_times_must_increase() {
    let mut table = two_scans();
    table.retention_times = vec![2.0, 2.0];
    assert!(matches!(
        Xic::from_scans(&table, 0.1),
        Err(SamplingError::UnsortedRetentionTimes { index: 1 })
    ));

    table.retention_times = vec![1.0];
    assert!(matches!(
        Xic::from_scans(&table, 0.1),
        Err(SamplingError::AxisMismatch { .. })
    ));
}

#[test]
fn test_xic_preserves_scan_order() -> Result<(), SamplingError> {
    let table = two_scans();
    let xic = Xic::from_scans(&table, 0.1)?;
    assert_eq!(xic.n_scans(), 2);
    assert_eq!(xic.rt_axis, vec![1.0, 2.5]);
    assert_eq!(xic.n_bins(), xic.data.n_cols());
    assert!((xic.mz_axis[0] - 99.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_xic_json_round_trip() -> Result<(), SamplingError> {
    let dir = tempdir()?;
    let path = dir.path().join("run.json");

    let xic = Xic::from_scans(&two_scans(), 0.1)?;
    xic.save_json(&path)?;
    let loaded: Xic<f64> = Xic::load_json(&path)?;
    assert_eq!(loaded, xic);
    Ok(())
}

#[test]
fn test_xic_json_keeps_bin_centres_exact() -> Result<(), SamplingError> {
    let dir = tempdir()?;
    let path = dir.path().join("centres.json");

    let scans = ScanTable::from_scans(vec![Scan::new(0.0, vec![99.0, 101.0], vec![1.0f64, 2.0])])?;
    let xic = Xic::from_scans(&scans, 0.1)?;
    xic.save_json(&path)?;
    let loaded: Xic<f64> = Xic::load_json(&path)?;

    for (saved, restored) in xic.mz_axis.iter().zip(&loaded.mz_axis) {
        assert_eq!(saved.to_bits(), restored.to_bits(), "{} became {}", saved, restored);
    }
    Ok(())
}

#[test]
fn test_xic_rejects_axis_mismatch() {
    let xic = Xic::from_scans(&two_scans(), 0.1).unwrap();
    let result = Xic::new(xic.data.clone(), vec![1.0], xic.rt_axis.clone());
    assert!(matches!(
        result,
        Err(SamplingError::AxisMismatch { axis: "mass", expected: 21, actual: 1 })
    ));
}

#[test]
fn test_read_peak_table() -> Result<(), SamplingError> {
    let csv = "scan,retention_time,mz,intensity\n\
               0,1.5,100.0,10\n\
               0,1.5,200.0,20\n\
               3,2.0,150.0,5\n";
    let table = read_peak_table_from(Cursor::new(csv))?;
    assert_eq!(table.n_scans(), 2);
    assert_eq!(table.pointers, vec![0, 2, 3]);
    assert_eq!(table.retention_times, vec![1.5, 2.0]);
    assert_eq!(table.intensities, vec![10.0f32, 20.0, 5.0]);
    table.validate()?;
    Ok(())
}

#[test]
fn test_read_peak_table_rejects_interleaved_scans() {
    let csv = "scan,retention_time,mz,intensity\n1,1.0,1.0,1\n0,0.5,1.0,1\n";
    assert!(matches!(
        read_peak_table_from(Cursor::new(csv)),
        Err(SamplingError::InvalidPeakTable(_))
    ));

    let csv = "scan,retention_time,mz,intensity\n0,1.0,1.0,1\n0,1.1,2.0,1\n";
    assert!(matches!(
        read_peak_table_from(Cursor::new(csv)),
        Err(SamplingError::InvalidPeakTable(_))
    ));
}

#[test]
fn test_peak_table_file_round_trip() -> Result<(), SamplingError> {
    let dir = tempdir()?;
    let path = dir.path().join("peaks.csv");
    let table = ScanTable::from_scans(vec![
        Scan::new(0.5, vec![100.0, 101.0], vec![1.0f32, 2.0]),
        Scan::new(1.0, vec![102.5], vec![4.0]),
    ])?;

    write_peak_table(&path, &table)?;
    assert_eq!(read_peak_table(&path)?, table);
    Ok(())
}

#[test]
fn test_push_scan_rejects_mismatched_lengths() {
    let mut table = ScanTable::<f32>::new();
    assert!(table.push_scan(0.0, &[1.0, 2.0], &[1.0]).is_err());
    assert_eq!(table.n_scans(), 0);
}
