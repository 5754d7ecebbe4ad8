use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use spectre::sampling::{write_peak_table, ScanTable};

/// Seconds between consecutive scans
const CYCLE_TIME: f64 = 0.5;

/// Peaks below this intensity are not recorded
const DETECTION_LIMIT: f64 = 50.0;

/// A compound eluting as a Gaussian peak with an isotope envelope
struct Compound {
    mz: f64,
    charge: u8,
    apex: f64,
    sigma: f64,
    height: f64,
}

/// Generate a synthetic LC-MS run and write it as a peak table
pub fn run(output: PathBuf, n_scans: usize) -> Result<()> {
    info!("Generating synthetic LC-MS run with {} scans", n_scans);

    let scans = generate_mock_run(n_scans)?;
    write_peak_table(&output, &scans)
        .with_context(|| format!("Failed to write peak table: {}", output.display()))?;

    println!("Demo data generated!");
    println!("  Scans: {}", scans.n_scans());
    println!("  Peaks: {}", scans.n_peaks());
    println!("  Output: {}", output.display());
    println!();
    println!("Try: spectre preprocess {} --peak-width 9", output.display());

    Ok(())
}

/// Build a run with drifting background ions and a set of eluting compounds
fn generate_mock_run(n_scans: usize) -> Result<ScanTable<f32>> {
    let duration = n_scans as f64 * CYCLE_TIME;
    let compounds = mock_compounds(duration);
    let mut table = ScanTable::new();

    for scan in 0..n_scans {
        let rt = scan as f64 * CYCLE_TIME;
        let mut peaks = background_peaks(scan, rt, duration);

        for compound in &compounds {
            let elution = (-0.5 * ((rt - compound.apex) / compound.sigma).powi(2)).exp();
            for isotope in 0..4 {
                let abundance = [1.0, 0.55, 0.2, 0.06][isotope];
                let intensity = compound.height * elution * abundance;
                if intensity < DETECTION_LIMIT {
                    continue;
                }
                let mz_noise = ((scan * 7 + isotope) as f64 * 0.377).sin() * 0.002;
                let mz = compound.mz + isotope as f64 * 1.00336 / compound.charge as f64;
                peaks.push((mz + mz_noise, intensity));
            }
        }

        peaks.sort_by(|a, b| a.0.total_cmp(&b.0));
        let masses: Vec<f64> = peaks.iter().map(|p| p.0).collect();
        let intensities: Vec<f32> = peaks.iter().map(|p| p.1 as f32).collect();
        table.push_scan(rt, &masses, &intensities)?;
    }

    Ok(table)
}

fn mock_compounds(duration: f64) -> Vec<Compound> {
    (0..40)
        .map(|i| {
            let position = (i as f64 + 0.5) / 40.0;
            Compound {
                mz: 300.0 + (i as f64 * 0.618).fract() * 900.0,
                charge: if i % 4 == 0 { 2 } else { 1 },
                apex: duration * (0.05 + 0.9 * position),
                sigma: 2.0 + (i as f64 * 1.3).sin().abs() * 3.0,
                height: 1e4 * (0.2 + (i as f64 * 0.456).sin().abs() * 0.8),
            }
        })
        .collect()
}

/// Chemical background: a few ions present in every scan, slowly drifting
fn background_peaks(scan: usize, rt: f64, duration: f64) -> Vec<(f64, f64)> {
    let gradient = rt / duration.max(f64::EPSILON);
    (0..12)
        .map(|i| {
            let mz = 150.0 + i as f64 * 83.7;
            let level = 200.0 + 150.0 * gradient + 50.0 * (i as f64).cos();
            let noise = ((scan * 13 + i) as f64 * 0.123).sin() * 20.0;
            (mz, (level + noise).max(DETECTION_LIMIT))
        })
        .collect()
}
