use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

use spectre::preprocess::preprocess_with;
use spectre::sampling::{read_peak_table, Xic};

use super::config::Config;

/// Bin width used when neither the command line nor the config sets one
const DEFAULT_RESOLUTION: f64 = 0.01;

/// Sample a CSV peak table and preprocess it into an XIC file
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    resolution: Option<f64>,
    peak_width: Option<f64>,
    config_path: Option<PathBuf>,
    sample_only: bool,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let resolution = resolution
        .or(config.sampling.resolution)
        .unwrap_or(DEFAULT_RESOLUTION);
    let settings = config.preprocess.resolve(peak_width);
    let output = output.unwrap_or_else(|| input.with_extension("xic.json"));

    info!("Reading peak table {}", input.display());
    let scans = read_peak_table(&input)
        .with_context(|| format!("Failed to read peak table: {}", input.display()))?;

    let start = Instant::now();
    let xic = Xic::from_scans(&scans, resolution).context("Failed to sample scans")?;
    let sampled_nnz = xic.data.nnz();

    let xic = if sample_only {
        xic
    } else {
        let data = preprocess_with(&xic.data, &settings).context("Preprocessing failed")?;
        xic.with_data(data)?
    };
    let elapsed = start.elapsed();

    xic.save_json(&output)
        .with_context(|| format!("Failed to write XIC: {}", output.display()))?;

    println!("Preprocessing complete!");
    println!("  Scans: {}", xic.n_scans());
    println!("  Peaks: {}", scans.n_peaks());
    println!("  Mass bins: {} ({} wide)", xic.n_bins(), resolution);
    println!("  Sampled entries: {}", sampled_nnz);
    if !sample_only {
        println!(
            "  Entries after preprocessing: {} (peak width {}, baseline window {})",
            xic.data.nnz(),
            settings.peak_width,
            settings.baseline_window()
        );
    }
    println!("  Time: {:.2}s", elapsed.as_secs_f64());
    println!("  Output: {}", output.display());

    Ok(())
}
