use anyhow::{Context, Result};
use std::path::PathBuf;

use spectre::sampling::Xic;
use spectre::sparse::{Layout, SparseMatrix};

/// Display information about an XIC file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let xic: Xic<f64> = Xic::load_json(&file).context("Failed to read XIC file")?;
    let data = &xic.data;

    println!("XIC File Information");
    println!("====================");
    println!("File: {}", file.display());
    println!();

    println!("Matrix:");
    println!("  Layout: {:?}", data.layout());
    println!("  Scans: {}", data.n_rows());
    println!("  Mass bins: {}", data.n_cols());
    println!("  Stored entries: {}", data.nnz());
    println!("  Density: {:.4}%", density(data) * 100.0);
    println!();

    println!("Axes:");
    if let (Some(first), Some(last)) = (xic.rt_axis.first(), xic.rt_axis.last()) {
        println!("  Retention time: {:.3} - {:.3}", first, last);
    }
    if let (Some(first), Some(last)) = (xic.mz_axis.first(), xic.mz_axis.last()) {
        println!("  m/z: {:.4} - {:.4}", first, last);
    }
    println!();

    let values = data.values();
    if !values.is_empty() {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let total: f64 = values.iter().sum();

        println!("Intensities:");
        println!("  Min: {:.3e}", min);
        println!("  Max: {:.3e}", max);
        println!("  Total: {:.3e}", total);

        let rows = data.to_layout(Layout::RowMajor);
        let busiest = (0..rows.n_rows())
            .map(|scan| (scan, rows.slice(scan).1.iter().sum::<f64>()))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((scan, tic)) = busiest {
            println!(
                "  Largest TIC: {:.3e} at scan {} (RT {:.3})",
                tic, scan, xic.rt_axis[scan]
            );
        }
    }

    Ok(())
}

fn density(data: &SparseMatrix<f64>) -> f64 {
    let cells = data.n_rows() * data.n_cols();
    if cells == 0 {
        0.0
    } else {
        data.nnz() as f64 / cells as f64
    }
}
