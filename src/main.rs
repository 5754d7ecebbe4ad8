//! # Spectre
//!
//! Command-line preprocessing of LC-MS peak tables.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a synthetic run
//! spectre demo demo_peaks.csv
//!
//! # Sample, denoise and baseline-correct it
//! spectre preprocess demo_peaks.csv demo.xic.json --resolution 0.01 --peak-width 5
//!
//! # Inspect and check the result
//! spectre info demo.xic.json
//! spectre validate demo.xic.json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
