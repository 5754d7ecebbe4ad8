use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod info;
mod preprocess;
mod validate;

/// Spectre - Sparse LC-MS preprocessing
#[derive(Parser)]
#[command(name = "spectre")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a peak table into an XIC and remove noise and baseline
    Preprocess {
        /// Input CSV peak table (scan,retention_time,mz,intensity)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output XIC JSON path (defaults to INPUT with a .xic.json extension)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Mass-bin width
        #[arg(short, long)]
        resolution: Option<f64>,

        /// Typical chromatographic peak width, in scans
        #[arg(short, long)]
        peak_width: Option<f64>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Only sample, skip noise and baseline removal
        #[arg(long)]
        sample_only: bool,
    },

    /// Generate a synthetic LC-MS peak table for testing
    Demo {
        /// Output CSV path
        #[arg(value_name = "OUTPUT", default_value = "demo_peaks.csv")]
        output: PathBuf,

        /// Number of scans
        #[arg(short = 'n', long, default_value = "600")]
        scans: usize,
    },

    /// Display information about an XIC file
    Info {
        /// Input XIC JSON path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Validate the integrity of an XIC file
    Validate {
        /// Input XIC JSON path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Preprocess {
            input,
            output,
            resolution,
            peak_width,
            config,
            sample_only,
        } => preprocess::run(input, output, resolution, peak_width, config, sample_only),
        Commands::Demo { output, scans } => demo::run(output, scans),
        Commands::Info { file } => info::run(file),
        Commands::Validate { file } => validate::run(file),
    }
}
