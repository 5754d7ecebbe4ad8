use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Validate an XIC file
pub fn run(file: PathBuf) -> Result<()> {
    use spectre::validator::validate_xic_file;

    info!("Validating {}", file.display());

    match validate_xic_file(&file) {
        Ok(report) => {
            println!("{}", report.format_colored());

            // Exit with error code if validation failed
            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
