//! Remove generated artifacts (JSON records, filled PDFs, PNGs, caches)
//!
//! Usage:
//!   cargo run --release --bin cleanup -- [directory]
//!
//! Source code, documentation and original PDFs are kept.

use pdf_formkit::cleanup::cleanup;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    println!("Cleaning up directory: {}", dir.display());
    println!("{}", "-".repeat(60));

    let report = match cleanup(&dir) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    };

    for path in &report.removed {
        println!("Removed: {}", path.display());
    }
    for (path, error) in &report.errors {
        println!("Error removing {}: {}", path.display(), error);
    }

    println!("{}", "-".repeat(60));
    println!("Cleanup complete! Removed {} items.", report.removed_count());
    println!("Kept source code, documentation, and original PDFs.");

    if !report.errors.is_empty() {
        std::process::exit(1);
    }
}
