//! Extract, fill and visualize every PDF in a directory
//!
//! Usage:
//!   cargo run --release --bin process_all -- [directory]
//!
//! Files named `*_Filled.pdf` or containing `Filled_Form` are outputs of
//! earlier runs and are skipped. The directory defaults to the current one.

use pdf_formkit::batch::run_batch;
use pdf_formkit::fill::default_fake_source;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let mut rng = rand::thread_rng();
    let report = match run_batch(&dir, &mut rng, default_fake_source()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Failed to read {}: {}", dir.display(), e);
            std::process::exit(1);
        },
    };

    if report.files.is_empty() {
        println!("No new PDF files found to process.");
        return;
    }

    for outcome in &report.files {
        let status = if outcome.is_success() { "✓" } else { "✗" };
        println!(
            "{} {} ({} fields, {} filled)",
            status,
            outcome.input.display(),
            outcome.fields,
            outcome.filled
        );
        for (stage, error) in &outcome.errors {
            println!("    {} failed: {}", stage, error);
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("All processing complete!");
    println!("✓ Successful:  {}", report.succeeded());
    println!("✗ Failed:      {}", report.failed());
    println!("{}", "=".repeat(60));

    if report.failed() > 0 {
        std::process::exit(1);
    }
}
