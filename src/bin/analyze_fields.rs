//! Field statistics and alternative exports
//!
//! Prints type and page statistics, then writes `<stem>_full_extraction.json`,
//! `<stem>_field_names.json` and `<stem>_hierarchical.json` next to the input.
//!
//! Usage:
//!   cargo run --release --bin analyze_fields -- <pdf_file>

use pdf_formkit::analysis::{write_json, FieldNamesExport, FieldStats, HierarchicalExport};
use pdf_formkit::config::ArtifactNames;
use pdf_formkit::extract::FieldExtractor;
use std::path::Path;

fn analyze(pdf_path: &Path) -> pdf_formkit::Result<()> {
    let names = ArtifactNames::for_input(pdf_path);
    let record = FieldExtractor::extract(pdf_path)?;

    println!("{}", "=".repeat(60));
    println!("PDF FORM FIELD ANALYSIS");
    println!("{}", "=".repeat(60));
    print!("{}", FieldStats::from_record(&record));
    println!("{}", "=".repeat(60));

    record.save_json(names.full_extraction_json())?;
    write_json(&FieldNamesExport::from_record(&record), names.field_names_json())?;
    write_json(&HierarchicalExport::from_record(&record), names.hierarchical_json())?;

    println!("Saved: {}", names.full_extraction_json().display());
    println!("Saved: {}", names.field_names_json().display());
    println!("Saved: {}", names.hierarchical_json().display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: analyze_fields <pdf_file_path>");
        std::process::exit(1);
    }

    if let Err(e) = analyze(Path::new(&args[1])) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
