//! Extract form fields to JSON
//!
//! Writes every widget of the PDF to a page-keyed JSON record.
//!
//! Usage:
//!   cargo run --release --bin extract_fields -- <pdf_file> [output_json]
//!
//! Without `output_json` the record is written next to the input as
//! `<stem>_fields.json`.

use pdf_formkit::config::ArtifactNames;
use pdf_formkit::extract::FieldExtractor;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: extract_fields <pdf_file_path> [output_json_path]");
        println!("\nExample:");
        println!("  extract_fields input.pdf");
        println!("  extract_fields input.pdf output.json");
        std::process::exit(1);
    }

    let pdf_path = Path::new(&args[1]);
    let output: PathBuf = match args.get(2) {
        Some(path) => PathBuf::from(path),
        None => ArtifactNames::for_input(pdf_path).fields_json(),
    };

    if !pdf_path.exists() {
        eprintln!("Error: PDF file not found: {}", pdf_path.display());
        std::process::exit(1);
    }

    println!("Extracting fields from: {}", pdf_path.display());
    println!("{}", "-".repeat(60));

    match FieldExtractor::extract_to_json(pdf_path, &output) {
        Ok(record) => {
            println!("Total pages: {}", record.total_pages);
            println!("Pages with fields: {}", record.pages.len());
            println!("Total fields: {}", record.total_fields());
            println!("Saved to: {}", output.display());
            println!("{}", "-".repeat(60));
            println!("Extraction complete!");
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
