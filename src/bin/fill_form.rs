//! Fill a PDF form with synthetic values
//!
//! Usage:
//!   cargo run --release --bin fill_form -- <pdf_file> [fields_json] [output_pdf]
//!
//! The record defaults to `<stem>_fields.json` and the output to
//! `<stem>_Filled.pdf`, both next to the input. `RUST_LOG=debug` lists every
//! written value.

use pdf_formkit::config::ArtifactNames;
use pdf_formkit::fill::{default_fake_source, FormFiller};
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: fill_form <pdf_file_path> [fields_json_path] [output_pdf_path]");
        std::process::exit(1);
    }

    let pdf_path = Path::new(&args[1]);
    let names = ArtifactNames::for_input(pdf_path);
    let record_path = args.get(2).map(PathBuf::from).unwrap_or_else(|| names.fields_json());
    let output = args.get(3).map(PathBuf::from).unwrap_or_else(|| names.filled_pdf());

    if !pdf_path.exists() || !record_path.exists() {
        eprintln!("Error: Input files not found.");
        std::process::exit(1);
    }

    let mut rng = rand::thread_rng();
    let result = FormFiller::from_paths(pdf_path, &record_path)
        .and_then(|mut filler| filler.fill(&output, &mut rng, default_fake_source()));

    match result {
        Ok(report) => {
            println!("Filled {} fields ({} checkbox marks)", report.filled, report.marks());
            if !report.failures.is_empty() {
                println!("{} fields could not be filled", report.failures.len());
            }
            println!("Saved filled form to: {}", output.display());
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
