//! Field overlay with legend, plus a standalone field list
//!
//! Usage:
//!   cargo run --release --bin visualize_fields -- <pdf_file> [page]
//!
//! The field list is drawn only when `<stem>_fields.json` exists next to
//! the input.

use pdf_formkit::config::{ArtifactNames, VisualizeOptions};
use pdf_formkit::record::DocumentRecord;
use pdf_formkit::visualize::FieldVisualizer;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: visualize_fields <pdf_file_path> [page_number]");
        std::process::exit(1);
    }

    let pdf_path = Path::new(&args[1]);
    let page = match args.get(2).map(|s| s.parse::<u32>()).transpose() {
        Ok(page) => page.unwrap_or(1),
        Err(e) => {
            eprintln!("Error: invalid page number: {}", e);
            std::process::exit(1);
        },
    };

    if !pdf_path.exists() {
        eprintln!("Error: PDF file not found: {}", pdf_path.display());
        std::process::exit(1);
    }

    println!("{}", "=".repeat(60));
    println!("PDF Form Field Visualizer");
    println!("{}", "=".repeat(60));
    println!("PDF: {}", pdf_path.display());
    println!("Page: {}", page);
    println!("{}", "=".repeat(60));

    let options = VisualizeOptions::new().with_page(page);
    let highlighted =
        FieldVisualizer::open(pdf_path).and_then(|viz| viz.with_options(options.clone()).highlight_fields());
    match highlighted {
        Ok(report) => println!("Saved {} ({} fields)", report.output.display(), report.fields),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }

    let record_path = ArtifactNames::for_input(pdf_path).fields_json();
    if record_path.exists() {
        let listed = DocumentRecord::load_json(&record_path)
            .and_then(|record| FieldVisualizer::field_list_image(&record, &options));
        match listed {
            Ok(report) => println!("Saved {} ({} fields)", report.output.display(), report.fields),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            },
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Visualization complete!");
    println!("{}", "=".repeat(60));
}
