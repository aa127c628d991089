//! Comprehensive view: numbered page overlay with a field details panel
//!
//! Usage:
//!   cargo run --release --bin comprehensive_viz -- <pdf_file> [fields_json] [page]
//!
//! The record defaults to `<stem>_fields.json` next to the input.

use pdf_formkit::config::{ArtifactNames, VisualizeOptions};
use pdf_formkit::record::DocumentRecord;
use pdf_formkit::visualize::FieldVisualizer;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: comprehensive_viz <pdf_file_path> [fields_json_path] [page_number]");
        std::process::exit(1);
    }

    let pdf_path = Path::new(&args[1]);
    let record_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| ArtifactNames::for_input(pdf_path).fields_json());
    let page = match args.get(3).map(|s| s.parse::<u32>()).transpose() {
        Ok(page) => page.unwrap_or(1),
        Err(e) => {
            eprintln!("Error: invalid page number: {}", e);
            std::process::exit(1);
        },
    };

    println!("{}", "=".repeat(70));
    println!("Creating Comprehensive Field Visualization");
    println!("{}", "=".repeat(70));

    let result = DocumentRecord::load_json(&record_path).and_then(|record| {
        let viz = FieldVisualizer::open(pdf_path)?.with_options(VisualizeOptions::new().with_page(page));
        viz.comprehensive(&record)
    });

    match result {
        Ok(report) => {
            println!("Saved: {}", report.output.display());
            println!("Image size: {}x{}", report.width, report.height);
            println!("Fields on page {}: {}", page, report.fields);
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }

    println!("{}", "=".repeat(70));
    println!("Complete!");
    println!("{}", "=".repeat(70));
}
