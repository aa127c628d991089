//! Simple field highlight: page with translucent boxes and a small legend
//!
//! Usage:
//!   cargo run --release --bin highlight_fields -- <pdf_file> [page]

use pdf_formkit::config::VisualizeOptions;
use pdf_formkit::visualize::FieldVisualizer;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: highlight_fields <pdf_file_path> [page_number]");
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
        eprintln!("Error: PDF not found: {}", pdf_path.display());
        std::process::exit(1);
    }

    println!("{}", "=".repeat(70));
    println!("PDF Form Field Highlighter - Simple View");
    println!("{}", "=".repeat(70));
    println!("PDF: {}", pdf_path.display());
    println!("Page: {}", page);
    println!("{}", "=".repeat(70));

    let options = VisualizeOptions::new().with_page(page);
    match FieldVisualizer::open(pdf_path).and_then(|viz| viz.with_options(options).highlight_simple()) {
        Ok(report) => {
            println!("Highlighted {} fillable fields", report.fields);
            println!("Saved: {} ({}x{})", report.output.display(), report.width, report.height);
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }

    println!("{}", "=".repeat(70));
    println!("Done!");
    println!("{}", "=".repeat(70));
}
