//! Crop of a filled page, for checking stamped checkbox marks
//!
//! Usage:
//!   cargo run --release --bin visualize_filled -- <filled_pdf> [page]
//!
//! The crop covers page-space (50,480)-(150,560) at zoom 2.0.

use pdf_formkit::config::VisualizeOptions;
use pdf_formkit::visualize::{FieldVisualizer, DEFAULT_CROP_REGION};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: visualize_filled <filled_pdf_path> [page_number]");
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

    let options = VisualizeOptions::new().with_page(page);
    let cropped = FieldVisualizer::open(pdf_path)
        .and_then(|viz| viz.with_options(options).render_region(DEFAULT_CROP_REGION));
    match cropped {
        Ok(report) => println!("Saved visualization to {}", report.output.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
