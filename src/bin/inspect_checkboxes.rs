//! List widgets and flag the ones small enough to be checkboxes
//!
//! Usage:
//!   cargo run --release --bin inspect_checkboxes -- <pdf_file> [limit]
//!
//! At most `limit` widgets (default 20) are listed.

use pdf_formkit::inspect::{inspect_widgets, DEFAULT_INSPECT_LIMIT};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: inspect_checkboxes <pdf_file_path> [limit]");
        std::process::exit(1);
    }

    let pdf_path = Path::new(&args[1]);
    let limit = match args.get(2).map(|s| s.parse::<usize>()).transpose() {
        Ok(limit) => limit.unwrap_or(DEFAULT_INSPECT_LIMIT),
        Err(e) => {
            eprintln!("Error: invalid limit: {}", e);
            std::process::exit(1);
        },
    };

    println!("Inspecting {}...", pdf_path.display());
    match inspect_widgets(pdf_path, limit) {
        Ok(widgets) => {
            let mut page = 0;
            for widget in &widgets {
                if widget.page != page {
                    page = widget.page;
                    println!("\n--- Page {} ---", page);
                }
                println!("{}", widget);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
