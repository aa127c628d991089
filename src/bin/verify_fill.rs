//! Report whether fields of a filled PDF hold values
//!
//! Usage:
//!   cargo run --release --bin verify_fill -- <filled_pdf> [field_name ...]
//!
//! Without field names every widget smaller than 30x30 is reported.

use pdf_formkit::inspect::{verify_fields, FillStatus};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: verify_fill <filled_pdf_path> [field_name ...]");
        std::process::exit(1);
    }

    let pdf_path = Path::new(&args[1]);
    let targets = &args[2..];

    println!("Verifying {}...", pdf_path.display());
    match verify_fields(pdf_path, targets) {
        Ok(fields) if fields.is_empty() => println!("Warning: Target fields not found in the PDF."),
        Ok(fields) => {
            for field in &fields {
                println!("{}", field);
            }
            let filled = fields.iter().filter(|f| f.status() == FillStatus::Filled).count();
            println!("\n{} of {} fields filled", filled, fields.len());
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
