// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Formkit
//!
//! Tools for working with interactive PDF forms (AcroForms).
//!
//! ## Core Features
//!
//! - **Field Extraction**: Walk every widget annotation and write a page-keyed
//!   JSON record with names, types, page-space rectangles, flags and choices
//! - **Synthetic Filling**: Fill text, choice and button widgets with plausible
//!   values chosen from field-name keywords
//! - **Visualization**: Render pages with color-coded field overlays, a
//!   standalone field list, a comprehensive page-plus-panel view and zoomed crops
//! - **Batch Processing**: Extract, fill and visualize every PDF in a directory
//! - **Diagnostics**: Inspect small checkbox-like widgets and verify filled values
//! - **Analysis**: Type statistics, flat name lists and hierarchical exports
//!
//! ## Coordinates
//!
//! Every rectangle in this crate is in *page space*: origin at the top-left of
//! the page box, y growing downward. See [`geometry`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_formkit::extract::FieldExtractor;
//! use pdf_formkit::fill::FormFiller;
//!
//! # fn main() -> pdf_formkit::Result<()> {
//! let record = FieldExtractor::extract("form.pdf")?;
//! record.save_json("form_fields.json")?;
//!
//! let mut rng = rand::thread_rng();
//! let report = FormFiller::open("form.pdf", record)?.fill("form_Filled.pdf", &mut rng, None)?;
//! println!("Filled {} widgets", report.filled);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration and artifact naming
pub mod config;

// Field model
pub mod fields;
pub mod geometry;
pub mod record;

// AcroForm access over lopdf
pub mod pdf;

// Page rendering to images
pub mod render;

// Tools
pub mod analysis;
pub mod batch;
pub mod cleanup;
pub mod extract;
pub mod fill;
pub mod inspect;
pub mod visualize;

// Re-exports
pub use config::{ArtifactNames, FillOptions, VisualizeOptions};
pub use error::{Error, Result};
pub use extract::FieldExtractor;
pub use fields::FieldType;
pub use fill::FormFiller;
pub use geometry::Rect;
pub use record::DocumentRecord;
pub use visualize::FieldVisualizer;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_formkit");
    }
}
