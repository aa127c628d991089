//! Error types for form extraction, filling and visualization.
//!
//! Per-field problems are not errors at this level: the extractor and the
//! filler log them and move on. The variants here are the failures that stop
//! a whole stage for one input file.

use std::path::PathBuf;

/// Result type alias for form toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing a PDF form.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input path is missing or is not a loadable PDF
    #[error("Cannot open PDF document '{}': {reason}", path.display())]
    DocumentOpen {
        /// Path that was requested
        path: PathBuf,
        /// Why the open failed
        reason: String,
    },

    /// Requested page does not exist in the document
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange {
        /// Requested 1-indexed page number
        page: u32,
        /// Total pages in the document
        total: u32,
    },

    /// The extracted field record has no entry for the page
    #[error("No field data recorded for page {0}")]
    PageNotInRecord(u32),

    /// A widget annotation could not be decoded or updated
    #[error("Invalid widget: {0}")]
    InvalidWidget(String),

    /// Error reported by the PDF object model
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Field record (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding or decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Rasterization error
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Build a [`Error::DocumentOpen`] for `path`.
    pub fn document_open(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::DocumentOpen {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_open_error() {
        let err = Error::document_open("missing.pdf", "file not found");
        let msg = format!("{}", err);
        assert!(msg.contains("missing.pdf"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_page_out_of_range_error() {
        let err = Error::PageOutOfRange { page: 7, total: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("Page 7"));
        assert!(msg.contains("3 pages"));
    }

    #[test]
    fn test_page_not_in_record_error() {
        let msg = format!("{}", Error::PageNotInRecord(2));
        assert!(msg.contains("page 2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
