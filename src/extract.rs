//! Field extraction: PDF widgets to a [`DocumentRecord`].
//!
//! # Example
//!
//! ```no_run
//! use pdf_formkit::extract::FieldExtractor;
//!
//! let record = FieldExtractor::extract("RF401.pdf")?;
//! record.save_json("RF401_fields.json")?;
//! println!("{} fields on {} pages", record.total_fields(), record.pages.len());
//! # Ok::<(), pdf_formkit::Error>(())
//! ```

use crate::error::Result;
use crate::fields::{parse_field_hierarchy, FieldFlags, FieldType};
use crate::pdf::{FormDocument, Widget};
use crate::record::{DocumentRecord, FieldRecord, PageDimensions, PageRecord};
use std::path::Path;

/// Reads form-field widgets out of a PDF.
pub struct FieldExtractor;

impl FieldExtractor {
    /// Open `path` and extract every widget on every page.
    ///
    /// Fails with [`crate::Error::DocumentOpen`] when the file is missing or
    /// is not a loadable PDF. Widgets that cannot be decoded are logged and
    /// skipped.
    pub fn extract(path: impl AsRef<Path>) -> Result<DocumentRecord> {
        let doc = FormDocument::open(path.as_ref())?;
        Self::extract_document(&doc)
    }

    /// Extract from an already opened document.
    pub fn extract_document(doc: &FormDocument) -> Result<DocumentRecord> {
        let mut pages = Vec::new();

        for page_number in doc.page_numbers() {
            let page_box = doc.page_box(page_number)?;
            let mut fields = Vec::new();

            for read in doc.page_widgets(page_number)? {
                match read.widget {
                    Ok(widget) => fields.push(field_record(&widget)),
                    Err(e) => log::warn!(
                        "Skipping widget {:?} on page {}: {}",
                        read.id,
                        page_number,
                        e
                    ),
                }
            }

            log::debug!("Page {}: {} fields", page_number, fields.len());
            pages.push(PageRecord {
                page_number,
                page_dimensions: PageDimensions {
                    width: page_box.width(),
                    height: page_box.height(),
                },
                fields,
            });
        }

        Ok(DocumentRecord::new(doc.file_name(), doc.page_count(), pages))
    }

    /// Extract, write the record as indented JSON to `output` and log a
    /// summary of what was found.
    pub fn extract_to_json(path: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<DocumentRecord> {
        let record = Self::extract(path)?;
        record.save_json(output.as_ref())?;
        log_summary(&record, output.as_ref());
        Ok(record)
    }
}

/// Build the record entry for one widget.
pub fn field_record(widget: &Widget) -> FieldRecord {
    let key = widget.display_name();
    let (parent, child) = parse_field_hierarchy(&key);
    let field_type = widget.field_type();
    let flags = FieldFlags::from_raw(widget.flags);

    FieldRecord {
        key,
        parent,
        child,
        field_type,
        coordinates: widget.rect,
        field_label: widget.label.clone(),
        field_value: widget.value.clone(),
        field_flags: widget.flags,
        is_required: flags.is_required(),
        is_readonly: flags.is_readonly(),
        choices: (field_type == FieldType::Choice).then(|| widget.choices.clone()),
        button_caption: (field_type == FieldType::Button)
            .then(|| widget.caption.clone().unwrap_or_default()),
    }
}

/// Log the totals of an extraction after it was written to `output`.
pub fn log_summary(record: &DocumentRecord, output: &Path) {
    log::info!("Fields extracted and saved to: {}", output.display());
    log::info!("Total pages: {}", record.total_pages);
    log::info!("Pages with fields: {}", record.pages.len());
    log::info!("Total fields: {}", record.total_fields());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::type_codes;
    use crate::geometry::Rect;

    fn widget(name: &str, type_code: i32) -> Widget {
        Widget {
            id: (7, 0),
            field_id: (7, 0),
            name: name.to_string(),
            type_code,
            user_rect: [100.0, 700.0, 300.0, 720.0],
            rect: Rect::new(100.0, 72.0, 300.0, 92.0),
            label: "Buyer full name".to_string(),
            value: String::new(),
            flags: 2,
            choices: vec!["A".into(), "B".into()],
            caption: Some("Go".into()),
            on_state: None,
        }
    }

    #[test]
    fn test_field_record_from_widget() {
        let record = field_record(&widget("Buyer.Name", type_codes::TEXT));
        assert_eq!(record.key, "Buyer.Name");
        assert_eq!(record.parent, "Buyer");
        assert_eq!(record.child, "Name");
        assert_eq!(record.field_type, FieldType::Text);
        assert!(record.is_required);
        assert!(!record.is_readonly);
        assert_eq!(record.field_label, "Buyer full name");
        assert!(record.choices.is_none());
        assert!(record.button_caption.is_none());
    }

    #[test]
    fn test_type_specific_extras() {
        let choice = field_record(&widget("State", type_codes::CHOICE));
        assert_eq!(choice.choices, Some(vec!["A".to_string(), "B".to_string()]));
        assert!(choice.button_caption.is_none());

        let button = field_record(&widget("Submit", type_codes::BUTTON));
        assert_eq!(button.button_caption.as_deref(), Some("Go"));
        assert!(button.choices.is_none());
    }

    #[test]
    fn test_button_without_caption_records_empty_string() {
        let mut plain = widget("Agree", type_codes::BUTTON);
        plain.caption = None;
        let record = field_record(&plain);
        assert_eq!(record.button_caption.as_deref(), Some(""));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["button_caption"], "");
    }

    #[test]
    fn test_unnamed_widget_gets_placeholder() {
        let record = field_record(&widget("", type_codes::NONE));
        assert_eq!(record.key, "unnamed_field_7_0");
        assert_eq!(record.parent, "root");
        assert_eq!(record.field_type, FieldType::Unknown);
    }
}
