//! Form filling with synthetic values.
//!
//! The filler walks the live widgets of the PDF, looks each one up in the
//! extracted [`DocumentRecord`], generates a value and writes it back:
//!
//! 1. Buttons are checked or unchecked (`/V` and `/AS`).
//! 2. Small non-button widgets (checkbox-shaped text fields) get `X` and an
//!    `X` glyph stamped on the page itself.
//! 3. Choice and text fields get `/V` plus a regenerated appearance.
//!
//! # Example
//!
//! ```no_run
//! use pdf_formkit::fill::FormFiller;
//! use rand::SeedableRng;
//!
//! let mut filler = FormFiller::from_paths("RF401.pdf", "RF401_fields.json")?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let report = filler.fill("RF401_Filled.pdf", &mut rng, None)?;
//! println!("filled {} fields", report.filled);
//! # Ok::<(), pdf_formkit::Error>(())
//! ```

mod fake_data;
mod values;

pub use fake_data::{date_this_year, format_date, FakeData, DATE_FORMAT};
#[cfg(feature = "fake-data")]
pub use fake_data::FakerSource;
pub use values::{group_thousands, synthesize_value, FieldValue, DEFAULT_CHOICE, FALLBACK_DATE};

/// The realistic generator when the `fake-data` feature is enabled.
///
/// Without the feature this is `None` and synthesis falls back to fixed
/// placeholder values.
pub fn default_fake_source() -> Option<&'static dyn FakeData> {
    #[cfg(feature = "fake-data")]
    {
        Some(&FakerSource)
    }
    #[cfg(not(feature = "fake-data"))]
    {
        None
    }
}

use crate::config::FillOptions;
use crate::error::Result;
use crate::extract::field_record;
use crate::fields::{parse_field_hierarchy, FieldType};
use crate::geometry::Rect;
use crate::pdf::{FormDocument, Widget};
use crate::record::{DocumentRecord, FieldRecord};
use rand::RngCore;
use std::path::Path;

/// Placeholder key and child for widgets without a name.
pub const UNKNOWN_FIELD: &str = "unknown";

/// What the filler does to one widget.
#[derive(Debug, Clone, PartialEq)]
pub enum FillAction {
    /// Check or uncheck a button
    Toggle(bool),
    /// Put `X` in a checkbox-shaped field and stamp a glyph at the given
    /// page-space point
    Mark {
        /// Stamp origin x (page space)
        x: f64,
        /// Stamp origin y (page space)
        y: f64,
    },
    /// Select a choice option
    Select(String),
    /// Set text
    Text(String),
}

/// Decide what to write into a widget.
///
/// Buttons are handled first; a non-button widget smaller than
/// `checkbox_threshold` on both sides is treated as a checkbox whatever the
/// generated value was.
pub fn plan_fill(
    field: &FieldRecord,
    widget_rect: &Rect,
    value: FieldValue,
    checkbox_threshold: f64,
) -> FillAction {
    if field.field_type == FieldType::Button {
        return match value {
            FieldValue::Checked(checked) => FillAction::Toggle(checked),
            FieldValue::Text(text) => FillAction::Toggle(!text.is_empty()),
        };
    }

    if widget_rect.fits_within(checkbox_threshold) {
        return FillAction::Mark {
            x: widget_rect.x0 + widget_rect.width() / 2.0 - 3.0,
            y: widget_rect.y1 - 2.0,
        };
    }

    let text = value.as_text();
    if field.field_type == FieldType::Choice {
        FillAction::Select(text)
    } else {
        FillAction::Text(text)
    }
}

/// One widget the filler wrote to.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledField {
    /// Page number
    pub page: u32,
    /// Field key
    pub key: String,
    /// What was written
    pub action: FillAction,
}

/// Outcome of a fill run.
#[derive(Debug, Clone, Default)]
pub struct FillReport {
    /// Number of widgets filled successfully
    pub filled: usize,
    /// Widgets that were filled, in order
    pub fields: Vec<FilledField>,
    /// Field keys whose update failed, with the reason
    pub failures: Vec<(String, String)>,
    /// Pages skipped because the record has no entry for them
    pub skipped_pages: Vec<u32>,
}

impl FillReport {
    /// Keys of every filled widget.
    pub fn filled_keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }

    /// Number of checkbox-shaped fields that received an `X`.
    pub fn marks(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| matches!(f.action, FillAction::Mark { .. }))
            .count()
    }
}

/// Fills a PDF form from its extracted field record.
pub struct FormFiller {
    doc: FormDocument,
    record: DocumentRecord,
    options: FillOptions,
}

impl FormFiller {
    /// Fill `doc` using `record`.
    pub fn new(doc: FormDocument, record: DocumentRecord) -> Self {
        Self {
            doc,
            record,
            options: FillOptions::default(),
        }
    }

    /// Open the PDF and pair it with an in-memory record.
    pub fn open(pdf: impl AsRef<Path>, record: DocumentRecord) -> Result<Self> {
        Ok(Self::new(FormDocument::open(pdf)?, record))
    }

    /// Open the PDF and load the record from JSON.
    pub fn from_paths(pdf: impl AsRef<Path>, record_json: impl AsRef<Path>) -> Result<Self> {
        let doc = FormDocument::open(pdf)?;
        let record = DocumentRecord::load_json(record_json)?;
        Ok(Self::new(doc, record))
    }

    /// Replace the fill options.
    pub fn with_options(mut self, options: FillOptions) -> Self {
        self.options = options;
        self
    }

    /// Fill every widget and save the result to `output`.
    ///
    /// The input PDF is never modified. Failures on individual widgets are
    /// logged and reported; they do not stop the run.
    pub fn fill(
        &mut self,
        output: impl AsRef<Path>,
        rng: &mut dyn RngCore,
        fake: Option<&dyn FakeData>,
    ) -> Result<FillReport> {
        let output = output.as_ref();
        log::info!("Filling form: {}", self.doc.path().display());

        let mut report = FillReport::default();
        let page_numbers: Vec<u32> = self.doc.page_numbers().collect();

        for page_number in page_numbers {
            if self.record.page(page_number).is_none() {
                log::debug!("No field data for page {}, skipping", page_number);
                report.skipped_pages.push(page_number);
                continue;
            }

            for widget in self.doc.page_widgets_lossy(page_number)? {
                let field = self.field_for(page_number, &widget);
                let value = synthesize_value(&field, rng, fake, self.options.checked_probability);
                let action = plan_fill(&field, &widget.rect, value, self.options.checkbox_threshold);

                match self.apply(page_number, &widget, &action) {
                    Ok(()) => {
                        report.filled += 1;
                        report.fields.push(FilledField {
                            page: page_number,
                            key: field.key,
                            action,
                        });
                    },
                    Err(e) => {
                        log::warn!("Failed to fill field {}: {}", field.key, e);
                        report.failures.push((field.key, e.to_string()));
                    },
                }
            }
        }

        self.doc.set_need_appearances()?;
        self.doc.save(output)?;

        log::info!("Successfully filled {} fields.", report.filled);
        log::info!("Saved to: {}", output.display());
        Ok(report)
    }

    /// The record entry for a widget, or an ad-hoc one built from the widget.
    fn field_for(&self, page_number: u32, widget: &Widget) -> FieldRecord {
        let key = widget.display_name();
        if let Some(field) = self.record.page(page_number).and_then(|p| p.field(&key)) {
            return field.clone();
        }

        log::debug!("'{}' not in field record, using widget data", key);
        let mut field = field_record(widget);
        if widget.name.is_empty() {
            field.key = UNKNOWN_FIELD.to_string();
            field.child = UNKNOWN_FIELD.to_string();
        } else {
            field.child = parse_field_hierarchy(&widget.name).1;
        }
        field
    }

    fn apply(&mut self, page_number: u32, widget: &Widget, action: &FillAction) -> Result<()> {
        match action {
            FillAction::Toggle(checked) => {
                self.doc.set_button_state(widget, *checked)?;
            },
            FillAction::Mark { x, y } => {
                log::debug!("Filling checkbox-shaped field '{}' with 'X'", widget.display_name());
                self.doc.set_text_value(widget, "X")?;
                self.doc
                    .stamp_text(page_number, *x, *y, "X", self.options.stamp_font_size)?;
            },
            FillAction::Select(text) | FillAction::Text(text) => {
                self.doc.set_text_value(widget, text)?;
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, field_type: FieldType) -> FieldRecord {
        let (parent, child) = parse_field_hierarchy(key);
        FieldRecord {
            key: key.to_string(),
            parent,
            child,
            field_type,
            coordinates: Rect::new(0.0, 0.0, 200.0, 20.0),
            field_label: String::new(),
            field_value: String::new(),
            field_flags: 0,
            is_required: false,
            is_readonly: false,
            choices: None,
            button_caption: None,
        }
    }

    #[test]
    fn test_small_text_field_is_marked() {
        let rect = Rect::new(100.0, 200.0, 115.0, 215.0);
        let action = plan_fill(&field("Box", FieldType::Text), &rect, FieldValue::Text("x".into()), 30.0);
        assert_eq!(action, FillAction::Mark { x: 104.5, y: 213.0 });
    }

    #[test]
    fn test_wide_text_field_gets_text() {
        let rect = Rect::new(100.0, 200.0, 300.0, 220.0);
        let action = plan_fill(&field("Name", FieldType::Text), &rect, FieldValue::Text("Jo".into()), 30.0);
        assert_eq!(action, FillAction::Text("Jo".into()));
    }

    #[test]
    fn test_small_button_is_toggled_not_marked() {
        let rect = Rect::new(0.0, 0.0, 12.0, 12.0);
        let action = plan_fill(&field("Agree", FieldType::Button), &rect, FieldValue::Checked(false), 30.0);
        assert_eq!(action, FillAction::Toggle(false));
    }

    #[test]
    fn test_small_choice_is_marked() {
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        let action = plan_fill(&field("Pick", FieldType::Choice), &rect, FieldValue::Text("A".into()), 30.0);
        assert!(matches!(action, FillAction::Mark { .. }));
    }

    #[test]
    fn test_choice_is_selected() {
        let rect = Rect::new(0.0, 0.0, 120.0, 20.0);
        let action = plan_fill(&field("Pick", FieldType::Choice), &rect, FieldValue::Text("B".into()), 30.0);
        assert_eq!(action, FillAction::Select("B".into()));
    }

    #[test]
    fn test_report_counts() {
        let mut report = FillReport::default();
        report.fields.push(FilledField {
            page: 1,
            key: "Box".into(),
            action: FillAction::Mark { x: 1.0, y: 2.0 },
        });
        report.fields.push(FilledField {
            page: 1,
            key: "Name".into(),
            action: FillAction::Text("Jo".into()),
        });
        assert_eq!(report.marks(), 1);
        assert_eq!(report.filled_keys(), vec!["Box", "Name"]);
    }
}
