//! Read-only diagnostics for checkbox-like widgets.
//!
//! [`inspect_widgets`] lists widgets and flags the small ones that are likely
//! drawn checkboxes; [`verify_fields`] reports whether given fields (or all
//! small ones) hold a value after filling. Nothing is written.

use crate::error::Result;
use crate::geometry::Rect;
use crate::pdf::{FormDocument, Widget};
use lopdf::ObjectId;
use std::fmt;
use std::path::Path;

/// Widgets listed by [`inspect_widgets`] when no limit is given.
pub const DEFAULT_INSPECT_LIMIT: usize = 20;

/// Widgets under this size on both sides are reported as potential
/// checkboxes.
pub const CHECKBOX_SIZE_LIMIT: f64 = 20.0;

/// Size below which [`verify_fields`] checks every widget when no names are
/// given.
pub const VERIFY_SIZE_LIMIT: f64 = 30.0;

/// Extra details shown for a potential checkbox.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxDetails {
    /// Widget object id
    pub id: ObjectId,
    /// Current value
    pub value: String,
    /// Field flags
    pub flags: u32,
    /// Name of the "on" appearance state, if any
    pub on_state: Option<String>,
}

/// One inspected widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInspection {
    /// Page number
    pub page: u32,
    /// Field name (placeholder for unnamed widgets)
    pub name: String,
    /// Integer type code
    pub type_code: i32,
    /// Rectangle in page space
    pub rect: Rect,
    /// Present when the widget is small enough to be a checkbox
    pub checkbox: Option<CheckboxDetails>,
}

impl WidgetInspection {
    fn from_widget(page: u32, widget: &Widget) -> Self {
        let checkbox = widget.rect.fits_within(CHECKBOX_SIZE_LIMIT).then(|| CheckboxDetails {
            id: widget.id,
            value: widget.value.clone(),
            flags: widget.flags,
            on_state: widget.on_state.clone(),
        });
        Self {
            page,
            name: widget.display_name(),
            type_code: widget.type_code,
            rect: widget.rect,
            checkbox,
        }
    }
}

impl fmt::Display for WidgetInspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field: {}", self.name)?;
        writeln!(f, "  Type Code: {}", self.type_code)?;
        write!(f, "  Rect: {}", self.rect)?;
        if let Some(details) = &self.checkbox {
            writeln!(f)?;
            writeln!(f, "  -> Potential Checkbox based on size")?;
            writeln!(f, "  Object: {} {} R", details.id.0, details.id.1)?;
            writeln!(f, "  Field Value: {}", details.value)?;
            write!(f, "  Field Flags: {}", details.flags)?;
            if let Some(on) = &details.on_state {
                write!(f, "\n  On State: /{}", on)?;
            }
        }
        Ok(())
    }
}

/// List the first `limit` widgets of the document, page by page.
pub fn inspect_widgets(path: impl AsRef<Path>, limit: usize) -> Result<Vec<WidgetInspection>> {
    let doc = FormDocument::open(path)?;
    let mut found = Vec::new();

    'pages: for page in doc.page_numbers() {
        for widget in doc.page_widgets_lossy(page)? {
            if found.len() >= limit {
                break 'pages;
            }
            found.push(WidgetInspection::from_widget(page, &widget));
        }
    }

    let flagged = found.iter().filter(|w| w.checkbox.is_some()).count();
    log::debug!("Inspected {} widgets, {} potential checkboxes", found.len(), flagged);
    Ok(found)
}

/// Whether a field holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    /// Non-empty value
    Filled,
    /// No value
    Empty,
}

impl fmt::Display for FillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FillStatus::Filled => "[FILLED]",
            FillStatus::Empty => "[EMPTY]",
        })
    }
}

/// Value of one verified field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStatus {
    /// Page number
    pub page: u32,
    /// Field name
    pub name: String,
    /// Current value
    pub value: String,
    /// Rectangle in page space
    pub rect: Rect,
}

impl FieldStatus {
    /// Filled when the value is non-empty.
    pub fn status(&self) -> FillStatus {
        if self.value.is_empty() {
            FillStatus::Empty
        } else {
            FillStatus::Filled
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field: {}", self.name)?;
        writeln!(f, "  Value: '{}'", self.value)?;
        writeln!(f, "  Rect: {}", self.rect)?;
        write!(f, "  Status: {}", self.status())
    }
}

/// Report the values of the named fields.
///
/// With no names, every widget smaller than [`VERIFY_SIZE_LIMIT`] on both
/// sides is reported. An empty result means none matched.
pub fn verify_fields(path: impl AsRef<Path>, targets: &[String]) -> Result<Vec<FieldStatus>> {
    let doc = FormDocument::open(path)?;
    let mut found = Vec::new();

    for page in doc.page_numbers() {
        for widget in doc.page_widgets_lossy(page)? {
            let name = widget.display_name();
            let selected = if targets.is_empty() {
                widget.rect.fits_within(VERIFY_SIZE_LIMIT)
            } else {
                targets.iter().any(|t| *t == name)
            };
            if selected {
                found.push(FieldStatus {
                    page,
                    name,
                    value: widget.value.clone(),
                    rect: widget.rect,
                });
            }
        }
    }

    if found.is_empty() {
        log::warn!("Target fields not found in the PDF.");
    }
    Ok(found)
}
