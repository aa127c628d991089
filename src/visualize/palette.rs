//! Type → color tables for each visualization.
//!
//! Every view keys colors on [`FieldType`]; the views differ in saturation
//! and translucency so their output stays recognizable side by side.

use crate::fields::FieldType;
use crate::render::Rgba;

/// Translucent fill and opaque outline for one field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxColors {
    /// Box interior
    pub fill: Rgba,
    /// Box border
    pub outline: Rgba,
}

impl BoxColors {
    const fn new(r: u8, g: u8, b: u8, fill_alpha: u8) -> Self {
        Self {
            fill: Rgba(r, g, b, fill_alpha),
            outline: Rgba::rgb(r, g, b),
        }
    }
}

/// Overlay with legend.
pub fn highlight(field_type: FieldType) -> BoxColors {
    match field_type {
        FieldType::Button => BoxColors::new(255, 0, 0, 100),
        FieldType::Text => BoxColors::new(0, 0, 255, 100),
        FieldType::Choice => BoxColors::new(0, 255, 0, 100),
        FieldType::Signature => BoxColors::new(255, 0, 255, 100),
        FieldType::Unknown => BoxColors::new(255, 165, 0, 100),
    }
}

/// Legend entries of the overlay view.
pub const HIGHLIGHT_LEGEND: [(&str, Rgba); 5] = [
    ("Text Fields", Rgba::rgb(0, 0, 255)),
    ("Buttons/Checkboxes", Rgba::rgb(255, 0, 0)),
    ("Dropdowns", Rgba::rgb(0, 255, 0)),
    ("Signatures", Rgba::rgb(255, 0, 255)),
    ("Unknown", Rgba::rgb(255, 165, 0)),
];

/// Page boxes of the comprehensive view.
pub fn comprehensive(field_type: FieldType) -> BoxColors {
    match field_type {
        FieldType::Button => BoxColors::new(255, 0, 0, 80),
        FieldType::Text => BoxColors::new(0, 100, 255, 80),
        FieldType::Choice => BoxColors::new(0, 200, 0, 80),
        FieldType::Signature => BoxColors::new(200, 0, 200, 80),
        FieldType::Unknown => BoxColors::new(255, 165, 0, 80),
    }
}

/// "Type: ..." text in the comprehensive side panel.
pub fn comprehensive_type_text(field_type: FieldType) -> Rgba {
    match field_type {
        FieldType::Unknown => Rgba::rgb(255, 140, 0),
        other => comprehensive(other).outline,
    }
}

/// Legend entries of the comprehensive side panel.
pub const COMPREHENSIVE_LEGEND: [(&str, Rgba); 5] = [
    ("Text Fields", Rgba::rgb(0, 100, 255)),
    ("Buttons/Checkboxes", Rgba::rgb(255, 0, 0)),
    ("Dropdowns/Choice", Rgba::rgb(0, 200, 0)),
    ("Signatures", Rgba::rgb(200, 0, 200)),
    ("Unknown Type", Rgba::rgb(255, 165, 0)),
];

/// Simple highlight: light fills with darker borders.
pub fn simple(field_type: FieldType) -> BoxColors {
    let (fill, outline) = match field_type {
        FieldType::Button => ((255, 100, 100), (255, 0, 0)),
        FieldType::Text => ((100, 150, 255), (0, 100, 255)),
        FieldType::Choice => ((100, 255, 150), (0, 200, 100)),
        FieldType::Signature => ((255, 100, 255), (200, 0, 200)),
        FieldType::Unknown => ((255, 165, 0), (255, 140, 0)),
    };
    BoxColors {
        fill: Rgba(fill.0, fill.1, fill.2, 120),
        outline: Rgba::rgb(outline.0, outline.1, outline.2),
    }
}

/// Legend entries of the simple highlight. Unknown fields are not listed.
pub const SIMPLE_LEGEND: [(&str, Rgba); 4] = [
    ("Text Input Fields", Rgba::rgb(0, 100, 255)),
    ("Checkboxes/Buttons", Rgba::rgb(255, 0, 0)),
    ("Dropdown Lists", Rgba::rgb(0, 200, 100)),
    ("Signature Fields", Rgba::rgb(200, 0, 200)),
];

/// `[Type]` tag in the field list image.
pub fn field_list_tag(field_type: FieldType) -> Rgba {
    match field_type {
        FieldType::Text => Rgba::rgb(0, 0, 255),
        FieldType::Button => Rgba::rgb(255, 0, 0),
        FieldType::Choice => Rgba::rgb(0, 128, 0),
        FieldType::Signature => Rgba::rgb(128, 0, 128),
        FieldType::Unknown => Rgba::rgb(255, 140, 0),
    }
}
