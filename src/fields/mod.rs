//! Form field classification.
//!
//! - [`FieldType`]: symbolic field type derived from an integer type code
//! - [`FieldFlags`]: the common `/Ff` bits (ISO 32000-1:2008, Table 221)
//! - [`parse_field_hierarchy`]: dotted-name split into parent and child

mod flags;
mod hierarchy;

pub use flags::{ButtonFieldFlags, FieldFlags};
pub use hierarchy::{parse_field_hierarchy, ROOT_PARENT};

use serde::{Deserialize, Serialize};

/// Integer type codes reported by the widget layer for each `/FT` value.
pub mod type_codes {
    /// No usable `/FT` entry
    pub const NONE: i32 = 0;
    /// `/Btn`: push button, checkbox, radio button
    pub const BUTTON: i32 = 1;
    /// `/Tx`: text field
    pub const TEXT: i32 = 2;
    /// `/Ch`: combo box or list box
    pub const CHOICE: i32 = 3;
    /// `/Sig`: signature field
    pub const SIGNATURE: i32 = 4;
}

/// Field type stored in the field record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldType {
    /// Push button, checkbox or radio button
    Button,
    /// Single or multi-line text
    Text,
    /// Combo box or list box
    Choice,
    /// Signature field
    Signature,
    /// Anything the lookup table does not know
    Unknown,
}

impl FieldType {
    /// Classify an integer type code. Unmapped codes become [`FieldType::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_formkit::fields::FieldType;
    ///
    /// assert_eq!(FieldType::from_code(2), FieldType::Text);
    /// assert_eq!(FieldType::from_code(42), FieldType::Unknown);
    /// ```
    pub fn from_code(code: i32) -> Self {
        match code {
            type_codes::BUTTON => FieldType::Button,
            type_codes::TEXT => FieldType::Text,
            type_codes::CHOICE => FieldType::Choice,
            type_codes::SIGNATURE => FieldType::Signature,
            _ => FieldType::Unknown,
        }
    }

    /// Type code for a PDF `/FT` name (`Btn`, `Tx`, `Ch`, `Sig`).
    pub fn code_for_pdf_name(name: &[u8]) -> i32 {
        match name {
            b"Btn" => type_codes::BUTTON,
            b"Tx" => type_codes::TEXT,
            b"Ch" => type_codes::CHOICE,
            b"Sig" => type_codes::SIGNATURE,
            _ => type_codes::NONE,
        }
    }

    /// Name as written in the field record.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Button => "Button",
            FieldType::Text => "Text",
            FieldType::Choice => "Choice",
            FieldType::Signature => "Signature",
            FieldType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
