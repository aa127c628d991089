//! Appearance and stamp content streams.
//!
//! Viewers that honour `/NeedAppearances` regenerate field appearances on
//! their own. The streams built here are what everything else (including the
//! rasterizer in this crate) sees.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

/// Builds the content of widget appearance streams and page stamps.
#[derive(Debug, Clone)]
pub struct AppearanceBuilder {
    /// Font resource name used in `Tf`
    font_name: String,
    /// Text fill colour (RGB 0.0-1.0)
    text_color: (f32, f32, f32),
    /// Horizontal text inset
    padding: f32,
}

impl Default for AppearanceBuilder {
    fn default() -> Self {
        Self {
            font_name: "Helv".to_string(),
            text_color: (0.0, 0.0, 0.0),
            padding: 2.0,
        }
    }
}

impl AppearanceBuilder {
    /// Create a builder drawing black Helvetica text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different font resource name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    /// Set the text colour.
    pub fn with_text_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.text_color = (r, g, b);
        self
    }

    /// Font resource name used in `Tf`.
    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Font size for a field of the given height when `/DA` asks for auto size.
    pub fn auto_font_size(height: f32) -> f32 {
        (height * 0.6).clamp(4.0, 12.0)
    }

    /// Normal appearance of a text-like field: one line of text, vertically
    /// centred, inside a `/Tx` marked-content section.
    pub fn text_field(&self, width: f32, height: f32, text: &str, font_size: f32) -> Content {
        let mut ops = vec![Operation::new("BMC", vec![Object::Name(b"Tx".to_vec())])];

        if !text.is_empty() {
            let y_pos = ((height - font_size) / 2.0 + font_size * 0.2).max(1.0);
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new(
                "re",
                vec![1.into(), 1.into(), (width - 2.0).max(0.0).into(), (height - 2.0).max(0.0).into()],
            ));
            ops.push(Operation::new("W", vec![]));
            ops.push(Operation::new("n", vec![]));
            ops.extend(self.text_run(self.padding, y_pos, text, font_size));
            ops.push(Operation::new("Q", vec![]));
        }

        ops.push(Operation::new("EMC", vec![]));
        Content { operations: ops }
    }

    /// A short text run drawn directly on a page at a user-space point.
    pub fn stamp(&self, x: f32, y: f32, text: &str, font_size: f32) -> Content {
        let mut ops = vec![Operation::new("q", vec![])];
        ops.extend(self.text_run(x, y, text, font_size));
        ops.push(Operation::new("Q", vec![]));
        Content { operations: ops }
    }

    fn text_run(&self, x: f32, y: f32, text: &str, font_size: f32) -> Vec<Operation> {
        let (r, g, b) = self.text_color;
        vec![
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new(
                "Tf",
                vec![Object::Name(self.font_name.as_bytes().to_vec()), font_size.into()],
            ),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::String(win_ansi_bytes(text), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]
    }
}

/// Encode text for a simple font with the standard Latin encoding.
/// Characters outside Latin-1 become `?`.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operators(content: &Content) -> Vec<&str> {
        content.operations.iter().map(|op| op.operator.as_str()).collect()
    }

    #[test]
    fn test_text_field_appearance() {
        let content = AppearanceBuilder::new().text_field(200.0, 20.0, "Jane Doe", 10.0);
        let ops = operators(&content);
        assert_eq!(ops.first(), Some(&"BMC"));
        assert_eq!(ops.last(), Some(&"EMC"));
        assert!(ops.contains(&"Tj"));

        let bytes = content.encode().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Helv "));
        assert!(text.contains("(Jane Doe) Tj"));
    }

    #[test]
    fn test_empty_text_has_no_text_run() {
        let content = AppearanceBuilder::new().text_field(200.0, 20.0, "", 10.0);
        assert_eq!(operators(&content), vec!["BMC", "EMC"]);
    }

    #[test]
    fn test_stamp_is_balanced() {
        let content = AppearanceBuilder::new()
            .with_font_name("FmkHelv")
            .stamp(104.5, 700.0, "X", 10.0);
        let ops = operators(&content);
        assert_eq!(ops.first(), Some(&"q"));
        assert_eq!(ops.last(), Some(&"Q"));
        let text = String::from_utf8_lossy(&content.encode().unwrap()).into_owned();
        assert!(text.contains("/FmkHelv "));
        assert!(text.contains("(X) Tj"));
    }

    #[test]
    fn test_non_latin_replaced() {
        assert_eq!(win_ansi_bytes("Aé€"), vec![b'A', 0xE9, b'?']);
    }

    #[test]
    fn test_auto_font_size_bounds() {
        assert_eq!(AppearanceBuilder::auto_font_size(100.0), 12.0);
        assert_eq!(AppearanceBuilder::auto_font_size(2.0), 4.0);
    }
}
