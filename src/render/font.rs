//! Fonts for rasterization.
//!
//! Glyph outlines always come from one system sans-serif face; the PDF font
//! dictionary only contributes character codes, widths and the Unicode
//! mapping. Embedded font programs are not used.

use crate::pdf::{name_to_string, obj_to_f64, FormDocument};
use lazy_static::lazy_static;
use lopdf::{Dictionary, Object};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Environment variable naming an extra directory of font files.
pub const FONT_DIR_ENV: &str = "PDF_FORMKIT_FONT_DIR";

/// Family names tried before the generic sans-serif family.
const PREFERRED_FAMILIES: [&str; 5] =
    ["Helvetica", "Arial", "Liberation Sans", "DejaVu Sans", "Noto Sans"];

/// A font file loaded from the system.
#[derive(Debug)]
pub struct SystemFont {
    data: Vec<u8>,
    index: u32,
    family: String,
}

impl SystemFont {
    /// Parse the face. Cheap: `ttf-parser` does not copy the data.
    pub fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }

    /// Family name reported by the font database.
    pub fn family(&self) -> &str {
        &self.family
    }
}

static SANS_SERIF: OnceLock<Option<SystemFont>> = OnceLock::new();

/// The shared sans-serif face, loaded on first use.
///
/// Returns `None` when the system has no usable font; callers degrade to
/// drawing without text.
pub fn sans_serif() -> Option<&'static SystemFont> {
    SANS_SERIF.get_or_init(load_sans_serif).as_ref()
}

fn load_sans_serif() -> Option<SystemFont> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    if let Ok(dir) = std::env::var(FONT_DIR_ENV) {
        db.load_fonts_dir(dir);
    }

    let mut families: Vec<fontdb::Family<'_>> =
        PREFERRED_FAMILIES.iter().map(|f| fontdb::Family::Name(*f)).collect();
    families.push(fontdb::Family::SansSerif);
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db.query(&query).or_else(|| db.faces().next().map(|face| face.id));
    let Some(id) = id else {
        log::warn!("No system fonts found; text will not be drawn");
        return None;
    };

    let family = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();

    let font = db.with_face_data(id, |data, index| SystemFont {
        data: data.to_vec(),
        index,
        family,
    })?;

    if font.face().is_none() {
        log::warn!("System font '{}' could not be parsed", font.family);
        return None;
    }
    log::debug!("Using system font '{}'", font.family);
    Some(font)
}

/// Character codes, widths and Unicode mapping of a PDF font resource.
#[derive(Debug, Clone, Default)]
pub(crate) struct PdfFont {
    /// `/BaseFont`
    pub base_font: String,
    /// Type0 fonts use two-byte codes
    pub two_byte: bool,
    first_char: u32,
    /// Widths of a simple font, in thousandths of text space
    widths: Vec<f32>,
    /// Widths of a composite font by CID
    cid_widths: HashMap<u16, f32>,
    /// Width for codes missing from the tables
    default_width: Option<f32>,
    to_unicode: HashMap<u16, String>,
}

impl PdfFont {
    /// Read a font dictionary.
    pub fn from_dict(doc: &FormDocument, dict: &Dictionary) -> Self {
        let subtype = dict.get(b"Subtype").and_then(Object::as_name).unwrap_or_default();
        let mut font = PdfFont {
            base_font: dict
                .get(b"BaseFont")
                .and_then(Object::as_name)
                .map(name_to_string)
                .unwrap_or_default(),
            two_byte: subtype == b"Type0",
            ..PdfFont::default()
        };

        if font.two_byte {
            font.read_descendant_widths(doc, dict);
        } else {
            font.first_char = doc
                .get_resolved(dict, b"FirstChar")
                .and_then(obj_to_f64)
                .map(|v| v.max(0.0) as u32)
                .unwrap_or(0);
            if let Some(Ok(widths)) = doc.get_resolved(dict, b"Widths").map(Object::as_array) {
                font.widths = widths
                    .iter()
                    .map(|w| doc.resolve(w).and_then(obj_to_f64).unwrap_or(0.0) as f32)
                    .collect();
            }
            font.default_width = doc
                .get_resolved(dict, b"FontDescriptor")
                .and_then(|d| d.as_dict().ok())
                .and_then(|d| doc.get_resolved(d, b"MissingWidth"))
                .and_then(obj_to_f64)
                .map(|w| w as f32);
        }

        if let Some(Ok(stream)) = doc.get_resolved(dict, b"ToUnicode").map(Object::as_stream) {
            if let Ok(bytes) = stream.get_plain_content() {
                font.to_unicode = parse_to_unicode(&String::from_utf8_lossy(&bytes));
            }
        }
        font
    }

    fn read_descendant_widths(&mut self, doc: &FormDocument, dict: &Dictionary) {
        let descendant = doc
            .get_resolved(dict, b"DescendantFonts")
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| arr.first())
            .and_then(|o| doc.resolve_dict(o));
        let Some(descendant) = descendant else {
            return;
        };

        self.default_width = Some(
            doc.get_resolved(descendant, b"DW")
                .and_then(obj_to_f64)
                .unwrap_or(1000.0) as f32,
        );

        let Some(Ok(w)) = doc.get_resolved(descendant, b"W").map(Object::as_array) else {
            return;
        };
        // [c [w1 w2 ...]] or [c_first c_last w]
        let mut i = 0;
        while i < w.len() {
            let Some(first) = doc.resolve(&w[i]).and_then(obj_to_f64) else {
                break;
            };
            let first = first as u16;
            match w.get(i + 1).and_then(|o| doc.resolve(o)) {
                Some(Object::Array(list)) => {
                    for (offset, width) in list.iter().enumerate() {
                        if let Some(width) = doc.resolve(width).and_then(obj_to_f64) {
                            self.cid_widths.insert(first.saturating_add(offset as u16), width as f32);
                        }
                    }
                    i += 2;
                },
                Some(last) => {
                    let last = obj_to_f64(last).unwrap_or(f64::from(first)) as u16;
                    let width = w.get(i + 2).and_then(|o| doc.resolve(o)).and_then(obj_to_f64);
                    if let Some(width) = width {
                        for cid in first..=last.max(first) {
                            self.cid_widths.insert(cid, width as f32);
                        }
                    }
                    i += 3;
                },
                None => break,
            }
        }
    }

    /// Split a string operand into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u16> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|pair| match pair {
                    [hi, lo] => u16::from_be_bytes([*hi, *lo]),
                    [lo] => u16::from(*lo),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|b| u16::from(*b)).collect()
        }
    }

    /// Text a code stands for; empty when unknown.
    pub fn code_to_text(&self, code: u16) -> String {
        if let Some(text) = self.to_unicode.get(&code) {
            return text.clone();
        }
        if self.two_byte {
            return String::new();
        }
        win_ansi_char(code as u8).map(String::from).unwrap_or_default()
    }

    /// Advance width from the PDF tables, in thousandths of text space.
    pub fn width(&self, code: u16) -> Option<f32> {
        if self.two_byte {
            return self.cid_widths.get(&code).copied().or(self.default_width);
        }
        u32::from(code)
            .checked_sub(self.first_char)
            .and_then(|idx| self.widths.get(idx as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .or(self.default_width)
    }

    /// Word spacing applies to single-byte code 32 only.
    pub fn is_space(&self, code: u16) -> bool {
        !self.two_byte && code == 32
    }
}

/// Decode a single-byte code with WinAnsiEncoding.
fn win_ansi_char(byte: u8) -> Option<char> {
    let c = match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        0x00..=0x1F | 0x7F..=0x9F => return None,
        other => char::from(other),
    };
    Some(c)
}

lazy_static! {
    static ref BFCHAR_SECTION: Regex = Regex::new(r"(?s)beginbfchar(.*?)endbfchar").unwrap();
    static ref BFRANGE_SECTION: Regex = Regex::new(r"(?s)beginbfrange(.*?)endbfrange").unwrap();
    static ref HEX_TOKEN: Regex = Regex::new(r"<([0-9A-Fa-f\s]*)>").unwrap();
    static ref RANGE_ENTRY: Regex = Regex::new(
        r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>\s*(\[[^\]]*\]|<[0-9A-Fa-f\s]*>)"
    ).unwrap();
}

/// Parse the `bfchar` and `bfrange` sections of a ToUnicode CMap.
pub(crate) fn parse_to_unicode(cmap: &str) -> HashMap<u16, String> {
    let mut map = HashMap::new();

    for section in BFCHAR_SECTION.captures_iter(cmap) {
        let tokens: Vec<Vec<u8>> = HEX_TOKEN
            .captures_iter(&section[1])
            .filter_map(|c| parse_hex(&c[1]))
            .collect();
        for pair in tokens.chunks_exact(2) {
            if let Some(code) = bytes_to_code(&pair[0]) {
                map.insert(code, utf16_text(&pair[1]));
            }
        }
    }

    for section in BFRANGE_SECTION.captures_iter(cmap) {
        for entry in RANGE_ENTRY.captures_iter(&section[1]) {
            let (Some(start), Some(end)) = (
                parse_hex(&entry[1]).and_then(|b| bytes_to_code(&b)),
                parse_hex(&entry[2]).and_then(|b| bytes_to_code(&b)),
            ) else {
                continue;
            };
            if start > end {
                continue;
            }
            let target = &entry[3];
            if target.starts_with('[') {
                let items = HEX_TOKEN.captures_iter(target).filter_map(|c| parse_hex(&c[1]));
                for (code, dst) in (start..=end).zip(items) {
                    map.insert(code, utf16_text(&dst));
                }
            } else if let Some(base) = parse_hex(target.trim_matches(|c| c == '<' || c == '>')) {
                let mut units = utf16_units(&base);
                for code in start..=end {
                    map.insert(code, String::from_utf16_lossy(&units));
                    if let Some(last) = units.last_mut() {
                        *last = last.wrapping_add(1);
                    }
                }
            }
        }
    }
    map
}

fn parse_hex(token: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = token
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    Some(
        digits
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
            .collect(),
    )
}

fn bytes_to_code(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [b] => Some(u16::from(*b)),
        [hi, lo] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [lo] => u16::from(*lo),
            _ => 0,
        })
        .collect()
}

fn utf16_text(bytes: &[u8]) -> String {
    String::from_utf16_lossy(&utf16_units(bytes))
}
