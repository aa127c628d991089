//! Widget annotations and their form-field attributes.
//!
//! A widget is the on-page rectangle of a form field. The field attributes
//! (`/T`, `/FT`, `/V`, `/Ff`, `/Opt`, `/TU`) may sit on the widget itself or
//! on any ancestor reached through `/Parent`; inheritable attributes are
//! looked up along that chain.

use super::{decode_text_string, name_to_string, FormDocument, MAX_PARENT_DEPTH};
use crate::error::{Error, Result};
use crate::fields::{type_codes, FieldType};
use crate::geometry::{PageBox, Rect};
use lopdf::{Dictionary, Object, ObjectId};

/// A widget annotation with its resolved field attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    /// Object id of the widget annotation
    pub id: ObjectId,
    /// Object id of the field dictionary that owns `/V`
    pub field_id: ObjectId,
    /// Fully qualified field name, empty when no `/T` exists on the chain
    pub name: String,
    /// Integer type code from `/FT`
    pub type_code: i32,
    /// `/Rect` exactly as stored (user space)
    pub user_rect: [f64; 4],
    /// `/Rect` in page space, rounded to two decimals
    pub rect: Rect,
    /// Alternate name (`/TU`)
    pub label: String,
    /// Current value (`/V`) rendered as text
    pub value: String,
    /// Field flags (`/Ff`)
    pub flags: u32,
    /// Display strings of `/Opt`
    pub choices: Vec<String>,
    /// Normal caption (`/MK /CA`)
    pub caption: Option<String>,
    /// Name of the "on" appearance state, if the widget has one
    pub on_state: Option<String>,
}

impl Widget {
    /// Symbolic field type.
    pub fn field_type(&self) -> FieldType {
        FieldType::from_code(self.type_code)
    }

    /// Whether the widget belongs to a button field.
    pub fn is_button(&self) -> bool {
        self.type_code == type_codes::BUTTON
    }

    /// Placeholder used in place of an empty field name.
    pub fn placeholder_name(&self) -> String {
        format!("unnamed_field_{}_{}", self.id.0, self.id.1)
    }

    /// Field name, or the placeholder when the name is empty.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.placeholder_name()
        } else {
            self.name.clone()
        }
    }
}

/// Outcome of reading one entry of a page's `/Annots`.
#[derive(Debug)]
pub struct WidgetRead {
    /// Object id of the annotation, when it is an indirect object
    pub id: Option<ObjectId>,
    /// The decoded widget or why decoding failed
    pub widget: Result<Widget>,
}

impl FormDocument {
    /// All widget annotations on a page, in `/Annots` order.
    ///
    /// Annotations of other subtypes are skipped silently. Widgets that
    /// cannot be decoded are returned as errors so the caller can log them
    /// and keep going.
    pub fn page_widgets(&self, page_number: u32) -> Result<Vec<WidgetRead>> {
        let page_id = self.page_id(page_number)?;
        let page_box = self.page_box(page_number)?;
        let page = self.doc.get_dictionary(page_id)?;

        let annots = match self.get_resolved(page, b"Annots").and_then(|o| o.as_array().ok()) {
            Some(arr) => arr,
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::new();
        for annot in annots {
            let id = annot.as_reference().ok();
            let dict = match self.resolve_dict(annot) {
                Some(d) => d,
                None => continue,
            };
            if !matches!(dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Widget")) {
                continue;
            }

            let widget = match id {
                Some(id) => self.read_widget(id, dict, &page_box),
                None => Err(Error::InvalidWidget(
                    "widget annotation is not an indirect object".to_string(),
                )),
            };
            out.push(WidgetRead { id, widget });
        }

        Ok(out)
    }

    /// Decode every widget on a page, dropping the ones that fail.
    pub fn page_widgets_lossy(&self, page_number: u32) -> Result<Vec<Widget>> {
        Ok(self
            .page_widgets(page_number)?
            .into_iter()
            .filter_map(|read| match read.widget {
                Ok(widget) => Some(widget),
                Err(e) => {
                    log::warn!("Skipping widget {:?} on page {}: {}", read.id, page_number, e);
                    None
                },
            })
            .collect())
    }

    /// Decode a single widget by object id.
    pub fn widget(&self, id: ObjectId, page_number: u32) -> Result<Widget> {
        let page_box = self.page_box(page_number)?;
        let dict = self.doc.get_dictionary(id)?;
        self.read_widget(id, dict, &page_box)
    }

    fn read_widget(&self, id: ObjectId, dict: &Dictionary, page_box: &PageBox) -> Result<Widget> {
        let name = self.qualified_name(dict);

        let user_rect = dict
            .get(b"Rect")
            .ok()
            .and_then(|obj| self.rect_array(obj))
            .ok_or_else(|| {
                Error::InvalidWidget(format!(
                    "'{}' ({} {} R) has no usable /Rect",
                    name, id.0, id.1
                ))
            })?;
        let [x0, y0, x1, y1] = user_rect;
        let rect = page_box.to_page_space(x0, y0, x1, y1).rounded();

        let type_code = self
            .inherited(dict, b"FT")
            .and_then(|obj| obj.as_name().ok())
            .map(FieldType::code_for_pdf_name)
            .unwrap_or(type_codes::NONE);

        let flags = self
            .inherited(dict, b"Ff")
            .and_then(|obj| obj.as_i64().ok())
            .map(|f| f as u32)
            .unwrap_or(0);

        let value = self
            .inherited(dict, b"V")
            .map(|obj| self.value_text(obj))
            .unwrap_or_default();

        let label = self
            .inherited(dict, b"TU")
            .and_then(|obj| obj.as_str().ok())
            .map(decode_text_string)
            .unwrap_or_default();

        let choices = self
            .inherited(dict, b"Opt")
            .and_then(|obj| obj.as_array().ok())
            .map(|arr| arr.iter().filter_map(|item| self.choice_label(item)).collect())
            .unwrap_or_default();

        let caption = self
            .get_resolved(dict, b"MK")
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|mk| self.get_resolved(mk, b"CA"))
            .and_then(|obj| obj.as_str().ok())
            .map(decode_text_string);

        Ok(Widget {
            id,
            field_id: self.field_owner(id, dict),
            name,
            type_code,
            user_rect,
            rect,
            label,
            value,
            flags,
            choices,
            caption,
            on_state: self.on_state(dict),
        })
    }

    /// Build the fully qualified name from the `/T` entries along `/Parent`.
    fn qualified_name(&self, dict: &Dictionary) -> String {
        let mut parts = Vec::new();
        let mut current = Some(dict);

        for _ in 0..MAX_PARENT_DEPTH {
            let Some(node) = current else { break };
            if let Some(partial) = self.get_resolved(node, b"T").and_then(|o| o.as_str().ok()) {
                let partial = decode_text_string(partial);
                if !partial.is_empty() {
                    parts.push(partial);
                }
            }
            current = node.get(b"Parent").ok().and_then(|p| self.resolve_dict(p));
        }

        parts.reverse();
        parts.join(".")
    }

    /// Look up an inheritable field attribute on the widget or its ancestors.
    pub(crate) fn inherited<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut current = dict;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Some(obj) = self.get_resolved(current, key) {
                return Some(obj);
            }
            current = self.resolve_dict(current.get(b"Parent").ok()?)?;
        }
        None
    }

    /// The dictionary that owns the field value: the widget when it carries
    /// `/T` itself, otherwise its parent field.
    fn field_owner(&self, id: ObjectId, dict: &Dictionary) -> ObjectId {
        if dict.has(b"T") {
            return id;
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => parent,
            Err(_) => id,
        }
    }

    /// Render a `/V` value as text.
    fn value_text(&self, obj: &Object) -> String {
        match obj {
            Object::String(bytes, _) => decode_text_string(bytes),
            Object::Name(name) => name_to_string(name),
            Object::Boolean(b) => b.to_string(),
            Object::Integer(i) => i.to_string(),
            Object::Real(r) => r.to_string(),
            Object::Array(items) => items
                .iter()
                .filter_map(|item| self.resolve(item))
                .map(|item| self.value_text(item))
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }

    /// Display string of one `/Opt` entry: a text string, or the second
    /// element of an `[export display]` pair.
    fn choice_label(&self, item: &Object) -> Option<String> {
        match self.resolve(item)? {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            Object::Name(name) => Some(name_to_string(name)),
            Object::Array(pair) => {
                let display = pair.get(1).or_else(|| pair.first())?;
                match self.resolve(display)? {
                    Object::String(bytes, _) => Some(decode_text_string(bytes)),
                    Object::Name(name) => Some(name_to_string(name)),
                    _ => None,
                }
            },
            _ => None,
        }
    }

    /// First key of the normal appearance dictionary other than `Off`.
    fn on_state(&self, dict: &Dictionary) -> Option<String> {
        let normal = self
            .get_resolved(dict, b"AP")
            .and_then(|ap| ap.as_dict().ok())
            .and_then(|ap| self.get_resolved(ap, b"N"))
            .and_then(|n| n.as_dict().ok())?;

        normal
            .iter()
            .map(|(key, _)| key)
            .find(|key| key.as_slice() != b"Off")
            .map(|key| name_to_string(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_name_is_deterministic() {
        let widget = Widget {
            id: (42, 0),
            field_id: (42, 0),
            name: String::new(),
            type_code: type_codes::TEXT,
            user_rect: [0.0, 0.0, 10.0, 10.0],
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            label: String::new(),
            value: String::new(),
            flags: 0,
            choices: Vec::new(),
            caption: None,
            on_state: None,
        };
        assert_eq!(widget.display_name(), "unnamed_field_42_0");
        assert_eq!(widget.display_name(), widget.placeholder_name());
        assert_eq!(widget.field_type(), FieldType::Text);
        assert!(!widget.is_button());
    }
}
