//! Mutations performed by the form filler.

use super::{encode_text_string, AppearanceBuilder, FormDocument, Widget};
use crate::error::Result;
use lopdf::{dictionary, Object, ObjectId, Stream, StringFormat};

/// Resource name under which page stamps reference Helvetica.
const STAMP_FONT_KEY: &str = "FmkHelv";

/// Appearance state name used when a button has no on-state of its own.
pub const DEFAULT_ON_STATE: &str = "Yes";

impl FormDocument {
    /// Set a text value on the widget's field and give the widget a fresh
    /// normal appearance showing that text.
    pub fn set_text_value(&mut self, widget: &Widget, text: &str) -> Result<()> {
        let font_size = self.field_font_size(widget);
        let helvetica = self.helvetica_font();

        let [x0, y0, x1, y1] = widget.user_rect;
        let width = (x1 - x0).abs() as f32;
        let height = (y1 - y0).abs() as f32;
        let font_size = font_size.unwrap_or_else(|| AppearanceBuilder::auto_font_size(height));

        let builder = AppearanceBuilder::new();
        let content = builder.text_field(width, height, text, font_size);
        let appearance = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => Object::Array(vec![0.into(), 0.into(), width.into(), height.into()]),
                "Resources" => dictionary! {
                    "Font" => dictionary! { builder.font_name() => helvetica },
                },
            },
            content.encode()?,
        );
        let appearance_id = self.doc.add_object(appearance);

        let encoded = Object::String(encode_text_string(text), StringFormat::Literal);
        self.doc.get_dictionary_mut(widget.field_id)?.set("V", encoded);
        self.doc
            .get_dictionary_mut(widget.id)?
            .set("AP", dictionary! { "N" => appearance_id });

        log::debug!("Set '{}' = {:?}", widget.display_name(), text);
        Ok(())
    }

    /// Check or uncheck a button widget. Returns the state name written to
    /// `/V` and `/AS`.
    pub fn set_button_state(&mut self, widget: &Widget, checked: bool) -> Result<String> {
        let state = if checked {
            widget
                .on_state
                .clone()
                .unwrap_or_else(|| DEFAULT_ON_STATE.to_string())
        } else {
            "Off".to_string()
        };

        let name = Object::Name(state.as_bytes().to_vec());
        self.doc.get_dictionary_mut(widget.field_id)?.set("V", name.clone());
        self.doc.get_dictionary_mut(widget.id)?.set("AS", name);

        log::debug!("Set '{}' state to /{}", widget.display_name(), state);
        Ok(state)
    }

    /// Ask viewers to regenerate field appearances, and make sure the
    /// AcroForm carries a default `/Helv` resource for them to use.
    pub fn set_need_appearances(&mut self) -> Result<()> {
        let helvetica = self.helvetica_font();
        let catalog_id = self.catalog_id()?;
        let existing = self.doc.get_dictionary(catalog_id)?.get(b"AcroForm").ok().cloned();

        let acroform = match existing {
            Some(Object::Reference(id)) => self.doc.get_dictionary_mut(id)?,
            Some(Object::Dictionary(_)) => self
                .doc
                .get_dictionary_mut(catalog_id)?
                .get_mut(b"AcroForm")?
                .as_dict_mut()?,
            _ => {
                let id = self.doc.add_object(dictionary! { "Fields" => Object::Array(Vec::new()) });
                self.doc.get_dictionary_mut(catalog_id)?.set("AcroForm", id);
                self.doc.get_dictionary_mut(id)?
            },
        };

        acroform.set("NeedAppearances", true);
        if !acroform.has(b"DA") {
            acroform.set("DA", Object::string_literal("/Helv 0 Tf 0 g"));
        }
        if !acroform.has(b"DR") {
            acroform.set("DR", dictionary! { "Font" => dictionary! { "Helv" => helvetica } });
        } else if let Ok(Object::Dictionary(dr)) = acroform.get_mut(b"DR") {
            // An indirect /DR belongs to the document; only direct ones are extended
            if !dr.has(b"Font") {
                dr.set("Font", dictionary! { "Helv" => helvetica });
            } else if let Ok(Object::Dictionary(fonts)) = dr.get_mut(b"Font") {
                if !fonts.has(b"Helv") {
                    fonts.set("Helv", helvetica);
                }
            }
        }

        Ok(())
    }

    /// Draw `text` in Helvetica on top of a page's content.
    ///
    /// `(x, y)` is the text origin in page space (top-left origin, y down).
    /// The original page content is wrapped in `q`/`Q` once so that the
    /// stamp is drawn with a clean graphics state.
    pub fn stamp_text(&mut self, page_number: u32, x: f64, y: f64, text: &str, font_size: f32) -> Result<()> {
        let page_id = self.page_id(page_number)?;
        let (ux, uy) = self.page_box(page_number)?.to_user_space(x, y);

        let font_key = self.install_stamp_font(page_id)?;
        let content = AppearanceBuilder::new()
            .with_font_name(font_key)
            .stamp(ux as f32, uy as f32, text, font_size)
            .encode()?;

        let mut contents = self.doc.get_page_contents(page_id);
        if self.wrapped_pages.insert(page_id) {
            let open = self.doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
            let close = self.doc.add_object(Stream::new(dictionary! {}, b"\nQ\n".to_vec()));
            contents.insert(0, open);
            contents.push(close);
        }
        contents.push(self.doc.add_object(Stream::new(dictionary! {}, content)));

        let refs: Vec<Object> = contents.into_iter().map(Object::Reference).collect();
        self.doc.get_dictionary_mut(page_id)?.set("Contents", refs);

        log::debug!("Stamped {:?} on page {} at ({:.2}, {:.2})", text, page_number, x, y);
        Ok(())
    }

    /// Font size requested by the field's `/DA`, or `None` for auto size.
    fn field_font_size(&self, widget: &Widget) -> Option<f32> {
        let dict = self.doc.get_dictionary(widget.id).ok()?;
        let da = self.inherited(dict, b"DA").or_else(|| {
            let catalog = self.doc.get_dictionary(self.catalog_id().ok()?).ok()?;
            let acroform = self.get_resolved(catalog, b"AcroForm")?.as_dict().ok()?;
            self.get_resolved(acroform, b"DA")
        })?;
        let da = String::from_utf8_lossy(da.as_str().ok()?).into_owned();
        parse_da_font_size(&da).filter(|size| *size > 0.0)
    }

    /// Shared `Helvetica` font dictionary, added on first use.
    fn helvetica_font(&mut self) -> ObjectId {
        if let Some(id) = self.helvetica {
            return id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        self.helvetica = Some(id);
        id
    }

    /// Give the page a direct `/Resources` dictionary that includes the
    /// stamp font. Inherited resources are copied onto the page.
    fn install_stamp_font(&mut self, page_id: ObjectId) -> Result<String> {
        let helvetica = self.helvetica_font();

        let mut resources = self
            .inherited_page_attribute(page_id, b"Resources")
            .and_then(|obj| self.resolve_dict(obj))
            .cloned()
            .unwrap_or_default();
        let mut fonts = resources
            .get(b"Font")
            .ok()
            .and_then(|obj| self.resolve_dict(obj))
            .cloned()
            .unwrap_or_default();

        let mut key = STAMP_FONT_KEY.to_string();
        let mut suffix = 1;
        while let Ok(existing) = fonts.get(key.as_bytes()) {
            if matches!(existing, Object::Reference(id) if *id == helvetica) {
                break;
            }
            key = format!("{}{}", STAMP_FONT_KEY, suffix);
            suffix += 1;
        }

        fonts.set(key.as_bytes().to_vec(), helvetica);
        resources.set("Font", fonts);
        self.doc.get_dictionary_mut(page_id)?.set("Resources", resources);
        Ok(key)
    }
}

/// Font size operand of the `Tf` operator in a default appearance string
/// such as `/Helv 0 Tf 0 g`.
pub(crate) fn parse_da_font_size(da: &str) -> Option<f32> {
    let tokens: Vec<&str> = da.split_whitespace().collect();
    let tf = tokens.iter().position(|t| *t == "Tf")?;
    tokens.get(tf.checked_sub(1)?)?.parse().ok()
}
