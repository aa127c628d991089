//! Fixture PDFs built with lopdf.
//!
//! Page 1 (Letter) carries a mix of widgets:
//!
//! | name               | type | /Rect (user space)   | notes                          |
//! |--------------------|------|----------------------|--------------------------------|
//! | `Buyer.Name`       | Tx   | 100 700 300 720      | kid of `Buyer`, required, /TU  |
//! | `Agree`            | Btn  | 100 650 115 665      | /AP /N with `Yes` and `Off`    |
//! | `Property.State`   | Ch   | 100 600 250 620      | /Opt [A B C], combo            |
//! | `Initial`          | Tx   | 400 650 415 665      | 15x15 checkbox-shaped text     |
//! | (unnamed)          | Tx   | 100 550 300 570      | no /T anywhere                 |
//!
//! Page 2 has `Closing.Date` (Tx) and `Signature` (Sig). Page 3 has no
//! widgets.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Number of widgets on page 1 of [`form_document`].
pub const PAGE1_WIDGETS: usize = 5;

/// Number of widgets on page 2 of [`form_document`].
pub const PAGE2_WIDGETS: usize = 2;

/// A fixture PDF inside its own temporary directory.
pub struct Fixture {
    pub dir: TempDir,
    pub pdf: PathBuf,
}

impl Fixture {
    /// Path of a sibling file in the fixture directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Write [`form_document`] as `form.pdf` in a fresh temp directory.
pub fn form_fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("form.pdf");
    write_form(&pdf);
    Fixture { dir, pdf }
}

/// Save [`form_document`] to `path`.
pub fn write_form(path: &Path) {
    form_document().save(path).unwrap();
}

/// Save a one-page PDF without any form to `path`.
pub fn write_blank(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content = page_content(&mut doc);
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content,
    });
    finish(&mut doc, pages_id, vec![page_id], None);
    doc.save(path).unwrap();
}

/// The three-page fixture form.
pub fn form_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let helv = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let page1 = doc.new_object_id();
    let page2 = doc.new_object_id();
    let page3 = doc.new_object_id();

    // Buyer.Name: terminal field merged with its widget, under a parent field
    let buyer = doc.new_object_id();
    let name = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Parent" => buyer,
        "T" => Object::string_literal("Name"),
        "TU" => Object::string_literal("Buyer full name"),
        "Rect" => rect(100, 700, 300, 720),
        "Ff" => 2,
        "P" => page1,
    });
    doc.objects.insert(
        buyer,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("Buyer"),
            "FT" => "Tx",
            "Kids" => vec![Object::Reference(name)],
        }),
    );

    let on = doc.add_object(Stream::new(dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => rect(0, 0, 15, 15),
    }, b"0 g 2 2 11 11 re f".to_vec()));
    let off = doc.add_object(Stream::new(dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => rect(0, 0, 15, 15),
    }, Vec::new()));
    let agree = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Btn",
        "T" => Object::string_literal("Agree"),
        "Rect" => rect(100, 650, 115, 665),
        "V" => "Off",
        "AS" => "Off",
        "AP" => dictionary! { "N" => dictionary! { "Yes" => on, "Off" => off } },
        "MK" => dictionary! { "CA" => Object::string_literal("4") },
        "P" => page1,
    });

    let property = doc.new_object_id();
    let state = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Parent" => property,
        "FT" => "Ch",
        "T" => Object::string_literal("State"),
        "Ff" => 1 << 17,
        "Opt" => vec![
            Object::string_literal("A"),
            Object::string_literal("B"),
            Object::string_literal("C"),
        ],
        "Rect" => rect(100, 600, 250, 620),
        "P" => page1,
    });
    doc.objects.insert(
        property,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("Property"),
            "Kids" => vec![Object::Reference(state)],
        }),
    );

    let initial = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("Initial"),
        "Rect" => rect(400, 650, 415, 665),
        "P" => page1,
    });

    let unnamed = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "Rect" => rect(100, 550, 300, 570),
        "P" => page1,
    });

    let closing = doc.new_object_id();
    let date = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Parent" => closing,
        "FT" => "Tx",
        "T" => Object::string_literal("Date"),
        "Rect" => rect(100, 700, 200, 720),
        "P" => page2,
    });
    doc.objects.insert(
        closing,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("Closing"),
            "Kids" => vec![Object::Reference(date)],
        }),
    );
    let signature = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Sig",
        "T" => Object::string_literal("Signature"),
        "Rect" => rect(100, 100, 300, 140),
        "P" => page2,
    });

    // A non-widget annotation must be ignored
    let note = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Text",
        "Rect" => rect(500, 700, 520, 720),
    });

    let content1 = page_content(&mut doc);
    doc.objects.insert(
        page1,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content1,
            "Annots" => refs(&[name, agree, state, initial, unnamed, note]),
        }),
    );
    let content2 = page_content(&mut doc);
    doc.objects.insert(
        page2,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content2,
            "Annots" => refs(&[date, signature]),
        }),
    );
    let content3 = page_content(&mut doc);
    doc.objects.insert(
        page3,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content3,
        }),
    );

    let acroform = doc.add_object(dictionary! {
        "Fields" => refs(&[buyer, agree, property, initial, unnamed, closing, signature]),
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
        "DR" => dictionary! { "Font" => dictionary! { "Helv" => helv } },
    });
    finish(&mut doc, pages_id, vec![page1, page2, page3], Some(acroform));
    doc
}

/// One page with a good `Name` text widget, a widget without `/Rect` and a
/// widget dictionary written inline in `/Annots`.
pub fn damaged_form_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page = doc.new_object_id();

    let name = doc.add_object(text_widget("Name", rect(100, 700, 300, 720), page));
    let broken = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("Broken"),
        "P" => page,
    });
    let inline = text_widget("Inline", rect(100, 600, 300, 620), page);

    let content = page_content(&mut doc);
    doc.objects.insert(
        page,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content,
            "Annots" => vec![
                Object::Reference(name),
                Object::Reference(broken),
                Object::Dictionary(inline),
            ],
        }),
    );
    let acroform = doc.add_object(dictionary! {
        "Fields" => refs(&[name, broken]),
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
    });
    finish(&mut doc, pages_id, vec![page], Some(acroform));
    doc
}

/// One page with a good `Name` text widget and an unnamed widget whose
/// `/Parent` points at an object that does not exist, so its value cannot
/// be written.
pub fn dangling_parent_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page = doc.new_object_id();

    let name = doc.add_object(text_widget("Name", rect(100, 700, 300, 720), page));
    let orphan = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "Parent" => Object::Reference((999, 0)),
        "Rect" => rect(100, 600, 300, 620),
        "P" => page,
    });

    let content = page_content(&mut doc);
    doc.objects.insert(
        page,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content,
            "Annots" => refs(&[name, orphan]),
        }),
    );
    let acroform = doc.add_object(dictionary! {
        "Fields" => refs(&[name, orphan]),
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
    });
    finish(&mut doc, pages_id, vec![page], Some(acroform));
    doc
}

/// Save a one-page PDF to `path` whose only content is an RGB image that
/// declares 200000x200000 pixels but carries three bytes of data.
pub fn write_oversized_image(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let image = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 200_000,
            "Height" => 200_000,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceRGB",
        },
        vec![1, 2, 3],
    ));
    let content = doc.add_object(Stream::new(
        dictionary! {},
        b"q 200 0 0 200 100 400 cm /Im1 Do Q\n".to_vec(),
    ));
    let page = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content,
        "Resources" => dictionary! { "XObject" => dictionary! { "Im1" => image } },
    });
    finish(&mut doc, pages_id, vec![page], None);
    doc.save(path).unwrap();
}

fn text_widget(name: &str, rect: Object, page: ObjectId) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal(name),
        "Rect" => rect,
        "P" => page,
    }
}

fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> Object {
    Object::Array(vec![x0.into(), y0.into(), x1.into(), y1.into()])
}

fn refs(ids: &[ObjectId]) -> Object {
    Object::Array(ids.iter().map(|id| Object::Reference(*id)).collect())
}

/// A grey band across the top of the page and a black frame.
fn page_content(doc: &mut Document) -> ObjectId {
    let ops = b"0.8 g 0 742 612 50 re f\n0 G 2 w 20 20 572 752 re S\n".to_vec();
    doc.add_object(Stream::new(dictionary! {}, ops))
}

fn finish(doc: &mut Document, pages_id: ObjectId, kids: Vec<ObjectId>, acroform: Option<ObjectId>) {
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count,
            "MediaBox" => rect(0, 0, 612, 792),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(acroform) = acroform {
        catalog.set("AcroForm", acroform);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);
}
