//! PDF document access for form work.
//!
//! [`FormDocument`] wraps a `lopdf` document and exposes what the form tools
//! need: pages with their page boxes, widget annotations with inherited field
//! attributes, and the handful of mutations the filler performs.
//!
//! See ISO 32000-1:2008, Section 12.7 - Interactive Forms.

mod appearance;
mod text;
mod widget;
mod writer;

pub use appearance::AppearanceBuilder;
pub use text::{decode_text_string, encode_text_string};
pub use widget::{Widget, WidgetRead};

use crate::error::{Error, Result};
use crate::geometry::PageBox;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Guard against cyclic `/Parent` chains.
const MAX_PARENT_DEPTH: usize = 32;

/// An open PDF document.
pub struct FormDocument {
    doc: Document,
    path: PathBuf,
    pages: BTreeMap<u32, ObjectId>,
    /// Shared Helvetica font object, created on first write
    helvetica: Option<ObjectId>,
    /// Pages whose original content has been wrapped in `q`/`Q`
    wrapped_pages: HashSet<ObjectId>,
}

impl FormDocument {
    /// Open a PDF from disk.
    ///
    /// A missing file, an unparseable file and an encrypted file all map to
    /// [`Error::DocumentOpen`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::document_open(path, "file not found"));
        }

        let doc = Document::load(path).map_err(|e| Error::document_open(path, e.to_string()))?;
        if doc.is_encrypted() {
            return Err(Error::document_open(path, "document is encrypted"));
        }

        let mut form = Self::from_document(doc);
        form.path = path.to_path_buf();
        log::debug!("Opened {} ({} pages)", path.display(), form.page_count());
        Ok(form)
    }

    /// Wrap a document that is already in memory.
    ///
    /// [`FormDocument::path`] is empty until the document comes from disk.
    pub fn from_document(doc: Document) -> Self {
        let pages = doc.get_pages();
        Self {
            doc,
            path: PathBuf::new(),
            pages,
            helvetica: None,
            wrapped_pages: HashSet::new(),
        }
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the document, as stored in the field record.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// 1-indexed page numbers in document order.
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// Object id of a 1-indexed page.
    pub fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        self.pages
            .get(&page_number)
            .copied()
            .ok_or(Error::PageOutOfRange {
                page: page_number,
                total: self.page_count(),
            })
    }

    /// The visible page box: `/CropBox` if present, else `/MediaBox`, both
    /// inherited through the page tree. Falls back to US Letter.
    pub fn page_box(&self, page_number: u32) -> Result<PageBox> {
        let page_id = self.page_id(page_number)?;
        let boxed = self
            .inherited_page_attribute(page_id, b"CropBox")
            .or_else(|| self.inherited_page_attribute(page_id, b"MediaBox"))
            .and_then(|obj| self.rect_array(obj));

        Ok(match boxed {
            Some([x0, y0, x1, y1]) => PageBox::new(x0, y0, x1, y1),
            None => {
                log::debug!("Page {} has no usable page box, using Letter", page_number);
                PageBox::LETTER
            },
        })
    }

    /// Borrow the underlying `lopdf` document.
    pub fn inner(&self) -> &Document {
        &self.doc
    }

    /// Save the (possibly modified) document to a new path.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.doc.save(path.as_ref())?;
        Ok(())
    }

    /// Follow indirect references until a direct object is reached.
    pub(crate) fn resolve<'a>(&'a self, mut obj: &'a Object) -> Option<&'a Object> {
        for _ in 0..MAX_PARENT_DEPTH {
            match obj {
                Object::Reference(id) => obj = self.doc.get_object(*id).ok()?,
                _ => return Some(obj),
            }
        }
        None
    }

    /// Resolve an object to a dictionary, if it is one.
    pub(crate) fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve(obj)?.as_dict().ok()
    }

    /// Look up `key` in a dictionary and resolve the value.
    pub(crate) fn get_resolved<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        self.resolve(dict.get(key).ok()?)
    }

    /// Read a four-number array such as `/Rect` or `/MediaBox`.
    pub(crate) fn rect_array(&self, obj: &Object) -> Option<[f64; 4]> {
        let arr = self.resolve(obj)?.as_array().ok()?;
        if arr.len() < 4 {
            return None;
        }
        let mut out = [0.0; 4];
        for (slot, item) in out.iter_mut().zip(arr.iter()) {
            *slot = self.resolve(item).and_then(obj_to_f64)?;
        }
        Some(out)
    }

    /// Find `key` on a page dictionary or its `/Parent` page-tree nodes.
    pub(crate) fn inherited_page_attribute(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut dict = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Ok(obj) = dict.get(key) {
                return Some(obj);
            }
            dict = self.resolve_dict(dict.get(b"Parent").ok()?)?;
        }
        None
    }

    /// Object id of the document catalog.
    pub(crate) fn catalog_id(&self) -> Result<ObjectId> {
        Ok(self.doc.trailer.get(b"Root")?.as_reference()?)
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn obj_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Lossy string form of a PDF name.
pub(crate) fn name_to_string(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}
