//! The field record: the JSON document the extractor writes and the filler
//! and visualizers read back.
//!
//! ```text
//! DocumentRecord
//! ├── pdf_name, total_pages
//! ├── pages: [PageRecord]          (pages without fields are omitted)
//! │   └── fields: [FieldRecord]    (widget order on the page)
//! └── hierarchy: {parent: HierarchyNode}   (derived, never authoritative)
//! ```

use crate::error::Result;
use crate::fields::{FieldType, ROOT_PARENT};
use crate::geometry::Rect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One form field widget on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Fully qualified field name
    pub key: String,
    /// Everything before the last dot, or `root`
    pub parent: String,
    /// Everything after the last dot
    pub child: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Widget rectangle in page space, rounded to two decimals
    pub coordinates: Rect,
    /// Alternate field name (/TU)
    #[serde(default)]
    pub field_label: String,
    /// Current value (/V) as text
    #[serde(default)]
    pub field_value: String,
    /// Raw field flags (/Ff)
    #[serde(default)]
    pub field_flags: u32,
    /// Required bit of the flags
    #[serde(default)]
    pub is_required: bool,
    /// Read-only bit of the flags
    #[serde(default)]
    pub is_readonly: bool,
    /// Option labels of a choice field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Normal caption of a button field (/MK /CA)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_caption: Option<String>,
}

impl FieldRecord {
    /// Choice options, empty when none were recorded.
    pub fn choice_list(&self) -> &[String] {
        self.choices.as_deref().unwrap_or(&[])
    }
}

/// Page size in page-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
}

/// Fields found on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-indexed page number
    pub page_number: u32,
    /// Page size
    pub page_dimensions: PageDimensions,
    /// Fields in widget order
    pub fields: Vec<FieldRecord>,
}

impl PageRecord {
    /// Find a field on this page by exact key.
    pub fn field(&self, key: &str) -> Option<&FieldRecord> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Short reference to a field inside the hierarchy index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    /// Page the field is on
    pub page: u32,
    /// Field key
    pub key: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// One parent in the hierarchy index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Non-root parent names (only populated on the `root` node)
    pub children: Vec<String>,
    /// Fields whose parent is this node
    pub fields: Vec<HierarchyEntry>,
}

/// Parent name → node, in first-seen order.
pub type Hierarchy = IndexMap<String, HierarchyNode>;

/// Everything extracted from one PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// File name of the source PDF
    pub pdf_name: String,
    /// Total number of pages in the source PDF
    pub total_pages: u32,
    /// Pages that carry at least one field
    pub pages: Vec<PageRecord>,
    /// Derived parent → fields index
    #[serde(default)]
    pub hierarchy: Hierarchy,
}

impl DocumentRecord {
    /// Create a record from its pages, deriving the hierarchy index.
    ///
    /// Pages without fields are dropped.
    pub fn new(pdf_name: impl Into<String>, total_pages: u32, pages: Vec<PageRecord>) -> Self {
        let mut record = Self {
            pdf_name: pdf_name.into(),
            total_pages,
            pages: pages.into_iter().filter(|p| !p.fields.is_empty()).collect(),
            hierarchy: Hierarchy::new(),
        };
        record.rebuild_hierarchy();
        record
    }

    /// Regenerate the hierarchy index from the pages.
    pub fn rebuild_hierarchy(&mut self) {
        self.hierarchy = build_hierarchy(&self.pages);
    }

    /// Find the record for a page number.
    pub fn page(&self, page_number: u32) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Iterate over all fields with their page number.
    pub fn fields(&self) -> impl Iterator<Item = (u32, &FieldRecord)> {
        self.pages
            .iter()
            .flat_map(|p| p.fields.iter().map(move |f| (p.page_number, f)))
    }

    /// Total number of fields across all pages.
    pub fn total_fields(&self) -> usize {
        self.pages.iter().map(|p| p.fields.len()).sum()
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the record as indented JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read a record written by [`DocumentRecord::save_json`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Build the parent → fields index.
///
/// Every distinct parent gets a node listing its fields. Each non-root parent
/// is also listed once under the `root` node's `children`.
pub fn build_hierarchy(pages: &[PageRecord]) -> Hierarchy {
    let mut hierarchy = Hierarchy::new();

    for page in pages {
        for field in &page.fields {
            hierarchy
                .entry(field.parent.clone())
                .or_default()
                .fields
                .push(HierarchyEntry {
                    page: page.page_number,
                    key: field.key.clone(),
                    field_type: field.field_type,
                });

            if field.parent != ROOT_PARENT {
                let root = hierarchy.entry(ROOT_PARENT.to_string()).or_default();
                if !root.children.contains(&field.parent) {
                    root.children.push(field.parent.clone());
                }
            }
        }
    }

    hierarchy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::parse_field_hierarchy;

    fn field(key: &str, field_type: FieldType) -> FieldRecord {
        let (parent, child) = parse_field_hierarchy(key);
        FieldRecord {
            key: key.to_string(),
            parent,
            child,
            field_type,
            coordinates: Rect::new(10.0, 10.0, 110.0, 30.0),
            field_label: String::new(),
            field_value: String::new(),
            field_flags: 0,
            is_required: false,
            is_readonly: false,
            choices: None,
            button_caption: None,
        }
    }

    fn page(number: u32, fields: Vec<FieldRecord>) -> PageRecord {
        PageRecord {
            page_number: number,
            page_dimensions: PageDimensions {
                width: 612.0,
                height: 792.0,
            },
            fields,
        }
    }

    #[test]
    fn test_empty_pages_dropped() {
        let record = DocumentRecord::new(
            "form.pdf",
            3,
            vec![page(1, vec![field("Name", FieldType::Text)]), page(2, vec![])],
        );
        assert_eq!(record.pages.len(), 1);
        assert_eq!(record.total_pages, 3);
        assert!(record.page(2).is_none());
    }

    #[test]
    fn test_hierarchy_groups_by_parent() {
        let record = DocumentRecord::new(
            "form.pdf",
            2,
            vec![
                page(
                    1,
                    vec![
                        field("Buyer.Name", FieldType::Text),
                        field("Buyer.Agree", FieldType::Button),
                        field("Date", FieldType::Text),
                    ],
                ),
                page(2, vec![field("Seller.Name", FieldType::Text)]),
            ],
        );

        let keys: Vec<&str> = record.hierarchy.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Buyer", "root", "Seller"]);

        let buyer = &record.hierarchy["Buyer"];
        assert_eq!(buyer.fields.len(), 2);
        assert!(buyer.children.is_empty());

        let root = &record.hierarchy["root"];
        assert_eq!(root.children, vec!["Buyer".to_string(), "Seller".to_string()]);
        assert_eq!(root.fields.len(), 1);
        assert_eq!(root.fields[0].key, "Date");

        assert_eq!(record.hierarchy["Seller"].fields[0].page, 2);
    }

    #[test]
    fn test_type_extras_only_when_present() {
        let mut choice = field("State", FieldType::Choice);
        choice.choices = Some(vec!["TN".into(), "KY".into()]);
        let text = field("City", FieldType::Text);

        let choice_json = serde_json::to_value(&choice).unwrap();
        let text_json = serde_json::to_value(&text).unwrap();

        assert_eq!(choice_json["choices"][1], "KY");
        assert_eq!(choice_json["type"], "Choice");
        assert!(text_json.get("choices").is_none());
        assert!(text_json.get("button_caption").is_none());
        assert_eq!(text_json["coordinates"]["x1"], 110.0);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form_fields.json");
        let record = DocumentRecord::new(
            "form.pdf",
            1,
            vec![page(1, vec![field("Section1.Name", FieldType::Text)])],
        );
        record.save_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"pdf_name\": \"form.pdf\""));

        let loaded = DocumentRecord::load_json(&path).unwrap();
        assert_eq!(loaded, record);
    }
}
