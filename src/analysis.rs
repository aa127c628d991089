//! Field statistics and alternative exports of a [`DocumentRecord`].

use crate::error::Result;
use crate::fields::{FieldType, ROOT_PARENT};
use crate::geometry::Rect;
use crate::record::DocumentRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Summary statistics of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStats {
    /// Source PDF name
    pub pdf_name: String,
    /// Total pages in the PDF
    pub total_pages: u32,
    /// Pages with at least one field
    pub pages_with_fields: usize,
    /// Total fields
    pub total_fields: usize,
    /// Field count per type, sorted by type name
    pub type_counts: BTreeMap<String, usize>,
    /// `(page_number, field_count)` in page order
    pub fields_per_page: Vec<(u32, usize)>,
    /// Number of non-root parent sections
    pub root_sections: usize,
    /// `(parent, field_count)` for every non-root parent, in first-seen order
    pub sections: Vec<(String, usize)>,
}

impl FieldStats {
    /// Compute statistics for a record.
    pub fn from_record(record: &DocumentRecord) -> Self {
        let mut type_counts = BTreeMap::new();
        for (_, field) in record.fields() {
            *type_counts.entry(field.field_type.as_str().to_string()).or_insert(0) += 1;
        }

        let root_sections = record
            .hierarchy
            .get(ROOT_PARENT)
            .map(|root| root.children.len())
            .unwrap_or(0);

        let sections = record
            .hierarchy
            .iter()
            .filter(|(parent, _)| parent.as_str() != ROOT_PARENT)
            .map(|(parent, node)| (parent.clone(), node.fields.len()))
            .collect();

        Self {
            pdf_name: record.pdf_name.clone(),
            total_pages: record.total_pages,
            pages_with_fields: record.pages.len(),
            total_fields: record.total_fields(),
            type_counts,
            fields_per_page: record
                .pages
                .iter()
                .map(|p| (p.page_number, p.fields.len()))
                .collect(),
            root_sections,
            sections,
        }
    }
}

impl fmt::Display for FieldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PDF Name: {}", self.pdf_name)?;
        writeln!(f, "Total Pages: {}", self.total_pages)?;
        writeln!(f, "Pages with Fields: {}", self.pages_with_fields)?;
        writeln!(f, "Total Fields: {}", self.total_fields)?;
        writeln!(f)?;
        writeln!(f, "Field Types Distribution:")?;
        for (field_type, count) in &self.type_counts {
            writeln!(f, "  - {}: {}", field_type, count)?;
        }
        writeln!(f)?;
        writeln!(f, "Fields per Page:")?;
        for (page, count) in &self.fields_per_page {
            writeln!(f, "  Page {}: {} fields", page, count)?;
        }
        writeln!(f)?;
        writeln!(f, "Hierarchical Structure:")?;
        writeln!(f, "  Root level has {} parent sections", self.root_sections)?;
        for (parent, count) in &self.sections {
            writeln!(f, "  - {}: {} fields", parent, count)?;
        }
        Ok(())
    }
}

/// Field keys of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFieldNames {
    /// Page number
    pub page_number: u32,
    /// Keys in widget order
    pub field_keys: Vec<String>,
}

/// The `_field_names.json` export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNamesExport {
    /// Source PDF name
    pub pdf_name: String,
    /// Keys grouped by page
    pub fields_by_page: Vec<PageFieldNames>,
}

impl FieldNamesExport {
    /// Build from a record.
    pub fn from_record(record: &DocumentRecord) -> Self {
        Self {
            pdf_name: record.pdf_name.clone(),
            fields_by_page: record
                .pages
                .iter()
                .map(|p| PageFieldNames {
                    page_number: p.page_number,
                    field_keys: p.fields.iter().map(|f| f.key.clone()).collect(),
                })
                .collect(),
        }
    }
}

/// One field inside the `_hierarchical.json` export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureEntry {
    /// Page number
    pub page: u32,
    /// Field key
    pub key: String,
    /// Part after the last dot
    pub child: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Page-space rectangle
    pub coordinates: Rect,
}

/// The `_hierarchical.json` export: fields grouped by parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalExport {
    /// Source PDF name
    pub pdf_name: String,
    /// Parent → fields, in first-seen order
    pub structure: IndexMap<String, Vec<StructureEntry>>,
}

impl HierarchicalExport {
    /// Build from a record.
    pub fn from_record(record: &DocumentRecord) -> Self {
        let mut structure: IndexMap<String, Vec<StructureEntry>> = IndexMap::new();
        for (page, field) in record.fields() {
            structure.entry(field.parent.clone()).or_default().push(StructureEntry {
                page,
                key: field.key.clone(),
                child: field.child.clone(),
                field_type: field.field_type,
                coordinates: field.coordinates,
            });
        }
        Self {
            pdf_name: record.pdf_name.clone(),
            structure,
        }
    }
}

/// Write any serializable export as indented JSON.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
