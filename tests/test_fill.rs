//! Integration tests for form filling.
//!
//! Fills the fixture form with a seeded RNG and reads the output back through
//! the extractor and the widget reader.

mod common;

use common::{dangling_parent_document, damaged_form_document, form_fixture, PAGE1_WIDGETS, PAGE2_WIDGETS};
use pdf_formkit::config::FillOptions;
use pdf_formkit::extract::FieldExtractor;
use pdf_formkit::fill::{FakeData, FillAction, FillReport, FormFiller, FALLBACK_DATE};
use pdf_formkit::pdf::FormDocument;
use pdf_formkit::record::DocumentRecord;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Fixed values so assertions do not depend on the `fake` crate.
struct StaticFake;

impl FakeData for StaticFake {
    fn name(&self, _: &mut dyn RngCore) -> String {
        "Jane Roe".to_string()
    }
    fn zip_code(&self, _: &mut dyn RngCore) -> String {
        "37201".to_string()
    }
    fn city(&self, _: &mut dyn RngCore) -> String {
        "Nashville".to_string()
    }
    fn state(&self, _: &mut dyn RngCore) -> String {
        "Tennessee".to_string()
    }
    fn address(&self, _: &mut dyn RngCore) -> String {
        "1 Main St\nSuite 2".to_string()
    }
    fn phone_number(&self, _: &mut dyn RngCore) -> String {
        "555-0100".to_string()
    }
    fn email(&self, _: &mut dyn RngCore) -> String {
        "jane@example.com".to_string()
    }
    fn company(&self, _: &mut dyn RngCore) -> String {
        "Roe Realty".to_string()
    }
    fn sentence(&self, _: &mut dyn RngCore, _words: usize) -> String {
        "lorem ipsum dolor".to_string()
    }
}

fn fill(fixture: &common::Fixture, output: &str, seed: u64, fake: Option<&dyn FakeData>) -> FillReport {
    let record = FieldExtractor::extract(&fixture.pdf).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    FormFiller::open(&fixture.pdf, record)
        .unwrap()
        .fill(fixture.path(output), &mut rng, fake)
        .unwrap()
}

#[test]
fn test_fill_every_widget() {
    let fixture = form_fixture();
    let report = fill(&fixture, "out.pdf", 7, Some(&StaticFake));

    assert_eq!(report.filled, PAGE1_WIDGETS + PAGE2_WIDGETS);
    assert!(report.failures.is_empty());
    // Page 3 has no record entry
    assert_eq!(report.skipped_pages, vec![3]);
    assert!(fixture.path("out.pdf").exists());
}

#[test]
fn test_fill_writes_values() {
    let fixture = form_fixture();
    fill(&fixture, "out.pdf", 7, Some(&StaticFake));

    let filled = FieldExtractor::extract(fixture.path("out.pdf")).unwrap();
    let page1 = filled.page(1).unwrap();
    assert_eq!(page1.field("Buyer.Name").unwrap().field_value, "Jane Roe");
    assert!(["A", "B", "C"].contains(&page1.field("Property.State").unwrap().field_value.as_str()));
    assert!(["Yes", "Off"].contains(&page1.field("Agree").unwrap().field_value.as_str()));

    let date = &filled.page(2).unwrap().field("Closing.Date").unwrap().field_value;
    assert_eq!(date.len(), 10);
    assert_eq!(&date[2..3], "/");
}

#[test]
fn test_fill_marks_small_text_field() {
    let fixture = form_fixture();
    let report = fill(&fixture, "out.pdf", 1, None);

    let initial = report.fields.iter().find(|f| f.key == "Initial").unwrap();
    // Rect (400,127)-(415,142): x0 + w/2 - 3, y1 - 2
    assert_eq!(initial.action, FillAction::Mark { x: 404.5, y: 140.0 });
    assert_eq!(report.marks(), 1);

    let doc = FormDocument::open(fixture.path("out.pdf")).unwrap();
    let widget = doc
        .page_widgets_lossy(1)
        .unwrap()
        .into_iter()
        .find(|w| w.name == "Initial")
        .unwrap();
    assert_eq!(widget.value, "X");

    // The stamp is appended to the page content
    let page_id = doc.page_id(1).unwrap();
    let content = doc.inner().get_page_content(page_id).unwrap();
    let text = String::from_utf8_lossy(&content);
    assert!(text.contains("(X) Tj"));
}

#[test]
fn test_fill_without_fake_data_uses_placeholders() {
    let fixture = form_fixture();
    fill(&fixture, "out.pdf", 3, None);

    let filled = FieldExtractor::extract(fixture.path("out.pdf")).unwrap();
    assert_eq!(filled.page(1).unwrap().field("Buyer.Name").unwrap().field_value, "Dummy Name");
    assert_eq!(filled.page(2).unwrap().field("Closing.Date").unwrap().field_value, FALLBACK_DATE);
}

#[test]
fn test_fill_unnamed_widget_uses_unknown_key() {
    let fixture = form_fixture();
    let report = fill(&fixture, "out.pdf", 3, None);
    // The record knows the placeholder key, so the widget is found by it
    assert!(report.fields.iter().any(|f| f.key.starts_with("unnamed_field_")));
}

#[test]
fn test_fill_same_keys_twice() {
    let fixture = form_fixture();
    let first = fill(&fixture, "one.pdf", 1, Some(&StaticFake));
    let second = fill(&fixture, "two.pdf", 99, Some(&StaticFake));
    assert_eq!(first.filled_keys(), second.filled_keys());
}

#[test]
fn test_fill_is_deterministic_for_a_seed() {
    let fixture = form_fixture();
    fill(&fixture, "one.pdf", 5, Some(&StaticFake));
    fill(&fixture, "two.pdf", 5, Some(&StaticFake));

    let one = FieldExtractor::extract(fixture.path("one.pdf")).unwrap();
    let two = FieldExtractor::extract(fixture.path("two.pdf")).unwrap();
    assert_eq!(one.pages, two.pages);
}

#[test]
fn test_fill_leaves_input_untouched() {
    let fixture = form_fixture();
    let before = std::fs::read(&fixture.pdf).unwrap();
    fill(&fixture, "out.pdf", 2, None);
    assert_eq!(std::fs::read(&fixture.pdf).unwrap(), before);
}

#[test]
fn test_fill_all_checked() {
    let fixture = form_fixture();
    let record = FieldExtractor::extract(&fixture.pdf).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    FormFiller::open(&fixture.pdf, record)
        .unwrap()
        .with_options(FillOptions::new().with_checked_probability(1.0))
        .fill(fixture.path("out.pdf"), &mut rng, None)
        .unwrap();

    let doc = FormDocument::open(fixture.path("out.pdf")).unwrap();
    let agree = doc
        .page_widgets_lossy(1)
        .unwrap()
        .into_iter()
        .find(|w| w.name == "Agree")
        .unwrap();
    assert_eq!(agree.value, "Yes");
    let dict = doc.inner().get_dictionary(agree.id).unwrap();
    assert_eq!(dict.get(b"AS").unwrap().as_name().unwrap(), b"Yes");
}

#[test]
fn test_fill_sets_need_appearances() {
    let fixture = form_fixture();
    fill(&fixture, "out.pdf", 2, None);

    let doc = FormDocument::open(fixture.path("out.pdf")).unwrap();
    let catalog = doc.inner().catalog().unwrap();
    let acroform_id = catalog.get(b"AcroForm").unwrap().as_reference().unwrap();
    let acroform = doc.inner().get_dictionary(acroform_id).unwrap();
    assert!(acroform.get(b"NeedAppearances").unwrap().as_bool().unwrap());
}

#[test]
fn test_fill_from_json_record() {
    let fixture = form_fixture();
    let json = fixture.path("form_fields.json");
    FieldExtractor::extract_to_json(&fixture.pdf, &json).unwrap();

    let mut rng = StdRng::seed_from_u64(4);
    let report = FormFiller::from_paths(&fixture.pdf, &json)
        .unwrap()
        .fill(fixture.path("out.pdf"), &mut rng, None)
        .unwrap();
    assert_eq!(report.filled, PAGE1_WIDGETS + PAGE2_WIDGETS);
}

#[test]
fn test_fill_with_partial_record_skips_pages() {
    let fixture = form_fixture();
    let mut record = FieldExtractor::extract(&fixture.pdf).unwrap();
    record.pages.retain(|p| p.page_number == 2);
    let record = DocumentRecord::new(record.pdf_name, record.total_pages, record.pages);

    let mut rng = StdRng::seed_from_u64(4);
    let report = FormFiller::open(&fixture.pdf, record)
        .unwrap()
        .fill(fixture.path("out.pdf"), &mut rng, None)
        .unwrap();
    assert_eq!(report.filled, PAGE2_WIDGETS);
    assert_eq!(report.skipped_pages, vec![1, 3]);
}

fn fill_document(mut doc: lopdf::Document) -> (tempfile::TempDir, FillReport) {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("input.pdf");
    doc.save(&pdf).unwrap();

    let record = FieldExtractor::extract(&pdf).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let report = FormFiller::open(&pdf, record)
        .unwrap()
        .fill(dir.path().join("out.pdf"), &mut rng, None)
        .unwrap();
    (dir, report)
}

fn value_of(path: &std::path::Path, name: &str) -> String {
    let doc = FormDocument::open(path).unwrap();
    doc.page_widgets_lossy(1)
        .unwrap()
        .into_iter()
        .find(|w| w.name == name)
        .map(|w| w.value)
        .unwrap()
}

#[test]
fn test_fill_skips_undecodable_widgets() {
    let (dir, report) = fill_document(damaged_form_document());

    assert_eq!(report.filled, 1);
    assert_eq!(report.filled_keys(), vec!["Name"]);
    assert!(report.failures.is_empty());
    assert_eq!(value_of(&dir.path().join("out.pdf"), "Name"), "Dummy Name");
}

#[test]
fn test_fill_continues_after_field_failure() {
    let (dir, report) = fill_document(dangling_parent_document());

    // The unnamed widget's value lives in a missing parent object
    assert_eq!(report.filled, 1);
    assert_eq!(report.filled_keys(), vec!["Name"]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].0.starts_with("unnamed_field_"));

    let output = dir.path().join("out.pdf");
    assert!(output.exists());
    assert_eq!(value_of(&output, "Name"), "Dummy Name");
}
