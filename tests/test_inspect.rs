//! Integration tests for checkbox inspection and fill verification.

mod common;

use common::form_fixture;
use pdf_formkit::extract::FieldExtractor;
use pdf_formkit::fill::FormFiller;
use pdf_formkit::inspect::{inspect_widgets, verify_fields, FillStatus, DEFAULT_INSPECT_LIMIT};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_inspect_flags_small_widgets() {
    let fixture = form_fixture();
    let widgets = inspect_widgets(&fixture.pdf, DEFAULT_INSPECT_LIMIT).unwrap();

    // Five on page 1, two on page 2
    assert_eq!(widgets.len(), 7);
    let flagged: Vec<&str> = widgets
        .iter()
        .filter(|w| w.checkbox.is_some())
        .map(|w| w.name.as_str())
        .collect();
    assert_eq!(flagged, vec!["Agree", "Initial"]);

    let agree = widgets.iter().find(|w| w.name == "Agree").unwrap();
    let details = agree.checkbox.as_ref().unwrap();
    assert_eq!(details.value, "Off");
    assert_eq!(details.on_state.as_deref(), Some("Yes"));
    assert_eq!(agree.type_code, 1);
    assert!(agree.to_string().contains("Potential Checkbox"));
}

#[test]
fn test_inspect_respects_limit() {
    let fixture = form_fixture();
    let widgets = inspect_widgets(&fixture.pdf, 3).unwrap();
    assert_eq!(widgets.len(), 3);
    assert!(widgets.iter().all(|w| w.page == 1));

    assert!(inspect_widgets(&fixture.pdf, 0).unwrap().is_empty());
}

#[test]
fn test_verify_before_and_after_fill() {
    let fixture = form_fixture();
    let targets = vec!["Initial".to_string()];

    let before = verify_fields(&fixture.pdf, &targets).unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].status(), FillStatus::Empty);

    let record = FieldExtractor::extract(&fixture.pdf).unwrap();
    let filled = fixture.path("filled.pdf");
    let mut rng = StdRng::seed_from_u64(8);
    FormFiller::open(&fixture.pdf, record)
        .unwrap()
        .fill(&filled, &mut rng, None)
        .unwrap();

    let after = verify_fields(&filled, &targets).unwrap();
    assert_eq!(after[0].value, "X");
    assert_eq!(after[0].status(), FillStatus::Filled);
    assert!(after[0].to_string().contains("[FILLED]"));
}

#[test]
fn test_verify_without_targets_checks_small_widgets() {
    let fixture = form_fixture();
    let found = verify_fields(&fixture.pdf, &[]).unwrap();
    let names: Vec<&str> = found.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Agree", "Initial"]);
}

#[test]
fn test_verify_unknown_target() {
    let fixture = form_fixture();
    let found = verify_fields(&fixture.pdf, &["Nope".to_string()]).unwrap();
    assert!(found.is_empty());
}
