//! Integration tests for page rendering and the field visualizers.
//!
//! Pixel checks stay away from label text so they hold whether or not a
//! system font is installed.

mod common;

use common::{form_fixture, PAGE1_WIDGETS};
use image::GenericImageView;
use pdf_formkit::config::{FillOptions, VisualizeOptions};
use pdf_formkit::extract::FieldExtractor;
use pdf_formkit::fill::FormFiller;
use pdf_formkit::geometry::Rect;
use pdf_formkit::pdf::FormDocument;
use pdf_formkit::render::{render_page, RenderOptions};
use pdf_formkit::visualize::{FieldVisualizer, DEFAULT_CROP_REGION, LIST_WIDTH, PANEL_WIDTH};
use pdf_formkit::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

fn rgb_at(path: &Path, x: u32, y: u32) -> [u8; 3] {
    let img = image::open(path).unwrap().to_rgb8();
    img.get_pixel(x, y).0
}

fn dimensions(path: &Path) -> (u32, u32) {
    image::open(path).unwrap().dimensions()
}

#[test]
fn test_render_page_draws_content() {
    let fixture = form_fixture();
    let doc = FormDocument::open(&fixture.pdf).unwrap();
    let pixmap = render_page(&doc, 1, &RenderOptions::default()).unwrap();

    assert_eq!((pixmap.width(), pixmap.height()), (612, 792));
    // Grey band at the top of the page, white below it
    let band = pixmap.pixel(300, 10).unwrap();
    assert!((200..=208).contains(&band.red()), "band red = {}", band.red());
    let blank = pixmap.pixel(300, 400).unwrap();
    assert_eq!((blank.red(), blank.green(), blank.blue()), (255, 255, 255));
}

#[test]
fn test_render_page_zoom() {
    let fixture = form_fixture();
    let doc = FormDocument::open(&fixture.pdf).unwrap();
    let pixmap = render_page(&doc, 2, &RenderOptions::with_zoom(1.5)).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (918, 1188));
}

#[test]
fn test_render_page_out_of_range() {
    let fixture = form_fixture();
    let doc = FormDocument::open(&fixture.pdf).unwrap();
    let err = render_page(&doc, 9, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, Error::PageOutOfRange { page: 9, total: 3 }));
}

#[test]
fn test_render_shows_checked_appearance() {
    let fixture = form_fixture();
    let record = FieldExtractor::extract(&fixture.pdf).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    FormFiller::open(&fixture.pdf, record)
        .unwrap()
        .with_options(FillOptions::new().with_checked_probability(1.0))
        .fill(fixture.path("checked.pdf"), &mut rng, None)
        .unwrap();

    // Agree widget: page-space (100,127)-(115,142), on-state fills (102..113, 129..140)
    let before = render_page(&FormDocument::open(&fixture.pdf).unwrap(), 1, &RenderOptions::default()).unwrap();
    let pixel = before.pixel(107, 134).unwrap();
    assert_eq!(pixel.red(), 255);

    let doc = FormDocument::open(fixture.path("checked.pdf")).unwrap();
    let after = render_page(&doc, 1, &RenderOptions::default()).unwrap();
    let pixel = after.pixel(107, 134).unwrap();
    assert!(pixel.red() < 50, "checkbox not drawn: {:?}", pixel);

    let plain = render_page(&doc, 1, &RenderOptions::default().without_annotations()).unwrap();
    assert_eq!(plain.pixel(107, 134).unwrap().red(), 255);
}

#[test]
fn test_highlight_fields() {
    let fixture = form_fixture();
    let report = FieldVisualizer::open(&fixture.pdf).unwrap().highlight_fields().unwrap();

    assert_eq!(report.output, fixture.path("form_page1_fields_highlighted.png"));
    assert_eq!(report.fields, PAGE1_WIDGETS);
    assert_eq!((report.width, report.height), (1224, 1584));
    assert_eq!(dimensions(&report.output), (1224, 1584));

    // Buyer.Name at zoom 2: (200,144)-(600,184), translucent blue over white
    let [r, g, b] = rgb_at(&report.output, 400, 170);
    assert_eq!(b, 255);
    assert!(r < 200 && g < 200, "expected blue tint, got {:?}", (r, g, b));
}

#[test]
fn test_highlight_simple() {
    let fixture = form_fixture();
    let report = FieldVisualizer::open(&fixture.pdf).unwrap().highlight_simple().unwrap();

    assert_eq!(report.output, fixture.path("form_page1_fields_only.png"));
    assert_eq!((report.width, report.height), (1530, 1980));

    // Property.State at zoom 2.5: (250,430)-(625,480), green family
    let [r, g, b] = rgb_at(&report.output, 440, 455);
    assert!(g > r && g > b, "expected green tint, got {:?}", (r, g, b));
}

#[test]
fn test_visualize_custom_zoom_and_output() {
    let fixture = form_fixture();
    let output = fixture.path("custom.png");
    let options = VisualizeOptions::new().with_page(2).with_zoom(1.0).with_output(&output);
    let report = FieldVisualizer::open(&fixture.pdf)
        .unwrap()
        .with_options(options)
        .highlight_simple()
        .unwrap();

    assert_eq!(report.output, output);
    assert_eq!(report.fields, 2);
    assert_eq!(dimensions(&output), (612, 792));
}

#[test]
fn test_comprehensive_view() {
    let fixture = form_fixture();
    let record = FieldExtractor::extract(&fixture.pdf).unwrap();
    let report = FieldVisualizer::open(&fixture.pdf).unwrap().comprehensive(&record).unwrap();

    assert_eq!(report.output, fixture.path("form_page1_comprehensive.png"));
    assert_eq!((report.width, report.height), (1224 + PANEL_WIDTH, 1584));
    // Panel header band
    assert_eq!(rgb_at(&report.output, 1224 + 790, 5), [41, 128, 185]);
}

#[test]
fn test_comprehensive_page_not_in_record() {
    let fixture = form_fixture();
    let record = FieldExtractor::extract(&fixture.pdf).unwrap();
    let err = FieldVisualizer::open(&fixture.pdf)
        .unwrap()
        .with_options(VisualizeOptions::new().with_page(3))
        .comprehensive(&record)
        .unwrap_err();
    assert!(matches!(err, Error::PageNotInRecord(3)));
}

#[test]
fn test_field_list_image() {
    let fixture = form_fixture();
    let record = FieldExtractor::extract(&fixture.pdf).unwrap();
    let output = fixture.path("list.png");
    let options = VisualizeOptions::new().with_output(&output);
    let report = FieldVisualizer::field_list_image(&record, &options).unwrap();

    assert_eq!(report.fields, PAGE1_WIDGETS);
    assert_eq!(dimensions(&output), (LIST_WIDTH, 80 + PAGE1_WIDGETS as u32 * 30 + 40));
}

#[test]
fn test_render_region_crop() {
    let fixture = form_fixture();
    let report = FieldVisualizer::open(&fixture.pdf)
        .unwrap()
        .render_region(DEFAULT_CROP_REGION)
        .unwrap();

    assert_eq!(report.output, fixture.path("form_page1_filled_crop.png"));
    assert_eq!(dimensions(&report.output), (200, 160));
}

#[test]
fn test_render_region_outside_page() {
    let fixture = form_fixture();
    let err = FieldVisualizer::open(&fixture.pdf)
        .unwrap()
        .render_region(Rect::new(700.0, 900.0, 800.0, 1000.0))
        .unwrap_err();
    assert!(matches!(err, Error::Render(_)));
}

#[test]
fn test_visualize_page_out_of_range() {
    let fixture = form_fixture();
    let err = FieldVisualizer::open(&fixture.pdf)
        .unwrap()
        .with_options(VisualizeOptions::new().with_page(4))
        .highlight_fields()
        .unwrap_err();
    assert!(matches!(err, Error::PageOutOfRange { .. }));
}
