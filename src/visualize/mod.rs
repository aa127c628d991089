//! Diagnostic images of form fields.
//!
//! Every view rasterizes a page (or, for the field list, only the record),
//! draws field rectangles colored by [`FieldType`](crate::fields::FieldType)
//! and writes exactly one PNG. Source files are never modified.
//!
//! | View | Zoom | Default output |
//! |------|------|----------------|
//! | [`FieldVisualizer::highlight_fields`] | 2.0 | `<stem>_page<N>_fields_highlighted.png` |
//! | [`FieldVisualizer::field_list_image`] | - | `<stem>_page<N>_field_list.png` |
//! | [`FieldVisualizer::comprehensive`] | 2.0 | `<stem>_page<N>_comprehensive.png` |
//! | [`FieldVisualizer::highlight_simple`] | 2.5 | `<stem>_page<N>_fields_only.png` |
//! | [`FieldVisualizer::render_region`] | 2.0 | `<stem>_page<N>_filled_crop.png` |

pub mod palette;
mod panel;

pub use panel::{panel_capacity, LIST_WIDTH, PANEL_WIDTH};

use crate::config::{ArtifactNames, VisualizeOptions};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::pdf::{FormDocument, Widget};
use crate::record::DocumentRecord;
use crate::render::{render_page, Canvas, RenderOptions, Rgba};
use palette::{BoxColors, HIGHLIGHT_LEGEND, SIMPLE_LEGEND};
use std::path::{Path, PathBuf};

/// Zoom of the overlay view.
pub const HIGHLIGHT_ZOOM: f32 = 2.0;
/// Zoom of the comprehensive view.
pub const COMPREHENSIVE_ZOOM: f32 = 2.0;
/// Zoom of the simple highlight.
pub const SIMPLE_ZOOM: f32 = 2.5;
/// Zoom of region crops.
pub const CROP_ZOOM: f32 = 2.0;

/// Region cropped by [`FieldVisualizer::render_region`] when none is given,
/// in page space.
pub const DEFAULT_CROP_REGION: Rect = Rect {
    x0: 50.0,
    y0: 480.0,
    x1: 150.0,
    y1: 560.0,
};

/// Body text size in pixels.
pub(crate) const TEXT_SIZE: f32 = 12.0;
/// Header text size in pixels.
pub(crate) const TITLE_SIZE: f32 = 16.0;

/// What a visualization wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationReport {
    /// PNG that was written
    pub output: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Fields drawn
    pub fields: usize,
}

impl VisualizationReport {
    fn saved(canvas: &Canvas, output: PathBuf, fields: usize) -> Result<Self> {
        canvas.save_png(&output)?;
        log::info!(
            "Visualization saved to {} ({} x {} pixels)",
            output.display(),
            canvas.width(),
            canvas.height()
        );
        Ok(Self {
            output,
            width: canvas.width(),
            height: canvas.height(),
            fields,
        })
    }
}

/// Draws field overlays for one PDF.
pub struct FieldVisualizer {
    doc: FormDocument,
    options: VisualizeOptions,
}

impl FieldVisualizer {
    /// Wrap an open document.
    pub fn new(doc: FormDocument) -> Self {
        Self {
            doc,
            options: VisualizeOptions::default(),
        }
    }

    /// Open a PDF for visualization.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(FormDocument::open(path)?))
    }

    /// Replace the options (page, zoom, output override).
    pub fn with_options(mut self, options: VisualizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in use.
    pub fn options(&self) -> &VisualizeOptions {
        &self.options
    }

    /// The document being visualized.
    pub fn document(&self) -> &FormDocument {
        &self.doc
    }

    fn names(&self) -> ArtifactNames {
        ArtifactNames::for_input(self.doc.path())
    }

    fn render(&self, zoom: f32) -> Result<Canvas> {
        let pixmap = render_page(&self.doc, self.options.page_number, &RenderOptions::with_zoom(zoom))?;
        Ok(Canvas::from_pixmap(pixmap))
    }

    fn widgets(&self) -> Result<Vec<Widget>> {
        self.doc.page_widgets_lossy(self.options.page_number)
    }

    /// Translucent box per field with a number tab, plus a legend in the
    /// top-left corner.
    pub fn highlight_fields(&self) -> Result<VisualizationReport> {
        let page = self.options.page_number;
        let zoom = self.options.zoom_or(HIGHLIGHT_ZOOM);
        let widgets = self.widgets()?;
        log::info!("Visualizing {} fields on page {}", widgets.len(), page);

        let mut canvas = self.render(zoom)?;
        for (idx, widget) in widgets.iter().enumerate() {
            let rect = pixel_rect(&widget.rect, zoom);
            draw_field_box(&mut canvas, &rect, palette::highlight(widget.field_type()), 3.0);

            let (x0, y0) = (rect.x0 as f32, rect.y0 as f32);
            canvas.fill_rect(x0, y0 - 25.0, x0 + 30.0, y0, Rgba(255, 255, 255, 200));
            canvas.draw_text(x0 + 5.0, y0 - 20.0, &(idx + 1).to_string(), TEXT_SIZE, Rgba::BLACK);
        }

        let (x, y) = (20.0, 20.0);
        canvas.fill_rect(x, y, x + 200.0, y + 150.0, Rgba(255, 255, 255, 230));
        canvas.stroke_rect(x, y, x + 200.0, y + 150.0, Rgba::BLACK, 2.0);
        canvas.draw_text(x + 10.0, y + 10.0, "Field Types:", TEXT_SIZE, Rgba::BLACK);
        let mut offset = 35.0;
        for (label, color) in HIGHLIGHT_LEGEND {
            legend_swatch(&mut canvas, x + 10.0, y + offset, 15.0, 15.0, color);
            canvas.draw_text(x + 30.0, y + offset, label, TEXT_SIZE, Rgba::BLACK);
            offset += 22.0;
        }

        let output = self.options.output_or(self.names().highlighted_png(page));
        VisualizationReport::saved(&canvas, output, widgets.len())
    }

    /// Standalone list of a page's fields, drawn from the record alone.
    ///
    /// The default output is named after the record's `pdf_name`, in the
    /// current directory.
    pub fn field_list_image(record: &DocumentRecord, options: &VisualizeOptions) -> Result<VisualizationReport> {
        let page_number = options.page_number;
        let page = record.page(page_number).ok_or(Error::PageNotInRecord(page_number))?;
        let canvas = panel::field_list(page)?;

        let output = options.output_or(ArtifactNames::for_input(&record.pdf_name).field_list_png(page_number));
        VisualizationReport::saved(&canvas, output, page.fields.len())
    }

    /// Numbered page overlay with an information panel on the right.
    ///
    /// Fails with [`Error::PageNotInRecord`] when the record has no entry for
    /// the page.
    pub fn comprehensive(&self, record: &DocumentRecord) -> Result<VisualizationReport> {
        let page_number = self.options.page_number;
        let page = record.page(page_number).ok_or(Error::PageNotInRecord(page_number))?;
        let zoom = self.options.zoom_or(COMPREHENSIVE_ZOOM);
        let widgets = self.widgets()?;

        let mut page_canvas = self.render(zoom)?;
        for (idx, widget) in widgets.iter().enumerate() {
            let rect = pixel_rect(&widget.rect, zoom);
            draw_field_box(&mut page_canvas, &rect, palette::comprehensive(widget.field_type()), 4.0);

            let (cx, cy) = (rect.x0 as f32 + 5.0, rect.y0 as f32 - 25.0);
            page_canvas.fill_circle(cx, cy, 18.0, Rgba::WHITE);
            page_canvas.stroke_circle(cx, cy, 18.0, Rgba::BLACK, 2.0);
            centered_number(&mut page_canvas, cx, cy, idx + 1, Rgba::BLACK);
        }

        let height = page_canvas.height();
        let side = panel::side_panel(page, height, widgets.len(), &self.doc.file_name())?;

        let mut combined = Canvas::new(page_canvas.width() + PANEL_WIDTH, height, Rgba::WHITE)?;
        combined.draw_pixmap(page_canvas.pixmap(), 0, 0);
        combined.draw_pixmap(side.pixmap(), page_canvas.width() as i32, 0);

        let listed = page.fields.len().min(panel_capacity(height));
        if listed < page.fields.len() {
            log::warn!("Panel lists {} of {} fields on page {}", listed, page.fields.len(), page_number);
        }
        let output = self.options.output_or(self.names().comprehensive_png(page_number));
        VisualizationReport::saved(&combined, output, widgets.len())
    }

    /// Just the page with translucent field boxes and a small legend at the
    /// bottom-left.
    pub fn highlight_simple(&self) -> Result<VisualizationReport> {
        let page = self.options.page_number;
        let zoom = self.options.zoom_or(SIMPLE_ZOOM);
        let widgets = self.widgets()?;
        log::info!("Highlighting {} fillable fields on page {}", widgets.len(), page);

        let mut canvas = self.render(zoom)?;
        let mut overlay = Canvas::new(canvas.width(), canvas.height(), Rgba(255, 255, 255, 0))?;
        for widget in &widgets {
            let rect = pixel_rect(&widget.rect, zoom);
            draw_field_box(&mut overlay, &rect, palette::simple(widget.field_type()), 5.0);
        }
        canvas.composite(&overlay);

        let x = 30.0;
        let y = canvas.height() as f32 - 180.0;
        canvas.fill_rect(x, y, x + 280.0, y + 160.0, Rgba(255, 255, 255, 230));
        canvas.draw_text(x + 15.0, y + 10.0, "Fillable Field Types:", TEXT_SIZE, Rgba::BLACK);
        let mut item_y = y + 35.0;
        for (label, color) in SIMPLE_LEGEND {
            legend_swatch(&mut canvas, x + 15.0, item_y, 20.0, 15.0, color);
            canvas.draw_text(x + 45.0, item_y - 2.0, label, TEXT_SIZE, Rgba::BLACK);
            item_y += 28.0;
        }

        let output = self.options.output_or(self.names().fields_only_png(page));
        VisualizationReport::saved(&canvas, output, widgets.len())
    }

    /// Render the page and crop a page-space region, for a close look at
    /// filled values.
    pub fn render_region(&self, region: Rect) -> Result<VisualizationReport> {
        let page = self.options.page_number;
        let zoom = self.options.zoom_or(CROP_ZOOM);
        let canvas = self.render(zoom)?;

        let scale = |v: f64| (v * f64::from(zoom)).max(0.0) as u32;
        let cropped = canvas.crop(scale(region.x0), scale(region.y0), scale(region.x1), scale(region.y1))?;

        let output = self.options.output_or(self.names().filled_crop_png(page));
        VisualizationReport::saved(&cropped, output, 0)
    }
}

/// A page-space rectangle in pixels at `zoom`.
fn pixel_rect(rect: &Rect, zoom: f32) -> Rect {
    rect.scaled(f64::from(zoom))
}

fn draw_field_box(canvas: &mut Canvas, rect: &Rect, colors: BoxColors, outline_width: f32) {
    let (x0, y0, x1, y1) = (rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32);
    canvas.fill_rect(x0, y0, x1, y1, colors.fill);
    canvas.stroke_rect(x0, y0, x1, y1, colors.outline, outline_width);
}

fn legend_swatch(canvas: &mut Canvas, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
    canvas.fill_rect(x, y, x + width, y + height, color);
    canvas.stroke_rect(x, y, x + width, y + height, Rgba::BLACK, 1.0);
}

/// Draw a number centered on `(cx, cy)`.
pub(crate) fn centered_number(canvas: &mut Canvas, cx: f32, cy: f32, number: usize, color: Rgba) {
    let label = number.to_string();
    let width = crate::render::text_width(&label, TEXT_SIZE);
    canvas.draw_text(cx - width / 2.0, cy - TEXT_SIZE / 2.0 - 2.0, &label, TEXT_SIZE, color);
}

/// `text` unchanged when it has at most `max` characters, else its first
/// `keep` characters followed by `...`.
pub(crate) fn truncate_keep(text: &str, max: usize, keep: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(keep).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
