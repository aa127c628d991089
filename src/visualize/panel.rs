//! Record-driven images: the standalone field list and the comprehensive
//! side panel. Neither needs the PDF page.

use super::palette::{self, COMPREHENSIVE_LEGEND};
use super::{centered_number, truncate_keep, TEXT_SIZE, TITLE_SIZE};
use crate::error::Result;
use crate::record::PageRecord;
use crate::render::{Canvas, Rgba};

/// Field list image width.
pub const LIST_WIDTH: u32 = 1200;
const LIST_LINE_HEIGHT: u32 = 30;
const LIST_HEADER_HEIGHT: u32 = 80;
const LIST_HEADER_COLOR: Rgba = Rgba::rgb(70, 130, 180);
const LIST_ROW_SHADE: Rgba = Rgba::rgb(240, 240, 240);

/// Side panel width.
pub const PANEL_WIDTH: u32 = 800;
const PANEL_BACKGROUND: Rgba = Rgba::rgb(250, 250, 250);
const PANEL_HEADER_HEIGHT: u32 = 100;
const PANEL_HEADER_COLOR: Rgba = Rgba::rgb(41, 128, 185);
const PANEL_DETAILS_COLOR: Rgba = Rgba::rgb(52, 73, 94);
const PANEL_ROW_SHADE: Rgba = Rgba::rgb(245, 245, 245);
const PANEL_ROW_HEIGHT: u32 = 85;
const MUTED: Rgba = Rgba::rgb(100, 100, 100);

/// One row per field of the page under a header band.
pub fn field_list(page: &PageRecord) -> Result<Canvas> {
    let count = page.fields.len() as u32;
    let height = LIST_HEADER_HEIGHT + count * LIST_LINE_HEIGHT + 40;
    let mut canvas = Canvas::new(LIST_WIDTH, height, Rgba::WHITE)?;
    let width = LIST_WIDTH as f32;

    canvas.fill_rect(0.0, 0.0, width, LIST_HEADER_HEIGHT as f32, LIST_HEADER_COLOR);
    let title = format!("Form Fields - Page {}", page.page_number);
    canvas.draw_text(20.0, 15.0, &title, TITLE_SIZE, Rgba::WHITE);
    let total = format!("Total Fields: {}", count);
    canvas.draw_text(20.0, 45.0, &total, TEXT_SIZE, Rgba::WHITE);

    let mut y = (LIST_HEADER_HEIGHT + 20) as f32;
    for (idx, field) in page.fields.iter().enumerate() {
        if idx % 2 == 0 {
            canvas.fill_rect(0.0, y - 5.0, width, y + LIST_LINE_HEIGHT as f32 - 5.0, LIST_ROW_SHADE);
        }
        canvas.draw_text(20.0, y, &format!("{}.", idx + 1), TEXT_SIZE, Rgba::BLACK);
        canvas.draw_text(60.0, y, &truncate_keep(&field.key, 80, 77), TEXT_SIZE, Rgba::BLACK);
        let tag = format!("[{}]", field.field_type);
        canvas.draw_text(1000.0, y, &tag, TEXT_SIZE, palette::field_list_tag(field.field_type));
        y += LIST_LINE_HEIGHT as f32;
    }

    Ok(canvas)
}

/// The comprehensive view's information panel.
///
/// `widget_count` is the number of widgets on the rendered page; rows come
/// from the record and stop when the panel is full.
pub fn side_panel(page: &PageRecord, height: u32, widget_count: usize, pdf_name: &str) -> Result<Canvas> {
    let mut canvas = Canvas::new(PANEL_WIDTH, height, PANEL_BACKGROUND)?;
    let width = PANEL_WIDTH as f32;

    canvas.fill_rect(0.0, 0.0, width, PANEL_HEADER_HEIGHT as f32, PANEL_HEADER_COLOR);
    let title = format!("Form Fields - Page {}", page.page_number);
    canvas.draw_text(20.0, 15.0, &title, TITLE_SIZE, Rgba::WHITE);
    let total = format!("Total Fields: {}", widget_count);
    canvas.draw_text(20.0, 45.0, &total, TEXT_SIZE, Rgba::WHITE);
    let name: String = pdf_name.chars().take(50).collect();
    canvas.draw_text(20.0, 70.0, &format!("PDF: {}...", name), TEXT_SIZE, Rgba::WHITE);

    let mut legend_y = (PANEL_HEADER_HEIGHT + 10) as f32;
    canvas.draw_text(20.0, legend_y, "Legend:", TEXT_SIZE, Rgba::BLACK);
    legend_y += 25.0;
    for (label, color) in COMPREHENSIVE_LEGEND {
        canvas.fill_rect(20.0, legend_y, 35.0, legend_y + 12.0, color);
        canvas.stroke_rect(20.0, legend_y, 35.0, legend_y + 12.0, Rgba::BLACK, 1.0);
        canvas.draw_text(45.0, legend_y - 2.0, label, TEXT_SIZE, Rgba::BLACK);
        legend_y += 20.0;
    }

    let list_y = legend_y + 20.0;
    canvas.fill_rect(0.0, list_y, width, list_y + 30.0, PANEL_DETAILS_COLOR);
    canvas.draw_text(20.0, list_y + 5.0, "Field Details", TEXT_SIZE, Rgba::WHITE);

    let row_height = PANEL_ROW_HEIGHT as f32;
    let limit = height as f32 - 10.0;
    let mut y = list_y + 40.0;
    for (idx, field) in page.fields.iter().enumerate() {
        if y + row_height > limit {
            log::debug!("Side panel full after {} of {} fields", idx, page.fields.len());
            break;
        }
        if idx % 2 == 0 {
            canvas.fill_rect(0.0, y - 5.0, width, y + row_height - 5.0, PANEL_ROW_SHADE);
        }

        let (cx, cy) = (30.0, y + 10.0);
        canvas.fill_circle(cx, cy, 16.0, palette::comprehensive(field.field_type).outline);
        canvas.stroke_circle(cx, cy, 16.0, Rgba::BLACK, 2.0);
        centered_number(&mut canvas, cx, cy, idx + 1, Rgba::WHITE);

        let key = truncate_keep(&field.key, 60, 57);
        canvas.draw_text(60.0, y, &format!("Key: {}", key), TEXT_SIZE, Rgba::BLACK);
        let type_color = palette::comprehensive_type_text(field.field_type);
        canvas.draw_text(60.0, y + 20.0, &format!("Type: {}", field.field_type), TEXT_SIZE, type_color);
        let c = &field.coordinates;
        let position = format!("Position: ({:.0}, {:.0}) to ({:.0}, {:.0})", c.x0, c.y0, c.x1, c.y1);
        canvas.draw_text(60.0, y + 40.0, &position, TEXT_SIZE, MUTED);
        let parent: String = field.parent.chars().take(30).collect();
        canvas.draw_text(60.0, y + 60.0, &format!("Parent: {}", parent), TEXT_SIZE, MUTED);

        y += row_height;
    }

    Ok(canvas)
}

/// Rows that fit in a side panel of the given height.
pub fn panel_capacity(height: u32) -> usize {
    // Header, legend and the details bar come before the first row
    let legend = 20.0 * COMPREHENSIVE_LEGEND.len() as f32;
    let first_row = PANEL_HEADER_HEIGHT as f32 + 10.0 + 25.0 + legend + 20.0 + 40.0;
    let limit = height as f32 - 10.0;
    let mut rows = 0;
    let mut y = first_row;
    while y + PANEL_ROW_HEIGHT as f32 <= limit {
        rows += 1;
        y += PANEL_ROW_HEIGHT as f32;
    }
    rows
}
