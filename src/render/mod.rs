//! Page rendering for field visualizations.
//!
//! Pages are rasterized with the pure-Rust `tiny-skia` library, so the
//! visualizers need no external renderer.
//!
//! ## Features
//!
//! - Paths, text, form XObjects and images from the page content
//! - Widget appearance streams, so filled values show up
//! - Configurable zoom and background
//! - A small drawing [`Canvas`] for overlays, labels and legends
//!
//! ## Example
//!
//! ```ignore
//! use pdf_formkit::pdf::FormDocument;
//! use pdf_formkit::render::{render_page, save_png, RenderOptions};
//!
//! let doc = FormDocument::open("form.pdf")?;
//! let pixmap = render_page(&doc, 1, &RenderOptions::with_zoom(2.0))?;
//! save_png(&pixmap, "page1.png")?;
//! ```
//!
//! ## Architecture
//!
//! The rendering pipeline:
//!
//! 1. Decode the page content stream into operators
//! 2. Execute operators against the graphics state machine
//! 3. Rasterize paths, text and images to a tiny-skia pixmap
//! 4. Paint the normal appearance of each visible annotation

mod canvas;
mod font;
mod images;
mod page_renderer;
mod path_rasterizer;
mod state;
mod text_rasterizer;

pub use canvas::{pixmap_to_rgb, save_png, Canvas, Rgba};
pub(crate) use canvas::text_width;
pub use font::{sans_serif, SystemFont, FONT_DIR_ENV};
pub use page_renderer::{PageRenderer, RenderOptions};
pub use state::Matrix;

use crate::error::Result;
use crate::pdf::FormDocument;
use state::GraphicsState;
use tiny_skia::{BlendMode, Color, Paint, Pixmap};

/// Create a Paint configured for fill operations from graphics state.
pub(crate) fn create_fill_paint(gs: &GraphicsState) -> Paint<'static> {
    let (r, g, b) = gs.fill_rgb;
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba(r, g, b, gs.fill_alpha).unwrap_or(Color::BLACK));
    paint.anti_alias = true;
    paint.blend_mode = gs.blend_mode;
    paint
}

/// Create a Paint configured for stroke operations from graphics state.
pub(crate) fn create_stroke_paint(gs: &GraphicsState) -> Paint<'static> {
    let (r, g, b) = gs.stroke_rgb;
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba(r, g, b, gs.stroke_alpha).unwrap_or(Color::BLACK));
    paint.anti_alias = true;
    paint.blend_mode = gs.blend_mode;
    paint
}

/// Convert a PDF blend mode name to tiny-skia.
pub(crate) fn blend_mode_from_name(mode: &[u8]) -> BlendMode {
    match mode {
        b"Multiply" => BlendMode::Multiply,
        b"Screen" => BlendMode::Screen,
        b"Overlay" => BlendMode::Overlay,
        b"Darken" => BlendMode::Darken,
        b"Lighten" => BlendMode::Lighten,
        b"ColorDodge" => BlendMode::ColorDodge,
        b"ColorBurn" => BlendMode::ColorBurn,
        b"HardLight" => BlendMode::HardLight,
        b"SoftLight" => BlendMode::SoftLight,
        b"Difference" => BlendMode::Difference,
        b"Exclusion" => BlendMode::Exclusion,
        _ => BlendMode::SourceOver,
    }
}

/// Naive device CMYK to RGB.
pub(crate) fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> (f32, f32, f32) {
    let k = k.clamp(0.0, 1.0);
    (
        (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
        (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
        (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
    )
}

/// Render a 1-indexed page of a document.
///
/// This is a convenience function that creates a [`PageRenderer`] and
/// renders a single page.
pub fn render_page(doc: &FormDocument, page_number: u32, options: &RenderOptions) -> Result<Pixmap> {
    let mut renderer = PageRenderer::new(options.clone());
    renderer.render_page(doc, page_number)
}
