//! Drawing surface for overlays, labels, legends and panels.
//!
//! Coordinates are pixels with the origin at the top-left, y growing down.
//! Outlines are drawn inside the given box, and text is positioned by the
//! top of its ascender.

use super::font::sans_serif;
use super::text_rasterizer::{block_glyphs, outline_text};
use crate::error::{Error, Result};
use std::path::Path;
use tiny_skia::{
    Color, FillRule, IntRect, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

/// Ascender height in em when no system font is available.
const FALLBACK_ASCENDER: f32 = 0.8;

/// An 8-bit color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba(r, g, b, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Rgba(self.0, self.1, self.2, alpha)
    }

    fn to_color(self) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, self.3)
    }

    fn paint(self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.to_color());
        paint.anti_alias = true;
        paint
    }
}

/// A pixmap with simple drawing primitives.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// A canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self> {
        let mut pixmap = Pixmap::new(width.max(1), height.max(1))
            .ok_or_else(|| Error::Render(format!("Failed to create canvas {}x{}", width, height)))?;
        pixmap.fill(background.to_color());
        Ok(Self { pixmap })
    }

    /// Draw on an existing pixmap, such as a rendered page.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The underlying pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Give up the canvas, keeping the pixels.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Fill the box `(x0, y0)`-`(x1, y1)`. Corners may come in any order.
    pub fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        if let Some(rect) = normalized_rect(x0, y0, x1, y1) {
            let mut paint = color.paint();
            paint.anti_alias = false;
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Outline the box `(x0, y0)`-`(x1, y1)` with a line `width` pixels wide,
    /// drawn inside the box.
    pub fn stroke_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba, width: f32) {
        let inset = width / 2.0;
        let (left, right) = (x0.min(x1) + inset, x0.max(x1) - inset);
        let (top, bottom) = (y0.min(y1) + inset, y0.max(y1) - inset);
        if right < left || bottom < top {
            // Box thinner than the line: fill it
            self.fill_rect(x0, y0, x1, y1, color);
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(left, top);
        builder.line_to(right, top);
        builder.line_to(right, bottom);
        builder.line_to(left, bottom);
        builder.close();
        if let Some(path) = builder.finish() {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(&path, &color.paint(), &stroke, Transform::identity(), None);
        }
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap
                .fill_path(&path, &color.paint(), FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Outline a circle, the line drawn inside the radius.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba, width: f32) {
        let inner = radius - width / 2.0;
        if inner <= 0.0 {
            self.fill_circle(cx, cy, radius, color);
            return;
        }
        if let Some(path) = PathBuilder::from_circle(cx, cy, inner) {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap.stroke_path(&path, &color.paint(), &stroke, Transform::identity(), None);
        }
    }

    /// Draw `text` with its top-left at `(x, y)`, `size` pixels per em.
    ///
    /// Returns the advance width of the text.
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, size: f32, color: Rgba) -> f32 {
        let face = sans_serif().and_then(|font| font.face());
        let (path, ascender) = match face.as_ref() {
            Some(face) => {
                let units = f32::from(face.units_per_em().max(1));
                (outline_text(face, text), f32::from(face.ascender()) / units)
            },
            None => (block_glyphs(text), FALLBACK_ASCENDER),
        };

        if let Some(path) = path {
            // Em space is y-up with the baseline at 0
            let transform = Transform::from_row(size, 0.0, 0.0, -size, x, y + ascender * size);
            self.pixmap
                .fill_path(&path, &color.paint(), FillRule::Winding, transform, None);
        }
        text_width(text, size)
    }

    /// Paint another pixmap with its top-left at `(x, y)`.
    pub fn draw_pixmap(&mut self, pixmap: &Pixmap, x: i32, y: i32) {
        self.pixmap
            .draw_pixmap(x, y, pixmap.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }

    /// Alpha-composite a same-sized overlay onto this canvas.
    pub fn composite(&mut self, overlay: &Canvas) {
        self.draw_pixmap(overlay.pixmap(), 0, 0);
    }

    /// Copy of the region `(x0, y0)`-`(x1, y1)`, clamped to the canvas.
    pub fn crop(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> Result<Canvas> {
        let x1 = x1.min(self.width());
        let y1 = y1.min(self.height());
        let rect = IntRect::from_ltrb(x0 as i32, y0 as i32, x1 as i32, y1 as i32).ok_or_else(|| {
            Error::Render(format!("Crop region ({}, {})-({}, {}) is empty", x0, y0, x1, y1))
        })?;
        let pixmap = self
            .pixmap
            .clone_rect(rect)
            .ok_or_else(|| Error::Render("Crop region is outside the canvas".to_string()))?;
        Ok(Canvas { pixmap })
    }

    /// Save as an RGB PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        save_png(&self.pixmap, path)
    }
}

/// Advance width of `text` at `size` pixels per em.
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    match sans_serif().and_then(|font| font.face()) {
        Some(face) => {
            let units = f32::from(face.units_per_em().max(1));
            text.chars()
                .map(|c| {
                    face.glyph_index(c)
                        .and_then(|gid| face.glyph_hor_advance(gid))
                        .map(|adv| f32::from(adv) / units)
                        .unwrap_or(0.5)
                })
                .sum::<f32>()
                * size
        },
        None => text.chars().count() as f32 * 0.5 * size,
    }
}

fn normalized_rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Option<Rect> {
    Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Convert a pixmap to an 8-bit RGB image, dropping alpha.
pub fn pixmap_to_rgb(pixmap: &Pixmap) -> image::RgbImage {
    let mut rgb = image::RgbImage::new(pixmap.width(), pixmap.height());
    for (out, pixel) in rgb.pixels_mut().zip(pixmap.pixels()) {
        let color = pixel.demultiply();
        *out = image::Rgb([color.red(), color.green(), color.blue()]);
    }
    rgb
}

/// Save a pixmap as an RGB PNG.
pub fn save_png(pixmap: &Pixmap, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    pixmap_to_rgb(pixmap).save_with_format(path, image::ImageFormat::Png)?;
    log::debug!("Saved {}x{} image to {}", pixmap.width(), pixmap.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_at(canvas: &Canvas, x: u32, y: u32) -> (u8, u8, u8) {
        let p = canvas.pixmap().pixel(x, y).unwrap().demultiply();
        (p.red(), p.green(), p.blue())
    }

    #[test]
    fn test_fill_rect_any_corner_order() {
        let mut canvas = Canvas::new(20, 20, Rgba::WHITE).unwrap();
        canvas.fill_rect(15.0, 15.0, 5.0, 5.0, Rgba::rgb(255, 0, 0));
        assert_eq!(rgb_at(&canvas, 10, 10), (255, 0, 0));
        assert_eq!(rgb_at(&canvas, 2, 2), (255, 255, 255));
    }

    #[test]
    fn test_stroke_rect_stays_inside() {
        let mut canvas = Canvas::new(30, 30, Rgba::WHITE).unwrap();
        canvas.stroke_rect(5.0, 5.0, 25.0, 25.0, Rgba::BLACK, 4.0);
        assert_eq!(rgb_at(&canvas, 6, 15), (0, 0, 0));
        assert_eq!(rgb_at(&canvas, 3, 15), (255, 255, 255));
        assert_eq!(rgb_at(&canvas, 15, 15), (255, 255, 255));
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut canvas = Canvas::new(4, 4, Rgba::WHITE).unwrap();
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0, Rgba(0, 0, 255, 128));
        let (r, _, b) = rgb_at(&canvas, 1, 1);
        assert!((120..=135).contains(&r));
        assert_eq!(b, 255);
    }

    #[test]
    fn test_circle() {
        let mut canvas = Canvas::new(40, 40, Rgba::WHITE).unwrap();
        canvas.fill_circle(20.0, 20.0, 10.0, Rgba::BLACK);
        assert_eq!(rgb_at(&canvas, 20, 20), (0, 0, 0));
        assert_eq!(rgb_at(&canvas, 2, 2), (255, 255, 255));
    }

    #[test]
    fn test_crop_clamps_to_canvas() {
        let canvas = Canvas::new(50, 40, Rgba::WHITE).unwrap();
        let cropped = canvas.crop(10, 10, 100, 100).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (40, 30));
        assert!(canvas.crop(60, 60, 100, 100).is_err());
    }

    #[test]
    fn test_draw_text_marks_pixels_and_reports_width() {
        let mut canvas = Canvas::new(200, 40, Rgba::WHITE).unwrap();
        let width = canvas.draw_text(5.0, 5.0, "Total Fields: 3", 20.0, Rgba::BLACK);
        assert!(width > 0.0);
        let dark = canvas.pixmap().pixels().iter().filter(|p| p.demultiply().red() < 128).count();
        assert!(dark > 0);
    }

    #[test]
    fn test_save_png_writes_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let canvas = Canvas::new(8, 6, Rgba::rgb(10, 20, 30)).unwrap();
        canvas.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.color(), image::ColorType::Rgb8);
        assert_eq!((loaded.width(), loaded.height()), (8, 6));
    }
}
