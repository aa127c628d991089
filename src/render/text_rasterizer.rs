//! Text rasterizer - paints text-showing operators with tiny-skia.
//!
//! Text in forms is almost always a standard font that is not embedded, so
//! glyph outlines come from the system sans-serif face. Positions follow the
//! PDF widths when the font dictionary has them, so text lands where the
//! document intends even though the shapes differ from the original font.
//! When no system font is available each glyph is drawn as a block.

use super::create_fill_paint;
use super::font::{sans_serif, PdfFont, SystemFont};
use super::state::{GraphicsState, Matrix};
use lopdf::Object;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// Fallback advance, in em, for glyphs with no known width.
const DEFAULT_ADVANCE: f32 = 0.5;

/// Painter for `Tj`, `TJ`, `'` and `"`.
pub(crate) struct TextRasterizer {
    system_font: Option<&'static SystemFont>,
}

impl TextRasterizer {
    pub fn new() -> Self {
        Self {
            system_font: sans_serif(),
        }
    }

    /// Show one string operand and advance the text matrix past it.
    pub fn show_text(&self, pixmap: &mut Pixmap, bytes: &[u8], base: Transform, gs: &mut GraphicsState) {
        let default_font = PdfFont::default();
        let font = gs.font.clone();
        let font = font.as_deref().unwrap_or(&default_font);
        let face = self.system_font.and_then(SystemFont::face);
        let paint = create_fill_paint(gs);

        for code in font.codes(bytes) {
            let text = font.code_to_text(code);
            let system_advance = face.as_ref().map(|f| text_advance(f, &text));
            let advance_em = font
                .width(code)
                .map(|w| w / 1000.0)
                .or(system_advance)
                .unwrap_or(DEFAULT_ADVANCE);

            if !gs.text_is_invisible() && !text.trim().is_empty() {
                let glyph_space = Matrix::new(
                    gs.font_size * gs.horizontal_scaling,
                    0.0,
                    0.0,
                    gs.font_size,
                    0.0,
                    gs.text_rise,
                )
                .multiply(&gs.text_matrix)
                .multiply(&gs.ctm);
                let transform = base.pre_concat(glyph_space.to_transform());

                let path = match face.as_ref() {
                    Some(face) => outline_text(face, &text),
                    None => block_glyphs(&text),
                };
                if let Some(path) = path {
                    fill_glyphs(pixmap, &path, &paint, transform, gs);
                }
            }

            let mut tx = advance_em * gs.font_size + gs.char_space;
            if font.is_space(code) {
                tx += gs.word_space;
            }
            advance(gs, tx * gs.horizontal_scaling);
        }
    }

    /// Show a `TJ` array: strings interleaved with position adjustments in
    /// thousandths of text space.
    pub fn show_text_array(&self, pixmap: &mut Pixmap, items: &[Object], base: Transform, gs: &mut GraphicsState) {
        for item in items {
            match item {
                Object::String(bytes, _) => self.show_text(pixmap, bytes, base, gs),
                Object::Integer(i) => adjust(gs, *i as f32),
                Object::Real(r) => adjust(gs, *r),
                _ => {},
            }
        }
    }
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn adjust(gs: &mut GraphicsState, thousandths: f32) {
    let tx = -thousandths / 1000.0 * gs.font_size * gs.horizontal_scaling;
    advance(gs, tx);
}

fn advance(gs: &mut GraphicsState, tx: f32) {
    gs.text_matrix = Matrix::translation(tx, 0.0).multiply(&gs.text_matrix);
}

fn fill_glyphs(pixmap: &mut Pixmap, path: &Path, paint: &Paint<'_>, transform: Transform, gs: &GraphicsState) {
    pixmap.fill_path(path, paint, FillRule::Winding, transform, gs.clip.as_deref());
}

/// Total advance of `text` in em.
fn text_advance(face: &Face<'_>, text: &str) -> f32 {
    let units_per_em = f32::from(face.units_per_em().max(1));
    text.chars()
        .map(|c| {
            face.glyph_index(c)
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| f32::from(adv) / units_per_em)
                .unwrap_or(DEFAULT_ADVANCE)
        })
        .sum()
}

/// Outline `text` in em units, baseline at y = 0, y up.
pub(crate) fn outline_text(face: &Face<'_>, text: &str) -> Option<Path> {
    let units_per_em = f32::from(face.units_per_em().max(1));
    let mut builder = GlyphPathBuilder::new(1.0 / units_per_em);
    let mut pen_x = 0.0;
    for c in text.chars() {
        let gid = face.glyph_index(c).unwrap_or(GlyphId(0));
        builder.origin_x = pen_x;
        if gid.0 != 0 {
            let _ = face.outline_glyph(gid, &mut builder);
        }
        pen_x += face
            .glyph_hor_advance(gid)
            .map(|adv| f32::from(adv) / units_per_em)
            .unwrap_or(DEFAULT_ADVANCE);
    }
    builder.builder.finish()
}

/// One block per visible character, in em units.
pub(crate) fn block_glyphs(text: &str) -> Option<Path> {
    let mut builder = PathBuilder::new();
    let mut pen_x = 0.0;
    for c in text.chars() {
        let height = if c.is_uppercase() || c.is_ascii_digit() {
            0.7
        } else if c.is_lowercase() {
            0.5
        } else {
            0.6
        };
        if !c.is_whitespace() {
            if let Some(rect) = tiny_skia::Rect::from_ltrb(pen_x + 0.05, 0.0, pen_x + 0.45, height) {
                builder.push_rect(rect);
            }
        }
        pen_x += DEFAULT_ADVANCE;
    }
    builder.finish()
}

/// Collects glyph outlines into one path, scaled from font units.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x: 0.0,
            scale,
        }
    }

    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let x = self.x(x);
        self.builder.move_to(x, y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let x = self.x(x);
        self.builder.line_to(x, y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, x) = (self.x(x1), self.x(x));
        self.builder.quad_to(x1, y1 * self.scale, x, y * self.scale);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, x2, x) = (self.x(x1), self.x(x2), self.x(x));
        let s = self.scale;
        self.builder.cubic_to(x1, y1 * s, x2, y2 * s, x, y * s);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_glyphs_skip_spaces() {
        let path = block_glyphs("A b").unwrap();
        let bounds = path.bounds();
        assert!((bounds.left() - 0.05).abs() < 1e-4);
        assert!((bounds.right() - 1.45).abs() < 1e-4);
        assert!((bounds.bottom() - 0.7).abs() < 1e-4);
        assert!(block_glyphs("   ").is_none());
    }

    #[test]
    fn test_tj_adjustment_moves_left_for_positive_values() {
        let mut gs = GraphicsState::new();
        gs.font_size = 10.0;
        adjust(&mut gs, 500.0);
        assert!((gs.text_matrix.e + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_show_text_advances_with_default_width() {
        let rasterizer = TextRasterizer { system_font: None };
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        let mut gs = GraphicsState::new();
        gs.font_size = 10.0;
        gs.char_space = 1.0;
        rasterizer.show_text(&mut pixmap, b"ab", Transform::identity(), &mut gs);
        // two glyphs at the default half-em advance plus character spacing
        assert!((gs.text_matrix.e - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_invisible_text_still_advances() {
        let rasterizer = TextRasterizer { system_font: None };
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        let mut gs = GraphicsState::new();
        gs.render_mode = 3;
        gs.font_size = 20.0;
        gs.text_matrix = Matrix::translation(2.0, 2.0);
        rasterizer.show_text(&mut pixmap, b"XX", Transform::identity(), &mut gs);
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
        assert!((gs.text_matrix.e - 22.0).abs() < 1e-4);
    }
}
