//! Page renderer - executes page content and annotation appearances onto a
//! pixmap.

use super::font::PdfFont;
use super::images::decode_image;
use super::path_rasterizer::PathRasterizer;
use super::state::{GraphicsState, GraphicsStateStack, Matrix};
use super::text_rasterizer::TextRasterizer;
use super::{blend_mode_from_name, cmyk_to_rgb};
use crate::error::{Error, Result};
use crate::pdf::{obj_to_f64, FormDocument};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tiny_skia::{Color, FillRule, FilterQuality, PathBuilder, Pixmap, PixmapPaint, Transform};

/// Form XObjects nested deeper than this are skipped.
const MAX_FORM_DEPTH: usize = 12;

/// Annotation flags that suppress display: Hidden (bit 2) and NoView (bit 6).
const HIDDEN_ANNOTATION_FLAGS: i64 = (1 << 1) | (1 << 5);

/// Options for page rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pixels per PDF point (default: 1.0, i.e. 72 DPI)
    pub zoom: f32,
    /// Background color as RGBA, `None` for transparent (default: white)
    pub background: Option<[f32; 4]>,
    /// Paint annotation appearances such as filled field values (default: true)
    pub render_annotations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            background: Some([1.0, 1.0, 1.0, 1.0]),
            render_annotations: true,
        }
    }
}

impl RenderOptions {
    /// Create options with a custom zoom factor.
    pub fn with_zoom(zoom: f32) -> Self {
        Self {
            zoom: if zoom > 0.0 { zoom } else { 1.0 },
            ..Default::default()
        }
    }

    /// Render without a background.
    pub fn with_transparent_background(mut self) -> Self {
        self.background = None;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, rgba: [f32; 4]) -> Self {
        self.background = Some(rgba);
        self
    }

    /// Render page content only, skipping annotation appearances.
    pub fn without_annotations(mut self) -> Self {
        self.render_annotations = false;
        self
    }
}

/// Renders pages of one document.
///
/// Font descriptions are cached per renderer, so reuse a renderer for
/// several pages of the same document.
pub struct PageRenderer {
    options: RenderOptions,
    path_rasterizer: PathRasterizer,
    text_rasterizer: TextRasterizer,
    fonts: HashMap<ObjectId, Rc<PdfFont>>,
    visited_forms: HashSet<ObjectId>,
    form_depth: usize,
}

impl PageRenderer {
    /// Create a new page renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            path_rasterizer: PathRasterizer::new(),
            text_rasterizer: TextRasterizer::new(),
            fonts: HashMap::new(),
            visited_forms: HashSet::new(),
            form_depth: 0,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a 1-indexed page.
    ///
    /// The pixmap covers the page box at `zoom` pixels per point, with the
    /// page's top-left corner at pixel (0, 0). Content that cannot be
    /// interpreted is logged and skipped; only an unknown page or an
    /// unallocatable pixmap is an error.
    pub fn render_page(&mut self, doc: &FormDocument, page_number: u32) -> Result<Pixmap> {
        let page_id = doc.page_id(page_number)?;
        let page_box = doc.page_box(page_number)?;
        let zoom = self.options.zoom;

        let width = (page_box.width() as f32 * zoom).ceil().max(1.0) as u32;
        let height = (page_box.height() as f32 * zoom).ceil().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::Render(format!("Failed to create pixmap {}x{}", width, height)))?;

        if let Some([r, g, b, a]) = self.options.background {
            pixmap.fill(Color::from_rgba(r, g, b, a).unwrap_or(Color::WHITE));
        }

        // PDF origin is bottom-left; flip Y and move the page box corner to (0, 0)
        let base = Transform::from_row(
            zoom,
            0.0,
            0.0,
            -zoom,
            -(page_box.llx as f32) * zoom,
            page_box.ury as f32 * zoom,
        );

        let resources = doc
            .inherited_page_attribute(page_id, b"Resources")
            .and_then(|obj| doc.resolve_dict(obj));

        match page_operations(doc, page_id) {
            Ok(operations) => {
                let mut stack = GraphicsStateStack::default();
                self.execute_operations(doc, &mut pixmap, base, &operations, resources, &mut stack);
            },
            Err(e) => log::warn!("Page {} content could not be decoded: {}", page_number, e),
        }

        if self.options.render_annotations {
            let page = doc.inner().get_dictionary(page_id)?;
            self.render_annotations(doc, &mut pixmap, base, page);
        }

        log::debug!("Rendered page {} at zoom {} ({}x{})", page_number, zoom, width, height);
        Ok(pixmap)
    }

    /// Execute content stream operators against the graphics state.
    fn execute_operations(
        &mut self,
        doc: &FormDocument,
        pixmap: &mut Pixmap,
        base: Transform,
        operations: &[Operation],
        resources: Option<&Dictionary>,
        stack: &mut GraphicsStateStack,
    ) {
        let mut path = PathBuilder::new();
        let mut current_point = (0.0f32, 0.0f32);
        let mut subpath_start = (0.0f32, 0.0f32);
        let mut pending_clip: Option<FillRule> = None;

        for op in operations {
            match op.operator.as_str() {
                // Graphics state
                "q" => stack.save(),
                "Q" => stack.restore(),
                "cm" => {
                    if let Some([a, b, c, d, e, f]) = op_f32_6(op) {
                        let gs = stack.current_mut();
                        gs.ctm = Matrix::new(a, b, c, d, e, f).multiply(&gs.ctm);
                    }
                },
                "w" => {
                    if let Some(width) = op_f32(op, 0) {
                        stack.current_mut().line_width = width;
                    }
                },
                "J" => {
                    if let Some(cap) = op_i64(op, 0) {
                        stack.current_mut().line_cap = cap.clamp(0, 2) as u8;
                    }
                },
                "j" => {
                    if let Some(join) = op_i64(op, 0) {
                        stack.current_mut().line_join = join.clamp(0, 2) as u8;
                    }
                },
                "M" => {
                    if let Some(limit) = op_f32(op, 0) {
                        stack.current_mut().miter_limit = limit.max(1.0);
                    }
                },
                "d" => {
                    let array = op
                        .operands
                        .first()
                        .and_then(|o| o.as_array().ok())
                        .map(|arr| arr.iter().filter_map(obj_to_f32).map(f32::abs).collect())
                        .unwrap_or_default();
                    let phase = op_f32(op, 1).unwrap_or(0.0);
                    stack.current_mut().dash_pattern = (array, phase);
                },
                "gs" => {
                    let state = op_name(op, 0)
                        .and_then(|name| lookup_resource(doc, resources, b"ExtGState", name))
                        .and_then(|obj| doc.resolve_dict(obj));
                    if let Some(state) = state {
                        apply_ext_g_state(doc, stack.current_mut(), state);
                    }
                },

                // Color
                "g" => {
                    if let Some(gray) = op_f32(op, 0) {
                        stack.current_mut().fill_rgb = (gray, gray, gray);
                    }
                },
                "G" => {
                    if let Some(gray) = op_f32(op, 0) {
                        stack.current_mut().stroke_rgb = (gray, gray, gray);
                    }
                },
                "rg" => {
                    if let Some([r, g, b]) = op_f32_3(op) {
                        stack.current_mut().fill_rgb = (r, g, b);
                    }
                },
                "RG" => {
                    if let Some([r, g, b]) = op_f32_3(op) {
                        stack.current_mut().stroke_rgb = (r, g, b);
                    }
                },
                "k" => {
                    if let Some([c, m, y, k]) = op_f32_4(op) {
                        stack.current_mut().fill_rgb = cmyk_to_rgb(c, m, y, k);
                    }
                },
                "K" => {
                    if let Some([c, m, y, k]) = op_f32_4(op) {
                        stack.current_mut().stroke_rgb = cmyk_to_rgb(c, m, y, k);
                    }
                },
                "cs" => stack.current_mut().fill_rgb = (0.0, 0.0, 0.0),
                "CS" => stack.current_mut().stroke_rgb = (0.0, 0.0, 0.0),
                "sc" | "scn" => {
                    if let Some(rgb) = color_operands(op) {
                        stack.current_mut().fill_rgb = rgb;
                    }
                },
                "SC" | "SCN" => {
                    if let Some(rgb) = color_operands(op) {
                        stack.current_mut().stroke_rgb = rgb;
                    }
                },

                // Path construction
                "m" => {
                    if let Some([x, y]) = op_f32_2(op) {
                        path.move_to(x, y);
                        current_point = (x, y);
                        subpath_start = (x, y);
                    }
                },
                "l" => {
                    if let Some([x, y]) = op_f32_2(op) {
                        path.line_to(x, y);
                        current_point = (x, y);
                    }
                },
                "c" => {
                    if let Some([x1, y1, x2, y2, x3, y3]) = op_f32_6(op) {
                        path.cubic_to(x1, y1, x2, y2, x3, y3);
                        current_point = (x3, y3);
                    }
                },
                "v" => {
                    // First control point is the current point
                    if let Some([x2, y2, x3, y3]) = op_f32_4(op) {
                        path.cubic_to(current_point.0, current_point.1, x2, y2, x3, y3);
                        current_point = (x3, y3);
                    }
                },
                "y" => {
                    // Second control point is the end point
                    if let Some([x1, y1, x3, y3]) = op_f32_4(op) {
                        path.cubic_to(x1, y1, x3, y3, x3, y3);
                        current_point = (x3, y3);
                    }
                },
                "re" => {
                    if let Some([x, y, w, h]) = op_f32_4(op) {
                        path.move_to(x, y);
                        path.line_to(x + w, y);
                        path.line_to(x + w, y + h);
                        path.line_to(x, y + h);
                        path.close();
                        current_point = (x, y);
                        subpath_start = (x, y);
                    }
                },
                "h" => {
                    path.close();
                    current_point = subpath_start;
                },

                // Clipping applies at the next painting operator
                "W" => pending_clip = Some(FillRule::Winding),
                "W*" => pending_clip = Some(FillRule::EvenOdd),

                // Path painting
                "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" | "n" => {
                    let (close, fill, stroke) = match op.operator.as_str() {
                        "S" => (false, None, true),
                        "s" => (true, None, true),
                        "f" | "F" => (false, Some(FillRule::Winding), false),
                        "f*" => (false, Some(FillRule::EvenOdd), false),
                        "B" => (false, Some(FillRule::Winding), true),
                        "B*" => (false, Some(FillRule::EvenOdd), true),
                        "b" => (true, Some(FillRule::Winding), true),
                        "b*" => (true, Some(FillRule::EvenOdd), true),
                        _ => (false, None, false),
                    };
                    let mut finished = std::mem::replace(&mut path, PathBuilder::new());
                    if close {
                        finished.close();
                    }
                    if let Some(finished) = finished.finish() {
                        let transform = base.pre_concat(stack.current().ctm.to_transform());
                        let gs = stack.current();
                        if let Some(rule) = fill {
                            self.path_rasterizer.fill_path(pixmap, &finished, transform, gs, rule);
                        }
                        if stroke {
                            self.path_rasterizer.stroke_path(pixmap, &finished, transform, gs);
                        }
                        if let Some(rule) = pending_clip {
                            let clip =
                                self.path_rasterizer
                                    .clip_to(pixmap, gs.clip.as_ref(), &finished, transform, rule);
                            if clip.is_some() {
                                stack.current_mut().clip = clip;
                            }
                        }
                    }
                    pending_clip = None;
                },

                // Text state
                "BT" => {
                    let gs = stack.current_mut();
                    gs.text_matrix = Matrix::identity();
                    gs.text_line_matrix = Matrix::identity();
                },
                "ET" => {},
                "Tc" => {
                    if let Some(space) = op_f32(op, 0) {
                        stack.current_mut().char_space = space;
                    }
                },
                "Tw" => {
                    if let Some(space) = op_f32(op, 0) {
                        stack.current_mut().word_space = space;
                    }
                },
                "Tz" => {
                    if let Some(scale) = op_f32(op, 0) {
                        stack.current_mut().horizontal_scaling = (scale / 100.0).max(0.0);
                    }
                },
                "TL" => {
                    if let Some(leading) = op_f32(op, 0) {
                        stack.current_mut().leading = leading;
                    }
                },
                "Ts" => {
                    if let Some(rise) = op_f32(op, 0) {
                        stack.current_mut().text_rise = rise;
                    }
                },
                "Tr" => {
                    if let Some(mode) = op_i64(op, 0) {
                        stack.current_mut().render_mode = mode.clamp(0, 7) as u8;
                    }
                },
                "Tf" => {
                    let font = op_name(op, 0).and_then(|name| self.font_resource(doc, resources, name));
                    let gs = stack.current_mut();
                    gs.font = font;
                    gs.font_size = op_f32(op, 1).unwrap_or(12.0);
                },

                // Text positioning
                "Td" | "TD" => {
                    if let Some([tx, ty]) = op_f32_2(op) {
                        let gs = stack.current_mut();
                        if op.operator == "TD" {
                            gs.leading = -ty;
                        }
                        next_line(gs, tx, ty);
                    }
                },
                "Tm" => {
                    if let Some([a, b, c, d, e, f]) = op_f32_6(op) {
                        let gs = stack.current_mut();
                        gs.text_matrix = Matrix::new(a, b, c, d, e, f);
                        gs.text_line_matrix = gs.text_matrix;
                    }
                },
                "T*" => {
                    let gs = stack.current_mut();
                    let leading = gs.leading;
                    next_line(gs, 0.0, -leading);
                },

                // Text showing
                "Tj" => {
                    if let Some(bytes) = op.operands.first().and_then(|o| o.as_str().ok()) {
                        self.text_rasterizer.show_text(pixmap, bytes, base, stack.current_mut());
                    }
                },
                "'" => {
                    let gs = stack.current_mut();
                    let leading = gs.leading;
                    next_line(gs, 0.0, -leading);
                    if let Some(bytes) = op.operands.first().and_then(|o| o.as_str().ok()) {
                        self.text_rasterizer.show_text(pixmap, bytes, base, gs);
                    }
                },
                "\"" => {
                    let gs = stack.current_mut();
                    if let (Some(word_space), Some(char_space)) = (op_f32(op, 0), op_f32(op, 1)) {
                        gs.word_space = word_space;
                        gs.char_space = char_space;
                    }
                    let leading = gs.leading;
                    next_line(gs, 0.0, -leading);
                    if let Some(bytes) = op.operands.get(2).and_then(|o| o.as_str().ok()) {
                        self.text_rasterizer.show_text(pixmap, bytes, base, gs);
                    }
                },
                "TJ" => {
                    if let Some(items) = op.operands.first().and_then(|o| o.as_array().ok()) {
                        self.text_rasterizer
                            .show_text_array(pixmap, items, base, stack.current_mut());
                    }
                },

                // XObjects
                "Do" => {
                    let Some(name) = op_name(op, 0) else {
                        continue;
                    };
                    if let Some(obj) = lookup_resource(doc, resources, b"XObject", name) {
                        let gs = stack.current().clone();
                        if let Err(e) = self.render_xobject(doc, pixmap, base, gs, obj, resources) {
                            log::debug!("Skipping XObject /{}: {}", String::from_utf8_lossy(name), e);
                        }
                    }
                },

                // Marked content, shading, inline images and the rest are not drawn
                _ => {},
            }
        }
    }

    /// Render a `Do` target.
    fn render_xobject(
        &mut self,
        doc: &FormDocument,
        pixmap: &mut Pixmap,
        base: Transform,
        gs: GraphicsState,
        obj: &Object,
        parent_resources: Option<&Dictionary>,
    ) -> Result<()> {
        let id = obj.as_reference().ok();
        let stream = doc
            .resolve(obj)
            .ok_or_else(|| Error::Render("unresolvable XObject".to_string()))?
            .as_stream()?;

        match stream.dict.get(b"Subtype").and_then(Object::as_name).unwrap_or_default() {
            b"Form" => {
                let placement = Matrix::identity();
                self.render_form(doc, pixmap, base, gs, stream, id, parent_resources, placement)
            },
            b"Image" => render_image(doc, pixmap, base, &gs, stream),
            _ => Ok(()),
        }
    }

    /// Execute a form XObject.
    ///
    /// `placement` maps form space (after the form's own `/Matrix`) into the
    /// current user space; identity for `Do`, the rectangle fit for
    /// annotation appearances.
    #[allow(clippy::too_many_arguments)]
    fn render_form(
        &mut self,
        doc: &FormDocument,
        pixmap: &mut Pixmap,
        base: Transform,
        mut gs: GraphicsState,
        stream: &Stream,
        id: Option<ObjectId>,
        parent_resources: Option<&Dictionary>,
        placement: Matrix,
    ) -> Result<()> {
        if self.form_depth >= MAX_FORM_DEPTH {
            return Err(Error::Render("form XObjects nested too deeply".to_string()));
        }
        if let Some(id) = id {
            if !self.visited_forms.insert(id) {
                return Err(Error::Render(format!("form XObject {} {} draws itself", id.0, id.1)));
            }
        }

        let form_matrix = form_matrix(doc, &stream.dict);
        gs.ctm = form_matrix.multiply(&placement).multiply(&gs.ctm);

        if let Some(bbox) = stream.dict.get(b"BBox").ok().and_then(|o| doc.rect_array(o)) {
            let [x0, y0, x1, y1] = bbox.map(|v| v as f32);
            if let Some(rect) = tiny_skia::Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)) {
                let transform = base.pre_concat(gs.ctm.to_transform());
                let bbox_path = PathBuilder::from_rect(rect);
                if let Some(clip) =
                    self.path_rasterizer
                        .clip_to(pixmap, gs.clip.as_ref(), &bbox_path, transform, FillRule::Winding)
                {
                    gs.clip = Some(clip);
                }
            }
        }

        let resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|obj| doc.resolve_dict(obj))
            .or(parent_resources);

        let result = stream
            .get_plain_content()
            .and_then(|bytes| Content::decode(&bytes))
            .map_err(Error::from);

        self.form_depth += 1;
        if let Ok(content) = &result {
            let mut stack = GraphicsStateStack::with_state(gs);
            self.execute_operations(doc, pixmap, base, &content.operations, resources, &mut stack);
        }
        self.form_depth -= 1;
        if let Some(id) = id {
            self.visited_forms.remove(&id);
        }
        result.map(|_| ())
    }

    /// Paint the normal appearance of every visible annotation on the page.
    fn render_annotations(&mut self, doc: &FormDocument, pixmap: &mut Pixmap, base: Transform, page: &Dictionary) {
        let Some(Ok(annots)) = doc.get_resolved(page, b"Annots").map(Object::as_array) else {
            return;
        };
        let fallback_resources = acroform_resources(doc);

        for annot in annots {
            let Some(dict) = doc.resolve_dict(annot) else {
                continue;
            };
            if let Err(e) = self.render_annotation(doc, pixmap, base, dict, fallback_resources) {
                log::debug!("Skipping annotation appearance: {}", e);
            }
        }
    }

    fn render_annotation(
        &mut self,
        doc: &FormDocument,
        pixmap: &mut Pixmap,
        base: Transform,
        annot: &Dictionary,
        fallback_resources: Option<&Dictionary>,
    ) -> Result<()> {
        let flags = annot.get(b"F").and_then(Object::as_i64).unwrap_or(0);
        if flags & HIDDEN_ANNOTATION_FLAGS != 0 {
            return Ok(());
        }
        let Some(rect) = annot.get(b"Rect").ok().and_then(|o| doc.rect_array(o)) else {
            return Ok(());
        };
        let Some(normal) = doc
            .get_resolved(annot, b"AP")
            .and_then(|ap| ap.as_dict().ok())
            .and_then(|ap| ap.get(b"N").ok())
        else {
            return Ok(());
        };

        // /N is one stream, or a dictionary of streams keyed by state (/AS)
        let appearance = match doc.resolve(normal) {
            Some(Object::Stream(_)) => normal,
            Some(Object::Dictionary(states)) => {
                let state = annot.get(b"AS").and_then(Object::as_name);
                match state.and_then(|s| states.get(s)) {
                    Ok(obj) => obj,
                    Err(_) => return Ok(()),
                }
            },
            _ => return Ok(()),
        };
        let id = appearance.as_reference().ok();
        let Some(Object::Stream(stream)) = doc.resolve(appearance) else {
            return Ok(());
        };

        let bbox = stream
            .dict
            .get(b"BBox")
            .ok()
            .and_then(|o| doc.rect_array(o))
            .unwrap_or(rect);
        let placement = fit_to_rect(bbox, form_matrix(doc, &stream.dict), rect);
        self.render_form(
            doc,
            pixmap,
            base,
            GraphicsState::new(),
            stream,
            id,
            fallback_resources,
            placement,
        )
    }

    /// Font description for a `/Font` resource, cached by object id.
    fn font_resource(
        &mut self,
        doc: &FormDocument,
        resources: Option<&Dictionary>,
        name: &[u8],
    ) -> Option<Rc<PdfFont>> {
        let entry = lookup_resource(doc, resources, b"Font", name)?;
        let id = entry.as_reference().ok();
        if let Some(font) = id.and_then(|id| self.fonts.get(&id)) {
            return Some(font.clone());
        }

        let font = Rc::new(PdfFont::from_dict(doc, doc.resolve_dict(entry)?));
        if let Some(id) = id {
            self.fonts.insert(id, font.clone());
        }
        Some(font)
    }
}

/// Decoded operators of a page's content streams.
fn page_operations(doc: &FormDocument, page_id: ObjectId) -> Result<Vec<Operation>> {
    let bytes = doc.inner().get_page_content(page_id)?;
    Ok(Content::decode(&bytes)?.operations)
}

/// Draw an image XObject into the unit square of the current user space.
fn render_image(
    doc: &FormDocument,
    pixmap: &mut Pixmap,
    base: Transform,
    gs: &GraphicsState,
    stream: &Stream,
) -> Result<()> {
    if stream.dict.get(b"ImageMask").and_then(Object::as_bool).unwrap_or(false) {
        log::debug!("Stencil image masks are not drawn");
        return Ok(());
    }

    let image = decode_image(doc, stream)?;
    let (w, h) = (image.width() as f32, image.height() as f32);

    // Image row 0 is the top of the unit square
    let image_space = Matrix::new(1.0 / w, 0.0, 0.0, -1.0 / h, 0.0, 1.0).multiply(&gs.ctm);
    let transform = base.pre_concat(image_space.to_transform());
    let paint = PixmapPaint {
        opacity: gs.fill_alpha,
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, gs.clip.as_deref());
    Ok(())
}

fn apply_ext_g_state(doc: &FormDocument, gs: &mut GraphicsState, state: &Dictionary) {
    let number = |key: &[u8]| doc.get_resolved(state, key).and_then(obj_to_f32);
    if let Some(alpha) = number(b"ca") {
        gs.fill_alpha = alpha.clamp(0.0, 1.0);
    }
    if let Some(alpha) = number(b"CA") {
        gs.stroke_alpha = alpha.clamp(0.0, 1.0);
    }
    if let Some(width) = number(b"LW") {
        gs.line_width = width;
    }
    if let Some(Ok(mode)) = doc.get_resolved(state, b"BM").map(Object::as_name) {
        gs.blend_mode = blend_mode_from_name(mode);
    }
}

/// Start a new text line offset from the current one.
fn next_line(gs: &mut GraphicsState, tx: f32, ty: f32) {
    gs.text_line_matrix = Matrix::translation(tx, ty).multiply(&gs.text_line_matrix);
    gs.text_matrix = gs.text_line_matrix;
}

/// `/Matrix` of a form XObject.
fn form_matrix(doc: &FormDocument, dict: &Dictionary) -> Matrix {
    doc.get_resolved(dict, b"Matrix")
        .and_then(|o| o.as_array().ok())
        .map(|arr| arr.iter().filter_map(|v| doc.resolve(v).and_then(obj_to_f32)).collect::<Vec<_>>())
        .and_then(|values| Matrix::from_array(&values))
        .unwrap_or_default()
}

/// Matrix that maps the appearance bounding box (after `matrix`) onto the
/// annotation rectangle.
pub(crate) fn fit_to_rect(bbox: [f64; 4], matrix: Matrix, rect: [f64; 4]) -> Matrix {
    let corners = [
        (bbox[0], bbox[1]),
        (bbox[2], bbox[1]),
        (bbox[2], bbox[3]),
        (bbox[0], bbox[3]),
    ]
    .map(|(x, y)| matrix.transform_point(x as f32, y as f32));

    let min_x = corners.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let max_x = corners.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    let min_y = corners.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_y = corners.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);

    let rx0 = rect[0].min(rect[2]) as f32;
    let rx1 = rect[0].max(rect[2]) as f32;
    let ry0 = rect[1].min(rect[3]) as f32;
    let ry1 = rect[1].max(rect[3]) as f32;

    let sx = if max_x > min_x { (rx1 - rx0) / (max_x - min_x) } else { 1.0 };
    let sy = if max_y > min_y { (ry1 - ry0) / (max_y - min_y) } else { 1.0 };
    Matrix::new(sx, 0.0, 0.0, sy, rx0 - min_x * sx, ry0 - min_y * sy)
}

/// The AcroForm default resources, used by appearances without their own.
fn acroform_resources(doc: &FormDocument) -> Option<&Dictionary> {
    let catalog = doc.inner().get_dictionary(doc.catalog_id().ok()?).ok()?;
    let acroform = doc.get_resolved(catalog, b"AcroForm")?.as_dict().ok()?;
    doc.get_resolved(acroform, b"DR")?.as_dict().ok()
}

/// Look up `name` in one category (`/Font`, `/XObject`, ...) of a resource
/// dictionary.
fn lookup_resource<'a>(
    doc: &'a FormDocument,
    resources: Option<&'a Dictionary>,
    category: &[u8],
    name: &[u8],
) -> Option<&'a Object> {
    let entries = doc.get_resolved(resources?, category)?.as_dict().ok()?;
    entries.get(name).ok()
}

/// Device color from `sc`/`scn` operands, by component count.
fn color_operands(op: &Operation) -> Option<(f32, f32, f32)> {
    // Pattern colors end in a name
    if op.operands.iter().any(|o| o.as_name().is_ok()) {
        return None;
    }
    let values: Vec<f32> = op.operands.iter().filter_map(obj_to_f32).collect();
    match values.as_slice() {
        [gray] => Some((*gray, *gray, *gray)),
        [r, g, b] => Some((*r, *g, *b)),
        [c, m, y, k] => Some(cmyk_to_rgb(*c, *m, *y, *k)),
        _ => None,
    }
}

fn obj_to_f32(obj: &Object) -> Option<f32> {
    obj_to_f64(obj).map(|v| v as f32)
}

fn op_name(op: &Operation, idx: usize) -> Option<&[u8]> {
    op.operands.get(idx)?.as_name().ok()
}

fn op_f32(op: &Operation, idx: usize) -> Option<f32> {
    obj_to_f32(op.operands.get(idx)?)
}

fn op_i64(op: &Operation, idx: usize) -> Option<i64> {
    op_f32(op, idx).map(|v| v as i64)
}

fn op_f32_2(op: &Operation) -> Option<[f32; 2]> {
    Some([op_f32(op, 0)?, op_f32(op, 1)?])
}

fn op_f32_3(op: &Operation) -> Option<[f32; 3]> {
    Some([op_f32(op, 0)?, op_f32(op, 1)?, op_f32(op, 2)?])
}

fn op_f32_4(op: &Operation) -> Option<[f32; 4]> {
    Some([op_f32(op, 0)?, op_f32(op, 1)?, op_f32(op, 2)?, op_f32(op, 3)?])
}

fn op_f32_6(op: &Operation) -> Option<[f32; 6]> {
    Some([
        op_f32(op, 0)?,
        op_f32(op, 1)?,
        op_f32(op, 2)?,
        op_f32(op, 3)?,
        op_f32(op, 4)?,
        op_f32(op, 5)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options() {
        let opts = RenderOptions::default();
        assert_eq!(opts.zoom, 1.0);
        assert!(opts.background.is_some());
        assert!(opts.render_annotations);

        let opts = RenderOptions::with_zoom(2.5).with_transparent_background().without_annotations();
        assert_eq!(opts.zoom, 2.5);
        assert!(opts.background.is_none());
        assert!(!opts.render_annotations);
        assert_eq!(RenderOptions::with_zoom(-1.0).zoom, 1.0);
    }

    #[test]
    fn test_fit_to_rect_scales_and_moves() {
        let m = fit_to_rect([0.0, 0.0, 50.0, 10.0], Matrix::identity(), [100.0, 200.0, 200.0, 220.0]);
        assert_eq!(m.transform_point(0.0, 0.0), (100.0, 200.0));
        assert_eq!(m.transform_point(50.0, 10.0), (200.0, 220.0));
    }

    #[test]
    fn test_fit_to_rect_with_unnormalized_rect() {
        let m = fit_to_rect([0.0, 0.0, 10.0, 10.0], Matrix::identity(), [20.0, 40.0, 10.0, 30.0]);
        assert_eq!(m.transform_point(0.0, 0.0), (10.0, 30.0));
        assert_eq!(m.transform_point(10.0, 10.0), (20.0, 40.0));
    }

    #[test]
    fn test_fit_to_rect_with_rotated_form_matrix() {
        // 90 degree rotation: the 10x20 box becomes 20 wide, 10 tall
        let rotate = Matrix::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        let m = rotate.multiply(&fit_to_rect([0.0, 0.0, 10.0, 20.0], rotate, [0.0, 0.0, 20.0, 10.0]));
        let (x, y) = m.transform_point(10.0, 20.0);
        assert!((x - 0.0).abs() < 1e-4 && (y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_color_operands() {
        let gray = Operation::new("sc", vec![Object::Real(0.5)]);
        assert_eq!(color_operands(&gray), Some((0.5, 0.5, 0.5)));
        let rgb = Operation::new("scn", vec![1.into(), 0.into(), 0.into()]);
        assert_eq!(color_operands(&rgb), Some((1.0, 0.0, 0.0)));
        let pattern = Operation::new("scn", vec![Object::Name(b"P0".to_vec())]);
        assert_eq!(color_operands(&pattern), None);
    }

    #[test]
    fn test_operand_helpers() {
        let op = Operation::new("re", vec![1.into(), Object::Real(2.5), 3.into(), 4.into()]);
        assert_eq!(op_f32_4(&op), Some([1.0, 2.5, 3.0, 4.0]));
        assert_eq!(op_f32_6(&op), None);
        assert_eq!(op_i64(&op, 1), Some(2));
    }
}
