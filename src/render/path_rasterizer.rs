//! Path rasterizer - paints content-stream paths with tiny-skia.

use super::state::GraphicsState;
use super::{create_fill_paint, create_stroke_paint};
use std::rc::Rc;
use tiny_skia::{FillRule, LineCap, LineJoin, Mask, Path, Pixmap, Stroke, StrokeDash, Transform};

/// Painter for filled and stroked paths, honoring the clip.
#[derive(Debug, Default)]
pub(crate) struct PathRasterizer;

impl PathRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Fill a path with the current fill color.
    pub fn fill_path(
        &self,
        pixmap: &mut Pixmap,
        path: &Path,
        transform: Transform,
        gs: &GraphicsState,
        fill_rule: FillRule,
    ) {
        let paint = create_fill_paint(gs);
        pixmap.fill_path(path, &paint, fill_rule, transform, gs.clip.as_deref());
    }

    /// Stroke a path with the current stroke color and line style.
    pub fn stroke_path(&self, pixmap: &mut Pixmap, path: &Path, transform: Transform, gs: &GraphicsState) {
        let paint = create_stroke_paint(gs);

        let (array, phase) = &gs.dash_pattern;
        let dash = if array.is_empty() {
            None
        } else {
            // tiny-skia wants an even number of entries
            let mut array = array.clone();
            if array.len() % 2 == 1 {
                array.extend_from_within(..);
            }
            StrokeDash::new(array, *phase)
        };

        // Zero width is a hairline
        let stroke = Stroke {
            width: gs.line_width.max(0.0),
            line_cap: line_cap(gs.line_cap),
            line_join: line_join(gs.line_join),
            miter_limit: gs.miter_limit,
            dash,
        };

        pixmap.stroke_path(path, &paint, &stroke, transform, gs.clip.as_deref());
    }

    /// Intersect the current clip with `path`.
    ///
    /// Returns the new clip, or `None` when a mask cannot be allocated.
    pub fn clip_to(
        &self,
        pixmap: &Pixmap,
        current: Option<&Rc<Mask>>,
        path: &Path,
        transform: Transform,
        fill_rule: FillRule,
    ) -> Option<Rc<Mask>> {
        let mask = match current {
            Some(mask) => {
                let mut mask = Mask::clone(mask);
                mask.intersect_path(path, fill_rule, true, transform);
                mask
            },
            None => {
                let mut mask = Mask::new(pixmap.width(), pixmap.height())?;
                mask.fill_path(path, fill_rule, true, transform);
                mask
            },
        };
        Some(Rc::new(mask))
    }
}

fn line_cap(cap: u8) -> LineCap {
    match cap {
        1 => LineCap::Round,
        2 => LineCap::Square,
        _ => LineCap::Butt,
    }
}

fn line_join(join: u8) -> LineJoin {
    match join {
        1 => LineJoin::Round,
        2 => LineJoin::Bevel,
        _ => LineJoin::Miter,
    }
}
