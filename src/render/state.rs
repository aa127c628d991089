//! Graphics state for content stream execution.
//!
//! Tracks the transformation, colors, line style, clip and text parameters
//! that `q`/`Q` save and restore.

use std::rc::Rc;
use tiny_skia::{BlendMode, Mask, Transform};

use super::font::PdfFont;

/// A 2D transformation matrix in PDF row-vector form:
///
/// ```text
/// [ a  b  0 ]
/// [ c  d  0 ]
/// [ e  f  1 ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling component
    pub a: f32,
    /// Rotation/skew component
    pub b: f32,
    /// Rotation/skew component
    pub c: f32,
    /// Vertical scaling component
    pub d: f32,
    /// Horizontal translation
    pub e: f32,
    /// Vertical translation
    pub f: f32,
}

impl Matrix {
    /// The identity matrix.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Matrix from its six operands, in content-stream order.
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Pure translation.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Pure scaling.
    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// `self × other`: a point is mapped by `self` first, then by `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_formkit::render::Matrix;
    ///
    /// let m = Matrix::scaling(2.0, 2.0).multiply(&Matrix::translation(10.0, 0.0));
    /// assert_eq!(m.transform_point(1.0, 1.0), (12.0, 2.0));
    /// ```
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Map a point.
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Read a six-number array such as a form's `/Matrix`.
    pub fn from_array(values: &[f32]) -> Option<Self> {
        match values {
            [a, b, c, d, e, f, ..] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// The equivalent `tiny-skia` transform.
    pub fn to_transform(&self) -> Transform {
        Transform::from_row(self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Parameters that affect painting.
#[derive(Clone)]
pub(crate) struct GraphicsState {
    pub ctm: Matrix,
    pub fill_rgb: (f32, f32, f32),
    pub stroke_rgb: (f32, f32, f32),
    pub fill_alpha: f32,
    pub stroke_alpha: f32,
    pub line_width: f32,
    pub line_cap: u8,
    pub line_join: u8,
    pub miter_limit: f32,
    pub dash_pattern: (Vec<f32>, f32),
    pub blend_mode: BlendMode,
    /// Device-space clip; `None` means the whole pixmap
    pub clip: Option<Rc<Mask>>,

    pub text_matrix: Matrix,
    pub text_line_matrix: Matrix,
    pub font: Option<Rc<PdfFont>>,
    pub font_size: f32,
    pub char_space: f32,
    pub word_space: f32,
    /// `Tz / 100`
    pub horizontal_scaling: f32,
    pub leading: f32,
    pub text_rise: f32,
    pub render_mode: u8,
}

impl GraphicsState {
    pub fn new() -> Self {
        Self {
            ctm: Matrix::identity(),
            fill_rgb: (0.0, 0.0, 0.0),
            stroke_rgb: (0.0, 0.0, 0.0),
            fill_alpha: 1.0,
            stroke_alpha: 1.0,
            line_width: 1.0,
            line_cap: 0,
            line_join: 0,
            miter_limit: 10.0,
            dash_pattern: (Vec::new(), 0.0),
            blend_mode: BlendMode::SourceOver,
            clip: None,
            text_matrix: Matrix::identity(),
            text_line_matrix: Matrix::identity(),
            font: None,
            font_size: 12.0,
            char_space: 0.0,
            word_space: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            text_rise: 0.0,
            render_mode: 0,
        }
    }

    /// Text rendering modes 3 and 7 paint nothing.
    pub fn text_is_invisible(&self) -> bool {
        self.render_mode == 3 || self.render_mode == 7
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Stack of saved graphics states (`q`/`Q`).
///
/// The current state lives outside the vector, so there is always one.
#[derive(Clone, Default)]
pub(crate) struct GraphicsStateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl GraphicsStateStack {
    pub fn with_state(state: GraphicsState) -> Self {
        Self {
            current: state,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Unbalanced `Q` is ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }
}
