//! Geometric primitives for field rectangles.
//!
//! PDF stores widget rectangles in user space with the origin at the
//! bottom-left of the page. Everything in this crate works in *page space*:
//! origin at the top-left corner of the page box, y growing downward. This is
//! the space the field record is written in and the space the visualizers
//! draw in (after multiplying by the zoom factor).

use serde::{Deserialize, Serialize};

/// Round a coordinate to two decimal places.
///
/// # Examples
///
/// ```
/// use pdf_formkit::geometry::round2;
///
/// assert_eq!(round2(12.3456), 12.35);
/// assert_eq!(round2(-0.004), 0.0);
/// ```
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid serializing "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// An axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl Rect {
    /// Create a rectangle from two corners, normalizing so that
    /// `x0 <= x1` and `y0 <= y1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_formkit::geometry::Rect;
    ///
    /// let rect = Rect::new(110.0, 70.0, 10.0, 20.0);
    /// assert_eq!(rect.x0, 10.0);
    /// assert_eq!(rect.y0, 20.0);
    /// assert_eq!(rect.width(), 100.0);
    /// assert_eq!(rect.height(), 50.0);
    /// ```
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Copy with every coordinate rounded to two decimals.
    pub fn rounded(&self) -> Self {
        Self::new(round2(self.x0), round2(self.y0), round2(self.x1), round2(self.y1))
    }

    /// Scale every coordinate (used for rasterized output at a zoom factor).
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x0 * factor, self.y0 * factor, self.x1 * factor, self.y1 * factor)
    }

    /// True when both sides are strictly below `limit`.
    pub fn fits_within(&self, limit: f64) -> bool {
        self.width() < limit && self.height() < limit
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rect({}, {}, {}, {})", self.x0, self.y0, self.x1, self.y1)
    }
}

/// Page box of a PDF page in PDF user space (bottom-left origin).
///
/// Used to convert between PDF user space and page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Lower-left x
    pub llx: f64,
    /// Lower-left y
    pub lly: f64,
    /// Upper-right x
    pub urx: f64,
    /// Upper-right y
    pub ury: f64,
}

impl PageBox {
    /// US Letter, used when a page carries no usable box.
    pub const LETTER: PageBox = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    /// Create a page box from a `[llx lly urx ury]` array, normalizing corners.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    /// Page width.
    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    /// Page height.
    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Convert a PDF user-space rectangle (`/Rect` array order) to page space.
    pub fn to_page_space(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0 - self.llx, self.ury - y0, x1 - self.llx, self.ury - y1)
    }

    /// Convert a page-space point back to PDF user space.
    pub fn to_user_space(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.llx, self.ury - y)
    }
}

impl Default for PageBox {
    fn default() -> Self {
        Self::LETTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(99.994), 99.99);
        assert_eq!(round2(-3.14159), -3.14);
    }

    #[test]
    fn test_fits_within() {
        assert!(Rect::new(0.0, 0.0, 15.0, 15.0).fits_within(30.0));
        assert!(!Rect::new(0.0, 0.0, 200.0, 20.0).fits_within(30.0));
        assert!(!Rect::new(0.0, 0.0, 30.0, 10.0).fits_within(30.0));
    }

    #[test]
    fn test_page_space_round_trip_point() {
        let page = PageBox::new(0.0, 0.0, 612.0, 792.0);
        let rect = page.to_page_space(100.0, 700.0, 200.0, 720.0);
        assert_eq!(rect, Rect::new(100.0, 72.0, 200.0, 92.0));
        assert_eq!(page.to_user_space(100.0, 72.0), (100.0, 720.0));
    }

    #[test]
    fn test_page_space_with_offset_box() {
        let page = PageBox::new(10.0, 20.0, 622.0, 812.0);
        let rect = page.to_page_space(10.0, 812.0, 20.0, 802.0);
        assert_eq!(rect, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    proptest! {
        #[test]
        fn prop_rect_is_normalized(
            a in -1000.0f64..1000.0,
            b in -1000.0f64..1000.0,
            c in -1000.0f64..1000.0,
            d in -1000.0f64..1000.0,
        ) {
            let rect = Rect::new(a, b, c, d).rounded();
            prop_assert!(rect.x0 <= rect.x1);
            prop_assert!(rect.y0 <= rect.y1);
            prop_assert!(rect.width() >= 0.0);
            prop_assert_eq!(round2(rect.x0), rect.x0);
            prop_assert_eq!(round2(rect.y1), rect.y1);
        }
    }
}
