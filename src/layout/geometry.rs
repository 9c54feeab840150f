//! Pure rectangle and size math for grid layout.
//!
//! All functions here are pure and testable without any view hierarchy.
//! Coordinates follow screen conventions: origin top-left, y grows downward.

/// A width/height pair in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Shrink the rectangle by `dx` on the left and right and `dy` on the
    /// top and bottom, keeping it centered.
    ///
    /// Insets larger than half a side collapse that side to zero.
    ///
    /// ```
    /// # use masonry_gallery::layout::Rect;
    /// let r = Rect::new(0.0, 0.0, 100.0, 50.0).inset_by(6.0, 6.0);
    /// assert_eq!(r, Rect::new(6.0, 6.0, 88.0, 38.0));
    /// ```
    pub fn inset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width - 2.0 * dx).max(0.0),
            height: (self.height - 2.0 * dy).max(0.0),
        }
    }

    /// True when the two rectangles share interior area.
    ///
    /// Rectangles that only touch along an edge do not intersect, and an
    /// empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }
}
