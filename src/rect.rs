use crate::point::{Point64, PointD};

/// Axis aligned rectangle in the integer domain.
///
/// `top` is the smaller `y` and `bottom` the larger one, matching the
/// downward orientation of the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect64 {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Rect64 {
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Rect64 {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A rectangle that any point will grow; the starting value when
    /// accumulating bounds.
    pub(crate) const fn inverted() -> Self {
        Rect64 {
            left: i64::MAX,
            top: i64::MAX,
            right: i64::MIN,
            bottom: i64::MIN,
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// A rectangle is empty if it has no interior.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    #[inline]
    pub fn mid_point(&self) -> Point64 {
        Point64::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    /// Checks if `pt` lies strictly inside.
    #[inline]
    pub fn contains_point(&self, pt: Point64) -> bool {
        pt.x > self.left && pt.x < self.right && pt.y > self.top && pt.y < self.bottom
    }

    /// Checks if `rec` lies inside (edges may touch).
    #[inline]
    pub fn contains_rect(&self, rec: &Rect64) -> bool {
        rec.left >= self.left
            && rec.right <= self.right
            && rec.top >= self.top
            && rec.bottom <= self.bottom
    }

    #[inline]
    pub(crate) fn grow(&mut self, pt: Point64) {
        self.left = self.left.min(pt.x);
        self.right = self.right.max(pt.x);
        self.top = self.top.min(pt.y);
        self.bottom = self.bottom.max(pt.y);
    }

    /// Corner points, clockwise on screen starting at the top-left.
    pub fn as_path(&self) -> Vec<Point64> {
        vec![
            Point64::new(self.left, self.top),
            Point64::new(self.right, self.top),
            Point64::new(self.right, self.bottom),
            Point64::new(self.left, self.bottom),
        ]
    }
}

/// Axis aligned rectangle in the decimal domain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectD {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectD {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        RectD {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    #[inline]
    pub fn mid_point(&self) -> PointD {
        PointD::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    #[inline]
    pub fn contains_rect(&self, rec: &RectD) -> bool {
        rec.left >= self.left
            && rec.right <= self.right
            && rec.top >= self.top
            && rec.bottom <= self.bottom
    }
}
