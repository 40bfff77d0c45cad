use std::ops::{Add, Neg, Sub};

/// A point in the exact integer coordinate domain used by the sweep.
///
/// The sweep treats `y` as growing downwards: local minima are the
/// vertices with the locally largest `y`, and scanlines are consumed
/// from the largest `y` to the smallest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point64 {
    pub x: i64,
    pub y: i64,
}

impl Point64 {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Point64 { x, y }
    }

    /// Scale a decimal point into the integer domain, rounding to the
    /// nearest integer.
    #[inline]
    pub fn from_scaled(pt: PointD, scale: f64) -> Self {
        Point64 {
            x: (pt.x * scale).round() as i64,
            y: (pt.y * scale).round() as i64,
        }
    }
}

impl From<(i64, i64)> for Point64 {
    #[inline]
    fn from((x, y): (i64, i64)) -> Self {
        Point64 { x, y }
    }
}

impl From<[i64; 2]> for Point64 {
    #[inline]
    fn from([x, y]: [i64; 2]) -> Self {
        Point64 { x, y }
    }
}

impl Add for Point64 {
    type Output = Point64;
    fn add(self, rhs: Self) -> Self::Output {
        Point64::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point64 {
    type Output = Point64;
    fn sub(self, rhs: Self) -> Self::Output {
        Point64::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point64 {
    type Output = Point64;
    fn neg(self) -> Self::Output {
        Point64::new(-self.x, -self.y)
    }
}

/// A point with double precision coordinates, used by the decimal
/// front end ([`crate::ClipperD`]).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

impl PointD {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        PointD { x, y }
    }

    /// Scale an integer point back out to the decimal domain.
    #[inline]
    pub fn from_scaled(pt: Point64, inv_scale: f64) -> Self {
        PointD {
            x: pt.x as f64 * inv_scale,
            y: pt.y as f64 * inv_scale,
        }
    }
}

impl From<(f64, f64)> for PointD {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        PointD { x, y }
    }
}

impl From<[f64; 2]> for PointD {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        PointD { x, y }
    }
}

/// Read access to the coordinates of either point type as `f64`.
///
/// Used by the helpers that are shared between the integer and the
/// decimal domain (area, orientation, polytree area).
pub trait XY: Copy {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl XY for Point64 {
    #[inline]
    fn x(&self) -> f64 {
        self.x as f64
    }
    #[inline]
    fn y(&self) -> f64 {
        self.y as f64
    }
}

impl XY for PointD {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }
    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
}

pub type Path64 = Vec<Point64>;
pub type Paths64 = Vec<Path64>;
pub type PathD = Vec<PointD>;
pub type PathsD = Vec<PathD>;

/// Build a [`Path64`] from a flat list of `x, y` pairs.
///
/// A trailing odd coordinate is ignored.
pub fn make_path(coords: &[i64]) -> Path64 {
    coords
        .chunks_exact(2)
        .map(|c| Point64::new(c[0], c[1]))
        .collect()
}

/// Build a [`PathD`] from a flat list of `x, y` pairs.
pub fn make_path_d(coords: &[f64]) -> PathD {
    coords
        .chunks_exact(2)
        .map(|c| PointD::new(c[0], c[1]))
        .collect()
}
