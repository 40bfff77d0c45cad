//! Boolean clipping of polygons and polylines.
//!
//! 1. [Clipping](#clipping)
//! 1. [Nested output](#nested-output)
//! 1. [Decimal coordinates](#decimal-coordinates)
//!
//! # Clipping
//!
//! This is an implementation of Vatti's sweep-line clipping algorithm
//! computing the intersection, union, difference or exclusive-or of
//! two sets of polygons (the *subject* and the *clip*). Inputs may
//! self-intersect, overlap each other and contain holes; which regions
//! count as filled is decided by a [`FillRule`]. Open paths may be
//! added as subjects and are clipped against the closed regions.
//!
//! All computation happens on 64-bit integer coordinates, so results
//! are exact up to the rounding of intersection points onto the grid.
//!
//! ## Usage
//!
//! Add paths to a [`Clipper64`] and execute it with the desired
//! operation. The geometry is kept, so the same clipper can be run
//! several times.
//!
//! ```rust
//! use geo_clipping::{make_path, area_of_paths, ClipType, Clipper64, FillRule};
//!
//! let mut clipper = Clipper64::new();
//! clipper.add_subject(&[make_path(&[0, 0, 10, 0, 10, 10, 0, 10])]).unwrap();
//! clipper.add_clip(&[make_path(&[5, 5, 15, 5, 15, 15, 5, 15])]).unwrap();
//!
//! let union = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
//! assert_eq!(area_of_paths(&union.closed), 175.);
//! let inter = clipper.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
//! assert_eq!(area_of_paths(&inter.closed), 25.);
//! ```
//!
//! The functions in [`ops`] wrap the common one-shot cases.
//!
//! # Nested output
//!
//! [`Clipper64::execute_tree`] returns a [`PolyTree`] in which each
//! ring is a child of the ring containing it. Depth parity tells outer
//! rings from holes. The [`BooleanOp`] trait uses this to produce
//! [`geo::MultiPolygon`] results from [`geo`] polygons.
//!
//! # Decimal coordinates
//!
//! [`ClipperD`] accepts `f64` coordinates, scaling them by a power of
//! ten into the integer domain and back.
mod point;
pub use point::{make_path, make_path_d, Path64, PathD, Paths64, PathsD, Point64, PointD, XY};

mod rect;
pub use rect::{Rect64, RectD};

pub mod primitives;
pub use primitives::{area, area_of_paths, is_positive, PointInPolygon};

mod error;
pub use error::{ClipperError, MAX_COORD};

mod vertex;
mod events;
mod active;
mod outrec;

mod engine;
pub use engine::{ClipType, Clipper64, ClipperOptions, FillRule, PathType, Solution, Solution64};

pub mod polytree;
pub use polytree::{PolyPath, PolyTree, PolyTree64, PolyTreeD};

pub mod decimal;
pub use decimal::{ClipperD, SolutionD};

pub mod ops;

pub mod bops;
pub use bops::BooleanOp;

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
