//! Floating point front end.
//!
//! [`ClipperD`] scales decimal input by a power of ten into the integer
//! domain, runs [`Clipper64`] on it, and scales the results back. All
//! rounding happens at that boundary; the sweep itself never sees a
//! floating point coordinate.
use log::debug;

use crate::{
    engine::{ClipType, Clipper64, ClipperOptions, FillRule, PathType, Solution},
    error::{ClipperError, MAX_COORD},
    point::{Path64, PathD, Paths64, PathsD, Point64, PointD},
    polytree::PolyTreeD,
};

/// Largest supported number of decimal places in either direction.
pub const MAX_PRECISION: i32 = 8;

pub type SolutionD = Solution<PointD>;

/// Scale factor for keeping `precision` decimal places.
pub fn precision_scale(precision: i32) -> Result<f64, ClipperError> {
    if precision.abs() > MAX_PRECISION {
        return Err(ClipperError::InvalidPrecision(precision));
    }
    Ok(10f64.powi(precision))
}

/// Scale decimal paths into the integer domain.
///
/// Fails if any scaled coordinate is not finite or exceeds
/// [`MAX_COORD`] in magnitude.
pub fn scale_paths(paths: &[PathD], scale: f64) -> Result<Paths64, ClipperError> {
    let max = MAX_COORD as f64;
    paths
        .iter()
        .map(|path| {
            path.iter()
                .map(|&pt| {
                    let (x, y) = (pt.x * scale, pt.y * scale);
                    if x.is_finite() && y.is_finite() && x.abs() <= max && y.abs() <= max {
                        Ok(Point64::from_scaled(pt, scale))
                    } else {
                        Err(ClipperError::CoordinateOutOfRange)
                    }
                })
                .collect::<Result<Path64, _>>()
        })
        .collect()
}

/// Scale integer paths back out by `1 / scale`.
pub fn unscale_paths(paths: &[Path64], scale: f64) -> PathsD {
    let inv_scale = scale.recip();
    paths
        .iter()
        .map(|path| path.iter().map(|&pt| PointD::from_scaled(pt, inv_scale)).collect())
        .collect()
}

/// Boolean clipping over decimal coordinates.
///
/// ```rust
/// use geo_clipping::{make_path_d, ClipType, ClipperD, FillRule};
///
/// let mut clipper = ClipperD::new(2).unwrap();
/// clipper.add_subject(&[make_path_d(&[0., 0., 1.5, 0., 1.5, 1.5, 0., 1.5])]).unwrap();
/// clipper.add_clip(&[make_path_d(&[0.5, 0.5, 2., 0.5, 2., 2., 0.5, 2.])]).unwrap();
/// let solution = clipper.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
/// assert_eq!(solution.closed.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ClipperD {
    inner: Clipper64,
    scale: f64,
}

impl ClipperD {
    /// A clipper keeping `precision` decimal places (`-8..=8`).
    pub fn new(precision: i32) -> Result<Self, ClipperError> {
        Self::with_options(precision, ClipperOptions::default())
    }

    pub fn with_options(precision: i32, options: ClipperOptions) -> Result<Self, ClipperError> {
        Ok(ClipperD {
            inner: Clipper64::with_options(options),
            scale: precision_scale(precision)?,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn options(&self) -> &ClipperOptions {
        self.inner.options()
    }

    pub fn options_mut(&mut self) -> &mut ClipperOptions {
        self.inner.options_mut()
    }

    pub fn add_subject(&mut self, paths: &[PathD]) -> Result<(), ClipperError> {
        self.add_paths(paths, PathType::Subject, false)
    }

    pub fn add_open_subject(&mut self, paths: &[PathD]) -> Result<(), ClipperError> {
        self.add_paths(paths, PathType::Subject, true)
    }

    pub fn add_clip(&mut self, paths: &[PathD]) -> Result<(), ClipperError> {
        self.add_paths(paths, PathType::Clip, false)
    }

    /// Scale and add `paths`. Nothing is added if any coordinate is out
    /// of range.
    pub fn add_paths(&mut self, paths: &[PathD], path_type: PathType, is_open: bool) -> Result<(), ClipperError> {
        let scaled = scale_paths(paths, self.scale)?;
        self.inner.add_paths(&scaled, path_type, is_open)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn execute(&mut self, clip_type: ClipType, fill_rule: FillRule) -> Result<SolutionD, ClipperError> {
        let solution = self.inner.execute(clip_type, fill_rule)?;
        Ok(Solution {
            closed: unscale_paths(&solution.closed, self.scale),
            open: unscale_paths(&solution.open, self.scale),
        })
    }

    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        fill_rule: FillRule,
    ) -> Result<(PolyTreeD, PathsD), ClipperError> {
        let (tree, open) = self.inner.execute_tree(clip_type, fill_rule)?;
        let inv_scale = self.scale.recip();
        debug!("scaling tree of {n} polygons by {inv_scale}", n = tree.len());
        let tree = tree.map(|&pt| PointD::from_scaled(pt, inv_scale));
        Ok((tree, unscale_paths(&open, self.scale)))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{engine::tests::init_log, point::make_path_d, primitives::area_of_paths};

    #[test]
    fn test_precision_range() {
        assert!(ClipperD::new(8).is_ok());
        assert!(ClipperD::new(-8).is_ok());
        assert_eq!(ClipperD::new(9).unwrap_err(), ClipperError::InvalidPrecision(9));
        assert_eq!(ClipperD::new(-9).unwrap_err(), ClipperError::InvalidPrecision(-9));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut clipper = ClipperD::new(8).unwrap();
        let huge = make_path_d(&[0., 0., 1e12, 0., 1e12, 1e12]);
        assert_eq!(
            clipper.add_subject(&[huge]),
            Err(ClipperError::CoordinateOutOfRange)
        );
        let nan = make_path_d(&[0., 0., f64::NAN, 0., 1., 1.]);
        assert!(clipper.add_clip(&[nan]).is_err());
        let sol = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert!(sol.closed.is_empty());
    }

    #[test]
    fn test_decimal_intersection() {
        init_log();
        let mut clipper = ClipperD::new(4).unwrap();
        clipper
            .add_subject(&[make_path_d(&[0., 0., 1.5, 0., 1.5, 1.5, 0., 1.5])])
            .unwrap();
        clipper
            .add_clip(&[make_path_d(&[0.5, 0.5, 2., 0.5, 2., 2., 0.5, 2.])])
            .unwrap();
        let sol = clipper
            .execute(ClipType::Intersection, FillRule::NonZero)
            .unwrap();
        assert_eq!(sol.closed.len(), 1);
        assert_relative_eq!(area_of_paths(&sol.closed), 1., epsilon = 1e-9);

        let (tree, open) = clipper
            .execute_tree(ClipType::Union, FillRule::NonZero)
            .unwrap();
        assert!(open.is_empty());
        assert_eq!(tree.len(), 1);
        assert_relative_eq!(tree.root().area(), 2.25 + 2.25 - 1., epsilon = 1e-9);
    }

    #[test]
    fn test_rounding_to_precision() {
        let mut clipper = ClipperD::new(1).unwrap();
        clipper
            .add_subject(&[make_path_d(&[0.04, 0., 1.06, 0., 1.06, 1., 0.04, 1.])])
            .unwrap();
        let sol = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
        // Snapped to one decimal place: x spans 0.0 to 1.1.
        assert_relative_eq!(area_of_paths(&sol.closed), 1.1, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_precision() {
        let mut clipper = ClipperD::new(-2).unwrap();
        clipper
            .add_subject(&[make_path_d(&[0., 0., 1000., 0., 1000., 1000., 0., 1000.])])
            .unwrap();
        let sol = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_relative_eq!(area_of_paths(&sol.closed), 1e6, epsilon = 1e-6);
    }
}
