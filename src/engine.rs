//! The integer-domain clipping engine.
//!
//! [`Clipper64`] accumulates subject and clip geometry and runs a
//! Vatti-style sweep over it on every call to [`Clipper64::execute`].
//! The sweep moves a horizontal line from the largest `y` to the
//! smallest, keeping the edges it crosses in a list ordered by `x`, and
//! decides at every crossing whether the region on either side belongs
//! to the requested Boolean combination.
//!
//! ## Usage
//!
//! ```rust
//! use geo_clipping::{make_path, ClipType, Clipper64, FillRule};
//!
//! let mut clipper = Clipper64::new();
//! clipper.add_subject(&[make_path(&[0, 0, 100, 0, 100, 100, 0, 100])]).unwrap();
//! clipper.add_clip(&[make_path(&[50, 50, 150, 50, 150, 150, 50, 150])]).unwrap();
//! let solution = clipper.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
//! assert_eq!(solution.closed.len(), 1);
//! ```
use log::debug;

use crate::{
    error::{ClipperError, MAX_COORD},
    point::{Path64, Paths64, Point64},
    polytree::PolyTree64,
    vertex::InputGeometry,
};

mod assemble;
mod horizontal;
mod intersect;
mod output;
mod sweep;
mod winding;

use sweep::Sweep;

/// Boolean operation applied to the subject and clip regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipType {
    Intersection,
    Union,
    Difference,
    Xor,
}

/// Rule deciding which winding numbers count as "inside".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillRule {
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

/// Role of an input path in the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathType {
    Subject,
    Clip,
}

/// Flags read at the start of every `execute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipperOptions {
    /// Keep vertices that are collinear with their neighbours. Spikes
    /// that double back on themselves are removed either way.
    pub preserve_collinear: bool,
    /// Emit rings with the opposite orientation (outer rings negative).
    pub reverse_solution: bool,
}

impl Default for ClipperOptions {
    fn default() -> Self {
        ClipperOptions {
            preserve_collinear: true,
            reverse_solution: false,
        }
    }
}

/// Output of a flat `execute` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<P> {
    /// Closed rings. Outer rings have positive area unless
    /// [`ClipperOptions::reverse_solution`] is set.
    pub closed: Vec<Vec<P>>,
    /// Clipped open paths.
    pub open: Vec<Vec<P>>,
}

impl<P> Default for Solution<P> {
    fn default() -> Self {
        Solution {
            closed: Vec::new(),
            open: Vec::new(),
        }
    }
}

pub type Solution64 = Solution<Point64>;

/// Boolean clipping over integer coordinates.
///
/// Input accumulates across `add_*` calls and survives `execute`, so
/// the same geometry may be combined several ways. Call
/// [`clear`](Self::clear) to start over.
#[derive(Debug, Clone, Default)]
pub struct Clipper64 {
    input: InputGeometry,
    options: ClipperOptions,
}

impl Clipper64 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ClipperOptions) -> Self {
        Clipper64 {
            input: InputGeometry::default(),
            options,
        }
    }

    pub fn options(&self) -> &ClipperOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ClipperOptions {
        &mut self.options
    }

    pub fn add_subject(&mut self, paths: &[Path64]) -> Result<(), ClipperError> {
        self.add_paths(paths, PathType::Subject, false)
    }

    pub fn add_open_subject(&mut self, paths: &[Path64]) -> Result<(), ClipperError> {
        self.add_paths(paths, PathType::Subject, true)
    }

    pub fn add_clip(&mut self, paths: &[Path64]) -> Result<(), ClipperError> {
        self.add_paths(paths, PathType::Clip, false)
    }

    /// Add paths with an explicit role. Open clip paths are not
    /// supported and are ignored.
    ///
    /// Coordinates must not exceed [`MAX_COORD`] in magnitude; otherwise
    /// nothing is added and [`ClipperError::CoordinateOutOfRange`] is
    /// returned.
    pub fn add_paths(&mut self, paths: &[Path64], path_type: PathType, is_open: bool) -> Result<(), ClipperError> {
        let limit = MAX_COORD as u64;
        if paths
            .iter()
            .flatten()
            .any(|pt| pt.x.unsigned_abs() > limit || pt.y.unsigned_abs() > limit)
        {
            return Err(ClipperError::CoordinateOutOfRange);
        }
        if is_open && path_type == PathType::Clip {
            debug!("ignoring {n} open clip paths", n = paths.len());
            return Ok(());
        }
        self.input.add_paths(paths, path_type, is_open);
        Ok(())
    }

    /// Drop all accumulated input.
    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Run the sweep and return the flat solution.
    pub fn execute(&mut self, clip_type: ClipType, fill_rule: FillRule) -> Result<Solution64, ClipperError> {
        let mut sweep = self.start(clip_type, fill_rule, false)?;
        let (closed, open) = sweep.build_paths();
        debug!(
            "{clip_type:?}/{fill_rule:?}: {c} closed, {o} open paths",
            c = closed.len(),
            o = open.len()
        );
        Ok(Solution { closed, open })
    }

    /// Run the sweep and nest the closed rings into a [`PolyTree64`].
    ///
    /// Open paths cannot nest and are returned alongside the tree.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        fill_rule: FillRule,
    ) -> Result<(PolyTree64, Paths64), ClipperError> {
        let mut sweep = self.start(clip_type, fill_rule, true)?;
        let (tree, open) = sweep.build_tree();
        debug!(
            "{clip_type:?}/{fill_rule:?}: tree of {n} polygons, {o} open paths",
            n = tree.len(),
            o = open.len()
        );
        Ok((tree, open))
    }

    fn start(
        &mut self,
        clip_type: ClipType,
        fill_rule: FillRule,
        using_polytree: bool,
    ) -> Result<Sweep<'_>, ClipperError> {
        self.input.sort_minima();
        debug!(
            "executing {clip_type:?} with {fill_rule:?} over {n} local minima",
            n = self.input.minima.len()
        );
        let mut sweep = Sweep::new(&self.input, clip_type, fill_rule, &self.options, using_polytree);
        if sweep.execute() {
            Ok(sweep)
        } else {
            debug!("sweep failed; discarding partial output");
            Err(ClipperError::ExecutionFailed)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        point::make_path,
        primitives::{area, area_of_paths, bounds, point_in_polygon, reverse_paths, PointInPolygon},
        random::random_polygons,
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    pub(crate) fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn square(x: i64, y: i64, size: i64) -> Path64 {
        make_path(&[x, y, x + size, y, x + size, y + size, x, y + size])
    }

    fn run(ct: ClipType, fr: FillRule, subjects: &[Path64], clips: &[Path64]) -> Solution64 {
        let mut clipper = Clipper64::new();
        clipper.add_subject(subjects).unwrap();
        clipper.add_clip(clips).unwrap();
        clipper.execute(ct, fr).unwrap()
    }

    #[test]
    fn test_union_with_self() {
        init_log();
        let sq = make_path(&[0, 0, 0, 5, 5, 5, 5, 0]);
        let sol = run(ClipType::Union, FillRule::NonZero, &[sq.clone()], &[sq]);
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(sol.closed[0].len(), 4);
        assert_eq!(area(&sol.closed[0]), 25.);
        assert!(sol.open.is_empty());
    }

    #[test]
    fn test_intersection_positive() {
        init_log();
        let a = square(0, 0, 100);
        let b = square(50, 50, 100);
        let sol = run(ClipType::Intersection, FillRule::Positive, &[a.clone()], &[b.clone()]);
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(area(&sol.closed[0]), 2500.);
        let mut pts = sol.closed[0].clone();
        pts.sort();
        assert_eq!(pts, make_path(&[50, 50, 50, 100, 100, 50, 100, 100]));

        // Clockwise input has winding -1 everywhere inside, which the
        // positive rule treats as outside; the negative rule picks it up.
        let cw = reverse_paths(&[a, b]);
        let sol = run(ClipType::Intersection, FillRule::Positive, &cw[..1], &cw[1..]);
        assert!(sol.closed.is_empty());
        let sol = run(ClipType::Intersection, FillRule::Negative, &cw[..1], &cw[1..]);
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(area(&sol.closed[0]), 2500.);
    }

    #[test]
    fn test_difference_fully_covered() {
        init_log();
        let sol = run(
            ClipType::Difference,
            FillRule::NonZero,
            &[square(0, 0, 10)],
            &[square(-5, -5, 20)],
        );
        assert!(sol.closed.is_empty());
    }

    #[test]
    fn test_xor_overlapping() {
        init_log();
        let sol = run(
            ClipType::Xor,
            FillRule::NonZero,
            &[square(0, 0, 5)],
            &[square(1, 1, 5)],
        );
        assert!(!sol.closed.is_empty());
        assert_eq!(area_of_paths(&sol.closed), 2. * 25. - 2. * 16.);
    }

    #[test]
    fn test_reverse_solution() {
        init_log();
        let mut clipper = Clipper64::with_options(ClipperOptions {
            reverse_solution: true,
            ..Default::default()
        });
        clipper.add_subject(&[square(0, 0, 10)]).unwrap();
        let sol = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(area(&sol.closed[0]), -100.);
    }

    #[test]
    fn test_hole_preserved() {
        init_log();
        let outer = square(0, 0, 100);
        let hole = make_path(&[25, 25, 25, 75, 75, 75, 75, 25]);
        let sol = run(ClipType::Union, FillRule::NonZero, &[outer, hole], &[]);
        assert_eq!(sol.closed.len(), 2);
        assert_eq!(area_of_paths(&sol.closed), 10000. - 2500.);
    }

    #[test]
    fn test_polytree_nesting() {
        init_log();
        let mut clipper = Clipper64::new();
        clipper.add_subject(&[
            square(0, 0, 100),
            make_path(&[10, 10, 10, 90, 90, 90, 90, 10]),
            square(20, 20, 60),
            make_path(&[30, 30, 30, 70, 70, 70, 70, 30]),
        ]).unwrap();
        let (tree, open) = clipper
            .execute_tree(ClipType::Union, FillRule::NonZero)
            .unwrap();
        assert!(open.is_empty());
        assert_eq!(tree.len(), 4);
        let root = tree.root();
        assert_eq!(root.child_count(), 1);
        let outer = root.children().next().unwrap();
        assert!(!outer.is_hole());
        let hole = outer.children().next().unwrap();
        assert!(hole.is_hole());
        let island = hole.children().next().unwrap();
        assert_eq!(island.level(), 3);
        assert_eq!(island.child_count(), 1);
        assert!(tree.check_children_contained());
        assert_relative_eq!(root.area(), 10000. - 6400. + 3600. - 1600.);
    }

    #[test]
    fn test_polytree_reversed_input() {
        init_log();
        let squares = reverse_paths(&[square(0, 0, 10), square(5, 5, 10)]);
        assert!(area(&squares[0]) < 0.);

        let mut clipper = Clipper64::new();
        clipper.add_subject(&squares).unwrap();
        let (tree, _) = clipper
            .execute_tree(ClipType::Union, FillRule::NonZero)
            .unwrap();
        let first = tree.root().children().next().unwrap();
        assert_eq!(first.area(), 175.);

        clipper.options_mut().reverse_solution = true;
        let (tree, _) = clipper
            .execute_tree(ClipType::Union, FillRule::NonZero)
            .unwrap();
        let first = tree.root().children().next().unwrap();
        assert_eq!(first.area(), -175.);
    }

    #[test]
    fn test_open_path_clipping() {
        init_log();
        let mut clipper = Clipper64::new();
        clipper.add_open_subject(&[make_path(&[-10, 2, 20, 8])]).unwrap();
        clipper.add_clip(&[square(0, 0, 10)]).unwrap();

        let sol = clipper
            .execute(ClipType::Intersection, FillRule::NonZero)
            .unwrap();
        assert!(sol.closed.is_empty());
        assert_eq!(sol.open.len(), 1);
        let mut line = sol.open[0].clone();
        line.sort();
        assert_eq!(line, make_path(&[0, 4, 10, 6]));

        let sol = clipper
            .execute(ClipType::Difference, FillRule::NonZero)
            .unwrap();
        assert_eq!(sol.open.len(), 2);
    }

    #[test]
    fn test_degenerate_input() {
        init_log();
        let sol = run(
            ClipType::Union,
            FillRule::NonZero,
            &[
                make_path(&[0, 0]),
                make_path(&[0, 0, 5, 5]),
                make_path(&[0, 0, 5, 5, 10, 10]),
                make_path(&[3, 3, 3, 3, 3, 3]),
            ],
            &[vec![]],
        );
        assert!(sol.closed.is_empty());
        assert!(sol.open.is_empty());

        let mut clipper = Clipper64::new();
        let sol = clipper.execute(ClipType::Union, FillRule::EvenOdd).unwrap();
        assert_eq!(sol, Solution::default());
    }

    #[test]
    fn test_even_odd_self_overlap() {
        init_log();
        let sol = run(
            ClipType::Union,
            FillRule::EvenOdd,
            &[square(0, 0, 10), square(0, 0, 10)],
            &[],
        );
        assert!(sol.closed.is_empty());
        let sol = run(
            ClipType::Union,
            FillRule::NonZero,
            &[square(0, 0, 10), square(0, 0, 10)],
            &[],
        );
        assert_eq!(area_of_paths(&sol.closed), 100.);
    }

    #[test]
    fn test_input_reuse_and_clear() {
        init_log();
        let mut clipper = Clipper64::new();
        clipper.add_subject(&[square(0, 0, 10)]).unwrap();
        clipper.add_clip(&[square(5, 0, 10)]).unwrap();
        let union = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
        let inter = clipper
            .execute(ClipType::Intersection, FillRule::NonZero)
            .unwrap();
        assert_eq!(area_of_paths(&union.closed), 150.);
        assert_eq!(area_of_paths(&inter.closed), 50.);

        clipper.clear();
        let sol = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert!(sol.closed.is_empty());
    }

    #[test]
    fn test_touching_squares_merge() {
        init_log();
        let sol = run(
            ClipType::Union,
            FillRule::NonZero,
            &[square(0, 0, 10), square(10, 0, 10)],
            &[],
        );
        assert_eq!(area_of_paths(&sol.closed), 200.);
        let b = bounds(&sol.closed[0]);
        assert_eq!((b.width(), b.height()), (20, 10));
    }

    #[test]
    fn test_random_properties() {
        init_log();
        for seed in 0..20 {
            let a: Paths64 = random_polygons(seed, 3, 12, 1_000_000);
            let b: Paths64 = random_polygons(seed + 1000, 3, 12, 1_000_000);

            let union = run(ClipType::Union, FillRule::NonZero, &a, &b);
            let union_rev = run(ClipType::Union, FillRule::NonZero, &b, &a);
            let inter = run(ClipType::Intersection, FillRule::NonZero, &a, &b);
            let inter_rev = run(ClipType::Intersection, FillRule::NonZero, &b, &a);
            let a_b = run(ClipType::Difference, FillRule::NonZero, &a, &b);
            let b_a = run(ClipType::Difference, FillRule::NonZero, &b, &a);
            let xor = run(ClipType::Xor, FillRule::NonZero, &a, &b);

            let (ua, ia) = (area_of_paths(&union.closed), area_of_paths(&inter.closed));
            let (da, db) = (area_of_paths(&a_b.closed), area_of_paths(&b_a.closed));
            let area_a = area_of_paths(&run(ClipType::Union, FillRule::NonZero, &a, &[]).closed);
            let area_b = area_of_paths(&run(ClipType::Union, FillRule::NonZero, &b, &[]).closed);

            // Rounding crossings onto the grid moves each one by at most
            // half a unit.
            let tol = 1e-4 * (area_a + area_b) + 1.;
            assert_relative_eq!(ua, area_of_paths(&union_rev.closed), epsilon = tol);
            assert_relative_eq!(ia, area_of_paths(&inter_rev.closed), epsilon = tol);
            assert_relative_eq!(ua + ia, area_a + area_b, epsilon = tol);
            assert_relative_eq!(area_of_paths(&xor.closed), da + db, epsilon = tol);
            assert_relative_eq!(ua - ia, da + db, epsilon = tol);

            // Union with itself keeps the region.
            let self_union = run(ClipType::Union, FillRule::NonZero, &union.closed, &union.closed);
            assert_relative_eq!(area_of_paths(&self_union.closed), ua, epsilon = tol);

            // Nested and flat outputs describe the same region.
            let mut clipper = Clipper64::new();
            clipper.add_subject(&a).unwrap();
            clipper.add_clip(&b).unwrap();
            let (tree, _) = clipper
                .execute_tree(ClipType::Union, FillRule::NonZero)
                .unwrap();
            assert_relative_eq!(area_of_paths(&tree.to_paths()), ua, epsilon = tol);
            assert_relative_eq!(tree.root().area(), ua, epsilon = tol);
        }
    }

    #[test]
    fn test_result_inside_inputs() {
        init_log();
        let a = square(0, 0, 100);
        let b = make_path(&[50, -20, 120, 50, 50, 120, -20, 50]);
        let sol = run(ClipType::Intersection, FillRule::NonZero, &[a.clone()], &[b.clone()]);
        assert_eq!(sol.closed.len(), 1);
        for &pt in &sol.closed[0] {
            assert_ne!(point_in_polygon(pt, &a), PointInPolygon::Outside);
            assert_ne!(point_in_polygon(pt, &b), PointInPolygon::Outside);
        }
    }

    #[test]
    fn test_preserve_collinear() {
        init_log();
        let square = make_path(&[0, 0, 5, 0, 10, 0, 10, 5, 10, 10, 5, 10, 0, 10, 0, 5]);
        for (preserve_collinear, expected) in [(true, 8), (false, 4)] {
            let mut clipper = Clipper64::with_options(ClipperOptions {
                preserve_collinear,
                ..Default::default()
            });
            clipper.add_subject(&[square.clone()]).unwrap();
            let sol = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
            assert_eq!(sol.closed.len(), 1);
            assert_eq!(sol.closed[0].len(), expected);
            assert_eq!(area(&sol.closed[0]), 100.);
        }
    }

    #[test]
    fn test_coordinate_range() {
        init_log();
        let mut clipper = Clipper64::new();
        let huge = make_path(&[0, 0, i64::MAX, 0, 0, 10]);
        assert_eq!(clipper.add_subject(&[huge]), Err(ClipperError::CoordinateOutOfRange));
        let min = make_path(&[0, 0, 10, 0, 0, i64::MIN]);
        assert_eq!(clipper.add_clip(&[min]), Err(ClipperError::CoordinateOutOfRange));

        // Rejected input leaves nothing behind.
        let sol = clipper.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(sol, Solution::default());

        let edge = make_path(&[-MAX_COORD, -MAX_COORD, MAX_COORD, -MAX_COORD, 0, MAX_COORD]);
        assert!(clipper.add_subject(&[edge]).is_ok());
    }

    #[test]
    fn test_horizontal_seams() {
        init_log();
        // Three blocks resting on one bar: the bar's top edge meets three
        // opposing runs on the same scanline.
        let sol = run(
            ClipType::Union,
            FillRule::NonZero,
            &[
                square(0, 0, 10),
                square(20, 0, 10),
                square(40, 0, 10),
                make_path(&[0, 10, 50, 10, 50, 20, 0, 20]),
            ],
            &[],
        );
        assert_eq!(sol.closed.len(), 1);
        assert_eq!(area_of_paths(&sol.closed), 800.);

        // A frame of four bars around a hole.
        let bars = [
            make_path(&[0, 0, 30, 0, 30, 10, 0, 10]),
            square(0, 10, 10),
            square(20, 10, 10),
            make_path(&[0, 20, 30, 20, 30, 30, 0, 30]),
        ];
        let sol = run(ClipType::Union, FillRule::NonZero, &bars, &[]);
        assert_eq!(sol.closed.len(), 2);
        assert_eq!(area_of_paths(&sol.closed), 800.);

        let mut clipper = Clipper64::new();
        clipper.add_subject(&bars).unwrap();
        let (tree, _) = clipper
            .execute_tree(ClipType::Union, FillRule::NonZero)
            .unwrap();
        let outer = tree.root().children().next().unwrap();
        assert_eq!(tree.root().child_count(), 1);
        assert_eq!(outer.child_count(), 1);
        assert_eq!(outer.area(), 800.);
    }

    fn random_rects(rng: &mut StdRng, count: usize) -> Paths64 {
        (0..count)
            .map(|_| {
                let (x0, y0) = (rng.gen_range(0..7), rng.gen_range(0..7));
                let (x1, y1) = (rng.gen_range(x0 + 1..=8), rng.gen_range(y0 + 1..=8));
                let rect = make_path(&[2 * x0, 2 * y0, 2 * x1, 2 * y0, 2 * x1, 2 * y1, 2 * x0, 2 * y1]);
                if rng.gen_bool(0.5) {
                    reverse_paths(&[rect]).remove(0)
                } else {
                    rect
                }
            })
            .collect()
    }

    fn winding_at(paths: &[Path64], pt: Point64) -> i32 {
        paths
            .iter()
            .filter(|path| point_in_polygon(pt, path) == PointInPolygon::Inside)
            .map(|path| if area(path.as_slice()) > 0. { 1 } else { -1 })
            .sum()
    }

    fn is_filled(fill_rule: FillRule, wind: i32) -> bool {
        match fill_rule {
            FillRule::EvenOdd => wind % 2 != 0,
            FillRule::NonZero => wind != 0,
            FillRule::Positive => wind > 0,
            FillRule::Negative => wind < 0,
        }
    }

    #[test]
    fn test_rectilinear_grid() {
        init_log();
        let clip_types = [ClipType::Intersection, ClipType::Union, ClipType::Difference, ClipType::Xor];
        let fill_rules = [FillRule::EvenOdd, FillRule::NonZero, FillRule::Positive, FillRule::Negative];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let subjects = random_rects(&mut rng, 3);
            let clips = random_rects(&mut rng, 3);
            for clip_type in clip_types {
                for fill_rule in fill_rules {
                    let sol = run(clip_type, fill_rule, &subjects, &clips);
                    // Edges sit on even coordinates; cell centres are odd.
                    let mut cells = 0;
                    for x in (1..16).step_by(2) {
                        for y in (1..16).step_by(2) {
                            let pt = Point64::new(x, y);
                            let in_subject = is_filled(fill_rule, winding_at(&subjects, pt));
                            let in_clip = is_filled(fill_rule, winding_at(&clips, pt));
                            let expected = match clip_type {
                                ClipType::Intersection => in_subject && in_clip,
                                ClipType::Union => in_subject || in_clip,
                                ClipType::Difference => in_subject && !in_clip,
                                ClipType::Xor => in_subject != in_clip,
                            };
                            let covering = sol
                                .closed
                                .iter()
                                .filter(|ring| point_in_polygon(pt, ring) == PointInPolygon::Inside)
                                .count();
                            assert_eq!(covering % 2 == 1, expected, "{clip_type:?}/{fill_rule:?} at {pt:?}");
                            cells += expected as i32;
                        }
                    }
                    assert_eq!(area_of_paths(&sol.closed), 4. * cells as f64);
                }
            }
        }
    }
}
