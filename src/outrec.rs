//! Output rings under construction.
//!
//! Points of output polygons live in one arena of [`OutPt`] nodes that
//! form circular doubly-linked rings; each ring is described by an
//! [`OutRec`]. Nodes are never freed during a sweep: disposing a node
//! only unlinks it, so stale keys held by horizontal bookkeeping stay
//! valid.
use smallvec::SmallVec;

use crate::{
    point::{Path64, Point64},
    primitives::{self, point_in_edges, PointInPolygon},
    rect::Rect64,
};

#[derive(Debug, Clone)]
pub(crate) struct OutPt {
    pub(crate) pt: Point64,
    pub(crate) next: usize,
    pub(crate) prev: usize,
    pub(crate) outrec: usize,
    /// Set once the node anchors a horizontal segment.
    pub(crate) horz: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct OutRec {
    pub(crate) owner: Option<usize>,
    pub(crate) front_edge: Option<usize>,
    pub(crate) back_edge: Option<usize>,
    pub(crate) pts: Option<usize>,
    pub(crate) polypath: Option<usize>,
    pub(crate) splits: SmallVec<[usize; 2]>,
    pub(crate) recursive_split: Option<usize>,
    pub(crate) bounds: Rect64,
    pub(crate) path: Path64,
    pub(crate) is_open: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct OutRings {
    pub(crate) pts: Vec<OutPt>,
    pub(crate) recs: Vec<OutRec>,
}

impl OutRings {
    pub(crate) fn new_outrec(&mut self) -> usize {
        let idx = self.recs.len();
        self.recs.push(OutRec {
            owner: None,
            front_edge: None,
            back_edge: None,
            pts: None,
            polypath: None,
            splits: SmallVec::new(),
            recursive_split: None,
            bounds: Rect64::default(),
            path: Path64::new(),
            is_open: false,
        });
        idx
    }

    /// Allocate a single-node ring owned by `outrec`.
    pub(crate) fn new_outpt(&mut self, pt: Point64, outrec: usize) -> usize {
        let key = self.pts.len();
        self.pts.push(OutPt {
            pt,
            next: key,
            prev: key,
            outrec,
            horz: false,
        });
        key
    }

    /// Insert a copy of `op` right after (or before) it.
    pub(crate) fn duplicate_op(&mut self, op: usize, insert_after: bool) -> usize {
        let (pt, outrec) = (self.pts[op].pt, self.pts[op].outrec);
        let result = self.new_outpt(pt, outrec);
        if insert_after {
            let next = self.pts[op].next;
            self.pts[result].next = next;
            self.pts[next].prev = result;
            self.pts[result].prev = op;
            self.pts[op].next = result;
        } else {
            let prev = self.pts[op].prev;
            self.pts[result].prev = prev;
            self.pts[prev].next = result;
            self.pts[result].next = op;
            self.pts[op].prev = result;
        }
        result
    }

    /// Unlink `op` from its ring and return its successor.
    pub(crate) fn dispose_outpt(&mut self, op: usize) -> usize {
        let OutPt { next, prev, .. } = self.pts[op];
        self.pts[prev].next = next;
        self.pts[next].prev = prev;
        next
    }

    #[inline]
    pub(crate) fn next(&self, op: usize) -> usize {
        self.pts[op].next
    }

    #[inline]
    pub(crate) fn prev(&self, op: usize) -> usize {
        self.pts[op].prev
    }

    #[inline]
    pub(crate) fn pt(&self, op: usize) -> Point64 {
        self.pts[op].pt
    }

    /// Iterate the ring starting at `op`.
    pub(crate) fn ring(&self, op: usize) -> impl Iterator<Item = usize> + '_ {
        let mut curr = Some(op);
        std::iter::from_fn(move || {
            let this = curr?;
            let next = self.pts[this].next;
            curr = if next == op { None } else { Some(next) };
            Some(this)
        })
    }

    /// Point every node of the ring at `outrec`.
    pub(crate) fn fix_outrec_pts(&mut self, outrec: usize) {
        if let Some(start) = self.recs[outrec].pts {
            let mut op = start;
            loop {
                self.pts[op].outrec = outrec;
                op = self.pts[op].next;
                if op == start {
                    break;
                }
            }
        }
    }

    /// Signed area of the ring at `op`.
    pub(crate) fn area(&self, op: usize) -> f64 {
        let twice: f64 = self
            .ring(op)
            .map(|o| {
                let prev = self.pt(self.prev(o));
                let curr = self.pt(o);
                (prev.y + curr.y) as f64 * (prev.x - curr.x) as f64
            })
            .sum();
        twice * 0.5
    }

    /// A triangle whose vertices nearly coincide.
    pub(crate) fn is_very_small_triangle(&self, op: usize) -> bool {
        let (next, prev) = (self.next(op), self.prev(op));
        self.next(next) == prev
            && (primitives::pts_really_close(self.pt(prev), self.pt(next))
                || primitives::pts_really_close(self.pt(op), self.pt(next))
                || primitives::pts_really_close(self.pt(op), self.pt(prev)))
    }

    pub(crate) fn is_valid_closed_path(&self, op: Option<usize>) -> bool {
        match op {
            Some(op) => {
                self.next(op) != op
                    && self.next(op) != self.prev(op)
                    && !self.is_very_small_triangle(op)
            }
            None => false,
        }
    }

    /// Follow `owner` links to the nearest ring that still has points.
    pub(crate) fn real_outrec(&self, mut outrec: Option<usize>) -> Option<usize> {
        while let Some(or) = outrec {
            if self.recs[or].pts.is_some() {
                break;
            }
            outrec = self.recs[or].owner;
        }
        outrec
    }

    /// Checks that `test_owner` is not (transitively) owned by `outrec`.
    pub(crate) fn is_valid_owner(&self, outrec: usize, mut test_owner: Option<usize>) -> bool {
        while let Some(t) = test_owner {
            if t == outrec {
                return false;
            }
            test_owner = self.recs[t].owner;
        }
        true
    }

    /// Make `new_owner` the owner of `outrec`, collapsing dead links in
    /// the owner chain and refusing to create a cycle.
    pub(crate) fn set_owner(&mut self, outrec: usize, new_owner: usize) {
        while let Some(o) = self.recs[new_owner].owner {
            if self.recs[o].pts.is_some() {
                break;
            }
            self.recs[new_owner].owner = self.recs[o].owner;
        }
        let mut tmp = Some(new_owner);
        while let Some(t) = tmp {
            if t == outrec {
                break;
            }
            tmp = self.recs[t].owner;
        }
        if tmp.is_some() {
            self.recs[new_owner].owner = self.recs[outrec].owner;
        }
        self.recs[outrec].owner = Some(new_owner);
    }

    /// Move the split records of `from` onto `to`.
    pub(crate) fn move_splits(&mut self, from: usize, to: usize) {
        let splits = std::mem::take(&mut self.recs[from].splits);
        self.recs[to]
            .splits
            .extend(splits.into_iter().filter(|&s| s != to));
    }

    pub(crate) fn point_in_ring(&self, pt: Point64, op: usize) -> PointInPolygon {
        if self.next(op) == op || self.prev(op) == self.next(op) {
            return PointInPolygon::Outside;
        }
        point_in_edges(
            pt,
            self.ring(op).map(|o| (self.pt(self.prev(o)), self.pt(o))),
        )
    }

    /// The ring at `op` with collinear runs of horizontal or vertical
    /// points removed.
    pub(crate) fn clean_path(&self, op: usize) -> Path64 {
        let mut result = Path64::new();
        let mut op2 = op;
        while self.next(op2) != op {
            let (p, n, c) = (self.pt(self.prev(op2)), self.pt(self.next(op2)), self.pt(op2));
            if (c.x == n.x && c.x == p.x) || (c.y == n.y && c.y == p.y) {
                op2 = self.next(op2);
            } else {
                break;
            }
        }
        result.push(self.pt(op2));
        let mut prev_op = op2;
        op2 = self.next(op2);
        while op2 != op {
            let (c, n, p) = (self.pt(op2), self.pt(self.next(op2)), self.pt(prev_op));
            if (c.x != n.x || c.x != p.x) && (c.y != n.y || c.y != p.y) {
                result.push(c);
                prev_op = op2;
            }
            op2 = self.next(op2);
        }
        result
    }

    /// Checks if the ring at `op1` lies inside the ring at `op2`.
    ///
    /// Tolerates rounding by requiring a clear majority of vertices on
    /// one side before falling back to testing the ring's midpoint.
    pub(crate) fn path1_inside_path2(&self, op1: usize, op2: usize) -> bool {
        let mut outside_cnt: i32 = 0;
        for op in self.ring(op1) {
            match self.point_in_ring(self.pt(op), op2) {
                PointInPolygon::Outside => outside_cnt += 1,
                PointInPolygon::Inside => outside_cnt -= 1,
                PointInPolygon::On => {}
            }
            if outside_cnt.abs() > 1 {
                return outside_cnt < 0;
            }
        }
        let mid = primitives::bounds(&self.clean_path(op1)).mid_point();
        let path2 = self.clean_path(op2);
        primitives::point_in_polygon(mid, &path2) != PointInPolygon::Outside
    }

    /// Walk the ring into a flat path, dropping repeated points.
    ///
    /// Returns `None` for rings that are degenerate for their kind.
    pub(crate) fn build_path(&self, op: Option<usize>, reverse: bool, is_open: bool) -> Option<Path64> {
        let mut op = op?;
        if self.next(op) == op || (!is_open && self.next(op) == self.prev(op)) {
            return None;
        }
        let mut path = Path64::new();
        let mut last_pt;
        let mut op2;
        if reverse {
            last_pt = self.pt(op);
            op2 = self.prev(op);
        } else {
            op = self.next(op);
            last_pt = self.pt(op);
            op2 = self.next(op);
        }
        path.push(last_pt);
        while op2 != op {
            if self.pt(op2) != last_pt {
                last_pt = self.pt(op2);
                path.push(last_pt);
            }
            op2 = if reverse { self.prev(op2) } else { self.next(op2) };
        }
        if !is_open && path.len() == 3 && self.is_very_small_triangle(op2) {
            return None;
        }
        if path.len() < 2 {
            return None;
        }
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(rings: &mut OutRings, coords: &[(i64, i64)]) -> usize {
        let or = rings.new_outrec();
        let first = rings.new_outpt(coords[0].into(), or);
        rings.recs[or].pts = Some(first);
        let mut last = first;
        for &c in &coords[1..] {
            let op = rings.duplicate_op(last, true);
            rings.pts[op].pt = c.into();
            last = op;
        }
        first
    }

    #[test]
    fn test_ring_ops() {
        let mut rings = OutRings::default();
        let op = ring(&mut rings, &[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(rings.ring(op).count(), 4);
        assert_eq!(rings.area(op), 100.);

        let next = rings.next(op);
        let after = rings.dispose_outpt(next);
        assert_eq!(rings.next(op), after);
        assert_eq!(rings.ring(op).count(), 3);
        assert_eq!(rings.area(op), 50.);
    }

    #[test]
    fn test_nesting() {
        let mut rings = OutRings::default();
        let outer = ring(&mut rings, &[(0, 0), (100, 0), (100, 100), (0, 100)]);
        let inner = ring(&mut rings, &[(10, 10), (20, 10), (20, 20), (10, 20)]);
        assert!(rings.path1_inside_path2(inner, outer));
        assert!(!rings.path1_inside_path2(outer, inner));
        assert_eq!(rings.point_in_ring(Point64::new(100, 50), outer), PointInPolygon::On);
    }

    #[test]
    fn test_owner_chain() {
        let mut rings = OutRings::default();
        let a = rings.new_outrec();
        let b = rings.new_outrec();
        rings.set_owner(b, a);
        assert_eq!(rings.recs[b].owner, Some(a));
        // Refuse to create a cycle.
        rings.set_owner(a, b);
        assert_eq!(rings.recs[a].owner, Some(b));
        assert_eq!(rings.recs[b].owner, None);
        assert!(!rings.is_valid_owner(b, Some(a)));
        assert_eq!(rings.real_outrec(Some(a)), None);
    }

    #[test]
    fn test_build_path() {
        let mut rings = OutRings::default();
        let op = ring(&mut rings, &[(0, 0), (10, 0), (10, 0), (10, 10)]);
        let path = rings.build_path(Some(op), false, false).unwrap();
        assert_eq!(path.len(), 3);
        let tiny = ring(&mut rings, &[(0, 0), (1, 0), (1, 1)]);
        assert_eq!(rings.build_path(Some(tiny), false, false), None);
    }
}
