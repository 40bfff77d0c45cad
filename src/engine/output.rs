use std::cmp::Ordering;

use log::debug;

use super::sweep::Sweep;
use crate::{
    active::JoinWith,
    point::Point64,
    primitives::{cross_product_sign, dot_product, is_collinear, perpendicular_distance_sqrd, segment_intersect_point, segments_intersect},
};

/// Twice the signed area of a triangle.
fn area_triangle(pt1: Point64, pt2: Point64, pt3: Point64) -> f64 {
    (pt3.y + pt1.y) as f64 * (pt3.x - pt1.x) as f64
        + (pt1.y + pt2.y) as f64 * (pt1.x - pt2.x) as f64
        + (pt2.y + pt3.y) as f64 * (pt2.x - pt3.x) as f64
}

impl<'a> Sweep<'a> {
    /// Whether `e` draws the front (most recent end) of its ring.
    #[inline]
    pub(super) fn is_front(&self, e: usize) -> bool {
        match self.actives[e].outrec {
            Some(outrec) => self.rings.recs[outrec].front_edge == Some(e),
            None => false,
        }
    }

    /// Nearest hot closed edge left of `e`.
    fn prev_hot_edge(&self, e: usize) -> Option<usize> {
        let mut prev = self.actives[e].prev_in_ael;
        while let Some(p) = prev {
            if !self.is_open(p) && self.is_hot(p) {
                break;
            }
            prev = self.actives[p].prev_in_ael;
        }
        prev
    }

    #[inline]
    pub(super) fn set_sides(&mut self, outrec: usize, front: usize, back: usize) {
        let rec = &mut self.rings.recs[outrec];
        rec.front_edge = Some(front);
        rec.back_edge = Some(back);
    }

    fn swap_front_back_sides(&mut self, outrec: usize) {
        let rec = &mut self.rings.recs[outrec];
        std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
        if let Some(pts) = rec.pts {
            rec.pts = Some(self.rings.pts[pts].next);
        }
    }

    /// Stop `e` drawing its ring, leaving the ring's other side intact.
    pub(super) fn detach_from_outrec(&mut self, e: usize) {
        if let Some(outrec) = self.actives[e].outrec.take() {
            let rec = &mut self.rings.recs[outrec];
            if rec.front_edge == Some(e) {
                rec.front_edge = None;
            } else {
                rec.back_edge = None;
            }
        }
    }

    fn uncouple_outrec(&mut self, e: usize) {
        let outrec = match self.actives[e].outrec {
            Some(outrec) => outrec,
            None => return,
        };
        let rec = &mut self.rings.recs[outrec];
        let (front, back) = (rec.front_edge.take(), rec.back_edge.take());
        for edge in front.into_iter().chain(back) {
            if let Some(a) = self.actives.get_mut(edge) {
                a.outrec = None;
            }
        }
    }

    pub(super) fn swap_outrecs(&mut self, e1: usize, e2: usize) {
        let (or1, or2) = (self.actives[e1].outrec, self.actives[e2].outrec);
        if or1 == or2 {
            if let Some(outrec) = or1 {
                let rec = &mut self.rings.recs[outrec];
                std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
            }
            return;
        }
        if let Some(outrec) = or1 {
            let rec = &mut self.rings.recs[outrec];
            if rec.front_edge == Some(e1) {
                rec.front_edge = Some(e2);
            } else {
                rec.back_edge = Some(e2);
            }
        }
        if let Some(outrec) = or2 {
            let rec = &mut self.rings.recs[outrec];
            if rec.front_edge == Some(e2) {
                rec.front_edge = Some(e1);
            } else {
                rec.back_edge = Some(e1);
            }
        }
        self.actives[e1].outrec = or2;
        self.actives[e2].outrec = or1;
    }

    /// Append `pt` at the end of the ring drawn by `e`.
    ///
    /// The ring's anchor is its front point and the anchor's `next` is
    /// its back point.
    pub(super) fn add_out_pt(&mut self, e: usize, pt: Point64) -> Option<usize> {
        let outrec = self.actives[e].outrec?;
        let to_front = self.is_front(e);
        let op_front = self.rings.recs[outrec].pts?;
        let op_back = self.rings.next(op_front);

        if to_front {
            if pt == self.rings.pt(op_front) {
                return Some(op_front);
            }
        } else if pt == self.rings.pt(op_back) {
            return Some(op_back);
        }

        let new_op = self.rings.new_outpt(pt, outrec);
        self.rings.pts[op_back].prev = new_op;
        self.rings.pts[new_op].prev = op_front;
        self.rings.pts[new_op].next = op_back;
        self.rings.pts[op_front].next = new_op;
        if to_front {
            self.rings.recs[outrec].pts = Some(new_op);
        }
        Some(new_op)
    }

    /// Open a new ring drawn by `e1` and `e2` starting at `pt`.
    pub(super) fn add_local_min_poly(&mut self, e1: usize, e2: usize, pt: Point64, is_new: bool) -> usize {
        let outrec = self.rings.new_outrec();
        self.actives[e1].outrec = Some(outrec);
        self.actives[e2].outrec = Some(outrec);

        if self.is_open(e1) {
            self.rings.recs[outrec].is_open = true;
            if self.actives[e1].wind_dx > 0 {
                self.set_sides(outrec, e1, e2);
            } else {
                self.set_sides(outrec, e2, e1);
            }
        } else if let Some(prev_hot) = self.prev_hot_edge(e1) {
            // Output orientation follows the ascending side of the
            // nearest ring to the left.
            if self.using_polytree {
                if let Some(owner) = self.actives[prev_hot].outrec {
                    self.rings.set_owner(outrec, owner);
                }
            }
            if self.is_front(prev_hot) == is_new {
                self.set_sides(outrec, e2, e1);
            } else {
                self.set_sides(outrec, e1, e2);
            }
        } else if is_new {
            self.set_sides(outrec, e1, e2);
        } else {
            self.set_sides(outrec, e2, e1);
        }

        let op = self.rings.new_outpt(pt, outrec);
        self.rings.recs[outrec].pts = Some(op);
        op
    }

    /// Close off the rings drawn by `e1` and `e2` where they meet at `pt`.
    pub(super) fn add_local_max_poly(&mut self, e1: usize, e2: usize, pt: Point64) -> Option<usize> {
        if self.actives[e1].is_joined() {
            self.split(e1, pt);
        }
        if self.actives[e2].is_joined() {
            self.split(e2, pt);
        }

        if self.is_front(e1) == self.is_front(e2) {
            let open_end = if self.is_open_end(e1) {
                Some(e1)
            } else if self.is_open_end(e2) {
                Some(e2)
            } else {
                None
            };
            match open_end.and_then(|e| self.actives[e].outrec) {
                Some(outrec) => self.swap_front_back_sides(outrec),
                None => {
                    debug!("ring sides disagree at ({x}, {y})", x = pt.x, y = pt.y);
                    self.succeeded = false;
                    return None;
                }
            }
        }

        let result = self.add_out_pt(e1, pt)?;
        let (or1, or2) = (self.actives[e1].outrec?, self.actives[e2].outrec?);
        if or1 == or2 {
            self.rings.recs[or1].pts = Some(result);
            if self.using_polytree {
                match self.prev_hot_edge(e1).and_then(|p| self.actives[p].outrec) {
                    Some(owner) => self.rings.set_owner(or1, owner),
                    None => self.rings.recs[or1].owner = None,
                }
            }
            // The owner is provisional until the tree is built.
            self.uncouple_outrec(e1);
            return Some(result);
        }

        // Preserve the orientation of the absorbing ring.
        if self.is_open(e1) {
            if self.actives[e1].wind_dx < 0 {
                self.join_outrec_paths(e1, e2);
            } else {
                self.join_outrec_paths(e2, e1);
            }
        } else if or1 < or2 {
            self.join_outrec_paths(e1, e2);
        } else {
            self.join_outrec_paths(e2, e1);
        }
        Some(result)
    }

    /// Splice the ring of `e2` onto the ring of `e1`; the ring of `e2`
    /// is left empty and owned by that of `e1`.
    fn join_outrec_paths(&mut self, e1: usize, e2: usize) {
        let (or1, or2) = match (self.actives[e1].outrec, self.actives[e2].outrec) {
            (Some(or1), Some(or2)) => (or1, or2),
            _ => return,
        };
        let (p1_st, p2_st) = match (self.rings.recs[or1].pts, self.rings.recs[or2].pts) {
            (Some(p1), Some(p2)) => (p1, p2),
            _ => return,
        };
        let p1_end = self.rings.next(p1_st);
        let p2_end = self.rings.next(p2_st);

        if self.is_front(e1) {
            self.rings.pts[p2_end].prev = p1_st;
            self.rings.pts[p1_st].next = p2_end;
            self.rings.pts[p2_st].next = p1_end;
            self.rings.pts[p1_end].prev = p2_st;
            self.rings.recs[or1].pts = Some(p2_st);
            let front = self.rings.recs[or2].front_edge;
            self.rings.recs[or1].front_edge = front;
            if let Some(front) = front {
                self.actives[front].outrec = Some(or1);
            }
        } else {
            self.rings.pts[p1_end].prev = p2_st;
            self.rings.pts[p2_st].next = p1_end;
            self.rings.pts[p1_st].next = p2_end;
            self.rings.pts[p2_end].prev = p1_st;
            let back = self.rings.recs[or2].back_edge;
            self.rings.recs[or1].back_edge = back;
            if let Some(back) = back {
                self.actives[back].outrec = Some(or1);
            }
        }

        let rec2 = &mut self.rings.recs[or2];
        rec2.front_edge = None;
        rec2.back_edge = None;
        rec2.pts = None;
        self.rings.set_owner(or2, or1);

        if self.is_open_end(e1) {
            self.rings.recs[or2].pts = self.rings.recs[or1].pts;
            self.rings.recs[or1].pts = None;
        }

        self.actives[e1].outrec = None;
        self.actives[e2].outrec = None;
    }

    pub(super) fn start_open_path(&mut self, e: usize, pt: Point64) -> usize {
        let outrec = self.rings.new_outrec();
        let rec = &mut self.rings.recs[outrec];
        rec.is_open = true;
        if self.actives[e].wind_dx > 0 {
            rec.front_edge = Some(e);
        } else {
            rec.back_edge = Some(e);
        }
        self.actives[e].outrec = Some(outrec);
        let op = self.rings.new_outpt(pt, outrec);
        self.rings.recs[outrec].pts = Some(op);
        op
    }

    /// The point most recently added by the hot edge `e`.
    pub(super) fn get_last_op(&self, e: usize) -> Option<usize> {
        let outrec = self.actives[e].outrec?;
        let pts = self.rings.recs[outrec].pts?;
        if self.rings.recs[outrec].front_edge == Some(e) {
            Some(pts)
        } else {
            Some(self.rings.next(pts))
        }
    }

    /// Undo a seam join on `e` by starting a new ring at `pt`.
    pub(super) fn split(&mut self, e: usize, pt: Point64) {
        let join_with = self.actives[e].join_with;
        self.actives[e].join_with = JoinWith::None;
        if join_with == JoinWith::Right {
            if let Some(next) = self.actives[e].next_in_ael {
                self.actives[next].join_with = JoinWith::None;
                self.add_local_min_poly(e, next, pt, true);
            }
        } else if let Some(prev) = self.actives[e].prev_in_ael {
            self.actives[prev].join_with = JoinWith::None;
            self.add_local_min_poly(prev, e, pt, true);
        }
    }

    /// Join the rings of `e` and its left neighbour if they run along
    /// the same line through `pt`.
    pub(super) fn check_join_left(&mut self, e: usize, pt: Point64, check_curr_x: bool) {
        let prev = match self.actives[e].prev_in_ael {
            Some(prev) => prev,
            None => return,
        };
        if let Some((or_e, or_p)) = self.seam_partner(e, prev, pt, check_curr_x) {
            if or_e == or_p {
                self.add_local_max_poly(prev, e, pt);
            } else if or_e < or_p {
                self.join_outrec_paths(e, prev);
            } else {
                self.join_outrec_paths(prev, e);
            }
            self.actives[prev].join_with = JoinWith::Right;
            self.actives[e].join_with = JoinWith::Left;
        }
    }

    /// Join the rings of `e` and its right neighbour if they run along
    /// the same line through `pt`.
    pub(super) fn check_join_right(&mut self, e: usize, pt: Point64, check_curr_x: bool) {
        let next = match self.actives[e].next_in_ael {
            Some(next) => next,
            None => return,
        };
        if let Some((or_e, or_n)) = self.seam_partner(e, next, pt, check_curr_x) {
            if or_e == or_n {
                self.add_local_max_poly(e, next, pt);
            } else if or_e < or_n {
                self.join_outrec_paths(e, next);
            } else {
                self.join_outrec_paths(next, e);
            }
            self.actives[e].join_with = JoinWith::Right;
            self.actives[next].join_with = JoinWith::Left;
        }
    }

    /// If `e` and its neighbour `other` share a seam at `pt`, return
    /// their rings.
    fn seam_partner(&self, e: usize, other: usize, pt: Point64, check_curr_x: bool) -> Option<(usize, usize)> {
        let (ae, ao) = (&self.actives[e], &self.actives[other]);
        let (or_e, or_o) = (ae.outrec?, ao.outrec?);
        if ae.is_horizontal() || ao.is_horizontal() || self.is_open(e) || self.is_open(other) {
            return None;
        }
        // Skip trivial joins near either edge's ends.
        if (pt.y < ae.top.y + 2 || pt.y < ao.top.y + 2) && (ae.bot.y > pt.y || ao.bot.y > pt.y) {
            return None;
        }
        if check_curr_x {
            if perpendicular_distance_sqrd(pt, ao.bot, ao.top) > 0.25 {
                return None;
            }
        } else if ae.curr_x != ao.curr_x {
            return None;
        }
        if !is_collinear(ae.top, pt, ao.top) {
            return None;
        }
        Some((or_e, or_o))
    }

    /// Remove spikes (and, unless preserving them, collinear points)
    /// from a finished ring, then repair any self-intersections.
    pub(super) fn clean_collinear(&mut self, outrec: usize) {
        let outrec = match self.rings.real_outrec(Some(outrec)) {
            Some(outrec) if !self.rings.recs[outrec].is_open => outrec,
            _ => return,
        };
        if !self.rings.is_valid_closed_path(self.rings.recs[outrec].pts) {
            self.rings.recs[outrec].pts = None;
            return;
        }
        let mut start = match self.rings.recs[outrec].pts {
            Some(pts) => pts,
            None => return,
        };
        let mut op2 = start;
        loop {
            let (prev, next) = (self.rings.prev(op2), self.rings.next(op2));
            let (pp, p, np) = (self.rings.pt(prev), self.rings.pt(op2), self.rings.pt(next));
            if cross_product_sign(pp, p, np) == Ordering::Equal
                && (p == pp || p == np || !self.preserve_collinear || dot_product(pp, p, np) < 0.)
            {
                if self.rings.recs[outrec].pts == Some(op2) {
                    self.rings.recs[outrec].pts = Some(prev);
                }
                op2 = self.rings.dispose_outpt(op2);
                if !self.rings.is_valid_closed_path(Some(op2)) {
                    self.rings.recs[outrec].pts = None;
                    return;
                }
                start = op2;
                continue;
            }
            op2 = next;
            if op2 == start {
                break;
            }
        }
        self.fix_self_intersects(outrec);
    }

    /// Cut the ring wherever an edge crosses the edge after next.
    ///
    /// Loops turning against the ring, and loops under one unit of
    /// area, are dropped. A crossing made by rounding near an exact
    /// touch can be less than a unit deep; the sliver it encloses is
    /// dropped with it.
    fn fix_self_intersects(&mut self, outrec: usize) {
        let mut op2 = match self.rings.recs[outrec].pts {
            Some(pts) => pts,
            None => return,
        };
        loop {
            let (prev, next) = (self.rings.prev(op2), self.rings.next(op2));
            let next_next = self.rings.next(next);
            // Triangles cannot self-intersect.
            if prev == next_next {
                break;
            }
            if segments_intersect(
                self.rings.pt(prev),
                self.rings.pt(op2),
                self.rings.pt(next),
                self.rings.pt(next_next),
                false,
            ) {
                if let Some(pts) = self.rings.recs[outrec].pts {
                    if op2 == pts || next == pts {
                        self.rings.recs[outrec].pts = Some(self.rings.prev(pts));
                    }
                }
                self.do_split_op(outrec, op2);
                match self.rings.recs[outrec].pts {
                    Some(pts) => {
                        op2 = pts;
                        continue;
                    }
                    None => break,
                }
            }
            op2 = next;
            if Some(op2) == self.rings.recs[outrec].pts {
                break;
            }
        }
    }

    /// Cut the ring at the crossing of `split_op.prev -> split_op` and
    /// `split_op.next -> split_op.next.next`, keeping the small loop as
    /// a ring of its own when it has real area.
    fn do_split_op(&mut self, outrec: usize, split_op: usize) {
        let prev_op = self.rings.prev(split_op);
        let next_op = self.rings.next(split_op);
        let next_next_op = self.rings.next(next_op);
        self.rings.recs[outrec].pts = Some(prev_op);

        let ip = segment_intersect_point(
            self.rings.pt(prev_op),
            self.rings.pt(split_op),
            self.rings.pt(next_op),
            self.rings.pt(next_next_op),
        )
        .unwrap_or_else(|| self.rings.pt(split_op));

        let area1 = self.rings.area(prev_op);
        let abs_area1 = area1.abs();
        if abs_area1 < 2. {
            self.rings.recs[outrec].pts = None;
            return;
        }
        let area2 = area_triangle(ip, self.rings.pt(split_op), self.rings.pt(next_op));
        let abs_area2 = area2.abs();

        // Unlink `split_op` and `next_op`, inserting the crossing.
        if ip == self.rings.pt(prev_op) || ip == self.rings.pt(next_next_op) {
            self.rings.pts[next_next_op].prev = prev_op;
            self.rings.pts[prev_op].next = next_next_op;
        } else {
            let owner = self.rings.pts[prev_op].outrec;
            let new_op2 = self.rings.new_outpt(ip, owner);
            self.rings.pts[new_op2].prev = prev_op;
            self.rings.pts[new_op2].next = next_next_op;
            self.rings.pts[next_next_op].prev = new_op2;
            self.rings.pts[prev_op].next = new_op2;
        }

        // The areas only share a sign if the cut-off triangle outweighs
        // the rest or the ring crossed itself more than once.
        if abs_area2 >= 1. && (abs_area2 > abs_area1 || (area2 > 0.) == (area1 > 0.)) {
            let new_or = self.rings.new_outrec();
            self.rings.recs[new_or].owner = self.rings.recs[outrec].owner;
            self.rings.pts[split_op].outrec = new_or;
            self.rings.pts[next_op].outrec = new_or;
            let new_op = self.rings.new_outpt(ip, new_or);
            self.rings.pts[new_op].prev = next_op;
            self.rings.pts[new_op].next = split_op;
            self.rings.recs[new_or].pts = Some(new_op);
            self.rings.pts[split_op].prev = new_op;
            self.rings.pts[next_op].next = new_op;

            if self.using_polytree {
                if self.rings.path1_inside_path2(prev_op, new_op) {
                    self.rings.recs[new_or].splits.push(outrec);
                } else {
                    self.rings.recs[outrec].splits.push(new_or);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{ClipType, ClipperOptions, FillRule},
        vertex::InputGeometry,
    };

    #[test]
    fn test_area_triangle() {
        let (a, b, c) = (Point64::new(0, 0), Point64::new(4, 0), Point64::new(0, 3));
        assert_eq!(area_triangle(a, b, c).abs(), 12.);
        assert_eq!(area_triangle(a, b, c), -area_triangle(a, c, b));
    }

    #[test]
    fn test_fix_self_intersects() {
        let input = InputGeometry::default();
        let options = ClipperOptions::default();
        let cases: [(&[(i64, i64)], &[(i64, i64)], f64); 2] = [
            // Sub-unit loop past (40, 100).
            (
                &[(0, 0), (100, 0), (100, 100), (40, 100), (41, 101), (42, 99), (0, 100)],
                &[(0, 0), (0, 100), (41, 100), (42, 99), (100, 0), (100, 100)],
                9979.5,
            ),
            // Lobe winding against the ring.
            (
                &[(0, 0), (100, 0), (100, 100), (40, 100), (50, 110), (60, 90), (0, 100)],
                &[(0, 0), (0, 100), (55, 100), (60, 90), (100, 0), (100, 100)],
                9725.,
            ),
        ];
        for (coords, expected, expected_area) in cases {
            let mut sweep = Sweep::new(&input, ClipType::Union, FillRule::NonZero, &options, false);
            let outrec = sweep.rings.new_outrec();
            let first = sweep.rings.new_outpt(coords[0].into(), outrec);
            sweep.rings.recs[outrec].pts = Some(first);
            let mut last = first;
            for &c in &coords[1..] {
                last = sweep.rings.duplicate_op(last, true);
                sweep.rings.pts[last].pt = c.into();
            }

            sweep.fix_self_intersects(outrec);
            assert_eq!(sweep.rings.recs.len(), 1);
            let pts = sweep.rings.recs[outrec].pts.unwrap();
            assert_eq!(sweep.rings.area(pts), expected_area);
            let mut ring: Vec<Point64> = sweep.rings.ring(pts).map(|op| sweep.rings.pt(op)).collect();
            ring.sort();
            let expected: Vec<Point64> = expected.iter().map(|&c| c.into()).collect();
            assert_eq!(ring, expected);
        }
    }
}
