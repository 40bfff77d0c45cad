//! Horizontal edges and horizontal seams.
//!
//! A horizontal edge has no extent in `y`, so it cannot be ordered in
//! the AEL like the others. Instead it is walked across the AEL at its
//! own scanline, crossing every edge it passes. Horizontal runs of
//! output are recorded as segments so that two rings overlapping along
//! a horizontal can be spliced (or a ring split) once the scanline is
//! done.
use log::trace;

use super::sweep::Sweep;
use crate::{point::Point64, vertex::VertexFlags};

/// One horizontal run of output points.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HorzSegment {
    left_op: usize,
    /// `None` once the segment proved unusable.
    right_op: Option<usize>,
    left_to_right: bool,
}

/// Two points, on one or two rings, to be linked into a seam.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HorzJoin {
    op1: usize,
    op2: usize,
}

impl<'a> Sweep<'a> {
    #[inline]
    pub(super) fn push_horz(&mut self, e: usize) {
        self.horz_stack.push(e);
    }

    /// Next queued horizontal that is still active.
    pub(super) fn pop_horz(&mut self) -> Option<usize> {
        while let Some(e) = self.horz_stack.pop() {
            if self.actives.contains(e) {
                return Some(e);
            }
        }
        None
    }

    /// Extend a horizontal over any directly following horizontals of
    /// its bound. With `preserve_collinear` only spikes are absorbed.
    pub(super) fn trim_horz(&mut self, horz: usize, preserve_collinear: bool) {
        let mut was_trimmed = false;
        let mut pt = self.vertex_pt(self.next_vertex(horz));
        while pt.y == self.actives[horz].top.y {
            let a = &self.actives[horz];
            if preserve_collinear && ((pt.x < a.top.x) != (a.bot.x < a.top.x)) {
                break;
            }
            let vertex_top = self.next_vertex(horz);
            let a = &mut self.actives[horz];
            a.vertex_top = vertex_top;
            a.top = pt;
            was_trimmed = true;
            if self.is_maxima(horz) {
                break;
            }
            pt = self.vertex_pt(self.next_vertex(horz));
        }
        if was_trimmed {
            self.actives[horz].set_dx();
        }
    }

    fn horz_is_spike(&self, horz: usize) -> bool {
        let next_pt = self.vertex_pt(self.next_vertex(horz));
        let a = &self.actives[horz];
        (a.bot.x < a.top.x) != (a.top.x < next_pt.x)
    }

    /// The local maximum ending the horizontal run at the edge's top.
    fn curr_y_maxima_vertex(&self, e: usize) -> Option<usize> {
        let vertices = &self.input.vertices;
        let forward = self.actives[e].wind_dx > 0;
        let mut v = self.actives[e].vertex_top;
        loop {
            let next = if forward { vertices[v].next } else { vertices[v].prev };
            if vertices[next].pt.y != vertices[v].pt.y {
                break;
            }
            v = next;
        }
        if vertices[v].is_maxima() {
            Some(v)
        } else {
            None
        }
    }

    /// As [`curr_y_maxima_vertex`](Self::curr_y_maxima_vertex), but
    /// stopping at the end of an open path.
    fn curr_y_maxima_vertex_open(&self, e: usize) -> Option<usize> {
        let vertices = &self.input.vertices;
        let forward = self.actives[e].wind_dx > 0;
        let mut v = self.actives[e].vertex_top;
        while !vertices[v]
            .flags
            .intersects(VertexFlags::OPEN_END | VertexFlags::LOCAL_MAX)
        {
            let next = if forward { vertices[v].next } else { vertices[v].prev };
            if vertices[next].pt.y != vertices[v].pt.y {
                break;
            }
            v = next;
        }
        if vertices[v].is_maxima() {
            Some(v)
        } else {
            None
        }
    }

    /// Direction of travel and `x` extent of the horizontal.
    fn reset_horz_direction(&self, horz: usize, vertex_max: Option<usize>) -> (bool, i64, i64) {
        let h = &self.actives[horz];
        if h.bot.x == h.top.x {
            // Going nowhere: head towards the maxima pair if it is right.
            let mut e = h.next_in_ael;
            while let Some(k) = e {
                if Some(self.actives[k].vertex_top) == vertex_max {
                    break;
                }
                e = self.actives[k].next_in_ael;
            }
            (e.is_some(), h.curr_x, h.curr_x)
        } else if h.curr_x < h.top.x {
            (true, h.curr_x, h.top.x)
        } else {
            (false, h.top.x, h.curr_x)
        }
    }

    fn add_trial_horz_join(&mut self, op: usize) {
        let outrec = self.rings.pts[op].outrec;
        if self.rings.recs[outrec].is_open {
            return;
        }
        self.horz_segs.push(HorzSegment {
            left_op: op,
            right_op: None,
            left_to_right: true,
        });
    }

    /// Walk the horizontal `horz` across the AEL, crossing every edge
    /// in its way, then continue along any consecutive horizontals of
    /// the same bound.
    pub(super) fn do_horizontal(&mut self, horz: usize) {
        let horz_is_open = self.is_open(horz);
        let y = self.actives[horz].bot.y;
        let vertex_max = if horz_is_open {
            self.curr_y_maxima_vertex_open(horz)
        } else {
            self.curr_y_maxima_vertex(horz)
        };
        if vertex_max.is_some() && !horz_is_open && vertex_max != Some(self.actives[horz].vertex_top) {
            self.trim_horz(horz, self.preserve_collinear);
        }
        let (mut left_to_right, mut horz_left, mut horz_right) = self.reset_horz_direction(horz, vertex_max);

        if self.is_hot(horz) {
            let pt = Point64::new(self.actives[horz].curr_x, y);
            if let Some(op) = self.add_out_pt(horz, pt) {
                self.add_trial_horz_join(op);
            }
        }

        loop {
            let mut e = if left_to_right {
                self.actives[horz].next_in_ael
            } else {
                self.actives[horz].prev_in_ael
            };

            while let Some(ek) = e {
                if Some(self.actives[ek].vertex_top) == vertex_max {
                    // Reached the maxima pair: close and drop both.
                    if self.is_hot(horz) && self.actives[ek].is_joined() {
                        let top = self.actives[ek].top;
                        self.split(ek, top);
                    }
                    if self.is_hot(horz) {
                        while Some(self.actives[horz].vertex_top) != vertex_max && self.succeeded {
                            let top = self.actives[horz].top;
                            self.add_out_pt(horz, top);
                            self.update_edge_into_ael(horz);
                        }
                        let top = self.actives[horz].top;
                        if left_to_right {
                            self.add_local_max_poly(horz, ek, top);
                        } else {
                            self.add_local_max_poly(ek, horz, top);
                        }
                    }
                    self.delete_from_ael(ek);
                    self.delete_from_ael(horz);
                    return;
                }

                // Unless heading for its maxima pair, stop where `ek`
                // lies beyond the horizontal's end.
                if vertex_max != Some(self.actives[horz].vertex_top) || self.is_open_end(horz) {
                    let curr_x = self.actives[ek].curr_x;
                    if (left_to_right && curr_x > horz_right) || (!left_to_right && curr_x < horz_left) {
                        break;
                    }
                    if curr_x == self.actives[horz].top.x && !self.actives[ek].is_horizontal() {
                        let pt = self.vertex_pt(self.next_vertex(horz));
                        let top_x = self.actives[ek].top_x(pt.y);
                        // Open paths only stop once past the end.
                        let passes = self.is_open(ek) && !self.is_same_path_type(ek, horz) && !self.is_hot(ek);
                        let stop = match (left_to_right, passes) {
                            (true, true) => top_x > pt.x,
                            (true, false) => top_x >= pt.x,
                            (false, true) => top_x < pt.x,
                            (false, false) => top_x <= pt.x,
                        };
                        if stop {
                            break;
                        }
                    }
                }

                let pt = Point64::new(self.actives[ek].curr_x, y);
                if left_to_right {
                    self.intersect_edges(horz, ek, pt);
                    self.swap_positions_in_ael(horz, ek);
                    self.check_join_left(ek, pt, false);
                    self.actives[horz].curr_x = self.actives[ek].curr_x;
                    e = self.actives[horz].next_in_ael;
                } else {
                    self.intersect_edges(ek, horz, pt);
                    self.swap_positions_in_ael(ek, horz);
                    self.check_join_right(ek, pt, false);
                    self.actives[horz].curr_x = self.actives[ek].curr_x;
                    e = self.actives[horz].prev_in_ael;
                }

                // The ring `horz` draws may have changed above.
                if let Some(op) = self.get_last_op(horz) {
                    self.add_trial_horz_join(op);
                }
            }

            // Finished with this horizontal; look for consecutive ones.
            if horz_is_open && self.is_open_end(horz) {
                if self.is_hot(horz) {
                    let top = self.actives[horz].top;
                    self.add_out_pt(horz, top);
                    self.detach_from_outrec(horz);
                }
                self.delete_from_ael(horz);
                return;
            }
            if self.vertex_pt(self.next_vertex(horz)).y != self.actives[horz].top.y {
                break;
            }

            if self.is_hot(horz) {
                let top = self.actives[horz].top;
                self.add_out_pt(horz, top);
            }
            self.update_edge_into_ael(horz);
            if self.preserve_collinear && !horz_is_open && self.horz_is_spike(horz) {
                self.trim_horz(horz, true);
            }
            let (ltr, left, right) = self.reset_horz_direction(horz, vertex_max);
            left_to_right = ltr;
            horz_left = left;
            horz_right = right;
        }

        if self.is_hot(horz) {
            let top = self.actives[horz].top;
            if let Some(op) = self.add_out_pt(horz, top) {
                self.add_trial_horz_join(op);
            }
        }
        self.update_edge_into_ael(horz);
    }

    /// Widen segment `i` to the full horizontal run around its point.
    /// Returns `false` if the run is degenerate or already claimed.
    fn update_horz_segment(&mut self, i: usize) -> bool {
        let op = self.horz_segs[i].left_op;
        let outrec = match self.rings.real_outrec(Some(self.rings.pts[op].outrec)) {
            Some(outrec) => outrec,
            None => {
                self.horz_segs[i].right_op = None;
                return false;
            }
        };
        let rings = &self.rings;
        let curr_y = rings.pt(op).y;
        let (mut op_p, mut op_n) = (op, op);
        if rings.recs[outrec].front_edge.is_some() {
            // Still growing: do not run past the ring's open ends.
            let op_a = match rings.recs[outrec].pts {
                Some(pts) => pts,
                None => {
                    self.horz_segs[i].right_op = None;
                    return false;
                }
            };
            let op_z = rings.next(op_a);
            while op_p != op_z && rings.pt(rings.prev(op_p)).y == curr_y {
                op_p = rings.prev(op_p);
            }
            while op_n != op_a && rings.pt(rings.next(op_n)).y == curr_y {
                op_n = rings.next(op_n);
            }
        } else {
            while rings.prev(op_p) != op_n && rings.pt(rings.prev(op_p)).y == curr_y {
                op_p = rings.prev(op_p);
            }
            while rings.next(op_n) != op_p && rings.pt(rings.next(op_n)).y == curr_y {
                op_n = rings.next(op_n);
            }
        }

        let (px, nx) = (rings.pt(op_p).x, rings.pt(op_n).x);
        let hs = &mut self.horz_segs[i];
        if px == nx {
            hs.right_op = None;
            return false;
        }
        if px < nx {
            hs.left_op = op_p;
            hs.right_op = Some(op_n);
            hs.left_to_right = true;
        } else {
            hs.left_op = op_n;
            hs.right_op = Some(op_p);
            hs.left_to_right = false;
        }
        if self.rings.pts[hs.left_op].horz {
            hs.right_op = None;
            return false;
        }
        self.rings.pts[hs.left_op].horz = true;
        true
    }

    /// Pair up opposing horizontal segments that overlap and record
    /// where their rings should be linked.
    pub(super) fn convert_horz_segs_to_joins(&mut self) {
        let valid = (0..self.horz_segs.len())
            .filter(|&i| self.update_horz_segment(i))
            .count();
        if valid < 2 {
            return;
        }
        let rings = &self.rings;
        self.horz_segs
            .sort_by(|a, b| match (a.right_op, b.right_op) {
                (Some(_), Some(_)) => rings.pt(a.left_op).x.cmp(&rings.pt(b.left_op).x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });

        // Segments advance in place, so a later pairing resumes past
        // the points already joined.
        for i in 0..valid - 1 {
            for k in i + 1..valid {
                let (hs1, hs2) = (self.horz_segs[i], self.horz_segs[k]);
                let (r1, r2) = match (hs1.right_op, hs2.right_op) {
                    (Some(r1), Some(r2)) => (r1, r2),
                    _ => continue,
                };
                let rings = &self.rings;
                if rings.pt(hs2.left_op).x >= rings.pt(r1).x
                    || hs2.left_to_right == hs1.left_to_right
                    || rings.pt(r2).x <= rings.pt(hs1.left_op).x
                {
                    continue;
                }

                let curr_y = rings.pt(hs1.left_op).y;
                let (mut l1, mut l2) = (hs1.left_op, hs2.left_op);
                let join = if hs1.left_to_right {
                    while rings.pt(rings.next(l1)).y == curr_y && rings.pt(rings.next(l1)).x <= rings.pt(l2).x {
                        l1 = rings.next(l1);
                    }
                    while rings.pt(rings.prev(l2)).y == curr_y && rings.pt(rings.prev(l2)).x <= rings.pt(l1).x {
                        l2 = rings.prev(l2);
                    }
                    self.horz_segs[i].left_op = l1;
                    self.horz_segs[k].left_op = l2;
                    HorzJoin {
                        op1: self.rings.duplicate_op(l1, true),
                        op2: self.rings.duplicate_op(l2, false),
                    }
                } else {
                    while rings.pt(rings.prev(l1)).y == curr_y && rings.pt(rings.prev(l1)).x <= rings.pt(l2).x {
                        l1 = rings.prev(l1);
                    }
                    while rings.pt(rings.next(l2)).y == curr_y && rings.pt(rings.next(l2)).x <= rings.pt(l1).x {
                        l2 = rings.next(l2);
                    }
                    self.horz_segs[i].left_op = l1;
                    self.horz_segs[k].left_op = l2;
                    HorzJoin {
                        op1: self.rings.duplicate_op(l2, true),
                        op2: self.rings.duplicate_op(l1, false),
                    }
                };
                self.horz_joins.push(join);
            }
        }
    }

    /// Link the recorded seams. Linking two points of one ring splits
    /// it in two.
    pub(super) fn process_horz_joins(&mut self) {
        let joins = std::mem::take(&mut self.horz_joins);
        if !joins.is_empty() {
            trace!("processing {n} horizontal joins", n = joins.len());
        }
        for HorzJoin { op1, op2 } in joins {
            let or1 = self.rings.real_outrec(Some(self.rings.pts[op1].outrec));
            let or2 = self.rings.real_outrec(Some(self.rings.pts[op2].outrec));
            let (or1, or2) = match (or1, or2) {
                (Some(or1), Some(or2)) => (or1, or2),
                _ => continue,
            };

            let op1b = self.rings.next(op1);
            let op2b = self.rings.prev(op2);
            self.rings.pts[op1].next = op2;
            self.rings.pts[op2].prev = op1;
            self.rings.pts[op1b].prev = op2b;
            self.rings.pts[op2b].next = op1b;

            if or1 == or2 {
                let or2 = self.rings.new_outrec();
                self.rings.recs[or2].pts = Some(op1b);
                self.rings.fix_outrec_pts(or2);

                // The anchor of `or1` may have moved to `or2`.
                if let Some(pts) = self.rings.recs[or1].pts {
                    if self.rings.pts[pts].outrec == or2 {
                        self.rings.recs[or1].pts = Some(op1);
                        self.rings.pts[op1].outrec = or1;
                    }
                }

                if self.using_polytree {
                    let (p1, p2) = match (self.rings.recs[or1].pts, self.rings.recs[or2].pts) {
                        (Some(p1), Some(p2)) => (p1, p2),
                        _ => continue,
                    };
                    if self.rings.path1_inside_path2(p1, p2) {
                        self.rings.recs[or1].pts = Some(p2);
                        self.rings.recs[or2].pts = Some(p1);
                        self.rings.fix_outrec_pts(or1);
                        self.rings.fix_outrec_pts(or2);
                        self.rings.recs[or2].owner = Some(or1);
                    } else if self.rings.path1_inside_path2(p2, p1) {
                        self.rings.recs[or2].owner = Some(or1);
                    } else {
                        self.rings.recs[or2].owner = self.rings.recs[or1].owner;
                    }
                    self.rings.recs[or1].splits.push(or2);
                } else {
                    self.rings.recs[or2].owner = Some(or1);
                }
            } else {
                self.rings.recs[or2].pts = None;
                if self.using_polytree {
                    self.rings.set_owner(or2, or1);
                    self.rings.move_splits(or2, or1);
                } else {
                    self.rings.recs[or2].owner = Some(or1);
                }
            }
        }
    }
}
