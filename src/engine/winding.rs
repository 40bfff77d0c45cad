//! Winding numbers and the edge-crossing rule.
//!
//! Every active edge carries two winding counts: `wind_cnt` over the
//! paths of its own type and `wind_cnt2` over the other type. Together
//! with the fill rule they decide which side of an edge is filled, and
//! hence whether the edge draws output.
use super::{sweep::Sweep, ClipType, FillRule, PathType};
use crate::point::Point64;

impl<'a> Sweep<'a> {
    /// Winding count as seen by the fill rule: `1` means "just inside".
    #[inline]
    fn normalized(&self, wind_cnt: i32) -> i32 {
        match self.fill_rule {
            FillRule::EvenOdd | FillRule::NonZero => wind_cnt.abs(),
            FillRule::Positive => wind_cnt,
            FillRule::Negative => -wind_cnt,
        }
    }

    pub(super) fn set_wind_count_for_closed_path_edge(&mut self, e: usize) {
        // Nearest closed edge of the same type to the left.
        let path_type = self.path_type(e);
        let mut e2 = self.actives[e].prev_in_ael;
        while let Some(k) = e2 {
            if self.path_type(k) == path_type && !self.is_open(k) {
                break;
            }
            e2 = self.actives[k].prev_in_ael;
        }

        let wind_dx = self.actives[e].wind_dx;
        let mut walk = match e2 {
            None => {
                self.actives[e].wind_cnt = wind_dx;
                self.ael
            }
            Some(k) if self.fill_rule == FillRule::EvenOdd => {
                self.actives[e].wind_cnt = wind_dx;
                self.actives[e].wind_cnt2 = self.actives[k].wind_cnt2;
                self.actives[k].next_in_ael
            }
            Some(k) => {
                let (cnt2, dx2) = (self.actives[k].wind_cnt, self.actives[k].wind_dx);
                // Neither count nor direction of `k` is ever zero.
                let wind_cnt = if cnt2 * dx2 < 0 {
                    // `e` lies outside `k`.
                    if cnt2.abs() > 1 {
                        if dx2 * wind_dx < 0 {
                            cnt2
                        } else {
                            cnt2 + wind_dx
                        }
                    } else if self.is_open(e) {
                        1
                    } else {
                        wind_dx
                    }
                } else if dx2 * wind_dx < 0 {
                    // `e` lies inside `k` and reverses direction.
                    cnt2
                } else {
                    cnt2 + wind_dx
                };
                self.actives[e].wind_cnt = wind_cnt;
                self.actives[e].wind_cnt2 = self.actives[k].wind_cnt2;
                self.actives[k].next_in_ael
            }
        };

        // Count the other type's edges between `e2` and `e`.
        while let Some(k) = walk {
            if k == e {
                break;
            }
            if self.path_type(k) != path_type && !self.is_open(k) {
                let a2 = &self.actives[k];
                let toggled = if self.fill_rule == FillRule::EvenOdd {
                    (self.actives[e].wind_cnt2 == 0) as i32
                } else {
                    self.actives[e].wind_cnt2 + a2.wind_dx
                };
                self.actives[e].wind_cnt2 = toggled;
            }
            walk = self.actives[k].next_in_ael;
        }
    }

    pub(super) fn set_wind_count_for_open_path_edge(&mut self, e: usize) {
        let mut cnt1 = 0;
        let mut cnt2 = 0;
        let mut walk = self.ael;
        while let Some(k) = walk {
            if k == e {
                break;
            }
            let step = if self.fill_rule == FillRule::EvenOdd {
                1
            } else {
                self.actives[k].wind_dx
            };
            if self.path_type(k) == PathType::Clip {
                cnt2 += step;
            } else if !self.is_open(k) {
                cnt1 += step;
            }
            walk = self.actives[k].next_in_ael;
        }
        let a = &mut self.actives[e];
        if self.fill_rule == FillRule::EvenOdd {
            a.wind_cnt = cnt1 & 1;
            a.wind_cnt2 = cnt2 & 1;
        } else {
            a.wind_cnt = cnt1;
            a.wind_cnt2 = cnt2;
        }
    }

    pub(super) fn is_contributing_closed(&self, e: usize) -> bool {
        let a = &self.actives[e];
        let own_ok = match self.fill_rule {
            FillRule::EvenOdd => true,
            FillRule::NonZero => a.wind_cnt.abs() == 1,
            FillRule::Positive => a.wind_cnt == 1,
            FillRule::Negative => a.wind_cnt == -1,
        };
        if !own_ok {
            return false;
        }

        // Is the other type's region absent at `e`?
        let outside_other = match self.fill_rule {
            FillRule::Positive => a.wind_cnt2 <= 0,
            FillRule::Negative => a.wind_cnt2 >= 0,
            _ => a.wind_cnt2 == 0,
        };
        match self.clip_type {
            ClipType::Intersection => !outside_other,
            ClipType::Union => outside_other,
            ClipType::Difference => outside_other == (self.path_type(e) == PathType::Subject),
            ClipType::Xor => true,
        }
    }

    pub(super) fn is_contributing_open(&self, e: usize) -> bool {
        let a = &self.actives[e];
        let (in_subj, in_clip) = match self.fill_rule {
            FillRule::Positive => (a.wind_cnt > 0, a.wind_cnt2 > 0),
            FillRule::Negative => (a.wind_cnt < 0, a.wind_cnt2 < 0),
            _ => (a.wind_cnt != 0, a.wind_cnt2 != 0),
        };
        match self.clip_type {
            ClipType::Intersection => in_clip,
            ClipType::Union => !in_subj && !in_clip,
            _ => !in_clip,
        }
    }

    /// Apply the crossing of adjacent edges `e1` (left) and `e2` at
    /// `pt`: update their winding counts and emit output accordingly.
    pub(super) fn intersect_edges(&mut self, e1: usize, e2: usize, pt: Point64) {
        if self.input.has_open_paths && (self.is_open(e1) || self.is_open(e2)) {
            self.intersect_open_edge(e1, e2, pt);
            return;
        }

        if self.actives[e1].is_joined() {
            self.split(e1, pt);
        }
        if self.actives[e2].is_joined() {
            self.split(e2, pt);
        }

        let (dx1, dx2) = (self.actives[e1].wind_dx, self.actives[e2].wind_dx);
        if self.is_same_path_type(e1, e2) {
            if self.fill_rule == FillRule::EvenOdd {
                let w1 = self.actives[e1].wind_cnt;
                self.actives[e1].wind_cnt = self.actives[e2].wind_cnt;
                self.actives[e2].wind_cnt = w1;
            } else {
                let w1 = self.actives[e1].wind_cnt;
                self.actives[e1].wind_cnt = if w1 + dx2 == 0 { -w1 } else { w1 + dx2 };
                let w2 = self.actives[e2].wind_cnt;
                self.actives[e2].wind_cnt = if w2 - dx1 == 0 { -w2 } else { w2 - dx1 };
            }
        } else if self.fill_rule == FillRule::EvenOdd {
            let a1 = &mut self.actives[e1];
            a1.wind_cnt2 = (a1.wind_cnt2 == 0) as i32;
            let a2 = &mut self.actives[e2];
            a2.wind_cnt2 = (a2.wind_cnt2 == 0) as i32;
        } else {
            self.actives[e1].wind_cnt2 += dx2;
            self.actives[e2].wind_cnt2 -= dx1;
        }

        let old1 = self.normalized(self.actives[e1].wind_cnt);
        let old2 = self.normalized(self.actives[e2].wind_cnt);
        let in_01 = |w: i32| w == 0 || w == 1;
        let (hot1, hot2) = (self.is_hot(e1), self.is_hot(e2));
        if (!hot1 && !in_01(old1)) || (!hot2 && !in_01(old2)) {
            return;
        }

        if hot1 && hot2 {
            if !in_01(old1)
                || !in_01(old2)
                || (!self.is_same_path_type(e1, e2) && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(e1, e2, pt);
            } else if self.is_front(e1) || self.actives[e1].outrec == self.actives[e2].outrec {
                // Edges touching at a vertex: close one ring and start
                // another.
                self.add_local_max_poly(e1, e2, pt);
                self.add_local_min_poly(e1, e2, pt, false);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_outrecs(e1, e2);
            }
        } else if hot1 {
            self.add_out_pt(e1, pt);
            self.swap_outrecs(e1, e2);
        } else if hot2 {
            self.add_out_pt(e2, pt);
            self.swap_outrecs(e1, e2);
        } else {
            let w1 = self.normalized(self.actives[e1].wind_cnt2);
            let w2 = self.normalized(self.actives[e2].wind_cnt2);
            if !self.is_same_path_type(e1, e2) {
                self.add_local_min_poly(e1, e2, pt, false);
            } else if old1 == 1 && old2 == 1 {
                let starts = match self.clip_type {
                    ClipType::Union => w1 <= 0 && w2 <= 0,
                    ClipType::Difference => match self.path_type(e1) {
                        PathType::Clip => w1 > 0 && w2 > 0,
                        PathType::Subject => w1 <= 0 && w2 <= 0,
                    },
                    ClipType::Xor => true,
                    ClipType::Intersection => w1 > 0 && w2 > 0,
                };
                if starts {
                    self.add_local_min_poly(e1, e2, pt, false);
                }
            }
        }
    }

    /// Crossing where at least one edge belongs to an open path. Open
    /// paths never interact with each other; they only toggle output
    /// when entering or leaving a filled closed region.
    fn intersect_open_edge(&mut self, e1: usize, e2: usize, pt: Point64) {
        let (edge_o, edge_c) = match (self.is_open(e1), self.is_open(e2)) {
            (true, true) => return,
            (true, false) => (e1, e2),
            _ => (e2, e1),
        };
        if self.actives[edge_c].is_joined() {
            self.split(edge_c, pt);
        }

        let wind_cnt = self.actives[edge_c].wind_cnt;
        if wind_cnt.abs() != 1 {
            return;
        }
        match self.clip_type {
            ClipType::Union => {
                if !self.is_hot(edge_c) {
                    return;
                }
            }
            _ => {
                if self.path_type(edge_c) == PathType::Subject {
                    return;
                }
            }
        }
        match self.fill_rule {
            FillRule::Positive if wind_cnt != 1 => return,
            FillRule::Negative if wind_cnt != -1 => return,
            _ => {}
        }

        if self.is_hot(edge_o) {
            self.add_out_pt(edge_o, pt);
            self.detach_from_outrec(edge_o);
            return;
        }

        // Horizontals can pass under open paths at a local minimum.
        let min_vertex = &self.input.vertices[self.local_min(edge_o).vertex];
        if pt == min_vertex.pt && !min_vertex.is_open_end() {
            let e3 = self
                .find_edge_with_matching_loc_min(edge_o)
                .filter(|&e3| self.is_hot(e3));
            if let Some(e3) = e3 {
                if let Some(outrec) = self.actives[e3].outrec {
                    self.actives[edge_o].outrec = Some(outrec);
                    if self.actives[edge_o].wind_dx > 0 {
                        self.set_sides(outrec, edge_o, e3);
                    } else {
                        self.set_sides(outrec, e3, edge_o);
                    }
                    return;
                }
            }
        }
        self.start_open_path(edge_o, pt);
    }
}
