use std::cmp::Ordering;

use log::{debug, trace};
use slab::Slab;

use super::{
    horizontal::{HorzJoin, HorzSegment},
    intersect::IntersectNode,
    ClipType, ClipperOptions, FillRule, PathType,
};
use crate::{
    active::{Active, JoinWith},
    events::{LocalMinima, MinimaCursor, Scanlines},
    outrec::OutRings,
    point::Point64,
    primitives::{cross_product_sign, is_collinear},
    vertex::{InputGeometry, VertexFlags},
};

/// State of one sweep over the input geometry.
///
/// Active edges live in a slab; the active edge list (AEL) and the
/// sorted edge list (SEL) are threaded through them as key links.
/// Output rings accumulate in [`OutRings`] and are read back once the
/// sweep completes.
pub(crate) struct Sweep<'a> {
    pub(super) input: &'a InputGeometry,
    pub(super) clip_type: ClipType,
    pub(super) fill_rule: FillRule,
    pub(super) preserve_collinear: bool,
    pub(super) reverse_solution: bool,
    pub(super) using_polytree: bool,

    minima: MinimaCursor,
    pub(super) scanlines: Scanlines,
    pub(super) actives: Slab<Active>,
    /// Leftmost edge of the AEL.
    pub(super) ael: Option<usize>,
    /// Leftmost edge of the SEL.
    pub(super) sel: Option<usize>,
    /// Horizontal edges waiting to be processed at the current `y`.
    pub(super) horz_stack: Vec<usize>,
    pub(super) rings: OutRings,
    pub(super) intersect_nodes: Vec<IntersectNode>,
    pub(super) horz_segs: Vec<HorzSegment>,
    pub(super) horz_joins: Vec<HorzJoin>,
    /// Bottom of the current scanbeam.
    pub(super) bot_y: i64,
    pub(super) succeeded: bool,
}

impl<'a> Sweep<'a> {
    pub(super) fn new(
        input: &'a InputGeometry,
        clip_type: ClipType,
        fill_rule: FillRule,
        options: &ClipperOptions,
        using_polytree: bool,
    ) -> Self {
        Sweep {
            input,
            clip_type,
            fill_rule,
            preserve_collinear: options.preserve_collinear,
            reverse_solution: options.reverse_solution,
            using_polytree,
            minima: MinimaCursor::default(),
            scanlines: Scanlines::default(),
            actives: Slab::with_capacity(input.minima.len() * 2),
            ael: None,
            sel: None,
            horz_stack: Vec::new(),
            rings: OutRings::default(),
            intersect_nodes: Vec::new(),
            horz_segs: Vec::new(),
            horz_joins: Vec::new(),
            bot_y: 0,
            succeeded: true,
        }
    }

    /// Run the sweep to completion; returns `false` if it had to abort.
    pub(super) fn execute(&mut self) -> bool {
        let input = self.input;
        for lm in input.minima.iter().rev() {
            self.scanlines.insert(input.vertices[lm.vertex].pt.y);
        }
        let mut y = match self.scanlines.pop() {
            Some(y) => y,
            None => return true,
        };
        while self.succeeded {
            trace!("scanline at y = {y}");
            self.insert_local_minima_into_ael(y);
            while let Some(horz) = self.pop_horz() {
                self.do_horizontal(horz);
            }
            if !self.horz_segs.is_empty() {
                self.convert_horz_segs_to_joins();
                self.horz_segs.clear();
            }
            self.bot_y = y;
            y = match self.scanlines.pop() {
                Some(y) => y,
                None => break,
            };
            self.do_intersections(y);
            self.do_top_of_scanbeam(y);
            while let Some(horz) = self.pop_horz() {
                self.do_horizontal(horz);
            }
        }
        if self.succeeded {
            self.process_horz_joins();
        } else {
            debug!("sweep aborted at y = {y}");
        }
        self.succeeded
    }

    #[inline]
    pub(super) fn local_min(&self, e: usize) -> &LocalMinima {
        &self.input.minima[self.actives[e].local_min]
    }

    #[inline]
    pub(super) fn is_open(&self, e: usize) -> bool {
        self.local_min(e).is_open
    }

    #[inline]
    pub(super) fn path_type(&self, e: usize) -> PathType {
        self.local_min(e).path_type
    }

    #[inline]
    pub(super) fn is_same_path_type(&self, e1: usize, e2: usize) -> bool {
        self.path_type(e1) == self.path_type(e2)
    }

    #[inline]
    pub(super) fn vertex_pt(&self, v: usize) -> Point64 {
        self.input.vertices[v].pt
    }

    #[inline]
    pub(super) fn is_maxima(&self, e: usize) -> bool {
        self.input.vertices[self.actives[e].vertex_top].is_maxima()
    }

    #[inline]
    pub(super) fn is_open_end(&self, e: usize) -> bool {
        self.input.vertices[self.actives[e].vertex_top].is_open_end()
    }

    #[inline]
    pub(super) fn is_hot(&self, e: usize) -> bool {
        self.actives[e].is_hot()
    }

    /// The vertex after the edge's top, following its bound.
    pub(super) fn next_vertex(&self, e: usize) -> usize {
        let a = &self.actives[e];
        let v = &self.input.vertices[a.vertex_top];
        if a.wind_dx > 0 {
            v.next
        } else {
            v.prev
        }
    }

    /// The vertex two steps behind the edge's top.
    fn prev_prev_vertex(&self, e: usize) -> usize {
        let a = &self.actives[e];
        let vertices = &self.input.vertices;
        if a.wind_dx > 0 {
            vertices[vertices[a.vertex_top].prev].prev
        } else {
            vertices[vertices[a.vertex_top].next].next
        }
    }

    /// Whether `newcomer` belongs to the right of `resident` in the AEL.
    fn is_valid_ael_order(&self, resident: usize, newcomer: usize) -> bool {
        let res = &self.actives[resident];
        let new = &self.actives[newcomer];
        if new.curr_x != res.curr_x {
            return new.curr_x > res.curr_x;
        }

        // Turning direction of `res.top, new.bot, new.top`.
        match cross_product_sign(res.top, new.bot, new.top) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }

        // Collinear: look ahead to where the edges turn next.
        if !self.is_maxima(resident) && res.top.y > new.top.y {
            let next = self.vertex_pt(self.next_vertex(resident));
            return cross_product_sign(new.bot, res.top, next) != Ordering::Greater;
        }
        if !self.is_maxima(newcomer) && new.top.y > res.top.y {
            let next = self.vertex_pt(self.next_vertex(newcomer));
            return cross_product_sign(new.bot, new.top, next) != Ordering::Less;
        }

        let y = new.bot.y;
        let newcomer_is_left = new.is_left_bound;
        let res_min_y = self.vertex_pt(self.local_min(resident).vertex).y;
        if res.bot.y != y || res_min_y != y {
            return newcomer_is_left;
        }
        // Resident was also just inserted.
        if res.is_left_bound != newcomer_is_left {
            return newcomer_is_left;
        }
        let res_pp = self.vertex_pt(self.prev_prev_vertex(resident));
        if is_collinear(res_pp, res.bot, res.top) {
            return true;
        }
        let new_pp = self.vertex_pt(self.prev_prev_vertex(newcomer));
        (cross_product_sign(res_pp, new.bot, new_pp) == Ordering::Greater) == newcomer_is_left
    }

    fn insert_left_edge(&mut self, e: usize) {
        let head = match self.ael {
            None => {
                self.actives[e].prev_in_ael = None;
                self.actives[e].next_in_ael = None;
                self.ael = Some(e);
                return;
            }
            Some(head) => head,
        };
        if !self.is_valid_ael_order(head, e) {
            self.actives[e].prev_in_ael = None;
            self.actives[e].next_in_ael = Some(head);
            self.actives[head].prev_in_ael = Some(e);
            self.ael = Some(e);
            return;
        }

        let mut e2 = head;
        while let Some(next) = self.actives[e2].next_in_ael {
            if !self.is_valid_ael_order(next, e) {
                break;
            }
            e2 = next;
        }
        // Never separate a joined pair.
        if self.actives[e2].join_with == JoinWith::Right {
            match self.actives[e2].next_in_ael {
                Some(next) => e2 = next,
                None => return,
            }
        }
        let next = self.actives[e2].next_in_ael;
        self.actives[e].next_in_ael = next;
        if let Some(next) = next {
            self.actives[next].prev_in_ael = Some(e);
        }
        self.actives[e].prev_in_ael = Some(e2);
        self.actives[e2].next_in_ael = Some(e);
    }

    /// Insert `e2` immediately right of `e`.
    fn insert_right_edge(&mut self, e: usize, e2: usize) {
        let next = self.actives[e].next_in_ael;
        self.actives[e2].next_in_ael = next;
        if let Some(next) = next {
            self.actives[next].prev_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = Some(e);
        self.actives[e].next_in_ael = Some(e2);
    }

    /// Swap `e1` with its right neighbour `e2`.
    pub(super) fn swap_positions_in_ael(&mut self, e1: usize, e2: usize) {
        let next = self.actives[e2].next_in_ael;
        if let Some(next) = next {
            self.actives[next].prev_in_ael = Some(e1);
        }
        let prev = self.actives[e1].prev_in_ael;
        if let Some(prev) = prev {
            self.actives[prev].next_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = prev;
        self.actives[e2].next_in_ael = Some(e1);
        self.actives[e1].prev_in_ael = Some(e2);
        self.actives[e1].next_in_ael = next;
        if prev.is_none() {
            self.ael = Some(e2);
        }
    }

    /// Unlink `e` from the AEL and release it.
    pub(super) fn delete_from_ael(&mut self, e: usize) {
        let (prev, next) = match self.actives.get(e) {
            Some(a) => (a.prev_in_ael, a.next_in_ael),
            None => return,
        };
        if prev.is_none() && next.is_none() && self.ael != Some(e) {
            return;
        }
        match prev {
            Some(prev) => self.actives[prev].next_in_ael = next,
            None => self.ael = next,
        }
        if let Some(next) = next {
            self.actives[next].prev_in_ael = prev;
        }
        let removed = self.actives.remove(e);
        // Keys get reused; drop any ring references to this edge.
        if let Some(outrec) = removed.outrec {
            let rec = &mut self.rings.recs[outrec];
            if rec.front_edge == Some(e) {
                rec.front_edge = None;
            }
            if rec.back_edge == Some(e) {
                rec.back_edge = None;
            }
        }
    }

    /// Advance `e` to the next segment of its bound.
    pub(super) fn update_edge_into_ael(&mut self, e: usize) {
        let vertex_top = self.next_vertex(e);
        let top = self.vertex_pt(vertex_top);
        let a = &mut self.actives[e];
        a.bot = a.top;
        a.vertex_top = vertex_top;
        a.top = top;
        a.curr_x = a.bot.x;
        a.set_dx();
        let bot = a.bot;

        if self.actives[e].is_joined() {
            self.split(e, bot);
        }
        if self.actives[e].is_horizontal() {
            if !self.is_open(e) {
                self.trim_horz(e, self.preserve_collinear);
            }
            return;
        }
        self.scanlines.insert(top.y);
        self.check_join_left(e, bot, false);
        self.check_join_right(e, bot, true);
    }

    /// The other bound spawned by the same local minimum as `e`.
    pub(super) fn find_edge_with_matching_loc_min(&self, e: usize) -> Option<usize> {
        let (local_min, bot) = (self.actives[e].local_min, self.actives[e].bot);
        let mut result = self.actives[e].next_in_ael;
        while let Some(r) = result {
            let a = &self.actives[r];
            if a.local_min == local_min {
                return Some(r);
            }
            if !a.is_horizontal() && bot != a.bot {
                break;
            }
            result = a.next_in_ael;
        }
        result = self.actives[e].prev_in_ael;
        while let Some(r) = result {
            let a = &self.actives[r];
            if a.local_min == local_min {
                return Some(r);
            }
            if !a.is_horizontal() && bot != a.bot {
                return None;
            }
            result = a.prev_in_ael;
        }
        None
    }

    fn new_bound(&mut self, bot: Point64, vertex_top: usize, wind_dx: i32, local_min: usize) -> usize {
        let top = self.vertex_pt(vertex_top);
        self.actives
            .insert(Active::new(bot, top, wind_dx, vertex_top, local_min))
    }

    pub(super) fn insert_local_minima_into_ael(&mut self, bot_y: i64) {
        let input = self.input;
        while let Some(lm) = self
            .minima
            .pop_at(bot_y, &input.minima, |v| input.vertices[v].pt.y)
        {
            let vertex = &input.vertices[input.minima[lm].vertex];

            // The left bound descends (via `prev`), the right ascends.
            let mut left = if vertex.flags.contains(VertexFlags::OPEN_START) {
                None
            } else {
                Some(self.new_bound(vertex.pt, vertex.prev, -1, lm))
            };
            let mut right = if vertex.flags.contains(VertexFlags::OPEN_END) {
                None
            } else {
                Some(self.new_bound(vertex.pt, vertex.next, 1, lm))
            };

            // Swap if the bounds are not yet in left to right order.
            match (left, right) {
                (Some(l), Some(r)) => {
                    let (le, re) = (&self.actives[l], &self.actives[r]);
                    let swap = if le.is_horizontal() {
                        le.is_heading_right_horz()
                    } else if re.is_horizontal() {
                        re.is_heading_left_horz()
                    } else {
                        le.dx < re.dx
                    };
                    if swap {
                        std::mem::swap(&mut left, &mut right);
                    }
                }
                (None, _) => {
                    left = right.take();
                }
                _ => {}
            }
            let left = match left {
                Some(left) => left,
                None => continue,
            };

            self.actives[left].is_left_bound = true;
            self.insert_left_edge(left);
            let contributing = if self.is_open(left) {
                self.set_wind_count_for_open_path_edge(left);
                self.is_contributing_open(left)
            } else {
                self.set_wind_count_for_closed_path_edge(left);
                self.is_contributing_closed(left)
            };

            if let Some(right) = right {
                let (wind_cnt, wind_cnt2) = (self.actives[left].wind_cnt, self.actives[left].wind_cnt2);
                let r = &mut self.actives[right];
                r.is_left_bound = false;
                r.wind_cnt = wind_cnt;
                r.wind_cnt2 = wind_cnt2;
                self.insert_right_edge(left, right);

                if contributing {
                    let bot = self.actives[left].bot;
                    self.add_local_min_poly(left, right, bot, true);
                    if !self.actives[left].is_horizontal() {
                        self.check_join_left(left, bot, false);
                    }
                }

                while let Some(next) = self.actives[right].next_in_ael {
                    if !self.is_valid_ael_order(next, right) {
                        break;
                    }
                    let bot = self.actives[right].bot;
                    self.intersect_edges(right, next, bot);
                    self.swap_positions_in_ael(right, next);
                }

                if self.actives[right].is_horizontal() {
                    self.push_horz(right);
                } else {
                    let (bot, top) = (self.actives[right].bot, self.actives[right].top);
                    self.check_join_right(right, bot, false);
                    self.scanlines.insert(top.y);
                }
            } else if contributing {
                let bot = self.actives[left].bot;
                self.start_open_path(left, bot);
            }

            if self.actives[left].is_horizontal() {
                self.push_horz(left);
            } else {
                let top = self.actives[left].top;
                self.scanlines.insert(top.y);
            }
        }
    }

    /// Move every edge to scanline `y`, closing maxima and advancing
    /// edges whose top was reached.
    fn do_top_of_scanbeam(&mut self, y: i64) {
        self.horz_stack.clear();
        let mut e = self.ael;
        while let Some(k) = e {
            // `k` is never horizontal here.
            if self.actives[k].top.y == y {
                let top = self.actives[k].top;
                self.actives[k].curr_x = top.x;
                if self.is_maxima(k) {
                    e = self.do_maxima(k);
                    continue;
                }
                if self.is_hot(k) {
                    self.add_out_pt(k, top);
                }
                self.update_edge_into_ael(k);
                if self.actives[k].is_horizontal() {
                    self.push_horz(k);
                }
            } else {
                let x = self.actives[k].top_x(y);
                self.actives[k].curr_x = x;
            }
            e = self.actives[k].next_in_ael;
        }
    }

    /// The edge sharing `e`'s top vertex further right in the AEL.
    fn maxima_pair(&self, e: usize) -> Option<usize> {
        let vertex_top = self.actives[e].vertex_top;
        let mut e2 = self.actives[e].next_in_ael;
        while let Some(k) = e2 {
            if self.actives[k].vertex_top == vertex_top {
                return Some(k);
            }
            e2 = self.actives[k].next_in_ael;
        }
        None
    }

    /// Close the bound pair meeting at `e`'s top and return the edge
    /// to continue from.
    fn do_maxima(&mut self, e: usize) -> Option<usize> {
        let prev_e = self.actives[e].prev_in_ael;
        let mut next_e = self.actives[e].next_in_ael;
        let top = self.actives[e].top;

        if self.is_open_end(e) {
            if self.is_hot(e) {
                self.add_out_pt(e, top);
            }
            if !self.actives[e].is_horizontal() {
                self.detach_from_outrec(e);
                self.delete_from_ael(e);
            }
            return next_e;
        }

        // A horizontal maxima pair is handled with the horizontals.
        let max_pair = match self.maxima_pair(e) {
            Some(max_pair) => max_pair,
            None => return next_e,
        };
        if self.actives[e].is_joined() {
            self.split(e, top);
        }
        if self.actives[max_pair].is_joined() {
            let pair_top = self.actives[max_pair].top;
            self.split(max_pair, pair_top);
        }

        // Resolve any edges between the pair.
        while next_e != Some(max_pair) {
            let next = match next_e {
                Some(next) => next,
                None => {
                    self.succeeded = false;
                    return None;
                }
            };
            self.intersect_edges(e, next, top);
            self.swap_positions_in_ael(e, next);
            next_e = self.actives[e].next_in_ael;
        }

        if self.is_hot(e) {
            self.add_local_max_poly(e, max_pair, top);
        }
        if self.is_open(e) {
            self.delete_from_ael(max_pair);
            self.delete_from_ael(e);
        } else {
            self.delete_from_ael(e);
            self.delete_from_ael(max_pair);
        }
        match prev_e {
            Some(prev) => self.actives[prev].next_in_ael,
            None => self.ael,
        }
    }
}
