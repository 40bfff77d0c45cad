//! Crossings between the top and bottom of a scanbeam.
//!
//! Edge positions at the top of the beam are computed first; a merge
//! sort of the edges by their new `x` (over the sorted edge list) then
//! yields exactly the pairs that must swap, always as neighbours.
use log::trace;

use super::sweep::Sweep;
use crate::{
    active::JoinWith,
    point::Point64,
    primitives::{closest_point_on_segment, segment_intersect_point},
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct IntersectNode {
    pt: Point64,
    edge1: usize,
    edge2: usize,
}

impl<'a> Sweep<'a> {
    pub(super) fn do_intersections(&mut self, top_y: i64) {
        if self.build_intersect_list(top_y) {
            trace!(
                "{n} crossings between y = {bot} and {top_y}",
                n = self.intersect_nodes.len(),
                bot = self.bot_y
            );
            self.process_intersect_list();
        }
        self.intersect_nodes.clear();
    }

    /// Move every edge to `top_y` and copy the AEL into the SEL.
    fn adjust_curr_x_and_copy_to_sel(&mut self, top_y: i64) {
        let mut e = self.ael;
        self.sel = e;
        while let Some(k) = e {
            let (prev, next) = (self.actives[k].prev_in_ael, self.actives[k].next_in_ael);
            let curr_x = match prev {
                Some(prev) if self.actives[k].join_with == JoinWith::Left => self.actives[prev].curr_x,
                _ => self.actives[k].top_x(top_y),
            };
            let a = &mut self.actives[k];
            a.prev_in_sel = prev;
            a.next_in_sel = next;
            a.jump = next;
            a.curr_x = curr_x;
            e = next;
        }
    }

    fn extract_from_sel(&mut self, e: usize) -> Option<usize> {
        let (prev, next) = (self.actives[e].prev_in_sel, self.actives[e].next_in_sel);
        if let Some(next) = next {
            self.actives[next].prev_in_sel = prev;
        }
        if let Some(prev) = prev {
            self.actives[prev].next_in_sel = next;
        }
        next
    }

    fn insert1_before2_in_sel(&mut self, e1: usize, e2: usize) {
        let prev = self.actives[e2].prev_in_sel;
        self.actives[e1].prev_in_sel = prev;
        if let Some(prev) = prev {
            self.actives[prev].next_in_sel = Some(e1);
        }
        self.actives[e1].next_in_sel = Some(e2);
        self.actives[e2].prev_in_sel = Some(e1);
    }

    /// Bottom-up merge sort of the SEL by `curr_x`. Runs of doubling
    /// length are linked through `jump`; every time an edge moves left
    /// past others, each pair it passes is recorded as a crossing.
    fn build_intersect_list(&mut self, top_y: i64) -> bool {
        match self.ael {
            Some(head) if self.actives[head].next_in_ael.is_some() => {}
            _ => return false,
        }
        self.adjust_curr_x_and_copy_to_sel(top_y);

        let mut left = self.sel;
        while left.map_or(false, |l| self.actives[l].jump.is_some()) {
            let mut prev_base: Option<usize> = None;
            while let Some(l) = left {
                let right = match self.actives[l].jump {
                    Some(right) => right,
                    None => break,
                };
                let mut curr_base = l;
                let mut l_cur = l;
                let mut l_end = Some(right);
                let mut r_cur = Some(right);
                let r_end = self.actives[right].jump;
                self.actives[l].jump = r_end;

                while Some(l_cur) != l_end && r_cur != r_end {
                    let r = match r_cur {
                        Some(r) => r,
                        None => break,
                    };
                    if self.actives[r].curr_x < self.actives[l_cur].curr_x {
                        let mut tmp = self.actives[r].prev_in_sel;
                        while let Some(t) = tmp {
                            self.add_new_intersect_node(t, r, top_y);
                            if t == l_cur {
                                break;
                            }
                            tmp = self.actives[t].prev_in_sel;
                        }

                        r_cur = self.extract_from_sel(r);
                        l_end = r_cur;
                        self.insert1_before2_in_sel(r, l_cur);
                        if l_cur == curr_base {
                            curr_base = r;
                            self.actives[curr_base].jump = r_end;
                            match prev_base {
                                None => self.sel = Some(curr_base),
                                Some(prev_base) => self.actives[prev_base].jump = Some(curr_base),
                            }
                        }
                    } else {
                        match self.actives[l_cur].next_in_sel {
                            Some(next) => l_cur = next,
                            None => break,
                        }
                    }
                }
                prev_base = Some(curr_base);
                left = r_end;
            }
            left = self.sel;
        }
        !self.intersect_nodes.is_empty()
    }

    fn add_new_intersect_node(&mut self, e1: usize, e2: usize, top_y: i64) {
        let (a1, a2) = (&self.actives[e1], &self.actives[e2]);
        let mut ip = segment_intersect_point(a1.bot, a1.top, a2.bot, a2.top)
            .unwrap_or_else(|| Point64::new(a1.curr_x, top_y));

        // Rounding may place the crossing outside the scanbeam; pull it
        // back onto the steeper edge, or clamp to the beam otherwise.
        if ip.y > self.bot_y || ip.y < top_y {
            let (abs_dx1, abs_dx2) = (a1.dx.abs(), a2.dx.abs());
            ip = match (abs_dx1 > 100., abs_dx2 > 100.) {
                (true, true) if abs_dx1 > abs_dx2 => closest_point_on_segment(ip, a1.bot, a1.top),
                (true, true) => closest_point_on_segment(ip, a2.bot, a2.top),
                (true, false) => closest_point_on_segment(ip, a1.bot, a1.top),
                (false, true) => closest_point_on_segment(ip, a2.bot, a2.top),
                (false, false) => {
                    let y = if ip.y < top_y { top_y } else { self.bot_y };
                    let x = if abs_dx1 < abs_dx2 { a1.top_x(y) } else { a2.top_x(y) };
                    Point64::new(x, y)
                }
            };
        }
        self.intersect_nodes.push(IntersectNode {
            pt: ip,
            edge1: e1,
            edge2: e2,
        });
    }

    fn edges_adjacent_in_ael(&self, node: &IntersectNode) -> bool {
        let a1 = &self.actives[node.edge1];
        a1.next_in_ael == Some(node.edge2) || a1.prev_in_ael == Some(node.edge2)
    }

    /// Apply crossings bottom-up, reordering so that every crossing is
    /// between neighbours at the moment it is applied.
    fn process_intersect_list(&mut self) {
        self.intersect_nodes
            .sort_by(|a, b| b.pt.y.cmp(&a.pt.y).then(a.pt.x.cmp(&b.pt.x)));

        for i in 0..self.intersect_nodes.len() {
            if !self.edges_adjacent_in_ael(&self.intersect_nodes[i]) {
                let j = (i + 1..self.intersect_nodes.len())
                    .find(|&j| self.edges_adjacent_in_ael(&self.intersect_nodes[j]));
                match j {
                    Some(j) => self.intersect_nodes.swap(i, j),
                    None => {
                        trace!("no adjacent crossing left to apply");
                        self.succeeded = false;
                        return;
                    }
                }
            }

            let IntersectNode { pt, edge1, edge2 } = self.intersect_nodes[i];
            self.intersect_edges(edge1, edge2, pt);
            self.swap_positions_in_ael(edge1, edge2);
            self.actives[edge1].curr_x = pt.x;
            self.actives[edge2].curr_x = pt.x;
            self.check_join_left(edge2, pt, true);
            self.check_join_right(edge1, pt, true);
        }
    }
}
