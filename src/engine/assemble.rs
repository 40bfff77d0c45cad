//! Reading the finished rings back out of a sweep.
use log::trace;

use super::sweep::Sweep;
use crate::{point::Paths64, polytree::PolyTree64, primitives};

impl<'a> Sweep<'a> {
    /// Clean every ring and collect closed and open paths.
    pub(super) fn build_paths(&mut self) -> (Paths64, Paths64) {
        let mut closed = Paths64::with_capacity(self.rings.recs.len());
        let mut open = Paths64::new();
        // Cleaning may split rings, growing the list as we go.
        let mut i = 0;
        while i < self.rings.recs.len() {
            let rec = &self.rings.recs[i];
            if rec.pts.is_some() {
                if rec.is_open {
                    if let Some(path) = self.rings.build_path(rec.pts, self.reverse_solution, true) {
                        open.push(path);
                    }
                } else {
                    self.clean_collinear(i);
                    let pts = self.rings.recs[i].pts;
                    if let Some(path) = self.rings.build_path(pts, self.reverse_solution, false) {
                        closed.push(path);
                    }
                }
            }
            i += 1;
        }
        (closed, open)
    }

    /// Nest the closed rings into a tree by containment.
    pub(super) fn build_tree(&mut self) -> (PolyTree64, Paths64) {
        let mut tree = PolyTree64::new();
        let mut open = Paths64::new();
        let mut i = 0;
        while i < self.rings.recs.len() {
            let rec = &self.rings.recs[i];
            if rec.pts.is_some() {
                if rec.is_open {
                    if let Some(path) = self.rings.build_path(rec.pts, self.reverse_solution, true) {
                        open.push(path);
                    }
                } else if self.check_bounds(i) {
                    self.recursive_check_owners(i, &mut tree, 0);
                }
            }
            i += 1;
        }
        (tree, open)
    }

    /// Ensure `outrec` is cleaned, has its path built and its bounds
    /// known. Returns `false` if nothing of the ring survives.
    fn check_bounds(&mut self, outrec: usize) -> bool {
        if self.rings.recs[outrec].pts.is_none() {
            return false;
        }
        if !self.rings.recs[outrec].bounds.is_empty() {
            return true;
        }
        self.clean_collinear(outrec);
        let pts = self.rings.recs[outrec].pts;
        match self.rings.build_path(pts, self.reverse_solution, false) {
            Some(path) => {
                let rec = &mut self.rings.recs[outrec];
                rec.bounds = primitives::bounds(&path);
                rec.path = path;
                true
            }
            None => false,
        }
    }

    /// Search the rings split off `owner` for one containing `outrec`.
    fn check_split_owner(&mut self, outrec: usize, splits: &[usize]) -> bool {
        for &split in splits {
            let split = match self.rings.real_outrec(Some(split)) {
                Some(split) if split != outrec => split,
                _ => continue,
            };
            if self.rings.recs[split].recursive_split == Some(outrec) {
                continue;
            }
            self.rings.recs[split].recursive_split = Some(outrec);

            let nested = self.rings.recs[split].splits.clone();
            if !nested.is_empty() && self.check_split_owner(outrec, &nested) {
                return true;
            }
            if self.check_bounds(split)
                && self.rings.is_valid_owner(outrec, Some(split))
                && self.rings.recs[split]
                    .bounds
                    .contains_rect(&self.rings.recs[outrec].bounds)
                && self.contains_ring(split, outrec)
            {
                self.rings.recs[outrec].owner = Some(split);
                return true;
            }
        }
        false
    }

    /// Whether the ring of `outer` contains that of `inner`.
    fn contains_ring(&self, outer: usize, inner: usize) -> bool {
        match (self.rings.recs[inner].pts, self.rings.recs[outer].pts) {
            (Some(op1), Some(op2)) => self.rings.path1_inside_path2(op1, op2),
            _ => false,
        }
    }

    /// Find the innermost ring containing `outrec` among its owners,
    /// place that owner in the tree first, then `outrec` beneath it.
    fn recursive_check_owners(&mut self, outrec: usize, tree: &mut PolyTree64, depth: usize) {
        let rec = &self.rings.recs[outrec];
        if rec.polypath.is_some() || rec.bounds.is_empty() {
            return;
        }

        // Owner links never cycle, but cap the walks all the same.
        let limit = self.rings.recs.len();
        let mut steps = 0;
        while let Some(owner) = self.rings.recs[outrec].owner {
            if owner == outrec || steps > limit {
                self.rings.recs[outrec].owner = None;
                break;
            }
            steps += 1;
            let splits = self.rings.recs[owner].splits.clone();
            if !splits.is_empty() && self.check_split_owner(outrec, &splits) {
                break;
            }
            if self.rings.recs[owner].pts.is_some()
                && self.check_bounds(owner)
                && self.rings.recs[owner]
                    .bounds
                    .contains_rect(&self.rings.recs[outrec].bounds)
                && self.contains_ring(owner, outrec)
            {
                break;
            }
            self.rings.recs[outrec].owner = self.rings.recs[owner].owner;
        }

        let parent = match self.rings.recs[outrec].owner {
            Some(owner) => {
                if self.rings.recs[owner].polypath.is_none() && depth < limit {
                    self.recursive_check_owners(owner, tree, depth + 1);
                }
                self.rings.recs[owner].polypath.unwrap_or_else(|| {
                    trace!("ring {outrec} has no placed owner; attaching to root");
                    0
                })
            }
            None => 0,
        };
        let path = self.rings.recs[outrec].path.clone();
        self.rings.recs[outrec].polypath = Some(tree.add_child(parent, path));
    }
}
