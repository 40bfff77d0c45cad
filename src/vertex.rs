use bitflags::bitflags;
use log::trace;

use crate::{
    engine::PathType,
    events::LocalMinima,
    point::{Path64, Point64},
};

bitflags! {
    /// Annotations attached to input vertices while building the rings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct VertexFlags: u8 {
        const OPEN_START = 0b0001;
        const OPEN_END   = 0b0010;
        const LOCAL_MAX  = 0b0100;
        const LOCAL_MIN  = 0b1000;
    }
}

/// A node in the circular list of vertices built for one input path.
#[derive(Debug, Clone)]
pub(crate) struct Vertex {
    pub(crate) pt: Point64,
    pub(crate) next: usize,
    pub(crate) prev: usize,
    pub(crate) flags: VertexFlags,
}

impl Vertex {
    #[inline]
    pub(crate) fn is_maxima(&self) -> bool {
        self.flags.contains(VertexFlags::LOCAL_MAX)
    }

    #[inline]
    pub(crate) fn is_open_end(&self) -> bool {
        self.flags
            .intersects(VertexFlags::OPEN_START | VertexFlags::OPEN_END)
    }
}

/// Input geometry accumulated between calls to `execute`.
///
/// Every path becomes a ring of [`Vertex`] in one shared arena, and
/// each valley of a ring (plus the ends of open paths) is recorded as a
/// [`LocalMinima`] that seeds the sweep.
#[derive(Debug, Clone, Default)]
pub(crate) struct InputGeometry {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) minima: Vec<LocalMinima>,
    minima_sorted: bool,
    pub(crate) has_open_paths: bool,
}

impl InputGeometry {
    pub(crate) fn clear(&mut self) {
        self.vertices.clear();
        self.minima.clear();
        self.minima_sorted = false;
        self.has_open_paths = false;
    }

    /// Sort the minima by descending `y` (then ascending `x`).
    ///
    /// The sort is stable and only happens once per batch of input.
    pub(crate) fn sort_minima(&mut self) {
        if self.minima_sorted {
            return;
        }
        let vertices = &self.vertices;
        self.minima.sort_by(|a, b| {
            let pa = vertices[a.vertex].pt;
            let pb = vertices[b.vertex].pt;
            pb.y.cmp(&pa.y).then(pa.x.cmp(&pb.x))
        });
        self.minima_sorted = true;
    }

    pub(crate) fn add_paths(&mut self, paths: &[Path64], path_type: PathType, is_open: bool) {
        if is_open {
            self.has_open_paths = true;
        }
        self.minima_sorted = false;
        for path in paths {
            self.add_path(path, path_type, is_open);
        }
    }

    fn add_local_min(&mut self, vertex: usize, path_type: PathType, is_open: bool) {
        // A vertex may only seed one minimum.
        if self.vertices[vertex].flags.contains(VertexFlags::LOCAL_MIN) {
            return;
        }
        self.vertices[vertex].flags |= VertexFlags::LOCAL_MIN;
        self.minima.push(LocalMinima {
            vertex,
            path_type,
            is_open,
        });
    }

    fn add_path(&mut self, path: &[Point64], path_type: PathType, is_open: bool) {
        let mut pts: Vec<Point64> = Vec::with_capacity(path.len());
        for &pt in path {
            if pts.last() != Some(&pt) {
                pts.push(pt);
            }
        }
        if !is_open && pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() < 2 || (!is_open && pts.len() < 3) {
            trace!("skipping degenerate path with {n} distinct points", n = pts.len());
            return;
        }

        let base = self.vertices.len();
        let n = pts.len();
        self.vertices
            .extend(pts.iter().enumerate().map(|(i, &pt)| Vertex {
                pt,
                next: base + (i + 1) % n,
                prev: base + (i + n - 1) % n,
                flags: VertexFlags::empty(),
            }));
        let v0 = base;

        let mut going_up;
        if is_open {
            let mut curr = self.vertices[v0].next;
            while curr != v0 && self.vertices[curr].pt.y == self.vertices[v0].pt.y {
                curr = self.vertices[curr].next;
            }
            going_up = self.vertices[curr].pt.y <= self.vertices[v0].pt.y;
            if going_up {
                self.vertices[v0].flags = VertexFlags::OPEN_START;
                self.add_local_min(v0, path_type, true);
            } else {
                self.vertices[v0].flags = VertexFlags::OPEN_START | VertexFlags::LOCAL_MAX;
            }
        } else {
            let mut prev = self.vertices[v0].prev;
            while prev != v0 && self.vertices[prev].pt.y == self.vertices[v0].pt.y {
                prev = self.vertices[prev].prev;
            }
            if prev == v0 {
                // Only open paths may be completely flat.
                return;
            }
            going_up = self.vertices[prev].pt.y > self.vertices[v0].pt.y;
        }

        let going_up0 = going_up;
        let mut prev = v0;
        let mut curr = self.vertices[v0].next;
        while curr != v0 {
            let (cy, py) = (self.vertices[curr].pt.y, self.vertices[prev].pt.y);
            if cy > py && going_up {
                self.vertices[prev].flags |= VertexFlags::LOCAL_MAX;
                going_up = false;
            } else if cy < py && !going_up {
                going_up = true;
                self.add_local_min(prev, path_type, is_open);
            }
            prev = curr;
            curr = self.vertices[curr].next;
        }

        if is_open {
            self.vertices[prev].flags |= VertexFlags::OPEN_END;
            if going_up {
                self.vertices[prev].flags |= VertexFlags::LOCAL_MAX;
            } else {
                self.add_local_min(prev, path_type, is_open);
            }
        } else if going_up != going_up0 {
            if going_up0 {
                self.add_local_min(prev, path_type, false);
            } else {
                self.vertices[prev].flags |= VertexFlags::LOCAL_MAX;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::make_path;

    #[test]
    fn test_square_minima() {
        let mut input = InputGeometry::default();
        input.add_paths(&[make_path(&[0, 0, 10, 0, 10, 10, 0, 10])], PathType::Subject, false);
        assert_eq!(input.vertices.len(), 4);
        assert_eq!(input.minima.len(), 1);
        let min = &input.minima[0];
        assert_eq!(input.vertices[min.vertex].pt.y, 10);
        let maxima = input.vertices.iter().filter(|v| v.is_maxima()).count();
        assert_eq!(maxima, 1);
    }

    #[test]
    fn test_degenerate_paths_skipped() {
        let mut input = InputGeometry::default();
        input.add_paths(
            &[
                make_path(&[0, 0, 0, 0, 0, 0]),
                make_path(&[0, 0, 5, 5, 0, 0]),
                make_path(&[0, 0, 5, 0, 9, 0]),
            ],
            PathType::Subject,
            false,
        );
        assert!(input.minima.is_empty());

        // A flat open path still yields a minimum.
        input.add_paths(&[make_path(&[0, 0, 5, 0])], PathType::Subject, true);
        assert_eq!(input.minima.len(), 1);
        assert!(input.has_open_paths);
    }

    #[test]
    fn test_zigzag_minima_sorted() {
        let mut input = InputGeometry::default();
        // Two valleys at different depths.
        input.add_paths(
            &[make_path(&[0, 0, 5, 20, 10, 5, 15, 30, 20, 0])],
            PathType::Clip,
            false,
        );
        assert_eq!(input.minima.len(), 2);
        input.sort_minima();
        let ys: Vec<_> = input
            .minima
            .iter()
            .map(|m| input.vertices[m.vertex].pt.y)
            .collect();
        assert_eq!(ys, vec![30, 20]);
    }
}
