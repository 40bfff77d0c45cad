use std::collections::BinaryHeap;

use crate::engine::PathType;

/// A valley of an input ring (or the lower end of an open path).
///
/// Local minima seed the sweep: each one spawns the left and right
/// bound edges that meet at `vertex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LocalMinima {
    pub(crate) vertex: usize,
    pub(crate) path_type: PathType,
    pub(crate) is_open: bool,
}

/// The scanline set: every distinct `y` at which the sweep must stop.
///
/// Implemented as a max-heap since the sweep moves from the largest `y`
/// to the smallest. Duplicates are allowed on insertion and collapsed
/// on removal.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scanlines(BinaryHeap<i64>);

impl Scanlines {
    #[inline]
    pub(crate) fn insert(&mut self, y: i64) {
        self.0.push(y);
    }

    /// Remove and return the next scanline.
    pub(crate) fn pop(&mut self) -> Option<i64> {
        let y = self.0.pop()?;
        while self.0.peek() == Some(&y) {
            self.0.pop();
        }
        Some(y)
    }
}

/// Cursor over the sorted local minima list.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MinimaCursor(usize);

impl MinimaCursor {
    /// Return the index of the next minimum if it lies on scanline `y`.
    pub(crate) fn pop_at(&mut self, y: i64, minima: &[LocalMinima], vertex_y: impl Fn(usize) -> i64) -> Option<usize> {
        let next = minima.get(self.0)?;
        if vertex_y(next.vertex) != y {
            return None;
        }
        self.0 += 1;
        Some(self.0 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::iter::from_fn;

    #[test]
    fn test_scanline_ordering() {
        let mut lines = Scanlines::default();
        for y in [3, 10, -2, 10, 3, 7] {
            lines.insert(y);
        }
        let order: Vec<_> = from_fn(|| lines.pop()).collect();
        assert_eq!(order, vec![10, 7, 3, -2]);
    }

    #[test]
    fn test_minima_cursor() {
        let minima = vec![
            LocalMinima { vertex: 0, path_type: PathType::Subject, is_open: false },
            LocalMinima { vertex: 1, path_type: PathType::Clip, is_open: false },
        ];
        let ys = [5, 2];
        let mut cursor = MinimaCursor::default();
        assert_eq!(cursor.pop_at(2, &minima, |v| ys[v]), None);
        assert_eq!(cursor.pop_at(5, &minima, |v| ys[v]), Some(0));
        assert_eq!(cursor.pop_at(5, &minima, |v| ys[v]), None);
        assert_eq!(cursor.pop_at(2, &minima, |v| ys[v]), Some(1));
        assert_eq!(cursor.pop_at(2, &minima, |v| ys[v]), None);
    }
}
