//! Nested output of a clipping operation.
//!
//! A [`PolyTree`] stores the closed rings of a solution together with
//! their containment: the children of a ring lie inside it. The root is
//! a sentinel without a polygon; its children are outer rings, theirs
//! are holes, and so on, alternating by depth.
use smallvec::SmallVec;

use crate::{
    point::{Point64, PointD, XY},
    primitives::{area, point_in_polygon, PointInPolygon},
};

#[derive(Debug, Clone, PartialEq)]
struct Node<P> {
    polygon: Vec<P>,
    parent: Option<usize>,
    children: SmallVec<[usize; 4]>,
}

/// Arena of nested rings; node `0` is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyTree<P> {
    nodes: Vec<Node<P>>,
}

pub type PolyTree64 = PolyTree<Point64>;
pub type PolyTreeD = PolyTree<PointD>;

impl<P> Default for PolyTree<P> {
    fn default() -> Self {
        PolyTree {
            nodes: vec![Node {
                polygon: Vec::new(),
                parent: None,
                children: SmallVec::new(),
            }],
        }
    }
}

impl<P> PolyTree<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `polygon` as the last child of node `parent`.
    pub(crate) fn add_child(&mut self, parent: usize, polygon: Vec<P>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            polygon,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    pub fn root(&self) -> PolyPath<'_, P> {
        PolyPath { tree: self, idx: 0 }
    }

    /// Number of rings in the tree (the root is not counted).
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All rings in pre-order: every ring precedes its children.
    pub fn to_paths(&self) -> Vec<Vec<P>>
    where
        P: Clone,
    {
        let mut paths = Vec::with_capacity(self.len());
        let mut stack: Vec<usize> = self.nodes[0].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            paths.push(node.polygon.clone());
            stack.extend(node.children.iter().rev().copied());
        }
        paths
    }

    /// Convert every point, keeping the shape of the tree.
    pub fn map<Q, F>(&self, mut f: F) -> PolyTree<Q>
    where
        F: FnMut(&P) -> Q,
    {
        PolyTree {
            nodes: self
                .nodes
                .iter()
                .map(|node| Node {
                    polygon: node.polygon.iter().map(&mut f).collect(),
                    parent: node.parent,
                    children: node.children.clone(),
                })
                .collect(),
        }
    }
}

impl PolyTree64 {
    /// Verify that every ring lies inside its parent ring.
    ///
    /// Rounding can put an odd vertex of a child just outside its
    /// parent, so a child only fails once two more of its vertices are
    /// outside than inside.
    pub fn check_children_contained(&self) -> bool {
        self.nodes.iter().skip(1).all(|node| {
            let parent = match node.parent {
                Some(0) | None => return true,
                Some(parent) => &self.nodes[parent].polygon,
            };
            let mut outside_cnt = 0;
            for &pt in &node.polygon {
                match point_in_polygon(pt, parent) {
                    PointInPolygon::Inside => outside_cnt -= 1,
                    PointInPolygon::Outside => outside_cnt += 1,
                    PointInPolygon::On => {}
                }
                if outside_cnt > 1 {
                    return false;
                }
                if outside_cnt < -1 {
                    break;
                }
            }
            true
        })
    }
}

/// A borrowed node of a [`PolyTree`].
#[derive(Debug)]
pub struct PolyPath<'a, P> {
    tree: &'a PolyTree<P>,
    idx: usize,
}

impl<'a, P> Clone for PolyPath<'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P> Copy for PolyPath<'a, P> {}

impl<'a, P> PolyPath<'a, P> {
    fn node(&self) -> &'a Node<P> {
        &self.tree.nodes[self.idx]
    }

    /// The ring of this node; empty for the root.
    pub fn polygon(&self) -> &'a [P] {
        &self.node().polygon
    }

    pub fn children(&self) -> impl Iterator<Item = PolyPath<'a, P>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&idx| PolyPath { tree, idx })
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    pub fn child(&self, i: usize) -> Option<PolyPath<'a, P>> {
        let tree = self.tree;
        self.node()
            .children
            .get(i)
            .map(|&idx| PolyPath { tree, idx })
    }

    pub fn parent(&self) -> Option<PolyPath<'a, P>> {
        let tree = self.tree;
        self.node().parent.map(|idx| PolyPath { tree, idx })
    }

    pub fn is_root(&self) -> bool {
        self.idx == 0
    }

    /// Depth below the root; outer rings are at level 1.
    pub fn level(&self) -> usize {
        let mut level = 0;
        let mut parent = self.node().parent;
        while let Some(p) = parent {
            level += 1;
            parent = self.tree.nodes[p].parent;
        }
        level
    }

    pub fn is_hole(&self) -> bool {
        let level = self.level();
        level > 0 && level % 2 == 0
    }
}

impl<'a, P: XY> PolyPath<'a, P> {
    /// Signed area of this ring plus that of all its descendants.
    pub fn area(&self) -> f64 {
        area(self.polygon()) + self.children().map(|c| c.area()).sum::<f64>()
    }
}
