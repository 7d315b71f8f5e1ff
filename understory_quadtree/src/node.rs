// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree nodes: bounded leaf storage, insertion, subdivision, and read-only introspection.

use alloc::boxed::Box;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::types::{AxisAlignedBox, Point, Quadrant};

/// Number of points a leaf holds before it subdivides, unless chosen otherwise.
pub const DEFAULT_CAPACITY: usize = 4;

/// Depth at which leaves stop subdividing.
///
/// A leaf at this depth keeps accepting points past its capacity. Without the limit, more
/// than `C` points at one position would split forever.
pub const MAX_DEPTH: u8 = 32;

/// A point-region quadtree using the default leaf capacity.
pub type QuadTree = Node<DEFAULT_CAPACITY>;

/// One node of a point-region quadtree, and the root of its own subtree.
///
/// A leaf stores up to `C` points inline. Inserting one more point into a full leaf
/// subdivides it: four children are created covering the NE, NW, SE, and SW quadrants of
/// the boundary, the stored points move into them, and from then on the node only routes
/// insertions downward. Nodes are never merged or removed.
///
/// Leaf storage is inline and sized by `C`; it only spills to the heap for leaves at
/// [`MAX_DEPTH`]. `C` must be at least 1; a zero capacity is rejected when the node type is
/// instantiated.
#[derive(Clone)]
pub struct Node<const C: usize = DEFAULT_CAPACITY> {
    boundary: AxisAlignedBox,
    points: SmallVec<[Point; C]>,
    depth: u8,
    // Stored in `Quadrant::ALL` order.
    children: Option<Box<[Self; 4]>>,
}

impl<const C: usize> Debug for Node<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("boundary", &self.boundary)
            .field("points", &self.points())
            .field("subdivided", &self.is_subdivided())
            .finish_non_exhaustive()
    }
}

impl<const C: usize> Node<C> {
    /// Per-leaf point capacity of this node type.
    pub const CAPACITY: usize = C;

    /// Create an empty leaf covering `boundary`.
    pub fn new(boundary: AxisAlignedBox) -> Self {
        Self::with_depth(boundary, 0)
    }

    fn with_depth(boundary: AxisAlignedBox, depth: u8) -> Self {
        const { assert!(C > 0, "quadtree leaf capacity must be at least 1") };
        Self {
            boundary,
            points: SmallVec::new(),
            depth,
            children: None,
        }
    }

    /// Insert a point. Returns `false`, leaving the tree untouched, if the point lies
    /// outside this node's boundary.
    ///
    /// Points on a split line fall inside more than one child; the first child in
    /// NE, NW, SE, SW order takes them.
    pub fn insert(&mut self, point: Point) -> bool {
        if !self.boundary.contains(&point) {
            return false;
        }
        self.place(point);
        true
    }

    /// Insert every point of `points`, returning how many were accepted.
    pub fn insert_all<I: IntoIterator<Item = Point>>(&mut self, points: I) -> usize {
        let mut accepted = 0;
        for point in points {
            if self.insert(point) {
                accepted += 1;
            }
        }
        accepted
    }

    // Caller has checked `boundary.contains(&point)`.
    fn place(&mut self, point: Point) {
        if self.children.is_none() {
            if self.points.len() < C || self.depth >= MAX_DEPTH {
                self.points.push(point);
                return;
            }
            self.subdivide();
        }
        if let Some(children) = self.children.as_deref_mut() {
            place_in_children(children, point);
        }
    }

    /// Split a full leaf into four children and move its points into them.
    fn subdivide(&mut self) {
        debug_assert!(
            self.children.is_none() && self.points.len() == C,
            "only a full leaf subdivides"
        );
        let boundary = self.boundary;
        let depth = self.depth + 1;
        let mut children =
            Box::new(Quadrant::ALL.map(|q| Self::with_depth(boundary.quadrant(q), depth)));
        for point in self.points.drain(..) {
            place_in_children(&mut children, point);
        }
        self.children = Some(children);
    }

    /// The fixed region this node covers.
    ///
    /// Every point stored in this subtree lies inside it. Child boundaries come from
    /// [`AxisAlignedBox::quadrant`], so they may reach a few ulps past their exact quarter.
    #[inline]
    pub fn boundary(&self) -> AxisAlignedBox {
        self.boundary
    }

    /// Per-leaf point capacity (`C`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        C
    }

    /// Whether this node has split into four children.
    #[inline]
    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Points stored directly in this node. Always empty once the node has subdivided.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The four children in NE, NW, SE, SW order, if subdivided.
    #[inline]
    pub fn children(&self) -> Option<&[Self; 4]> {
        self.children.as_deref()
    }

    /// The child covering `quadrant`, if subdivided.
    pub fn child(&self, quadrant: Quadrant) -> Option<&Self> {
        self.children().map(|c| &c[quadrant.index()])
    }

    /// Number of points stored anywhere in this subtree.
    pub fn len(&self) -> usize {
        self.nodes().map(|(_, node)| node.points.len()).sum()
    }

    /// Whether this subtree stores no points.
    pub fn is_empty(&self) -> bool {
        self.nodes().all(|(_, node)| node.points.is_empty())
    }

    /// Visit every node of this subtree depth-first, children in NE, NW, SE, SW order.
    ///
    /// Yields `(depth, node)` pairs; this node has depth 0.
    pub fn nodes(&self) -> Nodes<'_, C> {
        let mut stack = SmallVec::new();
        stack.push((0, self));
        Nodes { stack }
    }

    /// Iterate over every point stored in this subtree, in the same order as [`Node::nodes`].
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.nodes().flat_map(|(_, node)| node.points().iter().copied())
    }

    /// Summarize the shape of this subtree.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for (depth, node) in self.nodes() {
            stats.nodes += 1;
            if !node.is_subdivided() {
                stats.leaves += 1;
            }
            stats.points += node.points.len();
            stats.max_depth = stats.max_depth.max(depth);
        }
        stats
    }
}

// The point is inside the parent, and `AxisAlignedBox::quadrant` children cover all of it.
fn place_in_children<const C: usize>(children: &mut [Node<C>; 4], point: Point) {
    let placed = children.iter_mut().any(|child| child.insert(point));
    debug_assert!(placed, "no child contains {point:?}");
}

/// Depth-first iterator over the nodes of a subtree, returned by [`Node::nodes`].
#[derive(Debug)]
pub struct Nodes<'a, const C: usize> {
    stack: SmallVec<[(usize, &'a Node<C>); 16]>,
}

impl<'a, const C: usize> Iterator for Nodes<'a, C> {
    type Item = (usize, &'a Node<C>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let Some(children) = node.children() {
            // Reversed so NE is popped first.
            for child in children.iter().rev() {
                self.stack.push((depth + 1, child));
            }
        }
        Some((depth, node))
    }
}

/// Shape summary of a subtree, returned by [`Node::stats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total number of nodes, including the subtree root.
    pub nodes: usize,
    /// Number of nodes that have not subdivided.
    pub leaves: usize,
    /// Number of stored points.
    pub points: usize,
    /// Depth of the deepest node; the subtree root has depth 0.
    pub max_depth: usize,
}
