// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable rendering of a tree's structure.

use core::fmt;

use crate::node::Node;
use crate::types::Quadrant;

/// Spaces of indentation per tree level.
const INDENT: usize = 4;

/// Indented text rendering of a subtree, returned by [`Node::dump`].
///
/// Each node prints its boundary as `(cx, cy, half_w, half_h)` and the points it stores
/// as `(x, y, payload)`. Subdivided nodes follow with a `LEVEL n:` heading and their four
/// children, labeled and indented one level deeper.
#[derive(Debug)]
pub struct Dump<'a, const C: usize> {
    node: &'a Node<C>,
}

impl<const C: usize> Node<C> {
    /// Render this subtree for inspection. Reading the tree never modifies it.
    ///
    /// ```
    /// use understory_quadtree::{AxisAlignedBox, Point, QuadTree};
    ///
    /// let mut tree = QuadTree::new(AxisAlignedBox::new(50.0, 50.0, 50.0, 50.0));
    /// tree.insert(Point::new(10.0, 10.0, 1.0));
    /// assert_eq!(
    ///     tree.dump().to_string(),
    ///     "LEVEL 0:\nBoundary: (50, 50, 50, 50)\nPoints: (10, 10, 1)\n"
    /// );
    /// ```
    pub fn dump(&self) -> Dump<'_, C> {
        Dump { node: self }
    }
}

impl<const C: usize> fmt::Display for Dump<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LEVEL 0:")?;
        write_node(f, self.node, 0)
    }
}

fn write_node<const C: usize>(
    f: &mut fmt::Formatter<'_>,
    node: &Node<C>,
    depth: usize,
) -> fmt::Result {
    let pad = depth * INDENT;
    let b = node.boundary();
    writeln!(
        f,
        "{:pad$}Boundary: ({}, {}, {}, {})",
        "", b.cx, b.cy, b.half_w, b.half_h
    )?;

    write!(f, "{:pad$}Points:", "")?;
    for p in node.points() {
        write!(f, " ({}, {}, {})", p.x, p.y, p.payload)?;
    }
    writeln!(f)?;

    if let Some(children) = node.children() {
        writeln!(f, "{:pad$}LEVEL {}:", "", depth + 1)?;
        for (quadrant, child) in Quadrant::ALL.iter().zip(children) {
            writeln!(f, "{:pad$}- {}:", "", quadrant.label())?;
            write_node(f, child, depth + 1)?;
        }
    }
    Ok(())
}
