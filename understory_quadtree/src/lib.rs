// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a point-region quadtree with exact k-nearest-neighbor queries.
//!
//! Understory Quadtree indexes 2D points inside a fixed rectangular domain, once, and answers
//! "which K stored points are closest to this position?" repeatedly, without scanning every point.
//!
//! - Insert points (with an `f64` payload) into a tree covering a fixed [`AxisAlignedBox`].
//! - Query the K nearest neighbors of any position with a best-first, branch-and-bound search.
//! - Inspect the structure: boundaries, stored points, children, statistics, and a text dump.
//!
//! Leaves hold up to `C` points inline (a const generic, 4 by default, see [`QuadTree`]).
//! The first insertion into a full leaf splits it into four quadrants and pushes its points
//! down. Nodes are never removed: there is no deletion, update, or rebalancing.
//!
//! # Example
//!
//! ```rust
//! use understory_quadtree::{AxisAlignedBox, Point, QuadTree};
//!
//! // A 100×100 domain with its top-left corner at the origin.
//! let mut tree = QuadTree::new(AxisAlignedBox::new(50.0, 50.0, 50.0, 50.0));
//! assert!(tree.insert(Point::at(10.0, 10.0)));
//! assert!(tree.insert(Point::at(20.0, 20.0)));
//! assert!(tree.insert(Point::new(5.0, 5.0, 42.0)));
//!
//! // Points outside the domain are rejected.
//! assert!(!tree.insert(Point::at(-10.0, -10.0)));
//!
//! // The two points closest to the origin, closest first.
//! let nearest = tree.knn(Point::at(0.0, 0.0), 2);
//! assert_eq!(nearest, [Point::at(5.0, 5.0), Point::at(10.0, 10.0)]);
//! assert_eq!(nearest[0].payload, 42.0);
//! ```
//!
//! A different leaf capacity is chosen through the const parameter:
//!
//! ```rust
//! use understory_quadtree::{AxisAlignedBox, Node, Point};
//!
//! let mut tree = Node::<16>::new(AxisAlignedBox::new(0.0, 0.0, 8.0, 8.0));
//! for i in 0..16 {
//!     tree.insert(Point::at(f64::from(i) - 8.0, 0.0));
//! }
//! assert!(!tree.is_subdivided());
//! tree.insert(Point::at(1.0, 1.0));
//! assert!(tree.is_subdivided());
//! ```
//!
//! ## Nearest-neighbor results
//!
//! - [`Node::nearest_neighbors`] returns only real neighbors, with squared distances.
//! - [`Node::knn`] and [`Node::knn_into`] always produce exactly `k` points, padding with
//!   [`Point::ZERO`] when the tree holds fewer than `k` other points.
//! - A point at exactly the query position is never reported, so querying with a stored
//!   point finds its neighbors rather than itself.
//! - Equidistant neighbors come back in discovery order, which depends on the tree layout.
//!
//! ## Geometry conventions
//!
//! Boxes are stored in center form (center plus half-extents) and contain their edges.
//! Quadrants follow kurbo's screen space where `y` grows downward: NE is `+x, -y`. Points on a
//! split line belong to several quadrants; the first in NE, NW, SE, SW order receives them.
//! [`Point`] and [`AxisAlignedBox`] convert to and from `kurbo` types.
//!
//! ### Float semantics
//!
//! This crate assumes finite coordinates. A point with a NaN coordinate is never contained by
//! any box, so inserting one fails.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `kurbo/std`.
//! - `libm`: enables `kurbo/libm` for `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod dump;
mod knn;
mod node;
mod types;

pub use dump::Dump;
pub use knn::Neighbor;
pub use node::{DEFAULT_CAPACITY, MAX_DEPTH, Node, Nodes, QuadTree, TreeStats};
pub use types::{AxisAlignedBox, Point, Quadrant};
