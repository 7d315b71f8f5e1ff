// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small quadtree, print its structure, and run a few nearest-neighbor queries.
//!
//! Run:
//! - `cargo run -p understory_demos --example basic_quadtree`

use kurbo::Rect;
use understory_quadtree::{AxisAlignedBox, Point, QuadTree};

fn main() {
    // A 100×100 domain, described as a kurbo rectangle.
    let domain = Rect::new(0.0, 0.0, 100.0, 100.0);
    let mut tree = QuadTree::new(AxisAlignedBox::from_rect(domain));

    // Two tight clusters, far apart. The payload numbers each point.
    let cluster_a = (10..15_i32).map(f64::from);
    let cluster_b = (80..85_i32).map(f64::from);
    let points: Vec<Point> = cluster_a
        .chain(cluster_b)
        .enumerate()
        .map(|(n, c)| Point::new(c, c, n as f64))
        .collect();
    let accepted = tree.insert_all(points.iter().copied());
    println!("inserted {accepted} of {} points", points.len());

    // Outliers are rejected.
    for outlier in [Point::at(-10.0, -10.0), Point::at(110.0, 110.0)] {
        println!(
            "insert ({}, {}) -> {}",
            outlier.x,
            outlier.y,
            tree.insert(outlier)
        );
    }

    print!("{}", tree.dump());
    println!("{:?}", tree.stats());

    let target = Point::at(40.0, 40.0);
    println!("3 nearest to ({}, {}):", target.x, target.y);
    for n in tree.nearest_neighbors(target, 3) {
        println!(
            "  ({}, {}) payload {} at distance {:.3}",
            n.point.x,
            n.point.y,
            n.point.payload,
            n.distance_squared.sqrt()
        );
    }

    // Asking for more neighbors than there are points pads with the zero sentinel.
    let mut slots = [Point::ZERO; 12];
    let found = tree.knn_into(Point::at(82.0, 82.0), &mut slots);
    println!("knn_into filled {found} of {} slots", slots.len());
}
