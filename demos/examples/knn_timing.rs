// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time bulk insertion of a dense integer grid and many random 8-nearest-neighbor queries.
//!
//! Run:
//! - `cargo run --release -p understory_demos --example knn_timing`
//! - `cargo run --release -p understory_demos --example knn_timing -- 3600 1000000`
//!
//! The optional arguments are the map size (points per side) and the number of queries.

use std::time::Instant;

use rand::Rng;
use understory_quadtree::{AxisAlignedBox, Point, QuadTree};

const DEFAULT_MAP_SIZE: u32 = 600;
const DEFAULT_QUERIES: u32 = 100_000;
const K: usize = 8;

fn arg_or(index: usize, default: u32) -> u32 {
    std::env::args()
        .nth(index)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    let map_size = arg_or(1, DEFAULT_MAP_SIZE).max(1);
    let queries = arg_or(2, DEFAULT_QUERIES);

    let half = f64::from(map_size) / 2.0;
    let mut tree = QuadTree::new(AxisAlignedBox::new(half, half, half, half));

    let start = Instant::now();
    let mut accepted = 0_u64;
    for x in 0..map_size {
        for y in 0..map_size {
            if tree.insert(Point::at(f64::from(x), f64::from(y))) {
                accepted += 1;
            }
        }
    }
    let insert_time = start.elapsed();
    println!(
        "Inserted {accepted} points in {:.3} seconds",
        insert_time.as_secs_f64()
    );
    println!("{:?}", tree.stats());

    let mut rng = rand::rng();
    let mut nearest = [Point::ZERO; K];
    let mut found = 0_usize;
    let start = Instant::now();
    for _ in 0..queries {
        let target = Point::at(
            f64::from(rng.random_range(0..map_size)),
            f64::from(rng.random_range(0..map_size)),
        );
        found += tree.knn_into(target, &mut nearest);
    }
    let query_time = start.elapsed();

    println!(
        "Total nearest neighbor search time: {:.3} seconds",
        query_time.as_secs_f64()
    );
    if queries > 0 {
        println!(
            "Average time per search: {:.3e} seconds ({:.2} neighbors found on average)",
            query_time.as_secs_f64() / f64::from(queries),
            found as f64 / f64::from(queries)
        );
    }
}
