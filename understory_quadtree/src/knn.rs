// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-first k-nearest-neighbor search.
//!
//! Nodes are expanded in order of the squared distance from the target to their
//! boundary, which is a lower bound for anything stored beneath them. The best `k`
//! candidates seen so far live in a max-heap, so the current k-th distance is always at
//! the top. Once the cheapest unexplored node is farther than that distance, nothing left
//! can improve the result and the search stops.
//!
//! All comparisons use squared distances.
//!
//! Ties are resolved by discovery order: nodes with equal bounds are expanded in the
//! order they were queued, equally distant candidates are reported in the order they were
//! found, and a candidate that is only as close as the current worst one never replaces
//! it. Discovery order depends on the tree layout, so equidistant results should not be
//! relied on to come back in any particular order.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::node::Node;
use crate::types::Point;

/// A point found by a nearest-neighbor query, with its squared distance to the target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    /// The stored point.
    pub point: Point,
    /// Squared Euclidean distance from the query target.
    pub distance_squared: f64,
}

impl<const C: usize> Node<C> {
    /// Find up to `k` points closest to `target`, closest first.
    ///
    /// Points at exactly the target's coordinates are skipped, so a stored point is never
    /// its own neighbor. Fewer than `k` neighbors are returned when the subtree does not
    /// hold enough other points; the result is never padded.
    pub fn nearest_neighbors(&self, target: Point, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }

        let mut frontier = BinaryHeap::new();
        let mut best = Candidates::new(k);
        let mut queued = 0;
        frontier.push(Pending {
            bound: 0.0,
            order: queued,
            node: self,
        });

        while let Some(Pending { bound, node, .. }) = frontier.pop() {
            if best.is_full() && bound > best.worst() {
                break;
            }

            for point in node.points() {
                if point.same_position(&target) {
                    continue;
                }
                best.offer(*point, point.distance_squared(&target));
            }

            if let Some(children) = node.children() {
                for child in children {
                    let child_bound = child.boundary().distance_squared_to(&target);
                    if !best.is_full() || child_bound <= best.worst() {
                        queued += 1;
                        frontier.push(Pending {
                            bound: child_bound,
                            order: queued,
                            node: child,
                        });
                    }
                }
            }
        }

        best.into_sorted()
    }

    /// Find the `k` points closest to `target`, closest first, padded to length `k`.
    ///
    /// Slots past the last real neighbor hold [`Point::ZERO`]. Use
    /// [`Node::nearest_neighbors`] to get only real neighbors together with their
    /// distances.
    ///
    /// # Panics
    ///
    /// Panics if a `Vec` of `k` points cannot be allocated.
    pub fn knn(&self, target: Point, k: usize) -> Vec<Point> {
        let mut out: Vec<Point> = self
            .nearest_neighbors(target, k)
            .into_iter()
            .map(|n| n.point)
            .collect();
        out.resize(k, Point::ZERO);
        out
    }

    /// Fill `out` with the `out.len()` points closest to `target`, closest first.
    ///
    /// Slots past the last real neighbor are set to [`Point::ZERO`]. Returns the number
    /// of real neighbors written.
    pub fn knn_into(&self, target: Point, out: &mut [Point]) -> usize {
        let found = self.nearest_neighbors(target, out.len());
        for (slot, n) in out.iter_mut().zip(&found) {
            *slot = n.point;
        }
        out[found.len()..].fill(Point::ZERO);
        found.len()
    }

    /// The single point closest to `target`, other than points at `target` itself.
    pub fn nearest(&self, target: Point) -> Option<Point> {
        self.nearest_neighbors(target, 1).first().map(|n| n.point)
    }
}

/// A node waiting to be expanded.
struct Pending<'a, const C: usize> {
    bound: f64,
    order: usize,
    node: &'a Node<C>,
}

impl<const C: usize> Ord for Pending<'_, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` pops its maximum, we want the smallest bound.
        other
            .bound
            .total_cmp(&self.bound)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl<const C: usize> PartialOrd for Pending<'_, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const C: usize> PartialEq for Pending<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<const C: usize> Eq for Pending<'_, C> {}

struct Candidate {
    distance_squared: f64,
    order: usize,
    point: Point,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_squared
            .total_cmp(&other.distance_squared)
            .then_with(|| self.order.cmp(&other.order))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Bounded max-heap of the best candidates found so far.
struct Candidates {
    heap: BinaryHeap<Candidate>,
    k: usize,
    found: usize,
}

impl Candidates {
    fn new(k: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            k,
            found: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Squared distance of the worst kept candidate, or infinity while not full.
    fn worst(&self) -> f64 {
        match self.heap.peek() {
            Some(worst) if self.is_full() => worst.distance_squared,
            _ => f64::INFINITY,
        }
    }

    fn offer(&mut self, point: Point, distance_squared: f64) {
        let candidate = Candidate {
            distance_squared,
            order: self.found,
            point,
        };
        if !self.is_full() {
            self.heap.push(candidate);
        } else if let Some(mut worst) = self.heap.peek_mut()
            && distance_squared < worst.distance_squared
        {
            // Re-sifts when `worst` is dropped.
            *worst = candidate;
        } else {
            return;
        }
        self.found += 1;
    }

    fn into_sorted(self) -> Vec<Neighbor> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                point: c.point,
                distance_squared: c.distance_squared,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{MAX_DEPTH, QuadTree};
    use crate::types::{AxisAlignedBox, Quadrant};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn domain() -> AxisAlignedBox {
        AxisAlignedBox::new(50.0, 50.0, 50.0, 50.0)
    }

    /// Squared distances of the `k` closest eligible points, by linear scan.
    fn brute_force(points: &[Point], target: Point, k: usize) -> Vec<f64> {
        let mut d: Vec<f64> = points
            .iter()
            .filter(|p| !p.same_position(&target))
            .map(|p| p.distance_squared(&target))
            .collect();
        d.sort_by(f64::total_cmp);
        d.truncate(k);
        d
    }

    /// Each neighbor is a distinct stored point, reported with its own distance.
    fn assert_consistent(points: &[Point], target: Point, result: &[Neighbor]) {
        let mut seen = Vec::new();
        for n in result {
            assert_eq!(n.distance_squared, n.point.distance_squared(&target));
            let stored = points
                .iter()
                .any(|p| p.same_position(&n.point) && p.payload == n.point.payload);
            assert!(stored, "{:?} was never inserted", n.point);
            assert!(!seen.contains(&n.point), "{:?} reported twice", n.point);
            seen.push(n.point);
        }
    }

    #[test]
    fn two_nearest_of_small_set() {
        let mut qt = QuadTree::new(domain());
        assert!(qt.insert(Point::at(10.0, 10.0)));
        assert!(qt.insert(Point::at(20.0, 20.0)));
        assert!(!qt.insert(Point::at(-10.0, -10.0)));
        assert!(qt.insert(Point::at(5.0, 5.0)));

        let nearest = qt.knn(Point::at(0.0, 0.0), 2);
        assert_eq!(nearest, [Point::at(5.0, 5.0), Point::at(10.0, 10.0)]);

        let with_distances = qt.nearest_neighbors(Point::at(0.0, 0.0), 3);
        let d: Vec<_> = with_distances.iter().map(|n| n.distance_squared).collect();
        assert_eq!(d, [50.0, 200.0, 800.0]);
    }

    #[test]
    fn empty_tree_returns_sentinels() {
        let qt = QuadTree::new(domain());
        let nearest = qt.knn(Point::at(0.0, 0.0), 4);
        assert_eq!(nearest.len(), 4);
        assert!(nearest.iter().all(|p| *p == Point::ZERO && p.payload == 0.0));
        assert!(qt.nearest_neighbors(Point::at(0.0, 0.0), 4).is_empty());
        assert_eq!(qt.nearest(Point::at(1.0, 1.0)), None);
    }

    #[test]
    fn zero_k_is_empty() {
        let mut qt = QuadTree::new(domain());
        qt.insert(Point::at(1.0, 1.0));
        assert!(qt.knn(Point::at(0.0, 0.0), 0).is_empty());
        assert_eq!(qt.knn_into(Point::at(0.0, 0.0), &mut []), 0);
    }

    #[test]
    fn scarce_results_are_padded() {
        let mut qt = QuadTree::new(domain());
        qt.insert(Point::new(50.0, 50.0, 7.0));
        qt.insert(Point::new(60.0, 50.0, 8.0));

        let mut out = [Point::at(-1.0, -1.0); 5];
        let found = qt.knn_into(Point::at(0.0, 0.0), &mut out);
        assert_eq!(found, 2);
        assert_eq!(out[0], Point::at(50.0, 50.0));
        assert_eq!(out[0].payload, 7.0);
        assert_eq!(out[1], Point::at(60.0, 50.0));
        assert!(out[2..].iter().all(|p| *p == Point::ZERO));

        assert_eq!(qt.nearest(Point::at(0.0, 0.0)), Some(Point::at(50.0, 50.0)));
    }

    #[test]
    fn target_is_never_its_own_neighbor() {
        let mut qt = QuadTree::new(domain());
        let pts = [
            Point::at(10.0, 10.0),
            Point::at(11.0, 11.0),
            Point::at(12.0, 12.0),
            Point::at(80.0, 80.0),
            Point::at(81.0, 81.0),
            Point::at(50.0, 50.0),
        ];
        qt.insert_all(pts);
        for p in pts {
            let result = qt.nearest_neighbors(p, pts.len());
            assert_eq!(result.len(), pts.len() - 1);
            assert!(result.iter().all(|n| n.point != p));
        }
    }

    #[test]
    fn clustered_points() {
        let mut qt = QuadTree::new(domain());
        for i in 10..15 {
            qt.insert(Point::at(f64::from(i), f64::from(i)));
        }
        for i in 80..85 {
            qt.insert(Point::at(f64::from(i), f64::from(i)));
        }
        assert!(qt.is_subdivided());

        let nearest = qt.knn(Point::at(40.0, 40.0), 3);
        assert_eq!(
            nearest,
            [
                Point::at(14.0, 14.0),
                Point::at(13.0, 13.0),
                Point::at(12.0, 12.0)
            ]
        );
    }

    #[test]
    fn corners_and_center() {
        let mut qt = QuadTree::new(domain());
        qt.insert_all([
            Point::at(50.0, 50.0),
            Point::at(0.0, 0.0),
            Point::at(100.0, 0.0),
            Point::at(0.0, 100.0),
            Point::at(100.0, 100.0),
        ]);
        assert!(qt.is_subdivided());

        // (0, 0) itself is excluded; (100, 0) and (0, 100) tie.
        let result = qt.nearest_neighbors(Point::at(0.0, 0.0), 4);
        let d: Vec<_> = result.iter().map(|n| n.distance_squared).collect();
        assert_eq!(d, [5000.0, 10000.0, 10000.0, 20000.0]);
        assert_eq!(result[0].point, Point::at(50.0, 50.0));
        assert_eq!(result[3].point, Point::at(100.0, 100.0));
    }

    #[test]
    fn equidistant_candidate_does_not_evict() {
        let mut qt = QuadTree::new(domain());
        qt.insert(Point::new(60.0, 50.0, 1.0));
        qt.insert(Point::new(40.0, 50.0, 2.0));
        let result = qt.nearest_neighbors(Point::at(50.0, 50.0), 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].point.payload, 1.0);
    }

    #[test]
    fn matches_brute_force_for_every_k() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut qt = QuadTree::new(domain());
        let mut points = Vec::new();
        for i in 0..120 {
            let p = Point::new(
                rng.random_range(0.0..=100.0),
                rng.random_range(0.0..=100.0),
                f64::from(i),
            );
            assert!(qt.insert(p));
            points.push(p);
        }

        let mut targets: Vec<Point> = (0..6)
            .map(|_| Point::at(rng.random_range(-20.0..120.0), rng.random_range(-20.0..120.0)))
            .collect();
        // Stored points as targets exercise self-exclusion.
        targets.extend_from_slice(&points[..4]);

        for target in targets {
            for k in 1..=points.len() {
                let result = qt.nearest_neighbors(target, k);
                let got: Vec<f64> = result.iter().map(|n| n.distance_squared).collect();
                assert_eq!(got, brute_force(&points, target, k), "k = {k}, target = {target:?}");
                assert_consistent(&points, target, &result);
            }
        }
    }

    #[test]
    fn matches_brute_force_on_integer_grid_with_ties() {
        let mut qt = Node::<16>::new(domain());
        let mut points = Vec::new();
        for x in 0..=20 {
            for y in 0..=20 {
                let p = Point::at(f64::from(x * 5), f64::from(y * 5));
                assert!(qt.insert(p));
                points.push(p);
            }
        }

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..25 {
            let target = Point::at(
                f64::from(rng.random_range(0..=100_i32)),
                f64::from(rng.random_range(0..=100_i32)),
            );
            for k in [1, 4, 8, 13, 50] {
                let result = qt.nearest_neighbors(target, k);
                let got: Vec<f64> = result.iter().map(|n| n.distance_squared).collect();
                assert_eq!(got, brute_force(&points, target, k));
                assert_consistent(&points, target, &result);
            }
        }
    }

    #[test]
    fn query_from_a_subtree_root() {
        let mut qt = Node::<1>::new(AxisAlignedBox::new(0.0, 0.0, 10.0, 10.0));
        qt.insert_all([Point::at(-5.0, -5.0), Point::at(5.0, 5.0), Point::at(6.0, 6.0)]);
        let se = qt.child(Quadrant::SouthEast).unwrap();
        // Only the SE subtree is searched.
        assert_eq!(
            se.knn(Point::at(-6.0, -6.0), 3),
            [Point::at(5.0, 5.0), Point::at(6.0, 6.0), Point::ZERO]
        );
    }

    #[test]
    fn search_reaches_points_in_an_overfull_deepest_leaf() {
        // Closer together than a cell at `MAX_DEPTH`, so they end up sharing one leaf.
        let points: Vec<Point> = (0..6)
            .map(|i| Point::new(30.0 + f64::from(i) * 1e-12, 30.0, f64::from(i)))
            .collect();
        let mut qt = Node::<1>::new(domain());
        assert_eq!(qt.insert_all(points.iter().copied()), points.len());

        let (depth, leaf) = qt
            .nodes()
            .max_by_key(|(_, n)| n.points().len())
            .unwrap();
        assert_eq!(depth, usize::from(MAX_DEPTH));
        assert!(leaf.points().len() > leaf.capacity());

        let mut targets = alloc::vec![Point::at(30.0, 30.0), Point::at(0.0, 100.0)];
        targets.extend_from_slice(&points[2..4]);
        for target in targets {
            for k in 1..=points.len() + 1 {
                let result = qt.nearest_neighbors(target, k);
                let got: Vec<f64> = result.iter().map(|n| n.distance_squared).collect();
                assert_eq!(got, brute_force(&points, target, k), "k = {k}, target = {target:?}");
                assert_consistent(&points, target, &result);
            }
        }
    }
}
