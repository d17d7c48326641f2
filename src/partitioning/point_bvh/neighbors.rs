use super::closest::node_distance_bounds;
use super::stack::TraversalStack;
use super::{Child, ChildRef, PointBvh};
use crate::math::{Point, Real};
use crate::query::{Farthest, Nearest, NeighborHit, TraversalOrder};
use ordered_float::OrderedFloat;
use simba::simd::SimdValue;
use std::collections::BinaryHeap;

/// Ranks a candidate: the greater the rank, the worse the candidate.
type Rank = (OrderedFloat<Real>, i64);

/// The bounded set of results of a k-nearest (or k-farthest) points query.
///
/// The queue can be reused across queries to avoid reallocations: every query
/// clears it first.
#[derive(Clone, Debug, Default)]
pub struct NeighborQueue {
    heap: BinaryHeap<(Rank, u32, OrderedFloat<Real>)>,
    capacity: usize,
    farthest: bool,
}

impl NeighborQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every result.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// The number of results.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Is this queue empty?
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The results, best first.
    ///
    /// After a nearest query, they are sorted by increasing distance, ties by increasing
    /// item index. After a farthest query, by decreasing distance, ties by decreasing
    /// item index.
    pub fn sorted_results(&self) -> Vec<NeighborHit> {
        let mut entries: Vec<_> = self.heap.iter().copied().collect();
        entries.sort_unstable();
        entries
            .into_iter()
            .map(|(_, item, distance_squared)| NeighborHit {
                item,
                distance_squared: distance_squared.0,
            })
            .collect()
    }

    fn reset(&mut self, capacity: usize, farthest: bool) {
        self.heap.clear();
        self.capacity = capacity;
        self.farthest = farthest;
    }

    fn rank(&self, item: u32, distance_squared: Real) -> Rank {
        if self.farthest {
            (OrderedFloat(-distance_squared), -(item as i64))
        } else {
            (OrderedFloat(distance_squared), item as i64)
        }
    }

    fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// The distance a candidate must beat once the queue is full: the worst result's.
    fn worst_distance(&self) -> Option<Real> {
        if self.is_full() {
            self.heap.peek().map(|(_, _, d)| d.0)
        } else {
            None
        }
    }

    /// Inserts a candidate if it ranks among the best ones. Candidates must already be
    /// known to beat the query's distance bound.
    fn offer(&mut self, item: u32, distance_squared: Real) {
        let rank = self.rank(item, distance_squared);
        let entry = (rank, item, OrderedFloat(distance_squared));

        if !self.is_full() {
            self.heap.push(entry);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if rank < worst.0 {
                *worst = entry;
            }
        }
    }
}

impl PointBvh {
    /// The (at most) `max_points` points closest to `point`, at a squared distance
    /// smaller than `max_distance_squared`.
    ///
    /// The results are stored into `queue`, see [`NeighborQueue::sorted_results`].
    /// With `max_points == 1`, this finds the same point as
    /// [`PointBvh::find_closest`] unless several points are tied.
    pub fn find_closest_points(
        &self,
        point: &Point<Real>,
        queue: &mut NeighborQueue,
        max_points: usize,
        max_distance_squared: Real,
    ) {
        self.find_neighbors::<Nearest>(point, queue, max_points, max_distance_squared)
    }

    /// The (at most) `max_points` points farthest from `point`, at a squared distance
    /// larger than `min_distance_squared`.
    ///
    /// The results are stored into `queue`, see [`NeighborQueue::sorted_results`].
    pub fn find_farthest_points(
        &self,
        point: &Point<Real>,
        queue: &mut NeighborQueue,
        max_points: usize,
        min_distance_squared: Real,
    ) {
        self.find_neighbors::<Farthest>(point, queue, max_points, min_distance_squared)
    }

    fn find_neighbors<O: TraversalOrder>(
        &self,
        point: &Point<Real>,
        queue: &mut NeighborQueue,
        max_points: usize,
        distance_squared_limit: Real,
    ) {
        queue.reset(max_points, O::FARTHEST);

        if self.is_empty() || max_points == 0 {
            return;
        }

        let simd_point = Point::splat(*point);
        let mut stack = TraversalStack::<O>::new();
        let mut next = Some(ChildRef::node(0));

        loop {
            // Once the queue is full, subtrees as good as the worst result may still hold
            // a point that wins the tie on its index.
            let (limit, strict) = match queue.worst_distance() {
                Some(worst) => (worst, false),
                None => (distance_squared_limit, true),
            };
            let keep = |bound: Real| {
                if strict {
                    O::is_better(bound, limit)
                } else {
                    !O::is_better(limit, bound)
                }
            };

            let child = match next.take() {
                Some(child) => child,
                None => match stack.pop(keep) {
                    Some(entry) => entry.child,
                    None => break,
                },
            };

            match child.decode() {
                Child::Node(id) => {
                    let node = &self.nodes[id as usize];
                    let (bounds, mask) =
                        node_distance_bounds::<O>(node, &simd_point, limit, strict);
                    next = stack.fan_out(&node.children, &bounds, mask, keep);
                }
                Child::Item(item) => {
                    let proj = self.project_on_item::<O>(item, point);

                    if O::is_better(proj.distance_squared, distance_squared_limit) {
                        queue.offer(item, proj.distance_squared);
                    }
                }
                Child::Empty => {}
            }
        }
    }
}
