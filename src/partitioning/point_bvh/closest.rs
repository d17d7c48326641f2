use super::stack::TraversalStack;
use super::{Child, ChildRef, PointBvh, PointBvhNode};
use crate::math::{Point, Real, SimdReal, SIMD_WIDTH};
use crate::query::{project_point_on_sphere, MinInfo, SphereProjection, TraversalOrder};
use crate::utils;
use simba::simd::{SimdPartialOrd, SimdValue};

impl PointBvh {
    /// The point closest to (or farthest from) `point`.
    ///
    /// Points with a radius are seen as spheres: the distance is measured to the
    /// closest (or farthest) point of their surface. With [`Nearest`](crate::query::Nearest)
    /// only points at a squared distance smaller than `distance_squared_limit` are
    /// considered; with [`Farthest`](crate::query::Farthest), only those at a squared
    /// distance larger than it. Ties are resolved by keeping the first point found.
    pub fn find_closest<O: TraversalOrder>(
        &self,
        point: &Point<Real>,
        distance_squared_limit: Real,
    ) -> MinInfo {
        let mut result = MinInfo::new();

        if self.is_empty() {
            return result;
        }

        let mut limit = distance_squared_limit;
        let simd_point = Point::splat(*point);
        let mut stack = TraversalStack::<O>::new();
        let mut next = Some(ChildRef::node(0));

        loop {
            let keep = |bound: Real| O::is_better(bound, limit);

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
                        node_distance_bounds::<O>(node, &simd_point, limit, true);
                    next = stack.fan_out(&node.children, &bounds, mask, keep);
                }
                Child::Item(item) => {
                    let proj = self.project_on_item::<O>(item, point);

                    if O::is_better(proj.distance_squared, limit) {
                        limit = proj.distance_squared;
                        result = MinInfo {
                            item: Some(item),
                            uvw: proj.normal,
                            point: proj.point,
                            distance_squared: proj.distance_squared,
                        };
                    }
                }
                Child::Empty => {}
            }
        }

        result
    }

    #[inline]
    pub(super) fn project_on_item<O: TraversalOrder>(
        &self,
        item: u32,
        point: &Point<Real>,
    ) -> SphereProjection {
        let i = item as usize;
        debug_assert!(i < self.num_points());
        project_point_on_sphere::<O>(&self.positions[i], self.radii.get(i), point)
    }
}

/// The distance bounds of the four children of `node` to `point`, and the mask of the
/// non-empty children worth visiting given `limit`.
///
/// With `strict`, a child is worth visiting if its bound is strictly better than
/// `limit`; otherwise, if it is not strictly worse.
pub(super) fn node_distance_bounds<O: TraversalOrder>(
    node: &PointBvhNode,
    point: &Point<SimdReal>,
    limit: Real,
    strict: bool,
) -> ([Real; SIMD_WIDTH], usize) {
    let limit = SimdReal::splat(limit);
    let (bounds, visit) = if O::FARTHEST {
        let bounds = node.simd_aabb.max_distance_squared(point);
        let visit = if strict {
            bounds.simd_gt(limit)
        } else {
            bounds.simd_ge(limit)
        };
        (bounds, visit)
    } else {
        let bounds = node.simd_aabb.min_distance_squared(point);
        let visit = if strict {
            bounds.simd_lt(limit)
        } else {
            bounds.simd_le(limit)
        };
        (bounds, visit)
    };

    let mask = utils::occupied_lanes(visit, node.occupied);
    (array![|ii| bounds.extract(ii); SIMD_WIDTH], mask)
}
