use super::stack::HIT_LANES;
use super::{Child, PointBvh};
use crate::bounding_volume::{Aabb, SimdAabb};
use crate::utils;

impl PointBvh {
    /// Appends to `out` every point whose bounding box intersects `aabb`.
    ///
    /// A point's bounding box is the box of its sphere, or the point itself if it has no
    /// radius. Touching boxes intersect. The order of the results is unspecified.
    pub fn get_intersecting_boxes(&self, aabb: &Aabb, out: &mut Vec<u32>) {
        if self.nodes.is_empty() {
            return;
        }

        let mut stack = vec![0u32];
        let simd_aabb = SimdAabb::splat(*aabb);

        while let Some(inode) = stack.pop() {
            let node = &self.nodes[inode as usize];
            let intersections = node.simd_aabb.intersects(&simd_aabb);
            let mask = utils::occupied_lanes(intersections, node.occupied);
            let lanes = &HIT_LANES[mask];

            for lane in &lanes[..mask.count_ones() as usize] {
                match node.children[*lane as usize].decode() {
                    Child::Item(item) => out.push(item),
                    Child::Node(child) => stack.push(child),
                    Child::Empty => {}
                }
            }
        }
    }
}
