use super::{Child, ChildRef, PointBvh, PointBvhError, PointBvhNode, Radii};
use crate::attribute::PointOffset;
use crate::bounding_volume::{Aabb, SimdAabb};
use crate::math::{Point, Real, Vector, SIMD_WIDTH};

impl PointBvh {
    /// Builds this hierarchy over a set of points sharing the same `radius`.
    ///
    /// `positions` is indexed by point offset. If `range` is given, only the points
    /// with these offsets are inserted, in that order, otherwise every position is.
    /// A `radius` of zero gives the points no thickness: rays can then only hit them
    /// through the tolerance of the `*_rad` queries.
    ///
    /// If `force_rebalance` is `false` and the hierarchy already holds the same list of
    /// point offsets, its topology is kept and only its bounding boxes are refitted.
    ///
    /// An empty set of points leaves the hierarchy in the same state as
    /// [`PointBvh::clear`]. On error, the hierarchy is cleared too.
    pub fn init(
        &mut self,
        positions: &[Point<Real>],
        radius: Real,
        range: Option<&[PointOffset]>,
        force_rebalance: bool,
    ) -> Result<(), PointBvhError> {
        self.init_with_pscale(positions, None, radius, range, force_rebalance)
    }

    /// Builds this hierarchy over a set of points with per-point radii.
    ///
    /// The radius of the point at offset `i` is `pscale[i] * radius_scale` if `pscale`
    /// is given, and `radius_scale` otherwise. See [`PointBvh::init`] for the meaning
    /// of the other arguments.
    pub fn init_with_pscale(
        &mut self,
        positions: &[Point<Real>],
        pscale: Option<&[Real]>,
        radius_scale: Real,
        range: Option<&[PointOffset]>,
        force_rebalance: bool,
    ) -> Result<(), PointBvhError> {
        let result = self.do_init(positions, pscale, radius_scale, range, force_rebalance);

        if let Err(err) = &result {
            log::warn!("point hierarchy initialization rejected: {}", err);
            self.clear();
        }

        result
    }

    fn do_init(
        &mut self,
        positions: &[Point<Real>],
        pscale: Option<&[Real]>,
        radius_scale: Real,
        range: Option<&[PointOffset]>,
        force_rebalance: bool,
    ) -> Result<(), PointBvhError> {
        if !(radius_scale.is_finite() && radius_scale >= 0.0) {
            return Err(PointBvhError::InvalidRadius(radius_scale));
        }

        if let Some(pscale) = pscale {
            if pscale.len() < positions.len() {
                return Err(PointBvhError::RadiusAttributeTooShort {
                    expected: positions.len(),
                    found: pscale.len(),
                });
            }
        }

        let offsets: Vec<PointOffset> = match range {
            Some(range) => {
                if let Some(offset) = range.iter().find(|o| **o as usize >= positions.len()) {
                    return Err(PointBvhError::OffsetOutOfBounds {
                        offset: *offset,
                        num_points: positions.len(),
                    });
                }
                range.to_vec()
            }
            None => (0..positions.len() as PointOffset).collect(),
        };

        if offsets.len() >= ChildRef::MAX_ITEMS {
            return Err(PointBvhError::TooManyPoints(offsets.len()));
        }

        let radii = match pscale {
            Some(pscale) => {
                let mut radii = Vec::with_capacity(offsets.len());
                for offset in &offsets {
                    let radius = pscale[*offset as usize] * radius_scale;
                    if !(radius.is_finite() && radius >= 0.0) {
                        return Err(PointBvhError::InvalidPointRadius {
                            offset: *offset,
                            radius,
                        });
                    }
                    radii.push(radius);
                }
                Radii::PerPoint(radii)
            }
            None if radius_scale > 0.0 => Radii::Uniform(radius_scale),
            None => Radii::None,
        };

        if offsets.is_empty() {
            log::trace!("empty point set, clearing the point hierarchy");
            self.clear();
            return Ok(());
        }

        let can_refit = !force_rebalance && !self.is_empty() && self.point_offsets == offsets;

        self.positions.clear();
        self.positions
            .extend(offsets.iter().map(|o| positions[*o as usize]));
        self.radii = radii;
        self.point_offsets = offsets;
        self.has_curves_or_points = true;

        if can_refit {
            self.refit();
            log::debug!(
                "refitted point hierarchy: {} points, {} nodes",
                self.num_points(),
                self.num_nodes()
            );
        } else {
            self.rebuild();
            log::debug!(
                "built point hierarchy: {} points, {} nodes",
                self.num_points(),
                self.num_nodes()
            );
        }

        Ok(())
    }

    /// Rebuilds the whole tree from the current points.
    fn rebuild(&mut self) {
        self.nodes.clear();
        self.item_counts.clear();

        let aabbs: Vec<Aabb> = (0..self.num_points()).map(|i| self.item_aabb(i)).collect();
        let centers: Vec<Point<Real>> = aabbs.iter().map(|aabb| aabb.center()).collect();
        let mut indices: Vec<usize> = (0..aabbs.len()).collect();

        let _ = self.recurse_build(&mut indices, &aabbs, &centers);
    }

    /// Builds the subtree containing `indices`, returning its index and bounding box.
    fn recurse_build(
        &mut self,
        indices: &mut [usize],
        aabbs: &[Aabb],
        centers: &[Point<Real>],
    ) -> (u32, Aabb, u32) {
        let id = self.nodes.len();
        self.nodes.push(PointBvhNode::empty());
        self.item_counts.push([0; SIMD_WIDTH]);

        let mut node = PointBvhNode::empty();
        let mut counts = [0; SIMD_WIDTH];
        let mut slot_aabbs = [Aabb::new_invalid(); SIMD_WIDTH];

        if indices.len() <= SIMD_WIDTH {
            for (k, i) in indices.iter().enumerate() {
                node.children[k] = ChildRef::item(*i as u32);
                slot_aabbs[k] = aabbs[*i];
                counts[k] = 1;
            }
        } else {
            let center = mean(indices, centers);
            let subdiv_dims = subdivision_dims(indices, centers, &center);

            let (left, right) = split_indices_wrt_dim(indices, centers, &center, subdiv_dims[0]);
            let (left_bottom, left_top) =
                split_indices_wrt_dim(left, centers, &center, subdiv_dims[1]);
            let (right_bottom, right_top) =
                split_indices_wrt_dim(right, centers, &center, subdiv_dims[1]);

            for (k, group) in [left_bottom, left_top, right_bottom, right_top]
                .into_iter()
                .enumerate()
            {
                match group.len() {
                    0 => {}
                    1 => {
                        node.children[k] = ChildRef::item(group[0] as u32);
                        slot_aabbs[k] = aabbs[group[0]];
                        counts[k] = 1;
                    }
                    _ => {
                        let (child_id, child_aabb, child_count) =
                            self.recurse_build(group, aabbs, centers);
                        node.children[k] = ChildRef::node(child_id);
                        slot_aabbs[k] = child_aabb;
                        counts[k] = child_count;
                    }
                }
            }
        }

        node.occupied = occupied_mask(&node.children);
        node.simd_aabb = SimdAabb::from(slot_aabbs);
        let my_aabb = node.simd_aabb.to_merged_aabb();

        self.nodes[id] = node;
        self.item_counts[id] = counts;
        (id as u32, my_aabb, counts.iter().sum())
    }

    /// Recomputes every bounding box of the tree, keeping its topology.
    ///
    /// Children are always stored after their parent, so a reverse sweep visits
    /// every node after all of its descendants.
    fn refit(&mut self) {
        for id in (0..self.nodes.len()).rev() {
            let mut slot_aabbs = [Aabb::new_invalid(); SIMD_WIDTH];

            for (k, child) in self.nodes[id].children.iter().enumerate() {
                slot_aabbs[k] = match child.decode() {
                    Child::Node(node) => {
                        self.nodes[node as usize].simd_aabb.to_merged_aabb()
                    }
                    Child::Item(item) => self.item_aabb(item as usize),
                    Child::Empty => Aabb::new_invalid(),
                };
            }

            self.nodes[id].simd_aabb = SimdAabb::from(slot_aabbs);
        }
    }
}

fn occupied_mask(children: &[ChildRef; SIMD_WIDTH]) -> u8 {
    children
        .iter()
        .enumerate()
        .filter(|(_, child)| !child.is_empty())
        .fold(0, |mask, (k, _)| mask | (1u8 << k))
}

fn mean(indices: &[usize], centers: &[Point<Real>]) -> Point<Real> {
    let denom = 1.0 / (indices.len() as Real);
    let mut center = Point::origin();

    for i in indices {
        center += centers[*i].coords * denom;
    }

    center
}

/// The two axes to split along: every axis but the one with the smallest variance.
fn subdivision_dims(
    indices: &[usize],
    centers: &[Point<Real>],
    center: &Point<Real>,
) -> [usize; 2] {
    let denom = 1.0 / ((indices.len() - 1) as Real);
    let mut variance = Vector::zeros();

    for i in indices {
        let dir_to_center = centers[*i] - *center;
        variance += dir_to_center.component_mul(&dir_to_center) * denom;
    }

    let min = variance.imin();
    [(min + 1) % 3, (min + 2) % 3]
}

/// Partitions `indices` depending on which side of `split_point` their center lies
/// along `dim`.
///
/// If every center lies on the same side, the set is halved instead so both parts
/// are non-empty whenever `indices` contains at least two elements.
fn split_indices_wrt_dim<'a>(
    indices: &'a mut [usize],
    centers: &[Point<Real>],
    split_point: &Point<Real>,
    dim: usize,
) -> (&'a mut [usize], &'a mut [usize]) {
    let mut icurr = 0;
    let mut ilast = indices.len();

    for _ in 0..indices.len() {
        let i = indices[icurr];

        if centers[i][dim] > split_point[dim] {
            ilast -= 1;
            indices.swap(icurr, ilast);
        } else {
            icurr += 1;
        }
    }

    if icurr == 0 || icurr == indices.len() {
        let half = indices.len() / 2;
        indices.split_at_mut(half)
    } else {
        indices.split_at_mut(icurr)
    }
}
