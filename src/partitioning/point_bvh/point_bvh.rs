use crate::attribute::{DataId, PointOffset};
use crate::bounding_volume::{Aabb, SimdAabb};
use crate::math::{Point, Real, SIMD_WIDTH};

const ITEM_TAG: u32 = 1 << 31;

/// A reference to one child slot of a [`PointBvhNode`].
///
/// Packed in 32 bits: the top bit tags item indices, the remaining bits hold the
/// index of the item or of the child node. `u32::MAX` marks an empty slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChildRef(u32);

static_assertions::assert_eq_size!(ChildRef, u32);

/// The decoded content of a [`ChildRef`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Child {
    /// An internal node, by index in [`PointBvh::raw_nodes`].
    Node(u32),
    /// An item, i.e., a point by its dense index in `0..num_points`.
    Item(u32),
    /// An unused slot.
    Empty,
}

impl ChildRef {
    /// The empty slot.
    pub const EMPTY: ChildRef = ChildRef(u32::MAX);

    /// The largest number of items a hierarchy can hold.
    pub const MAX_ITEMS: usize = (ITEM_TAG - 1) as usize;

    /// A reference to the node with index `id`.
    #[inline]
    pub fn node(id: u32) -> Self {
        debug_assert!(id < ITEM_TAG);
        ChildRef(id)
    }

    /// A reference to the item with index `id`.
    #[inline]
    pub fn item(id: u32) -> Self {
        debug_assert!((id as usize) < Self::MAX_ITEMS);
        ChildRef(id | ITEM_TAG)
    }

    /// Is this an empty slot?
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Decodes this reference.
    #[inline]
    pub fn decode(self) -> Child {
        if self.is_empty() {
            Child::Empty
        } else if self.0 & ITEM_TAG != 0 {
            Child::Item(self.0 & !ITEM_TAG)
        } else {
            Child::Node(self.0)
        }
    }
}

/// A node of a [`PointBvh`]: four child slots and their bounding boxes.
#[derive(Copy, Clone, Debug)]
pub struct PointBvhNode {
    /// The bounding boxes of the four children, one per SIMD lane.
    ///
    /// The lanes of empty slots contain invalid boxes.
    pub simd_aabb: SimdAabb,
    /// The children of this node.
    pub children: [ChildRef; SIMD_WIDTH],
    /// Bitmask of the non-empty slots.
    pub occupied: u8,
}

impl PointBvhNode {
    pub(super) fn empty() -> Self {
        Self {
            simd_aabb: SimdAabb::new_invalid(),
            children: [ChildRef::EMPTY; SIMD_WIDTH],
            occupied: 0,
        }
    }
}

/// The radii given to the points of a [`PointBvh`].
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Radii {
    /// The points have no radius.
    #[default]
    None,
    /// Every point has the same radius.
    Uniform(Real),
    /// One radius per point, indexed like the points.
    PerPoint(Vec<Real>),
}

impl Radii {
    /// The radius of the `i`-th point. Zero means "no radius".
    #[inline]
    pub fn get(&self, i: usize) -> Real {
        match self {
            Radii::None => 0.0,
            Radii::Uniform(r) => *r,
            Radii::PerPoint(radii) => radii.get(i).copied().unwrap_or(0.0),
        }
    }
}

/// A bounding volume hierarchy over a set of points, each seen as a sphere.
///
/// Every node has four children whose bounding boxes are stored in SIMD lanes, so a
/// whole node is tested against a ray or a point at once. Leaves are the points
/// themselves, referenced by their dense index in `0..num_points()`. That index maps
/// back to the caller's geometry through [`PointBvh::point_offset`].
///
/// The hierarchy is immutable during queries: it is `Sync`, and any number of
/// threads may query it concurrently.
#[derive(Clone, Debug)]
pub struct PointBvh {
    pub(super) nodes: Vec<PointBvhNode>,
    /// Number of items below each child slot of each node.
    pub(super) item_counts: Vec<[u32; SIMD_WIDTH]>,
    pub(super) positions: Vec<Point<Real>>,
    pub(super) radii: Radii,
    pub(super) point_offsets: Vec<PointOffset>,
    pub(super) has_curves_or_points: bool,
    pub(super) positions_data_id: DataId,
    pub(super) radii_data_id: DataId,
}

impl Default for PointBvh {
    fn default() -> Self {
        Self::new()
    }
}

impl PointBvh {
    /// An empty hierarchy. Every query on it reports nothing.
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            item_counts: vec![],
            positions: vec![],
            radii: Radii::None,
            point_offsets: vec![],
            has_curves_or_points: false,
            positions_data_id: -1,
            radii_data_id: -1,
        }
    }

    /// Resets this hierarchy to the empty state, forgetting the data ids too.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.item_counts.clear();
        self.positions.clear();
        self.radii = Radii::None;
        self.point_offsets.clear();
        self.has_curves_or_points = false;
        self.positions_data_id = -1;
        self.radii_data_id = -1;
    }

    /// Does this hierarchy contain no point?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of points in this hierarchy.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.positions.len()
    }

    /// The number of nodes of the tree.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Does this hierarchy contain point (or curve) items?
    ///
    /// This is `true` as soon as the hierarchy was initialized with at least one point.
    #[inline]
    pub fn has_curves_or_points(&self) -> bool {
        self.has_curves_or_points
    }

    /// The raw nodes of the tree. The root, if any, is the first one.
    pub fn raw_nodes(&self) -> &[PointBvhNode] {
        &self.nodes
    }

    /// The number of items below each child slot of the node `node_id`.
    pub fn subtree_item_counts(&self, node_id: u32) -> Option<[u32; SIMD_WIDTH]> {
        self.item_counts.get(node_id as usize).copied()
    }

    /// The bounding box of every point, or an invalid box if the hierarchy is empty.
    pub fn aabb(&self) -> Aabb {
        self.nodes
            .first()
            .map(|root| root.simd_aabb.to_merged_aabb())
            .unwrap_or_else(Aabb::new_invalid)
    }

    /// The offset, in the caller's geometry, of the point with index `item`.
    #[inline]
    pub fn point_offset(&self, item: u32) -> Option<PointOffset> {
        self.point_offsets.get(item as usize).copied()
    }

    /// The offsets of every point, indexed by item.
    pub fn point_offsets(&self) -> &[PointOffset] {
        &self.point_offsets
    }

    /// The position of the point with index `item`.
    #[inline]
    pub fn point_position(&self, item: u32) -> Option<&Point<Real>> {
        self.positions.get(item as usize)
    }

    /// The explicit radius of the point with index `item` (zero if it has none).
    #[inline]
    pub fn point_radius(&self, item: u32) -> Real {
        self.radii.get(item as usize)
    }

    /// The radii of the points.
    pub fn radii(&self) -> &Radii {
        &self.radii
    }

    /// The data id of the positions this hierarchy was built from. `-1` if unknown.
    pub fn positions_data_id(&self) -> DataId {
        self.positions_data_id
    }

    /// The data id of the radii this hierarchy was built from. `-1` if unknown.
    pub fn radii_data_id(&self) -> DataId {
        self.radii_data_id
    }

    /// Stores the data ids of the attributes this hierarchy was built from.
    ///
    /// Callers compare them to the current ids of their attributes to decide whether
    /// a rebuild is needed. The hierarchy itself never reads them.
    pub fn set_data_ids(&mut self, positions_data_id: DataId, radii_data_id: DataId) {
        self.positions_data_id = positions_data_id;
        self.radii_data_id = radii_data_id;
    }

    /// The radius used to intersect the point `item` with a ray.
    ///
    /// The explicit radius wins, then `tolerance`. `None` means the point cannot be hit.
    #[inline]
    pub(super) fn ray_radius(&self, item: usize, tolerance: Option<Real>) -> Option<Real> {
        let radius = self.radii.get(item);

        if radius > 0.0 {
            Some(radius)
        } else {
            tolerance.filter(|tol| *tol > 0.0)
        }
    }

    /// The bounding box of the point `item`, given its explicit radius.
    #[inline]
    pub(super) fn item_aabb(&self, item: usize) -> Aabb {
        Aabb::from_center_radius(self.positions[item], self.radii.get(item))
    }
}
