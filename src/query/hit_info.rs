//! Results of ray and point queries.

use crate::math::{Point, Real, Vector};
use smallvec::SmallVec;

/// The result of a ray query.
///
/// `item` and `t` are set together: either both describe a hit, or `item` is `None`
/// and `t` is [`HitInfo::NO_HIT`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitInfo {
    /// The index of the item hit by the ray, if any.
    pub item: Option<u32>,
    /// Hit location on the item.
    ///
    /// For points this is the outward unit normal of the sphere at the hit. It can be
    /// reparametrized in place into polar coordinates with
    /// [`PointBvh::point_uvw_to_polar`](crate::partitioning::PointBvh::point_uvw_to_polar).
    pub uvw: Vector<Real>,
    /// Distance along the (normalized) ray direction.
    pub t: Real,
    /// Path of sub-item indices when the hit item is itself a container of items.
    ///
    /// Always empty for point hits.
    pub nested: SmallVec<[u32; 2]>,
}

impl HitInfo {
    /// The value of `t` when nothing was hit.
    pub const NO_HIT: Real = -1.0;

    /// A hit info describing the absence of hit.
    pub fn new() -> Self {
        Self {
            item: None,
            uvw: Vector::zeros(),
            t: Self::NO_HIT,
            nested: SmallVec::new(),
        }
    }

    /// Resets this hit info to the "no hit" state.
    pub fn no_hit(&mut self) {
        self.item = None;
        self.uvw = Vector::zeros();
        self.t = Self::NO_HIT;
        self.nested.clear();
    }

    /// Does this hit info describe an actual hit?
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.item.is_some()
    }
}

impl Default for HitInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// A ray hit together with the geometric normal of the surface at the hit.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitInfoAndNormal {
    /// The hit itself.
    pub hit: HitInfo,
    /// The geometric normal at the hit. Zero if nothing was hit.
    pub normal: Vector<Real>,
}

impl HitInfoAndNormal {
    /// A hit info describing the absence of hit.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The result of a closest (or farthest) point query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MinInfo {
    /// The index of the item found, if any.
    pub item: Option<u32>,
    /// Direction from the item's center to `point`, i.e., the sphere normal at `point`.
    ///
    /// Zero for items without radius when the query point coincides with the item.
    pub uvw: Vector<Real>,
    /// The point found on the item's surface (its center if it has no radius).
    pub point: Point<Real>,
    /// Squared distance between the query point and `point`, or [`MinInfo::NOT_FOUND`].
    pub distance_squared: Real,
}

impl MinInfo {
    /// The value of `distance_squared` when nothing was found.
    pub const NOT_FOUND: Real = -1.0;

    /// A result describing the absence of any item.
    pub fn new() -> Self {
        Self {
            item: None,
            uvw: Vector::zeros(),
            point: Point::origin(),
            distance_squared: Self::NOT_FOUND,
        }
    }

    /// Was an item found?
    #[inline]
    pub fn is_found(&self) -> bool {
        self.item.is_some()
    }
}

impl Default for MinInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry of a k-nearest (or k-farthest) points query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeighborHit {
    /// The index of the item.
    pub item: u32,
    /// Squared distance between the query point and the item.
    pub distance_squared: Real,
}
