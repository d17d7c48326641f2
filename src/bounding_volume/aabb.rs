//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM};
use num::Bounded;

/// An Axis Aligned Bounding Box.
///
/// An invalid box (see [`Aabb::new_invalid`]) has its `mins` set to the largest
/// representable value and its `maxs` set to the smallest one. It is the neutral
/// element of [`Aabb::merged`] and never contributes to a min/max reduction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates along every axis.
    pub mins: Point<Real>,
    /// The point with the largest coordinates along every axis.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new Aabb.
    ///
    /// # Arguments:
    ///   * `mins` - position of the point with the smallest coordinates.
    ///   * `maxs` - position of the point with the highest coordinates. Each component of `mins`
    ///     must be smaller than the related components of `maxs`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[cfg(all(feature = "dim3", feature = "f32"))] {
    /// use pointcast3d::bounding_volume::Aabb;
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    /// assert_eq!(aabb.center(), Point3::origin());
    /// # }
    /// ```
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid Aabb with `mins` components set to `Real::max_value()` and `maxs`components set to `-Real::max_value()`.
    ///
    /// This is often used as the initial values of some Aabb merging algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Creates a new Aabb from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// The Aabb of a sphere (or of a single point if `radius` is zero).
    #[inline]
    pub fn from_center_radius(center: Point<Real>, radius: Real) -> Self {
        Self::from_half_extents(center, Vector::repeat(radius))
    }

    /// Is this Aabb valid, i.e., are its `mins` smaller or equal to its `maxs` on every axis?
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..DIM).all(|i| self.mins[i] <= self.maxs[i])
    }

    /// The center of this Aabb.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The smallest Aabb containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// Do `self` and `other` overlap? Touching boxes are considered overlapping.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..DIM).all(|i| self.mins[i] <= other.maxs[i] && other.mins[i] <= self.maxs[i])
    }

    /// The squared distance between `point` and the closest point of this Aabb.
    ///
    /// This is zero if `point` lies inside of the box.
    #[inline]
    pub fn distance_squared_to_point(&self, point: &Point<Real>) -> Real {
        let mins_point = self.mins - point;
        let point_maxs = point - self.maxs;
        mins_point
            .sup(&point_maxs)
            .sup(&Vector::zeros())
            .norm_squared()
    }

    /// The squared distance between `point` and the farthest corner of this Aabb.
    #[inline]
    pub fn max_distance_squared_to_point(&self, point: &Point<Real>) -> Real {
        let to_mins = (self.mins - point).abs();
        let to_maxs = (self.maxs - point).abs();
        to_mins.sup(&to_maxs).norm_squared()
    }
}
