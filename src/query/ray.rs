//! Rays for ray-casting queries.

use crate::math::{Point, Real, Vector};

/// A ray for ray-casting queries.
///
/// A ray is a half-infinite line starting at `origin` and extending along `dir`.
/// The direction does not need to be normalized: ray queries normalize it and
/// scale the admissible `[tmin, tmax]` interval by its length, so hit distances
/// are always measured in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Computes the point at the given parameter on this ray.
    ///
    /// This is computed as `self.origin + self.dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }

    /// Splits this ray into its origin, unit direction, and the length of its direction.
    ///
    /// Returns `None` if the direction has a zero (or non-finite) length.
    #[inline]
    pub fn normalized(&self) -> Option<(Ray, Real)> {
        let length = self.dir.norm();

        if length > 0.0 && length.is_finite() {
            Some((Ray::new(self.origin, self.dir / length), length))
        } else {
            None
        }
    }
}
