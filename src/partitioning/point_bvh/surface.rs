//! Evaluation of the surface of the points at a ray hit.
//!
//! A point of radius `r` centered at `c` is the sphere parametrized by
//! `P(u, v) = c + r * (cos(2πu) sin(πv), sin(2πu) sin(πv), cos(πv))`
//! for `u ∈ [0, 1[` and `v ∈ [0, 1]`.

use super::PointBvh;
use crate::attribute::{AttributeOwner, AttributeRead};
use crate::math::{Real, Vector, DEFAULT_EPSILON};
use crate::query::HitInfo;
use na::RealField;

impl PointBvh {
    /// The geometric normal of the surface at `hit`.
    ///
    /// Zero if `hit` is not a hit. If `normalize` is `false`, the stored hit direction
    /// is returned as-is.
    pub fn geometric_normal(&self, hit: &HitInfo, normalize: bool) -> Vector<Real> {
        if !hit.is_hit() {
            return Vector::zeros();
        }

        if normalize {
            hit.uvw.try_normalize(DEFAULT_EPSILON).unwrap_or(hit.uvw)
        } else {
            hit.uvw
        }
    }

    /// The partial derivatives `(dP/du, dP/dv)` of the sphere parametrization at `hit`.
    ///
    /// `hit.uvw` must still hold the hit direction (i.e. it must not have been converted
    /// with [`PointBvh::point_uvw_to_polar`]). Both derivatives are zero if `hit` is not
    /// a hit or if the point hit has no explicit radius. Use [`PointBvh::derivs_rad`]
    /// for hits found by the `*_rad` queries.
    pub fn derivs(&self, hit: &HitInfo) -> (Vector<Real>, Vector<Real>) {
        self.derivs_with_radius(hit, None)
    }

    /// Same as [`PointBvh::derivs`], where points without radius are given the radius
    /// `default_radius`, as in [`PointBvh::send_ray_rad`].
    pub fn derivs_rad(
        &self,
        hit: &HitInfo,
        default_radius: Real,
    ) -> (Vector<Real>, Vector<Real>) {
        self.derivs_with_radius(hit, Some(default_radius))
    }

    fn derivs_with_radius(
        &self,
        hit: &HitInfo,
        tolerance: Option<Real>,
    ) -> (Vector<Real>, Vector<Real>) {
        let Some(item) = hit.item else {
            return (Vector::zeros(), Vector::zeros());
        };
        let Some(dir) = hit.uvw.try_normalize(DEFAULT_EPSILON) else {
            return (Vector::zeros(), Vector::zeros());
        };
        if item as usize >= self.num_points() {
            return (Vector::zeros(), Vector::zeros());
        }

        let radius = self.ray_radius(item as usize, tolerance).unwrap_or(0.0);
        let two_pi = Real::two_pi();
        let pi = Real::pi();
        let phi = dir.y.atan2(dir.x);
        let theta = dir.z.clamp(-1.0, 1.0).acos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();

        let dpdu = Vector::new(-sin_phi * sin_theta, cos_phi * sin_theta, 0.0);
        let dpdv = Vector::new(cos_phi * cos_theta, sin_phi * cos_theta, -sin_theta);
        (dpdu * (two_pi * radius), dpdv * (pi * radius))
    }

    /// Converts, in place, the hit direction stored in a [`HitInfo::uvw`] into the
    /// `(u, v, 0)` coordinates of the sphere parametrization.
    ///
    /// A zero direction is converted to `(0, 0, 0)`.
    pub fn point_uvw_to_polar(uvw: &mut Vector<Real>) {
        let Some(dir) = uvw.try_normalize(DEFAULT_EPSILON) else {
            *uvw = Vector::zeros();
            return;
        };

        let mut u = dir.y.atan2(dir.x) / Real::two_pi();
        if u < 0.0 {
            u += 1.0;
        }
        // atan2 rounding can land exactly on 1.
        if u >= 1.0 {
            u = 0.0;
        }

        let v = dir.z.clamp(-1.0, 1.0).acos() / Real::pi();
        *uvw = Vector::new(u, v, 0.0);
    }

    /// Reads `attribute` at the point hit.
    ///
    /// Point attributes are read at the offset of the point hit, detail attributes
    /// ignore it. Returns `None` if `hit` is not a hit, or if the attribute is attached
    /// to vertices or primitives, which points do not have.
    pub fn get_attribute<T, A: AttributeRead<T> + ?Sized>(
        &self,
        hit: &HitInfo,
        attribute: &A,
    ) -> Option<T> {
        let offset = self.point_offset(hit.item?)?;

        match attribute.owner() {
            AttributeOwner::Point => attribute.get(offset),
            AttributeOwner::Detail => attribute.get(0),
            AttributeOwner::Vertex | AttributeOwner::Primitive => None,
        }
    }
}
