use crate::math::{Point, Real, Vector};

/// Computes the parameters at which a ray enters and exits a sphere.
///
/// `dir` must be normalized. Returns `None` if the ray line misses the sphere (or if
/// any input is NaN). The two roots are equal when the ray is tangent to the sphere.
///
/// The center is first projected on the ray line and the roots are computed relative
/// to that closest approach. Unlike the textbook quadratic, this does not subtract two
/// nearly equal large numbers when the sphere is far from the ray origin.
#[inline]
pub fn ray_sphere_roots(
    center: &Point<Real>,
    radius: Real,
    origin: &Point<Real>,
    dir: &Vector<Real>,
) -> Option<(Real, Real)> {
    let t_closest = (center - origin).dot(dir);
    let closest = origin + dir * t_closest;
    let offset_squared = (center - closest).norm_squared();
    let radius_squared = radius * radius;

    // NOTE: written this way so a NaN offset falls into the "miss" branch.
    if !(offset_squared <= radius_squared) {
        return None;
    }

    let half_chord = (radius_squared - offset_squared).sqrt();
    Some((t_closest - half_chord, t_closest + half_chord))
}

/// The outward unit normal of a sphere at the point at parameter `t` of the ray.
#[inline]
pub fn sphere_normal_at(
    center: &Point<Real>,
    radius: Real,
    origin: &Point<Real>,
    dir: &Vector<Real>,
    t: Real,
) -> Vector<Real> {
    let hit = origin + dir * t;
    (hit - center) / radius
}
