use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::query::TraversalOrder;

/// The projection of a point on the surface of a sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereProjection {
    /// The projected point.
    pub point: Point<Real>,
    /// The outward unit normal of the sphere at `point` (zero if the sphere has no
    /// radius and the query point coincides with its center).
    pub normal: Vector<Real>,
    /// The squared distance between the query point and `point`.
    pub distance_squared: Real,
}

/// Projects `query` on the closest ([`Nearest`](crate::query::Nearest)) or farthest
/// ([`Farthest`](crate::query::Farthest)) point of the surface of a sphere.
///
/// A sphere with a zero radius is a single point: its center is returned.
/// If `query` coincides with the center of a sphere with a positive radius, the
/// projection direction is arbitrarily chosen to be `+X`.
#[inline]
pub fn project_point_on_sphere<O: TraversalOrder>(
    center: &Point<Real>,
    radius: Real,
    query: &Point<Real>,
) -> SphereProjection {
    let dcenter = query - center;
    let direction = dcenter.try_normalize(DEFAULT_EPSILON);

    if radius <= 0.0 {
        return SphereProjection {
            point: *center,
            normal: direction.unwrap_or_else(Vector::zeros),
            distance_squared: dcenter.norm_squared(),
        };
    }

    let direction = direction.unwrap_or_else(Vector::x);
    let normal = if O::FARTHEST { -direction } else { direction };
    let point = center + normal * radius;

    SphereProjection {
        point,
        normal,
        distance_squared: (query - point).norm_squared(),
    }
}
