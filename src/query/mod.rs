//! Ray-casting and point queries: rays, hit results, hit recorders and traversal policies.

pub use self::hit_info::{HitInfo, HitInfoAndNormal, MinInfo, NeighborHit};
pub use self::point_sphere::{project_point_on_sphere, SphereProjection};
pub use self::ray::Ray;
pub use self::ray_sphere::{ray_sphere_roots, sphere_normal_at};
pub use self::recorder::{
    sort_and_dedup_hits, AllHits, AllHitsAndNormal, AsHitInfo, HitRecorder, SingleHit,
    SingleHitAndNormal,
};
pub use self::simd_ray::SimdRay;
pub use self::traversal_order::{BackfaceCulling, Farthest, Nearest, TraversalOrder};

mod hit_info;
mod point_sphere;
mod ray;
mod ray_sphere;
mod recorder;
mod simd_ray;
mod traversal_order;
