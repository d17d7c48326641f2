use super::PointBvh;
use crate::math::Real;
use crate::query::{BackfaceCulling, HitInfo, Ray, TraversalOrder};
use rayon::prelude::*;

impl PointBvh {
    /// Casts every ray of `rays` in parallel, see [`PointBvh::send_ray_rad`].
    ///
    /// The `i`-th result is the hit of the `i`-th ray. A `default_radius` of zero leaves
    /// points without radius unhittable.
    pub fn send_ray_batch<O: TraversalOrder>(
        &self,
        rays: &[Ray],
        tmin: Real,
        tmax: Real,
        default_radius: Real,
        culling: BackfaceCulling,
    ) -> Vec<HitInfo> {
        rays.par_iter()
            .map(|ray| {
                let mut hit = HitInfo::new();
                self.send_ray_rad::<O>(ray, tmin, tmax, default_radius, culling, &mut hit);
                hit
            })
            .collect()
    }
}
