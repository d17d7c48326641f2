use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, SimdBool, SimdReal, Vector, DIM, SIMD_WIDTH};
use crate::query::SimdRay;
use crate::utils;
use num::Zero;
use simba::simd::{SimdPartialOrd, SimdValue};

/// Four Aabb represented as a single SoA Aabb with SIMD components.
///
/// Lane `i` of every coordinate belongs to the `i`-th box. Unused lanes are
/// filled with [`Aabb::new_invalid`] so they never win a min/max reduction.
#[derive(Debug, Copy, Clone)]
pub struct SimdAabb {
    /// The min coordinates of the Aabbs.
    pub mins: Point<SimdReal>,
    /// The max coordinates the Aabbs.
    pub maxs: Point<SimdReal>,
}

impl SimdAabb {
    /// An invalid Aabb.
    pub fn new_invalid() -> Self {
        Self::splat(Aabb::new_invalid())
    }

    /// Builds an SIMD aabb composed of four identical aabbs.
    pub fn splat(aabb: Aabb) -> Self {
        Self {
            mins: Point::splat(aabb.mins),
            maxs: Point::splat(aabb.maxs),
        }
    }

    /// Extracts the Aabb stored in the given SIMD lane of the SIMD Aabb.
    pub fn extract(&self, lane: usize) -> Aabb {
        Aabb::new(self.mins.extract(lane), self.maxs.extract(lane))
    }

    /// Slab test of a ray against the four boxes at once.
    ///
    /// Each box is enlarged by `padding` on every side before the test. The ray is
    /// restricted to the parametric interval `[tmin, tmax]`.
    ///
    /// Returns the lanes hit by the ray, and for each lane the parameters at which
    /// the ray enters and exits the box (clamped to `[tmin, tmax]`).
    pub fn cast_ray(
        &self,
        ray: &SimdRay,
        tmin: Real,
        tmax: Real,
        padding: Real,
    ) -> (SimdBool, SimdReal, SimdReal) {
        let padding = SimdReal::splat(padding);
        let mut t_entry = SimdReal::splat(tmin);
        let mut t_exit = SimdReal::splat(tmax);

        for i in 0usize..DIM {
            // NOTE: `inv_dir` never contains infinities (see `SimdRay::new`), so these
            //       products are finite (or overflow to ±inf) but never NaN for finite boxes.
            let mut t_near = (self.mins[i] - padding - ray.origin[i]) * ray.inv_dir[i];
            let mut t_far = (self.maxs[i] + padding - ray.origin[i]) * ray.inv_dir[i];

            let gt = t_near.simd_gt(t_far);
            utils::simd_swap(gt, &mut t_near, &mut t_far);

            t_entry = t_entry.simd_max(t_near);
            t_exit = t_exit.simd_min(t_far);
        }

        (t_entry.simd_le(t_exit), t_entry, t_exit)
    }

    /// The squared distances between a point and the closest point of each box.
    pub fn min_distance_squared(&self, point: &Point<SimdReal>) -> SimdReal {
        let mins_point = self.mins - point;
        let point_maxs = point - self.maxs;
        let shift = mins_point.sup(&point_maxs).sup(&Vector::zeros());
        shift.norm_squared()
    }

    /// The squared distances between a point and the farthest corner of each box.
    pub fn max_distance_squared(&self, point: &Point<SimdReal>) -> SimdReal {
        let mut result = SimdReal::zero();

        for i in 0usize..DIM {
            let to_min = self.mins[i] - point[i];
            let to_max = self.maxs[i] - point[i];
            result += (to_min * to_min).simd_max(to_max * to_max);
        }

        result
    }

    /// Check which Aabb represented by `self` intersects the given set of `other` aabbs.
    /// The check is performed lane-wise.
    pub fn intersects(&self, other: &SimdAabb) -> SimdBool {
        self.mins.x.simd_le(other.maxs.x)
            & other.mins.x.simd_le(self.maxs.x)
            & self.mins.y.simd_le(other.maxs.y)
            & other.mins.y.simd_le(self.maxs.y)
            & self.mins.z.simd_le(other.maxs.z)
            & other.mins.z.simd_le(self.maxs.z)
    }

    /// Merge all the Aabb represented by `self` into a single one.
    pub fn to_merged_aabb(&self) -> Aabb {
        Aabb::new(
            self.mins.coords.map(|e| e.simd_horizontal_min()).into(),
            self.maxs.coords.map(|e| e.simd_horizontal_max()).into(),
        )
    }
}

impl From<[Aabb; SIMD_WIDTH]> for SimdAabb {
    fn from(aabbs: [Aabb; SIMD_WIDTH]) -> Self {
        let mins = array![|ii| aabbs[ii].mins; SIMD_WIDTH];
        let maxs = array![|ii| aabbs[ii].maxs; SIMD_WIDTH];

        SimdAabb {
            mins: Point::from(mins),
            maxs: Point::from(maxs),
        }
    }
}
