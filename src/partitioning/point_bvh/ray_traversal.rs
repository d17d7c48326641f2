use super::stack::TraversalStack;
use super::{Child, ChildRef, PointBvh};
use crate::math::{Real, SIMD_WIDTH};
use crate::query::{
    ray_sphere_roots, sort_and_dedup_hits, sphere_normal_at, AllHits, AllHitsAndNormal,
    BackfaceCulling, HitInfo, HitInfoAndNormal, HitRecorder, Nearest, Ray, SimdRay,
    SingleHit, SingleHitAndNormal, TraversalOrder,
};
use crate::utils;
use simba::simd::SimdValue;

impl PointBvh {
    /// Casts a ray against every point of this hierarchy, reporting hits to `recorder`.
    ///
    /// The direction of `ray` does not need to be normalized: it is normalized here and
    /// `tmin`/`tmax` are scaled by its length, so the interval keeps covering the same
    /// segment. Hit parameters are distances along the normalized direction.
    ///
    /// With [`Nearest`], the admissible interval is `[tmin, tmax[` and single-hit
    /// recorders shrink `tmax` at each hit; with [`Farthest`](crate::query::Farthest)
    /// it is `]tmin, tmax]` and they grow `tmin`.
    ///
    /// A point is intersected as a sphere of its explicit radius if it has one, or of
    /// the recorder's tolerance otherwise. Points with neither are skipped.
    pub fn send_ray_generic<O: TraversalOrder, R: HitRecorder>(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        culling: BackfaceCulling,
        recorder: &mut R,
    ) {
        recorder.no_hit();

        if self.is_empty() {
            return;
        }

        let Some((ray, length)) = ray.normalized() else {
            log::trace!("ray with a degenerate direction ignored");
            return;
        };

        let mut tmin = tmin * length;
        let mut tmax = tmax * length;
        let tolerance = recorder.tolerance();
        let padding = tolerance.unwrap_or(0.0).max(0.0);
        let simd_ray = SimdRay::new(&ray.origin, &ray.dir);
        let mut stack = TraversalStack::<O>::new();
        let mut next = Some(ChildRef::node(0));

        loop {
            let limit = O::ray_limit(tmin, tmax);
            let keep = |bound: Real| !O::is_better(limit, bound);

            let child = match next.take() {
                Some(child) => child,
                None => match stack.pop(keep) {
                    Some(entry) => entry.child,
                    None => break,
                },
            };

            match child.decode() {
                Child::Node(id) => {
                    let node = &self.nodes[id as usize];
                    let (hit, entry, exit) =
                        node.simd_aabb.cast_ray(&simd_ray, tmin, tmax, padding);
                    let bounds =
                        array![|ii| O::ray_bound(entry.extract(ii), exit.extract(ii)); SIMD_WIDTH];
                    let mask = utils::occupied_lanes(hit, node.occupied);
                    next = stack.fan_out(&node.children, &bounds, mask, keep);
                }
                Child::Item(item) => self.intersect_point::<O, R>(
                    item,
                    &ray,
                    &mut tmin,
                    &mut tmax,
                    culling,
                    tolerance,
                    recorder,
                ),
                Child::Empty => {}
            }
        }
    }

    fn intersect_point<O: TraversalOrder, R: HitRecorder>(
        &self,
        item: u32,
        ray: &Ray,
        tmin: &mut Real,
        tmax: &mut Real,
        culling: BackfaceCulling,
        tolerance: Option<Real>,
        recorder: &mut R,
    ) {
        let i = item as usize;
        debug_assert!(
            i < self.num_points(),
            "only point items can be intersected by a point hierarchy"
        );

        let Some(radius) = self.ray_radius(i, tolerance) else {
            return;
        };
        let center = &self.positions[i];
        let Some((t0, t1)) = ray_sphere_roots(center, radius, &ray.origin, &ray.dir) else {
            return;
        };

        for t in [t0, t1] {
            if !O::accepts(t, *tmin, *tmax) {
                continue;
            }

            let normal = sphere_normal_at(center, radius, &ray.origin, &ray.dir, t);

            if culling.rejects(&normal, &ray.dir) {
                continue;
            }

            let mut limit = O::ray_limit(*tmin, *tmax);
            recorder.insert_hit(normal, t, item, &mut limit);

            if R::WANTS_NORMAL {
                recorder.set_normal(normal);
            }

            if R::TIGHTENS {
                O::set_ray_limit(tmin, tmax, limit);
            }
        }
    }

    /// The nearest or farthest hit of a ray with the points that have a radius.
    pub fn send_ray<O: TraversalOrder>(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        culling: BackfaceCulling,
        hit: &mut HitInfo,
    ) {
        self.send_ray_generic::<O, _>(ray, tmin, tmax, culling, &mut SingleHit::new(hit))
    }

    /// The nearest or farthest hit of a ray, where points without radius are given the
    /// radius `default_radius`.
    pub fn send_ray_rad<O: TraversalOrder>(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        default_radius: Real,
        culling: BackfaceCulling,
        hit: &mut HitInfo,
    ) {
        let mut recorder = SingleHit::with_tolerance(hit, default_radius);
        self.send_ray_generic::<O, _>(ray, tmin, tmax, culling, &mut recorder)
    }

    /// Same as [`PointBvh::send_ray`], also computing the normal at the hit.
    pub fn send_ray_and_normal<O: TraversalOrder>(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        culling: BackfaceCulling,
        hit: &mut HitInfoAndNormal,
    ) {
        let mut recorder = SingleHitAndNormal::new(hit);
        self.send_ray_generic::<O, _>(ray, tmin, tmax, culling, &mut recorder)
    }

    /// Same as [`PointBvh::send_ray_rad`], also computing the normal at the hit.
    pub fn send_ray_rad_and_normal<O: TraversalOrder>(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        default_radius: Real,
        culling: BackfaceCulling,
        hit: &mut HitInfoAndNormal,
    ) {
        let mut recorder = SingleHitAndNormal::with_tolerance(hit, default_radius);
        self.send_ray_generic::<O, _>(ray, tmin, tmax, culling, &mut recorder)
    }

    /// Every hit of a ray with the points that have a radius, in `[tmin, tmax[`.
    ///
    /// `hits` is cleared first. The hits are sorted by increasing distance, ties by
    /// increasing item index, and hits closer than `duplicate_tolerance` to the previous
    /// hit kept are dropped.
    pub fn send_ray_all(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        culling: BackfaceCulling,
        duplicate_tolerance: Real,
        hits: &mut Vec<HitInfo>,
    ) {
        hits.clear();
        self.send_ray_generic::<Nearest, _>(ray, tmin, tmax, culling, &mut AllHits::new(hits));
        sort_and_dedup_hits(hits, duplicate_tolerance);
    }

    /// Same as [`PointBvh::send_ray_all`], where points without radius are given the
    /// radius `default_radius`.
    pub fn send_ray_all_rad(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        default_radius: Real,
        culling: BackfaceCulling,
        duplicate_tolerance: Real,
        hits: &mut Vec<HitInfo>,
    ) {
        hits.clear();
        let mut recorder = AllHits::with_tolerance(hits, default_radius);
        self.send_ray_generic::<Nearest, _>(ray, tmin, tmax, culling, &mut recorder);
        sort_and_dedup_hits(hits, duplicate_tolerance);
    }

    /// Same as [`PointBvh::send_ray_all`], also computing the normal at each hit.
    pub fn send_ray_all_and_normal(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        culling: BackfaceCulling,
        duplicate_tolerance: Real,
        hits: &mut Vec<HitInfoAndNormal>,
    ) {
        hits.clear();
        let mut recorder = AllHitsAndNormal::new(hits);
        self.send_ray_generic::<Nearest, _>(ray, tmin, tmax, culling, &mut recorder);
        sort_and_dedup_hits(hits, duplicate_tolerance);
    }

    /// Same as [`PointBvh::send_ray_all_rad`], also computing the normal at each hit.
    pub fn send_ray_all_rad_and_normal(
        &self,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        default_radius: Real,
        culling: BackfaceCulling,
        duplicate_tolerance: Real,
        hits: &mut Vec<HitInfoAndNormal>,
    ) {
        hits.clear();
        let mut recorder = AllHitsAndNormal::with_tolerance(hits, default_radius);
        self.send_ray_generic::<Nearest, _>(ray, tmin, tmax, culling, &mut recorder);
        sort_and_dedup_hits(hits, duplicate_tolerance);
    }
}
