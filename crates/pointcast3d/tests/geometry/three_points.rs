use na::{Point3, Vector3};
use pointcast3d::partitioning::PointBvh;
use pointcast3d::query::{BackfaceCulling, HitInfo, HitInfoAndNormal, Nearest, Ray};

fn scene() -> PointBvh {
    let points = [
        Point3::origin(),
        Point3::new(5.0, 0.0, 0.0),
        Point3::new(10.0, 0.0, 0.0),
    ];
    let pscale = [1.0, 1.0, 0.0];
    let mut bvh = PointBvh::new();
    bvh.init_with_pscale(&points, Some(&pscale[..]), 1.0, None, false)
        .unwrap();
    bvh
}

fn ray() -> Ray {
    Ray::new(Point3::new(-5.0, 0.0, 0.0), Vector3::x())
}

#[test]
fn first_hit_uses_explicit_radius() {
    let bvh = scene();
    let mut hit = HitInfo::new();
    bvh.send_ray_rad::<Nearest>(&ray(), 0.0, 1.0e6, 0.5, BackfaceCulling::Off, &mut hit);

    assert_eq!(hit.item, Some(0));
    assert_relative_eq!(hit.t, 4.0, epsilon = 1.0e-5);
}

#[test]
fn every_front_facing_hit() {
    let bvh = scene();
    let mut hits = vec![];
    bvh.send_ray_all_rad(
        &ray(),
        0.0,
        1.0e6,
        0.5,
        BackfaceCulling::On,
        1.0e-4,
        &mut hits,
    );

    let found: Vec<_> = hits.iter().map(|h| (h.item.unwrap(), h.t)).collect();
    assert_eq!(found.len(), 3);
    let expected = [(0, 4.0), (1, 9.0), (2, 14.5)];

    for ((item, t), (expected_item, expected_t)) in found.iter().zip(expected.iter()) {
        assert_eq!(item, expected_item);
        assert_relative_eq!(*t, *expected_t, epsilon = 1.0e-4);
    }
}

#[test]
fn hits_with_normals_are_sorted_and_unit() {
    let bvh = scene();
    let mut hits: Vec<HitInfoAndNormal> = vec![];
    bvh.send_ray_all_rad_and_normal(
        &ray(),
        0.0,
        1.0e6,
        0.5,
        BackfaceCulling::Off,
        0.0,
        &mut hits,
    );

    assert_eq!(hits.len(), 6);
    for pair in hits.windows(2) {
        assert!(pair[0].hit.t <= pair[1].hit.t);
    }
    for hit in &hits {
        assert_relative_eq!(hit.normal.norm(), 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(hit.normal.x.abs(), 1.0, epsilon = 1.0e-5);
    }
}

#[test]
fn central_ray_normal_is_unit() {
    let bvh = scene();
    let mut hit = HitInfoAndNormal::new();
    let ray = Ray::new(Point3::new(5.0, 10.0, 0.0), -Vector3::y());
    bvh.send_ray_and_normal::<Nearest>(&ray, 0.0, 100.0, BackfaceCulling::Off, &mut hit);

    assert_eq!(hit.hit.item, Some(1));
    assert!(hit.hit.t >= 0.0 && hit.hit.t <= 100.0);
    assert_relative_eq!(hit.normal.norm(), 1.0, epsilon = 1.0e-5);
    assert_relative_eq!(hit.normal, Vector3::y(), epsilon = 1.0e-5);
}

#[test]
fn repeated_queries_are_idempotent() {
    let bvh = scene();
    let mut first = HitInfo::new();
    let mut second = HitInfo::new();
    bvh.send_ray_rad::<Nearest>(&ray(), 0.0, 1.0e6, 0.5, BackfaceCulling::Off, &mut first);
    bvh.send_ray_rad::<Nearest>(&ray(), 0.0, 1.0e6, 0.5, BackfaceCulling::Off, &mut second);
    assert_eq!(first, second);
}
