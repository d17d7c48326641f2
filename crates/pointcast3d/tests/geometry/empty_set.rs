use na::{Point3, Vector3};
use pointcast3d::bounding_volume::Aabb;
use pointcast3d::partitioning::{NeighborQueue, PointBvh};
use pointcast3d::query::{BackfaceCulling, Farthest, HitInfo, Nearest, Ray};

#[test]
fn empty_point_set() {
    let mut bvh = PointBvh::new();
    bvh.init(&[], 1.0, None, false).unwrap();
    assert!(bvh.is_empty());
    assert!(!bvh.has_curves_or_points());
    assert!(!bvh.aabb().is_valid());

    let ray = Ray::new(Point3::origin(), Vector3::x());
    let mut hit = HitInfo::new();
    bvh.send_ray::<Nearest>(&ray, 0.0, 100.0, BackfaceCulling::Off, &mut hit);
    assert!(!hit.is_hit());
    assert_eq!(hit.t, HitInfo::NO_HIT);

    let mut hits = vec![HitInfo::new()];
    bvh.send_ray_all_rad(&ray, 0.0, 100.0, 1.0, BackfaceCulling::Off, 0.0, &mut hits);
    assert!(hits.is_empty());

    assert!(!bvh.find_closest::<Nearest>(&Point3::origin(), f32::MAX).is_found());
    assert!(!bvh.find_closest::<Farthest>(&Point3::origin(), -1.0).is_found());

    let mut queue = NeighborQueue::new();
    bvh.find_closest_points(&Point3::origin(), &mut queue, 4, f32::MAX);
    assert!(queue.is_empty());

    let mut found = vec![];
    let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    bvh.get_intersecting_boxes(&aabb, &mut found);
    assert!(found.is_empty());
}

#[test]
fn clear_is_idempotent() {
    let mut bvh = PointBvh::new();
    bvh.init(&[Point3::origin()], 1.0, None, false).unwrap();
    bvh.set_data_ids(3, 4);
    assert!(!bvh.is_empty());

    bvh.clear();
    bvh.clear();
    assert!(bvh.is_empty());
    assert_eq!(bvh.num_points(), 0);
    assert_eq!(bvh.positions_data_id(), -1);
    assert!(!bvh.has_curves_or_points());
}
