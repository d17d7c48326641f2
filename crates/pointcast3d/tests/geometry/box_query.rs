use na::Point3;
use pointcast3d::bounding_volume::Aabb;
use pointcast3d::partitioning::PointBvh;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_cloud(rng: &mut StdRng, n: usize) -> Vec<Point3<f32>> {
    (0..n)
        .map(|_| {
            Point3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            )
        })
        .collect()
}

fn brute_force(points: &[Point3<f32>], pscale: &[f32], aabb: &Aabb) -> Vec<u32> {
    (0..points.len())
        .filter(|i| Aabb::from_center_radius(points[*i], pscale[*i]).intersects(aabb))
        .map(|i| i as u32)
        .collect()
}

#[test]
fn box_query_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0);
    let points = random_cloud(&mut rng, 2000);
    let pscale: Vec<f32> = (0..points.len()).map(|_| rng.gen_range(0.0..0.5)).collect();
    let mut bvh = PointBvh::new();
    bvh.init_with_pscale(&points, Some(&pscale[..]), 1.0, None, false)
        .unwrap();

    for _ in 0..50 {
        let center: Point3<f32> = random_cloud(&mut rng, 1)[0];
        let aabb = Aabb::from_center_radius(center, rng.gen_range(0.0..3.0));

        let mut found = vec![];
        bvh.get_intersecting_boxes(&aabb, &mut found);
        found.sort_unstable();
        assert_eq!(found, brute_force(&points, &pscale, &aabb));
    }
}

#[test]
fn box_query_is_stable_across_threads() {
    let mut rng = StdRng::seed_from_u64(1);
    let points = random_cloud(&mut rng, 5000);
    let mut bvh = PointBvh::new();
    bvh.init(&points, 0.1, None, false).unwrap();

    let aabb = Aabb::new(Point3::new(-4.0, -2.0, -6.0), Point3::new(3.0, 5.0, 1.0));
    let mut reference = vec![];
    bvh.get_intersecting_boxes(&aabb, &mut reference);
    reference.sort_unstable();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let mut found = vec![];
                    for _ in 0..10 {
                        found.clear();
                        bvh.get_intersecting_boxes(&aabb, &mut found);
                    }
                    found.sort_unstable();
                    found
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), reference);
        }
    });
}
