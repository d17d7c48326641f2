use na::{Point3, Vector3};
use pointcast3d::partitioning::{NeighborQueue, PointBvh};
use pointcast3d::query::{project_point_on_sphere, Farthest, Nearest, TraversalOrder};

fn cloud(seed: u64, n: usize, with_radii: bool) -> (Vec<Point3<f32>>, PointBvh) {
    let mut rng = oorandom::Rand32::new(seed);
    let points: Vec<_> = (0..n)
        .map(|_| Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 100.0)))
        .collect();
    let radius = if with_radii { 0.75 } else { 0.0 };

    let mut bvh = PointBvh::new();
    bvh.init(&points, radius, None, false).unwrap();
    (points, bvh)
}

/// Every `(squared distance, item)` pair, best first.
fn ranked<O: TraversalOrder>(
    points: &[Point3<f32>],
    radius: f32,
    query: &Point3<f32>,
) -> Vec<(f32, u32)> {
    let mut ranked: Vec<_> = points
        .iter()
        .enumerate()
        .map(|(i, pt)| {
            let proj = project_point_on_sphere::<O>(pt, radius, query);
            (proj.distance_squared, i as u32)
        })
        .collect();
    ranked.sort_by(|a, b| {
        let by_distance = a.0.total_cmp(&b.0).then(a.1.cmp(&b.1));
        if O::FARTHEST {
            by_distance.reverse()
        } else {
            by_distance
        }
    });
    ranked
}

#[test]
fn closest_at_point_position() {
    let (points, bvh) = cloud(1, 1000, false);

    for (i, pt) in points.iter().enumerate().step_by(37) {
        let result = bvh.find_closest::<Nearest>(pt, f32::MAX);
        assert_eq!(result.item, Some(i as u32));
        assert_eq!(result.distance_squared, 0.0);
    }
}

#[test]
fn closest_and_farthest_match_brute_force() {
    for with_radii in [false, true] {
        let (points, bvh) = cloud(2, 1500, with_radii);
        let radius = if with_radii { 0.75 } else { 0.0 };
        let mut rng = oorandom::Rand32::new(3);

        for _ in 0..100 {
            let query = Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 120.0 - 10.0));

            let nearest = ranked::<Nearest>(&points, radius, &query);
            let result = bvh.find_closest::<Nearest>(&query, f32::MAX);
            assert_relative_eq!(result.distance_squared, nearest[0].0, epsilon = 1.0e-3);

            let farthest = ranked::<Farthest>(&points, radius, &query);
            let result = bvh.find_closest::<Farthest>(&query, -1.0);
            assert_relative_eq!(result.distance_squared, farthest[0].0, epsilon = 1.0e-3);
        }
    }
}

#[test]
fn k_nearest_match_brute_force() {
    let (points, bvh) = cloud(4, 2000, false);
    let mut rng = oorandom::Rand32::new(5);
    let mut queue = NeighborQueue::new();

    for k in [1, 2, 5, 16, 64] {
        let query = Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 100.0));

        bvh.find_closest_points(&query, &mut queue, k, f32::MAX);
        let found: Vec<_> = queue
            .sorted_results()
            .iter()
            .map(|h| (h.distance_squared, h.item))
            .collect();
        let expected: Vec<_> = ranked::<Nearest>(&points, 0.0, &query)
            .into_iter()
            .take(k)
            .collect();
        assert_eq!(found, expected);

        bvh.find_farthest_points(&query, &mut queue, k, -1.0);
        let found: Vec<_> = queue
            .sorted_results()
            .iter()
            .map(|h| (h.distance_squared, h.item))
            .collect();
        let expected: Vec<_> = ranked::<Farthest>(&points, 0.0, &query)
            .into_iter()
            .take(k)
            .collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn single_neighbor_is_the_closest_point() {
    let (_, bvh) = cloud(6, 1000, true);
    let mut rng = oorandom::Rand32::new(7);
    let mut queue = NeighborQueue::new();

    for _ in 0..100 {
        let query = Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 100.0));
        let closest = bvh.find_closest::<Nearest>(&query, f32::MAX);
        bvh.find_closest_points(&query, &mut queue, 1, f32::MAX);

        let results = queue.sorted_results();
        assert_eq!(results.len(), 1);
        assert_eq!(Some(results[0].item), closest.item);
        assert_eq!(results[0].distance_squared, closest.distance_squared);
    }
}
