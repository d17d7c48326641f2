use na::{Point3, Vector3};
use pointcast3d::partitioning::PointBvh;
use pointcast3d::query::{
    ray_sphere_roots, BackfaceCulling, Farthest, HitInfo, Nearest, Ray, TraversalOrder,
};

struct Scene {
    points: Vec<Point3<f32>>,
    radii: Vec<f32>,
    bvh: PointBvh,
}

fn scene(seed: u64, n: usize) -> Scene {
    let mut rng = oorandom::Rand32::new(seed);
    let points: Vec<_> = (0..n)
        .map(|_| Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 20.0 - 10.0)))
        .collect();
    // A fourth of the points have no radius.
    let radii: Vec<_> = (0..n)
        .map(|_| {
            if rng.rand_float() < 0.25 {
                0.0
            } else {
                rng.rand_float() * 0.8
            }
        })
        .collect();

    let mut bvh = PointBvh::new();
    bvh.init_with_pscale(&points, Some(&radii[..]), 1.0, None, false)
        .unwrap();
    Scene { points, radii, bvh }
}

fn random_ray(rng: &mut oorandom::Rand32) -> Ray {
    let origin = Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 30.0 - 15.0));
    let target = Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 10.0 - 5.0));
    Ray::new(origin, (target - origin).normalize())
}

/// Every (t, item) hit of `ray`, ignoring culling.
fn brute_force_hits(scene: &Scene, ray: &Ray, tolerance: f32) -> Vec<(f32, u32)> {
    let mut hits = vec![];

    for (i, center) in scene.points.iter().enumerate() {
        let radius = if scene.radii[i] > 0.0 {
            scene.radii[i]
        } else {
            tolerance
        };

        if radius <= 0.0 {
            continue;
        }

        if let Some((t0, t1)) = ray_sphere_roots(center, radius, &ray.origin, &ray.dir) {
            hits.push((t0, i as u32));
            hits.push((t1, i as u32));
        }
    }

    hits
}

fn best<O: TraversalOrder>(hits: &[(f32, u32)], tmin: f32, tmax: f32) -> Option<(f32, u32)> {
    hits.iter()
        .copied()
        .filter(|(t, _)| O::accepts(*t, tmin, tmax))
        .fold(None, |best, hit| match best {
            Some(b) if !O::is_better(hit.0, b.0) => Some(b),
            _ => Some(hit),
        })
}

#[test]
fn nearest_and_farthest_match_brute_force() {
    let scene = scene(7, 600);
    let mut rng = oorandom::Rand32::new(8);
    let mut num_hits = 0;

    for _ in 0..300 {
        let ray = random_ray(&mut rng);
        let (tmin, tmax) = (0.5, 40.0);

        for tolerance in [0.0, 0.3] {
            let hits = brute_force_hits(&scene, &ray, tolerance);
            let mut hit = HitInfo::new();

            scene.bvh.send_ray_rad::<Nearest>(
                &ray,
                tmin,
                tmax,
                tolerance,
                BackfaceCulling::Off,
                &mut hit,
            );
            match best::<Nearest>(&hits, tmin, tmax) {
                Some((t, _)) => {
                    num_hits += 1;
                    assert!(hit.is_hit());
                    assert_relative_eq!(hit.t, t, epsilon = 1.0e-4);
                    assert!(hit.t >= tmin && hit.t < tmax);
                }
                None => assert!(!hit.is_hit()),
            }

            scene.bvh.send_ray_rad::<Farthest>(
                &ray,
                tmin,
                tmax,
                tolerance,
                BackfaceCulling::Off,
                &mut hit,
            );
            match best::<Farthest>(&hits, tmin, tmax) {
                Some((t, _)) => {
                    assert!(hit.is_hit());
                    assert_relative_eq!(hit.t, t, epsilon = 1.0e-4);
                    assert!(hit.t > tmin && hit.t <= tmax);
                }
                None => assert!(!hit.is_hit()),
            }
        }
    }

    // Make sure the test is not vacuous.
    assert!(num_hits > 50);
}

#[test]
fn all_hits_match_brute_force() {
    let scene = scene(3, 400);
    let mut rng = oorandom::Rand32::new(4);

    for _ in 0..200 {
        let ray = random_ray(&mut rng);
        let (tmin, tmax) = (0.0, 50.0);

        let mut expected: Vec<_> = brute_force_hits(&scene, &ray, 0.1)
            .into_iter()
            .filter(|(t, _)| Nearest::accepts(*t, tmin, tmax))
            .collect();
        expected.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut hits = vec![];
        scene.bvh.send_ray_all_rad(
            &ray,
            tmin,
            tmax,
            0.1,
            BackfaceCulling::Off,
            0.0,
            &mut hits,
        );

        assert_eq!(hits.len(), expected.len());
        for pair in hits.windows(2) {
            assert!(pair[0].t <= pair[1].t);
            if pair[0].t == pair[1].t {
                assert!(pair[0].item < pair[1].item);
            }
        }
        for (hit, (t, _)) in hits.iter().zip(expected.iter()) {
            assert_relative_eq!(hit.t, *t, epsilon = 1.0e-4);
        }
    }
}

#[test]
fn dedup_keeps_hits_apart() {
    let scene = scene(11, 800);
    let mut rng = oorandom::Rand32::new(12);
    let tolerance = 0.25;

    for _ in 0..100 {
        let ray = random_ray(&mut rng);
        let mut hits = vec![];
        scene.bvh.send_ray_all_rad(
            &ray,
            0.0,
            50.0,
            0.2,
            BackfaceCulling::On,
            tolerance,
            &mut hits,
        );

        for pair in hits.windows(2) {
            assert!(pair[1].t - pair[0].t >= tolerance);
        }
    }
}

/// Heavily overlapping spheres: rays cross hundreds of boxes, so the traversal stack
/// grows well past its sorted insertion window.
fn dense_grid(n: usize, radius: f32) -> Scene {
    let mut points = vec![];
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                points.push(Point3::new(i as f32, j as f32, k as f32));
            }
        }
    }
    let radii = vec![radius; points.len()];

    let mut bvh = PointBvh::new();
    bvh.init(&points, radius, None, false).unwrap();
    Scene { points, radii, bvh }
}

#[test]
fn dense_grid_all_hits_and_farthest() {
    let scene = dense_grid(24, 3.0);
    let mut rng = oorandom::Rand32::new(21);
    let (tmin, tmax) = (0.0, 100.0);

    for _ in 0..12 {
        let origin = Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 4.0 - 8.0));
        let target = Point3::from(Vector3::from_fn(|_, _| rng.rand_float() * 8.0 + 8.0));
        let ray = Ray::new(origin, (target - origin).normalize());
        let hits = brute_force_hits(&scene, &ray, 0.0);

        let expected = hits
            .iter()
            .filter(|(t, _)| Nearest::accepts(*t, tmin, tmax))
            .count();
        let mut all = vec![];
        scene.bvh.send_ray_all(
            &ray,
            tmin,
            tmax,
            BackfaceCulling::Off,
            0.0,
            &mut all,
        );
        assert!(expected > 500);
        assert_eq!(all.len(), expected);

        let mut hit = HitInfo::new();
        scene
            .bvh
            .send_ray::<Farthest>(&ray, tmin, tmax, BackfaceCulling::Off, &mut hit);
        let (t, _) = best::<Farthest>(&hits, tmin, tmax).unwrap();
        assert_relative_eq!(hit.t, t, epsilon = 1.0e-3);

        scene
            .bvh
            .send_ray::<Nearest>(&ray, tmin, tmax, BackfaceCulling::Off, &mut hit);
        let (t, _) = best::<Nearest>(&hits, tmin, tmax).unwrap();
        assert_relative_eq!(hit.t, t, epsilon = 1.0e-3);
    }
}
