// Axis-aligned rays have zero direction components, which must not poison the
// slab test with NaNs.

use na::{Point3, Vector3};
use pointcast3d::partitioning::PointBvh;
use pointcast3d::query::{BackfaceCulling, HitInfo, Nearest, Ray};

fn lattice() -> (Vec<Point3<f32>>, PointBvh) {
    let mut points = vec![];
    for i in 0..6 {
        for j in 0..6 {
            for k in 0..6 {
                points.push(Point3::new(i as f32, j as f32, k as f32) * 2.0);
            }
        }
    }

    let mut bvh = PointBvh::new();
    bvh.init(&points, 0.5, None, false).unwrap();
    (points, bvh)
}

#[test]
fn rays_along_each_axis() {
    let (points, bvh) = lattice();

    for axis in 0..3 {
        let mut dir = Vector3::zeros();
        dir[axis] = 1.0;

        for target in [0usize, 7, 100, 215] {
            let mut origin = points[target];
            origin[axis] = -10.0;

            let mut hit = HitInfo::new();
            bvh.send_ray::<Nearest>(
                &Ray::new(origin, dir),
                0.0,
                1.0e3,
                BackfaceCulling::Off,
                &mut hit,
            );

            let item = hit.item.expect("axis-aligned ray missed the lattice") as usize;
            // The first point along the ray has the smallest coordinate on that axis.
            assert_eq!(points[item][axis], 0.0);
            for other in 0..3 {
                if other != axis {
                    assert_eq!(points[item][other], points[target][other]);
                }
            }
            assert_relative_eq!(hit.t, 9.5, epsilon = 1.0e-4);
        }
    }
}

#[test]
fn axis_aligned_ray_between_points() {
    let (_, bvh) = lattice();
    let mut hit = HitInfo::new();
    let ray = Ray::new(Point3::new(1.0, 1.0, -10.0), Vector3::z());
    bvh.send_ray::<Nearest>(&ray, 0.0, 1.0e3, BackfaceCulling::Off, &mut hit);
    assert!(!hit.is_hit());
}
