#[macro_use]
extern crate approx;
extern crate nalgebra as na;

mod axis_aligned_rays;
mod box_query;
mod closest_brute_force;
mod empty_set;
mod ray_brute_force;
mod three_points;
