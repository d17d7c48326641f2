pub use self::error::PointBvhError;
pub use self::neighbors::NeighborQueue;
pub use self::point_bvh::{Child, ChildRef, PointBvh, PointBvhNode, Radii};

mod box_query;
mod build;
mod closest;
mod error;
mod neighbors;
#[cfg(feature = "parallel")]
mod parallel;
mod point_bvh;
mod ray_traversal;
mod stack;
mod surface;
