//! Spatial partitioning tools.

pub use self::point_bvh::{
    Child, ChildRef, NeighborQueue, PointBvh, PointBvhError, PointBvhNode, Radii,
};

mod point_bvh;
