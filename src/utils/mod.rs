//! Various unsorted geometrical and logical operators.

pub(crate) use self::wops::{occupied_lanes, simd_swap};

mod wops;
