use crate::attribute::PointOffset;
use crate::math::Real;

/// Errors raised while initializing a [`PointBvh`](crate::partitioning::PointBvh).
///
/// The hierarchy is left empty whenever one of these is returned.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum PointBvhError {
    /// The point range references a point that does not exist.
    #[error("the point offset {offset} is out of bounds of the {num_points} positions given")]
    OffsetOutOfBounds {
        /// The faulty offset.
        offset: PointOffset,
        /// The number of positions given.
        num_points: usize,
    },
    /// The per-point radius attribute has fewer values than there are positions.
    #[error("the radius attribute has {found} values but {expected} positions were given")]
    RadiusAttributeTooShort {
        /// The number of positions.
        expected: usize,
        /// The number of radius values.
        found: usize,
    },
    /// A radius, or radius scale, is negative or not finite.
    #[error("invalid radius {0}: radii must be finite and non-negative")]
    InvalidRadius(Real),
    /// The radius computed for a point is negative or not finite.
    #[error("invalid radius {radius} computed for the point at offset {offset}")]
    InvalidPointRadius {
        /// The offset of the point.
        offset: PointOffset,
        /// Its computed radius.
        radius: Real,
    },
    /// Too many points to be indexed.
    #[error("{0} points exceed the capacity of a point hierarchy")]
    TooManyPoints(usize),
}
