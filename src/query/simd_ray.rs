use crate::math::{Point, Real, SimdReal, Vector};
use simba::simd::SimdValue;

/// A ray splatted on every SIMD lane, with a precomputed inverse direction.
#[derive(Debug, Copy, Clone)]
pub struct SimdRay {
    /// The origin of the ray, identical on every lane.
    pub origin: Point<SimdReal>,
    /// The component-wise inverse of the ray direction, identical on every lane.
    pub inv_dir: Vector<SimdReal>,
}

impl SimdRay {
    /// Splats a ray on every lane.
    ///
    /// A zero direction component is inverted into `Real::MAX` instead of an infinity:
    /// the slab test then yields huge but finite parameters for axis-aligned rays, where
    /// an infinity multiplied by a zero slab offset would propagate NaNs.
    pub fn new(origin: &Point<Real>, dir: &Vector<Real>) -> Self {
        let inv_dir = dir.map(|e| if e == 0.0 { Real::MAX } else { 1.0 / e });

        Self {
            origin: Point::splat(*origin),
            inv_dir: Vector::splat(inv_dir),
        }
    }
}
