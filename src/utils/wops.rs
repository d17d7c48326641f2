//! Lane-wise SIMD helpers.

use crate::simd::{SimdBool, SimdReal};
use simba::simd::{SimdBool as _, SimdValue};

/// Conditionally swaps each lanes of `a` with those of `b`.
///
/// For each `i in [0..SIMD_WIDTH[`, if `do_swap.extract(i)` is `true` then
/// `a.extract(i)` is swapped with `b.extract(i)`.
#[inline]
pub fn simd_swap(do_swap: SimdBool, a: &mut SimdReal, b: &mut SimdReal) {
    let old_a = *a;
    *a = b.select(do_swap, *a);
    *b = old_a.select(do_swap, *b);
}

/// The bitmask of the lanes set in `lanes` and in `occupied`.
///
/// Lanes holding invalid boxes pass some lane-wise tests: `occupied` filters them out.
#[inline]
pub fn occupied_lanes(lanes: SimdBool, occupied: u8) -> usize {
    (lanes.bitmask() as usize) & (occupied as usize)
}
