//! Nearest/farthest traversal policies and backface culling.

use crate::math::{Real, Vector};

/// Direction of optimization of a query: seek the smallest or the largest value.
///
/// Every bound comparison performed by the traversals goes through
/// [`TraversalOrder::is_better`], so the nearest and farthest variants share the
/// exact same code.
///
/// For ray queries, the "limit" is the end of the admissible interval that tightens
/// as hits are found: `tmax` for [`Nearest`], `tmin` for [`Farthest`]. The admissible
/// interval is `[tmin, tmax[` for [`Nearest`] and `]tmin, tmax]` for [`Farthest`].
pub trait TraversalOrder: Copy + Send + Sync + 'static {
    /// `true` if this order seeks the largest values.
    const FARTHEST: bool;

    /// Is `a` strictly better than `b`?
    fn is_better(a: Real, b: Real) -> bool;

    /// Selects the bound of a box given the parameters at which a ray enters and exits it.
    fn ray_bound(entry: Real, exit: Real) -> Real;

    /// Selects the limit of a ray interval, i.e., the end that tightens as hits are found.
    fn ray_limit(tmin: Real, tmax: Real) -> Real;

    /// Writes back a tightened limit into the ray interval.
    fn set_ray_limit(tmin: &mut Real, tmax: &mut Real, limit: Real);

    /// Is `t` admissible in the given ray interval?
    #[inline]
    fn accepts(t: Real, tmin: Real, tmax: Real) -> bool {
        if Self::FARTHEST {
            t <= tmax && Self::is_better(t, tmin)
        } else {
            t >= tmin && Self::is_better(t, tmax)
        }
    }
}

/// Seek the smallest ray parameter or distance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Nearest;

/// Seek the largest ray parameter or distance.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Farthest;

impl TraversalOrder for Nearest {
    const FARTHEST: bool = false;

    #[inline(always)]
    fn is_better(a: Real, b: Real) -> bool {
        a < b
    }

    #[inline(always)]
    fn ray_bound(entry: Real, _exit: Real) -> Real {
        entry
    }

    #[inline(always)]
    fn ray_limit(_tmin: Real, tmax: Real) -> Real {
        tmax
    }

    #[inline(always)]
    fn set_ray_limit(_tmin: &mut Real, tmax: &mut Real, limit: Real) {
        *tmax = limit;
    }
}

impl TraversalOrder for Farthest {
    const FARTHEST: bool = true;

    #[inline(always)]
    fn is_better(a: Real, b: Real) -> bool {
        a > b
    }

    #[inline(always)]
    fn ray_bound(_entry: Real, exit: Real) -> Real {
        exit
    }

    #[inline(always)]
    fn ray_limit(tmin: Real, _tmax: Real) -> Real {
        tmin
    }

    #[inline(always)]
    fn set_ray_limit(tmin: &mut Real, _tmax: &mut Real, limit: Real) {
        *tmin = limit;
    }
}

/// Which hits a ray query rejects based on the orientation of the surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BackfaceCulling {
    /// Every hit is accepted.
    #[default]
    Off,
    /// Hits where the outward normal points along the ray (the ray exits the surface)
    /// are rejected.
    On,
    /// Reversed winding: hits where the ray enters the surface are rejected.
    Reversed,
}

impl BackfaceCulling {
    /// Does this policy reject a hit with the outward `normal` for a ray going along `dir`?
    #[inline]
    pub fn rejects(self, normal: &Vector<Real>, dir: &Vector<Real>) -> bool {
        let front_facing = normal.dot(dir) <= 0.0;

        match self {
            BackfaceCulling::Off => false,
            BackfaceCulling::On => !front_facing,
            BackfaceCulling::Reversed => front_facing,
        }
    }
}
