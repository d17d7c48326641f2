//! Hit recorders: the policies deciding how ray hits are stored.

use crate::math::{Real, Vector};
use crate::query::{HitInfo, HitInfoAndNormal};
use core::cmp::Ordering;

/// Receives the hits found by a ray traversal.
///
/// A single traversal routine serves every query shape by delegating to a recorder
/// at three points: when nothing can be hit, when a candidate hit was accepted, and
/// when the normal of the latest accepted hit is known.
pub trait HitRecorder {
    /// Does this recorder store the geometric normal of its hits?
    ///
    /// If `false`, the traversal skips the calls to [`HitRecorder::set_normal`].
    const WANTS_NORMAL: bool;

    /// Does this recorder tighten the ray interval after each hit?
    ///
    /// Single-hit recorders only keep the best hit so every hit shrinks the interval
    /// to search. All-hit recorders never tighten it.
    const TIGHTENS: bool;

    /// The implicit radius given to points that have none.
    ///
    /// Points without radius are not intersectable if this is `None`.
    fn tolerance(&self) -> Option<Real>;

    /// Called once before the traversal starts, and when the query is degenerate.
    fn no_hit(&mut self);

    /// Records an accepted hit of the item `item` at the ray parameter `t`.
    ///
    /// If this recorder tightens the search, `limit` is set to `t`.
    fn insert_hit(&mut self, uvw: Vector<Real>, t: Real, item: u32, limit: &mut Real);

    /// Sets the normal of the last hit inserted.
    #[inline]
    fn set_normal(&mut self, _normal: Vector<Real>) {}
}

/// Keeps only the best hit.
#[derive(Debug)]
pub struct SingleHit<'a> {
    info: &'a mut HitInfo,
    tolerance: Option<Real>,
}

impl<'a> SingleHit<'a> {
    /// Records into `info` without implicit radius.
    pub fn new(info: &'a mut HitInfo) -> Self {
        Self {
            info,
            tolerance: None,
        }
    }

    /// Records into `info`, giving radius-less points the radius `tolerance`.
    pub fn with_tolerance(info: &'a mut HitInfo, tolerance: Real) -> Self {
        Self {
            info,
            tolerance: Some(tolerance),
        }
    }
}

impl HitRecorder for SingleHit<'_> {
    const WANTS_NORMAL: bool = false;
    const TIGHTENS: bool = true;

    #[inline]
    fn tolerance(&self) -> Option<Real> {
        self.tolerance
    }

    #[inline]
    fn no_hit(&mut self) {
        self.info.no_hit();
    }

    #[inline]
    fn insert_hit(&mut self, uvw: Vector<Real>, t: Real, item: u32, limit: &mut Real) {
        self.info.item = Some(item);
        self.info.uvw = uvw;
        self.info.t = t;
        self.info.nested.clear();
        *limit = t;
    }
}

/// Keeps only the best hit, and its normal.
#[derive(Debug)]
pub struct SingleHitAndNormal<'a> {
    info: &'a mut HitInfoAndNormal,
    tolerance: Option<Real>,
}

impl<'a> SingleHitAndNormal<'a> {
    /// Records into `info` without implicit radius.
    pub fn new(info: &'a mut HitInfoAndNormal) -> Self {
        Self {
            info,
            tolerance: None,
        }
    }

    /// Records into `info`, giving radius-less points the radius `tolerance`.
    pub fn with_tolerance(info: &'a mut HitInfoAndNormal, tolerance: Real) -> Self {
        Self {
            info,
            tolerance: Some(tolerance),
        }
    }
}

impl HitRecorder for SingleHitAndNormal<'_> {
    const WANTS_NORMAL: bool = true;
    const TIGHTENS: bool = true;

    #[inline]
    fn tolerance(&self) -> Option<Real> {
        self.tolerance
    }

    #[inline]
    fn no_hit(&mut self) {
        self.info.hit.no_hit();
        self.info.normal = Vector::zeros();
    }

    #[inline]
    fn insert_hit(&mut self, uvw: Vector<Real>, t: Real, item: u32, limit: &mut Real) {
        let hit = &mut self.info.hit;
        hit.item = Some(item);
        hit.uvw = uvw;
        hit.t = t;
        hit.nested.clear();
        *limit = t;
    }

    #[inline]
    fn set_normal(&mut self, normal: Vector<Real>) {
        self.info.normal = normal;
    }
}

/// Appends every hit to a list.
#[derive(Debug)]
pub struct AllHits<'a> {
    hits: &'a mut Vec<HitInfo>,
    tolerance: Option<Real>,
}

impl<'a> AllHits<'a> {
    /// Appends to `hits` without implicit radius.
    pub fn new(hits: &'a mut Vec<HitInfo>) -> Self {
        Self {
            hits,
            tolerance: None,
        }
    }

    /// Appends to `hits`, giving radius-less points the radius `tolerance`.
    pub fn with_tolerance(hits: &'a mut Vec<HitInfo>, tolerance: Real) -> Self {
        Self {
            hits,
            tolerance: Some(tolerance),
        }
    }
}

impl HitRecorder for AllHits<'_> {
    const WANTS_NORMAL: bool = false;
    const TIGHTENS: bool = false;

    #[inline]
    fn tolerance(&self) -> Option<Real> {
        self.tolerance
    }

    #[inline]
    fn no_hit(&mut self) {}

    #[inline]
    fn insert_hit(&mut self, uvw: Vector<Real>, t: Real, item: u32, _limit: &mut Real) {
        self.hits.push(HitInfo {
            item: Some(item),
            uvw,
            t,
            nested: Default::default(),
        });
    }
}

/// Appends every hit, and its normal, to a list.
#[derive(Debug)]
pub struct AllHitsAndNormal<'a> {
    hits: &'a mut Vec<HitInfoAndNormal>,
    tolerance: Option<Real>,
}

impl<'a> AllHitsAndNormal<'a> {
    /// Appends to `hits` without implicit radius.
    pub fn new(hits: &'a mut Vec<HitInfoAndNormal>) -> Self {
        Self {
            hits,
            tolerance: None,
        }
    }

    /// Appends to `hits`, giving radius-less points the radius `tolerance`.
    pub fn with_tolerance(hits: &'a mut Vec<HitInfoAndNormal>, tolerance: Real) -> Self {
        Self {
            hits,
            tolerance: Some(tolerance),
        }
    }
}

impl HitRecorder for AllHitsAndNormal<'_> {
    const WANTS_NORMAL: bool = true;
    const TIGHTENS: bool = false;

    #[inline]
    fn tolerance(&self) -> Option<Real> {
        self.tolerance
    }

    #[inline]
    fn no_hit(&mut self) {}

    #[inline]
    fn insert_hit(&mut self, uvw: Vector<Real>, t: Real, item: u32, _limit: &mut Real) {
        self.hits.push(HitInfoAndNormal {
            hit: HitInfo {
                item: Some(item),
                uvw,
                t,
                nested: Default::default(),
            },
            normal: Vector::zeros(),
        });
    }

    #[inline]
    fn set_normal(&mut self, normal: Vector<Real>) {
        if let Some(last) = self.hits.last_mut() {
            last.normal = normal;
        }
    }
}

/// Read access to the [`HitInfo`] part of a recorded hit.
pub trait AsHitInfo {
    /// The hit info.
    fn hit_info(&self) -> &HitInfo;
}

impl AsHitInfo for HitInfo {
    #[inline]
    fn hit_info(&self) -> &HitInfo {
        self
    }
}

impl AsHitInfo for HitInfoAndNormal {
    #[inline]
    fn hit_info(&self) -> &HitInfo {
        &self.hit
    }
}

fn hit_order(a: &HitInfo, b: &HitInfo) -> Ordering {
    a.t.partial_cmp(&b.t)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.item.cmp(&b.item))
}

/// Sorts hits by increasing `t` (ties by increasing item index), then removes every hit
/// closer than `duplicate_tolerance` (along the ray) to the previous hit kept.
///
/// Only the ray parameter is compared: two distinct items hit at almost the same
/// distance are merged.
pub fn sort_and_dedup_hits<H: AsHitInfo>(hits: &mut Vec<H>, duplicate_tolerance: Real) {
    hits.sort_by(|a, b| hit_order(a.hit_info(), b.hit_info()));

    let mut last_kept: Option<Real> = None;
    hits.retain(|hit| {
        let t = hit.hit_info().t;
        match last_kept {
            Some(last) if t - last < duplicate_tolerance => false,
            _ => {
                last_kept = Some(t);
                true
            }
        }
    });
}
