use super::ChildRef;
use crate::math::{Real, SIMD_WIDTH};
use crate::query::TraversalOrder;
use arrayvec::ArrayVec;
use core::cmp::Ordering;
use core::marker::PhantomData;
use smallvec::SmallVec;

/// How far below the top of the stack a sorted insertion looks for its slot.
const MAX_INSERTION_SCAN: usize = 64;

const fn lanes_table() -> [[u8; SIMD_WIDTH]; 1 << SIMD_WIDTH] {
    let mut table = [[0; SIMD_WIDTH]; 1 << SIMD_WIDTH];
    let mut mask = 0;

    while mask < table.len() {
        let mut len = 0;
        let mut lane = 0;

        while lane < SIMD_WIDTH {
            if mask & (1 << lane) != 0 {
                table[mask][len] = lane as u8;
                len += 1;
            }
            lane += 1;
        }

        mask += 1;
    }

    table
}

/// For each 4-bit lane mask, the indices of its set lanes in increasing order.
///
/// The number of valid entries of `HIT_LANES[mask]` is `mask.count_ones()`.
pub(super) const HIT_LANES: [[u8; SIMD_WIDTH]; 1 << SIMD_WIDTH] = lanes_table();

#[derive(Copy, Clone, Debug)]
pub(super) struct StackEntry {
    pub child: ChildRef,
    pub bound: Real,
}

/// A traversal stack kept sorted by bound: the best entry is on top.
pub(super) struct TraversalStack<O> {
    entries: SmallVec<[StackEntry; 64]>,
    _order: PhantomData<O>,
}

impl<O: TraversalOrder> TraversalStack<O> {
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            _order: PhantomData,
        }
    }

    /// Pops entries until one satisfies `keep`.
    pub fn pop(&mut self, keep: impl Fn(Real) -> bool) -> Option<StackEntry> {
        while let Some(entry) = self.entries.pop() {
            if keep(entry.bound) {
                return Some(entry);
            }
        }

        None
    }

    /// Discards the stale entries on top of the stack, then inserts `entry` in sorted
    /// position.
    ///
    /// The insertion slot is searched among the top `MAX_INSERTION_SCAN` entries only,
    /// so the stack is only approximately sorted below that depth.
    pub fn push(&mut self, entry: StackEntry, keep: impl Fn(Real) -> bool) {
        while let Some(top) = self.entries.last() {
            if keep(top.bound) {
                break;
            }
            let _ = self.entries.pop();
        }

        let stop = self.entries.len().saturating_sub(MAX_INSERTION_SCAN);
        let mut i = self.entries.len();

        while i > stop && O::is_better(self.entries[i - 1].bound, entry.bound) {
            i -= 1;
        }

        self.entries.insert(i, entry);
    }

    /// Schedules the children of a node selected by `mask`.
    ///
    /// Returns the child to visit next, if any. The other selected children are pushed
    /// on the stack.
    pub fn fan_out(
        &mut self,
        children: &[ChildRef; SIMD_WIDTH],
        bounds: &[Real; SIMD_WIDTH],
        mask: usize,
        keep: impl Fn(Real) -> bool,
    ) -> Option<ChildRef> {
        let lanes = &HIT_LANES[mask];

        match mask.count_ones() {
            0 => None,
            1 => Some(children[lanes[0] as usize]),
            2 => {
                let (mut a, mut b) = (lanes[0] as usize, lanes[1] as usize);

                if O::is_better(bounds[b], bounds[a]) {
                    core::mem::swap(&mut a, &mut b);
                }

                self.push(
                    StackEntry {
                        child: children[b],
                        bound: bounds[b],
                    },
                    keep,
                );
                Some(children[a])
            }
            n => {
                let mut sorted: ArrayVec<StackEntry, SIMD_WIDTH> = lanes[..n as usize]
                    .iter()
                    .map(|lane| StackEntry {
                        child: children[*lane as usize],
                        bound: bounds[*lane as usize],
                    })
                    .collect();
                sorted.sort_unstable_by(|a, b| compare::<O>(a.bound, b.bound));

                // Push the worst first so each insertion lands on top.
                for entry in sorted[1..].iter().rev() {
                    self.push(*entry, &keep);
                }

                Some(sorted[0].child)
            }
        }
    }
}

/// Orders the best values first.
fn compare<O: TraversalOrder>(a: Real, b: Real) -> Ordering {
    if O::is_better(a, b) {
        Ordering::Less
    } else if O::is_better(b, a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
