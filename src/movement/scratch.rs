//! Per-search scratch state, parallel to the point arena.
//!
//! Search bookkeeping (best remaining budget, predecessors) lives here
//! instead of on `BoardPoint` so the domain entities carry no transient
//! state. A scratch is cleared before every movement computation and is
//! never assumed valid across calls.

use crate::board::PointIndex;

/// Parallel arrays of per-point search state.
#[derive(Clone, Debug)]
pub struct MoveScratch {
    /// Best (largest) remaining budget seen at each point; -1 = unreached.
    remaining: Vec<i16>,
    predecessor: Vec<Option<PointIndex>>,
}

impl MoveScratch {
    /// Scratch for an arena of `point_count` cells, all unreached.
    #[must_use]
    pub fn new(point_count: usize) -> Self {
        Self {
            remaining: vec![-1; point_count],
            predecessor: vec![None; point_count],
        }
    }

    /// Reset every cell to unreached.
    pub fn clear(&mut self) {
        self.remaining.fill(-1);
        self.predecessor.fill(None);
    }

    /// Record reaching `idx` with `remaining` budget via `predecessor`.
    ///
    /// Returns false when the point was already reached with an
    /// equal-or-better budget - the "more efficiently already reached"
    /// pruning that makes the final reachable set independent of frontier
    /// traversal order. On improvement the predecessor is replaced, so a
    /// point's stored path always belongs to its best budget.
    pub fn record(
        &mut self,
        idx: PointIndex,
        remaining: u8,
        predecessor: Option<PointIndex>,
    ) -> bool {
        let slot = idx.index();
        if self.remaining[slot] >= remaining as i16 {
            return false;
        }
        self.remaining[slot] = remaining as i16;
        self.predecessor[slot] = predecessor;
        true
    }

    /// Whether the point was reached this search.
    #[must_use]
    pub fn is_reached(&self, idx: PointIndex) -> bool {
        self.remaining[idx.index()] >= 0
    }

    /// The best remaining budget recorded at a point.
    #[must_use]
    pub fn remaining_at(&self, idx: PointIndex) -> Option<u8> {
        let v = self.remaining[idx.index()];
        (v >= 0).then_some(v as u8)
    }

    /// Reconstruct the path from the search origin to `idx` (origin
    /// first, `idx` last) by walking predecessors.
    #[must_use]
    pub fn path_to(&self, idx: PointIndex) -> Vec<PointIndex> {
        let mut path = vec![idx];
        let mut current = idx;
        while let Some(prev) = self.predecessor[current.index()] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}
