use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Best local score found by a matrix fill, and the cell that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentScore {
    pub score: i32,
    pub position: Position,
}

/// A cell of the score matrix. Row 0 and column 0 are the zero border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub i: usize,
    pub j: usize,
}

impl Position {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub gaps: u32,
    pub execution_time_ms: f32,
}

/// Running maximum over every cell written by the wavefront workers.
///
/// Score and flat index are packed into one `u64` (score in the high half,
/// complemented index in the low half) so a single `fetch_max` both raises the
/// score and, on equal scores, keeps the lowest row-major index. The winner is
/// therefore the same for every thread count and every scheduling order.
///
/// Scores must be non-negative and indices must fit in `u32`; the aligner
/// enforces both before the fill starts.
#[derive(Debug)]
pub struct MaxTracker {
    best: AtomicU64,
}

impl Default for MaxTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MaxTracker {
    /// Starts at the border cell (flat index 0) with score 0.
    pub fn new() -> Self {
        Self {
            best: AtomicU64::new(pack(0, 0)),
        }
    }

    pub fn observe(&self, index: usize, score: i32) {
        debug_assert!(score >= 0, "local scores are floored at zero");
        debug_assert!(index <= u32::MAX as usize);

        // A zero score can never beat the border cell.
        if score <= 0 {
            return;
        }

        let packed = pack(index, score);
        // Relaxed is enough: the end of each diagonal's parallel region
        // orders these writes before any read of the final value.
        if packed > self.best.load(Ordering::Relaxed) {
            self.best.fetch_max(packed, Ordering::Relaxed);
        }
    }

    /// Returns `(flat_index, score)` of the best cell observed so far.
    pub fn best(&self) -> (usize, i32) {
        unpack(self.best.load(Ordering::Relaxed))
    }

    pub fn into_inner(self) -> (usize, i32) {
        unpack(self.best.into_inner())
    }
}

fn pack(index: usize, score: i32) -> u64 {
    ((score as u32 as u64) << 32) | u64::from(u32::MAX - index as u32)
}

fn unpack(packed: u64) -> (usize, i32) {
    let score = (packed >> 32) as u32 as i32;
    let index = (u32::MAX - (packed & u64::from(u32::MAX)) as u32) as usize;
    (index, score)
}
