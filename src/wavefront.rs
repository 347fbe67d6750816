//! Anti-diagonal scheduling of the matrix fill.
//!
//! Interior cells are grouped by `k = i + j - 1`, giving diagonals
//! `k = 1 ..= rows + cols - 1`. A cell on diagonal `k` reads only cells on
//! diagonals `k - 1` and `k - 2`, so all cells of one diagonal can be
//! computed at once, as long as diagonal `k` is finished before `k + 1`
//! starts.

use log::{debug, trace};
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::matrix::{AlignmentMatrix, Cell};
use crate::scoring::MaxTracker;
use crate::ScoreParams;

/// Number of anti-diagonals covering the interior of a `rows x cols` matrix.
pub fn diagonal_count(rows: usize, cols: usize) -> usize {
    debug_assert!(rows >= 1 && cols >= 1);
    rows + cols - 1
}

/// Number of cells on diagonal `k` (1-based).
///
/// Grows by one per diagonal up to `min(rows, cols)`, stays there until
/// `max(rows, cols)`, then shrinks back to 1.
pub fn diagonal_len(k: usize, rows: usize, cols: usize) -> usize {
    debug_assert!(k >= 1 && k <= diagonal_count(rows, cols));
    k.min(rows).min(cols).min(rows + cols - k)
}

/// First cell of diagonal `k`: the one with the largest row index.
///
/// Diagonals that start in column 1 run down the left edge; the rest start
/// on the bottom row.
pub fn diagonal_start(k: usize, rows: usize) -> (usize, usize) {
    if k <= rows {
        (k, 1)
    } else {
        (rows, k - rows + 1)
    }
}

/// One anti-diagonal, enumerated from its bottom-left cell towards the
/// top-right by stepping `(i - 1, j + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagonal {
    pub k: usize,
    pub start: (usize, usize),
    pub len: usize,
}

impl Diagonal {
    pub fn new(k: usize, rows: usize, cols: usize) -> Self {
        Self {
            k,
            start: diagonal_start(k, rows),
            len: diagonal_len(k, rows, cols),
        }
    }

    #[inline]
    pub fn cell(&self, t: usize) -> (usize, usize) {
        debug_assert!(t < self.len);
        (self.start.0 - t, self.start.1 + t)
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len).map(move |t| self.cell(t))
    }
}

/// Drives the fill one diagonal at a time on a fixed-size worker pool.
pub struct WavefrontScheduler<'a> {
    pool: &'a ThreadPool,
}

impl<'a> WavefrontScheduler<'a> {
    pub fn new(pool: &'a ThreadPool) -> Self {
        Self { pool }
    }

    /// Computes every interior cell of `matrix` and reports each score to
    /// `tracker`.
    ///
    /// Workers share the matrix read-only while a diagonal is in flight and
    /// write into disjoint slots of a scratch row; the scratch row is copied
    /// into the matrix once the parallel region has joined.
    pub fn run(
        &self,
        matrix: &mut AlignmentMatrix,
        row_seq: &[u8],
        col_seq: &[u8],
        params: &ScoreParams,
        tracker: &MaxTracker,
    ) {
        let rows = matrix.rows();
        let cols = matrix.cols();
        debug_assert_eq!(row_seq.len(), rows);
        debug_assert_eq!(col_seq.len(), cols);

        let total = diagonal_count(rows, cols);
        debug!(
            "Wavefront over {}x{} matrix: {} diagonals on {} threads",
            rows,
            cols,
            total,
            self.pool.current_num_threads()
        );

        let mut scratch: Vec<Cell> = Vec::with_capacity(rows.min(cols));

        for k in 1..=total {
            let diagonal = Diagonal::new(k, rows, cols);
            trace!("Diagonal {}: start {:?}, {} cells", k, diagonal.start, diagonal.len);

            scratch.clear();
            scratch.resize(diagonal.len, Cell::default());

            let view: &AlignmentMatrix = matrix;
            self.pool.install(|| {
                scratch.par_iter_mut().enumerate().for_each(|(t, slot)| {
                    let (i, j) = diagonal.cell(t);
                    let cell = view.compute_cell(i, j, row_seq, col_seq, params);
                    tracker.observe(view.index(i, j), cell.score);
                    *slot = cell;
                });
            });

            for (t, cell) in scratch.iter().enumerate() {
                let (i, j) = diagonal.cell(t);
                matrix.set(i, j, *cell);
            }
        }
    }
}
