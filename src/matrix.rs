//! Score matrix `H` and predecessor matrix `P` for one local alignment.
//!
//! Both buffers are stored row-major with an explicit zero border, so a
//! sequence pair of lengths `(rows, cols)` needs `(rows + 1) * (cols + 1)`
//! cells. Row `i` corresponds to `row_seq[i - 1]` and column `j` to
//! `col_seq[j - 1]`.

use crate::scoring::{MaxTracker, Position};
use crate::traceback::AlignmentPath;
use crate::{AlignerError, ScoreParams, MAX_MATRIX_CELLS};

/// Which neighbour produced a cell's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Direction {
    /// Alignment starts here (score 0).
    #[default]
    None = 0,
    Up = 1,
    Left = 2,
    Diagonal = 3,
}

impl Direction {
    pub fn arrow(self) -> char {
        match self {
            Direction::None => '-',
            Direction::Up => '↑',
            Direction::Left => '←',
            Direction::Diagonal => '↖',
        }
    }
}

/// Result of evaluating the recurrence for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub score: i32,
    pub direction: Direction,
}

#[derive(Debug)]
pub struct AlignmentMatrix {
    rows: usize,
    cols: usize,
    stride: usize,
    scores: Vec<i32>,
    directions: Vec<Direction>,
    on_path: Vec<bool>,
}

impl AlignmentMatrix {
    /// Allocates a zeroed matrix for sequences of `rows` and `cols` symbols.
    pub fn new(rows: usize, cols: usize) -> Result<Self, AlignerError> {
        if rows == 0 || cols == 0 {
            return Err(AlignerError::InvalidInput(format!(
                "matrix dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }

        let stride = cols + 1;
        let cells = (rows + 1)
            .checked_mul(stride)
            .filter(|&cells| cells <= MAX_MATRIX_CELLS)
            .ok_or(AlignerError::SequenceTooLarge(rows.max(cols)))?;

        let scores = zeroed_buffer(cells, 0i32)?;
        let directions = zeroed_buffer(cells, Direction::None)?;

        Ok(Self {
            rows,
            cols,
            stride,
            scores,
            directions,
            on_path: Vec::new(),
        })
    }

    /// Length of the row sequence.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Length of the column sequence.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance in flat indices between vertically adjacent cells.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The only place a `(i, j)` pair is turned into a buffer offset.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i <= self.rows && j <= self.cols, "({}, {}) out of bounds", i, j);
        i * self.stride + j
    }

    #[inline]
    pub fn position(&self, index: usize) -> Position {
        Position::new(index / self.stride, index % self.stride)
    }

    #[inline]
    pub fn score(&self, i: usize, j: usize) -> i32 {
        self.scores[self.index(i, j)]
    }

    #[inline]
    pub fn direction(&self, i: usize, j: usize) -> Direction {
        self.directions[self.index(i, j)]
    }

    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Evaluates the Smith-Waterman recurrence for interior cell `(i, j)`.
    ///
    /// Only reads the three neighbours above, left and up-left, which all lie
    /// on earlier anti-diagonals. Candidates are tried diagonal, up, left,
    /// each replacing the running best only when strictly greater, so ties
    /// prefer `Diagonal` over `Up` over `Left`, and a best of zero or less
    /// is stored as `(0, None)`.
    #[inline]
    pub fn compute_cell(
        &self,
        i: usize,
        j: usize,
        row_seq: &[u8],
        col_seq: &[u8],
        params: &ScoreParams,
    ) -> Cell {
        debug_assert!(i >= 1 && j >= 1, "border cells are never computed");

        let index = self.index(i, j);
        let up = self.scores[index - self.stride] + params.gap;
        let left = self.scores[index - 1] + params.gap;
        let diag = self.scores[index - self.stride - 1]
            + params.substitution(col_seq[j - 1], row_seq[i - 1]);

        let mut cell = Cell::default();
        if diag > cell.score {
            cell = Cell { score: diag, direction: Direction::Diagonal };
        }
        if up > cell.score {
            cell = Cell { score: up, direction: Direction::Up };
        }
        if left > cell.score {
            cell = Cell { score: left, direction: Direction::Left };
        }
        cell
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, cell: Cell) {
        let index = self.index(i, j);
        self.scores[index] = cell.score;
        self.directions[index] = cell.direction;
    }

    /// Fills every interior cell row by row on the calling thread.
    ///
    /// Produces the same matrices as the wavefront schedule and serves as its
    /// reference.
    pub fn fill_sequential(
        &mut self,
        row_seq: &[u8],
        col_seq: &[u8],
        params: &ScoreParams,
        tracker: &MaxTracker,
    ) {
        debug_assert_eq!(row_seq.len(), self.rows);
        debug_assert_eq!(col_seq.len(), self.cols);

        for i in 1..=self.rows {
            for j in 1..=self.cols {
                let cell = self.compute_cell(i, j, row_seq, col_seq, params);
                tracker.observe(self.index(i, j), cell.score);
                self.set(i, j, cell);
            }
        }
    }

    /// Flags every cell of `path` so renderers can highlight it.
    pub fn mark_path(&mut self, path: &AlignmentPath) {
        if self.on_path.is_empty() {
            self.on_path = vec![false; self.scores.len()];
        }
        for pos in &path.cells {
            let index = self.index(pos.i, pos.j);
            self.on_path[index] = true;
        }
    }

    pub fn is_on_path(&self, i: usize, j: usize) -> bool {
        !self.on_path.is_empty() && self.on_path[self.index(i, j)]
    }
}

fn zeroed_buffer<T: Clone>(len: usize, value: T) -> Result<Vec<T>, AlignerError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        AlignerError::AllocationFailure(format!(
            "{} cells of {} bytes: {}",
            len,
            std::mem::size_of::<T>(),
            e
        ))
    })?;
    buffer.resize(len, value);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &[u8] = b"GACTTAC";
    const COLS: &[u8] = b"CGTGAATTCAT";

    fn filled(row_seq: &[u8], col_seq: &[u8], params: &ScoreParams) -> (AlignmentMatrix, MaxTracker) {
        let mut matrix = AlignmentMatrix::new(row_seq.len(), col_seq.len()).unwrap();
        let tracker = MaxTracker::new();
        matrix.fill_sequential(row_seq, col_seq, params, &tracker);
        (matrix, tracker)
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(AlignmentMatrix::new(0, 4), Err(AlignerError::InvalidInput(_))));
        assert!(matches!(AlignmentMatrix::new(4, 0), Err(AlignerError::InvalidInput(_))));
    }

    #[test]
    fn rejects_matrices_past_index_width() {
        let side = 1usize << 17;
        assert!(matches!(
            AlignmentMatrix::new(side, side),
            Err(AlignerError::SequenceTooLarge(_))
        ));
    }

    #[test]
    fn index_and_position_agree() {
        let matrix = AlignmentMatrix::new(7, 11).unwrap();
        assert_eq!(matrix.stride(), 12);
        assert_eq!(matrix.index(0, 0), 0);
        assert_eq!(matrix.index(1, 0), 12);
        assert_eq!(matrix.index(6, 10), 82);
        assert_eq!(matrix.position(82), Position::new(6, 10));
        assert_eq!(matrix.position(matrix.index(7, 11)), Position::new(7, 11));
    }

    #[test]
    fn border_stays_zero() {
        let (matrix, _) = filled(ROWS, COLS, &ScoreParams::default());
        for j in 0..=matrix.cols() {
            assert_eq!(matrix.score(0, j), 0);
            assert_eq!(matrix.direction(0, j), Direction::None);
        }
        for i in 0..=matrix.rows() {
            assert_eq!(matrix.score(i, 0), 0);
            assert_eq!(matrix.direction(i, 0), Direction::None);
        }
    }

    #[test]
    fn reference_pair_rows() {
        let (matrix, tracker) = filled(ROWS, COLS, &ScoreParams::default());
        let row = |i: usize| (0..=matrix.cols()).map(|j| matrix.score(i, j)).collect::<Vec<_>>();
        assert_eq!(row(1), vec![0, 0, 5, 1, 5, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(row(5), vec![0, 0, 0, 7, 3, 0, 0, 8, 17, 13, 9, 7]);
        assert_eq!(row(7), vec![0, 5, 1, 0, 0, 4, 5, 2, 9, 18, 14, 15]);
        assert_eq!(tracker.best(), (matrix.index(6, 10), 18));
    }

    #[test]
    fn ties_prefer_diagonal_then_up_then_left() {
        // Equal diagonal and up candidates: diag = 0 + 5, up = 9 - 4.
        let params = ScoreParams::new(5, -3, -4);
        let mut matrix = AlignmentMatrix::new(2, 1).unwrap();
        matrix.set(1, 1, Cell { score: 9, direction: Direction::Diagonal });
        let cell = matrix.compute_cell(2, 1, b"AA", b"A", &params);
        assert_eq!(cell, Cell { score: 5, direction: Direction::Diagonal });

        // Equal up and left candidates with a losing diagonal.
        let mut matrix = AlignmentMatrix::new(2, 2).unwrap();
        matrix.set(1, 2, Cell { score: 10, direction: Direction::Diagonal });
        matrix.set(2, 1, Cell { score: 10, direction: Direction::Diagonal });
        let cell = matrix.compute_cell(2, 2, b"AC", b"AG", &params);
        assert_eq!(cell, Cell { score: 6, direction: Direction::Up });

        // Equal diagonal and left candidates: diag = 0 + 5, left = 9 - 4.
        let mut matrix = AlignmentMatrix::new(1, 2).unwrap();
        matrix.set(1, 1, Cell { score: 9, direction: Direction::Diagonal });
        let cell = matrix.compute_cell(1, 2, b"A", b"CA", &params);
        assert_eq!(cell, Cell { score: 5, direction: Direction::Diagonal });
    }

    #[test]
    fn unsatisfiable_buffer_reports_allocation_failure() {
        assert!(matches!(
            zeroed_buffer::<i32>(usize::MAX / 2, 0),
            Err(AlignerError::AllocationFailure(_))
        ));
    }

    #[test]
    fn non_positive_best_is_none() {
        let params = ScoreParams::default();
        let matrix = AlignmentMatrix::new(1, 1).unwrap();
        assert_eq!(matrix.compute_cell(1, 1, b"A", b"C", &params), Cell::default());
    }

    #[test]
    fn scoring_is_configurable() {
        let params = ScoreParams::new(2, -1, -1);
        let (matrix, tracker) = filled(b"ACGT", b"ACGT", &params);
        assert_eq!(matrix.score(4, 4), 8);
        assert_eq!(tracker.best().1, 8);
    }

    #[test]
    fn mark_path_flags_only_given_cells() {
        let mut matrix = AlignmentMatrix::new(2, 2).unwrap();
        assert!(!matrix.is_on_path(1, 1));
        let path = AlignmentPath {
            cells: vec![Position::new(0, 0), Position::new(1, 1)],
            operations: Vec::new(),
        };
        matrix.mark_path(&path);
        assert!(matrix.is_on_path(0, 0));
        assert!(matrix.is_on_path(1, 1));
        assert!(!matrix.is_on_path(2, 2));
    }
}
