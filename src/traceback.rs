use crate::matrix::{AlignmentMatrix, Direction};
use crate::scoring::{AlignmentScore, AlignmentStats, Position};
use crate::{AlignerError, ScoreParams};

/// Edit operation for one step of a local alignment.
///
/// `Insertion` consumes a column symbol only (a `Left` move), `Deletion` a
/// row symbol only (an `Up` move).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    Insertion,
    Deletion,
}

impl TracebackOperation {
    pub fn score(self, params: &ScoreParams) -> i32 {
        match self {
            TracebackOperation::Match => params.match_score,
            TracebackOperation::Mismatch => params.mismatch,
            TracebackOperation::Insertion | TracebackOperation::Deletion => params.gap,
        }
    }

    /// `(di, dj)` travelled when moving forward along the path.
    pub fn step(self) -> (usize, usize) {
        match self {
            TracebackOperation::Match | TracebackOperation::Mismatch => (1, 1),
            TracebackOperation::Insertion => (0, 1),
            TracebackOperation::Deletion => (1, 0),
        }
    }
}

/// Cells visited by the backtrace, ordered from the alignment origin (the
/// zero-score cell) to the best-scoring cell.
///
/// `operations[k]` is the move from `cells[k]` to `cells[k + 1]`, so there
/// is always exactly one fewer operation than cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentPath {
    pub cells: Vec<Position>,
    pub operations: Vec<TracebackOperation>,
}

impl AlignmentPath {
    pub fn start(&self) -> Position {
        self.cells[0]
    }

    pub fn end(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sums the operation scores along the path. For a path produced by
    /// [`Traceback::trace`] this equals the score of its end cell.
    pub fn replay_score(&self, params: &ScoreParams) -> i32 {
        self.operations.iter().map(|op| op.score(params)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub score: i32,
    /// Row sequence with `-` where a column symbol was inserted.
    pub aligned_rows: Vec<u8>,
    /// Column sequence with `-` where a row symbol was deleted.
    pub aligned_cols: Vec<u8>,
    pub operations: Vec<TracebackOperation>,
    pub path: AlignmentPath,
    pub start_position: Position,
    pub end_position: Position,
    pub statistics: AlignmentStats,
}

/// Follows predecessor links of a filled matrix back to an alignment origin.
pub struct Traceback<'a> {
    matrix: &'a AlignmentMatrix,
    row_seq: &'a [u8],
    col_seq: &'a [u8],
}

impl<'a> Traceback<'a> {
    pub fn new(matrix: &'a AlignmentMatrix, row_seq: &'a [u8], col_seq: &'a [u8]) -> Self {
        Self {
            matrix,
            row_seq,
            col_seq,
        }
    }

    /// Walks from `end` until a `Direction::None` cell, which is included as
    /// the first cell of the returned path.
    pub fn trace(&self, end: Position) -> Result<AlignmentPath, AlignerError> {
        if end.i > self.matrix.rows() || end.j > self.matrix.cols() {
            return Err(AlignerError::TracebackError(format!(
                "start cell {} lies outside the matrix",
                end
            )));
        }

        let mut cells = vec![end];
        let mut operations = Vec::new();
        let mut current = end;

        loop {
            let direction = self.matrix.direction(current.i, current.j);
            let (op, next) = match direction {
                Direction::None => break,
                _ if current.i == 0 || current.j == 0 => {
                    return Err(AlignerError::TracebackError(format!(
                        "border cell {} has predecessor {:?}",
                        current, direction
                    )));
                }
                Direction::Diagonal => {
                    let op = if self.col_seq[current.j - 1] == self.row_seq[current.i - 1] {
                        TracebackOperation::Match
                    } else {
                        TracebackOperation::Mismatch
                    };
                    (op, Position::new(current.i - 1, current.j - 1))
                }
                Direction::Up => (TracebackOperation::Deletion, Position::new(current.i - 1, current.j)),
                Direction::Left => (TracebackOperation::Insertion, Position::new(current.i, current.j - 1)),
            };

            operations.push(op);
            cells.push(next);
            current = next;
        }

        // Built backwards
        cells.reverse();
        operations.reverse();

        Ok(AlignmentPath { cells, operations })
    }

    pub fn reconstruct_alignment(
        &self,
        best: AlignmentScore,
        params: &ScoreParams,
    ) -> Result<AlignmentResult, AlignerError> {
        let path = self.trace(best.position)?;

        let replayed = path.replay_score(params);
        if replayed != best.score {
            return Err(AlignerError::TracebackError(format!(
                "path replays to {} but best cell holds {}",
                replayed, best.score
            )));
        }

        let mut aligned_rows = Vec::with_capacity(path.operations.len());
        let mut aligned_cols = Vec::with_capacity(path.operations.len());
        let mut statistics = AlignmentStats::default();

        for (from, op) in path.cells.iter().zip(&path.operations) {
            match op {
                TracebackOperation::Match | TracebackOperation::Mismatch => {
                    aligned_rows.push(self.row_seq[from.i]);
                    aligned_cols.push(self.col_seq[from.j]);
                    if *op == TracebackOperation::Match {
                        statistics.matches += 1;
                    } else {
                        statistics.mismatches += 1;
                    }
                }
                TracebackOperation::Deletion => {
                    aligned_rows.push(self.row_seq[from.i]);
                    aligned_cols.push(b'-');
                    statistics.gaps += 1;
                }
                TracebackOperation::Insertion => {
                    aligned_rows.push(b'-');
                    aligned_cols.push(self.col_seq[from.j]);
                    statistics.gaps += 1;
                }
            }
        }

        Ok(AlignmentResult {
            score: best.score,
            aligned_rows,
            aligned_cols,
            operations: path.operations.clone(),
            start_position: path.start(),
            end_position: path.end(),
            path,
            statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Cell;
    use crate::scoring::MaxTracker;

    fn filled(row_seq: &[u8], col_seq: &[u8], params: &ScoreParams) -> (AlignmentMatrix, AlignmentScore) {
        let mut matrix = AlignmentMatrix::new(row_seq.len(), col_seq.len()).unwrap();
        let tracker = MaxTracker::new();
        matrix.fill_sequential(row_seq, col_seq, params, &tracker);
        let (index, score) = tracker.best();
        let position = matrix.position(index);
        (matrix, AlignmentScore { score, position })
    }

    #[test]
    fn reference_pair_alignment() {
        let params = ScoreParams::default();
        let (rows, cols) = (b"GACTTAC", b"CGTGAATTCAT");
        let (matrix, best) = filled(rows, cols, &params);
        let result = Traceback::new(&matrix, rows, cols)
            .reconstruct_alignment(best, &params)
            .unwrap();

        assert_eq!(result.score, 18);
        assert_eq!(result.aligned_cols, b"GAATTCA");
        assert_eq!(result.aligned_rows, b"GACTT-A");
        assert_eq!(result.start_position, Position::new(0, 3));
        assert_eq!(result.end_position, Position::new(6, 10));
        assert_eq!(
            result.operations,
            vec![
                TracebackOperation::Match,
                TracebackOperation::Match,
                TracebackOperation::Mismatch,
                TracebackOperation::Match,
                TracebackOperation::Match,
                TracebackOperation::Insertion,
                TracebackOperation::Match,
            ]
        );
        assert_eq!(result.statistics.matches, 5);
        assert_eq!(result.statistics.mismatches, 1);
        assert_eq!(result.statistics.gaps, 1);
    }

    #[test]
    fn origin_only_path_for_disjoint_alphabets() {
        let params = ScoreParams::default();
        let (matrix, best) = filled(b"AAAA", b"CCGG", &params);
        assert_eq!(best.score, 0);

        let path = Traceback::new(&matrix, b"AAAA", b"CCGG").trace(best.position).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.start(), Position::new(0, 0));
        assert!(path.operations.is_empty());
    }

    #[test]
    fn deletion_consumes_row_symbol() {
        // Row has an extra T that the best alignment skips over.
        let params = ScoreParams::new(5, -3, -2);
        let (rows, cols) = (b"ACGTTACG", b"ACGTACG");
        let (matrix, best) = filled(rows, cols, &params);
        let result = Traceback::new(&matrix, rows, cols)
            .reconstruct_alignment(best, &params)
            .unwrap();

        assert_eq!(result.score, 33);
        assert_eq!(result.aligned_rows, b"ACGTTACG");
        assert_eq!(result.aligned_cols, b"ACG-TACG");
        assert!(result.operations.contains(&TracebackOperation::Deletion));
    }

    #[test]
    fn rejects_out_of_range_start() {
        let (matrix, _) = filled(b"AC", b"AC", &ScoreParams::default());
        let err = Traceback::new(&matrix, b"AC", b"AC")
            .trace(Position::new(3, 1))
            .unwrap_err();
        assert!(matches!(err, AlignerError::TracebackError(_)));
    }

    #[test]
    fn border_cell_with_predecessor_is_an_error() {
        let mut matrix = AlignmentMatrix::new(2, 2).unwrap();
        matrix.set(0, 1, Cell { score: 3, direction: Direction::Left });
        let err = Traceback::new(&matrix, b"AC", b"AC")
            .trace(Position::new(0, 1))
            .unwrap_err();
        assert!(matches!(err, AlignerError::TracebackError(_)));
    }

    #[test]
    fn trace_stops_at_first_none_cell() {
        let (matrix, best) = filled(b"AC", b"AC", &ScoreParams::default());
        let path = Traceback::new(&matrix, b"AC", b"AC").trace(best.position).unwrap();
        assert_eq!(path.cells, vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]);
        assert_eq!(matrix.direction(0, 0), Direction::None);
    }

    #[test]
    fn replay_sums_operation_scores() {
        let params = ScoreParams::default();
        let path = AlignmentPath {
            cells: vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 3),
            ],
            operations: vec![
                TracebackOperation::Match,
                TracebackOperation::Insertion,
                TracebackOperation::Mismatch,
            ],
        };
        assert_eq!(path.replay_score(&params), 5 - 4 - 3);
    }
}
