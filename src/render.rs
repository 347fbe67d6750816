//! Plain-text dumps of the score and predecessor matrices.

use std::fmt;

use colored::Colorize;

use crate::matrix::AlignmentMatrix;

/// Tab-separated score matrix with the column sequence as header and the row
/// sequence down the left edge.
pub struct SimilarityMatrix<'a> {
    matrix: &'a AlignmentMatrix,
    row_seq: &'a [u8],
    col_seq: &'a [u8],
}

impl<'a> SimilarityMatrix<'a> {
    pub fn new(matrix: &'a AlignmentMatrix, row_seq: &'a [u8], col_seq: &'a [u8]) -> Self {
        Self {
            matrix,
            row_seq,
            col_seq,
        }
    }
}

impl fmt::Display for SimilarityMatrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("-\t-\t")?;
        for &c in self.col_seq {
            write!(f, "{}\t", c as char)?;
        }
        writeln!(f)?;

        for i in 0..=self.matrix.rows() {
            let label = if i == 0 { '-' } else { self.row_seq[i - 1] as char };
            write!(f, "{}\t", label)?;
            for j in 0..=self.matrix.cols() {
                write!(f, "{}\t", self.matrix.score(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Arrow view of the predecessor matrix. Cells on the marked path are drawn
/// in bold red when `color` is set, and bracketed otherwise.
pub struct PredecessorMatrix<'a> {
    matrix: &'a AlignmentMatrix,
    row_seq: &'a [u8],
    col_seq: &'a [u8],
    color: bool,
}

impl<'a> PredecessorMatrix<'a> {
    pub fn new(
        matrix: &'a AlignmentMatrix,
        row_seq: &'a [u8],
        col_seq: &'a [u8],
        color: bool,
    ) -> Self {
        Self {
            matrix,
            row_seq,
            col_seq,
            color,
        }
    }
}

impl fmt::Display for PredecessorMatrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("    ")?;
        for &c in self.col_seq {
            write!(f, "{} ", c as char)?;
        }
        writeln!(f)?;

        for i in 0..=self.matrix.rows() {
            let label = if i == 0 { ' ' } else { self.row_seq[i - 1] as char };
            write!(f, "{} ", label)?;
            for j in 0..=self.matrix.cols() {
                let arrow = self.matrix.direction(i, j).arrow();
                match (self.matrix.is_on_path(i, j), self.color) {
                    (true, true) => write!(f, "{} ", arrow.to_string().red().bold())?,
                    (true, false) => write!(f, "[{}]", arrow)?,
                    (false, _) => write!(f, "{} ", arrow)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
