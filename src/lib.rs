use std::time::Instant;

use log::{debug, info};
use rayon::ThreadPool;
use thiserror::Error;

pub mod config;
pub mod generate;
pub mod matrix;
pub mod render;
pub mod scoring;
pub mod traceback;
pub mod wavefront;

pub use crate::config::AlignerConfig;
pub use crate::matrix::{AlignmentMatrix, Cell, Direction};
pub use crate::scoring::{AlignmentScore, AlignmentStats, MaxTracker, Position};
pub use crate::traceback::{AlignmentPath, AlignmentResult, Traceback, TracebackOperation};
pub use crate::wavefront::{Diagonal, WavefrontScheduler};

// DNA scoring parameters
pub const DNA_MATCH: i32 = 5;
pub const DNA_MISMATCH: i32 = -3;
pub const DNA_GAP: i32 = -4;

/// Largest matrix (border included) whose flat indices fit the max tracker.
pub const MAX_MATRIX_CELLS: usize = u32::MAX as usize;

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Sequence too large: {0}")]
    SequenceTooLarge(usize),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Memory allocation failed: {0}")]
    AllocationFailure(String),
    #[error("Traceback error: {0}")]
    TracebackError(String),
}

/// Linear-gap scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreParams {
    pub match_score: i32,
    pub mismatch: i32,
    pub gap: i32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            match_score: DNA_MATCH,
            mismatch: DNA_MISMATCH,
            gap: DNA_GAP,
        }
    }
}

impl ScoreParams {
    pub fn new(match_score: i32, mismatch: i32, gap: i32) -> Self {
        Self {
            match_score,
            mismatch,
            gap,
        }
    }

    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch
        }
    }

    /// Fails if some cell of a `rows x cols` matrix could exceed `i32::MAX`.
    ///
    /// A local path has at most `rows + cols` steps and no step adds more than
    /// the largest positive parameter.
    pub fn check_range(&self, rows: usize, cols: usize) -> Result<(), AlignerError> {
        let step = self.match_score.max(self.mismatch).max(self.gap).max(0) as u64;
        let steps = rows as u64 + cols as u64;
        match steps.checked_mul(step) {
            Some(bound) if bound <= i32::MAX as u64 => Ok(()),
            _ => Err(AlignerError::SequenceTooLarge(rows.max(cols))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    data: Vec<u8>,
}

impl Sequence {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<Vec<u8>> for Sequence {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

/// Smith-Waterman aligner that fills the matrix by anti-diagonals on its own
/// worker pool.
pub struct WavefrontAligner {
    config: AlignerConfig,
    pool: ThreadPool,
}

impl WavefrontAligner {
    pub fn new(config: AlignerConfig) -> Result<Self, AlignerError> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .thread_name(|i| format!("wavefront-{}", i))
            .build()
            .map_err(|e| AlignerError::ConfigurationError(format!("Failed to build thread pool: {}", e)))?;
        debug!("Built wavefront thread pool with {} threads", pool.current_num_threads());

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Fills `H` and `P` for the pair and returns them with the best cell.
    ///
    /// `rows` indexes the matrix rows and `cols` its columns.
    pub fn score_matrix(
        &self,
        rows: &Sequence,
        cols: &Sequence,
    ) -> Result<(AlignmentMatrix, AlignmentScore), AlignerError> {
        if rows.is_empty() || cols.is_empty() {
            return Err(AlignerError::InvalidInput(format!(
                "sequences must not be empty (rows: {}, cols: {})",
                rows.len(),
                cols.len()
            )));
        }

        let params = self.config.scoring();
        params.check_range(rows.len(), cols.len())?;

        let mut matrix = AlignmentMatrix::new(rows.len(), cols.len())?;
        let tracker = MaxTracker::new();

        WavefrontScheduler::new(&self.pool).run(
            &mut matrix,
            rows.as_bytes(),
            cols.as_bytes(),
            params,
            &tracker,
        );

        let (index, score) = tracker.into_inner();
        let position = matrix.position(index);
        Ok((matrix, AlignmentScore { score, position }))
    }

    /// Aligns the pair and keeps the matrix, with the path marked on it.
    pub fn align_with_matrix(
        &self,
        rows: &Sequence,
        cols: &Sequence,
    ) -> Result<(AlignmentMatrix, AlignmentResult), AlignerError> {
        let start_time = Instant::now();

        let (mut matrix, best) = self.score_matrix(rows, cols)?;
        let mut result = Traceback::new(&matrix, rows.as_bytes(), cols.as_bytes())
            .reconstruct_alignment(best, self.config.scoring())?;
        matrix.mark_path(&result.path);

        result.statistics.execution_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
        info!(
            "Aligned {}x{}: score {} ending at {} ({} cells on path, {:.3} ms)",
            rows.len(),
            cols.len(),
            result.score,
            result.end_position,
            result.path.len(),
            result.statistics.execution_time_ms
        );

        Ok((matrix, result))
    }

    pub fn align(&self, rows: &Sequence, cols: &Sequence) -> Result<AlignmentResult, AlignerError> {
        self.align_with_matrix(rows, cols).map(|(_, result)| result)
    }
}
