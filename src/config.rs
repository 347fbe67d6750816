use crate::{AlignerError, ScoreParams};

#[derive(Debug, Clone)]
pub struct AlignerConfig {
    threads: usize,
    scoring: ScoreParams,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            // Size of rayon's default pool, i.e. the available CPUs
            threads: rayon::current_num_threads(),
            scoring: ScoreParams::default(),
        }
    }
}

impl AlignerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(mut self, threads: usize) -> Result<Self, AlignerError> {
        if threads == 0 {
            return Err(AlignerError::ConfigurationError(
                "Thread count must be at least 1".to_string(),
            ));
        }
        self.threads = threads;
        Ok(self)
    }

    pub fn with_scoring(mut self, scoring: ScoreParams) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn scoring(&self) -> &ScoreParams {
        &self.scoring
    }

    pub fn validate(&self) -> Result<(), AlignerError> {
        if self.threads == 0 {
            return Err(AlignerError::ConfigurationError(
                "Thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
