use std::time::Duration;

use crate::conf::RunConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Number of writes the backend acknowledged.
    Acknowledged(u64),
    Failed(String),
}

/// Timing of one submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    /// 1-based position within its configuration.
    pub iteration: usize,
    pub batch_size: usize,
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl BenchmarkResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }

    pub fn acknowledged(&self) -> u64 {
        match self.outcome {
            Outcome::Acknowledged(n) => n,
            Outcome::Failed(_) => 0,
        }
    }
}

/// All results of one configuration, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResults {
    pub config: RunConfig,
    pub results: Vec<BenchmarkResult>,
}

impl RunResults {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    pub fn passed(&self) -> bool {
        self.failures() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteResults {
    pub backend: String,
    pub runs: Vec<RunResults>,
    /// Set when the consecutive-failure limit stopped the suite early.
    pub aborted: bool,
}

impl SuiteResults {
    pub fn passed(&self) -> bool {
        !self.aborted && self.runs.iter().all(RunResults::passed)
    }

    /// Results of the configuration with `batch_size`, if it ran.
    pub fn run(&self, batch_size: usize) -> Option<&RunResults> {
        self.runs.iter().find(|r| r.config.batch_size == batch_size)
    }
}
