use serde::{Deserialize, Serialize};

use crate::core::BenchError;

/// One benchmark configuration: `iterations` submissions of `batch_size` writes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub batch_size: usize,
    pub iterations: usize,
}

impl RunConfig {
    pub fn new(batch_size: usize, iterations: usize) -> Self {
        Self {
            batch_size,
            iterations,
        }
    }

    pub fn total_ops(&self) -> usize {
        self.batch_size * self.iterations
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    #[serde(default = "SuiteConfig::default_total_ops")]
    pub total_ops: usize,
    #[serde(default = "SuiteConfig::default_batch_sizes")]
    pub batch_sizes: Vec<usize>,
    /// Explicit runs; when non-empty they replace the derived plan.
    #[serde(default)]
    pub runs: Vec<RunConfig>,
    /// Stop the suite after this many failed submissions in a row.
    #[serde(default)]
    pub max_consecutive_failures: Option<u32>,
    /// Length of the random `$set` payload; `None` writes the literal "bar".
    #[serde(default)]
    pub payload_bytes: Option<usize>,
}

impl SuiteConfig {
    fn default_total_ops() -> usize {
        1000
    }

    fn default_batch_sizes() -> Vec<usize> {
        vec![1, 10, 100, 1000]
    }

    /// Resolve the ordered list of runs.
    ///
    /// Batch sizes are paired with `total_ops / batch_size` iterations so
    /// every configuration performs the same number of writes.
    pub fn plan(&self) -> Result<Vec<RunConfig>, BenchError> {
        if !self.runs.is_empty() {
            return Ok(self.runs.clone());
        }
        if self.batch_sizes.is_empty() {
            return Err(BenchError::ConfigParsingError(
                "suite.batch_sizes must not be empty".to_string(),
            ));
        }

        self.batch_sizes
            .iter()
            .map(|&batch_size| {
                if batch_size == 0 {
                    return Err(BenchError::ConfigParsingError(
                        "batch size 0 cannot be derived from total_ops, use explicit runs"
                            .to_string(),
                    ));
                }
                if self.total_ops % batch_size != 0 {
                    return Err(BenchError::ConfigParsingError(format!(
                        "batch size {} does not divide total_ops {}",
                        batch_size, self.total_ops
                    )));
                }
                Ok(RunConfig::new(batch_size, self.total_ops / batch_size))
            })
            .collect()
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            total_ops: Self::default_total_ops(),
            batch_sizes: Self::default_batch_sizes(),
            runs: Vec::new(),
            max_consecutive_failures: None,
            payload_bytes: None,
        }
    }
}
