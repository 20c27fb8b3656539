use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::backend::BulkBackend;
use crate::conf::{RunConfig, SuiteConfig};
use crate::workload::{Batch, BatchGenerator, TimestampGenerator};

use super::{BenchmarkResult, Outcome, RunResults, SuiteResults};

/// Runs configurations sequentially against one backend.
pub struct Runner<G = TimestampGenerator> {
    generator: G,
    max_consecutive_failures: Option<u32>,
}

impl Runner<TimestampGenerator> {
    pub fn from_config(suite: &SuiteConfig) -> Self {
        Runner::new(TimestampGenerator::with_payload_bytes(suite.payload_bytes))
            .with_max_consecutive_failures(suite.max_consecutive_failures)
    }
}

impl<G: BatchGenerator> Runner<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            max_consecutive_failures: None,
        }
    }

    pub fn with_max_consecutive_failures(mut self, limit: Option<u32>) -> Self {
        self.max_consecutive_failures = limit;
        self
    }

    pub fn generate_batch(&self, size: usize) -> Batch {
        self.generator.generate(size)
    }

    /// Time exactly the backend call. Errors become a failed result.
    pub async fn submit_batch<B>(
        &self,
        backend: &B,
        iteration: usize,
        batch: &Batch,
    ) -> BenchmarkResult
    where
        B: BulkBackend + ?Sized,
    {
        let started = Instant::now();
        let outcome = backend.execute_batch(batch).await;
        let elapsed = started.elapsed();

        BenchmarkResult {
            iteration,
            batch_size: batch.len(),
            elapsed,
            outcome: match outcome {
                Ok(acknowledged) => Outcome::Acknowledged(acknowledged),
                Err(e) => Outcome::Failed(e.to_string()),
            },
        }
    }

    /// Run every configuration of `plan` in order, `iterations` submissions
    /// each. Generation happens before the timer starts.
    ///
    /// Failed submissions are recorded and the suite moves on, unless the
    /// consecutive-failure limit is reached.
    pub async fn run_suite<B>(&self, backend: &B, plan: &[RunConfig]) -> SuiteResults
    where
        B: BulkBackend + ?Sized,
    {
        let mut runs = Vec::with_capacity(plan.len());
        let mut consecutive_failures = 0u32;
        let mut aborted = false;

        for config in plan {
            info!(
                "bulk write on {}: {} iteration(s) of batch size {}",
                backend.name(),
                config.iterations,
                config.batch_size
            );
            let mut results = Vec::with_capacity(config.iterations);

            for iteration in 1..=config.iterations {
                let batch = self.generator.generate(config.batch_size);
                let result = if batch.len() == config.batch_size {
                    self.submit_batch(backend, iteration, &batch).await
                } else {
                    BenchmarkResult {
                        iteration,
                        batch_size: batch.len(),
                        elapsed: Duration::ZERO,
                        outcome: Outcome::Failed(format!(
                            "generator produced {} writes, expected {}",
                            batch.len(),
                            config.batch_size
                        )),
                    }
                };

                if let Outcome::Failed(message) = &result.outcome {
                    error!(
                        "bulk write failed (batch size {}, iteration {}/{}): {}",
                        config.batch_size, iteration, config.iterations, message
                    );
                    consecutive_failures += 1;
                } else {
                    consecutive_failures = 0;
                }
                results.push(result);

                if self
                    .max_consecutive_failures
                    .is_some_and(|limit| consecutive_failures >= limit)
                {
                    warn!(
                        "{} consecutive failures, stopping the suite",
                        consecutive_failures
                    );
                    aborted = true;
                    break;
                }
            }

            runs.push(RunResults {
                config: *config,
                results,
            });
            if aborted {
                break;
            }
        }

        SuiteResults {
            backend: backend.name().to_string(),
            runs,
            aborted,
        }
    }
}
