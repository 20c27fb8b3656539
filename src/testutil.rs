//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::BulkBackend;
use crate::core::BenchError;
use crate::workload::{Batch, BatchGenerator, TimestampGenerator};

/// What a `ScriptedBackend` saw, shared with the test that created it.
#[derive(Debug, Default)]
pub struct SubmissionLog {
    batch_sizes: Mutex<Vec<usize>>,
    closed: AtomicBool,
}

impl SubmissionLog {
    pub fn submissions(&self) -> usize {
        self.batch_sizes.lock().unwrap().len()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

/// Backend that acknowledges every write except on the scripted
/// submissions (1-based, counted across the whole suite).
pub struct ScriptedBackend {
    fail_on: HashSet<usize>,
    log: Arc<SubmissionLog>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            fail_on: HashSet::new(),
            log: Arc::new(SubmissionLog::default()),
        }
    }

    pub fn failing_on(submissions: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_on: submissions.into_iter().collect(),
            log: Arc::new(SubmissionLog::default()),
        }
    }

    pub fn log(&self) -> Arc<SubmissionLog> {
        Arc::clone(&self.log)
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BulkBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn execute_batch(&self, batch: &Batch) -> Result<u64, BenchError> {
        let submission = {
            let mut sizes = self.log.batch_sizes.lock().unwrap();
            sizes.push(batch.len());
            sizes.len()
        };
        if self.fail_on.contains(&submission) {
            return Err(BenchError::SubmissionError(format!(
                "scripted failure on submission {submission}"
            )));
        }
        Ok(batch.len() as u64)
    }

    async fn close(&mut self) -> Result<(), BenchError> {
        self.log.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// A connection attempt that resolves to `backend` only after `delay`.
pub fn delayed_connect<B>(
    backend: B,
    delay: Duration,
) -> impl Future<Output = Result<B, BenchError>> {
    async move {
        tokio::time::sleep(delay).await;
        Ok(backend)
    }
}

/// Generator that blocks for `delay` before every batch.
pub struct SlowGenerator {
    inner: TimestampGenerator,
    delay: Duration,
}

impl SlowGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: TimestampGenerator::new(),
            delay,
        }
    }
}

impl BatchGenerator for SlowGenerator {
    fn generate(&self, size: usize) -> Batch {
        std::thread::sleep(self.delay);
        self.inner.generate(size)
    }
}
