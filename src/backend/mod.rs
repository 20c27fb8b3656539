//! Pluggable bulk-write backends.

mod memory;
mod mongo;
mod redis_hash;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::conf::{BackendConfig, BackendKind};
use crate::core::BenchError;
use crate::workload::Batch;

pub use memory::MemoryBackend;
pub use mongo::MongoBackend;
pub use redis_hash::RedisBackend;

/// A live session with a store that accepts batched writes.
///
/// The harness only relies on `execute_batch` succeeding or failing as a
/// whole; how the store orders or partially applies the writes is its own
/// business.
#[async_trait]
pub trait BulkBackend: Send + Sync {
    /// Human-readable name for reports and logs.
    fn name(&self) -> &'static str;

    /// Submit all writes of `batch` as one logical call.
    /// Returns the number of writes the store acknowledged.
    async fn execute_batch(&self, batch: &Batch) -> Result<u64, BenchError>;

    /// Release the session. Called once after the suite finishes.
    async fn close(&mut self) -> Result<(), BenchError>;
}

#[async_trait]
impl<T: BulkBackend + ?Sized> BulkBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn execute_batch(&self, batch: &Batch) -> Result<u64, BenchError> {
        (**self).execute_batch(batch).await
    }

    async fn close(&mut self) -> Result<(), BenchError> {
        (**self).close().await
    }
}

/// Await `connecting`, failing with `ConnectionError` if it does not finish
/// within `timeout` or fails itself.
pub async fn connect_within<B, F>(timeout: Duration, connecting: F) -> Result<B, BenchError>
where
    F: Future<Output = Result<B, BenchError>>,
{
    match tokio::time::timeout(timeout, connecting).await {
        Ok(result) => result.map_err(BenchError::into_connection_error),
        Err(_) => Err(BenchError::ConnectionError(format!(
            "backend not reachable within {:?}",
            timeout
        ))),
    }
}

/// Open the backend described by `config` within its connect timeout.
pub async fn connect(config: &BackendConfig) -> Result<Box<dyn BulkBackend>, BenchError> {
    let timeout = config.connect_timeout;
    let backend: Box<dyn BulkBackend> = match config.kind {
        BackendKind::Mongodb => {
            Box::new(connect_within(timeout, MongoBackend::connect(config)).await?)
        }
        BackendKind::Redis => {
            Box::new(connect_within(timeout, RedisBackend::connect(config)).await?)
        }
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    info!(
        "connected to {} backend at {}",
        backend.name(),
        config.endpoint
    );
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_within_times_out() {
        let stalled = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(MemoryBackend::new())
        };
        let result = connect_within(Duration::from_millis(20), stalled).await;
        assert!(matches!(result, Err(BenchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_connect_within_maps_failures() {
        let refused = async {
            Err::<MemoryBackend, _>(BenchError::SubmissionError("refused".to_string()))
        };
        let result = connect_within(Duration::from_secs(1), refused).await;
        assert_eq!(
            result.err(),
            Some(BenchError::ConnectionError("refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_connect_memory() {
        let config = BackendConfig {
            kind: BackendKind::Memory,
            ..BackendConfig::default()
        };
        let backend = connect(&config).await.unwrap();
        assert_eq!(backend.name(), "memory");
    }
}
