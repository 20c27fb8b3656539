//! Redis backend.
//!
//! Documents are hashes keyed by `<collection>:<filter>`. A batch is one
//! pipeline of conditional `HSET` scripts, so a missing document is left
//! alone the way an update without upsert would.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

use crate::conf::BackendConfig;
use crate::core::BenchError;
use crate::workload::{Batch, WriteSpec};

use super::BulkBackend;

const UPDATE_ONE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    redis.call('HSET', KEYS[1], unpack(ARGV))
    return 1
end
return 0
"#;

pub struct RedisBackend {
    /// `None` once the session is closed.
    conn: Option<MultiplexedConnection>,
    collection: String,
}

impl RedisBackend {
    pub async fn connect(config: &BackendConfig) -> Result<Self, BenchError> {
        let client = redis::Client::open(config.endpoint.as_str())
            .map_err(|e| BenchError::ConnectionError(e.to_string()))?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| BenchError::ConnectionError(e.to_string()))?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| BenchError::ConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Some(conn),
            collection: config.collection.clone(),
        })
    }

    pub fn document_key(&self, spec: &WriteSpec) -> String {
        format!("{}:{}", self.collection, spec.filter_key())
    }
}

#[async_trait]
impl BulkBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn execute_batch(&self, batch: &Batch) -> Result<u64, BenchError> {
        let mut conn = self
            .conn
            .clone()
            .ok_or_else(|| BenchError::SubmissionError("redis session is closed".to_string()))?;
        if batch.is_empty() {
            return Ok(0);
        }

        let mut pipe = redis::pipe();
        for spec in batch {
            pipe.cmd("EVAL")
                .arg(UPDATE_ONE_SCRIPT)
                .arg(1)
                .arg(self.document_key(spec));
            for (field, value) in spec.update() {
                pipe.arg(field).arg(value);
            }
        }

        let matched: Vec<i64> = pipe.query_async(&mut conn).await?;
        Ok(matched.iter().sum::<i64>() as u64)
    }

    async fn close(&mut self) -> Result<(), BenchError> {
        self.conn.take();
        Ok(())
    }
}
