//! In-process document store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::BenchError;
use crate::workload::{Batch, Fields, filter_key};

use super::BulkBackend;

/// Documents keyed by their canonical filter, updated with update-one,
/// no-upsert semantics. Optionally sleeps per call to stand in for
/// network latency.
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, Fields>>,
    latency: Option<Duration>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            latency: None,
        }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            latency: Some(latency),
        }
    }

    /// Store a document reachable through `filter`.
    pub async fn insert(&self, filter: &Fields, document: Fields) {
        let key = filter_key(filter);
        self.documents.write().await.insert(key, document);
    }

    pub async fn get(&self, filter: &Fields) -> Option<Fields> {
        self.documents.read().await.get(&filter_key(filter)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BulkBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn execute_batch(&self, batch: &Batch) -> Result<u64, BenchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut documents = self.documents.write().await;
        let mut matched = 0;
        for spec in batch {
            if let Some(document) = documents.get_mut(&spec.filter_key()) {
                document.extend(spec.update().clone());
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn close(&mut self) -> Result<(), BenchError> {
        self.documents.write().await.clear();
        Ok(())
    }
}
