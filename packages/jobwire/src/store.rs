//! Cache seam between the aggregator and the caller's state container.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{FetchResult, Job};

/// Read/write paths the aggregator publishes through. Keyed by company ID;
/// concurrent fetches never write the same key.
#[async_trait]
pub trait JobCache: Send + Sync {
    async fn jobs_for(&self, company_id: &str) -> Option<FetchResult>;

    async fn store(&self, company_id: &str, result: FetchResult);

    /// Merged view across all companies. Ordering is unspecified; callers
    /// sort chronologically when they need to.
    async fn all_jobs(&self) -> Vec<Job>;
}

/// In-memory cache, the default for tests and single-process callers.
#[derive(Default)]
pub struct MemoryJobCache {
    results: RwLock<HashMap<String, FetchResult>>,
}

impl MemoryJobCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobCache for MemoryJobCache {
    async fn jobs_for(&self, company_id: &str) -> Option<FetchResult> {
        self.results.read().await.get(company_id).cloned()
    }

    async fn store(&self, company_id: &str, result: FetchResult) {
        self.results
            .write()
            .await
            .insert(company_id.to_string(), result);
    }

    async fn all_jobs(&self) -> Vec<Job> {
        self.results
            .read()
            .await
            .values()
            .flat_map(|result| result.jobs.clone())
            .collect()
    }
}
