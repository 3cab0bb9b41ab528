//! Fetch inputs and outputs shared by every provider client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::job::Job;

/// Options for a single provider fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Keep only jobs created at or after this instant (inclusive).
    pub since: Option<DateTime<Utc>>,
    /// Take the first N jobs of the since-filtered set, provider order.
    pub limit: Option<usize>,
    /// Cooperative cancellation; the default token never fires.
    pub cancel: CancellationToken,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Canonicalized jobs plus metadata describing the returned set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub jobs: Vec<Job>,
    pub metadata: FetchMetadata,
}

impl FetchResult {
    /// Build a result and derive its metadata from the final job set.
    pub fn from_jobs(jobs: Vec<Job>) -> Self {
        let metadata = FetchMetadata::describe(&jobs);
        Self { jobs, metadata }
    }

    pub fn empty() -> Self {
        Self::from_jobs(Vec::new())
    }
}

/// Describes the *returned* set after since/limit filtering, not the
/// provider's raw total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchMetadata {
    pub total_count: usize,
    pub software_count: usize,
    pub fetched_at: DateTime<Utc>,
    pub oldest_job_date: Option<DateTime<Utc>>,
    pub newest_job_date: Option<DateTime<Utc>>,
}

impl FetchMetadata {
    fn describe(jobs: &[Job]) -> Self {
        Self {
            total_count: jobs.len(),
            software_count: jobs
                .iter()
                .filter(|job| job.classification.is_software_adjacent)
                .count(),
            fetched_at: Utc::now(),
            oldest_job_date: jobs.iter().map(|job| job.created_at).min(),
            newest_job_date: jobs.iter().map(|job| job.created_at).max(),
        }
    }
}
