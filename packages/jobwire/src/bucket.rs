//! Time-bucketing engine for the histogram view.
//!
//! Buckets are epoch-anchored (`floor(ms / bucket_ms) * bucket_ms`), so
//! boundaries shift with wall-clock time on every invocation. The output
//! sequence is complete and contiguous: zero-count buckets are
//! materialized, because a gap must read as zero, not as missing data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Job, TimeWindow};

/// One fixed-width slice of the histogram. Produced fresh on every
/// invocation, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub bucket_start: DateTime<Utc>,
    pub bucket_end: DateTime<Utc>,
    pub count: usize,
    /// Jobs assigned to this bucket, for drill-down.
    pub job_ids: Vec<String>,
}

pub fn bucket_jobs(jobs: &[Job], window: TimeWindow) -> Vec<TimeBucket> {
    bucket_jobs_at(jobs, window, Utc::now())
}

/// Same as [`bucket_jobs`] with an explicit "now" anchoring the window.
pub fn bucket_jobs_at(jobs: &[Job], window: TimeWindow, now: DateTime<Utc>) -> Vec<TimeBucket> {
    let bucket_ms = window.bucket_size().num_milliseconds();
    let window_start = now - window.duration();
    let first_start = floor_to_bucket(window_start.timestamp_millis(), bucket_ms);

    let mut buckets: Vec<TimeBucket> = Vec::new();
    let mut start = first_start;
    while start < now.timestamp_millis() {
        buckets.push(TimeBucket {
            bucket_start: from_millis(start),
            bucket_end: from_millis(start + bucket_ms),
            count: 0,
            job_ids: Vec::new(),
        });
        start += bucket_ms;
    }

    for job in jobs {
        if job.created_at < window_start {
            continue;
        }
        let assigned = floor_to_bucket(job.created_at.timestamp_millis(), bucket_ms);
        let index = (assigned - first_start) / bucket_ms;
        // Future-dated jobs land past the last bucket and are skipped.
        let Some(bucket) = usize::try_from(index)
            .ok()
            .and_then(|index| buckets.get_mut(index))
        else {
            continue;
        };
        bucket.count += 1;
        bucket.job_ids.push(job.id.clone());
    }

    buckets
}

/// Derived views over a bucket sequence; computed per call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStats {
    pub total: usize,
    pub max_count: usize,
    /// Mean count over non-empty buckets; 0.0 when every bucket is empty.
    pub average_nonempty: f64,
}

pub fn bucket_stats(buckets: &[TimeBucket]) -> BucketStats {
    let total: usize = buckets.iter().map(|bucket| bucket.count).sum();
    let max_count = buckets.iter().map(|bucket| bucket.count).max().unwrap_or(0);
    let nonempty = buckets.iter().filter(|bucket| bucket.count > 0).count();
    let average_nonempty = if nonempty == 0 {
        0.0
    } else {
        total as f64 / nonempty as f64
    };
    BucketStats {
        total,
        max_count,
        average_nonempty,
    }
}

/// Running totals, one entry per bucket.
pub fn cumulative_counts(buckets: &[TimeBucket]) -> Vec<usize> {
    let mut running = 0;
    buckets
        .iter()
        .map(|bucket| {
            running += bucket.count;
            running
        })
        .collect()
}

fn floor_to_bucket(ms: i64, bucket_ms: i64) -> i64 {
    ms.div_euclid(bucket_ms) * bucket_ms
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).expect("bucket timestamp in range")
}
