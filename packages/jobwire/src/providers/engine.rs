//! Steps shared by every provider fetch: issue the request, classify the
//! status, decode the envelope, then apply `since`/`limit` and describe
//! what is left.

use serde::de::Error as _;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{FetchError, Result};
use crate::transport::{HttpTransport, TransportResponse};
use crate::types::{FetchOptions, FetchResult, Job};

pub(crate) async fn get_json(
    transport: &dyn HttpTransport,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Value> {
    let response = transport.get(url, cancel).await?;
    decode(url, response)
}

pub(crate) async fn post_json(
    transport: &dyn HttpTransport,
    url: &str,
    body: &Value,
    cancel: &CancellationToken,
) -> Result<Value> {
    let response = transport.post_json(url, body, cancel).await?;
    decode(url, response)
}

fn decode(url: &str, response: TransportResponse) -> Result<Value> {
    if !(200..300).contains(&response.status) {
        debug!(url, status = response.status, "provider returned non-success status");
        return Err(FetchError::from_status(response.status));
    }
    serde_json::from_str(&response.body).map_err(FetchError::from)
}

/// Pull the provider's job array out of its envelope.
pub(crate) fn array_field(envelope: &Value, field: &str) -> Result<Vec<Value>> {
    envelope
        .get(field)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| {
            FetchError::Parse(serde_json::Error::custom(format!(
                "response missing `{field}` array"
            )))
        })
}

/// Apply `since` (inclusive boundary) then `limit` over the provider-order
/// sequence, and derive metadata from the final set.
pub(crate) fn finalize(mut jobs: Vec<Job>, options: &FetchOptions) -> FetchResult {
    if let Some(since) = options.since {
        jobs.retain(|job| job.created_at >= since);
    }
    if let Some(limit) = options.limit {
        jobs.truncate(limit);
    }
    FetchResult::from_jobs(jobs)
}
