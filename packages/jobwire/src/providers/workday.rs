//! Workday career-site client.
//!
//! Workday paginates through POSTed offset/limit bodies and reports dates
//! as relative strings ("Posted 3 Days Ago"), so this client accumulates
//! all pages before any filtering and resolves dates to fixed UTC
//! midnights at transform time.
//!
//! Pagination contract: `total` is trusted only from the first page (later
//! pages may misreport it), the offset advances by the page size after
//! every page, and the loop stops on convergence, on reaching the
//! requested limit, on an empty page, or at a hard page cap.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::classify::{JobClassifier, RoleSignals};
use crate::error::{FetchError, Result};
use crate::normalize::stable_fallback_id;
use crate::transport::HttpTransport;
use crate::types::{
    Company, FetchOptions, FetchResult, Job, ProviderConfig, ProviderKind, WorkdayConfig,
};

use super::{engine, JobsClient, TransformContext};

/// Hard cap on page requests for servers that never report convergence.
const MAX_PAGES: usize = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdayPosting {
    pub title: String,
    #[serde(default)]
    pub external_path: Option<String>,
    #[serde(default)]
    pub locations_text: Option<String>,
    #[serde(default)]
    pub posted_on: Option<String>,
    /// First entry is the requisition ID when present.
    #[serde(default)]
    pub bullet_fields: Vec<String>,
}

fn posted_days_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^posted\s+(\d+)(\+)?\s+days?\s+ago$").expect("valid posted-on pattern")
    })
}

fn placeholder_location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^\d+\s+locations?$").expect("valid location pattern"))
}

fn utc_midnight(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc()
}

/// Resolve Workday's relative `postedOn` strings to fixed instants.
///
/// `"Posted N+ Days Ago"` widens the bucket by exactly one extra day
/// (N+1 days back). Unrecognized strings fall back to `now`.
pub fn parse_posted_on(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("posted today") {
        return utc_midnight(now);
    }
    if trimmed.eq_ignore_ascii_case("posted yesterday") {
        return utc_midnight(now) - Duration::days(1);
    }
    if let Some(caps) = posted_days_pattern().captures(trimmed) {
        let days: i64 = match caps[1].parse() {
            Ok(days) => days,
            Err(_) => return now,
        };
        let widened = if caps.get(2).is_some() { days + 1 } else { days };
        return utc_midnight(now) - Duration::days(widened);
    }
    now
}

/// Workday sometimes reports a placeholder count ("2 Locations") instead
/// of a location. Those are dropped; everything else is kept verbatim,
/// including strings that merely contain digits.
fn is_placeholder_location(text: &str) -> bool {
    placeholder_location_pattern().is_match(text.trim())
}

/// Map one raw Workday posting into the canonical shape.
pub fn transform(raw: Value, config: &WorkdayConfig, ctx: &TransformContext<'_>) -> Result<Job> {
    let posting: WorkdayPosting = serde_json::from_value(raw.clone())?;

    let path = posting.external_path.clone().unwrap_or_default();
    let url = format!("{}{}", config.job_url_base(), path);
    let id = posting
        .bullet_fields
        .first()
        .filter(|field| !field.is_empty())
        .cloned()
        .unwrap_or_else(|| stable_fallback_id(ctx.company, &posting.title, &path));

    let location = posting
        .locations_text
        .clone()
        .filter(|text| !is_placeholder_location(text));

    let created_at = posting
        .posted_on
        .as_deref()
        .map(|text| parse_posted_on(text, ctx.now))
        .unwrap_or(ctx.now);

    let tags = Vec::new();
    let classification = ctx.classifier.classify(RoleSignals {
        title: &posting.title,
        department: None,
        team: None,
        tags: &tags,
    });

    Ok(Job {
        id,
        source: ProviderKind::Workday,
        company: ctx.company.to_string(),
        title: posting.title,
        department: None,
        team: None,
        location,
        employment_type: None,
        is_remote: None,
        created_at,
        url,
        tags,
        classification,
        raw,
    })
}

pub struct WorkdayClient {
    transport: Arc<dyn HttpTransport>,
    classifier: Arc<dyn JobClassifier>,
}

impl WorkdayClient {
    pub fn new(transport: Arc<dyn HttpTransport>, classifier: Arc<dyn JobClassifier>) -> Self {
        Self {
            transport,
            classifier,
        }
    }

    fn config<'a>(&self, company: &'a Company) -> Result<&'a WorkdayConfig> {
        match &company.config {
            ProviderConfig::Workday(config) => Ok(config),
            other => Err(FetchError::ConfigMismatch {
                client: ProviderKind::Workday,
                config: other.kind(),
            }),
        }
    }

    /// Accumulate `jobPostings` across pages. A page-level HTTP, network,
    /// or parse failure aborts the whole paginated fetch; a cancellation
    /// stops the loop quietly and keeps the pages already fetched.
    async fn fetch_all_pages(
        &self,
        config: &WorkdayConfig,
        options: &FetchOptions,
    ) -> Result<Vec<Value>> {
        let endpoint = config.jobs_endpoint();
        let page_size = config.page_size();
        let facets = config
            .applied_facets
            .clone()
            .unwrap_or_else(|| json!({}));

        let mut postings: Vec<Value> = Vec::new();
        let mut total: Option<u64> = None;
        let mut offset = 0usize;

        for page in 0..MAX_PAGES {
            if options.cancel.is_cancelled() {
                debug!(endpoint = %endpoint, fetched = postings.len(), "pagination cancelled");
                break;
            }

            let body = json!({
                "appliedFacets": facets.clone(),
                "limit": page_size,
                "offset": offset,
                "searchText": "",
            });
            let envelope =
                match engine::post_json(self.transport.as_ref(), &endpoint, &body, &options.cancel)
                    .await
                {
                    Ok(envelope) => envelope,
                    Err(FetchError::Cancelled) => {
                        debug!(endpoint = %endpoint, fetched = postings.len(), "pagination cancelled");
                        break;
                    }
                    Err(error) => return Err(error),
                };

            let page_postings = envelope
                .get("jobPostings")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            if page == 0 {
                // Later pages may report a different or zero total; only
                // the first page's value is trusted.
                total = envelope.get("total").and_then(Value::as_u64);
            }

            let fetched = page_postings.len();
            debug!(endpoint = %endpoint, page, offset, fetched, "workday page fetched");
            postings.extend(page_postings);
            offset += page_size;

            if fetched == 0 {
                break;
            }
            if let Some(total) = total {
                if postings.len() as u64 >= total {
                    break;
                }
            }
            if let Some(limit) = options.limit {
                if postings.len() >= limit {
                    break;
                }
            }
            if page + 1 == MAX_PAGES {
                warn!(
                    endpoint = %endpoint,
                    fetched = postings.len(),
                    "workday pagination hit the page cap without converging"
                );
            }
        }

        Ok(postings)
    }
}

#[async_trait]
impl JobsClient for WorkdayClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Workday
    }

    async fn fetch_jobs(&self, company: &Company, options: &FetchOptions) -> Result<FetchResult> {
        let config = self.config(company)?;
        let postings = self.fetch_all_pages(config, options).await?;

        let ctx = TransformContext {
            company: &company.id,
            classifier: self.classifier.as_ref(),
            now: Utc::now(),
        };
        let jobs = postings
            .into_iter()
            .map(|raw| transform(raw, config, &ctx))
            .collect::<Result<Vec<_>>>()?;

        // since/limit run once over the aggregated pages, never per page.
        let result = engine::finalize(jobs, options);
        info!(
            company = %company.id,
            returned = result.metadata.total_count,
            software = result.metadata.software_count,
            "workday fetch complete"
        );
        Ok(result)
    }
}
