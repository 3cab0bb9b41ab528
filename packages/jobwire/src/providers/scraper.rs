//! Backend scraper feed client.
//!
//! The in-house scraper service exposes near-canonical postings at
//! `GET {base}/companies/{slug}/jobs`; this client mostly passes fields
//! through, with tag sanitization and deterministic fallback IDs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{JobClassifier, RoleSignals};
use crate::error::{FetchError, Result};
use crate::normalize::{parse_iso_instant, sanitize_tags, stable_fallback_id};
use crate::transport::HttpTransport;
use crate::types::{
    Company, FetchOptions, FetchResult, Job, ProviderConfig, ProviderKind, ScraperConfig,
};

use super::{engine, JobsClient, TransformContext};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPosting {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub remote: Option<bool>,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub tags: Option<Value>,
}

/// Map one scraped posting into the canonical shape.
pub fn transform(raw: Value, ctx: &TransformContext<'_>) -> Result<Job> {
    let posting: ScrapedPosting = serde_json::from_value(raw.clone())?;

    let id = posting
        .id
        .clone()
        .unwrap_or_else(|| stable_fallback_id(ctx.company, &posting.title, &posting.url));

    let created_at = posting
        .posted_at
        .as_deref()
        .and_then(parse_iso_instant)
        .unwrap_or(ctx.now);

    let tags = sanitize_tags(posting.tags.as_ref());
    let classification = ctx.classifier.classify(RoleSignals {
        title: &posting.title,
        department: posting.department.as_deref(),
        team: posting.team.as_deref(),
        tags: &tags,
    });

    Ok(Job {
        id,
        source: ProviderKind::BackendScraper,
        company: ctx.company.to_string(),
        title: posting.title,
        department: posting.department,
        team: posting.team,
        location: posting.location,
        employment_type: posting.employment_type,
        is_remote: posting.remote,
        created_at,
        url: posting.url,
        tags,
        classification,
        raw,
    })
}

pub struct ScraperClient {
    transport: Arc<dyn HttpTransport>,
    classifier: Arc<dyn JobClassifier>,
}

impl ScraperClient {
    pub fn new(transport: Arc<dyn HttpTransport>, classifier: Arc<dyn JobClassifier>) -> Self {
        Self {
            transport,
            classifier,
        }
    }

    fn config<'a>(&self, company: &'a Company) -> Result<&'a ScraperConfig> {
        match &company.config {
            ProviderConfig::BackendScraper(config) => Ok(config),
            other => Err(FetchError::ConfigMismatch {
                client: ProviderKind::BackendScraper,
                config: other.kind(),
            }),
        }
    }
}

#[async_trait]
impl JobsClient for ScraperClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::BackendScraper
    }

    async fn fetch_jobs(&self, company: &Company, options: &FetchOptions) -> Result<FetchResult> {
        let config = self.config(company)?;
        let url = format!("{}/companies/{}/jobs", config.base(), config.slug);
        debug!(company = %company.id, url = %url, "fetching scraper feed");

        let envelope = engine::get_json(self.transport.as_ref(), &url, &options.cancel).await?;
        let postings = engine::array_field(&envelope, "jobs")?;

        let ctx = TransformContext {
            company: &company.id,
            classifier: self.classifier.as_ref(),
            now: Utc::now(),
        };
        let jobs = postings
            .into_iter()
            .map(|raw| transform(raw, &ctx))
            .collect::<Result<Vec<_>>>()?;

        let result = engine::finalize(jobs, options);
        info!(
            company = %company.id,
            returned = result.metadata.total_count,
            software = result.metadata.software_count,
            "scraper fetch complete"
        );
        Ok(result)
    }
}
