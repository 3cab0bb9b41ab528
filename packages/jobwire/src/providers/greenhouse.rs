//! Greenhouse job-board client.
//!
//! `GET {base}/boards/{board_token}/jobs?content=true` returns a `jobs`
//! envelope. Office names are preferred over the generic location name,
//! and the first department wins when several are present.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{JobClassifier, RoleSignals};
use crate::error::{FetchError, Result};
use crate::normalize::parse_iso_instant;
use crate::transport::HttpTransport;
use crate::types::{
    Company, FetchOptions, FetchResult, GreenhouseConfig, Job, ProviderConfig, ProviderKind,
};

use super::{engine, JobsClient, TransformContext};

#[derive(Debug, Clone, Deserialize)]
pub struct GreenhouseJob {
    pub id: i64,
    pub title: String,
    pub absolute_url: String,
    #[serde(default)]
    pub first_published: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub location: Option<GreenhouseLocation>,
    #[serde(default)]
    pub offices: Vec<GreenhouseOffice>,
    #[serde(default)]
    pub departments: Vec<GreenhouseDepartment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GreenhouseLocation {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GreenhouseOffice {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GreenhouseDepartment {
    pub name: String,
}

/// Map one raw Greenhouse posting into the canonical shape.
pub fn transform(raw: Value, ctx: &TransformContext<'_>) -> Result<Job> {
    let posting: GreenhouseJob = serde_json::from_value(raw.clone())?;

    let location = posting
        .offices
        .first()
        .map(|office| office.name.clone())
        .or_else(|| posting.location.as_ref().map(|loc| loc.name.clone()));
    let department = posting.departments.first().map(|dept| dept.name.clone());

    let created_at = posting
        .first_published
        .as_deref()
        .or(posting.updated_at.as_deref())
        .and_then(parse_iso_instant)
        .unwrap_or(ctx.now);

    let is_remote = match &location {
        Some(name) if name.to_lowercase().contains("remote") => Some(true),
        _ => None,
    };

    let tags = Vec::new();
    let classification = ctx.classifier.classify(RoleSignals {
        title: &posting.title,
        department: department.as_deref(),
        team: None,
        tags: &tags,
    });

    Ok(Job {
        id: posting.id.to_string(),
        source: ProviderKind::Greenhouse,
        company: ctx.company.to_string(),
        title: posting.title,
        department,
        team: None,
        location,
        employment_type: None,
        is_remote,
        created_at,
        url: posting.absolute_url,
        tags,
        classification,
        raw,
    })
}

pub struct GreenhouseClient {
    transport: Arc<dyn HttpTransport>,
    classifier: Arc<dyn JobClassifier>,
}

impl GreenhouseClient {
    pub fn new(transport: Arc<dyn HttpTransport>, classifier: Arc<dyn JobClassifier>) -> Self {
        Self {
            transport,
            classifier,
        }
    }

    fn config<'a>(&self, company: &'a Company) -> Result<&'a GreenhouseConfig> {
        match &company.config {
            ProviderConfig::Greenhouse(config) => Ok(config),
            other => Err(FetchError::ConfigMismatch {
                client: ProviderKind::Greenhouse,
                config: other.kind(),
            }),
        }
    }
}

#[async_trait]
impl JobsClient for GreenhouseClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Greenhouse
    }

    async fn fetch_jobs(&self, company: &Company, options: &FetchOptions) -> Result<FetchResult> {
        let config = self.config(company)?;
        let url = format!(
            "{}/boards/{}/jobs?content=true",
            config.base(),
            config.board_token
        );
        debug!(company = %company.id, url = %url, "fetching greenhouse board");

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
            "greenhouse fetch complete"
        );
        Ok(result)
    }
}
