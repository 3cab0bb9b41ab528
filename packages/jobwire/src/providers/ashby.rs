//! Ashby job-board client.
//!
//! `GET {base}/posting-api/job-board/{name}` returns an `apiVersion` +
//! `jobs` envelope. Ashby's employment-type vocabulary is mapped onto the
//! canonical hyphenated labels; unrecognized values pass through.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{JobClassifier, RoleSignals};
use crate::error::{FetchError, Result};
use crate::normalize::{parse_iso_instant, stable_fallback_id};
use crate::transport::HttpTransport;
use crate::types::{
    AshbyConfig, Company, FetchOptions, FetchResult, Job, ProviderConfig, ProviderKind,
};

use super::{engine, JobsClient, TransformContext};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AshbyPosting {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_remote: Option<bool>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub apply_url: Option<String>,
}

/// Map Ashby's vocabulary onto canonical hyphenated labels. Unrecognized
/// values pass through unchanged.
pub fn canonical_employment_type(raw: &str) -> String {
    match raw {
        "FullTime" => "Full-time".to_string(),
        "PartTime" => "Part-time".to_string(),
        "Intern" | "Internship" => "Internship".to_string(),
        "Contract" | "Contractor" => "Contract".to_string(),
        "Temporary" => "Temporary".to_string(),
        other => other.to_string(),
    }
}

/// Map one raw Ashby posting into the canonical shape.
pub fn transform(raw: Value, board: &str, ctx: &TransformContext<'_>) -> Result<Job> {
    let posting: AshbyPosting = serde_json::from_value(raw.clone())?;

    let url = posting
        .job_url
        .clone()
        .or_else(|| posting.apply_url.clone())
        .unwrap_or_else(|| format!("https://jobs.ashbyhq.com/{board}"));
    let id = posting
        .id
        .clone()
        .unwrap_or_else(|| stable_fallback_id(ctx.company, &posting.title, &url));

    let created_at = posting
        .published_at
        .as_deref()
        .and_then(parse_iso_instant)
        .unwrap_or(ctx.now);

    let employment_type = posting
        .employment_type
        .as_deref()
        .map(canonical_employment_type);

    let tags = Vec::new();
    let classification = ctx.classifier.classify(RoleSignals {
        title: &posting.title,
        department: posting.department.as_deref(),
        team: posting.team.as_deref(),
        tags: &tags,
    });

    Ok(Job {
        id,
        source: ProviderKind::Ashby,
        company: ctx.company.to_string(),
        title: posting.title,
        department: posting.department,
        team: posting.team,
        location: posting.location,
        employment_type,
        is_remote: posting.is_remote,
        created_at,
        url,
        tags,
        classification,
        raw,
    })
}

pub struct AshbyClient {
    transport: Arc<dyn HttpTransport>,
    classifier: Arc<dyn JobClassifier>,
}

impl AshbyClient {
    pub fn new(transport: Arc<dyn HttpTransport>, classifier: Arc<dyn JobClassifier>) -> Self {
        Self {
            transport,
            classifier,
        }
    }

    fn config<'a>(&self, company: &'a Company) -> Result<&'a AshbyConfig> {
        match &company.config {
            ProviderConfig::Ashby(config) => Ok(config),
            other => Err(FetchError::ConfigMismatch {
                client: ProviderKind::Ashby,
                config: other.kind(),
            }),
        }
    }
}

#[async_trait]
impl JobsClient for AshbyClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ashby
    }

    async fn fetch_jobs(&self, company: &Company, options: &FetchOptions) -> Result<FetchResult> {
        let config = self.config(company)?;
        let url = format!(
            "{}/posting-api/job-board/{}",
            config.base(),
            config.job_board_name
        );
        debug!(company = %company.id, url = %url, "fetching ashby board");

        let envelope = engine::get_json(self.transport.as_ref(), &url, &options.cancel).await?;
        let postings = engine::array_field(&envelope, "jobs")?;

        let ctx = TransformContext {
            company: &company.id,
            classifier: self.classifier.as_ref(),
            now: Utc::now(),
        };
        let jobs = postings
            .into_iter()
            .map(|raw| transform(raw, &config.job_board_name, &ctx))
            .collect::<Result<Vec<_>>>()?;

        let result = engine::finalize(jobs, options);
        info!(
            company = %company.id,
            returned = result.metadata.total_count,
            software = result.metadata.software_count,
            "ashby fetch complete"
        );
        Ok(result)
    }
}
