//! Lever postings client.
//!
//! `GET {base}/postings/{site}?mode=json` returns a bare JSON array.
//! Posting dates arrive as epoch milliseconds; `workplaceType` drives the
//! remote flag.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::classify::{JobClassifier, RoleSignals};
use crate::error::{FetchError, Result};
use crate::normalize::sanitize_tags;
use crate::transport::HttpTransport;
use crate::types::{
    Company, FetchOptions, FetchResult, Job, LeverConfig, ProviderConfig, ProviderKind,
};

use super::{engine, JobsClient, TransformContext};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverPosting {
    pub id: String,
    /// Lever calls the title `text`.
    pub text: String,
    #[serde(default)]
    pub categories: LeverCategories,
    #[serde(default)]
    pub workplace_type: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_at: Option<i64>,
    pub hosted_url: String,
    /// Mixed-typed on some boards; sanitized, never trusted.
    #[serde(default)]
    pub tags: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeverCategories {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub commitment: Option<String>,
}

/// Map one raw Lever posting into the canonical shape.
pub fn transform(raw: Value, ctx: &TransformContext<'_>) -> Result<Job> {
    let posting: LeverPosting = serde_json::from_value(raw.clone())?;

    let created_at = posting
        .created_at
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        .unwrap_or(ctx.now);

    let is_remote = posting
        .workplace_type
        .as_deref()
        .map(|workplace| workplace.eq_ignore_ascii_case("remote"));

    let tags = sanitize_tags(posting.tags.as_ref());
    let classification = ctx.classifier.classify(RoleSignals {
        title: &posting.text,
        department: posting.categories.department.as_deref(),
        team: posting.categories.team.as_deref(),
        tags: &tags,
    });

    Ok(Job {
        id: posting.id,
        source: ProviderKind::Lever,
        company: ctx.company.to_string(),
        title: posting.text,
        department: posting.categories.department,
        team: posting.categories.team,
        location: posting.categories.location,
        employment_type: posting.categories.commitment,
        is_remote,
        created_at,
        url: posting.hosted_url,
        tags,
        classification,
        raw,
    })
}

pub struct LeverClient {
    transport: Arc<dyn HttpTransport>,
    classifier: Arc<dyn JobClassifier>,
}

impl LeverClient {
    pub fn new(transport: Arc<dyn HttpTransport>, classifier: Arc<dyn JobClassifier>) -> Self {
        Self {
            transport,
            classifier,
        }
    }

    fn config<'a>(&self, company: &'a Company) -> Result<&'a LeverConfig> {
        match &company.config {
            ProviderConfig::Lever(config) => Ok(config),
            other => Err(FetchError::ConfigMismatch {
                client: ProviderKind::Lever,
                config: other.kind(),
            }),
        }
    }
}

#[async_trait]
impl JobsClient for LeverClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Lever
    }

    async fn fetch_jobs(&self, company: &Company, options: &FetchOptions) -> Result<FetchResult> {
        let config = self.config(company)?;
        let url = format!("{}/postings/{}?mode=json", config.base(), config.site);
        debug!(company = %company.id, url = %url, "fetching lever postings");

        let envelope = engine::get_json(self.transport.as_ref(), &url, &options.cancel).await?;
        // Lever has no wrapper object; the body is the array.
        let postings = envelope.as_array().cloned().ok_or_else(|| {
            use serde::de::Error as _;
            FetchError::Parse(serde_json::Error::custom("expected a postings array"))
        })?;

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
            "lever fetch complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, StaticClassifier};
    use serde_json::json;

    #[test]
    fn test_transform_epoch_millis_and_categories() {
        let classifier = StaticClassifier::everything();
        let ctx = TransformContext {
            company: "globex",
            classifier: &classifier,
            now: Utc::now(),
        };
        let raw = json!({
            "id": "a1b2c3",
            "text": "Backend Engineer",
            "categories": {
                "team": "Core Services",
                "department": "Engineering",
                "location": "Denver, CO",
                "commitment": "Full-time"
            },
            "workplaceType": "on-site",
            "createdAt": 1753920000000i64,
            "hostedUrl": "https://jobs.lever.co/globex/a1b2c3",
            "tags": ["rust", ["grpc", "kafka"], null, ""]
        });

        let job = transform(raw, &ctx).unwrap();
        assert_eq!(job.id, "a1b2c3");
        assert_eq!(job.team.as_deref(), Some("Core Services"));
        assert_eq!(job.employment_type.as_deref(), Some("Full-time"));
        assert_eq!(job.is_remote, Some(false));
        assert_eq!(job.tags, vec!["rust", "grpc", "kafka"]);
        assert_eq!(job.created_at.timestamp_millis(), 1753920000000);
    }

    #[test]
    fn test_transform_remote_workplace() {
        let classifier = StaticClassifier::everything();
        let ctx = TransformContext {
            company: "globex",
            classifier: &classifier,
            now: Utc::now(),
        };
        let raw = json!({
            "id": "x",
            "text": "SRE",
            "workplaceType": "remote",
            "hostedUrl": "https://jobs.lever.co/globex/x"
        });

        let job = transform(raw, &ctx).unwrap();
        assert_eq!(job.is_remote, Some(true));
        assert_eq!(job.created_at, ctx.now);
        assert!(job.tags.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_bare_array_envelope() {
        let transport = MockTransport::new().with_json(
            "https://api.lever.co/v0/postings/globex?mode=json",
            json!([
                {"id": "1", "text": "A", "hostedUrl": "https://l/1"},
                {"id": "2", "text": "B", "hostedUrl": "https://l/2"}
            ]),
        );
        let client = LeverClient::new(
            Arc::new(transport),
            Arc::new(StaticClassifier::everything()),
        );
        let company = Company::new("globex", ProviderConfig::Lever(LeverConfig::new("globex")));

        let result = client
            .fetch_jobs(&company, &FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(result.jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_object_envelope_is_parse_error() {
        let transport = MockTransport::new().with_json(
            "https://api.lever.co/v0/postings/globex?mode=json",
            json!({"unexpected": "shape"}),
        );
        let client = LeverClient::new(
            Arc::new(transport),
            Arc::new(StaticClassifier::everything()),
        );
        let company = Company::new("globex", ProviderConfig::Lever(LeverConfig::new("globex")));

        let err = client
            .fetch_jobs(&company, &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
