//! The canonical job record all transformers produce.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Which ATS a posting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    Greenhouse,
    Lever,
    Ashby,
    Workday,
    BackendScraper,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Greenhouse => "greenhouse",
            ProviderKind::Lever => "lever",
            ProviderKind::Ashby => "ashby",
            ProviderKind::Workday => "workday",
            ProviderKind::BackendScraper => "backend-scraper",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = FetchError;

    /// The only string entry point into the closed provider set.
    fn from_str(s: &str) -> Result<Self, FetchError> {
        match s {
            "greenhouse" => Ok(ProviderKind::Greenhouse),
            "lever" => Ok(ProviderKind::Lever),
            "ashby" => Ok(ProviderKind::Ashby),
            "workday" => Ok(ProviderKind::Workday),
            "backend-scraper" => Ok(ProviderKind::BackendScraper),
            other => Err(FetchError::UnknownProvider(other.to_string())),
        }
    }
}

/// Role bucket assigned by the caller-supplied classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleCategory {
    Frontend,
    Backend,
    Fullstack,
    Mobile,
    Data,
    MachineLearning,
    Devops,
    Security,
    Qa,
    Product,
    Design,
    Other,
}

/// Output of the caller-supplied role classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub is_software_adjacent: bool,
    pub category: RoleCategory,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    pub matched_keywords: Vec<String>,
}

/// Canonical job posting, immutable once a transformer produces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Stable within one provider; not guaranteed globally unique.
    pub id: String,
    pub source: ProviderKind,
    /// Tenant identifier from the company roster.
    pub company: String,
    pub title: String,
    pub department: Option<String>,
    pub team: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub is_remote: Option<bool>,
    /// Posting instant. Relative provider dates resolve to fixed UTC
    /// midnights at transform time.
    pub created_at: DateTime<Utc>,
    pub url: String,
    /// Sanitized: non-empty strings only, one level deep, source order.
    pub tags: Vec<String>,
    pub classification: Classification,
    /// Original provider payload, kept for debugging.
    #[serde(default)]
    pub raw: Value,
}

// `raw` is debugging payload and never participates in equality.
impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.source == other.source
            && self.company == other.company
            && self.title == other.title
            && self.department == other.department
            && self.team == other.team
            && self.location == other.location
            && self.employment_type == other.employment_type
            && self.is_remote == other.is_remote
            && self.created_at == other.created_at
            && self.url == other.url
            && self.tags == other.tags
            && self.classification == other.classification
    }
}
