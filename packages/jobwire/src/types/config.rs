//! Provider configuration as a closed tagged union.
//!
//! One variant per ATS, so a config for the wrong provider is
//! unrepresentable at the type level; the wire tag is the provider name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::job::ProviderKind;

const GREENHOUSE_API_BASE: &str = "https://boards-api.greenhouse.io/v1";
const LEVER_API_BASE: &str = "https://api.lever.co/v0";
const ASHBY_API_BASE: &str = "https://api.ashbyhq.com";

/// Workday caps page sizes at 20; larger requests are silently shrunk by
/// the server, so the client never asks for more.
pub const WORKDAY_MAX_PAGE_SIZE: usize = 20;

/// One entry in the company roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Tenant identifier, unique within the roster.
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub config: ProviderConfig,
}

impl Company {
    pub fn new(id: impl Into<String>, config: ProviderConfig) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            config,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Provider-specific addressing plus optional overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProviderConfig {
    Greenhouse(GreenhouseConfig),
    Lever(LeverConfig),
    Ashby(AshbyConfig),
    Workday(WorkdayConfig),
    BackendScraper(ScraperConfig),
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::Greenhouse(_) => ProviderKind::Greenhouse,
            ProviderConfig::Lever(_) => ProviderKind::Lever,
            ProviderConfig::Ashby(_) => ProviderKind::Ashby,
            ProviderConfig::Workday(_) => ProviderKind::Workday,
            ProviderConfig::BackendScraper(_) => ProviderKind::BackendScraper,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreenhouseConfig {
    /// Board token from the public job-board URL.
    pub board_token: String,
    /// Proxy override; defaults to the public boards API.
    #[serde(default)]
    pub api_base: Option<String>,
}

impl GreenhouseConfig {
    pub fn new(board_token: impl Into<String>) -> Self {
        Self {
            board_token: board_token.into(),
            api_base: None,
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    pub(crate) fn base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(GREENHOUSE_API_BASE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeverConfig {
    /// Posting-site slug from `jobs.lever.co/<site>`.
    pub site: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl LeverConfig {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            api_base: None,
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    pub(crate) fn base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(LEVER_API_BASE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AshbyConfig {
    /// Board name from `jobs.ashbyhq.com/<name>`.
    pub job_board_name: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl AshbyConfig {
    pub fn new(job_board_name: impl Into<String>) -> Self {
        Self {
            job_board_name: job_board_name.into(),
            api_base: None,
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    pub(crate) fn base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(ASHBY_API_BASE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkdayConfig {
    /// Tenant host, e.g. `https://acme.wd5.myworkdayjobs.com`.
    pub host: String,
    pub tenant: String,
    /// Career-site identifier within the tenant.
    pub site: String,
    /// Requested page size; clamped to [`WORKDAY_MAX_PAGE_SIZE`].
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Default facet filters sent with every page request.
    #[serde(default)]
    pub applied_facets: Option<Value>,
    /// Base for posting URLs; defaults to the public career site.
    #[serde(default)]
    pub job_url_base: Option<String>,
}

impl WorkdayConfig {
    pub fn new(
        host: impl Into<String>,
        tenant: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            tenant: tenant.into(),
            site: site.into(),
            page_size: None,
            applied_facets: None,
            job_url_base: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_applied_facets(mut self, facets: Value) -> Self {
        self.applied_facets = Some(facets);
        self
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(WORKDAY_MAX_PAGE_SIZE)
            .clamp(1, WORKDAY_MAX_PAGE_SIZE)
    }

    pub(crate) fn jobs_endpoint(&self) -> String {
        format!(
            "{}/wday/cxs/{}/{}/jobs",
            self.host.trim_end_matches('/'),
            self.tenant,
            self.site
        )
    }

    pub(crate) fn job_url_base(&self) -> String {
        match &self.job_url_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("{}/en-US/{}", self.host.trim_end_matches('/'), self.site),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Company slug known to the scraper service.
    pub slug: String,
    /// Scraper service base URL; internal, so always explicit.
    pub api_base: String,
}

impl ScraperConfig {
    pub fn new(slug: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            api_base: api_base.into(),
        }
    }

    pub(crate) fn base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}
