//! Provider clients behind one trait, dispatched by a closed registry.
//!
//! Each module pairs the provider's wire types with the transform into the
//! canonical [`Job`](crate::types::Job) shape and the client that drives
//! the shared fetch engine. Adding a provider means a new
//! [`ProviderKind`] variant, a new module, and a new registry field; the
//! compiler walks you through the rest.

pub mod ashby;
mod engine;
pub mod greenhouse;
pub mod lever;
pub mod scraper;
pub mod workday;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::classify::JobClassifier;
use crate::error::Result;
use crate::transport::HttpTransport;
use crate::types::{Company, FetchOptions, FetchResult, ProviderKind};

pub use ashby::AshbyClient;
pub use greenhouse::GreenhouseClient;
pub use lever::LeverClient;
pub use scraper::ScraperClient;
pub use workday::WorkdayClient;

/// One ATS variant's fetch-and-normalize entry point.
#[async_trait]
pub trait JobsClient: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Fetch and canonicalize all postings for one company.
    async fn fetch_jobs(&self, company: &Company, options: &FetchOptions) -> Result<FetchResult>;
}

/// Context threaded into every transform call.
pub struct TransformContext<'a> {
    /// Tenant identifier stamped onto each job.
    pub company: &'a str,
    pub classifier: &'a dyn JobClassifier,
    /// The instant relative dates and missing dates resolve against.
    pub now: DateTime<Utc>,
}

/// Closed dispatch table: one client per provider variant.
pub struct ClientRegistry {
    greenhouse: GreenhouseClient,
    lever: LeverClient,
    ashby: AshbyClient,
    workday: WorkdayClient,
    scraper: ScraperClient,
}

impl ClientRegistry {
    pub fn new(transport: Arc<dyn HttpTransport>, classifier: Arc<dyn JobClassifier>) -> Self {
        Self {
            greenhouse: GreenhouseClient::new(transport.clone(), classifier.clone()),
            lever: LeverClient::new(transport.clone(), classifier.clone()),
            ashby: AshbyClient::new(transport.clone(), classifier.clone()),
            workday: WorkdayClient::new(transport.clone(), classifier.clone()),
            scraper: ScraperClient::new(transport, classifier),
        }
    }

    pub fn client_for(&self, kind: ProviderKind) -> &dyn JobsClient {
        match kind {
            ProviderKind::Greenhouse => &self.greenhouse,
            ProviderKind::Lever => &self.lever,
            ProviderKind::Ashby => &self.ashby,
            ProviderKind::Workday => &self.workday,
            ProviderKind::BackendScraper => &self.scraper,
        }
    }
}
