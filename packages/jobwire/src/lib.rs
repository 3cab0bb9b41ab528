//! Multi-provider job posting aggregation.
//!
//! jobwire fetches postings from external applicant-tracking systems
//! (Greenhouse, Lever, Ashby, Workday, plus an in-house scraper feed),
//! normalizes them into one canonical [`Job`] record, and serves two read
//! models over the result: a filtered list ([`filter_jobs`]) and a
//! time-bucketed histogram ([`bucket_jobs`]).
//!
//! Provider quirks stay inside their modules: Workday's stateful offset
//! pagination and relative dates, Lever's bare-array envelope and epoch
//! millisecond timestamps, Ashby's employment-type vocabulary. The
//! aggregator fans fetches out across the whole roster with independent
//! failure domains, so one broken board never empties the page.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jobwire::{
//!     Aggregator, ClientRegistry, Company, FetchOptions, GreenhouseConfig,
//!     MemoryJobCache, ProviderConfig, ReqwestTransport,
//! };
//!
//! let registry = ClientRegistry::new(Arc::new(ReqwestTransport::new()), classifier);
//! let cache = Arc::new(MemoryJobCache::new());
//! let roster = vec![Company::new(
//!     "acme",
//!     ProviderConfig::Greenhouse(GreenhouseConfig::new("acme")),
//! )];
//! let aggregator = Aggregator::new(registry, cache, roster);
//!
//! let mut progress = aggregator.progress();
//! let results = aggregator.fetch_all(FetchOptions::default()).await;
//! ```

pub mod aggregator;
pub mod bucket;
pub mod classify;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod providers;
pub mod store;
pub mod testing;
pub mod transport;
pub mod types;

pub use aggregator::Aggregator;
pub use bucket::{bucket_jobs, bucket_jobs_at, bucket_stats, cumulative_counts, BucketStats, TimeBucket};
pub use classify::{JobClassifier, RoleSignals};
pub use error::{FetchError, Result};
pub use filter::{filter_jobs, filter_jobs_at, is_united_states_location};
pub use providers::{ClientRegistry, JobsClient};
pub use store::{JobCache, MemoryJobCache};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};
pub use types::{
    AshbyConfig, Classification, Company, CompanyProgress, CompanyStatus, FetchMetadata,
    FetchOptions, FetchProgress, FetchResult, FilterSet, GreenhouseConfig, Job, LeverConfig,
    ProgressUpdate, ProviderConfig, ProviderKind, RoleCategory, ScraperConfig, SearchTag, TagMode,
    TimeWindow, WorkdayConfig,
};
