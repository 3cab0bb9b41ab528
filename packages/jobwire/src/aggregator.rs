//! Multi-company fan-out with per-company failure isolation.
//!
//! Every company is fetched concurrently with no cap, which is fine at
//! roster scale and a known scaling risk at larger ones. Progress is
//! reduced from immutable per-company deltas by a single reducer, so the
//! concurrent fetch futures never share mutable progress state; snapshots
//! go out over a watch channel for incremental observation.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::error::{FetchError, Result};
use crate::providers::ClientRegistry;
use crate::store::JobCache;
use crate::types::{Company, FetchOptions, FetchProgress, FetchResult, ProgressUpdate};

pub struct Aggregator {
    registry: ClientRegistry,
    cache: Arc<dyn JobCache>,
    companies: Vec<Company>,
    progress_tx: watch::Sender<FetchProgress>,
}

impl Aggregator {
    pub fn new(registry: ClientRegistry, cache: Arc<dyn JobCache>, companies: Vec<Company>) -> Self {
        let initial = FetchProgress::new(companies.iter().map(|company| company.id.clone()));
        let (progress_tx, _) = watch::channel(initial);
        Self {
            registry,
            cache,
            companies,
            progress_tx,
        }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Subscribe to progress snapshots. Snapshots update incrementally
    /// while an aggregate fetch is running.
    pub fn progress(&self) -> watch::Receiver<FetchProgress> {
        self.progress_tx.subscribe()
    }

    /// Fetch one company, propagating the typed error so the caller can
    /// make its own retry decision.
    pub async fn fetch_company(
        &self,
        company_id: &str,
        options: &FetchOptions,
    ) -> Result<FetchResult> {
        let company = self
            .companies
            .iter()
            .find(|company| company.id == company_id)
            .ok_or_else(|| FetchError::UnknownCompany(company_id.to_string()))?;

        let client = self.registry.client_for(company.config.kind());
        let result = client.fetch_jobs(company, options).await?;
        self.cache.store(&company.id, result.clone()).await;
        Ok(result)
    }

    /// Fetch every company concurrently. One company's failure never
    /// aborts or delays another; failed companies land in the result map
    /// with an empty set and an error message in the progress snapshot.
    pub async fn fetch_all(&self, options: FetchOptions) -> HashMap<String, FetchResult> {
        let mut progress = FetchProgress::new(self.companies.iter().map(|company| company.id.clone()));
        self.progress_tx.send_replace(progress.clone());

        let (delta_tx, mut delta_rx) = mpsc::unbounded_channel::<ProgressUpdate>();
        let options = &options;

        let fetches = self
            .companies
            .iter()
            .map(|company| {
                let delta_tx = delta_tx.clone();
                async move {
                    let _ = delta_tx.send(ProgressUpdate::Started {
                        company_id: company.id.clone(),
                    });

                    let client = self.registry.client_for(company.config.kind());
                    match client.fetch_jobs(company, options).await {
                        Ok(result) => {
                            self.cache.store(&company.id, result.clone()).await;
                            let _ = delta_tx.send(ProgressUpdate::Succeeded {
                                company_id: company.id.clone(),
                                job_count: result.jobs.len(),
                            });
                            (company.id.clone(), result)
                        }
                        Err(error) => {
                            warn!(
                                company = %company.id,
                                error = %error,
                                retryable = error.is_retryable(),
                                "company fetch failed"
                            );
                            let empty = FetchResult::empty();
                            self.cache.store(&company.id, empty.clone()).await;
                            let _ = delta_tx.send(ProgressUpdate::Failed {
                                company_id: company.id.clone(),
                                message: error.to_string(),
                            });
                            (company.id.clone(), empty)
                        }
                    }
                }
            })
            .collect::<Vec<_>>();
        drop(delta_tx);

        // Single reducer: applies deltas in arrival order and publishes a
        // fresh snapshot after each one. Ends when every fetch future has
        // dropped its sender.
        let reducer = async move {
            while let Some(update) = delta_rx.recv().await {
                progress.apply(&update);
                self.progress_tx.send_replace(progress.clone());
            }
            progress
        };

        let (results, final_progress) = tokio::join!(join_all(fetches), reducer);
        info!(
            companies = final_progress.total,
            completed = final_progress.completed,
            "aggregate fetch finished"
        );
        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, StaticClassifier};
    use crate::types::{CompanyStatus, GreenhouseConfig, LeverConfig, ProviderConfig};
    use serde_json::json;

    fn greenhouse_company(id: &str) -> Company {
        Company::new(id, ProviderConfig::Greenhouse(GreenhouseConfig::new(id)))
    }

    fn greenhouse_url(token: &str) -> String {
        format!("https://boards-api.greenhouse.io/v1/boards/{token}/jobs?content=true")
    }

    #[tokio::test]
    async fn test_single_company_propagates_typed_error() {
        let transport = MockTransport::new().with_status(&greenhouse_url("acme"), 429, "slow down");
        let registry = ClientRegistry::new(
            Arc::new(transport),
            Arc::new(StaticClassifier::everything()),
        );
        let aggregator = Aggregator::new(
            registry,
            Arc::new(crate::store::MemoryJobCache::new()),
            vec![greenhouse_company("acme")],
        );

        let err = aggregator
            .fetch_company("acme", &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 429, retryable: true }));

        let err = aggregator
            .fetch_company("ghost", &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UnknownCompany(_)));
    }

    #[tokio::test]
    async fn test_fetch_all_updates_cache() {
        let transport = MockTransport::new()
            .with_json(
                &greenhouse_url("acme"),
                json!({"jobs": [{"id": 1, "title": "A", "absolute_url": "https://g/1"}]}),
            )
            .with_json("https://api.lever.co/v0/postings/globex?mode=json", json!([]));
        let registry = ClientRegistry::new(
            Arc::new(transport),
            Arc::new(StaticClassifier::everything()),
        );
        let cache = Arc::new(crate::store::MemoryJobCache::new());
        let aggregator = Aggregator::new(
            registry,
            cache.clone(),
            vec![
                greenhouse_company("acme"),
                Company::new("globex", ProviderConfig::Lever(LeverConfig::new("globex"))),
            ],
        );

        let results = aggregator.fetch_all(FetchOptions::default()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results["acme"].jobs.len(), 1);
        assert_eq!(results["globex"].jobs.len(), 0);

        let cached = cache.jobs_for("acme").await.unwrap();
        assert_eq!(cached.jobs.len(), 1);

        let progress = aggregator.progress().borrow().clone();
        assert!(progress.is_finished());
        assert_eq!(
            progress.company("acme").unwrap().status,
            CompanyStatus::Success
        );
        assert_eq!(progress.company("acme").unwrap().job_count, Some(1));
    }
}
