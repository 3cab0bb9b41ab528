//! Testing utilities including mock implementations.
//!
//! These are useful for exercising the pipeline without a network or a
//! real classifier.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::classify::{JobClassifier, RoleSignals};
use crate::error::{FetchError, Result};
use crate::transport::{HttpTransport, TransportResponse};
use crate::types::{Classification, Job, ProviderKind, RoleCategory};

/// One request observed by the mock transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum CannedResponse {
    Reply { status: u16, body: String },
    NetworkFailure(String),
}

/// Mock transport with URL-keyed response queues and call recording.
///
/// A queue's last response is sticky, so a paginating client can poll one
/// endpoint more times than there are canned replies. Requests to a URL
/// with no canned response fail as network errors.
#[derive(Default)]
pub struct MockTransport {
    responses: RwLock<HashMap<String, VecDeque<CannedResponse>>>,
    requests: RwLock<Vec<RecordedRequest>>,
    cancel_triggers: RwLock<Vec<(String, usize, CancellationToken)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 JSON reply for a URL.
    pub fn with_json(self, url: impl Into<String>, body: Value) -> Self {
        self.push(
            url.into(),
            CannedResponse::Reply {
                status: 200,
                body: body.to_string(),
            },
        );
        self
    }

    /// Queue an arbitrary-status reply for a URL.
    pub fn with_status(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.push(
            url.into(),
            CannedResponse::Reply {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Queue a transport-level failure for a URL.
    pub fn with_network_error(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(url.into(), CannedResponse::NetworkFailure(message.into()));
        self
    }

    /// Cancel `token` once the URL has served `after` requests.
    pub fn with_cancel_after(
        self,
        url: impl Into<String>,
        after: usize,
        token: CancellationToken,
    ) -> Self {
        self.cancel_triggers
            .write()
            .unwrap()
            .push((url.into(), after, token));
        self
    }

    fn push(&self, url: String, response: CannedResponse) {
        self.responses
            .write()
            .unwrap()
            .entry(url)
            .or_default()
            .push_back(response);
    }

    /// All requests observed so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }

    fn respond(
        &self,
        method: &'static str,
        url: &str,
        body: Option<Value>,
    ) -> Result<TransportResponse> {
        self.requests.write().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body,
        });

        let response = {
            let mut responses = self.responses.write().unwrap();
            let queue = responses.get_mut(url);
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        let served = self
            .requests
            .read()
            .unwrap()
            .iter()
            .filter(|request| request.url == url)
            .count();
        for (trigger_url, after, token) in self.cancel_triggers.read().unwrap().iter() {
            if trigger_url == url && served >= *after {
                token.cancel();
            }
        }

        match response {
            Some(CannedResponse::Reply { status, body }) => Ok(TransportResponse { status, body }),
            Some(CannedResponse::NetworkFailure(message)) => {
                Err(FetchError::network(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    message,
                )))
            }
            None => Err(FetchError::network(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("no canned response for {url}"),
            ))),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str, cancel: &CancellationToken) -> Result<TransportResponse> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        self.respond("GET", url, None)
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        self.respond("POST", url, Some(body.clone()))
    }
}

/// Deterministic classifier: a job is software-adjacent when its title
/// contains one of the configured needles, or always when there are none.
pub struct StaticClassifier {
    needles: Vec<String>,
}

impl StaticClassifier {
    /// Treat every job as software-adjacent.
    pub fn everything() -> Self {
        Self {
            needles: Vec::new(),
        }
    }

    /// Software-adjacent only when the title contains a needle.
    pub fn with_needles(needles: &[&str]) -> Self {
        Self {
            needles: needles.iter().map(|needle| needle.to_lowercase()).collect(),
        }
    }
}

impl JobClassifier for StaticClassifier {
    fn classify(&self, signals: RoleSignals<'_>) -> Classification {
        let title = signals.title.to_lowercase();
        let matched: Vec<String> = self
            .needles
            .iter()
            .filter(|needle| title.contains(needle.as_str()))
            .cloned()
            .collect();
        Classification {
            is_software_adjacent: self.needles.is_empty() || !matched.is_empty(),
            category: RoleCategory::Other,
            confidence: 1.0,
            matched_keywords: matched,
        }
    }
}

/// Minimal canonical job for engine tests.
pub fn job_fixture(id: &str, created_at: DateTime<Utc>) -> Job {
    Job {
        id: id.to_string(),
        source: ProviderKind::Greenhouse,
        company: "acme".to_string(),
        title: format!("Job {id}"),
        department: None,
        team: None,
        location: None,
        employment_type: None,
        is_remote: None,
        created_at,
        url: format!("https://example.com/jobs/{id}"),
        tags: Vec::new(),
        classification: Classification {
            is_software_adjacent: true,
            category: RoleCategory::Other,
            confidence: 1.0,
            matched_keywords: Vec::new(),
        },
        raw: Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_then_sticky_last() {
        let transport = MockTransport::new()
            .with_json("https://x", json!({"page": 1}))
            .with_json("https://x", json!({"page": 2}));
        let cancel = CancellationToken::new();

        let first = transport.get("https://x", &cancel).await.unwrap();
        let second = transport.get("https://x", &cancel).await.unwrap();
        let third = transport.get("https://x", &cancel).await.unwrap();
        assert!(first.body.contains('1'));
        assert!(second.body.contains('2'));
        assert!(third.body.contains('2'));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_unknown_url_is_network_error() {
        let transport = MockTransport::new();
        let cancel = CancellationToken::new();
        let err = transport.get("https://nowhere", &cancel).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn test_static_classifier_needles() {
        let classifier = StaticClassifier::with_needles(&["engineer"]);
        let yes = classifier.classify(RoleSignals {
            title: "Software Engineer",
            department: None,
            team: None,
            tags: &[],
        });
        assert!(yes.is_software_adjacent);
        assert_eq!(yes.matched_keywords, vec!["engineer"]);

        let no = classifier.classify(RoleSignals {
            title: "Accountant",
            department: None,
            team: None,
            tags: &[],
        });
        assert!(!no.is_software_adjacent);
    }
}
