//! Typed errors for provider fetches.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can branch
//! on the retryable/non-retryable split without string matching.

use thiserror::Error;

use crate::types::ProviderKind;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors raised by provider clients and the aggregation pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A client was handed a config for a different provider. Programmer
    /// error, never a transient failure.
    #[error("config mismatch: {client} client given a {config} config")]
    ConfigMismatch {
        client: ProviderKind,
        config: ProviderKind,
    },

    /// Non-success HTTP status from a provider.
    #[error("HTTP {status} from provider")]
    Http { status: u16, retryable: bool },

    /// Transport-level failure (DNS, connection reset, body read).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body did not match the provider's envelope shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A string did not name a known provider.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A company ID not present in the roster.
    #[error("unknown company: {0}")]
    UnknownCompany(String),

    /// The cancellation token fired before the fetch finished.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Classify an HTTP status: 5xx and 429 are retryable, other non-2xx
    /// statuses are not.
    pub fn from_status(status: u16) -> Self {
        Self::Http {
            status,
            retryable: status >= 500 || status == 429,
        }
    }

    pub fn network(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Box::new(source))
    }

    /// Whether the caller may safely retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { retryable, .. } => *retryable,
            Self::Network(_) | Self::Parse(_) => true,
            Self::ConfigMismatch { .. }
            | Self::UnknownProvider(_)
            | Self::UnknownCompany(_)
            | Self::Cancelled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(FetchError::from_status(500).is_retryable());
        assert!(FetchError::from_status(503).is_retryable());
        assert!(FetchError::from_status(429).is_retryable());
        assert!(!FetchError::from_status(404).is_retryable());
        assert!(!FetchError::from_status(401).is_retryable());
    }

    #[test]
    fn test_taxonomy_retryability() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(FetchError::network(io).is_retryable());
        assert!(!FetchError::UnknownProvider("bamboo".into()).is_retryable());
        assert!(!FetchError::Cancelled.is_retryable());
        assert!(!FetchError::ConfigMismatch {
            client: ProviderKind::Lever,
            config: ProviderKind::Workday,
        }
        .is_retryable());
    }
}
