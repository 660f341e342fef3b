//! Error and failure-classification types for the sync engine.

use thiserror::Error;

/// Errors from the remote file store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The store rejected our credentials (HTTP 401/403).
    #[error("authentication rejected by remote store")]
    Unauthorized,

    /// The store asked us to back off (HTTP 429).
    #[error("remote store rate limited the request")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("unexpected status {status} from remote store")]
    Status {
        /// The HTTP status code received.
        status: u16,
    },

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Network(err.to_string())
    }
}

/// How a sync-cycle failure counts toward the circuit breaker.
///
/// All three classes feed the same 2-failure breaker; the distinction
/// exists for the auth-specific counter and for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Credentials were rejected.
    Auth,
    /// Rate limiting; expected to clear on its own.
    Transient,
    /// Anything else: transport failures, unexpected statuses, local I/O.
    Network,
}

/// A failure inside one sync cycle: either the remote store or local
/// storage.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The remote store failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Local storage failed mid-cycle.
    #[error("local storage error: {0}")]
    Local(#[from] std::io::Error),
}

impl CycleError {
    /// Classify for the circuit breaker.
    pub fn class(&self) -> FailureClass {
        match self {
            CycleError::Remote(RemoteError::Unauthorized) => FailureClass::Auth,
            CycleError::Remote(RemoteError::RateLimited) => FailureClass::Transient,
            CycleError::Remote(_) | CycleError::Local(_) => FailureClass::Network,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(
            CycleError::Remote(RemoteError::Unauthorized).class(),
            FailureClass::Auth
        );
        assert_eq!(
            CycleError::Remote(RemoteError::RateLimited).class(),
            FailureClass::Transient
        );
        assert_eq!(
            CycleError::Remote(RemoteError::Status { status: 500 }).class(),
            FailureClass::Network
        );
        assert_eq!(
            CycleError::Local(std::io::Error::other("disk full")).class(),
            FailureClass::Network
        );
    }
}
