//! Liveness probe errors

use thiserror::Error;

/// Errors that classify a remote cluster as not running
#[derive(Debug, Error)]
pub enum HealthCheckError {
    /// Transport failure: connection refused, TLS failure, or the 2s
    /// deadline expired before the exchange completed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered, but not with a success status
    #[error("liveness endpoint returned {status}")]
    Unhealthy {
        /// HTTP status the `/livez` endpoint returned
        status: reqwest::StatusCode,
    },
}
