//! Controller-specific error types.
//!
//! This module defines error types specific to the Cluster Detector
//! controller that are not covered by upstream library errors.

use thiserror::Error;

/// Errors that can occur in the Cluster Detector controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("kubeconfig error: {0}")]
    Kubeconfig(#[from] kubeconfig::KubeconfigError),

    #[error("health check error: {0}")]
    HealthCheck(#[from] healthcheck::HealthCheckError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Resource watch failed: {0}")]
    Watch(String),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}
