//! HealthChecker trait for mocking
//!
//! Abstracts the liveness probe so reconciler unit tests can script
//! per-cluster outcomes without reaching a network.

use crate::error::HealthCheckError;
use kubeconfig::RemoteApiServer;

/// Probes one remote control plane for liveness.
///
/// `Ok(())` means the endpoint was reachable and answered with a success
/// status; any error means the cluster's health is unknown. All async
/// methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait HealthChecker: Send + Sync {
    /// Runs a single liveness probe against `target`. No retries.
    async fn check(&self, target: &RemoteApiServer) -> Result<(), HealthCheckError>;
}
