//! Mock HealthChecker for unit testing
//!
//! Scripts per-cluster probe outcomes and optional artificial latency so
//! reconciler tests can exercise classification, isolation, and fan-out
//! without a running cluster.

use crate::error::HealthCheckError;
use crate::health_trait::HealthChecker;
use kubeconfig::RemoteApiServer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct Outcome {
    healthy: bool,
    delay: Option<Duration>,
}

/// Mock HealthChecker for testing
///
/// Unknown cluster names probe as unhealthy (HTTP 503). Every probed
/// target is recorded so tests can assert join correctness.
#[derive(Clone, Default)]
pub struct MockHealthChecker {
    outcomes: Arc<Mutex<HashMap<String, Outcome>>>,
    probed: Arc<Mutex<Vec<RemoteApiServer>>>,
}

impl MockHealthChecker {
    /// Creates an empty mock; every probe fails until outcomes are scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a healthy probe outcome for `cluster`.
    pub fn healthy(self, cluster: &str) -> Self {
        self.script(cluster, true, None);
        self
    }

    /// Scripts an unhealthy probe outcome for `cluster`.
    pub fn unhealthy(self, cluster: &str) -> Self {
        self.script(cluster, false, None);
        self
    }

    /// Scripts a healthy outcome that takes `delay` to arrive.
    pub fn healthy_after(self, cluster: &str, delay: Duration) -> Self {
        self.script(cluster, true, Some(delay));
        self
    }

    /// Scripts an unhealthy outcome that takes `delay` to arrive.
    pub fn unhealthy_after(self, cluster: &str, delay: Duration) -> Self {
        self.script(cluster, false, Some(delay));
        self
    }

    /// Returns every target probed so far, in completion order.
    pub fn probed(&self) -> Vec<RemoteApiServer> {
        self.probed.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn script(&self, cluster: &str, healthy: bool, delay: Option<Duration>) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.insert(cluster.to_string(), Outcome { healthy, delay });
        }
    }
}

#[async_trait::async_trait]
impl HealthChecker for MockHealthChecker {
    async fn check(&self, target: &RemoteApiServer) -> Result<(), HealthCheckError> {
        let outcome = self
            .outcomes
            .lock()
            .ok()
            .and_then(|outcomes| outcomes.get(&target.name).cloned());

        if let Some(delay) = outcome.as_ref().and_then(|o| o.delay) {
            tokio::time::sleep(delay).await;
        }

        if let Ok(mut probed) = self.probed.lock() {
            probed.push(target.clone());
        }

        match outcome {
            Some(Outcome { healthy: true, .. }) => Ok(()),
            _ => Err(HealthCheckError::Unhealthy {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            }),
        }
    }
}
