//! Liveness probe over HTTPS
//!
//! Sends `GET <endpoint>/livez` with certificate verification disabled and
//! a 2-second deadline covering the whole exchange, connection setup
//! included. See <https://kubernetes.io/docs/reference/using-api/health-checks/>.

use crate::error::HealthCheckError;
use crate::health_trait::HealthChecker;
use kubeconfig::RemoteApiServer;
use std::time::Duration;
use tracing::debug;

/// Deadline for one probe, including connection setup.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const LIVEZ_PATH: &str = "/livez";

/// Probes remote API servers on their `/livez` endpoint.
pub struct LivenessProbe {
    client: reqwest::Client,
}

impl LivenessProbe {
    /// Creates a probe with a shared HTTP client.
    ///
    /// The probe only tests reachability and never authenticates, so
    /// certificate verification is skipped.
    pub fn new() -> Result<Self, HealthCheckError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(PROBE_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl std::fmt::Debug for LivenessProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LivenessProbe").finish_non_exhaustive()
    }
}

fn livez_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), LIVEZ_PATH)
}

#[async_trait::async_trait]
impl HealthChecker for LivenessProbe {
    async fn check(&self, target: &RemoteApiServer) -> Result<(), HealthCheckError> {
        let url = livez_url(&target.endpoint);
        debug!(cluster = %target.name, %url, "probing liveness endpoint");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        // The body is informational only ("ok" on a healthy control plane).
        let body = response.text().await.unwrap_or_default();
        debug!(cluster = %target.name, %status, body = %body, "liveness response");

        if !status.is_success() {
            return Err(HealthCheckError::Unhealthy { status });
        }
        Ok(())
    }
}
