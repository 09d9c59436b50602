//! Cluster Detector Controller
//!
//! Discovers the fleet of remote clusters described by an aggregated
//! kubeconfig Secret, probes each cluster's control-plane `/livez`
//! endpoint, and publishes the result as one `ClusterDetector` resource
//! per context.
//!
//! Passes run on a periodic resync and whenever the kubeconfig Secret
//! changes, so `kubectl get clusterdetectors` always answers "which of my
//! remote clusters are reachable right now?".

mod controller;
mod reconciler;
mod watcher;
mod error;
#[cfg(test)]
mod reconciler_test;

use crate::controller::{Controller, Settings};
use crate::error::ControllerError;
use anyhow::Result;
use kubeconfig::SecretRef;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting Cluster Detector Controller");

    // Load configuration from environment variables
    let secret_namespace = env::var("KUBECONFIG_SECRET_NAMESPACE")
        .unwrap_or_else(|_| "kubeconfig".to_string());
    let secret_name = env::var("KUBECONFIG_SECRET_NAME")
        .unwrap_or_else(|_| "config".to_string());
    let secret_key = env::var("KUBECONFIG_SECRET_KEY")
        .unwrap_or_else(|_| "config".to_string());
    let detector_namespace = env::var("DETECTOR_NAMESPACE")
        .unwrap_or_else(|_| "fleet-detector-system".to_string());
    let resync_interval_secs: u64 = parse_env("RESYNC_INTERVAL_SECS", 30)?;
    let probe_concurrency: usize = parse_env("PROBE_CONCURRENCY", 8)?;

    info!("Configuration:");
    info!("  Kubeconfig secret: {}/{} (key {})", secret_namespace, secret_name, secret_key);
    info!("  Detector namespace: {}", detector_namespace);
    info!("  Resync interval: {}s", resync_interval_secs);
    info!("  Probe concurrency: {}", probe_concurrency);

    let settings = Settings {
        kubeconfig_secret: SecretRef {
            namespace: secret_namespace,
            name: secret_name,
            key: secret_key,
        },
        detector_namespace,
        resync_interval_secs,
        probe_concurrency,
    };

    // Initialize and run controller
    let controller = Controller::new(settings).await?;
    controller.run().await?;

    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ControllerError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| {
            ControllerError::InvalidConfig(format!("{key} must be a number, got {raw:?}"))
        }),
        Err(_) => Ok(default),
    }
}
