//! Main controller implementation.
//!
//! This module contains the `Controller` struct that orchestrates fleet
//! reconciliation passes: a periodic resync, an immediate pass on
//! kubeconfig changes, and supervision of the Secret watcher task.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use crds::ClusterDetector;
use healthcheck::LivenessProbe;
use kube::{Api, Client};
use kubeconfig::{SecretRef, read_kubeconfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Runtime configuration for the controller, read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Secret carrying the aggregated kubeconfig
    pub kubeconfig_secret: SecretRef,
    /// Namespace the ClusterDetector records live in
    pub detector_namespace: String,
    /// Seconds between full fleet passes
    pub resync_interval_secs: u64,
    /// Upper bound on concurrent liveness probes
    pub probe_concurrency: usize,
}

/// Main controller for fleet liveness detection.
pub struct Controller {
    client: Client,
    reconciler: Arc<Reconciler>,
    source: SecretRef,
    resync: Duration,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(settings: Settings) -> Result<Self, ControllerError> {
        info!("Initializing Cluster Detector Controller");

        let client = Client::try_default().await?;
        let detector_api: Api<ClusterDetector> =
            Api::namespaced(client.clone(), &settings.detector_namespace);
        let probe = LivenessProbe::new()?;
        let reconciler = Reconciler::new(detector_api, Arc::new(probe), settings.probe_concurrency);

        Ok(Self {
            client,
            reconciler: Arc::new(reconciler),
            source: settings.kubeconfig_secret,
            resync: Duration::from_secs(settings.resync_interval_secs),
        })
    }

    /// Runs the controller until the watcher fails.
    ///
    /// Passes never overlap: the loop is serial, so this process writes
    /// each status record at most once at a time. Cross-process overlap is
    /// handled by the reconciler's conflict retry.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Cluster Detector Controller running");

        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
        let watcher = Watcher::new(self.client.clone(), self.source.clone(), trigger_tx);
        let mut watcher_task =
            tokio::spawn(async move { watcher.watch_kubeconfig_secret().await });

        // The first tick fires immediately, which doubles as the startup pass.
        let mut resync = tokio::time::interval(self.resync);
        resync.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = resync.tick() => {
                    self.run_pass("resync").await;
                }
                Some(()) = trigger_rx.recv() => {
                    self.run_pass("kubeconfig change").await;
                }
                result = &mut watcher_task => {
                    return Err(match result {
                        Ok(Ok(())) => {
                            ControllerError::Watch("kubeconfig watcher exited".to_string())
                        }
                        Ok(Err(e)) => e,
                        Err(e) => {
                            ControllerError::Watch(format!("kubeconfig watcher panicked: {e}"))
                        }
                    });
                }
            }
        }
    }

    /// One full pass: read the document, then reconcile the fleet.
    ///
    /// A structural read failure aborts the pass but not the controller;
    /// the next trigger or tick retries from scratch.
    async fn run_pass(&self, reason: &str) {
        info!(reason, "starting fleet reconciliation pass");
        match read_kubeconfig(self.client.clone(), &self.source).await {
            Ok((_raw, servers, targets)) => {
                info!(
                    endpoints = servers.len(),
                    contexts = targets.len(),
                    "reconciling fleet"
                );
                if let Err(e) = self.reconciler.reconcile_fleet(&servers, &targets).await {
                    error!(error = %e, "fleet reconciliation pass failed");
                }
            }
            Err(e) => error!(error = %e, "failed to read aggregated kubeconfig"),
        }
    }
}
