//! Kubeconfig Secret watcher.
//!
//! Watches the Secret that carries the aggregated kubeconfig and nudges
//! the controller loop whenever the fleet document changes, so edits take
//! effect without waiting for the next resync tick.

use crate::error::ControllerError;
use futures::TryStreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use kube_runtime::watcher;
use kubeconfig::SecretRef;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Watches the aggregated kubeconfig Secret for changes.
pub struct Watcher {
    client: Client,
    source: SecretRef,
    trigger: mpsc::Sender<()>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(client: Client, source: SecretRef, trigger: mpsc::Sender<()>) -> Self {
        Self {
            client,
            source,
            trigger,
        }
    }

    /// Starts watching the kubeconfig Secret.
    pub async fn watch_kubeconfig_secret(&self) -> Result<(), ControllerError> {
        info!(
            namespace = %self.source.namespace,
            name = %self.source.name,
            "Starting kubeconfig Secret watcher"
        );

        let api: Api<Secret> = Api::namespaced(self.client.clone(), &self.source.namespace);
        let config =
            watcher::Config::default().fields(&format!("metadata.name={}", self.source.name));
        let mut stream = Box::pin(watcher(api, config));

        while let Some(event) = stream
            .try_next()
            .await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {e}")))?
        {
            match event {
                watcher::Event::Apply(secret) => {
                    let name = secret.metadata.name.as_deref().unwrap_or("<unknown>");
                    info!("kubeconfig Secret applied: {}", name);
                    self.trigger_pass();
                }
                watcher::Event::Delete(secret) => {
                    let name = secret.metadata.name.as_deref().unwrap_or("<unknown>");
                    // Nothing to reconcile until the Secret reappears.
                    warn!("kubeconfig Secret deleted: {}", name);
                }
                watcher::Event::Init => {
                    debug!("kubeconfig Secret watcher initialized");
                }
                watcher::Event::InitApply(secret) => {
                    // The startup pass already covers the initial state.
                    let name = secret.metadata.name.as_deref().unwrap_or("<unknown>");
                    debug!("kubeconfig Secret init apply: {}", name);
                }
                watcher::Event::InitDone => {
                    info!("kubeconfig Secret watcher initialization complete");
                }
            }
        }

        Ok(())
    }

    fn trigger_pass(&self) {
        // A full pass is already queued when the buffer is occupied.
        let _ = self.trigger.try_send(());
    }
}
