//! Per-context remote client construction
//!
//! Builds one `kube::Client` per context directly from the in-memory
//! kubeconfig text. The document never touches the filesystem, so there is
//! no credential file to clean up.

use crate::error::KubeconfigError;
use crate::types::TargetCluster;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::collections::HashMap;
use tracing::debug;

/// Builds a ready-to-use client per context in the aggregated kubeconfig.
///
/// Each client is scoped to its context's cluster and user selection by
/// loading the document with that context as current. The whole batch fails
/// if any single context cannot be resolved or its client cannot be built;
/// partial fleets are not returned.
pub async fn build_remote_clients(
    text: &str,
    targets: &[TargetCluster],
) -> Result<HashMap<String, Client>, KubeconfigError> {
    let kubeconfig = Kubeconfig::from_yaml(text)?;

    let mut clients = HashMap::with_capacity(targets.len());
    for target in targets {
        let options = KubeConfigOptions {
            context: Some(target.context_name.clone()),
            ..KubeConfigOptions::default()
        };
        let config = Config::from_custom_kubeconfig(kubeconfig.clone(), &options)
            .await
            .map_err(|source| KubeconfigError::Context {
                context: target.context_name.clone(),
                source,
            })?;
        let client = Client::try_from(config)?;
        debug!(context = %target.context_name, cluster = %target.cluster_name, "built remote client");
        clients.insert(target.context_name.clone(), client);
    }

    Ok(clients)
}
