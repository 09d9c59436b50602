//! Kubeconfig retrieval from the backing Secret
//!
//! The aggregated kubeconfig is provisioned out of band as a Secret; this
//! module fetches it and hands the raw text to the parser.

use crate::error::KubeconfigError;
use crate::parser::parse_kubeconfig;
use crate::types::{RemoteApiServer, TargetCluster};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use tracing::debug;

/// Where the aggregated kubeconfig document lives.
#[derive(Debug, Clone)]
pub struct SecretRef {
    /// Secret namespace
    pub namespace: String,
    /// Secret name
    pub name: String,
    /// Data key holding the kubeconfig text
    pub key: String,
}

impl Default for SecretRef {
    fn default() -> Self {
        Self {
            namespace: "kubeconfig".to_string(),
            name: "config".to_string(),
            key: "config".to_string(),
        }
    }
}

/// Fetches the aggregated kubeconfig Secret and parses it.
///
/// Returns the raw document text alongside the parsed records so the caller
/// can feed the same text to [`crate::build_remote_clients`]. Any failure
/// here is structural and fatal to the current reconciliation pass: the
/// Secret is unreachable, the key is missing, the value is not UTF-8, or
/// the document is not YAML.
pub async fn read_kubeconfig(
    client: Client,
    source: &SecretRef,
) -> Result<(String, Vec<RemoteApiServer>, Vec<TargetCluster>), KubeconfigError> {
    let secrets: Api<Secret> = Api::namespaced(client, &source.namespace);
    let secret = secrets.get(&source.name).await?;

    let data = secret.data.unwrap_or_default();
    let bytes = data.get(&source.key).ok_or_else(|| KubeconfigError::MissingKey {
        namespace: source.namespace.clone(),
        name: source.name.clone(),
        key: source.key.clone(),
    })?;
    let text = String::from_utf8(bytes.0.clone())?;

    let (servers, targets) = parse_kubeconfig(&text)?;
    debug!(
        secret = %source.name,
        namespace = %source.namespace,
        endpoints = servers.len(),
        contexts = targets.len(),
        "read aggregated kubeconfig"
    );

    Ok((text, servers, targets))
}
