//! ClusterDetector CRD
//!
//! Tracks one remote cluster context from the aggregated kubeconfig and
//! records whether its control plane answered the last liveness probe.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "fleet.microscaler.io",
    version = "v1alpha1",
    kind = "ClusterDetector",
    namespaced,
    status = "ClusterDetectorStatus",
    printcolumn = r#"{"name":"CONTEXT","type":"string","jsonPath":".spec.context"}"#,
    printcolumn = r#"{"name":"CLUSTER","type":"string","jsonPath":".spec.cluster"}"#,
    printcolumn = r#"{"name":"USER","type":"string","jsonPath":".spec.user"}"#,
    printcolumn = r#"{"name":"CLUSTERSTATUS","type":"string","jsonPath":".status.clusterStatus"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDetectorSpec {
    /// Context name from the aggregated kubeconfig (also the CR name)
    pub context: String,

    /// Cluster identity the context binds
    pub cluster: String,

    /// User/credential identity the context binds
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDetectorStatus {
    /// Outcome of the most recent liveness probe
    pub cluster_status: ClusterStatus,

    /// When the probe last transitioned this status; untouched while the
    /// outcome stays the same, so an unchanged fleet rewrites nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_probed: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
/// Remote cluster health as seen by the liveness prober
///
/// Serializes as PascalCase ("Running", "Unknown") to match what
/// `kubectl get clusterdetectors` is expected to display.
#[serde(rename_all = "PascalCase")]
pub enum ClusterStatus {
    /// Control plane answered the liveness probe with a success status
    Running,

    /// Probe failed: transport error, timeout, or an unhealthy response
    #[default]
    Unknown,
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterStatus::Running => write!(f, "Running"),
            ClusterStatus::Unknown => write!(f, "Unknown"),
        }
    }
}
