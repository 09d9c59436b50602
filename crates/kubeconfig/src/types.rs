//! Parsed kubeconfig records
//!
//! One `RemoteApiServer` per cluster entry and one `TargetCluster` per
//! context entry, both emitted in document order on every parse pass.

/// One named remote control plane reachable at an HTTP(S) endpoint.
///
/// Rebuilt on every parse pass and consumed directly by the liveness
/// prober; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteApiServer {
    /// Cluster name, the join key for context entries
    pub name: String,

    /// API server URL, e.g. `https://10.0.0.1:6443`
    pub endpoint: String,
}

/// One selectable context in the aggregated kubeconfig: which cluster
/// identity and which user credential identity the context binds together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCluster {
    /// Context name, the key for the persisted ClusterDetector record
    pub context_name: String,

    /// Referenced cluster name; joins against [`RemoteApiServer::name`]
    pub cluster_name: String,

    /// Referenced user/credential name
    pub user_name: String,
}
