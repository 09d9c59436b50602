//! Kubeconfig document parser
//!
//! Decodes the aggregated multi-context kubeconfig into typed entry lists
//! instead of scanning lines positionally, so each entry is validated on
//! its own and a malformed entry cannot bleed values into its neighbours.

use crate::error::KubeconfigError;
use crate::types::{RemoteApiServer, TargetCluster};
use serde::Deserialize;
use tracing::warn;

/// The slice of a kubeconfig document the fleet detector cares about.
///
/// Everything else (`users`, `current-context`, preferences) is ignored.
#[derive(Debug, Default, Deserialize)]
struct KubeconfigDoc {
    #[serde(default)]
    clusters: Vec<NamedCluster>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
}

#[derive(Debug, Default, Deserialize)]
struct NamedCluster {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    cluster: ClusterEntry,
}

#[derive(Debug, Default, Deserialize)]
struct ClusterEntry {
    #[serde(default)]
    server: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NamedContext {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    context: ContextEntry,
}

#[derive(Debug, Default, Deserialize)]
struct ContextEntry {
    #[serde(default)]
    cluster: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

/// Parses the aggregated kubeconfig text into endpoint and context records.
///
/// Cluster entries missing a name or a server URL are skipped with a
/// warning: without a name they cannot be joined, and without a server
/// there is nothing to probe. Context entries need a name to become a
/// tracked record; a missing cluster or user reference is kept as an empty
/// field and surfaces downstream as an unresolved join.
///
/// Records are returned in document order. Only a document that fails YAML
/// decoding as a whole is an error.
pub fn parse_kubeconfig(
    text: &str,
) -> Result<(Vec<RemoteApiServer>, Vec<TargetCluster>), KubeconfigError> {
    let doc: KubeconfigDoc = serde_yaml::from_str(text)?;

    let mut servers = Vec::with_capacity(doc.clusters.len());
    for (index, entry) in doc.clusters.into_iter().enumerate() {
        match (entry.name, entry.cluster.server) {
            (Some(name), Some(endpoint)) if !name.is_empty() && !endpoint.is_empty() => {
                servers.push(RemoteApiServer { name, endpoint });
            }
            (name, _) => {
                warn!(
                    index,
                    name = name.as_deref().unwrap_or_default(),
                    "skipping cluster entry missing name or server"
                );
            }
        }
    }

    let mut targets = Vec::with_capacity(doc.contexts.len());
    for (index, entry) in doc.contexts.into_iter().enumerate() {
        let Some(context_name) = entry.name.filter(|n| !n.is_empty()) else {
            warn!(index, "skipping context entry missing name");
            continue;
        };
        let cluster_name = entry.context.cluster.unwrap_or_default();
        let user_name = entry.context.user.unwrap_or_default();
        if cluster_name.is_empty() || user_name.is_empty() {
            warn!(
                context = %context_name,
                "context entry missing cluster or user reference"
            );
        }
        targets.push(TargetCluster {
            context_name,
            cluster_name,
            user_name,
        });
    }

    Ok((servers, targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLEET_CONFIG: &str = "\
apiVersion: v1
kind: Config
clusters:
- cluster:
    server: https://10.0.0.1:6443
  name: cluster-a
- cluster:
    server: https://10.0.0.2:6443
  name: cluster-b
contexts:
- context:
    cluster: cluster-a
    user: admin-a
  name: ctx-a
- context:
    cluster: cluster-b
    user: admin-b
  name: ctx-b
current-context: ctx-a
";

    #[test]
    fn test_parse_emits_every_entry_in_document_order() {
        let (servers, targets) = parse_kubeconfig(FLEET_CONFIG).expect("parse");

        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].name, "cluster-a");
        assert_eq!(servers[0].endpoint, "https://10.0.0.1:6443");
        assert_eq!(servers[1].name, "cluster-b");
        assert_eq!(servers[1].endpoint, "https://10.0.0.2:6443");

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].context_name, "ctx-a");
        assert_eq!(targets[0].cluster_name, "cluster-a");
        assert_eq!(targets[0].user_name, "admin-a");
        assert_eq!(targets[1].context_name, "ctx-b");
    }

    #[test]
    fn test_cluster_entry_without_server_is_skipped() {
        let text = "\
clusters:
- cluster: {}
  name: broken
- cluster:
    server: https://10.0.0.1:6443
  name: cluster-a
contexts: []
";
        let (servers, _) = parse_kubeconfig(text).expect("parse");
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "cluster-a");
    }

    #[test]
    fn test_cluster_entry_without_name_is_skipped() {
        let text = "\
clusters:
- cluster:
    server: https://10.0.0.9:6443
contexts: []
";
        let (servers, _) = parse_kubeconfig(text).expect("parse");
        assert!(servers.is_empty());
    }

    #[test]
    fn test_context_without_name_is_skipped() {
        let text = "\
clusters: []
contexts:
- context:
    cluster: cluster-a
    user: admin-a
";
        let (_, targets) = parse_kubeconfig(text).expect("parse");
        assert!(targets.is_empty());
    }

    #[test]
    fn test_context_missing_references_keeps_empty_fields() {
        // An incomplete context is still tracked; the empty cluster name
        // simply never joins an endpoint downstream.
        let text = "\
clusters: []
contexts:
- context:
    user: admin-a
  name: ctx-partial
";
        let (_, targets) = parse_kubeconfig(text).expect("parse");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].context_name, "ctx-partial");
        assert_eq!(targets[0].cluster_name, "");
        assert_eq!(targets[0].user_name, "admin-a");
    }

    #[test]
    fn test_entries_do_not_leak_values_into_neighbours() {
        // A context entry with no references must not inherit the previous
        // entry's cluster or user.
        let text = "\
clusters: []
contexts:
- context:
    cluster: cluster-a
    user: admin-a
  name: ctx-a
- context: {}
  name: ctx-empty
";
        let (_, targets) = parse_kubeconfig(text).expect("parse");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1].context_name, "ctx-empty");
        assert_eq!(targets[1].cluster_name, "");
        assert_eq!(targets[1].user_name, "");
    }

    #[test]
    fn test_document_after_current_context_is_ignored() {
        let text = format!("{FLEET_CONFIG}users:\n- name: admin-a\n  user:\n    token: secret\n");
        let (servers, targets) = parse_kubeconfig(&text).expect("parse");
        assert_eq!(servers.len(), 2);
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_empty_document_parses_to_empty_records() {
        let (servers, targets) = parse_kubeconfig("{}").expect("parse");
        assert!(servers.is_empty());
        assert!(targets.is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_a_structural_error() {
        let result = parse_kubeconfig("clusters: [unterminated");
        assert!(matches!(result, Err(KubeconfigError::Yaml(_))));
    }
}
