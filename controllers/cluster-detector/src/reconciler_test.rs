//! Unit tests for the fleet reconciliation helpers

use crate::reconciler::{endpoint_index, orphaned_names, probe_fleet, status_needs_update};
use crds::{ClusterDetector, ClusterDetectorSpec, ClusterDetectorStatus, ClusterStatus};
use healthcheck::MockHealthChecker;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kubeconfig::{RemoteApiServer, TargetCluster};
use std::time::Duration;

fn server(name: &str, endpoint: &str) -> RemoteApiServer {
    RemoteApiServer {
        name: name.to_string(),
        endpoint: endpoint.to_string(),
    }
}

fn target(context: &str, cluster: &str) -> TargetCluster {
    TargetCluster {
        context_name: context.to_string(),
        cluster_name: cluster.to_string(),
        user_name: format!("admin-{cluster}"),
    }
}

fn detector(name: &str) -> ClusterDetector {
    ClusterDetector {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: ClusterDetectorSpec {
            context: name.to_string(),
            cluster: format!("cluster-of-{name}"),
            user: format!("user-of-{name}"),
        },
        status: None,
    }
}

#[test]
fn test_endpoint_index_joins_by_cluster_name() {
    let servers = vec![
        server("cluster-a", "https://10.0.0.1:6443"),
        server("cluster-b", "https://10.0.0.2:6443"),
    ];
    let index = endpoint_index(&servers);
    assert_eq!(index["cluster-a"].endpoint, "https://10.0.0.1:6443");
    assert_eq!(index["cluster-b"].endpoint, "https://10.0.0.2:6443");
    assert!(!index.contains_key("cluster-c"));
}

#[test]
fn test_endpoint_index_later_duplicate_shadows_earlier() {
    let servers = vec![
        server("cluster-a", "https://old.example:6443"),
        server("cluster-a", "https://new.example:6443"),
    ];
    let index = endpoint_index(&servers);
    assert_eq!(index.len(), 1);
    assert_eq!(index["cluster-a"].endpoint, "https://new.example:6443");
}

#[tokio::test]
async fn test_probe_fleet_classifies_outcomes() {
    let checker = MockHealthChecker::new()
        .healthy("cluster-a")
        .unhealthy("cluster-b");
    let servers = vec![
        server("cluster-a", "https://10.0.0.1:6443"),
        server("cluster-b", "https://10.0.0.2:6443"),
    ];
    let targets = vec![
        target("ctx-a", "cluster-a"),
        target("ctx-b", "cluster-b"),
        target("ctx-c", "cluster-missing"),
    ];

    let outcomes = probe_fleet(&checker, &servers, &targets, 8).await;

    assert_eq!(outcomes["ctx-a"], Some(ClusterStatus::Running));
    assert_eq!(outcomes["ctx-b"], Some(ClusterStatus::Unknown));
    assert_eq!(outcomes["ctx-c"], None, "join-miss leaves status untouched");
}

#[tokio::test]
async fn test_probe_fleet_probes_the_joined_endpoint() {
    let checker = MockHealthChecker::new().healthy("cluster-a");
    let servers = vec![server("cluster-a", "https://10.0.0.1:6443")];
    let targets = vec![target("ctx-a", "cluster-a")];

    probe_fleet(&checker, &servers, &targets, 8).await;

    let probed = checker.probed();
    assert_eq!(probed.len(), 1);
    assert_eq!(probed[0].name, "cluster-a");
    assert_eq!(probed[0].endpoint, "https://10.0.0.1:6443");
}

#[tokio::test]
async fn test_probe_fleet_skips_unjoined_contexts() {
    let checker = MockHealthChecker::new();
    let servers = vec![server("cluster-a", "https://10.0.0.1:6443")];
    let targets = vec![target("ctx-x", "cluster-x")];

    let outcomes = probe_fleet(&checker, &servers, &targets, 8).await;

    assert_eq!(outcomes["ctx-x"], None);
    assert!(checker.probed().is_empty(), "no endpoint, no probe");
}

#[tokio::test(start_paused = true)]
async fn test_probe_fleet_isolates_slow_clusters() {
    // Both probes take the full deadline; run concurrently they finish in
    // one deadline, not two, and the slow cluster does not change its
    // sibling's outcome.
    let checker = MockHealthChecker::new()
        .healthy_after("cluster-a", Duration::from_secs(2))
        .unhealthy_after("cluster-b", Duration::from_secs(2));
    let servers = vec![
        server("cluster-a", "https://10.0.0.1:6443"),
        server("cluster-b", "https://10.0.0.2:6443"),
    ];
    let targets = vec![target("ctx-a", "cluster-a"), target("ctx-b", "cluster-b")];

    let started = tokio::time::Instant::now();
    let outcomes = probe_fleet(&checker, &servers, &targets, 8).await;
    let elapsed = started.elapsed();

    assert_eq!(outcomes["ctx-a"], Some(ClusterStatus::Running));
    assert_eq!(outcomes["ctx-b"], Some(ClusterStatus::Unknown));
    assert!(
        elapsed < Duration::from_secs(3),
        "probes must run concurrently, took {elapsed:?}"
    );
}

#[tokio::test]
async fn test_probe_fleet_is_idempotent() {
    let checker = MockHealthChecker::new()
        .healthy("cluster-a")
        .unhealthy("cluster-b");
    let servers = vec![
        server("cluster-a", "https://10.0.0.1:6443"),
        server("cluster-b", "https://10.0.0.2:6443"),
    ];
    let targets = vec![target("ctx-a", "cluster-a"), target("ctx-b", "cluster-b")];

    let first = probe_fleet(&checker, &servers, &targets, 8).await;
    let second = probe_fleet(&checker, &servers, &targets, 8).await;
    assert_eq!(first, second);
}

#[test]
fn test_status_needs_update_when_unset() {
    // A record that has never been probed always needs its first write.
    assert!(status_needs_update(None, ClusterStatus::Running));
    assert!(status_needs_update(None, ClusterStatus::Unknown));
}

#[test]
fn test_status_needs_update_on_transition() {
    let status = ClusterDetectorStatus {
        cluster_status: ClusterStatus::Running,
        last_probed: None,
    };
    assert!(status_needs_update(Some(&status), ClusterStatus::Unknown));
}

#[test]
fn test_status_unchanged_needs_no_write() {
    let status = ClusterDetectorStatus {
        cluster_status: ClusterStatus::Running,
        last_probed: None,
    };
    assert!(!status_needs_update(Some(&status), ClusterStatus::Running));
}

#[test]
fn test_unchanged_fleet_keeps_status_byte_identical() {
    // Two passes over an unchanged fleet compute the same outcome; the
    // second pass skips the write, so the persisted record never changes,
    // timestamp included.
    let persisted = ClusterDetectorStatus {
        cluster_status: ClusterStatus::Running,
        last_probed: Some("2026-08-30T12:00:00Z".parse().expect("timestamp")),
    };
    let before = serde_json::to_vec(&persisted).expect("serialize");

    assert!(!status_needs_update(Some(&persisted), ClusterStatus::Running));

    let after = serde_json::to_vec(&persisted).expect("serialize");
    assert_eq!(before, after);
}

#[test]
fn test_orphaned_names_selects_removed_contexts() {
    let existing = vec![detector("ctx-a"), detector("ctx-b"), detector("ctx-old")];
    let targets = vec![target("ctx-a", "cluster-a"), target("ctx-b", "cluster-b")];

    let orphans = orphaned_names(&existing, &targets);
    assert_eq!(orphans, vec!["ctx-old".to_string()]);
}

#[test]
fn test_orphaned_names_empty_when_fleet_unchanged() {
    let existing = vec![detector("ctx-a")];
    let targets = vec![target("ctx-a", "cluster-a")];
    assert!(orphaned_names(&existing, &targets).is_empty());
}
