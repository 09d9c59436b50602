//! Fleet reconciliation logic.
//!
//! One pass probes every cluster in the aggregated kubeconfig concurrently,
//! collects all outcomes, and only then writes `ClusterDetector` records:
//! an unreachable or slow cluster never delays or blocks the status of its
//! siblings, and a failed write affects only its own record.

use crate::error::ControllerError;
use chrono::Utc;
use crds::{ClusterDetector, ClusterDetectorStatus, ClusterStatus};
use futures::stream::{self, StreamExt};
use healthcheck::HealthChecker;
use kube::Api;
use kube::api::{DeleteParams, ListParams, Patch, PatchParams, PostParams};
use kubeconfig::{RemoteApiServer, TargetCluster};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Field manager for server-side-apply writes to ClusterDetector specs.
pub const FIELD_MANAGER: &str = "cluster-detector-controller";

/// Attempts per status write before giving up on a conflicting record.
const STATUS_CONFLICT_RETRIES: usize = 3;

/// Reconciles fleet health into ClusterDetector resources.
pub struct Reconciler {
    detector_api: Api<ClusterDetector>,
    checker: Arc<dyn HealthChecker>,
    probe_limit: usize,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(
        detector_api: Api<ClusterDetector>,
        checker: Arc<dyn HealthChecker>,
        probe_limit: usize,
    ) -> Self {
        Self {
            detector_api,
            checker,
            probe_limit,
        }
    }

    /// Runs one full fleet pass.
    ///
    /// This method:
    /// 1. Probes every target cluster concurrently and collects all outcomes
    /// 2. Upserts one ClusterDetector per context and updates its status
    /// 3. Deletes detectors whose context left the document
    ///
    /// Per-cluster probe and write failures are logged and isolated; only
    /// infrastructure failures (listing the existing detectors) abort the
    /// pass.
    pub async fn reconcile_fleet(
        &self,
        servers: &[RemoteApiServer],
        targets: &[TargetCluster],
    ) -> Result<(), ControllerError> {
        let outcomes = probe_fleet(
            self.checker.as_ref(),
            servers,
            targets,
            self.probe_limit,
        )
        .await;

        let mut failed = 0usize;
        for target in targets {
            let outcome = outcomes.get(&target.context_name).copied().flatten();
            if let Err(e) = self.apply_target(target, outcome).await {
                error!(
                    context = %target.context_name,
                    error = %e,
                    "failed to update ClusterDetector"
                );
                failed += 1;
            }
        }
        if failed > 0 {
            warn!(failed, total = targets.len(), "fleet pass finished with per-cluster failures");
        }

        self.delete_orphans(targets).await
    }

    /// Upserts one detector's spec and, when a probe outcome exists and
    /// differs from the persisted one, overwrites its status. A join-miss
    /// or an unchanged outcome leaves the status record untouched, so an
    /// unchanged fleet generates no status writes at all.
    async fn apply_target(
        &self,
        target: &TargetCluster,
        outcome: Option<ClusterStatus>,
    ) -> Result<(), ControllerError> {
        let patch = serde_json::json!({
            "apiVersion": "fleet.microscaler.io/v1alpha1",
            "kind": "ClusterDetector",
            "metadata": { "name": target.context_name },
            "spec": {
                "context": target.context_name,
                "cluster": target.cluster_name,
                "user": target.user_name,
            }
        });
        let pp = PatchParams::apply(FIELD_MANAGER).force();
        let applied = self
            .detector_api
            .patch(&target.context_name, &pp, &Patch::Apply(&patch))
            .await?;

        if let Some(cluster_status) = outcome {
            if !status_needs_update(applied.status.as_ref(), cluster_status) {
                debug!(
                    context = %target.context_name,
                    status = %cluster_status,
                    "status unchanged, skipping write"
                );
                return Ok(());
            }
            let status = ClusterDetectorStatus {
                cluster_status,
                last_probed: Some(Utc::now()),
            };
            self.update_status(&target.context_name, status).await?;
            info!(
                context = %target.context_name,
                status = %cluster_status,
                "ClusterDetector status updated"
            );
        }

        Ok(())
    }

    /// Replaces a detector's status subresource, retrying on write
    /// conflicts with a fresh resource version so concurrent writers
    /// cannot silently lose updates.
    async fn update_status(
        &self,
        name: &str,
        status: ClusterDetectorStatus,
    ) -> Result<(), ControllerError> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut latest = self.detector_api.get(name).await?;
            latest.metadata.managed_fields = None;
            latest.status = Some(status.clone());
            let data = serde_json::to_vec(&latest)?;

            match self
                .detector_api
                .replace_status(name, &PostParams::default(), data)
                .await
            {
                Ok(_) => return Ok(()),
                Err(kube::Error::Api(err)) if err.code == 409 && attempt < STATUS_CONFLICT_RETRIES => {
                    debug!(name, attempt, "status write conflicted, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Deletes detectors whose context name is no longer in the document.
    async fn delete_orphans(&self, targets: &[TargetCluster]) -> Result<(), ControllerError> {
        let existing = self.detector_api.list(&ListParams::default()).await?;
        for name in orphaned_names(&existing.items, targets) {
            info!(%name, "deleting ClusterDetector for context removed from kubeconfig");
            if let Err(e) = self.detector_api.delete(&name, &DeleteParams::default()).await {
                error!(%name, error = %e, "failed to delete orphaned ClusterDetector");
            }
        }
        Ok(())
    }
}

/// Probes every target cluster and collects outcomes before any write.
///
/// Probes run concurrently, bounded by `limit` workers, each carrying the
/// prober's own deadline. The result maps context name to:
/// - `Some(Running)` when the joined endpoint answered healthy
/// - `Some(Unknown)` when the probe failed
/// - `None` when the context's cluster name joined no endpoint
pub(crate) async fn probe_fleet(
    checker: &dyn HealthChecker,
    servers: &[RemoteApiServer],
    targets: &[TargetCluster],
    limit: usize,
) -> HashMap<String, Option<ClusterStatus>> {
    let endpoints = endpoint_index(servers);
    let limit = limit.clamp(1, targets.len().max(1));

    stream::iter(targets.iter().map(|target| {
        let server = endpoints.get(target.cluster_name.as_str()).copied();
        async move {
            let outcome = match server {
                Some(server) => match checker.check(server).await {
                    Ok(()) => Some(ClusterStatus::Running),
                    Err(e) => {
                        warn!(
                            cluster = %server.name,
                            context = %target.context_name,
                            error = %e,
                            "health check failed"
                        );
                        Some(ClusterStatus::Unknown)
                    }
                },
                None => {
                    warn!(
                        context = %target.context_name,
                        cluster = %target.cluster_name,
                        "no endpoint for cluster, leaving status unchanged"
                    );
                    None
                }
            };
            (target.context_name.clone(), outcome)
        }
    }))
    .buffer_unordered(limit)
    .collect()
    .await
}

/// Whether a freshly computed health outcome differs from the persisted
/// status record. Repeated passes over an unchanged fleet compute the same
/// outcome and therefore never rewrite the record, keeping it byte
/// identical between passes; `last_probed` moves only on a transition.
pub(crate) fn status_needs_update(
    current: Option<&ClusterDetectorStatus>,
    computed: ClusterStatus,
) -> bool {
    current.map(|status| status.cluster_status) != Some(computed)
}

/// Indexes servers by name for the context join. A later entry shadows an
/// earlier one when the document repeats a cluster name.
pub(crate) fn endpoint_index(servers: &[RemoteApiServer]) -> HashMap<&str, &RemoteApiServer> {
    servers.iter().map(|s| (s.name.as_str(), s)).collect()
}

/// Names of persisted detectors whose context left the current document.
pub(crate) fn orphaned_names(existing: &[ClusterDetector], targets: &[TargetCluster]) -> Vec<String> {
    let live: HashSet<&str> = targets.iter().map(|t| t.context_name.as_str()).collect();
    existing
        .iter()
        .filter_map(|detector| detector.metadata.name.as_deref())
        .filter(|name| !live.contains(name))
        .map(str::to_string)
        .collect()
}
