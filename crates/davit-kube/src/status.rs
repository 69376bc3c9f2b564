//! Readiness evaluation for managed workloads
//!
//! Pure functions from an observed resource snapshot to a lifecycle
//! verdict. Nothing here talks to the cluster: callers re-fetch and
//! re-evaluate on every poll. Both rollout machines require every
//! replica-count view (declared, updated, available, ready) to converge
//! on the desired count before declaring stability; a resource
//! mid-rollout diverges in at least one dimension.

use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::Pod;

use davit_core::PodCondition;

use crate::pod_util;

/// Lifecycle verdict for a resource.
///
/// Always derived, never stored: recomputed from the observed status on
/// every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Rollout in progress
    Pending,
    /// All replica views converged on the desired state
    Stable,
    /// No observed status, or a terminal failure
    Failed,
    /// Resource absent (idempotent-delete verdict)
    NotFound,
    /// Operation completed
    Done,
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Stable => "stable",
            Self::Failed => "failed",
            Self::NotFound => "not found",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Evaluate a Deployment's rollout state.
///
/// Scale-to-zero is a valid stable state: a Deployment with no desired
/// replicas and no observed replicas is STABLE regardless of the other
/// count fields.
pub fn deployment_status(deployment: &Deployment) -> ResourceStatus {
    let Some(status) = deployment.status.as_ref() else {
        return ResourceStatus::Failed;
    };
    let desired = deployment.spec.as_ref().and_then(|s| s.replicas);
    let total = status.replicas;
    let updated = status.updated_replicas;
    let available = status.available_replicas;
    let ready = status.ready_replicas;

    if desired.unwrap_or(0) == 0 && total.unwrap_or(0) == 0 {
        return ResourceStatus::Stable;
    }

    let Some(updated) = updated else {
        return ResourceStatus::Pending;
    };
    let pending = desired.is_some_and(|d| d > updated)
        || total.is_some_and(|t| t > updated)
        || available.is_none_or(|a| a < updated)
        || ready.is_none_or(|r| desired.is_some_and(|d| d > r));
    if pending {
        ResourceStatus::Pending
    } else {
        ResourceStatus::Stable
    }
}

/// Evaluate a StatefulSet's rollout state.
///
/// STABLE only once the update revision has become the current revision
/// and both the current and ready replica counts match the desired
/// count.
pub fn stateful_set_status(stateful_set: &StatefulSet) -> ResourceStatus {
    let Some(status) = stateful_set.status.as_ref() else {
        return ResourceStatus::Failed;
    };
    let desired = stateful_set.spec.as_ref().and_then(|s| s.replicas);

    let revision_converged = match (&status.update_revision, &status.current_revision) {
        (Some(update), current) => current.as_deref() == Some(update.as_str()),
        (None, _) => false,
    };
    let replicas_converged = match desired {
        Some(d) => status.current_replicas == Some(d) && status.ready_replicas == Some(d),
        None => false,
    };

    if revision_converged && replicas_converged {
        ResourceStatus::Stable
    } else {
        ResourceStatus::Pending
    }
}

/// Evaluate a Pod's readiness.
pub fn pod_status(pod: &Pod) -> ResourceStatus {
    let Some(status) = pod.status.as_ref() else {
        return ResourceStatus::Failed;
    };
    if status.phase.as_deref() == Some("Failed") {
        return ResourceStatus::Failed;
    }
    if pod_util::has_condition(pod, PodCondition::Ready) {
        ResourceStatus::Stable
    } else {
        ResourceStatus::Pending
    }
}
