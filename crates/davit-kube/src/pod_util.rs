//! Pod inspection helpers
//!
//! Small predicates over observed pod state, shared by the pod status
//! machine and the StatefulSet stuck-pod sweep.

use k8s_openapi::api::core::v1::Pod;

use davit_core::PodCondition;

/// Aggregate container state label for a pod.
///
/// Any waiting container dominates (its reason is surfaced when set),
/// then any terminated container, and only a pod whose containers are
/// all running reports "Running".
pub fn aggregated_container_state(pod: &Pod) -> String {
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();

    for cs in statuses {
        if let Some(waiting) = cs.state.as_ref().and_then(|s| s.waiting.as_ref()) {
            return waiting
                .reason
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "Waiting".to_string());
        }
    }
    for cs in statuses {
        if cs.state.as_ref().is_some_and(|s| s.terminated.is_some()) {
            return "Terminated".to_string();
        }
    }
    "Running".to_string()
}

/// Whether the pod reports the given condition with status "True".
pub fn has_condition(pod: &Pod, condition: PodCondition) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.conditions.as_deref())
        .unwrap_or_default()
        .iter()
        .any(|c| c.type_ == condition.as_str() && c.status == "True")
}

/// Whether the pod is unhealthy: not running, or running but not ready.
pub fn is_unhealthy(pod: &Pod) -> bool {
    !aggregated_container_state(pod).eq_ignore_ascii_case("running")
        || !has_condition(pod, PodCondition::Ready)
}

/// Keep only pods carrying the given label value.
pub fn filter_pods_by_label(pods: Vec<Pod>, key: &str, value: &str) -> Vec<Pod> {
    pods.into_iter()
        .filter(|p| {
            p.metadata
                .labels
                .as_ref()
                .and_then(|l| l.get(key))
                .is_some_and(|v| v == value)
        })
        .collect()
}
