//! Revision/pod correlation
//!
//! Maps a Deployment's current rollout revision to the pods that
//! generation actually owns, through the intermediate ReplicaSet:
//! Deployment revision annotation, matching ReplicaSet, its
//! pod-template hash label, then the pods carrying that hash.
//!
//! Each missing link degrades with its own specific fallback. An
//! unknown revision means correlation is impossible, so the candidate
//! list passes through unfiltered; a known revision whose ReplicaSet is
//! missing means no pods belong to that generation yet, so the result
//! is empty. Collapsing the two would either hide pods or invent them.

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::core::v1::Pod;
use tracing::{debug, error};

use davit_core::selector::{labels, service_selector};

use crate::handler::{ResourceLifecycleHandler, Selector};
use crate::handlers::{DeploymentHandler, ReplicaSetHandler};
use crate::pod_util;

/// Annotation carrying a workload's rollout revision, written by the
/// cluster's deployment controller.
pub const REVISION_ANNOTATION: &str = "deployment.kubernetes.io/revision";

/// The rollout revision recorded on a Deployment. Blank values count as
/// absent.
pub fn deployment_revision(deployment: &Deployment) -> Option<String> {
    deployment
        .metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(REVISION_ANNOTATION))
        .filter(|r| !r.trim().is_empty())
        .cloned()
}

/// Find the ReplicaSet whose stored revision matches.
pub fn replica_set_for_revision<'a>(
    replica_sets: &'a [ReplicaSet],
    revision: &str,
) -> Option<&'a ReplicaSet> {
    replica_sets.iter().find(|rs| {
        rs.metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(REVISION_ANNOTATION))
            .is_some_and(|r| r == revision)
    })
}

/// The pod-template hash label a ReplicaSet stamps on its pods.
pub fn pod_template_hash(replica_set: &ReplicaSet) -> Option<String> {
    replica_set
        .metadata
        .labels
        .as_ref()
        .and_then(|l| l.get(labels::POD_TEMPLATE_HASH))
        .cloned()
}

/// Keep only the pods carrying the given pod-template hash.
pub fn filter_pods_by_hash(pods: Vec<Pod>, hash: &str) -> Vec<Pod> {
    pod_util::filter_pods_by_label(pods, labels::POD_TEMPLATE_HASH, hash)
}

/// Filter a candidate pod list down to the pods owned by the active
/// Deployment generation of an application/service identity.
pub async fn filter_pods_by_deployment(
    deployments: &DeploymentHandler,
    replica_sets: &ReplicaSetHandler,
    app: Option<&str>,
    service: &str,
    namespace: &str,
    pods: Vec<Pod>,
) -> Vec<Pod> {
    let selector = Selector::label(service_selector(app, Some(service)));

    let matched = match deployments.get_by_selector(&selector, namespace).await {
        Ok(matched) => matched,
        Err(e) => {
            error!(error = %e, "deployment lookup failed, returning pods unfiltered");
            return pods;
        }
    };
    let Some(deployment) = matched.first() else {
        debug!(service = %service, "no deployment for identity, no pods belong");
        return Vec::new();
    };

    let Some(revision) = deployment_revision(deployment) else {
        debug!(service = %service, "deployment carries no revision, returning pods unfiltered");
        return pods;
    };

    let replica_set = match replica_sets
        .get_by_revision(&selector, namespace, &revision)
        .await
    {
        Ok(replica_set) => replica_set,
        Err(e) => {
            error!(error = %e, "replicaset lookup failed, returning pods unfiltered");
            return pods;
        }
    };
    let Some(replica_set) = replica_set else {
        debug!(revision = %revision, "no replicaset for revision, no pods belong yet");
        return Vec::new();
    };

    let Some(hash) = pod_template_hash(&replica_set) else {
        debug!(revision = %revision, "replicaset carries no template hash, no pods belong");
        return Vec::new();
    };

    filter_pods_by_hash(pods, &hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn annotated_deployment(revision: Option<&str>) -> Deployment {
        let mut d = Deployment::default();
        if let Some(revision) = revision {
            d.metadata.annotations = Some(
                [(REVISION_ANNOTATION.to_string(), revision.to_string())]
                    .into_iter()
                    .collect(),
            );
        }
        d
    }

    fn replica_set(revision: &str, hash: Option<&str>) -> ReplicaSet {
        let mut rs = ReplicaSet::default();
        rs.metadata.annotations = Some(
            [(REVISION_ANNOTATION.to_string(), revision.to_string())]
                .into_iter()
                .collect(),
        );
        if let Some(hash) = hash {
            rs.metadata.labels = Some(
                [(labels::POD_TEMPLATE_HASH.to_string(), hash.to_string())]
                    .into_iter()
                    .collect(),
            );
        }
        rs
    }

    fn hashed_pod(hash: &str) -> Pod {
        let mut pod = Pod::default();
        let labels: BTreeMap<String, String> =
            [(labels::POD_TEMPLATE_HASH.to_string(), hash.to_string())]
                .into_iter()
                .collect();
        pod.metadata.labels = Some(labels);
        pod
    }

    #[test]
    fn test_revision_read() {
        assert_eq!(
            deployment_revision(&annotated_deployment(Some("5"))),
            Some("5".to_string())
        );
        assert_eq!(deployment_revision(&annotated_deployment(None)), None);
    }

    #[test]
    fn test_blank_revision_counts_as_absent() {
        assert_eq!(deployment_revision(&annotated_deployment(Some("  "))), None);
    }

    #[test]
    fn test_replica_set_matched_by_revision() {
        let sets = vec![replica_set("4", Some("old")), replica_set("5", Some("abc123"))];
        let found = replica_set_for_revision(&sets, "5").unwrap();
        assert_eq!(pod_template_hash(found), Some("abc123".to_string()));
        assert!(replica_set_for_revision(&sets, "6").is_none());
    }

    #[test]
    fn test_pods_filtered_to_revision_hash() {
        let pods = vec![hashed_pod("abc123"), hashed_pod("abc123"), hashed_pod("xyz999")];
        let kept = filter_pods_by_hash(pods, "abc123");
        assert_eq!(kept.len(), 2);
    }
}
