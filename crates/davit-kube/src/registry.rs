//! Handler registry
//!
//! One handler per enumerated kind, built once from a connected client
//! and read-only afterwards. Dispatch is closed over the kind enum, so
//! adding a kind is a compile-time change, never a runtime lookup miss.

use k8s_openapi::api::core::v1::Pod;
use kube::Client;

use davit_core::ResourceKind;

use crate::correlate;
use crate::handler::ResourceLifecycleHandler;
use crate::handlers::{DeploymentHandler, PodHandler, ReplicaSetHandler, StatefulSetHandler};
use crate::waiter::WaitConfig;

/// The full set of lifecycle handlers for one cluster connection.
#[derive(Clone)]
pub struct HandlerRegistry {
    deployment: DeploymentHandler,
    stateful_set: StatefulSetHandler,
    replica_set: ReplicaSetHandler,
    pod: PodHandler,
}

impl HandlerRegistry {
    /// Build the registry. The StatefulSet handler receives the Pod
    /// handler here; no handler ever reaches into the registry at call
    /// time.
    pub fn new(client: Client) -> Self {
        let pod = PodHandler::new(client.clone());
        Self {
            deployment: DeploymentHandler::new(client.clone()),
            stateful_set: StatefulSetHandler::new(client.clone(), pod.clone()),
            replica_set: ReplicaSetHandler::new(client),
            pod,
        }
    }

    /// Rebuild every handler with the given deletion-wait cadence.
    pub fn with_wait_config(self, wait_config: WaitConfig) -> Self {
        Self {
            deployment: self.deployment.with_wait_config(wait_config),
            stateful_set: self.stateful_set.with_wait_config(wait_config),
            replica_set: self.replica_set,
            pod: self.pod.with_wait_config(wait_config),
        }
    }

    pub fn deployments(&self) -> &DeploymentHandler {
        &self.deployment
    }

    pub fn stateful_sets(&self) -> &StatefulSetHandler {
        &self.stateful_set
    }

    pub fn replica_sets(&self) -> &ReplicaSetHandler {
        &self.replica_set
    }

    pub fn pods(&self) -> &PodHandler {
        &self.pod
    }

    /// Apply-ordering weight for a kind.
    pub fn weight(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Deployment => self.deployment.weight(),
            ResourceKind::StatefulSet => self.stateful_set.weight(),
            ResourceKind::ReplicaSet => self.replica_set.weight(),
            ResourceKind::Pod => self.pod.weight(),
        }
    }

    /// Whether a kind participates in full-application teardown.
    pub fn clean_up(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Deployment => self.deployment.clean_up(),
            ResourceKind::StatefulSet => self.stateful_set.clean_up(),
            ResourceKind::ReplicaSet => self.replica_set.clean_up(),
            ResourceKind::Pod => self.pod.clean_up(),
        }
    }

    /// Kinds in apply order, lowest weight first.
    pub fn apply_order(&self) -> Vec<ResourceKind> {
        ResourceKind::ordered_by_weight()
    }

    /// Kinds in teardown order: reverse apply order, restricted to the
    /// kinds that opt into teardown.
    pub fn teardown_order(&self) -> Vec<ResourceKind> {
        let mut kinds = self.apply_order();
        kinds.reverse();
        kinds.retain(|&kind| self.clean_up(kind));
        kinds
    }

    /// Filter candidate pods to the ones owned by the active Deployment
    /// generation of an application/service identity.
    pub async fn pods_for_deployment(
        &self,
        app: Option<&str>,
        service: &str,
        namespace: &str,
        pods: Vec<Pod>,
    ) -> Vec<Pod> {
        correlate::filter_pods_by_deployment(
            &self.deployment,
            &self.replica_set,
            app,
            service,
            namespace,
            pods,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Client construction spawns onto the runtime even though no
    // connection is made until an operation runs, so these tests need
    // a Tokio runtime despite asserting pure dispatch logic.
    fn registry() -> HandlerRegistry {
        let config = kube::Config::new("http://127.0.0.1:8080".parse().unwrap());
        let client = Client::try_from(config).unwrap();
        HandlerRegistry::new(client)
    }

    #[tokio::test]
    async fn test_weights_follow_kind_order() {
        let registry = registry();
        assert!(registry.weight(ResourceKind::Deployment) < registry.weight(ResourceKind::Pod));
        assert_eq!(
            registry.weight(ResourceKind::StatefulSet),
            ResourceKind::StatefulSet.weight()
        );
    }

    #[tokio::test]
    async fn test_replica_sets_opt_out_of_teardown() {
        let registry = registry();
        assert!(!registry.clean_up(ResourceKind::ReplicaSet));
        assert!(registry.clean_up(ResourceKind::Deployment));
        assert!(registry.clean_up(ResourceKind::StatefulSet));
        assert!(registry.clean_up(ResourceKind::Pod));
    }

    #[tokio::test]
    async fn test_teardown_reverses_apply_order_without_replica_sets() {
        let registry = registry();
        let apply = registry.apply_order();
        assert_eq!(apply.first(), Some(&ResourceKind::Deployment));
        assert_eq!(apply.last(), Some(&ResourceKind::Pod));

        let teardown = registry.teardown_order();
        assert_eq!(teardown.first(), Some(&ResourceKind::Pod));
        assert!(!teardown.contains(&ResourceKind::ReplicaSet));
    }
}
