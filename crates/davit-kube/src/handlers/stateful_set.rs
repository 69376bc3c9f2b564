//! StatefulSet lifecycle handler
//!
//! Identical to the Deployment handler except for the patch path: the
//! StatefulSet controller does not replace already-unhealthy pods on a
//! spec patch, so the handler checks pod health before patching and
//! sweeps the unhealthy ones away afterwards.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use kube::{Api, Client};
use tracing::{debug, error, warn};

use davit_core::ResourceKind;
use davit_core::selector::{labels, service_selector};

use crate::error::Result;
use crate::handler::{ResourceLifecycleHandler, Selector};
use crate::handlers::{PodHandler, ops};
use crate::pod_util;
use crate::status::{self, ResourceStatus};
use crate::waiter::WaitConfig;

/// Lifecycle operations over StatefulSets.
#[derive(Clone)]
pub struct StatefulSetHandler {
    client: Client,
    pods: PodHandler,
    wait_config: WaitConfig,
}

impl StatefulSetHandler {
    /// The pod handler is injected so the stuck-pod sweep goes through
    /// the same lifecycle surface as every other pod operation.
    pub fn new(client: Client, pods: PodHandler) -> Self {
        Self {
            client,
            pods,
            wait_config: WaitConfig::default(),
        }
    }

    /// Override the deletion-wait cadence.
    pub fn with_wait_config(mut self, wait_config: WaitConfig) -> Self {
        self.wait_config = wait_config;
        self
    }

    fn api(&self, namespace: &str) -> Api<StatefulSet> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Decide, before a patch, whether its owned pods will need a
    /// forced sweep afterwards. Returns the selector to sweep with when
    /// any owned pod is unhealthy.
    async fn sweep_selector(&self, existing: &StatefulSet, namespace: &str) -> Option<Selector> {
        let resource_labels = existing.metadata.labels.as_ref()?;
        let selector = service_selector(
            resource_labels.get(labels::APP_NAME).map(String::as_str),
            resource_labels.get(labels::SERVICE_NAME).map(String::as_str),
        );
        if selector.is_empty() {
            return None;
        }
        let selector = Selector::label(selector);
        let pods = match self.pods.get_by_selector(&selector, namespace).await {
            Ok(pods) => pods,
            Err(e) => {
                warn!(error = %e, "could not inspect pods before patch, skipping sweep");
                return None;
            }
        };
        pods.iter().any(pod_util::is_unhealthy).then_some(selector)
    }
}

#[async_trait]
impl ResourceLifecycleHandler for StatefulSetHandler {
    type Resource = StatefulSet;

    fn kind(&self) -> ResourceKind {
        ResourceKind::StatefulSet
    }

    fn clean_up(&self) -> bool {
        true
    }

    async fn create(&self, resource: StatefulSet, namespace: &str) -> Result<StatefulSet> {
        ops::create(self.kind(), &self.api(namespace), resource).await
    }

    async fn get(&self, name: &str, namespace: &str) -> Result<StatefulSet> {
        ops::get(self.kind(), &self.api(namespace), name).await
    }

    async fn get_by_selector(
        &self,
        selector: &Selector,
        namespace: &str,
    ) -> Result<Vec<StatefulSet>> {
        ops::get_by_selector(self.kind(), &self.api(namespace), selector).await
    }

    async fn update(&self, resource: StatefulSet, namespace: &str) -> Result<StatefulSet> {
        ops::update(self.kind(), &self.api(namespace), resource).await
    }

    async fn patch(&self, name: &str, target: StatefulSet, namespace: &str) -> Result<bool> {
        let api = self.api(namespace);
        let sweep = match api.get(name).await {
            Ok(existing) => self.sweep_selector(&existing, namespace).await,
            // Absent resources have no pods to sweep; the generic patch
            // path handles the create fallback.
            Err(_) => None,
        };

        let outcome = ops::patch(self.kind(), &api, name, target).await;

        // Runs whether or not the patch succeeded: pods found unhealthy
        // before the patch stay unhealthy without a forced replacement.
        if let Some(selector) = sweep {
            debug!(name = %name, selector = %selector, "sweeping unhealthy pods after patch");
            if let Err(e) = self.pods.delete_by_selector(&selector, namespace, false).await {
                error!(error = %e, "unhealthy pod sweep failed");
            }
        }

        outcome
    }

    async fn delete(&self, name: &str, namespace: &str, wait: bool) -> Result<ResourceStatus> {
        ops::delete(self.kind(), &self.api(namespace), name, wait, &self.wait_config).await
    }

    async fn delete_by_selector(
        &self,
        selector: &Selector,
        namespace: &str,
        wait: bool,
    ) -> Result<bool> {
        ops::delete_by_selector(
            self.kind(),
            &self.api(namespace),
            selector,
            wait,
            &self.wait_config,
        )
        .await
    }

    fn status(&self, resource: &StatefulSet) -> ResourceStatus {
        status::stateful_set_status(resource)
    }
}
