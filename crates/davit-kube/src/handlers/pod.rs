//! Pod lifecycle handler

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client};

use davit_core::ResourceKind;

use crate::error::Result;
use crate::handler::{ResourceLifecycleHandler, Selector};
use crate::handlers::ops;
use crate::status::{self, ResourceStatus};
use crate::waiter::WaitConfig;

/// Lifecycle operations over bare Pods.
///
/// Controller-owned pods are normally managed through their owning
/// workload, but teardown sweeps and the StatefulSet stuck-pod
/// replacement delete pods directly.
#[derive(Clone)]
pub struct PodHandler {
    client: Client,
    wait_config: WaitConfig,
}

impl PodHandler {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            wait_config: WaitConfig::default(),
        }
    }

    /// Override the deletion-wait cadence.
    pub fn with_wait_config(mut self, wait_config: WaitConfig) -> Self {
        self.wait_config = wait_config;
        self
    }

    fn api(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ResourceLifecycleHandler for PodHandler {
    type Resource = Pod;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Pod
    }

    fn clean_up(&self) -> bool {
        true
    }

    async fn create(&self, resource: Pod, namespace: &str) -> Result<Pod> {
        ops::create(self.kind(), &self.api(namespace), resource).await
    }

    async fn get(&self, name: &str, namespace: &str) -> Result<Pod> {
        ops::get(self.kind(), &self.api(namespace), name).await
    }

    async fn get_by_selector(&self, selector: &Selector, namespace: &str) -> Result<Vec<Pod>> {
        ops::get_by_selector(self.kind(), &self.api(namespace), selector).await
    }

    async fn update(&self, resource: Pod, namespace: &str) -> Result<Pod> {
        ops::update(self.kind(), &self.api(namespace), resource).await
    }

    async fn patch(&self, name: &str, target: Pod, namespace: &str) -> Result<bool> {
        ops::patch(self.kind(), &self.api(namespace), name, target).await
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

    fn status(&self, resource: &Pod) -> ResourceStatus {
        status::pod_status(resource)
    }
}
