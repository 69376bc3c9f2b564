//! Deployment lifecycle handler

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{Api, Client};

use davit_core::ResourceKind;

use crate::correlate;
use crate::error::Result;
use crate::handler::{ResourceLifecycleHandler, Selector};
use crate::handlers::ops;
use crate::status::{self, ResourceStatus};
use crate::waiter::WaitConfig;

/// Lifecycle operations over Deployments.
#[derive(Clone)]
pub struct DeploymentHandler {
    client: Client,
    wait_config: WaitConfig,
}

impl DeploymentHandler {
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

    fn api(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// The rollout revision recorded on a Deployment, if any.
    pub fn revision(deployment: &Deployment) -> Option<String> {
        correlate::deployment_revision(deployment)
    }
}

#[async_trait]
impl ResourceLifecycleHandler for DeploymentHandler {
    type Resource = Deployment;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Deployment
    }

    fn clean_up(&self) -> bool {
        true
    }

    async fn create(&self, resource: Deployment, namespace: &str) -> Result<Deployment> {
        ops::create(self.kind(), &self.api(namespace), resource).await
    }

    async fn get(&self, name: &str, namespace: &str) -> Result<Deployment> {
        ops::get(self.kind(), &self.api(namespace), name).await
    }

    async fn get_by_selector(
        &self,
        selector: &Selector,
        namespace: &str,
    ) -> Result<Vec<Deployment>> {
        ops::get_by_selector(self.kind(), &self.api(namespace), selector).await
    }

    async fn update(&self, resource: Deployment, namespace: &str) -> Result<Deployment> {
        ops::update(self.kind(), &self.api(namespace), resource).await
    }

    async fn patch(&self, name: &str, target: Deployment, namespace: &str) -> Result<bool> {
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

    fn status(&self, resource: &Deployment) -> ResourceStatus {
        status::deployment_status(resource)
    }
}
