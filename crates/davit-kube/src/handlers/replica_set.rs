//! ReplicaSet handler, read-oriented
//!
//! ReplicaSets are managed only as Deployment-derived artifacts, so
//! every write operation on this handler is rejected up front and never
//! reaches the cluster. The read path it does provide, revision lookup,
//! feeds the pod correlator.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::ReplicaSet;
use kube::{Api, Client};

use davit_core::{ResourceKind, ResourceOperation};

use crate::correlate;
use crate::error::{DeployError, Result};
use crate::handler::{ResourceLifecycleHandler, Selector};
use crate::handlers::ops;
use crate::status::ResourceStatus;

/// Read-only handler over ReplicaSets.
#[derive(Clone)]
pub struct ReplicaSetHandler {
    client: Client,
}

impl ReplicaSetHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<ReplicaSet> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn unsupported<T>(&self, operation: ResourceOperation) -> Result<T> {
        Err(DeployError::Unsupported {
            kind: ResourceKind::ReplicaSet,
            operation,
        })
    }

    /// Find the ReplicaSet carrying the given rollout revision among
    /// those matching the selector.
    pub async fn get_by_revision(
        &self,
        selector: &Selector,
        namespace: &str,
        revision: &str,
    ) -> Result<Option<ReplicaSet>> {
        let replica_sets =
            ops::get_by_selector(ResourceKind::ReplicaSet, &self.api(namespace), selector).await?;
        Ok(correlate::replica_set_for_revision(&replica_sets, revision).cloned())
    }
}

#[async_trait]
impl ResourceLifecycleHandler for ReplicaSetHandler {
    type Resource = ReplicaSet;

    fn kind(&self) -> ResourceKind {
        ResourceKind::ReplicaSet
    }

    fn clean_up(&self) -> bool {
        false
    }

    async fn create(&self, _resource: ReplicaSet, _namespace: &str) -> Result<ReplicaSet> {
        self.unsupported(ResourceOperation::Create)
    }

    async fn get(&self, _name: &str, _namespace: &str) -> Result<ReplicaSet> {
        self.unsupported(ResourceOperation::Get)
    }

    async fn get_by_selector(
        &self,
        _selector: &Selector,
        _namespace: &str,
    ) -> Result<Vec<ReplicaSet>> {
        self.unsupported(ResourceOperation::GetBySelector)
    }

    async fn update(&self, _resource: ReplicaSet, _namespace: &str) -> Result<ReplicaSet> {
        self.unsupported(ResourceOperation::Update)
    }

    async fn patch(&self, _name: &str, _target: ReplicaSet, _namespace: &str) -> Result<bool> {
        self.unsupported(ResourceOperation::Patch)
    }

    async fn delete(&self, _name: &str, _namespace: &str, _wait: bool) -> Result<ResourceStatus> {
        self.unsupported(ResourceOperation::Delete)
    }

    async fn delete_by_selector(
        &self,
        _selector: &Selector,
        _namespace: &str,
        _wait: bool,
    ) -> Result<bool> {
        self.unsupported(ResourceOperation::DeleteBySelector)
    }
}
