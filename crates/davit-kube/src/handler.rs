//! Lifecycle handler contract
//!
//! One handler per workload kind, all exposing the same operation
//! surface. Handlers are built from a connected client, so an operation
//! can only ever run against a live cluster handle.

use async_trait::async_trait;
use kube::api::ListParams;

use davit_core::ResourceKind;

use crate::error::Result;
use crate::status::ResourceStatus;

/// A list-scoping selector, either over labels or over object fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Label selector, e.g. `app=web,tier=frontend`.
    Label(String),
    /// Field selector, e.g. `metadata.name=web-0`.
    Field(String),
}

impl Selector {
    /// Label selector from anything string-like.
    pub fn label(selector: impl Into<String>) -> Self {
        Self::Label(selector.into())
    }

    /// Field selector from anything string-like.
    pub fn field(selector: impl Into<String>) -> Self {
        Self::Field(selector.into())
    }

    /// Translate into list options for the cluster API.
    pub fn to_list_params(&self) -> ListParams {
        match self {
            Self::Label(s) => ListParams::default().labels(s),
            Self::Field(s) => ListParams::default().fields(s),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label(s) => write!(f, "labels {s}"),
            Self::Field(s) => write!(f, "fields {s}"),
        }
    }
}

/// Uniform lifecycle surface over a Kubernetes workload kind.
///
/// Mutating operations record a last-applied snapshot so later patches
/// can diff against the previous declared state rather than the
/// cluster-mutated live object. `update` and `patch` fall back to a
/// create when the resource does not exist yet, so a caller can apply a
/// manifest without checking for prior existence.
#[async_trait]
pub trait ResourceLifecycleHandler {
    /// The concrete resource type this handler manages.
    type Resource: Send + Sync + 'static;

    /// The workload kind this handler manages.
    fn kind(&self) -> ResourceKind;

    /// Ordering weight; lower weights are applied first.
    fn weight(&self) -> i32 {
        self.kind().weight()
    }

    /// Whether this kind participates in teardown sweeps.
    fn clean_up(&self) -> bool;

    /// Create the resource in the given namespace.
    async fn create(&self, resource: Self::Resource, namespace: &str) -> Result<Self::Resource>;

    /// Fetch a resource by name.
    async fn get(&self, name: &str, namespace: &str) -> Result<Self::Resource>;

    /// List resources matching a selector. An empty result is not an
    /// error.
    async fn get_by_selector(
        &self,
        selector: &Selector,
        namespace: &str,
    ) -> Result<Vec<Self::Resource>>;

    /// Replace the resource wholesale, creating it if absent.
    async fn update(&self, resource: Self::Resource, namespace: &str) -> Result<Self::Resource>;

    /// Diff the target against the last-applied snapshot and submit a
    /// merge patch, creating the resource if absent.
    async fn patch(&self, name: &str, target: Self::Resource, namespace: &str) -> Result<bool>;

    /// Delete by name. Deleting an absent resource is not an error;
    /// the verdict distinguishes the two outcomes.
    async fn delete(&self, name: &str, namespace: &str, wait: bool) -> Result<ResourceStatus>;

    /// Delete everything matching a selector. Returns false when
    /// nothing matched.
    async fn delete_by_selector(
        &self,
        selector: &Selector,
        namespace: &str,
        wait: bool,
    ) -> Result<bool>;

    /// Evaluate the readiness of an observed resource.
    fn status(&self, _resource: &Self::Resource) -> ResourceStatus {
        ResourceStatus::Stable
    }
}
