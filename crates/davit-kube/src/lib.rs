//! Davit Kube - workload lifecycle layer for Davit
//!
//! This crate provides:
//! - **Lifecycle Handlers**: One handler per workload kind with a uniform
//!   create/get/update/patch/delete surface and self-healing upserts
//! - **Status Evaluators**: Pure readiness state machines for Deployments,
//!   StatefulSets and Pods
//! - **Patch Engine**: Merge-patch computation against the last-applied
//!   snapshot stored on the resource itself
//! - **Deletion Waiter**: Bounded polling until deleted resources are gone
//! - **Revision Correlation**: Deployment revision to ReplicaSet to owned
//!   Pods, with graceful degradation at each missing link

pub mod correlate;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod patch;
pub mod pod_util;
pub mod registry;
pub mod snapshot;
pub mod status;
pub mod waiter;

pub use error::{DeployError, Result};
pub use handler::{ResourceLifecycleHandler, Selector};
pub use handlers::{DeploymentHandler, PodHandler, ReplicaSetHandler, StatefulSetHandler};
pub use registry::HandlerRegistry;
pub use status::ResourceStatus;
pub use waiter::WaitConfig;
