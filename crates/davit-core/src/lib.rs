//! Davit Core - kube-independent domain model
//!
//! This crate provides:
//! - **Resource Kinds**: the closed set of workload kinds Davit manages,
//!   with apply-order weights
//! - **Lifecycle Operations**: operation tags attached to error context
//! - **Pod Conditions**: readiness predicates evaluated against observed pods
//! - **Selectors**: label keys and label-selector string construction

pub mod condition;
pub mod kind;
pub mod operation;
pub mod selector;

pub use condition::PodCondition;
pub use kind::ResourceKind;
pub use operation::ResourceOperation;
pub use selector::{labels, service_selector};
