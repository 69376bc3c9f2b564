//! Error types for davit-kube

use davit_core::{ResourceKind, ResourceOperation};
use thiserror::Error;

/// Result type for davit-kube operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors that can occur during workload lifecycle operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeployError {
    /// Missing or invalid caller input
    #[error("invalid input: {0}")]
    Validation(String),

    /// Resource absent from the cluster
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    /// The kind intentionally rejects this write operation
    #[error("operation '{operation}' is not supported for {kind}")]
    Unsupported {
        kind: ResourceKind,
        operation: ResourceOperation,
    },

    /// Transport failure while creating a resource
    #[error("failed to create {kind}: {source}")]
    CreateFailed {
        kind: ResourceKind,
        #[source]
        source: kube::Error,
    },

    /// Transport failure while reading a resource
    #[error("failed to fetch {kind}: {source}")]
    GetFailed {
        kind: ResourceKind,
        #[source]
        source: kube::Error,
    },

    /// Transport failure while replacing a resource
    #[error("failed to update {kind}: {source}")]
    UpdateFailed {
        kind: ResourceKind,
        #[source]
        source: kube::Error,
    },

    /// Transport failure while patching a resource
    #[error("failed to patch {kind}: {source}")]
    PatchFailed {
        kind: ResourceKind,
        #[source]
        source: kube::Error,
    },

    /// Transport failure while deleting a resource
    #[error("failed to delete {kind}: {source}")]
    DeleteFailed {
        kind: ResourceKind,
        #[source]
        source: kube::Error,
    },

    /// Diff computation failure, distinct from transport errors
    #[error("failed to compute patch for {kind}: {reason}")]
    PatchCompute { kind: ResourceKind, reason: String },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deletion waiter deadline elapsed
    #[error("timed out waiting for {kind} deletion; still pending: {}", .pending.join(", "))]
    Timeout {
        kind: ResourceKind,
        pending: Vec<String>,
    },
}

impl From<serde_json::Error> for DeployError {
    fn from(e: serde_json::Error) -> Self {
        DeployError::Serialization(e.to_string())
    }
}

impl DeployError {
    /// Check if this is a typed not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeployError::NotFound { .. })
    }

    /// Check if the wrapped transport error is a concurrency conflict (409)
    pub fn is_conflict(&self) -> bool {
        match self {
            DeployError::CreateFailed { source, .. }
            | DeployError::UpdateFailed { source, .. }
            | DeployError::PatchFailed { source, .. }
            | DeployError::DeleteFailed { source, .. }
            | DeployError::GetFailed { source, .. } => api_code(source) == Some(409),
            _ => false,
        }
    }
}

/// Check if a raw transport error is a Kubernetes 404 Not Found
pub(crate) fn is_api_not_found(err: &kube::Error) -> bool {
    api_code(err) == Some(404)
}

fn api_code(err: &kube::Error) -> Option<u16> {
    match err {
        kube::Error::Api(resp) => Some(resp.code),
        _ => None,
    }
}
