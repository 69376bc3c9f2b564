//! Pod readiness predicates
//!
//! Condition names match the `type` strings Kubernetes reports in
//! `pod.status.conditions`.

/// An observed pod condition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PodCondition {
    /// The pod is able to serve requests.
    Ready,
    /// All init containers have completed.
    Initialized,
    /// All containers in the pod are ready.
    ContainersReady,
    /// The pod has been scheduled to a node.
    PodScheduled,
}

impl PodCondition {
    /// The condition `type` string as reported by the cluster.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Initialized => "Initialized",
            Self::ContainersReady => "ContainersReady",
            Self::PodScheduled => "PodScheduled",
        }
    }
}

impl std::fmt::Display for PodCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
