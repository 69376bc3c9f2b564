//! The closed set of resource kinds managed by Davit
//!
//! Kinds carry an integer weight used to order multi-kind apply and
//! teardown sequences: lower weight is applied first, teardown runs in
//! reverse.

use serde::{Deserialize, Serialize};

/// A workload resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// apps/v1 Deployment
    Deployment,

    /// apps/v1 StatefulSet
    StatefulSet,

    /// apps/v1 ReplicaSet (read-oriented; managed as a Deployment artifact)
    ReplicaSet,

    /// core/v1 Pod
    Pod,
}

impl ResourceKind {
    /// All managed kinds.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Deployment,
        ResourceKind::StatefulSet,
        ResourceKind::ReplicaSet,
        ResourceKind::Pod,
    ];

    /// The Kubernetes kind string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::ReplicaSet => "ReplicaSet",
            Self::Pod => "Pod",
        }
    }

    /// Apply-order weight. Lower weight is applied first.
    pub fn weight(&self) -> i32 {
        match self {
            Self::Deployment => 10,
            Self::StatefulSet => 11,
            Self::ReplicaSet => 20,
            Self::Pod => 30,
        }
    }

    /// All kinds, sorted by ascending weight.
    pub fn ordered_by_weight() -> Vec<ResourceKind> {
        let mut kinds = Self::ALL.to_vec();
        kinds.sort_by_key(ResourceKind::weight);
        kinds
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deployment" => Ok(Self::Deployment),
            "StatefulSet" => Ok(Self::StatefulSet),
            "ReplicaSet" => Ok(Self::ReplicaSet),
            "Pod" => Ok(Self::Pod),
            _ => Err(format!("unknown resource kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("DaemonSet".parse::<ResourceKind>().is_err());
        assert!("deployment".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_weights_are_distinct() {
        let mut weights: Vec<i32> = ResourceKind::ALL.iter().map(|k| k.weight()).collect();
        weights.sort_unstable();
        weights.dedup();
        assert_eq!(weights.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_ordered_by_weight() {
        let ordered = ResourceKind::ordered_by_weight();
        assert_eq!(ordered.first(), Some(&ResourceKind::Deployment));
        assert_eq!(ordered.last(), Some(&ResourceKind::Pod));
        assert!(ordered.windows(2).all(|w| w[0].weight() < w[1].weight()));
    }

    #[test]
    fn test_serializes_as_kind_string() {
        let json = serde_json::to_string(&ResourceKind::StatefulSet).unwrap();
        assert_eq!(json, "\"StatefulSet\"");
        let parsed: ResourceKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ResourceKind::StatefulSet);
    }

    #[test]
    fn test_display_matches_kubernetes_kind() {
        assert_eq!(ResourceKind::StatefulSet.to_string(), "StatefulSet");
        assert_eq!(ResourceKind::ReplicaSet.to_string(), "ReplicaSet");
    }
}
