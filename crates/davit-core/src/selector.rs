//! Label keys and label-selector construction
//!
//! Davit tags every resource it manages with application and service
//! identity labels; selectors built from those labels drive lookup,
//! teardown, and revision correlation.

/// Label keys used on managed resources.
pub mod labels {
    /// Application identity.
    pub const APP_NAME: &str = "davit.io/app-name";
    /// Service identity within an application.
    pub const SERVICE_NAME: &str = "davit.io/service-name";
    /// Cluster-generated per-ReplicaSet hash, inherited by its pods.
    pub const POD_TEMPLATE_HASH: &str = "pod-template-hash";
}

/// Build a label selector for an application/service identity.
///
/// Produces the `key=value` pairs for whichever identity parts are
/// present, joined with commas as the cluster API expects.
pub fn service_selector(app: Option<&str>, service: Option<&str>) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(app) = app {
        parts.push(format!("{}={}", labels::APP_NAME, app));
    }
    if let Some(service) = service {
        parts.push(format!("{}={}", labels::SERVICE_NAME, service));
    }
    parts.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_app_and_service() {
        assert_eq!(
            service_selector(Some("shop"), Some("cart")),
            "davit.io/app-name=shop,davit.io/service-name=cart"
        );
    }

    #[test]
    fn test_selector_service_only() {
        assert_eq!(
            service_selector(None, Some("cart")),
            "davit.io/service-name=cart"
        );
    }

    #[test]
    fn test_selector_empty() {
        assert_eq!(service_selector(None, None), "");
    }
}
