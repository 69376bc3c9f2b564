//! StatefulSet stuck-pod sweep tests against a mock API server.
//!
//! The StatefulSet controller will not replace pods that were already
//! unhealthy before a spec patch, so the handler sweeps them afterwards.
//! The sweep must run whether the patch succeeded or not, and must not
//! run when the owned pods were healthy.

use k8s_openapi::api::apps::v1::StatefulSet;
use kube::config::{
    AuthInfo, Cluster, Context, KubeConfigOptions, Kubeconfig, NamedAuthInfo, NamedCluster,
    NamedContext,
};
use kube::{Client, Config, Resource};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use davit_kube::snapshot;
use davit_kube::{PodHandler, ResourceLifecycleHandler, StatefulSetHandler};

const NS: &str = "default";
const SELECTOR: &str = "davit.io/app-name=shop,davit.io/service-name=cart";

async fn client_for(server: &MockServer) -> Client {
    let kubeconfig = Kubeconfig {
        clusters: vec![NamedCluster {
            name: "mock-cluster".to_string(),
            cluster: Some(Cluster {
                server: Some(server.uri()),
                insecure_skip_tls_verify: Some(true),
                ..Default::default()
            }),
        }],
        contexts: vec![NamedContext {
            name: "mock-context".to_string(),
            context: Some(Context {
                cluster: "mock-cluster".to_string(),
                user: Some("mock-user".to_string()),
                namespace: Some(NS.to_string()),
                ..Default::default()
            }),
        }],
        auth_infos: vec![NamedAuthInfo {
            name: "mock-user".to_string(),
            auth_info: Some(AuthInfo::default()),
        }],
        current_context: Some("mock-context".to_string()),
        ..Default::default()
    };
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .expect("kubeconfig should be valid");
    Client::try_from(config).expect("client should build")
}

fn handler_for(client: Client) -> StatefulSetHandler {
    StatefulSetHandler::new(client.clone(), PodHandler::new(client))
}

fn labeled_stateful_set(name: &str, replicas: i32) -> StatefulSet {
    let mut sts = StatefulSet::default();
    sts.meta_mut().name = Some(name.to_string());
    sts.meta_mut().labels = Some(
        [
            ("davit.io/app-name".to_string(), "shop".to_string()),
            ("davit.io/service-name".to_string(), "cart".to_string()),
        ]
        .into_iter()
        .collect(),
    );
    sts.spec = Some(k8s_openapi::api::apps::v1::StatefulSetSpec {
        replicas: Some(replicas),
        ..Default::default()
    });
    sts
}

fn stateful_set_body(sts: &StatefulSet) -> serde_json::Value {
    let mut body = serde_json::to_value(sts).unwrap();
    body["apiVersion"] = json!("apps/v1");
    body["kind"] = json!("StatefulSet");
    body
}

fn sts_path(name: &str) -> String {
    format!("/apis/apps/v1/namespaces/{NS}/statefulsets/{name}")
}

fn pod_body(name: &str, healthy: bool) -> serde_json::Value {
    let state = if healthy {
        json!({"running": {}})
    } else {
        json!({"waiting": {"reason": "CrashLoopBackOff"}})
    };
    let ready = if healthy { "True" } else { "False" };
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": NS,
            "labels": {
                "davit.io/app-name": "shop",
                "davit.io/service-name": "cart"
            }
        },
        "status": {
            "phase": "Running",
            "conditions": [{"type": "Ready", "status": ready}],
            "containerStatuses": [{
                "name": "main",
                "image": "img",
                "imageID": "",
                "ready": healthy,
                "restartCount": 0,
                "state": state
            }]
        }
    })
}

async fn mount_pod_list(server: &MockServer, pods: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/namespaces/{NS}/pods")))
        .and(query_param("labelSelector", SELECTOR))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "PodList",
            "apiVersion": "v1",
            "metadata": {"resourceVersion": "1"},
            "items": pods
        })))
        .mount(server)
        .await;
}

async fn mount_existing(server: &MockServer, sts: &StatefulSet) {
    Mock::given(method("GET"))
        .and(path(sts_path("cart")))
        .respond_with(ResponseTemplate::new(200).set_body_json(stateful_set_body(sts)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_patch_sweeps_unhealthy_pods() {
    let server = MockServer::start().await;
    let mut existing = labeled_stateful_set("cart", 2);
    snapshot::record(&mut existing).unwrap();

    mount_existing(&server, &existing).await;
    mount_pod_list(&server, vec![pod_body("cart-0", false), pod_body("cart-1", true)]).await;
    Mock::given(method("PATCH"))
        .and(path(sts_path("cart")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(stateful_set_body(&existing)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/namespaces/{NS}/pods/cart-0")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "Status", "apiVersion": "v1", "metadata": {},
            "status": "Success", "code": 200
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/namespaces/{NS}/pods/cart-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "Status", "apiVersion": "v1", "metadata": {},
            "status": "Success", "code": 200
        })))
        .mount(&server)
        .await;

    let handler = handler_for(client_for(&server).await);
    let changed = handler
        .patch("cart", labeled_stateful_set("cart", 3), NS)
        .await
        .unwrap();
    assert!(changed);
}

#[tokio::test]
async fn test_sweep_runs_even_when_patch_fails() {
    let server = MockServer::start().await;
    let mut existing = labeled_stateful_set("cart", 2);
    snapshot::record(&mut existing).unwrap();

    mount_existing(&server, &existing).await;
    mount_pod_list(&server, vec![pod_body("cart-0", false)]).await;
    Mock::given(method("PATCH"))
        .and(path(sts_path("cart")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "kind": "Status", "apiVersion": "v1", "metadata": {},
            "status": "Failure", "message": "internal error",
            "reason": "InternalError", "code": 500
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/namespaces/{NS}/pods/cart-0")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "Status", "apiVersion": "v1", "metadata": {},
            "status": "Success", "code": 200
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(client_for(&server).await);
    let result = handler
        .patch("cart", labeled_stateful_set("cart", 3), NS)
        .await;
    assert!(result.is_err(), "patch failure must still surface");
}

#[tokio::test]
async fn test_no_sweep_when_pods_are_healthy() {
    let server = MockServer::start().await;
    let mut existing = labeled_stateful_set("cart", 2);
    snapshot::record(&mut existing).unwrap();

    mount_existing(&server, &existing).await;
    mount_pod_list(&server, vec![pod_body("cart-0", true), pod_body("cart-1", true)]).await;
    Mock::given(method("PATCH"))
        .and(path(sts_path("cart")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(stateful_set_body(&existing)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handler = handler_for(client_for(&server).await);
    let changed = handler
        .patch("cart", labeled_stateful_set("cart", 3), NS)
        .await
        .unwrap();
    assert!(changed);
}
