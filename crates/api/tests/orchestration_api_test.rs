mod support;

use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use galaxy_common::{Registry, Role};

use support::{descriptor, spawn_instance, unused_port_url};

/// Spawns a real feature-role instance and returns its API endpoint.
async fn spawn_feature(id: &str, name: &str) -> Url {
    let base = spawn_instance(
        Role::Feature,
        id,
        name,
        None,
        Registry::new(Vec::new()).unwrap(),
    )
    .await;
    base.join("api/feature").unwrap()
}

async fn spawn_core(registry: Registry) -> Url {
    spawn_instance(Role::Core, "core-01", "Galaxy Core", None, registry).await
}

#[tokio::test]
async fn test_orchestrate_endpoint_contract() {
    let alpha = spawn_feature("alpha", "Alpha").await;
    let gamma = spawn_feature("gamma", "Gamma").await;
    let registry = Registry::new(vec![
        descriptor("alpha", "Alpha", Some(alpha.clone())),
        descriptor("beta", "Beta", None),
        descriptor("gamma", "Gamma", Some(gamma)),
    ])
    .unwrap();
    let base = spawn_core(registry).await;

    let client = reqwest::Client::new();
    let response = client
        .post(base.join("api/orchestrate").unwrap())
        .json(&json!({
            "features": ["alpha", "beta", "gamma", "delta"],
            "payload": {"task": "sync"},
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["orchestrationId"]
        .as_str()
        .unwrap()
        .parse::<Uuid>()
        .is_ok());
    assert!(body["timestamp"].is_string());

    let called = body["calledFeatures"].as_array().unwrap();
    assert_eq!(called.len(), 2);
    assert_eq!(called[0]["featureId"], "alpha");
    assert_eq!(called[0]["featureName"], "Alpha");
    assert_eq!(called[0]["endpoint"], alpha.as_str());
    assert_eq!(called[0]["success"], true);
    assert_eq!(called[0]["data"]["data"]["received"]["task"], "sync");
    assert_eq!(called[1]["featureId"], "gamma");

    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["successful"], 2);
    assert_eq!(body["summary"]["failed"], 0);
}

#[tokio::test]
async fn test_orchestrate_partial_failure() {
    let alpha = spawn_feature("alpha", "Alpha").await;
    let dead = unused_port_url().await;
    let registry = Registry::new(vec![
        descriptor("alpha", "Alpha", Some(alpha)),
        descriptor("gamma", "Gamma", Some(dead)),
    ])
    .unwrap();
    let base = spawn_core(registry).await;

    let client = reqwest::Client::new();
    let body: Value = client
        .post(base.join("api/orchestrate").unwrap())
        .json(&json!({"features": ["alpha", "gamma"]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["successful"], 1);
    assert_eq!(body["summary"]["failed"], 1);

    let called = body["calledFeatures"].as_array().unwrap();
    assert_eq!(called[1]["featureId"], "gamma");
    assert_eq!(called[1]["success"], false);
    assert!(called[1]["error"].is_string());
    assert!(called[1].get("data").is_none());
}

#[tokio::test]
async fn test_list_orchestratable_features() {
    let alpha = spawn_feature("alpha", "Alpha").await;
    let registry = Registry::new(vec![
        descriptor("alpha", "Alpha", Some(alpha.clone())),
        descriptor("beta", "Beta", None),
    ])
    .unwrap();
    let base = spawn_core(registry).await;

    let body: Value = reqwest::get(base.join("api/orchestrate").unwrap())
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    let features = body["data"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["id"], "alpha");
    assert_eq!(features[0]["name"], "Alpha");
    assert_eq!(features[0]["endpoint"], alpha.as_str());
    assert_eq!(features[0]["canOrchestrate"], true);
}

#[tokio::test]
async fn test_system_health_map() {
    // Feature instances serve /api/health, which the probe derives from
    // their /api/feature endpoint.
    let alpha = spawn_feature("alpha", "Alpha").await;
    let dead = unused_port_url().await;
    let registry = Registry::new(vec![
        descriptor("alpha", "Alpha", Some(alpha)),
        descriptor("beta", "Beta", None),
        descriptor("gamma", "Gamma", Some(dead)),
    ])
    .unwrap();
    let base = spawn_core(registry).await;

    let body: Value = reqwest::get(base.join("api/system/health").unwrap())
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    let status = body["data"].as_object().unwrap();
    assert_eq!(status.len(), 2);
    assert_eq!(status["alpha"], true);
    assert_eq!(status["gamma"], false);
    assert!(!status.contains_key("beta"));
}

#[tokio::test]
async fn test_core_instance_has_no_feature_surface() {
    let base = spawn_core(Registry::new(Vec::new()).unwrap()).await;

    let response = reqwest::get(base.join("api/feature").unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
