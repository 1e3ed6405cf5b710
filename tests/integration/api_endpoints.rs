//! HTTP API tests against a live server bound to an ephemeral port

use std::sync::Arc;

use tokio::sync::broadcast;
use uptime_monitoring::actors::MonitorHandle;
use uptime_monitoring::api::{spawn_api_server, ApiConfig, ApiState};
use uptime_monitoring::store::{MemoryStore, TargetStore, WebsiteRecord};
use uptime_monitoring::TargetKind;

use crate::helpers::*;

async fn spawn_test_api(
    store: Arc<dyn TargetStore>,
    auth_token: Option<String>,
) -> (String, MonitorHandle, MonitorHandle) {
    let notifier = Arc::new(RecordingNotifier::new());
    let (snapshot_tx, _) = broadcast::channel(16);

    let server_monitor = MonitorHandle::spawn(
        TargetKind::Server,
        &on_demand_only_config(),
        store.clone(),
        notifier.clone(),
        snapshot_tx.clone(),
    );
    let website_monitor = MonitorHandle::spawn(
        TargetKind::Website,
        &on_demand_only_config(),
        store.clone(),
        notifier,
        snapshot_tx.clone(),
    );

    let state = ApiState::new(
        store,
        server_monitor.clone(),
        website_monitor.clone(),
        snapshot_tx,
    );

    let addr = spawn_api_server(
        ApiConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            auth_token,
            enable_cors: false,
        },
        state,
    )
    .await
    .unwrap();

    (format!("http://{addr}"), server_monitor, website_monitor)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let store = Arc::new(MemoryStore::new());
    let (base, _s, _w) = spawn_test_api(store, None).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/api/v1/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn server_crud_roundtrip() {
    let store = Arc::new(MemoryStore::new());
    let (base, _s, _w) = spawn_test_api(store, None).await;
    let client = reqwest::Client::new();

    // Register
    let created: serde_json::Value = client
        .post(format!("{base}/api/v1/servers"))
        .json(&serde_json::json!({
            "name": "web-1",
            "host": "10.0.0.1",
            "port": 4000,
            "api_key": "secret",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["server"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["server"]["status"], "UNKNOWN");

    // List
    let listed: serde_json::Value = client
        .get(format!("{base}/api/v1/servers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["count"], 1);

    // Delete
    let response = client
        .delete(format!("{base}/api/v1/servers/{id}"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let listed: serde_json::Value = client
        .get(format!("{base}/api/v1/servers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["count"], 0);
}

#[tokio::test]
async fn check_endpoint_reports_partial_outages_in_body() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_website(WebsiteRecord::new("http://127.0.0.1:1", None))
        .await
        .unwrap();
    let (base, _s, _w) = spawn_test_api(store, None).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/api/v1/websites/check"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // A failed target is a row with an error reason, not an HTTP
    // failure.
    assert_eq!(body["message"], "Website monitoring completed.");
    assert_eq!(body["results"][0]["status"], "DOWN");
    assert!(body["results"][0]["error"].is_string());
}

#[tokio::test]
async fn check_endpoint_with_no_targets_is_explicit() {
    let store = Arc::new(MemoryStore::new());
    let (base, _s, _w) = spawn_test_api(store, None).await;

    let response = reqwest::get(format!("{base}/api/v1/websites/check"))
        .await
        .unwrap();
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "No websites found to monitor.");
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn bearer_token_guards_all_routes() {
    let store = Arc::new(MemoryStore::new());
    let (base, _s, _w) = spawn_test_api(store, Some("hub-secret".to_string())).await;
    let client = reqwest::Client::new();

    // Without a token
    let response = client
        .get(format!("{base}/api/v1/servers"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Wrong token
    let response = client
        .get(format!("{base}/api/v1/servers"))
        .bearer_auth("nope")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // Correct token
    let response = client
        .get(format!("{base}/api/v1/servers"))
        .bearer_auth("hub-secret")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn invalid_registration_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let (base, _s, _w) = spawn_test_api(store.clone(), None).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/v1/servers"))
        .json(&serde_json::json!({
            "name": "  ",
            "host": "10.0.0.1",
            "api_key": "key",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{base}/api/v1/websites"))
        .json(&serde_json::json!({"url": "example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Nothing was registered.
    assert!(store.list_servers().await.unwrap().is_empty());
    assert!(store.list_websites().await.unwrap().is_empty());
}
