use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fleet_tracker::clients::{FleetApiClient, GeminiClient};
use fleet_tracker::config::EnvironmentConfig;
use fleet_tracker::repositories::MemoryTelemetryStore;
use fleet_tracker::routes::create_app_router;
use fleet_tracker::services::{DashboardSettings, FleetDashboard};
use fleet_tracker::state::AppState;

fn test_config(serve_store_api: bool) -> EnvironmentConfig {
    EnvironmentConfig::from_lookup(|key| match key {
        "SERVE_STORE_API" => Some(serve_store_api.to_string()),
        _ => None,
    })
    .unwrap()
}

fn create_test_app(serve_store_api: bool) -> Router {
    let config = test_config(serve_store_api);

    // Sin servidor en el puerto 9: el dashboard se queda en modo simulado
    let api = FleetApiClient::new("http://127.0.0.1:9/api", Duration::from_millis(300)).unwrap();
    let advisor = GeminiClient::new("http://127.0.0.1:9", "test-model", None, Duration::from_secs(1)).unwrap();
    let dashboard = Arc::new(FleetDashboard::new(
        Arc::new(api),
        Arc::new(advisor),
        DashboardSettings::default(),
    ));

    let state = AppState::new(Arc::new(MemoryTelemetryStore::new()), dashboard, config);
    create_app_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(true);
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["mode"], "simulated");
}

#[tokio::test]
async fn test_seed_then_list_fleet() {
    let app = create_test_app(true);

    let (status, body) = send(&app, "GET", "/api/fleet", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "POST", "/api/seed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Database seeded successfully");
    assert_eq!(body["count"], 3);

    let (_, body) = send(&app, "GET", "/api/fleet", None).await;
    let fleet = body.as_array().unwrap();
    assert_eq!(fleet.len(), 3);
    assert!(fleet.iter().all(|v| v["_id"].is_string()));
    assert!(fleet.iter().any(|v| v["regNumber"] == "KHI-LOG-A24"));
}

#[tokio::test]
async fn test_update_status_persists_vehicle_and_log() {
    let app = create_test_app(true);
    send(&app, "POST", "/api/seed", None).await;
    let (_, fleet) = send(&app, "GET", "/api/fleet", None).await;
    let id = fleet[0]["_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/fleet/update-status",
        Some(json!({ "id": id, "status": "emergency" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"]["_id"], id.as_str());
    assert_eq!(body["vehicle"]["status"], "emergency");
    assert_eq!(body["log"]["severity"], "critical");
    assert_eq!(body["log"]["message"], "Status updated to EMERGENCY");

    let (_, logs) = send(&app, "GET", "/api/logs", None).await;
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["vehicleId"], fleet[0]["regNumber"]);
}

#[tokio::test]
async fn test_update_status_unknown_vehicle_is_404() {
    let app = create_test_app(true);
    let (status, body) = send(
        &app,
        "POST",
        "/api/fleet/update-status",
        Some(json!({ "id": "does-not-exist", "status": "idle" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_status_empty_id_is_validation_error() {
    let app = create_test_app(true);
    let (status, body) = send(
        &app,
        "POST",
        "/api/fleet/update-status",
        Some(json!({ "id": "", "status": "idle" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_status_unknown_status_is_bad_request() {
    let app = create_test_app(true);
    let (status, body) = send(
        &app,
        "POST",
        "/api/fleet/update-status",
        Some(json!({ "id": "abc", "status": "parked" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_update_status_malformed_json_is_bad_request() {
    let app = create_test_app(true);
    let request = Request::builder()
        .method("POST")
        .uri("/api/fleet/update-status")
        .header("content-type", "application/json")
        .body(Body::from("{\"id\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_dashboard_status_command_invalid_body_is_bad_request() {
    let app = create_test_app(true);
    let (status, body) = send(
        &app,
        "POST",
        "/dashboard/vehicles/sim_1/status",
        Some(json!({ "status": "parked" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (_, state) = send(&app, "GET", "/dashboard/state", None).await;
    assert_eq!(state["vehicles"][0]["status"], "active");
    assert!(state["logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_store_api_can_be_disabled() {
    let app = create_test_app(false);
    let (status, _) = send(&app, "GET", "/api/fleet", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/dashboard/state", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_dashboard_state_starts_simulated() {
    let app = create_test_app(true);
    let (status, body) = send(&app, "GET", "/dashboard/state", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "simulated");
    assert_eq!(body["syncing"], false);
    assert_eq!(body["vehicles"][0]["id"], "sim_1");
    assert_eq!(body["advisoryLoading"], false);
    assert!(body["advisory"].is_null());
}

#[tokio::test]
async fn test_dashboard_status_command_in_simulated_mode() {
    let app = create_test_app(true);
    let (status, body) = send(
        &app,
        "POST",
        "/dashboard/vehicles/sim_1/status",
        Some(json!({ "status": "emergency" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "applied_locally");
    assert_eq!(body["log"]["severity"], "critical");
    assert_eq!(body["vehicle"]["status"], "emergency");
    assert_eq!(body["vehicle"]["battery"], 90.0);

    let (_, state) = send(&app, "GET", "/dashboard/state", None).await;
    assert_eq!(state["logs"].as_array().unwrap().len(), 1);
    assert_eq!(state["vehicles"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dashboard_status_command_unknown_vehicle() {
    let app = create_test_app(true);
    let (status, body) = send(
        &app,
        "POST",
        "/dashboard/vehicles/ghost/status",
        Some(json!({ "status": "idle" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unknown_vehicle");
    assert_eq!(body["log"]["severity"], "warning");
    assert!(body.get("vehicle").is_none());
}

#[tokio::test]
async fn test_advisory_without_key_returns_fallback() {
    let app = create_test_app(true);

    let (_, latest) = send(&app, "GET", "/dashboard/advisory", None).await;
    assert!(latest.is_null());

    let (status, body) = send(&app, "POST", "/dashboard/advisory", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskLevel"], "Medium");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 4);

    let (_, latest) = send(&app, "GET", "/dashboard/advisory", None).await;
    assert_eq!(latest, body);
}
