use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let mode = state.dashboard.state().read().await.mode();
    Json(json!({
        "status": "ok",
        "service": "fleet-tracker",
        "store": state.store.backend_name(),
        "mode": mode.as_str(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
