use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::fleet_dto::{SeedResponse, UpdateStatusRequest, UpdateStatusResponse};
use crate::models::{LogEntry, Vehicle};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/fleet", get(list_fleet))
        .route("/fleet/update-status", post(update_status))
        .route("/logs", get(recent_logs))
        .route("/seed", post(seed))
}

async fn list_fleet(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = FleetController::new(state.store.clone());
    let vehicles = controller.list_fleet().await?;
    Ok(Json(vehicles))
}

async fn recent_logs(State(state): State<AppState>) -> Result<Json<Vec<LogEntry>>, AppError> {
    let controller = FleetController::new(state.store.clone());
    let logs = controller.recent_logs().await?;
    Ok(Json(logs))
}

async fn seed(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    let controller = FleetController::new(state.store.clone());
    let response = controller.seed().await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let Json(request) = payload?;
    let controller = FleetController::new(state.store.clone());
    let response = controller.update_status(request).await?;
    Ok(Json(response))
}
