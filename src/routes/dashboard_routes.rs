use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::dto::dashboard_dto::{DashboardSnapshot, StatusCommandRequest, StatusCommandResponse};
use crate::models::AIResponse;
use crate::services::StatusUpdateOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/vehicles/:reference/status", post(update_vehicle_status))
        .route("/advisory", get(latest_advisory).post(refresh_advisory))
}

async fn get_state(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot().await)
}

// Con cuerpo válido siempre responde 200; `outcome` indica el camino tomado
async fn update_vehicle_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    payload: Result<Json<StatusCommandRequest>, JsonRejection>,
) -> Result<Json<StatusCommandResponse>, AppError> {
    let Json(request) = payload?;
    let outcome = state.dashboard.update_status(&reference, request.status).await;
    Ok(Json(StatusCommandResponse::from(outcome)))
}

async fn latest_advisory(State(state): State<AppState>) -> Json<Option<AIResponse>> {
    Json(state.dashboard.latest_advisory().await)
}

async fn refresh_advisory(State(state): State<AppState>) -> Json<AIResponse> {
    Json(state.dashboard.refresh_advisory().await)
}

impl From<StatusUpdateOutcome> for StatusCommandResponse {
    fn from(outcome: StatusUpdateOutcome) -> Self {
        let label = outcome.label().to_string();
        match outcome {
            StatusUpdateOutcome::Persisted { vehicle, log }
            | StatusUpdateOutcome::AppliedLocally { vehicle, log } => Self {
                outcome: label,
                log,
                vehicle: Some(vehicle),
            },
            StatusUpdateOutcome::UnknownVehicle { log } => Self {
                outcome: label,
                log,
                vehicle: None,
            },
        }
    }
}
