//! Routers HTTP por recurso

pub mod dashboard_routes;
pub mod fleet_routes;
pub mod health_routes;

use axum::Router;

use crate::state::AppState;

/// Router completo de la aplicación (sin capas de CORS ni trazas)
pub fn create_app_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(health_routes::create_health_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router());

    if state.config.serve_store_api {
        router = router.nest("/api", fleet_routes::create_fleet_router());
    }

    router.with_state(state)
}
