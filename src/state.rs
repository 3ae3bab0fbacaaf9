//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::TelemetryStore;
use crate::services::FleetDashboard;

#[derive(Clone)]
pub struct AppState {
    /// Store de telemetría detrás de `/api/*`
    pub store: Arc<dyn TelemetryStore>,
    pub dashboard: Arc<FleetDashboard>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TelemetryStore>,
        dashboard: Arc<FleetDashboard>,
        config: EnvironmentConfig,
    ) -> Self {
        Self {
            store,
            dashboard,
            config,
        }
    }
}
