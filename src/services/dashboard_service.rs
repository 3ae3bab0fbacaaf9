//! Motor del dashboard de la flota
//!
//! Agrupa el estado en memoria con los servicios que lo mutan y arranca
//! los tres ticks periódicos (sync, simulación y heartbeat).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::clients::{AdvisoryClient, FleetApi};
use crate::config::EnvironmentConfig;
use crate::dto::dashboard_dto::DashboardSnapshot;
use crate::models::{AIResponse, VehicleStatus};
use crate::services::advisory_service::AdvisoryService;
use crate::services::fleet_state::{FleetState, SharedFleetState};
use crate::services::fleet_sync_service::{FleetSyncService, SyncOutcome};
use crate::services::scheduler::spawn_periodic;
use crate::services::simulation_service::{SimulationConfig, SimulationService};
use crate::services::status_command_service::{StatusCommandService, StatusUpdateOutcome};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub sync_interval: Duration,
    pub simulation_interval: Duration,
    pub heartbeat_interval: Duration,
    pub heartbeat_in_connected_mode: bool,
    pub advisory_timeout: Duration,
    pub simulation: SimulationConfig,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_millis(5000),
            simulation_interval: Duration::from_millis(2000),
            heartbeat_interval: Duration::from_millis(8000),
            heartbeat_in_connected_mode: true,
            advisory_timeout: Duration::from_secs(20),
            simulation: SimulationConfig::default(),
        }
    }
}

impl From<&EnvironmentConfig> for DashboardSettings {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            sync_interval: config.sync_interval,
            simulation_interval: config.simulation_interval,
            heartbeat_interval: config.heartbeat_interval,
            heartbeat_in_connected_mode: config.heartbeat_in_connected_mode,
            advisory_timeout: config.advisory_timeout,
            simulation: SimulationConfig::default(),
        }
    }
}

pub struct FleetDashboard {
    state: SharedFleetState,
    sync: FleetSyncService,
    simulation: SimulationService,
    commands: StatusCommandService,
    advisory: AdvisoryService,
    settings: DashboardSettings,
}

impl FleetDashboard {
    /// Dashboard en modo simulado con la unidad de arranque
    pub fn new(
        api: Arc<dyn FleetApi>,
        advisor: Arc<dyn AdvisoryClient>,
        settings: DashboardSettings,
    ) -> Self {
        Self::with_state(FleetState::bootstrap().shared(), api, advisor, settings)
    }

    pub fn with_state(
        state: SharedFleetState,
        api: Arc<dyn FleetApi>,
        advisor: Arc<dyn AdvisoryClient>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            sync: FleetSyncService::new(state.clone(), api.clone()),
            simulation: SimulationService::new(
                state.clone(),
                settings.simulation,
                settings.heartbeat_in_connected_mode,
            ),
            commands: StatusCommandService::new(state.clone(), api),
            advisory: AdvisoryService::new(advisor, settings.advisory_timeout),
            state,
            settings,
        }
    }

    pub fn state(&self) -> SharedFleetState {
        self.state.clone()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn sync_now(&self) -> SyncOutcome {
        self.sync.tick().await
    }

    pub async fn update_status(&self, reference: &str, status: VehicleStatus) -> StatusUpdateOutcome {
        self.commands.update_status(reference, status).await
    }

    /// Pedir un análisis nuevo con la flota actual y guardarlo como el último.
    ///
    /// La petición corre en su propia tarea: si el llamador se cancela, el
    /// análisis termina igual y el flag de carga se libera.
    pub async fn refresh_advisory(&self) -> AIResponse {
        let vehicles = {
            let mut state = self.state.write().await;
            state.begin_advisory();
            state.vehicles().to_vec()
        };

        let state = self.state.clone();
        let advisory = self.advisory.clone();
        let task = tokio::spawn(async move {
            let response = advisory.analyze(&vehicles).await;
            state.write().await.finish_advisory(response.clone());
            response
        });

        match task.await {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ La tarea de análisis de IA terminó con error: {}", e);
                AIResponse::fallback()
            }
        }
    }

    pub async fn latest_advisory(&self) -> Option<AIResponse> {
        self.state.read().await.advisory().cloned()
    }

    /// Arrancar los ticks periódicos; el primer sync se dispara de inmediato
    pub fn start(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let sync = self.clone();
        let simulation = self.clone();
        let heartbeat = self.clone();

        vec![
            spawn_periodic("sync", self.settings.sync_interval, move || {
                let dashboard = sync.clone();
                async move {
                    dashboard.sync.tick().await;
                }
            }),
            spawn_periodic("simulation", self.settings.simulation_interval, move || {
                let dashboard = simulation.clone();
                async move {
                    dashboard.simulation.tick().await;
                }
            }),
            spawn_periodic("heartbeat", self.settings.heartbeat_interval, move || {
                let dashboard = heartbeat.clone();
                async move {
                    dashboard.simulation.heartbeat().await;
                }
            }),
        ]
    }
}
