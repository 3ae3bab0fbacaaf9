//! Services module
//!
//! Lógica del motor del dashboard: estado en memoria, sincronización con el
//! store, simulación local, comandos de estado y análisis de IA.

pub mod advisory_service;
pub mod dashboard_service;
pub mod fleet_state;
pub mod fleet_sync_service;
pub mod scheduler;
pub mod simulation_service;
pub mod status_command_service;

#[cfg(test)]
pub mod test_support;

pub use advisory_service::AdvisoryService;
pub use dashboard_service::{DashboardSettings, FleetDashboard};
pub use fleet_state::{FleetState, SharedFleetState};
pub use fleet_sync_service::{FleetSyncService, SyncOutcome};
pub use simulation_service::{SimulationConfig, SimulationService};
pub use status_command_service::{StatusCommandService, StatusUpdateOutcome};
