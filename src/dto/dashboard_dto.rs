use serde::{Deserialize, Serialize};

use crate::models::{AIResponse, LogEntry, SyncMode, Vehicle, VehicleStatus};

// Estado completo del dashboard para la capa de presentación
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub mode: SyncMode,
    pub syncing: bool,
    pub vehicles: Vec<Vehicle>,
    pub logs: Vec<LogEntry>,
    pub advisory: Option<AIResponse>,
    pub advisory_loading: bool,
}

// Request del operador para cambiar el estado de un vehículo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCommandRequest {
    pub status: VehicleStatus,
}

// Response del comando de estado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCommandResponse {
    /// `persisted`, `applied_locally` o `unknown_vehicle`
    pub outcome: String,
    pub log: LogEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
}
