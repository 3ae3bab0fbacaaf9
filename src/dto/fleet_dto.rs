use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{LogEntry, Vehicle, VehicleStatus};

// Request para cambiar el estado de un vehículo (id del store)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    pub status: VehicleStatus,
}

// Response de cambio de estado: ambos reflejan lo persistido
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub vehicle: Vehicle,
    pub log: LogEntry,
}

// Response del seed de la flota
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
    pub count: usize,
}
