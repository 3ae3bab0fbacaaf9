use std::sync::Arc;

use validator::Validate;

use crate::dto::fleet_dto::{SeedResponse, UpdateStatusRequest, UpdateStatusResponse};
use crate::models::{LogEntry, Vehicle, LOG_BUFFER_LIMIT};
use crate::repositories::seed::seed_fleet;
use crate::repositories::TelemetryStore;
use crate::utils::errors::{not_found_error, AppError};

pub struct FleetController {
    store: Arc<dyn TelemetryStore>,
}

impl FleetController {
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self { store }
    }

    pub async fn list_fleet(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = self.store.list_vehicles().await?;
        log::debug!("🚚 {} vehículos en el store ({})", vehicles.len(), self.store.backend_name());
        Ok(vehicles)
    }

    pub async fn recent_logs(&self) -> Result<Vec<LogEntry>, AppError> {
        Ok(self.store.recent_logs(LOG_BUFFER_LIMIT).await?)
    }

    /// Reemplazar todos los vehículos por la flota semilla
    pub async fn seed(&self) -> Result<SeedResponse, AppError> {
        let count = self.store.replace_vehicles(seed_fleet()).await?;
        log::info!("🌱 Store sembrado con {} vehículos", count);

        Ok(SeedResponse {
            message: "Database seeded successfully".to_string(),
            count,
        })
    }

    pub async fn update_status(
        &self,
        request: UpdateStatusRequest,
    ) -> Result<UpdateStatusResponse, AppError> {
        request.validate()?;

        let vehicle = self
            .store
            .update_vehicle_status(&request.id, request.status)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.id))?;

        // Log de auditoría persistido junto al cambio
        let log = self
            .store
            .insert_log(LogEntry::status_change(&vehicle.reg_number, request.status))
            .await?;

        log::info!(
            "🔄 {} -> {} (log {})",
            vehicle.reg_number,
            request.status,
            log.id
        );

        Ok(UpdateStatusResponse { vehicle, log })
    }
}
