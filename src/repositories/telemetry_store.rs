//! Contrato del Telemetry Store
//!
//! Persiste los documentos Vehicle y LogEntry. Hay dos implementaciones:
//! PostgreSQL (`PgTelemetryStore`) y memoria (`MemoryTelemetryStore`).

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{LogEntry, Vehicle, VehicleStatus};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Todos los vehículos persistidos
    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>>;

    /// Borrar todos los vehículos e insertar los dados; el store asigna los ids
    async fn replace_vehicles(&self, vehicles: Vec<Vehicle>) -> StoreResult<usize>;

    /// Cambiar el estado de un vehículo por id del store.
    /// Devuelve `None` si el vehículo no existe.
    async fn update_vehicle_status(
        &self,
        store_id: &str,
        status: VehicleStatus,
    ) -> StoreResult<Option<Vehicle>>;

    /// Persistir un log; el store asigna id y timestamp de servidor
    async fn insert_log(&self, entry: LogEntry) -> StoreResult<LogEntry>;

    /// Los `limit` logs más recientes, en orden descendente de timestamp
    async fn recent_logs(&self, limit: usize) -> StoreResult<Vec<LogEntry>>;

    fn backend_name(&self) -> &'static str;
}
