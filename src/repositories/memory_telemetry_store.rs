//! Telemetry Store en memoria
//!
//! Se usa cuando no hay `DATABASE_URL` y en los tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::telemetry_store::{StoreResult, TelemetryStore};
use crate::models::{LogEntry, Vehicle, VehicleStatus};

#[derive(Default)]
pub struct MemoryTelemetryStore {
    vehicles: RwLock<Vec<Vehicle>>,
    logs: RwLock<Vec<LogEntry>>,
}

impl MemoryTelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl TelemetryStore for MemoryTelemetryStore {
    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        Ok(self.vehicles.read().await.clone())
    }

    async fn replace_vehicles(&self, vehicles: Vec<Vehicle>) -> StoreResult<usize> {
        let stored: Vec<Vehicle> = vehicles
            .into_iter()
            .map(|mut vehicle| {
                let id = Self::assign_id();
                vehicle.store_id = Some(id.clone());
                vehicle.id = id;
                vehicle
            })
            .collect();

        let count = stored.len();
        *self.vehicles.write().await = stored;
        Ok(count)
    }

    async fn update_vehicle_status(
        &self,
        store_id: &str,
        status: VehicleStatus,
    ) -> StoreResult<Option<Vehicle>> {
        let mut vehicles = self.vehicles.write().await;
        let updated = vehicles
            .iter_mut()
            .find(|v| v.store_id.as_deref() == Some(store_id))
            .map(|vehicle| {
                vehicle.set_status(status);
                vehicle.clone()
            });
        Ok(updated)
    }

    async fn insert_log(&self, mut entry: LogEntry) -> StoreResult<LogEntry> {
        let id = Self::assign_id();
        entry.store_id = Some(id.clone());
        entry.id = id;
        entry.timestamp = Utc::now();

        self.logs.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn recent_logs(&self, limit: usize) -> StoreResult<Vec<LogEntry>> {
        let mut logs = self.logs.read().await.clone();
        // Con timestamps iguales gana el último insertado
        logs.reverse();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(limit);
        Ok(logs)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
