//! Telemetry Store sobre PostgreSQL
//!
//! Los vehículos viven en la tabla `vehicles` (el historial de posiciones como
//! JSONB) y los logs de auditoría en `security_logs`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::telemetry_store::{StoreError, StoreResult, TelemetryStore};
use crate::models::{LogEntry, Vehicle, VehicleStatus};

/// Fila de la tabla vehicles
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    reg_number: String,
    driver_name: String,
    status: String,
    lat: f64,
    lng: f64,
    speed: f64,
    battery: f64,
    cargo: String,
    destination: String,
    path: Json<Vec<[f64; 2]>>,
    last_update: DateTime<Utc>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = StoreError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<VehicleStatus>().map_err(StoreError::Corrupt)?;
        let id = row.id.to_string();

        Ok(Vehicle {
            id: id.clone(),
            store_id: Some(id),
            reg_number: row.reg_number,
            driver_name: row.driver_name,
            status,
            lat: row.lat,
            lng: row.lng,
            speed: row.speed,
            battery: row.battery,
            cargo: row.cargo,
            destination: row.destination,
            last_update: row.last_update,
            path: row.path.0,
        })
    }
}

/// Fila de la tabla security_logs
#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    id: Uuid,
    timestamp: DateTime<Utc>,
    vehicle_id: String,
    message: String,
    severity: String,
    hash: String,
}

impl TryFrom<LogRow> for LogEntry {
    type Error = StoreError;

    fn try_from(row: LogRow) -> Result<Self, Self::Error> {
        let severity = row.severity.parse().map_err(StoreError::Corrupt)?;
        let id = row.id.to_string();

        Ok(LogEntry {
            id: id.clone(),
            store_id: Some(id),
            timestamp: row.timestamp,
            vehicle_id: row.vehicle_id,
            message: row.message,
            severity,
            hash: row.hash,
        })
    }
}

pub struct PgTelemetryStore {
    pool: PgPool,
}

impl PgTelemetryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetryStore for PgTelemetryStore {
    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            "SELECT * FROM vehicles ORDER BY reg_number ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Vehicle::try_from).collect()
    }

    async fn replace_vehicles(&self, vehicles: Vec<Vehicle>) -> StoreResult<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM vehicles").execute(&mut *tx).await?;

        let count = vehicles.len();
        for vehicle in vehicles {
            sqlx::query(
                r#"
                INSERT INTO vehicles (id, reg_number, driver_name, status, lat, lng, speed, battery, cargo, destination, path, last_update)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&vehicle.reg_number)
            .bind(&vehicle.driver_name)
            .bind(vehicle.status.as_str())
            .bind(vehicle.lat)
            .bind(vehicle.lng)
            .bind(vehicle.speed)
            .bind(vehicle.battery)
            .bind(&vehicle.cargo)
            .bind(&vehicle.destination)
            .bind(Json(&vehicle.path))
            .bind(vehicle.last_update)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(count)
    }

    async fn update_vehicle_status(
        &self,
        store_id: &str,
        status: VehicleStatus,
    ) -> StoreResult<Option<Vehicle>> {
        // Un id que no es UUID no puede existir en la tabla
        let id = match Uuid::parse_str(store_id) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };

        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE vehicles
            SET status = $2, last_update = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn insert_log(&self, entry: LogEntry) -> StoreResult<LogEntry> {
        let row = sqlx::query_as::<_, LogRow>(
            r#"
            INSERT INTO security_logs (id, timestamp, vehicle_id, message, severity, hash)
            VALUES ($1, NOW(), $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.vehicle_id)
        .bind(&entry.message)
        .bind(entry.severity.as_str())
        .bind(&entry.hash)
        .fetch_one(&self.pool)
        .await?;

        LogEntry::try_from(row)
    }

    async fn recent_logs(&self, limit: usize) -> StoreResult<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, LogRow>(
            "SELECT * FROM security_logs ORDER BY timestamp DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LogEntry::try_from).collect()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> VehicleRow {
        VehicleRow {
            id: Uuid::new_v4(),
            reg_number: "KHI-LOG-A24".to_string(),
            driver_name: "Mohammad Ali".to_string(),
            status: status.to_string(),
            lat: 24.8607,
            lng: 67.0011,
            speed: 45.0,
            battery: 88.0,
            cargo: "Medical Supplies".to_string(),
            destination: "North Nazimabad".to_string(),
            path: Json(vec![[24.8607, 67.0011]]),
            last_update: Utc::now(),
        }
    }

    #[test]
    fn test_vehicle_row_conversion_sets_both_ids() {
        let vehicle = Vehicle::try_from(row("warning")).unwrap();
        assert_eq!(vehicle.status, VehicleStatus::Warning);
        assert_eq!(vehicle.store_id.as_deref(), Some(vehicle.id.as_str()));
    }

    #[test]
    fn test_vehicle_row_with_unknown_status_is_corrupt() {
        let result = Vehicle::try_from(row("parked"));
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }
}
