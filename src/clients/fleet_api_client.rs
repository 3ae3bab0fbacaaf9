//! Cliente HTTP de la API del store
//!
//! Es el colaborador de fetch que usa el motor del dashboard para hablar con
//! `/api/*`, tal como lo hacía el cliente web.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{ClientError, ClientResult};
use crate::dto::fleet_dto::{SeedResponse, UpdateStatusResponse};
use crate::models::{LogEntry, Vehicle, VehicleStatus};

/// Operaciones de la API del store que consume el dashboard
#[async_trait]
pub trait FleetApi: Send + Sync {
    async fn fetch_fleet(&self) -> ClientResult<Vec<Vehicle>>;

    async fn fetch_logs(&self) -> ClientResult<Vec<LogEntry>>;

    async fn seed(&self) -> ClientResult<SeedResponse>;

    async fn update_status(
        &self,
        store_id: &str,
        status: VehicleStatus,
    ) -> ClientResult<UpdateStatusResponse>;
}

#[derive(Clone)]
pub struct FleetApiClient {
    client: Client,
    base_url: String,
}

impl FleetApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("FleetTracker/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Verificar el status y decodificar el cuerpo JSON
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::InvalidPayload(e.to_string()))
}

#[async_trait]
impl FleetApi for FleetApiClient {
    async fn fetch_fleet(&self) -> ClientResult<Vec<Vehicle>> {
        let response = self.client.get(self.url("/fleet")).send().await?;
        let mut vehicles: Vec<Vehicle> = read_json(response).await?;
        vehicles.iter_mut().for_each(Vehicle::normalize_identity);
        Ok(vehicles)
    }

    async fn fetch_logs(&self) -> ClientResult<Vec<LogEntry>> {
        let response = self.client.get(self.url("/logs")).send().await?;
        let mut logs: Vec<LogEntry> = read_json(response).await?;
        logs.iter_mut().for_each(LogEntry::normalize_identity);
        Ok(logs)
    }

    async fn seed(&self) -> ClientResult<SeedResponse> {
        let response = self.client.post(self.url("/seed")).send().await?;
        read_json(response).await
    }

    async fn update_status(
        &self,
        store_id: &str,
        status: VehicleStatus,
    ) -> ClientResult<UpdateStatusResponse> {
        let response = self
            .client
            .post(self.url("/fleet/update-status"))
            .json(&json!({ "id": store_id, "status": status }))
            .send()
            .await?;

        let mut update: UpdateStatusResponse = read_json(response).await?;
        update.vehicle.normalize_identity();
        update.log.normalize_identity();
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = FleetApiClient::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/fleet"), "http://localhost:5000/api/fleet");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_an_error() {
        // Puerto 9 (discard) no tiene servidor HTTP
        let client = FleetApiClient::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
        assert!(client.fetch_fleet().await.is_err());
    }
}
