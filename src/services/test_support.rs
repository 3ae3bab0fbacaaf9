//! Dobles de prueba de los colaboradores HTTP

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::clients::{AdvisoryClient, ClientError, ClientResult, FleetApi};
use crate::dto::fleet_dto::{SeedResponse, UpdateStatusResponse};
use crate::models::{AIResponse, LogEntry, Vehicle, VehicleStatus};

fn offline() -> ClientError {
    ClientError::Status {
        status: 503,
        body: "Backend offline".to_string(),
    }
}

pub fn store_vehicle(store_id: &str, reg_number: &str, status: VehicleStatus) -> Vehicle {
    Vehicle {
        id: String::new(),
        store_id: Some(store_id.to_string()),
        reg_number: reg_number.to_string(),
        driver_name: "Store Driver".to_string(),
        status,
        lat: 24.81,
        lng: 67.05,
        speed: 30.0,
        battery: 60.0,
        cargo: "FMCG Goods".to_string(),
        destination: "DHA Phase 8".to_string(),
        last_update: Utc::now(),
        path: vec![[24.81, 67.05]],
    }
}

/// API del store con respuestas programadas.
///
/// Cada llamada a `fetch_fleet` consume la siguiente respuesta de la cola;
/// con la cola vacía el backend se comporta como caído.
#[derive(Default)]
pub struct FakeFleetApi {
    fleet_replies: Mutex<VecDeque<Option<Vec<Vehicle>>>>,
    logs_reply: Mutex<Option<Vec<LogEntry>>>,
    seed_fails: bool,
    update_fails: bool,
    pub fetch_calls: AtomicUsize,
    pub seed_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl FakeFleetApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fleet_replies(self, replies: Vec<Option<Vec<Vehicle>>>) -> Self {
        *self.fleet_replies.lock().unwrap() = replies.into();
        self
    }

    pub fn with_logs(self, logs: Option<Vec<LogEntry>>) -> Self {
        *self.logs_reply.lock().unwrap() = logs;
        self
    }

    pub fn with_failing_seed(mut self) -> Self {
        self.seed_fails = true;
        self
    }

    pub fn with_failing_updates(mut self) -> Self {
        self.update_fails = true;
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FleetApi for FakeFleetApi {
    async fn fetch_fleet(&self) -> ClientResult<Vec<Vehicle>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.fleet_replies.lock().unwrap().pop_front().flatten();
        reply.ok_or_else(offline)
    }

    async fn fetch_logs(&self) -> ClientResult<Vec<LogEntry>> {
        self.logs_reply.lock().unwrap().clone().ok_or_else(offline)
    }

    async fn seed(&self) -> ClientResult<SeedResponse> {
        self.seed_calls.fetch_add(1, Ordering::SeqCst);
        if self.seed_fails {
            return Err(offline());
        }
        Ok(SeedResponse {
            message: "Database seeded successfully".to_string(),
            count: 3,
        })
    }

    async fn update_status(
        &self,
        store_id: &str,
        status: VehicleStatus,
    ) -> ClientResult<UpdateStatusResponse> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.update_fails {
            return Err(offline());
        }

        let mut vehicle = store_vehicle(store_id, "KHI-LOG-STORE", status);
        vehicle.battery = 77.0;
        let mut log = LogEntry::status_change(&vehicle.reg_number, status);
        log.store_id = Some(format!("log-{}", store_id));

        Ok(UpdateStatusResponse { vehicle, log })
    }
}

/// Asesor de IA programado
pub enum FakeAdvisor {
    Answer(AIResponse),
    Fail,
    Hang,
}

#[async_trait]
impl AdvisoryClient for FakeAdvisor {
    async fn request_advisory(&self, _vehicles: &[Vehicle]) -> ClientResult<AIResponse> {
        match self {
            FakeAdvisor::Answer(response) => Ok(response.clone()),
            FakeAdvisor::Fail => Err(ClientError::InvalidPayload("Unexpected token".to_string())),
            FakeAdvisor::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Err(offline())
            }
        }
    }
}
