//! Contenedor del estado en memoria del dashboard
//!
//! La flota, el buffer de logs, el modo de sincronización y el último
//! análisis de IA viven aquí. Lo comparten los servicios de sincronización,
//! simulación y comandos detrás de un único `RwLock`; ninguna mutación
//! mantiene el guard a través de una llamada de red.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::dto::dashboard_dto::DashboardSnapshot;
use crate::models::{AIResponse, LogEntry, SyncMode, Vehicle, VehicleStatus, LOG_BUFFER_LIMIT};

pub type SharedFleetState = Arc<RwLock<FleetState>>;

/// Vehículo con el que arranca el modo simulado
pub fn bootstrap_vehicle() -> Vehicle {
    Vehicle {
        id: "sim_1".to_string(),
        store_id: None,
        reg_number: "KHI-LOG-SIM-01".to_string(),
        driver_name: "Offline Simulator".to_string(),
        status: VehicleStatus::Active,
        lat: 24.8607,
        lng: 67.0011,
        speed: 40.0,
        battery: 90.0,
        cargo: "Simulation Data".to_string(),
        destination: "Site Area".to_string(),
        last_update: Utc::now(),
        path: vec![[24.8607, 67.0011]],
    }
}

#[derive(Debug, Default)]
pub struct FleetState {
    vehicles: Vec<Vehicle>,
    /// Más reciente primero
    logs: VecDeque<LogEntry>,
    mode: SyncMode,
    syncing: bool,
    advisory: Option<AIResponse>,
    /// Análisis de IA en curso
    advisory_in_flight: usize,
}

impl FleetState {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles,
            ..Self::default()
        }
    }

    /// Estado inicial: modo simulado con la unidad `sim_1`
    pub fn bootstrap() -> Self {
        Self::new(vec![bootstrap_vehicle()])
    }

    pub fn shared(self) -> SharedFleetState {
        Arc::new(RwLock::new(self))
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicles_mut(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    pub fn logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter()
    }

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Cambiar el modo; devuelve el modo anterior
    pub fn set_mode(&mut self, mode: SyncMode) -> SyncMode {
        std::mem::replace(&mut self.mode, mode)
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn set_syncing(&mut self, syncing: bool) {
        self.syncing = syncing;
    }

    /// Reemplazar la flota completa con los datos del store
    pub fn replace_fleet(&mut self, mut vehicles: Vec<Vehicle>) {
        vehicles.iter_mut().for_each(Vehicle::normalize_identity);
        self.vehicles = vehicles;
    }

    /// Reemplazar el buffer con la lista del store (ya viene más reciente primero)
    pub fn replace_logs(&mut self, logs: Vec<LogEntry>) {
        self.logs = logs.into_iter().take(LOG_BUFFER_LIMIT).collect();
    }

    /// Insertar al frente y desalojar las entradas más antiguas
    pub fn prepend_log(&mut self, entry: LogEntry) {
        self.logs.push_front(entry);
        self.logs.truncate(LOG_BUFFER_LIMIT);
    }

    pub fn find_by_reference(&self, reference: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.matches_reference(reference))
    }

    pub fn find_by_reference_mut(&mut self, reference: &str) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.matches_reference(reference))
    }

    /// Reemplazar por completo (sin merge) el registro con la misma clave canónica
    pub fn replace_vehicle(&mut self, mut vehicle: Vehicle) -> bool {
        vehicle.normalize_identity();
        match self.find_by_reference_mut(vehicle.canonical_key()) {
            Some(existing) => {
                *existing = vehicle;
                true
            }
            None => false,
        }
    }

    pub fn advisory(&self) -> Option<&AIResponse> {
        self.advisory.as_ref()
    }

    pub fn begin_advisory(&mut self) {
        self.advisory_in_flight += 1;
    }

    /// Guardar el análisis como el último y cerrar una petición en curso
    pub fn finish_advisory(&mut self, advisory: AIResponse) {
        self.advisory = Some(advisory);
        self.advisory_in_flight = self.advisory_in_flight.saturating_sub(1);
    }

    pub fn is_advisory_loading(&self) -> bool {
        self.advisory_in_flight > 0
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            mode: self.mode,
            syncing: self.syncing,
            vehicles: self.vehicles.clone(),
            logs: self.logs.iter().cloned().collect(),
            advisory: self.advisory.clone(),
            advisory_loading: self.is_advisory_loading(),
        }
    }
}
