//! Manejador de comandos de estado del operador
//!
//! Con enlace activo el cambio va al store; si no hay enlace o el store
//! rechaza la petición se aplica en local. Siempre deja un registro de
//! auditoría y nunca devuelve error al llamador.

use std::sync::Arc;

use crate::clients::FleetApi;
use crate::models::{LogEntry, Severity, SyncMode, Vehicle, VehicleStatus};
use crate::services::fleet_state::SharedFleetState;

#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdateOutcome {
    /// Confirmado por el store; el registro local es la copia del store
    Persisted { vehicle: Vehicle, log: LogEntry },
    /// Aplicado solo en el estado en memoria
    AppliedLocally { vehicle: Vehicle, log: LogEntry },
    /// Ningún vehículo coincide con la referencia
    UnknownVehicle { log: LogEntry },
}

impl StatusUpdateOutcome {
    pub fn log(&self) -> &LogEntry {
        match self {
            StatusUpdateOutcome::Persisted { log, .. }
            | StatusUpdateOutcome::AppliedLocally { log, .. }
            | StatusUpdateOutcome::UnknownVehicle { log } => log,
        }
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        match self {
            StatusUpdateOutcome::Persisted { vehicle, .. }
            | StatusUpdateOutcome::AppliedLocally { vehicle, .. } => Some(vehicle),
            StatusUpdateOutcome::UnknownVehicle { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusUpdateOutcome::Persisted { .. } => "persisted",
            StatusUpdateOutcome::AppliedLocally { .. } => "applied_locally",
            StatusUpdateOutcome::UnknownVehicle { .. } => "unknown_vehicle",
        }
    }
}

pub struct StatusCommandService {
    state: SharedFleetState,
    api: Arc<dyn FleetApi>,
}

impl StatusCommandService {
    pub fn new(state: SharedFleetState, api: Arc<dyn FleetApi>) -> Self {
        Self { state, api }
    }

    pub async fn update_status(&self, reference: &str, status: VehicleStatus) -> StatusUpdateOutcome {
        if let Some(store_id) = self.live_store_id(reference).await {
            match self.api.update_status(&store_id, status).await {
                Ok(update) => {
                    let mut state = self.state.write().await;
                    if !state.replace_vehicle(update.vehicle.clone()) {
                        log::warn!(
                            "⚠️ {} confirmado por el store pero ya no está en la flota local",
                            update.vehicle.reg_number
                        );
                    }
                    state.prepend_log(update.log.clone());

                    log::info!("✅ Estado de {} persistido: {}", update.vehicle.reg_number, status);
                    return StatusUpdateOutcome::Persisted {
                        vehicle: update.vehicle,
                        log: update.log,
                    };
                }
                Err(e) => {
                    log::warn!("⚠️ El store rechazó el cambio de estado, se aplica en local: {}", e);
                }
            }
        }

        self.apply_locally(reference, status).await
    }

    /// Id del store del vehículo si hay enlace activo
    async fn live_store_id(&self, reference: &str) -> Option<String> {
        let state = self.state.read().await;
        if state.mode() != SyncMode::Connected {
            return None;
        }
        state
            .find_by_reference(reference)
            .and_then(|vehicle| vehicle.store_id.clone())
    }

    async fn apply_locally(&self, reference: &str, status: VehicleStatus) -> StatusUpdateOutcome {
        let mut state = self.state.write().await;

        let outcome = match state.find_by_reference_mut(reference) {
            Some(vehicle) => {
                vehicle.set_status(status);
                let log = LogEntry::status_change(&vehicle.reg_number, status);
                StatusUpdateOutcome::AppliedLocally {
                    vehicle: vehicle.clone(),
                    log,
                }
            }
            None => {
                log::warn!("⚠️ Cambio de estado para una unidad desconocida: {}", reference);
                let log = LogEntry::new(
                    reference,
                    format!(
                        "Status update to {} rejected: unknown unit",
                        status.as_str().to_uppercase()
                    ),
                    Severity::Warning,
                );
                StatusUpdateOutcome::UnknownVehicle { log }
            }
        };

        state.prepend_log(outcome.log().clone());
        outcome
    }
}
