//! Motor de sincronización de la flota
//!
//! En cada tick consulta la API del store y reconcilia el estado en memoria.
//! Nunca propaga errores: cualquier fallo degrada a modo simulado.

use std::sync::Arc;

use crate::clients::FleetApi;
use crate::models::{LogEntry, Severity, SyncMode, Vehicle};
use crate::services::fleet_state::SharedFleetState;

/// Identificador de los logs que no pertenecen a un vehículo
pub const SYSTEM_LOG_SOURCE: &str = "SYSTEM";

/// Resultado de un tick de sincronización
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Flota obtenida del store
    Synced { vehicles: usize },
    /// El store estaba vacío, se sembró y la segunda lectura trajo datos
    Seeded { vehicles: usize },
    /// El store sigue vacío después del seed
    EmptyAfterSeed,
    /// El store no respondió
    Offline,
}

pub struct FleetSyncService {
    state: SharedFleetState,
    api: Arc<dyn FleetApi>,
}

impl FleetSyncService {
    pub fn new(state: SharedFleetState, api: Arc<dyn FleetApi>) -> Self {
        Self { state, api }
    }

    pub async fn tick(&self) -> SyncOutcome {
        self.state.write().await.set_syncing(true);
        let outcome = self.reconcile().await;
        self.state.write().await.set_syncing(false);

        log::debug!("🔄 Tick de sincronización: {:?}", outcome);
        outcome
    }

    async fn reconcile(&self) -> SyncOutcome {
        let fleet = match self.api.fetch_fleet().await {
            Ok(fleet) => fleet,
            Err(e) => {
                log::warn!("⚠️ Backend no disponible, se mantiene la simulación: {}", e);
                self.fall_back_to_simulation().await;
                return SyncOutcome::Offline;
            }
        };

        let (fleet, seeded) = if fleet.is_empty() {
            match self.seed_and_refetch().await {
                Some(fleet) => (fleet, true),
                None => return self.outcome_after_empty_seed().await,
            }
        } else {
            (fleet, false)
        };

        let count = fleet.len();
        let link_entry = self.apply_fleet(fleet).await;
        self.refresh_logs(link_entry).await;

        if seeded {
            SyncOutcome::Seeded { vehicles: count }
        } else {
            SyncOutcome::Synced { vehicles: count }
        }
    }

    /// Un solo seed por tick; los fallos del seed se ignoran
    async fn seed_and_refetch(&self) -> Option<Vec<Vehicle>> {
        log::info!("🌱 Store vacío, solicitando seed...");
        if let Err(e) = self.api.seed().await {
            log::warn!("⚠️ Seed fallido (se ignora): {}", e);
        }

        match self.api.fetch_fleet().await {
            Ok(fleet) if !fleet.is_empty() => Some(fleet),
            Ok(_) => {
                log::warn!("⚠️ El store sigue vacío después del seed");
                None
            }
            Err(e) => {
                log::warn!("⚠️ Error leyendo la flota después del seed: {}", e);
                None
            }
        }
    }

    async fn outcome_after_empty_seed(&self) -> SyncOutcome {
        self.fall_back_to_simulation().await;
        SyncOutcome::EmptyAfterSeed
    }

    async fn fall_back_to_simulation(&self) {
        let previous = self.state.write().await.set_mode(SyncMode::Simulated);
        if previous == SyncMode::Connected {
            log::warn!("🟠 Enlace con el store perdido, pasando a modo simulado");
        }
    }

    /// Devuelve el log de enlace si este tick pasó de simulado a conectado
    async fn apply_fleet(&self, fleet: Vec<Vehicle>) -> Option<LogEntry> {
        let mut state = self.state.write().await;
        state.replace_fleet(fleet);

        if state.set_mode(SyncMode::Connected) != SyncMode::Simulated {
            return None;
        }

        log::info!("🟢 Enlace con el store establecido");
        let entry = link_established_entry();
        state.prepend_log(entry.clone());
        Some(entry)
    }

    /// Solo se reemplaza el buffer si el store devuelve logs.
    /// El log de enlace sobrevive únicamente en el tick en que se creó.
    async fn refresh_logs(&self, link_entry: Option<LogEntry>) {
        match self.api.fetch_logs().await {
            Ok(logs) if !logs.is_empty() => {
                let mut state = self.state.write().await;
                state.replace_logs(logs);
                if let Some(entry) = link_entry {
                    state.prepend_log(entry);
                }
            }
            Ok(_) => log::debug!("📭 El store no tiene logs, se conserva el buffer local"),
            Err(e) => log::warn!("⚠️ Error leyendo logs del store: {}", e),
        }
    }
}

fn link_established_entry() -> LogEntry {
    LogEntry::new(
        SYSTEM_LOG_SOURCE,
        "Secure link established with central ledger",
        Severity::Info,
    )
}
