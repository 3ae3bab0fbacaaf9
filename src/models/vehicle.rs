//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, su estado operativo y las reglas
//! de identidad (id local vs id asignado por el store).
//! Mapea exactamente al documento que devuelve `/api/fleet`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log_entry::Severity;

/// Número máximo de puntos que se conservan en el historial de posiciones
pub const PATH_HISTORY_LIMIT: usize = 30;

/// Estado del vehículo - cualquier estado es alcanzable desde cualquier otro
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Idle,
    Warning,
    Emergency,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Idle => "idle",
            VehicleStatus::Warning => "warning",
            VehicleStatus::Emergency => "emergency",
        }
    }

    /// Severidad del log de auditoría asociada a un cambio a este estado
    pub fn severity(&self) -> Severity {
        match self {
            VehicleStatus::Emergency => Severity::Critical,
            VehicleStatus::Warning => Severity::Warning,
            VehicleStatus::Active | VehicleStatus::Idle => Severity::Info,
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(VehicleStatus::Active),
            "idle" => Ok(VehicleStatus::Idle),
            "warning" => Ok(VehicleStatus::Warning),
            "emergency" => Ok(VehicleStatus::Emergency),
            other => Err(format!("Unknown vehicle status '{}'", other)),
        }
    }
}

/// Vehicle principal - documento compartido entre el store y el estado en memoria
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Identificador local, estable durante las sesiones simuladas
    #[serde(default)]
    pub id: String,
    /// Identificador asignado por el store una vez persistido
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    pub reg_number: String,
    #[serde(default)]
    pub driver_name: String,
    pub status: VehicleStatus,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub battery: f64,
    #[serde(default)]
    pub cargo: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default = "Utc::now")]
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub path: Vec<[f64; 2]>,
}

/// Resolver la clave canónica de un vehículo.
///
/// El id del store es autoritativo cuando existe; si el registro todavía no
/// fue persistido se usa el id local.
pub fn resolve_key(vehicle: &Vehicle) -> &str {
    match vehicle.store_id.as_deref() {
        Some(store_id) if !store_id.is_empty() => store_id,
        _ => &vehicle.id,
    }
}

impl Vehicle {
    pub fn canonical_key(&self) -> &str {
        resolve_key(self)
    }

    /// ¿Esta referencia apunta a este vehículo?
    ///
    /// Una referencia puede ser la clave canónica o el id local que el
    /// operador obtuvo antes de la primera persistencia.
    pub fn matches_reference(&self, reference: &str) -> bool {
        !reference.is_empty() && (resolve_key(self) == reference || self.id == reference)
    }

    /// Completar el id local con el id del store si viene vacío
    pub fn normalize_identity(&mut self) {
        if self.id.is_empty() {
            if let Some(store_id) = &self.store_id {
                self.id = store_id.clone();
            }
        }
    }

    /// Mover el vehículo manteniendo el historial acotado a `PATH_HISTORY_LIMIT`
    pub fn move_to(&mut self, lat: f64, lng: f64) {
        self.lat = lat.clamp(-90.0, 90.0);
        self.lng = lng.clamp(-180.0, 180.0);
        self.path.push([self.lat, self.lng]);
        if self.path.len() > PATH_HISTORY_LIMIT {
            let excess = self.path.len() - PATH_HISTORY_LIMIT;
            self.path.drain(..excess);
        }
        self.last_update = Utc::now();
    }

    pub fn set_status(&mut self, status: VehicleStatus) {
        self.status = status;
        self.last_update = Utc::now();
    }

    pub fn position(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}
