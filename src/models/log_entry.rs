//! Modelo de LogEntry
//!
//! Entradas del registro de auditoría de la flota. Nunca se modifican
//! después de crearse.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vehicle::VehicleStatus;
use crate::utils::integrity::integrity_hash;

/// Capacidad del buffer de logs en memoria
pub const LOG_BUFFER_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("Unknown log severity '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Matrícula del vehículo, no su id interno
    pub vehicle_id: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default)]
    pub hash: String,
}

impl LogEntry {
    pub fn new(vehicle_id: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        let vehicle_id = vehicle_id.into();
        let message = message.into();
        let timestamp = Utc::now();
        let hash = integrity_hash(&vehicle_id, &message, &timestamp);

        Self {
            id: Uuid::new_v4().to_string(),
            store_id: None,
            timestamp,
            vehicle_id,
            message,
            severity,
            hash,
        }
    }

    /// Log de auditoría para un cambio de estado
    pub fn status_change(reg_number: &str, status: VehicleStatus) -> Self {
        Self::new(reg_number, status_change_message(status), status.severity())
    }

    pub fn normalize_identity(&mut self) {
        if self.id.is_empty() {
            if let Some(store_id) = &self.store_id {
                self.id = store_id.clone();
            }
        }
    }
}

pub fn status_change_message(status: VehicleStatus) -> String {
    format!("Status updated to {}", status.as_str().to_uppercase())
}
