//! Modelos del sistema
//!
//! Este módulo contiene los documentos que comparten el store,
//! el motor de sincronización y el asesor de IA.

pub mod advisory;
pub mod log_entry;
pub mod sync_mode;
pub mod vehicle;

pub use advisory::{AIResponse, RiskLevel};
pub use log_entry::{LogEntry, Severity, LOG_BUFFER_LIMIT};
pub use sync_mode::SyncMode;
pub use vehicle::{resolve_key, Vehicle, VehicleStatus, PATH_HISTORY_LIMIT};
