//! Repositorios del Telemetry Store
//!
//! Acceso a los documentos Vehicle y LogEntry persistidos.

pub mod memory_telemetry_store;
pub mod pg_telemetry_store;
pub mod seed;
pub mod telemetry_store;

pub use memory_telemetry_store::MemoryTelemetryStore;
pub use pg_telemetry_store::PgTelemetryStore;
pub use telemetry_store::{StoreError, StoreResult, TelemetryStore};
