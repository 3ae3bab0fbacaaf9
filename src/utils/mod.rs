//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y
//! hashes de integridad de los logs de auditoría.

pub mod errors;
pub mod integrity;

pub use errors::AppError;
