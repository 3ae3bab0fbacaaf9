//! Hash de integridad para los logs de auditoría
//!
//! Es un valor opaco de auditoría, ningún consumidor lo verifica.

use chrono::{DateTime, Utc};

/// Digest hexadecimal de 32 caracteres sobre el contenido del log y un nonce aleatorio
pub fn integrity_hash(vehicle_id: &str, message: &str, timestamp: &DateTime<Utc>) -> String {
    let nonce: u64 = rand::random();
    let material = format!(
        "{}|{}|{}|{:016x}",
        vehicle_id,
        message,
        timestamp.to_rfc3339(),
        nonce
    );
    format!("{:x}", md5::compute(material.as_bytes()))
}
