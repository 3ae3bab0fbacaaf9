use serde::{Deserialize, Serialize};

/// Modo de operación del dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Datos respaldados por el store
    Connected,
    /// Actualizaciones pseudoaleatorias locales
    #[default]
    Simulated,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Connected => "connected",
            SyncMode::Simulated => "simulated",
        }
    }
}
