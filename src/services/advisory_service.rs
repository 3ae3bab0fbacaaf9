//! Servicio de análisis de IA
//!
//! Envuelve al cliente de IA con un límite de tiempo y el fallback
//! determinista. `analyze` nunca falla.

use std::sync::Arc;
use std::time::Duration;

use crate::clients::AdvisoryClient;
use crate::models::{AIResponse, Vehicle};

#[derive(Clone)]
pub struct AdvisoryService {
    client: Arc<dyn AdvisoryClient>,
    timeout: Duration,
}

impl AdvisoryService {
    pub fn new(client: Arc<dyn AdvisoryClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn analyze(&self, vehicles: &[Vehicle]) -> AIResponse {
        log::info!("🤖 Solicitando análisis de IA para {} vehículos", vehicles.len());

        match tokio::time::timeout(self.timeout, self.client.request_advisory(vehicles)).await {
            Ok(Ok(response)) if response.is_well_formed() => {
                log::info!("✅ Análisis de IA recibido (riesgo {:?})", response.risk_level);
                response
            }
            Ok(Ok(_)) => {
                log::warn!("⚠️ Respuesta de IA incompleta, usando fallback");
                AIResponse::fallback()
            }
            Ok(Err(e)) => {
                log::error!("❌ Error del servicio de IA: {}", e);
                AIResponse::fallback()
            }
            Err(_) => {
                log::error!("⏱️ El servicio de IA no respondió en {:?}", self.timeout);
                AIResponse::fallback()
            }
        }
    }
}
