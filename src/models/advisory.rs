//! Modelo de respuesta del asesor de IA
//!
//! Efímero: solo se conserva el último análisis.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AIResponse {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

impl AIResponse {
    /// Respuesta determinista cuando el servicio de IA no está disponible
    pub fn fallback() -> Self {
        Self {
            summary: "AI Engine encountered a synchronization error. Operating on standard protocols."
                .to_string(),
            recommendations: vec![
                "Monitor battery levels manually for all units".to_string(),
                "Maintain direct radio contact with all units".to_string(),
                "Verify network link in command dashboard".to_string(),
                "Check advisory API key permissions".to_string(),
            ],
            risk_level: RiskLevel::Medium,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        !self.summary.trim().is_empty()
            && !self.recommendations.is_empty()
            && self.recommendations.iter().all(|r| !r.trim().is_empty())
    }
}
