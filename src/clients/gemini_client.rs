//! Cliente del servicio de IA (Gemini `generateContent`)
//!
//! Devuelve un análisis de riesgo de la flota. Cualquier respuesta que no sea
//! un `AIResponse` completo se trata como error; el fallback lo aplica
//! `AdvisoryService`.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ClientError, ClientResult};
use crate::models::{AIResponse, Vehicle};

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?i)```(?:json)?").unwrap();
}

const OPERATING_CONTEXT: &str = "Karachi Context:
- Port Qasim to SITE route often has heavy traffic.
- Sharea Faisal is a high-speed but congested artery.
- Night-time security near bypass areas is critical.";

#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    async fn request_advisory(&self, vehicles: &[Vehicle]) -> ClientResult<AIResponse>;
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url,
            self.model,
            urlencoding::encode(api_key)
        )
    }
}

/// Prompt con la instantánea serializada de la flota y el contexto operativo fijo
pub fn build_prompt(vehicles: &[Vehicle]) -> ClientResult<String> {
    let snapshot = serde_json::to_string(vehicles)
        .map_err(|e| ClientError::InvalidPayload(e.to_string()))?;

    Ok(format!(
        "System Role: You are the Lead AI Controller for KHI SECURE.
Analyze this real-time Karachi fleet data: {}.

{}

Task: Evaluate security risks, battery levels, and route efficiency.
Output exactly in JSON format:
{{
  \"summary\": \"Brief professional overview of fleet health (2 sentences)\",
  \"recommendations\": [\"4 specific tactical steps for operators\"],
  \"riskLevel\": \"Low\" | \"Medium\" | \"High\"
}}",
        snapshot, OPERATING_CONTEXT
    ))
}

/// Limpiar posibles bloques markdown y decodificar el análisis
pub fn parse_advisory_text(text: &str) -> ClientResult<AIResponse> {
    let cleaned = CODE_FENCE.replace_all(text, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ClientError::InvalidPayload("Empty AI response".to_string()));
    }

    let advisory: AIResponse = serde_json::from_str(cleaned)
        .map_err(|e| ClientError::InvalidPayload(e.to_string()))?;

    if !advisory.is_well_formed() {
        return Err(ClientError::InvalidPayload(
            "AI response is missing summary or recommendations".to_string(),
        ));
    }

    Ok(advisory)
}

#[async_trait]
impl AdvisoryClient for GeminiClient {
    async fn request_advisory(&self, vehicles: &[Vehicle]) -> ClientResult<AIResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ClientError::Config("GEMINI_API_KEY is not configured".to_string()))?;

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(vehicles)? }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "summary": { "type": "STRING" },
                        "recommendations": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "riskLevel": { "type": "STRING", "enum": ["Low", "Medium", "High"] }
                    },
                    "required": ["summary", "recommendations", "riskLevel"]
                }
            }
        });

        log::info!("🤖 Solicitando análisis de {} vehículos a {}", vehicles.len(), self.model);

        let response = self.client.post(self.endpoint(api_key)).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidPayload(e.to_string()))?;

        let text: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        parse_advisory_text(&text)
    }
}
