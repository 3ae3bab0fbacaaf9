//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, store,
//! intervalos de los ticks del dashboard y el servicio de IA.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub cors_origins: Vec<String>,
    /// Servir `/api/*` desde este proceso
    pub serve_store_api: bool,
    /// URL base de la API del store que consume el motor del dashboard
    pub fleet_api_url: String,
    pub sync_interval: Duration,
    pub simulation_interval: Duration,
    pub heartbeat_interval: Duration,
    pub heartbeat_in_connected_mode: bool,
    pub request_timeout: Duration,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub advisory_timeout: Duration,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración desde una fuente arbitraria de variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port: u16 = parse_or(&var, "PORT", DEFAULT_PORT)?;
        let fleet_api_url = var("FLEET_API_URL")
            .unwrap_or_else(|| format!("http://127.0.0.1:{}/api", port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            cors_origins: var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            serve_store_api: parse_or(&var, "SERVE_STORE_API", true)?,
            fleet_api_url,
            sync_interval: millis_or(&var, "SYNC_INTERVAL_MS", 5000)?,
            simulation_interval: millis_or(&var, "SIMULATION_INTERVAL_MS", 2000)?,
            heartbeat_interval: millis_or(&var, "HEARTBEAT_INTERVAL_MS", 8000)?,
            heartbeat_in_connected_mode: parse_or(&var, "HEARTBEAT_IN_CONNECTED_MODE", true)?,
            request_timeout: Duration::from_secs(parse_or(&var, "REQUEST_TIMEOUT_SECS", 4)?),
            gemini_api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            gemini_api_url: var("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            advisory_timeout: Duration::from_secs(parse_or(&var, "ADVISORY_TIMEOUT_SECS", 20)?),
        })
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

fn millis_or<F>(var: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let millis: u64 = parse_or(var, key, default)?;
    if millis == 0 {
        return Err(anyhow!("{} must be greater than zero", key));
    }
    Ok(Duration::from_millis(millis))
}
