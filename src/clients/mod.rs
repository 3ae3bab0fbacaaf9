//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for the store API consumed by the
//! dashboard engine and for the AI advisory service.

pub mod fleet_api_client;
pub mod gemini_client;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

// Re-export main types for convenience
pub use fleet_api_client::{FleetApi, FleetApiClient};
pub use gemini_client::{AdvisoryClient, GeminiClient};
