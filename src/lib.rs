//! Fleet tracker
//!
//! Servicio HTTP del store de telemetría (`/api/*`) y motor del dashboard de
//! flota: sincronización con el store, simulación local cuando no hay enlace,
//! comandos de estado del operador y análisis de riesgo con IA.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
