use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_tracker::clients::{FleetApiClient, GeminiClient};
use fleet_tracker::config::database::DatabaseConfig;
use fleet_tracker::config::EnvironmentConfig;
use fleet_tracker::database;
use fleet_tracker::middleware::cors_layer;
use fleet_tracker::repositories::{MemoryTelemetryStore, PgTelemetryStore, TelemetryStore};
use fleet_tracker::routes::create_app_router;
use fleet_tracker::services::{DashboardSettings, FleetDashboard};
use fleet_tracker::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚚 Fleet Tracker - Telemetry Store & Dashboard");
    info!("==============================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    info!("⚙️ Entorno: {}", config.environment);

    let store = build_store(&config).await?;

    let fleet_api = FleetApiClient::new(config.fleet_api_url.clone(), config.request_timeout)?;
    info!("🔗 Motor del dashboard enlazado a {}", fleet_api.base_url());

    if config.gemini_api_key.is_none() {
        warn!("⚠️ GEMINI_API_KEY no configurada: el análisis de IA usará el fallback");
    }
    let advisor = GeminiClient::new(
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
        config.gemini_api_key.clone(),
        config.advisory_timeout,
    )?;

    let dashboard = Arc::new(FleetDashboard::new(
        Arc::new(fleet_api),
        Arc::new(advisor),
        DashboardSettings::from(&config),
    ));
    let tasks = dashboard.start();

    let app_state = AppState::new(store, dashboard, config.clone());
    let app = create_app_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors_origins)),
    );

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    if config.serve_store_api {
        info!("📦 Store API:");
        info!("   GET  /api/fleet - Listar vehículos");
        info!("   GET  /api/logs - Últimos 50 logs");
        info!("   POST /api/seed - Sembrar la flota");
        info!("   POST /api/fleet/update-status - Cambiar estado de un vehículo");
    }
    info!("🖥️ Dashboard:");
    info!("   GET  /dashboard/state - Estado completo del dashboard");
    info!("   POST /dashboard/vehicles/:reference/status - Comando de estado");
    info!("   GET  /dashboard/advisory - Último análisis de IA");
    info!("   POST /dashboard/advisory - Solicitar análisis de IA");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    tasks.iter().for_each(|task| task.abort());
    info!("👋 Servidor terminado");
    Ok(())
}

/// PostgreSQL si hay `DATABASE_URL`, si no el store en memoria
async fn build_store(config: &EnvironmentConfig) -> Result<Arc<dyn TelemetryStore>> {
    match &config.database_url {
        Some(url) => {
            let db_config = DatabaseConfig::new(url.clone(), config.database_max_connections);
            let pool = match database::connect(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            Ok(Arc::new(PgTelemetryStore::new(pool)))
        }
        None => {
            warn!("⚠️ DATABASE_URL no configurada: usando store en memoria");
            Ok(Arc::new(MemoryTelemetryStore::new()))
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
