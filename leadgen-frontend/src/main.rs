use leadgen_core::observability::init_tracing;
use leadgen_frontend::config::get_configuration;
use leadgen_frontend::services::registry::ClientRegistry;
use leadgen_frontend::startup::{build_router, EVICTION_PERIOD, SESSION_IDLE_TIMEOUT};
use leadgen_frontend::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "leadgen-frontend",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    );

    leadgen_frontend::services::metrics::init_metrics()?;

    let registry = Arc::new(ClientRegistry::from_settings(&configuration));
    Arc::clone(&registry).spawn_eviction(EVICTION_PERIOD, SESSION_IDLE_TIMEOUT);
    let app = build_router(AppState::new(registry, configuration.auth.clone()));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!(
        sign_up_enabled = configuration.auth.sign_up_enabled,
        refresh_policy = ?configuration.session.refresh_policy,
        "Starting leadgen-frontend on {}",
        address
    );
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
