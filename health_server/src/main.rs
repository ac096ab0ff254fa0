//! Main entry point for the health server binary

use anyhow::Result;
use health_core::{create_app, run_server, Aggregator, AppConfig, AppState, Registry, TcpProbe};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    info!("configuration loaded");
    info!("server will bind to {}", config.bind_address());

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {}", e))?;

    let registry = build_registry(&config)?;
    info!("probe registry ready with {} probes", registry.len());

    let aggregator = Aggregator::new(Arc::new(registry), config.health.probe_timeout());
    let state = AppState::new(aggregator, config.routes.clone());

    info!("app: {} v{}", state.app_name, state.version);

    let app = create_app(state, &config);
    run_server(app, addr).await?;

    info!("server shutdown complete");
    Ok(())
}

/// Builds the process-wide probe registry from configuration. Duplicate
/// probe names are a startup failure, not something to limp past.
fn build_registry(config: &AppConfig) -> Result<Registry> {
    let mut registry = Registry::new();

    for target in &config.health.probes {
        let mut probe = TcpProbe::new(target.name.as_str(), target.address.as_str())
            .with_degraded_threshold(config.health.tcp_degraded_threshold());

        if let Some(timeout) = target.timeout() {
            probe = probe.with_timeout(timeout);
        }

        registry
            .register(probe)
            .map_err(|e| anyhow::anyhow!("probe registration failed: {}", e))?;

        info!("registered tcp probe '{}' -> {}", target.name, target.address);
    }

    Ok(registry)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };

        format!(
            "{}={},health_core={},tower_http=debug,axum=debug",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level,
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
