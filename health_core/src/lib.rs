//! Core library for the health aggregation and reporting service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;

pub use config::{AppConfig, CorsConfig, HealthConfig, ProbeTarget, RouteConfig, ServerConfig, UiConfig};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use health::{
    reporter, Aggregator, FnProbe, HealthStatus, Probe, ProbeResult, Registry, Report, ReportEntry,
    TcpProbe,
};

use axum::{middleware as axum_middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::services::ServeDir;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub aggregator: Arc<Aggregator>,
    pub routes: RouteConfig,
}

impl AppState {
    pub fn new(aggregator: Aggregator, routes: RouteConfig) -> Self {
        Self {
            app_name: "Health Aggregation Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            aggregator: Arc::new(aggregator),
            routes,
        }
    }
}

pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new().merge(create_routes(&config.routes));

    if let Some(assets_dir) = &config.ui.assets_dir {
        router = router.nest_service(&config.routes.monitor, ServeDir::new(assets_dir));
    }

    if config.cors.enable {
        router = router.layer(middleware::cors::cors_layer_from_config(&config.cors));
    }

    router = router.layer(axum_middleware::from_fn(middleware::logging::log_requests));

    router.with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

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
            info!("received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("received SIGTERM, starting graceful shutdown");
        },
    }
}
