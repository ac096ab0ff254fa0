//! Route table for the health endpoints

use crate::{
    config::RouteConfig,
    handlers::health::{handle_health, handle_health_info, handle_health_ui, handle_probe_health},
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

pub fn create_routes(routes: &RouteConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route(&routes.health, get(handle_health))
        .route(
            &format!("{}/:probe", routes.health.trim_end_matches('/')),
            get(handle_probe_health),
        )
        .route(&routes.health_info, get(handle_health_info))
        .route(&routes.health_ui, get(handle_health_ui))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": state.routes.health,
            "health_info": state.routes.health_info,
            "health_ui": state.routes.health_ui,
            "monitor": state.routes.monitor,
        }
    }))
}
