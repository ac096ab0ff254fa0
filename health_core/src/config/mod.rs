//! Configuration loading and validation

mod settings;

pub use settings::{
    AppConfig, CorsConfig, HealthConfig, ProbeTarget, RouteConfig, ServerConfig, UiConfig,
};
