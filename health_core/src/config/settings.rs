use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub health: HealthConfig,
    pub routes: RouteConfig,
    pub ui: UiConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Default deadline applied to every probe without its own timeout.
    pub probe_timeout_seconds: u64,
    /// TCP connects slower than this report `Degraded`.
    pub tcp_degraded_threshold_ms: u64,
    pub probes: Vec<ProbeTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeTarget {
    pub name: String,
    pub address: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub health: String,
    pub health_info: String,
    pub health_ui: String,
    pub monitor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Directory of dashboard assets served at the monitor route. The
    /// dashboard itself is an external collaborator; nothing is served
    /// when unset.
    pub assets_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub enable: bool,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            health: HealthConfig::default(),
            routes: RouteConfig::default(),
            ui: UiConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe_timeout_seconds: 5,
            tcp_degraded_threshold_ms: 1000,
            probes: Vec::new(),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            health: "/health".to_string(),
            health_info: "/health-info".to_string(),
            health_ui: "/health-ui".to_string(),
            monitor: "/monitor".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { assets_dir: None }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("server port cannot be 0".to_string()));
        }

        if self.health.probe_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "probe timeout must be greater than 0".to_string(),
            ));
        }

        for target in &self.health.probes {
            if target.name.trim().is_empty() {
                return Err(ConfigError::Message(
                    "probe name cannot be empty".to_string(),
                ));
            }
            if target.address.trim().is_empty() {
                return Err(ConfigError::Message(format!(
                    "probe '{}' has an empty address",
                    target.name
                )));
            }
            if target.timeout_seconds == Some(0) {
                return Err(ConfigError::Message(format!(
                    "probe '{}' has a zero timeout",
                    target.name
                )));
            }
        }

        for path in [
            &self.routes.health,
            &self.routes.health_info,
            &self.routes.health_ui,
            &self.routes.monitor,
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Message(format!(
                    "route path '{}' must start with '/'",
                    path
                )));
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl HealthConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }

    pub fn tcp_degraded_threshold(&self) -> Duration {
        Duration::from_millis(self.tcp_degraded_threshold_ms)
    }
}

impl ProbeTarget {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
