// Configuration module entry point
// Loads application configuration once at process start

mod types;

use std::net::SocketAddr;

use crate::error::StartupError;

// Re-export public types
pub use types::{
    AppConfig, Config, CorsConfig, Environment, LogFormat, LoggingConfig, MatchStrategy,
    RoutingConfig, ServerConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default location
    ///
    /// The path can be overridden with `APP_CONFIG`.
    pub fn load() -> Result<Self, StartupError> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Layers, lowest priority first: built-in defaults, the optional file,
    /// `APP_*` environment variables (`__` separates nested keys).
    pub fn load_from(config_path: &str) -> Result<Self, StartupError> {
        Self::load_layered(config_path, None)
    }

    /// Same layering, reading variables from `env_vars` instead of the process
    pub(crate) fn load_layered(
        config_path: &str,
        env_vars: Option<config::Map<String, String>>,
    ) -> Result<Self, StartupError> {
        let settings = config::Config::builder()
            .set_default("app.name", "serverless-api")?
            .set_default("app.version", env!("CARGO_PKG_VERSION"))?
            .set_default("app.environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env_vars),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|_| StartupError::InvalidAddress(addr))
    }
}
