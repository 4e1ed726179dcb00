// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Application identity and runtime environment
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
}

/// Deployment environment
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    /// Stack traces are only exposed to callers in development
    pub const fn exposes_stack(self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local development server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Output format: `json` or `pretty`
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// CORS posture attached to every response
///
/// Constructed once at startup and shared immutably by the envelope builder.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,
}

#[allow(clippy::missing_const_for_fn)]
fn default_allowed_origin() -> String {
    "*".to_string()
}

fn default_allowed_headers() -> Vec<String> {
    ["Content-Type", "Authorization", "X-Requested-With"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_max_age_seconds() -> u64 {
    86_400
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
            allowed_headers: default_allowed_headers(),
            allowed_methods: default_allowed_methods(),
            max_age_seconds: default_max_age_seconds(),
        }
    }
}

/// Route resolution configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RoutingConfig {
    #[serde(default)]
    pub strategy: MatchStrategy,
}

/// How the dispatcher turns a request into a route key
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Replace path parameter values inside the literal path with `:name`
    #[default]
    Substring,
    /// Match the path against each registered template segment by segment
    Segment,
}
