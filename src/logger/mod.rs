//! Logger module
//!
//! Structured logging for the router and its transports:
//! - Subscriber initialization (json or pretty, `RUST_LOG` aware)
//! - Named helpers so every call site emits the same fields

use std::collections::BTreeMap;
use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat, LoggingConfig};
use crate::error::StartupError;

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes priority
/// over the configured level.
pub fn init(config: &LoggingConfig) -> Result<(), StartupError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    result.map_err(|e| StartupError::Logger(e.to_string()))
}

pub fn log_request_received(
    method: &str,
    path: &str,
    query: Option<&BTreeMap<String, String>>,
    header_names: &[&str],
) {
    tracing::info!(
        method,
        path,
        query = ?query,
        headers = ?header_names,
        "API request received"
    );
}

pub fn log_route_not_found(method: &str, path: &str, route_key: &str) {
    tracing::warn!(method, path, route_key, "No route registered");
}

pub fn log_handler_fault(method: &str, path: &str, error: &str, stack: Option<&str>) {
    tracing::error!(method, path, error, stack, "API error occurred");
}

pub fn log_response(method: &str, path: &str, status: u16) {
    tracing::debug!(method, path, status, "Response emitted");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        %addr,
        app = %config.app.name,
        version = %config.app.version,
        environment = %config.app.environment,
        workers = ?config.server.workers,
        "Development server listening"
    );
}

pub fn log_lambda_start(config: &Config) {
    tracing::info!(
        app = %config.app.name,
        version = %config.app.version,
        environment = %config.app.environment,
        "Lambda runtime starting"
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!(error = ?err, "Failed to serve connection");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}
