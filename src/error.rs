//! Process-level errors.
//!
//! Request-level failures never surface here; they are turned into error
//! envelopes by the dispatcher.

use thiserror::Error;

/// Errors that abort startup of a transport
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid socket address: {0}")]
    InvalidAddress(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logger initialization failed: {0}")]
    Logger(String),

    #[error("route table error: {0}")]
    Routes(#[from] crate::routing::RouteTableError),
}
