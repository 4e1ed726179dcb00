//! Request handler module
//!
//! Defines the contract every endpoint implements and the dispatcher that
//! drives it. Handlers return an explicit two-variant result: a JSON payload
//! (wrapped as a success envelope) or a [`HandlerError`] (wrapped as an error
//! envelope).

pub mod router;

use std::backtrace::Backtrace;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{Config, Environment};
use crate::http::InboundRequest;

// Re-export main entry point
pub use router::Dispatcher;

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Failure signalled by a handler
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Anticipated failure, usually client input; surfaces with its own status
    #[error("{code}: {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
        details: Option<Value>,
    },
    /// Anything the handler did not anticipate; surfaces as 500 `INTERNAL_ERROR`
    #[error("{message}")]
    Fault {
        message: String,
        stack: Option<String>,
    },
}

impl HandlerError {
    pub fn rejected(status: u16, code: &str, message: &str) -> Self {
        Self::Rejected {
            status,
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::rejected(STATUS_BAD_REQUEST, code, message)
    }

    /// Attach structured details to a rejection; faults are left unchanged
    #[must_use]
    pub fn with_details(self, details: Value) -> Self {
        match self {
            Self::Rejected {
                status,
                code,
                message,
                ..
            } => Self::Rejected {
                status,
                code,
                message,
                details: Some(details),
            },
            fault @ Self::Fault { .. } => fault,
        }
    }

    /// Unanticipated failure, capturing the current stack
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
            stack: Some(Backtrace::force_capture().to_string()),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::fault(format!("Failed to serialize payload: {err}"))
    }
}

pub type HandlerResult = Result<Value, HandlerError>;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'a>>;

/// Serialize a typed payload into a handler result
pub fn reply<T: Serialize>(payload: &T) -> HandlerResult {
    Ok(serde_json::to_value(payload)?)
}

/// Read-only facts about the running process, shared by all handlers
#[derive(Debug, Clone)]
pub struct AppContext {
    pub app_name: String,
    pub version: String,
    pub environment: Environment,
    pub started_at: Instant,
}

impl AppContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            app_name: config.app.name.clone(),
            version: config.app.version.clone(),
            environment: config.app.environment,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            app_name: "serverless-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::default(),
            started_at: Instant::now(),
        }
    }
}

/// A unit of per-endpoint behavior
///
/// Handlers must not call each other and must not mutate the request.
pub trait Handler: Send + Sync {
    fn call<'a>(&'a self, request: &'a InboundRequest, ctx: &'a AppContext) -> HandlerFuture<'a>;
}

/// Plain functions are handlers
impl<F> Handler for F
where
    F: Fn(&InboundRequest, &AppContext) -> HandlerResult + Send + Sync,
{
    fn call<'a>(&'a self, request: &'a InboundRequest, ctx: &'a AppContext) -> HandlerFuture<'a> {
        Box::pin(async move { self(request, ctx) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_details_only_touches_rejections() {
        let err = HandlerError::bad_request("INVALID_JSON", "bad").with_details(json!({"error": "x"}));
        match err {
            HandlerError::Rejected { status, details, .. } => {
                assert_eq!(status, 400);
                assert_eq!(details, Some(json!({"error": "x"})));
            }
            HandlerError::Fault { .. } => panic!("expected rejection"),
        }

        let fault = HandlerError::fault("boom").with_details(json!({}));
        assert!(matches!(fault, HandlerError::Fault { ref stack, .. } if stack.is_some()));
        assert_eq!(fault.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_function_handler() {
        fn ping(_: &InboundRequest, _: &AppContext) -> HandlerResult {
            reply(&json!({"pong": true}))
        }

        let handler: Box<dyn Handler> = Box::new(ping);
        let ctx = AppContext::default();
        let request = InboundRequest::new("GET", "/ping");
        let value = handler.call(&request, &ctx).await.unwrap();
        assert_eq!(value, json!({"pong": true}));
    }
}
