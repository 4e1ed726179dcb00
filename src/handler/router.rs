//! Request dispatch module
//!
//! Entry point for request processing: preflight interception, route key
//! computation, handler invocation and failure recovery. Every path ends in
//! exactly one response built by the envelope builder.
//!
//! ```text
//! Received ─┬─ OPTIONS ──────────────────────────────► Preflight ─┐
//!           └─ Routing ─┬─ hit ─► handler ─┬─ Ok ───► Dispatched ─┤
//!                       │                  └─ Err ──► Faulted ────┼─► Responded
//!                       └─ miss ────────────────────► NotFound ───┘
//! ```

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use serde_json::{json, Value};

use super::{
    AppContext, Handler, HandlerError, STATUS_INTERNAL_SERVER_ERROR, STATUS_NOT_FOUND,
};
use crate::config::{Config, MatchStrategy};
use crate::http::{EnvelopeBuilder, InboundRequest, OutboundResponse};
use crate::logger;
use crate::routing::{normalize, RouteKey, RouteTable};

pub const ROUTE_NOT_FOUND: &str = "ROUTE_NOT_FOUND";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

const NOT_FOUND_SUGGESTION: &str = "Check the API documentation for available endpoints";
const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred while processing your request";

/// Stateless dispatcher; safe to share across concurrent invocations
#[derive(Debug)]
pub struct Dispatcher {
    table: RouteTable,
    envelope: EnvelopeBuilder,
    context: AppContext,
    strategy: MatchStrategy,
}

impl Dispatcher {
    pub fn new(table: RouteTable, envelope: EnvelopeBuilder, context: AppContext) -> Self {
        Self {
            table,
            envelope,
            context,
            strategy: MatchStrategy::default(),
        }
    }

    pub fn from_config(config: &Config, table: RouteTable) -> Self {
        Self::new(
            table,
            EnvelopeBuilder::new(config.cors.clone()),
            AppContext::from_config(config),
        )
        .with_strategy(config.routing.strategy)
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    pub const fn envelope(&self) -> &EnvelopeBuilder {
        &self.envelope
    }

    pub const fn context(&self) -> &AppContext {
        &self.context
    }

    /// Turn one inbound request into exactly one response
    pub async fn dispatch(&self, request: &InboundRequest) -> OutboundResponse {
        logger::log_request_received(
            &request.method,
            &request.path,
            request.query_string_parameters.as_ref(),
            &request.headers.names(),
        );

        if request.is_preflight() {
            return self.envelope.preflight();
        }

        let (key, bound) = self.route_key(request);
        let response = match self.table.get(&key) {
            Some(handler) => match bound {
                Some(resolved) => self.invoke(handler, &resolved).await,
                None => self.invoke(handler, request).await,
            },
            None => self.not_found(request, &key),
        };

        logger::log_response(&request.method, &request.path, response.status_code);
        response
    }

    /// Compute the lookup key for the configured strategy
    ///
    /// The segment strategy also returns a copy of the request carrying the
    /// bound parameters when the caller supplied none.
    fn route_key(&self, request: &InboundRequest) -> (RouteKey, Option<InboundRequest>) {
        match self.strategy {
            MatchStrategy::Substring => (
                normalize(
                    &request.method,
                    &request.path,
                    request.path_parameters.as_ref(),
                ),
                None,
            ),
            MatchStrategy::Segment => match self.table.resolve(&request.method, &request.path) {
                Some((key, params)) => {
                    let bound = (request.path_parameters.is_none() && !params.is_empty())
                        .then(|| request.clone().with_path_parameters(params));
                    (key.clone(), bound)
                }
                None => (RouteKey::new(&request.method, &request.path), None),
            },
        }
    }

    async fn invoke(&self, handler: &dyn Handler, request: &InboundRequest) -> OutboundResponse {
        let outcome = AssertUnwindSafe(handler.call(request, &self.context))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(payload)) => self.envelope.success(payload),
            Ok(Err(HandlerError::Rejected {
                status,
                code,
                message,
                details,
            })) => self.envelope.error(status, &code, &message, details),
            Ok(Err(HandlerError::Fault { message, stack })) => {
                self.internal_error(request, &message, stack)
            }
            Err(panic) => {
                let stack = Backtrace::force_capture().to_string();
                self.internal_error(request, &panic_message(&*panic), Some(stack))
            }
        }
    }

    fn not_found(&self, request: &InboundRequest, key: &RouteKey) -> OutboundResponse {
        logger::log_route_not_found(&request.method, &request.path, key.as_str());
        self.envelope.error(
            STATUS_NOT_FOUND,
            ROUTE_NOT_FOUND,
            &format!("Route {} {} not found", request.method, request.path),
            Some(json!({
                "available_routes": self.table.keys(),
                "received_route": key,
                "suggestion": NOT_FOUND_SUGGESTION,
            })),
        )
    }

    fn internal_error(
        &self,
        request: &InboundRequest,
        message: &str,
        stack: Option<String>,
    ) -> OutboundResponse {
        logger::log_handler_fault(&request.method, &request.path, message, stack.as_deref());

        let mut details = json!({ "error": message });
        if self.context.environment.exposes_stack() {
            if let Some(stack) = stack {
                details["stack"] = Value::String(stack);
            }
        }

        self.envelope.error(
            STATUS_INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            INTERNAL_ERROR_MESSAGE,
            Some(details),
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Unknown error".to_string())
}
