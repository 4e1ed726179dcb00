//! HTTP protocol layer module
//!
//! Transport-neutral request and response types plus the envelope builder.
//! Shared by the Lambda and local development transports.

pub mod envelope;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use envelope::{EnvelopeBuilder, ErrorBody, ErrorEnvelope, SuccessEnvelope};
pub use request::{Headers, InboundRequest, PathParameters};
pub use response::{GatewayResponse, OutboundResponse, CONTENT_TYPE_JSON};
