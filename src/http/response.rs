//! Outbound response model
//!
//! Transport-neutral: the body stays a JSON value until a transport renders it.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Status, headers and JSON body produced by the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// `None` renders as an empty body (preflight)
    pub body: Option<Value>,
}

impl OutboundResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Render the body as JSON text
    pub fn body_text(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }
}

/// API Gateway proxy integration response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<OutboundResponse> for GatewayResponse {
    fn from(response: OutboundResponse) -> Self {
        let body = response.body_text();
        Self {
            status_code: response.status_code,
            headers: response.headers,
            body,
            is_base64_encoded: false,
        }
    }
}
