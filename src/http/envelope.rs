//! Response envelope builder
//!
//! Every body produced by the router goes through here so success and error
//! responses share one shape and one CORS posture:
//!
//! ```text
//! { "success": true,  "data": ..., "timestamp": "..." }
//! { "success": false, "error": { "code", "message", "timestamp", "details"? } }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::response::{OutboundResponse, CONTENT_TYPE_JSON};
use crate::config::CorsConfig;
use crate::utils::time::format_iso;

pub const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: Value,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Builds envelopes and transport headers
///
/// Holds no mutable state; one instance is shared by all invocations.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    cors: Arc<CorsConfig>,
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::new(CorsConfig::default())
    }
}

impl EnvelopeBuilder {
    pub fn new(cors: CorsConfig) -> Self {
        Self {
            cors: Arc::new(cors),
        }
    }

    /// `Content-Type` plus the full CORS header set
    pub fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
            (
                "Access-Control-Allow-Origin".to_string(),
                self.cors.allowed_origin.clone(),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                self.cors.allowed_headers.join(","),
            ),
            (
                "Access-Control-Allow-Methods".to_string(),
                self.cors.allowed_methods.join(","),
            ),
            (
                "Access-Control-Max-Age".to_string(),
                self.cors.max_age_seconds.to_string(),
            ),
        ])
    }

    /// Success envelope with status 200
    pub fn success(&self, payload: Value) -> OutboundResponse {
        self.success_with_status(STATUS_OK, payload)
    }

    pub fn success_with_status(&self, status: u16, payload: Value) -> OutboundResponse {
        let envelope = SuccessEnvelope {
            success: true,
            data: payload,
            timestamp: format_iso(Utc::now()),
        };
        self.respond(status, to_body(&envelope))
    }

    pub fn error(
        &self,
        status: u16,
        code: &str,
        message: &str,
        details: Option<Value>,
    ) -> OutboundResponse {
        let envelope = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                timestamp: format_iso(Utc::now()),
                details,
            },
        };
        self.respond(status, to_body(&envelope))
    }

    /// Preflight answer: headers only, empty body
    pub fn preflight(&self) -> OutboundResponse {
        OutboundResponse {
            status_code: STATUS_OK,
            headers: self.headers(),
            body: None,
        }
    }

    fn respond(&self, status: u16, body: Value) -> OutboundResponse {
        OutboundResponse {
            status_code: status,
            headers: self.headers(),
            body: Some(body),
        }
    }
}

// Envelope types only hold strings and JSON values, so this cannot fail.
fn to_body<T: Serialize>(envelope: &T) -> Value {
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    fn parse_body(response: &OutboundResponse) -> Value {
        serde_json::from_str(&response.body_text()).unwrap()
    }

    #[test]
    fn test_success_round_trip() {
        let builder = EnvelopeBuilder::default();
        for payload in [
            json!({"message": "hi", "nested": {"n": [1, 2, 3]}}),
            json!([1, "two", null]),
            json!("plain"),
            json!(null),
        ] {
            let response = builder.success(payload.clone());
            assert_eq!(response.status_code, 200);
            let envelope: SuccessEnvelope = serde_json::from_value(parse_body(&response)).unwrap();
            assert!(envelope.success);
            assert_eq!(envelope.data, payload);
            assert!(DateTime::parse_from_rfc3339(&envelope.timestamp).is_ok());
        }
    }

    #[test]
    fn test_success_with_explicit_status() {
        let response = EnvelopeBuilder::default().success_with_status(201, json!({"id": 1}));
        assert_eq!(response.status_code, 201);
        assert_eq!(parse_body(&response)["success"], true);
    }

    #[test]
    fn test_error_shape_without_details() {
        let response = EnvelopeBuilder::default().error(400, "MISSING_TEXT", "Text parameter is required", None);
        assert_eq!(response.status_code, 400);
        let body = parse_body(&response);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "MISSING_TEXT");
        assert_eq!(body["error"]["message"], "Text parameter is required");
        assert!(body["error"]["timestamp"].is_string());
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn test_error_shape_with_details() {
        let response = EnvelopeBuilder::default().error(
            400,
            "INVALID_JSON",
            "Invalid JSON in request body",
            Some(json!({"error": "expected value"})),
        );
        let body = parse_body(&response);
        assert_eq!(body["error"]["details"]["error"], "expected value");
    }

    #[test]
    fn test_every_response_carries_cors_and_json_content_type() {
        let builder = EnvelopeBuilder::default();
        for response in [
            builder.success(json!({})),
            builder.error(500, "INTERNAL_ERROR", "boom", None),
            builder.preflight(),
        ] {
            assert_eq!(response.header("Content-Type"), Some("application/json"));
            assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
            assert_eq!(
                response.header("Access-Control-Allow-Headers"),
                Some("Content-Type,Authorization,X-Requested-With")
            );
            assert_eq!(
                response.header("Access-Control-Allow-Methods"),
                Some("GET,POST,PUT,DELETE,OPTIONS,PATCH")
            );
            assert_eq!(response.header("Access-Control-Max-Age"), Some("86400"));
        }
    }

    #[test]
    fn test_preflight_has_empty_body() {
        let response = EnvelopeBuilder::default().preflight();
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_none());
        assert_eq!(response.body_text(), "");
    }

    #[test]
    fn test_custom_cors_posture() {
        let builder = EnvelopeBuilder::new(CorsConfig {
            allowed_origin: "https://app.example.com".to_string(),
            allowed_headers: vec!["Content-Type".to_string()],
            allowed_methods: vec!["GET".to_string()],
            max_age_seconds: 60,
        });
        let response = builder.success(json!(1));
        assert_eq!(
            response.header("Access-Control-Allow-Origin"),
            Some("https://app.example.com")
        );
        assert_eq!(response.header("Access-Control-Max-Age"), Some("60"));
    }
}
