//! Inbound request model
//!
//! Mirrors the API Gateway REST proxy event so the Lambda transport can
//! deserialize events directly. Other transports build it field by field.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Path parameters in the order the gateway delivered them
pub type PathParameters = IndexMap<String, String>;

/// Request headers with case-insensitive lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a header value ignoring ASCII case of the name
    ///
    /// The lower-case spelling wins when an event carries several.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .or_else(|| {
                self.0
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A generic inbound request, immutable once received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    #[serde(rename = "httpMethod")]
    pub method: String,
    /// Request path without query string
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    /// Already extracted by the gateway; never parsed from `path` by the router
    #[serde(default)]
    pub path_parameters: Option<PathParameters>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Headers,
    #[serde(default)]
    pub body: Option<String>,
}

/// Gateways send `null` for absent maps; treat it like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(PathParameters::new)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_path_parameters(mut self, params: PathParameters) -> Self {
        self.path_parameters = Some(params);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|q| q.get(name))
            .map(String::as_str)
    }

    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|p| p.get(name))
            .map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn is_preflight(&self) -> bool {
        self.method == "OPTIONS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let req = InboundRequest::new("GET", "/")
            .with_header("Content-Type", "application/json")
            .with_header("user-agent", "test-agent/1.0");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("User-Agent"), Some("test-agent/1.0"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn test_deserialize_gateway_event() {
        let event = r#"{
            "httpMethod": "GET",
            "path": "/api/users/123",
            "queryStringParameters": null,
            "pathParameters": {"id": "123"},
            "headers": {"User-Agent": "curl/8.0"},
            "body": null,
            "isBase64Encoded": false,
            "requestContext": {}
        }"#;
        let req: InboundRequest = serde_json::from_str(event).unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/api/users/123");
        assert_eq!(req.query_string_parameters, None);
        assert_eq!(req.path_parameter("id"), Some("123"));
        assert_eq!(req.header("user-agent"), Some("curl/8.0"));
        assert_eq!(req.body, None);
    }

    #[test]
    fn test_lower_case_header_preferred() {
        let event = r#"{
            "httpMethod": "POST",
            "path": "/api/echo",
            "headers": {"Content-Type": "text/plain", "content-type": "application/json"}
        }"#;
        let req: InboundRequest = serde_json::from_str(event).unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_path_parameters_keep_event_order() {
        let event = r#"{"httpMethod": "GET", "path": "/x/12/1", "pathParameters": {"b": "12", "a": "1"}}"#;
        let req: InboundRequest = serde_json::from_str(event).unwrap();
        let names: Vec<&str> = req
            .path_parameters
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_deserialize_null_headers() {
        let event = r#"{"httpMethod": "OPTIONS", "path": "/x", "headers": null}"#;
        let req: InboundRequest = serde_json::from_str(event).unwrap();
        assert!(req.headers.is_empty());
        assert!(req.is_preflight());
    }

    #[test]
    fn test_builder_accessors() {
        let req = InboundRequest::new("GET", "/api/hello").with_query("name", "Ada");
        assert_eq!(req.query("name"), Some("Ada"));
        assert_eq!(req.query("missing"), None);
        assert_eq!(req.path_parameter("id"), None);
    }
}
