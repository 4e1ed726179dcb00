//! Route key normalization
//!
//! Turns `(method, path, path parameters)` into the `"METHOD /path/:param"`
//! shape used by the route table.
//!
//! Substitution is textual: for each parameter, in the order the gateway
//! delivered them, the first
//! occurrence of its value in the path is replaced by `:name`. A value that
//! also appears earlier in the path, or inside another parameter's value,
//! produces a key that matches nothing. Callers resolve by this exact
//! behavior, so it is kept as is; see [`super::template`] for the
//! segment-based alternative.

use std::fmt;

use serde::Serialize;

use crate::http::PathParameters;

/// Canonical lookup key, e.g. `GET /api/users/:id`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn new(method: &str, path_template: &str) -> Self {
        Self(format!("{method} {path_template}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn method(&self) -> &str {
        self.0.split_once(' ').map_or(self.0.as_str(), |(method, _)| method)
    }

    pub fn path_template(&self) -> &str {
        self.0.split_once(' ').map_or("", |(_, path)| path)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the route key for a request
///
/// Never fails; ambiguous input yields a best-effort key. Empty parameter
/// values are skipped.
pub fn normalize(
    method: &str,
    path: &str,
    path_parameters: Option<&PathParameters>,
) -> RouteKey {
    let mut templated = path.to_string();
    for (name, value) in path_parameters.into_iter().flatten() {
        if value.is_empty() {
            continue;
        }
        templated = templated.replacen(value.as_str(), &format!(":{name}"), 1);
    }
    RouteKey::new(method, &templated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PathParameters {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_without_parameters() {
        assert_eq!(normalize("GET", "/health", None).as_str(), "GET /health");
        assert_eq!(
            normalize("GET", "/health", Some(&PathParameters::new())).as_str(),
            "GET /health"
        );
    }

    #[test]
    fn test_normalize_single_parameter() {
        let key = normalize("GET", "/api/users/123", Some(&params(&[("id", "123")])));
        assert_eq!(key.as_str(), "GET /api/users/:id");
        assert_eq!(key.method(), "GET");
        assert_eq!(key.path_template(), "/api/users/:id");
    }

    #[test]
    fn test_normalize_skips_empty_values() {
        let key = normalize("GET", "/api/users/", Some(&params(&[("id", "")])));
        assert_eq!(key.as_str(), "GET /api/users/");
    }

    #[test]
    fn test_normalize_replaces_only_first_occurrence() {
        let key = normalize("GET", "/api/7/items/7", Some(&params(&[("id", "7")])));
        assert_eq!(key.as_str(), "GET /api/:id/items/7");
    }

    #[test]
    fn test_normalize_value_reappearing_earlier_in_path() {
        // The literal "users" segment is hit before the parameter segment
        let key = normalize("GET", "/api/users/users", Some(&params(&[("id", "users")])));
        assert_eq!(key.as_str(), "GET /api/:id/users");
    }

    #[test]
    fn test_normalize_overlapping_values_follow_delivery_order() {
        // "a" is substituted first and lands inside "12"
        let key = normalize("GET", "/x/12/1", Some(&params(&[("a", "1"), ("b", "12")])));
        assert_eq!(key.as_str(), "GET /x/:a2/1");

        // Delivered the other way round, "12" is consumed before "1"
        let key = normalize("GET", "/x/12/1", Some(&params(&[("b", "12"), ("a", "1")])));
        assert_eq!(key.as_str(), "GET /x/:b/:a");
    }

    #[test]
    fn test_normalize_gateway_event_order() {
        let event = r#"{"httpMethod": "GET", "path": "/x/12/1", "pathParameters": {"b": "12", "a": "1"}}"#;
        let req: crate::http::InboundRequest = serde_json::from_str(event).unwrap();
        let key = normalize(&req.method, &req.path, req.path_parameters.as_ref());
        assert_eq!(key.as_str(), "GET /x/:b/:a");
    }

    #[test]
    fn test_normalize_leaves_method_untouched() {
        let key = normalize("GET", "/api/users/T", Some(&params(&[("id", "T")])));
        assert_eq!(key.as_str(), "GET /api/users/:id");
    }
}
