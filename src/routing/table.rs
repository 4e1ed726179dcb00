//! Static route table
//!
//! Built once at startup from a declarative list and read-only afterwards,
//! so it can be shared across concurrent invocations without locking.

use std::collections::BTreeMap;

use thiserror::Error;

use super::key::RouteKey;
use super::template::RouteTemplate;
use crate::handler::Handler;
use crate::http::PathParameters;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route registered twice: {0}")]
    Duplicate(String),
}

struct Route {
    template: RouteTemplate,
    handler: Box<dyn Handler>,
}

/// Immutable mapping of route key to handler
pub struct RouteTable {
    routes: BTreeMap<RouteKey, Route>,
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.keys())
            .finish()
    }
}

/// Collects routes before the table is frozen
#[derive(Default)]
pub struct RouteTableBuilder {
    routes: Vec<(RouteKey, Box<dyn Handler>)>,
}

impl RouteTableBuilder {
    #[must_use]
    pub fn route(mut self, method: &str, template: &str, handler: impl Handler + 'static) -> Self {
        self.routes
            .push((RouteKey::new(method, template), Box::new(handler)));
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut routes = BTreeMap::new();
        for (key, handler) in self.routes {
            if routes.contains_key(&key) {
                return Err(RouteTableError::Duplicate(key.to_string()));
            }
            let template = RouteTemplate::parse(key.path_template());
            routes.insert(key, Route { template, handler });
        }
        Ok(RouteTable { routes })
    }
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Exact lookup: no partial matching, no case folding, no trailing-slash fixes
    pub fn get(&self, key: &RouteKey) -> Option<&dyn Handler> {
        self.routes.get(key).map(|route| route.handler.as_ref())
    }

    /// All registered keys in lexicographic order
    pub fn keys(&self) -> Vec<String> {
        self.routes.keys().map(ToString::to_string).collect()
    }

    /// Resolve a concrete path by matching templates segment by segment
    ///
    /// When several templates match, the one with the fewest parameters wins.
    pub fn resolve(&self, method: &str, path: &str) -> Option<(&RouteKey, PathParameters)> {
        self.routes
            .iter()
            .filter(|(key, _)| key.method() == method)
            .filter_map(|(key, route)| {
                route
                    .template
                    .matches(path)
                    .map(|params| (key, route.template.param_count(), params))
            })
            .min_by_key(|(_, param_count, _)| *param_count)
            .map(|(key, _, params)| (key, params))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
