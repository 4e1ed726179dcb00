//! Serverless HTTP router and response envelope engine
//!
//! A static route table resolves each inbound request to a handler; the
//! dispatcher wraps every outcome in one JSON envelope shape with CORS
//! headers. Two transports share the same dispatcher: an AWS Lambda runtime
//! (`bin/lambda.rs`) and a local hyper server (`server`).

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::StartupError;
use crate::handler::Dispatcher;

/// Build the shared dispatcher for the registered API routes
pub fn build_dispatcher(config: &Config) -> Result<Arc<Dispatcher>, StartupError> {
    let table = api::route_table()?;
    Ok(Arc::new(Dispatcher::from_config(config, table)))
}
