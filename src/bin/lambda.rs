use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serverless_api::config::Config;
use serverless_api::handler::Dispatcher;
use serverless_api::http::{GatewayResponse, InboundRequest};
use serverless_api::{build_dispatcher, logger};

async fn handle_request(
    dispatcher: &Dispatcher,
    event: LambdaEvent<InboundRequest>,
) -> Result<GatewayResponse, Error> {
    let response = dispatcher.dispatch(&event.payload).await;
    Ok(response.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    let dispatcher: Arc<Dispatcher> = build_dispatcher(&cfg)?;
    logger::log_lambda_start(&cfg);

    lambda_runtime::run(service_fn(move |event| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { handle_request(&dispatcher, event).await }
    }))
    .await
}
