// Connection handling module
// Serves one TCP connection and translates between hyper and the
// transport-neutral request/response types

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{HeaderMap, Request, Response, StatusCode, Uri};
use hyper_util::rt::TokioIo;

use crate::handler::{Dispatcher, STATUS_BAD_REQUEST};
use crate::http::{InboundRequest, OutboundResponse};
use crate::logger;
use crate::routing::RouteTable;

/// Accept a connection, count it and serve it in a spawned task
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    dispatcher: &Arc<Dispatcher>,
    conn_counter: &Arc<AtomicUsize>,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);
    logger::log_connection_accepted(&peer_addr);

    let dispatcher = Arc::clone(dispatcher);
    let conn_counter = Arc::clone(conn_counter);
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let dispatcher = Arc::clone(&dispatcher);
                async move { handle_request(req, &dispatcher).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Hyper service entry: convert, dispatch, convert back
pub async fn handle_request<B>(
    req: Request<B>,
    dispatcher: &Dispatcher,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            let rejected = dispatcher.envelope().error(
                STATUS_BAD_REQUEST,
                "INVALID_BODY",
                "Failed to read request body",
                None,
            );
            return Ok(to_hyper_response(&rejected));
        }
    };

    let inbound = to_inbound(
        parts.method.as_str(),
        &parts.uri,
        &parts.headers,
        &body,
        dispatcher.table(),
    );
    let response = dispatcher.dispatch(&inbound).await;
    Ok(to_hyper_response(&response))
}

/// Build the request the gateway would have delivered
///
/// Query values are URL-decoded, header names lower-cased and path
/// parameters bound from the route templates. Absent maps stay `None`.
pub fn to_inbound(
    method: &str,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
    table: &RouteTable,
) -> InboundRequest {
    let path = uri.path();

    let query: BTreeMap<String, String> = uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    let path_parameters = table
        .resolve(method, path)
        .map(|(_, params)| params)
        .filter(|params| !params.is_empty());

    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect();

    InboundRequest {
        method: method.to_string(),
        path: path.to_string(),
        query_string_parameters: (!query.is_empty()).then_some(query),
        path_parameters,
        headers,
        body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
    }
}

pub fn to_hyper_response(response: &OutboundResponse) -> Response<Full<Bytes>> {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(response.body_text())))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::route_table;
    use crate::handler::AppContext;
    use crate::http::EnvelopeBuilder;
    use serde_json::Value;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            route_table().unwrap(),
            EnvelopeBuilder::default(),
            AppContext::default(),
        )
    }

    fn header_map(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, value.parse().unwrap());
        }
        map
    }

    async fn body_json(response: Response<Full<Bytes>>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_to_inbound_decodes_query_and_binds_params() {
        let table = route_table().unwrap();
        let uri: Uri = "/api/users/42?name=john%20doe&x=a+b".parse().unwrap();
        let headers = header_map(&[("content-type", "application/json"), ("x-trace", "1")]);
        let req = to_inbound("GET", &uri, &headers, b"", &table);

        assert_eq!(req.path, "/api/users/42");
        assert_eq!(req.query("name"), Some("john doe"));
        assert_eq!(req.query("x"), Some("a b"));
        assert_eq!(req.path_parameter("id"), Some("42"));
        assert_eq!(req.headers.names(), vec!["content-type", "x-trace"]);
        assert!(req.body.is_none());
    }

    #[test]
    fn test_to_inbound_leaves_absent_maps_empty() {
        let table = route_table().unwrap();
        let uri: Uri = "/health".parse().unwrap();
        let req = to_inbound("GET", &uri, &HeaderMap::new(), b"{}", &table);
        assert!(req.query_string_parameters.is_none());
        assert!(req.path_parameters.is_none());
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_to_hyper_response_copies_status_and_headers() {
        let outbound = EnvelopeBuilder::default().error(404, "ROUTE_NOT_FOUND", "nope", None);
        let response = to_hyper_response(&outbound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_handle_request_round_trip() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/echo")
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(r#"{"k":"v"}"#)))
            .unwrap();
        let response = handle_request(req, &dispatcher()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["echo"]["k"], "v");
        assert_eq!(body["data"]["content_type"], "application/json");
    }

    #[tokio::test]
    async fn test_handle_request_user_path_parameter() {
        let req = Request::builder()
            .uri("/api/users/123")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handle_request(req, &dispatcher()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["email"], "user123@example.com");
    }

    #[tokio::test]
    async fn test_handle_request_preflight_has_empty_body() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/anything")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handle_request(req, &dispatcher()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-max-age"], "86400");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}
