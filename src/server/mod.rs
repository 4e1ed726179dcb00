// Local development server
// Emulates the gateway in front of the dispatcher: binds a reusable socket,
// converts hyper requests and shuts down gracefully on signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is renamed
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::StartupError;
use crate::handler::Dispatcher;

pub use listener::create_reusable_listener;
pub use server_loop::{start_server_loop, ServerLoopConfig};
pub use signal::{start_signal_handler, SignalHandler};

/// Bind `addr` and serve until SIGINT or SIGTERM
pub async fn serve(addr: SocketAddr, dispatcher: Arc<Dispatcher>) -> Result<(), StartupError> {
    let listener = create_reusable_listener(addr)?;
    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals));

    start_server_loop(listener, dispatcher, signals, ServerLoopConfig::default()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::route_table;
    use crate::handler::AppContext;
    use crate::http::EnvelopeBuilder;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_serves_requests_until_shutdown() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let dispatcher = Arc::new(Dispatcher::new(
            route_table().unwrap(),
            EnvelopeBuilder::default(),
            AppContext::default(),
        ));
        let signals = Arc::new(SignalHandler::new());
        let server = tokio::spawn(start_server_loop(
            listener,
            dispatcher,
            Arc::clone(&signals),
            ServerLoopConfig {
                drain_timeout: Duration::from_millis(500),
            },
        ));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /api/hello?name=ada HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        assert!(raw.to_ascii_lowercase().contains("access-control-allow-origin: *"));
        assert!(raw.contains(r#""message":"Hello, Ada!""#));

        signals.request_shutdown();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap();
    }
}
