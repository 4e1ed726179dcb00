// Server loop module
// Accepts connections until shutdown, then waits for in-flight ones to drain

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::handler::Dispatcher;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Behavior knobs for the accept loop
#[derive(Debug, Clone, Copy)]
pub struct ServerLoopConfig {
    /// Upper bound on waiting for open connections after shutdown
    pub drain_timeout: Duration,
}

impl Default for ServerLoopConfig {
    fn default() -> Self {
        Self {
            drain_timeout: Duration::from_secs(5),
        }
    }
}

#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    signals: Arc<SignalHandler>,
    config: ServerLoopConfig,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &dispatcher, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = signals.wait() => break,
        }
    }

    drop(listener);
    drain(&active_connections, config.drain_timeout).await;
}

/// Wait until no connection is open or the timeout elapses
async fn drain(active_connections: &AtomicUsize, timeout: Duration) {
    let waited = tokio::time::timeout(timeout, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    match waited {
        Ok(()) => tracing::info!("All connections closed"),
        Err(_) => logger::log_warning(&format!(
            "Shutdown with {} connection(s) still open",
            active_connections.load(Ordering::SeqCst)
        )),
    }
}
