// Server loop module
// Accepts connections until a shutdown signal arrives, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::shutdown_signal;
use crate::config;
use crate::logger;

/// How often the drain loop checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until SIGINT/SIGTERM
///
/// After the signal the listener is closed and open connections get up to
/// `performance.request_timeout` seconds to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            name = &mut shutdown => {
                logger::log_info(&format!("{name} received, stopping listener"));
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let deadline = Duration::from_secs(state.config.performance.request_timeout);
    if tokio::time::timeout(deadline, wait_for_drain(&active_connections))
        .await
        .is_err()
    {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s, exiting anyway",
            active_connections.load(Ordering::SeqCst),
            deadline.as_secs()
        ));
    }

    Ok(())
}

async fn wait_for_drain(active_connections: &AtomicUsize) {
    while active_connections.load(Ordering::SeqCst) > 0 {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
