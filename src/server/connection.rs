// Connection handling module
// Accepts a TCP connection and serves HTTP/1.1 on it

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing the connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so two accepts cannot both slip under the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    );
}

/// Serve one connection in a spawned task.
///
/// The whole connection is bounded by `performance.request_timeout`; the
/// counter is decremented when it ends either way.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive = state.config.performance.keep_alive_timeout > 0;
        let timeout_duration = Duration::from_secs(state.config.performance.request_timeout);

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn start_server(data_dir: &std::path::Path) -> SocketAddr {
        let mut cfg = Config::load_from("/nonexistent/wiki").unwrap();
        cfg.storage.data_dir = data_dir.to_str().unwrap().to_string();
        cfg.logging.access_log = false;
        let state = Arc::new(AppState::new(&cfg));
        let counter = Arc::new(AtomicUsize::new(0));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, peer)) = listener.accept().await {
                accept_connection(stream, peer, &state, &counter);
            }
        });
        addr
    }

    async fn send(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    fn get(path: &str) -> String {
        format!("GET {path} HTTP/1.1\r\nHost: wiki\r\nConnection: close\r\n\r\n")
    }

    fn post_form(path: &str, body: &str) -> String {
        format!(
            "POST {path} HTTP/1.1\r\nHost: wiki\r\nConnection: close\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Content-Length: {}\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn test_page_lifecycle_over_http() {
        let dir = TempDir::new().unwrap();
        let addr = start_server(dir.path()).await;

        let resp = send(addr, &get("/view/My%20Page")).await;
        assert!(resp.starts_with("HTTP/1.1 302"), "{resp}");
        assert!(resp.to_ascii_lowercase().contains("location: /edit/my%20page"));

        let resp = send(addr, &post_form("/store", "title=My+Page&body=hello+%3Cworld%3E")).await;
        assert!(resp.starts_with("HTTP/1.1 302"), "{resp}");
        assert!(resp.contains("/view/My%20Page"));
        assert_eq!(
            std::fs::read(dir.path().join("My Page.txt")).unwrap(),
            b"hello <world>"
        );

        let resp = send(addr, &get("/view/My%20Page")).await;
        assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
        assert!(resp.contains("hello &lt;world&gt;"));

        let resp = send(addr, &post_form("/save/My%20Page", "body=changed")).await;
        assert!(resp.starts_with("HTTP/1.1 302"), "{resp}");
        assert_eq!(std::fs::read(dir.path().join("My Page.txt")).unwrap(), b"changed");

        let resp = send(addr, &get("/")).await;
        assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
        assert!(resp.contains(">My Page</a>"));

        let resp = send(addr, &get("/delete/My%20Page")).await;
        assert!(resp.starts_with("HTTP/1.1 302"), "{resp}");
        assert!(!dir.path().join("My Page.txt").exists());

        let resp = send(addr, &get("/delete/My%20Page")).await;
        assert!(resp.starts_with("HTTP/1.1 500"), "{resp}");
    }

    #[tokio::test]
    async fn test_rejected_paths_over_http() {
        let dir = TempDir::new().unwrap();
        let addr = start_server(dir.path()).await;

        for path in ["/view/../../etc/passwd", "/view/a.b", "/unknown/Home", "/view/Home/x"] {
            let resp = send(addr, &get(path)).await;
            assert!(resp.starts_with("HTTP/1.1 404"), "{path}: {resp}");
        }

        let resp = send(addr, &post_form("/store", "title=..%2Fescape&body=x")).await;
        assert!(resp.starts_with("HTTP/1.1 404"), "{resp}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_binary_body_saved_verbatim() {
        let dir = TempDir::new().unwrap();
        let addr = start_server(dir.path()).await;

        let resp = send(addr, &post_form("/save/Bin", "body=%FF%FE")).await;
        assert!(resp.starts_with("HTTP/1.1 302"), "{resp}");
        assert_eq!(std::fs::read(dir.path().join("Bin.txt")).unwrap(), [0xFF, 0xFE]);
    }

    #[tokio::test]
    async fn test_unsupported_body_leaves_page_intact() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Home.txt"), b"precious").unwrap();
        let addr = start_server(dir.path()).await;

        let body = "--XYZ\r\nContent-Disposition: form-data; name=\"body\"\r\n\r\n\
                    new text\r\n--XYZ--\r\n";
        let request = format!(
            "POST /save/Home HTTP/1.1\r\nHost: wiki\r\nConnection: close\r\n\
             Content-Type: multipart/form-data; boundary=XYZ\r\n\
             Content-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let resp = send(addr, &request).await;
        assert!(resp.starts_with("HTTP/1.1 415"), "{resp}");
        assert_eq!(std::fs::read(dir.path().join("Home.txt")).unwrap(), b"precious");

        // Without a body the query string still drives the save
        let resp = send(addr, &get("/save/Home?body=from+query")).await;
        assert!(resp.starts_with("HTTP/1.1 302"), "{resp}");
        assert_eq!(std::fs::read(dir.path().join("Home.txt")).unwrap(), b"from query");
    }

    #[tokio::test]
    async fn test_list_error_is_500() {
        let dir = TempDir::new().unwrap();
        let addr = start_server(&dir.path().join("absent")).await;

        let resp = send(addr, &get("/")).await;
        assert!(resp.starts_with("HTTP/1.1 500"), "{resp}");
    }
}
