//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use cors_relay::{HttpServer, ProxyConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// A mock upstream that answers every connection with a fixed raw response.
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// Number of requests the upstream has received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Absolute URL for `path` on this upstream.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a mock upstream on an ephemeral port.
///
/// `extra_headers` are written verbatim, one `Name: value` per entry.
pub async fn start_mock_upstream(
    status_line: &'static str,
    extra_headers: &'static [&'static str],
    body: &'static str,
) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let counter = counter.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                counter.fetch_add(1, Ordering::SeqCst);

                let mut response = format!("HTTP/1.1 {}\r\n", status_line);
                for header in extra_headers {
                    response.push_str(header);
                    response.push_str("\r\n");
                }
                response.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                ));
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockUpstream { addr, hits }
}

/// A loopback address with nothing listening on it.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config suited to tests: no system proxy, short timeouts.
pub fn test_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.system_proxy = false;
    config.timeouts.connect_secs = 2;
    config.timeouts.upstream_secs = 5;
    config
}

/// Build the relay router for `config`.
pub fn router(config: ProxyConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

/// Send one request through the router.
pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

/// Read a response body as UTF-8.
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// GET `/{target}` with the given headers.
pub fn get(target: &str, headers: &[(&str, &str)]) -> Request<Body> {
    request("GET", target, headers)
}

/// Build a request for `/{target}`.
pub fn request(method: &str, target: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(format!("/{}", target));
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}
