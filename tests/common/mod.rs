//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{AppendHeaders, IntoResponse, Response},
    Router,
};
use gate_proxy::{GateConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// What the mock upstream saw for one request.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A recording upstream bound to an ephemeral port.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }
}

async fn record(
    State(captured): State<Arc<Mutex<Vec<Captured>>>>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let reply = format!("upstream saw {} {}", parts.method, parts.uri.path());

    captured.lock().unwrap().push(Captured {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });

    (
        StatusCode::CREATED,
        AppendHeaders([
            ("x-upstream", "mock"),
            ("set-cookie", "a=1"),
            ("set-cookie", "b=2"),
        ]),
        reply,
    )
        .into_response()
}

/// Serve `router` on an ephemeral port and return its address.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a mock upstream that records every request it receives.
pub async fn start_mock_upstream() -> MockUpstream {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new().fallback(record).with_state(captured.clone());
    let addr = serve(router).await;
    MockUpstream { addr, captured }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn unused_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the gate proxy with `config` on an ephemeral port.
pub async fn start_proxy(mut config: GateConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// Proxy config pointing at `upstream`.
pub fn config_for(upstream: &str) -> GateConfig {
    let mut config = GateConfig::default();
    config.upstream.address = upstream.to_string();
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
