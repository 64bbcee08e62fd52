//! HTTP server setup and the gate handler.
//!
//! # Responsibilities
//! - Create Axum Router with the single gate route
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener, stop on shutdown broadcast
//! - Answer flagged requests directly
//! - Forward everything else to the upstream

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, Version},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GateConfig;
use crate::error::ProxyError;
use crate::http::request::{request_id, request_id_layer};
use crate::http::response;
use crate::lifecycle::shutdown::wait_for;
use crate::resilience::timeouts::with_deadline;
use crate::routing::{Director, HeaderMatcher, UpstreamConfigError};
use crate::security::headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub flag: HeaderMatcher,
    /// Kept as a result so a bad address surfaces per request as a 500.
    pub director: Result<Arc<Director>, UpstreamConfigError>,
    pub client: Client<HttpConnector, Body>,
}

impl AppState {
    /// Build handler state from configuration.
    pub fn new(config: GateConfig) -> Self {
        let director = Director::from_config(&config.upstream).map(Arc::new);
        match &director {
            Ok(d) => tracing::debug!(
                upstream = %d.authority(),
                path = %d.path(),
                "Upstream director ready"
            ),
            Err(e) => tracing::error!(
                error = %e,
                "Upstream address is invalid; forwarded requests will fail"
            ),
        }

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            flag: HeaderMatcher::new(config.gate.header.clone()),
            config: Arc::new(config),
            director,
            client,
        }
    }
}

/// HTTP server for the gate.
pub struct HttpServer {
    router: Router,
    config: Arc<GateConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        let state = AppState::new(config);
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GateConfig, state: AppState) -> Router {
        let path = if config.gate.path.starts_with('/') {
            config.gate.path.clone()
        } else {
            format!("/{}", config.gate.path)
        };

        Router::new()
            .route(&path, get(gate_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id(req.headers()),
                )
            }))
            .layer(request_id_layer())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            gate_path = %self.config.gate.path,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                wait_for(shutdown).await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

/// Gate handler.
/// Flagged requests get the static reply; the rest go upstream.
async fn gate_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id(request.headers()).to_string();

    if state.flag.matches(&request) {
        tracing::info!(
            request_id = %request_id,
            header = %state.flag.name(),
            "Flagged request answered locally"
        );
        return response::rejection(&state.config.gate.rejection_body);
    }

    match forward(&state, request).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                status = %response.status(),
                "Upstream responded"
            );
            response
        }
        Err(e) => {
            match &e {
                ProxyError::UpstreamTimeout(_) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Upstream timed out")
                }
                _ => tracing::error!(request_id = %request_id, error = %e, "Forwarding failed"),
            }
            e.into_response()
        }
    }
}

/// Rewrite the request for the upstream, send it, and relay the answer.
async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let director = state.director.as_ref().map_err(|e| e.clone())?;

    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let (mut parts, body) = request.into_parts();
    director.direct(&mut parts)?;
    parts.version = Version::HTTP_11;
    headers::strip_request_hop_by_hop(&mut parts.headers);
    if let Some(ip) = client_ip {
        headers::append_forwarded_for(&mut parts.headers, ip);
    }

    tracing::debug!(
        method = %parts.method,
        upstream = %parts.uri,
        "Forwarding request"
    );

    let deadline = state.config.upstream.timeout_secs.map(Duration::from_secs);
    let upstream = with_deadline(
        deadline,
        state.client.request(Request::from_parts(parts, body)),
    )
    .await?;

    Ok(response::relay(upstream))
}
