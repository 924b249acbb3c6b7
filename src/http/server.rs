//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing)
//! - Bind server to listener with graceful shutdown
//! - Resolve tenant and route, then forward to the upstream
//! - Relay the upstream response (or upgraded connection)

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RouterConfig;
use crate::http::error::ProxyError;
use crate::http::request::{request_host, OutboundRequest};
use crate::http::response::relay;
use crate::http::websocket::{is_upgrade_request, spawn_tunnel};
use crate::routing::{resolve_tenant, RouteTable};

/// Outbound client: HTTPS or plain HTTP, HTTP/1.1 so upgrades work.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub base_domain: Arc<str>,
    pub client: UpstreamClient,
}

impl AppState {
    pub fn new(config: &RouterConfig) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            routes: Arc::new(RouteTable::from_config(config)),
            base_domain: Arc::from(config.tenant.base_domain.as_str()),
            client,
        }
    }
}

/// HTTP server for the tenant router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        let state = AppState::new(&config);
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_domain = %self.config.tenant.base_domain,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            let status = e.status();
            if status == StatusCode::BAD_GATEWAY {
                tracing::error!(method = %method, path = %path, error = %e, "Forwarding failed");
            } else {
                tracing::warn!(method = %method, path = %path, error = %e, "Rejected request");
            }
            e.into_response()
        }
    }
}

/// Resolve, rewrite and forward one request.
async fn forward(state: &AppState, mut request: Request<Body>) -> Result<Response, ProxyError> {
    let host = request_host(request.uri(), request.headers()).ok_or(ProxyError::MissingHost)?;
    let tenant = resolve_tenant(&host, &state.base_domain);

    let uri = request.uri().clone();
    let route = state.routes.resolve(&tenant.original_host, uri.path());
    let url = route.upstream_url(uri.query())?;

    tracing::debug!(
        tenant = %tenant.tenant_id,
        route = %route.kind,
        upstream = %url,
        "Proxying request"
    );

    let client_upgrade =
        is_upgrade_request(request.headers()).then(|| hyper::upgrade::on(&mut request));

    let (parts, body) = request.into_parts();
    let outbound =
        OutboundRequest::build(&parts.method, &parts.headers, body, &tenant, route.kind, url).await?;
    let target = outbound.url.to_string();

    let mut upstream = state.client.request(outbound.into_request()).await?;
    let status = upstream.status();

    tracing::debug!(
        tenant = %tenant.tenant_id,
        route = %route.kind,
        status = status.as_u16(),
        "Upstream responded"
    );

    if status == StatusCode::SWITCHING_PROTOCOLS {
        if let Some(client_upgrade) = client_upgrade {
            let upstream_upgrade = hyper::upgrade::on(&mut upstream);
            spawn_tunnel(client_upgrade, upstream_upgrade, tenant.tenant_id, target);

            let (parts, _) = upstream.into_parts();
            return Ok(Response::from_parts(parts, Body::empty()));
        }
    }

    Ok(relay(upstream))
}
