//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use tenant_router::{HttpServer, RouterConfig, Shutdown};
use tokio::net::TcpListener;

pub const BASE_DOMAIN: &str = "ninechat.com.br";

/// Start a backend that answers every request with a JSON description of it.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| async move {
            let headers: serde_json::Map<String, Value> = headers
                .iter()
                .map(|(k, v)| {
                    let value = v.to_str().unwrap_or_default().to_string();
                    (k.as_str().to_string(), Value::String(value))
                })
                .collect();

            Json(json!({
                "backend": name,
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query(),
                "headers": headers,
                "body": String::from_utf8_lossy(&body),
            }))
        },
    );

    serve(app).await
}

/// Start a backend that always answers with `status`, `body` and an
/// `x-upstream` marker header.
#[allow(dead_code)]
pub async fn start_status_backend(status: u16, body: &'static str) -> SocketAddr {
    let status = StatusCode::from_u16(status).unwrap();
    let app = Router::new().fallback(move || async move {
        (status, [("x-upstream", "status-backend")], body)
    });

    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A configuration pointing every origin at the given backends.
pub fn config_for(
    api: SocketAddr,
    ws: SocketAddr,
    emit: SocketAddr,
    pages: SocketAddr,
) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.tenant.base_domain = BASE_DOMAIN.to_string();
    config.origins.api_v1 = format!("http://{api}/api/v1");
    config.origins.ws = format!("http://{ws}/socket.io");
    config.origins.emit = format!("http://{emit}/emit");
    config.frontend.default_origin = format!("http://{pages}");
    config
}

/// A router running on an ephemeral port.
pub struct RunningRouter {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningRouter {
    #[allow(dead_code)]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for RunningRouter {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_router(config: RouterConfig) -> RunningRouter {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningRouter { addr, shutdown }
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
