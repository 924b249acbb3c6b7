//! End-to-end routing tests through a live router.

use axum::http::StatusCode;
use reqwest::header::HOST;
use serde_json::Value;

mod common;

use common::{client, config_for, start_echo_backend, start_router, start_status_backend};

async fn echo_backends() -> tenant_router::RouterConfig {
    let api = start_echo_backend("api").await;
    let ws = start_echo_backend("ws").await;
    let emit = start_echo_backend("emit").await;
    let pages = start_echo_backend("pages").await;
    config_for(api, ws, emit, pages)
}

#[tokio::test]
async fn api_request_is_rewritten_with_tenant() {
    let api = start_echo_backend("api").await;
    let other = start_echo_backend("other").await;
    let router = start_router(config_for(api, other, other, other)).await;

    let res = client()
        .get(router.url("/api/v1/users?active=1"))
        .header(HOST, "hmg.ninechat.com.br")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["backend"], "api");
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["path"], "/api/v1/users");
    assert_eq!(echo["query"], "active=1");
    assert_eq!(echo["headers"]["x-tenant"], "hmg");
    assert_eq!(echo["headers"]["x-original-host"], "hmg.ninechat.com.br");
    assert_eq!(echo["headers"]["x-forwarded-host"], "hmg.ninechat.com.br");
    assert_eq!(echo["headers"]["x-forwarded-proto"], "https");
    // Host is regenerated for the upstream
    assert_eq!(echo["headers"]["host"], api.to_string());
}

#[tokio::test]
async fn emit_post_forwards_body_and_query() {
    let router = start_router(echo_backends().await).await;

    let res = client()
        .post(router.url("/emit?x=1"))
        .header(HOST, "portal.ninechat.com.br")
        .header("content-type", "application/json")
        .body(r#"{"a":1}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["backend"], "emit");
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["path"], "/emit");
    assert_eq!(echo["query"], "x=1");
    assert_eq!(echo["body"], r#"{"a":1}"#);
    assert_eq!(echo["headers"]["content-type"], "application/json");
    assert_eq!(echo["headers"]["content-length"], "7");
    assert_eq!(echo["headers"]["x-tenant"], "portal");
}

#[tokio::test]
async fn socket_long_poll_strips_prefix() {
    let router = start_router(echo_backends().await).await;

    let res = client()
        .get(router.url("/socket.io/?EIO=4&transport=polling"))
        .header(HOST, "clinop.ninechat.com.br")
        .send()
        .await
        .unwrap();

    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["backend"], "ws");
    assert_eq!(echo["path"], "/socket.io/");
    assert_eq!(echo["query"], "EIO=4&transport=polling");
    assert_eq!(echo["headers"]["x-tenant"], "clinop");
}

#[tokio::test]
async fn socket_post_drops_body() {
    let router = start_router(echo_backends().await).await;

    let res = client()
        .post(router.url("/socket.io/?EIO=4&transport=polling"))
        .header(HOST, "clinop.ninechat.com.br")
        .body("40")
        .send()
        .await
        .unwrap();

    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["body"], "");
}

#[tokio::test]
async fn unknown_host_falls_back_to_frontend() {
    let router = start_router(echo_backends().await).await;

    let res = client()
        .get(router.url("/dashboard?tab=2"))
        .header(HOST, "unknownhost.com")
        .send()
        .await
        .unwrap();

    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["backend"], "pages");
    assert_eq!(echo["path"], "/dashboard");
    assert_eq!(echo["query"], "tab=2");
    assert_eq!(echo["headers"]["x-tenant"], "unknownhost.com");
    assert_eq!(echo["headers"]["x-original-host"], "unknownhost.com");
}

#[tokio::test]
async fn frontend_host_override_wins() {
    let portal = start_echo_backend("portal-pages").await;
    let mut config = echo_backends().await;
    config
        .frontend
        .hosts
        .insert("portal.ninechat.com.br".into(), format!("http://{portal}"));
    let router = start_router(config).await;

    let echo: Value = client()
        .get(router.url("/"))
        .header(HOST, "portal.ninechat.com.br")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["backend"], "portal-pages");
    assert_eq!(echo["path"], "/");

    let echo: Value = client()
        .get(router.url("/"))
        .header(HOST, "hmg.ninechat.com.br")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["backend"], "pages");
}

#[tokio::test]
async fn empty_api_remainder_has_single_slash() {
    let router = start_router(echo_backends().await).await;

    let echo: Value = client()
        .get(router.url("/api/v1/"))
        .header(HOST, "hmg.ninechat.com.br")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["path"], "/api/v1/");
    assert_eq!(echo["query"], Value::Null);
}

#[tokio::test]
async fn get_never_forwards_a_body() {
    let router = start_router(echo_backends().await).await;

    let echo: Value = client()
        .get(router.url("/api/v1/search"))
        .header(HOST, "hmg.ninechat.com.br")
        .body("should not arrive")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["body"], "");
    assert_eq!(echo["headers"].get("content-length"), None);
}

#[tokio::test]
async fn spoofed_identity_headers_are_overwritten() {
    let router = start_router(echo_backends().await).await;

    let echo: Value = client()
        .get(router.url("/api/v1/me"))
        .header(HOST, "hmg.ninechat.com.br")
        .header("x-tenant", "admin")
        .header("x-forwarded-proto", "http")
        .header("x-trace", "abc")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["headers"]["x-tenant"], "hmg");
    assert_eq!(echo["headers"]["x-forwarded-proto"], "https");
    assert_eq!(echo["headers"]["x-trace"], "abc");
}

#[tokio::test]
async fn upstream_error_status_is_relayed() {
    let failing = start_status_backend(503, "maintenance").await;
    let mut config = echo_backends().await;
    config.origins.api_v1 = format!("http://{failing}/api/v1");
    let router = start_router(config).await;

    let res = client()
        .get(router.url("/api/v1/users"))
        .header(HOST, "hmg.ninechat.com.br")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.headers()["x-upstream"], "status-backend");
    assert_eq!(res.text().await.unwrap(), "maintenance");
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);

    let mut config = echo_backends().await;
    config.origins.emit = format!("http://{closed_addr}/emit");
    let router = start_router(config).await;

    let res = client()
        .post(router.url("/emit"))
        .header(HOST, "portal.ninechat.com.br")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}
