//! Response relay.
//!
//! # Responsibilities
//! - Hand the upstream response back to the caller
//!
//! # Design Decisions
//! - Status and the full header set are copied untouched
//! - Body is streamed, never buffered
//! - Upstream error statuses pass through; only transport failures become 502

use axum::body::Body;
use axum::http::Response;
use hyper::body::Incoming;

/// Caller-facing response for an upstream response.
pub fn relay(upstream: Response<Incoming>) -> Response<Body> {
    let (parts, body) = upstream.into_parts();
    Response::from_parts(parts, Body::new(body))
}
