//! Request handling and transformation.
//!
//! # Responsibilities
//! - Extract the hostname the caller addressed
//! - Rewrite headers for the upstream (drop stale, inject tenant identity)
//! - Decide whether the body is forwarded
//! - Assemble the outbound request
//!
//! # Design Decisions
//! - The inbound request is only read, never forwarded as-is
//! - `Host` and `Content-Length` are regenerated by the client transport
//! - Bodies are buffered whole; there is no streaming pass-through

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue, InvalidHeaderValue, CONTENT_LENGTH, HOST};
use axum::http::uri::Authority;
use axum::http::{HeaderMap, Method, Request, Uri};

use crate::http::error::ProxyError;
use crate::routing::{RouteKind, TenantContext};

/// Hostname the caller addressed.
pub const X_ORIGINAL_HOST: HeaderName = HeaderName::from_static("x-original-host");
/// Tenant id resolved from the hostname.
pub const X_TENANT: HeaderName = HeaderName::from_static("x-tenant");
/// Same value as `X-Original-Host`, for upstreams that read the standard name.
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
/// Always `https`; TLS is terminated in front of the router.
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Hostname (without port) the request was addressed to.
///
/// The URI authority wins over the `Host` header, which is what HTTP/2 and
/// absolute-form requests carry.
pub fn request_host(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    if let Some(host) = uri.host() {
        return Some(host.to_string());
    }

    let value = headers.get(HOST)?.to_str().ok()?;
    let authority: Authority = value.parse().ok()?;
    Some(authority.host().to_string())
}

/// Uppercase the method, leaving standard methods untouched.
pub fn normalize_method(method: &Method) -> Method {
    let upper = method.as_str().to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes()).unwrap_or_else(|_| method.clone())
}

/// Copy inbound headers for the upstream request.
pub fn transform_headers(
    inbound: &HeaderMap,
    tenant: &TenantContext,
) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = inbound.clone();
    headers.remove(HOST);
    headers.remove(CONTENT_LENGTH);

    let host = HeaderValue::from_str(&tenant.original_host)?;
    headers.insert(X_ORIGINAL_HOST, host.clone());
    headers.insert(X_TENANT, HeaderValue::from_str(&tenant.tenant_id)?);
    headers.insert(X_FORWARDED_HOST, host);
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));

    Ok(headers)
}

/// What happens to the inbound body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPolicy {
    /// No body is read or sent.
    Absent,
    /// The full inbound body, read up front.
    Buffered(Bytes),
}

impl BodyPolicy {
    /// GET, HEAD and the socket route never carry a body upstream.
    pub fn forwards_body(method: &Method, kind: RouteKind) -> bool {
        !(kind == RouteKind::Socket || *method == Method::GET || *method == Method::HEAD)
    }

    /// Apply the policy to an inbound body.
    pub async fn read(method: &Method, kind: RouteKind, body: Body) -> Result<Self, ProxyError> {
        if !Self::forwards_body(method, kind) {
            return Ok(BodyPolicy::Absent);
        }

        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(ProxyError::BodyRead)?;
        Ok(BodyPolicy::Buffered(bytes))
    }

    fn into_body(self) -> Body {
        match self {
            BodyPolicy::Absent => Body::empty(),
            BodyPolicy::Buffered(bytes) => Body::from(bytes),
        }
    }
}

/// Fully described request to send upstream.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Uri,
    pub headers: HeaderMap,
    pub body: BodyPolicy,
}

impl OutboundRequest {
    /// Build the upstream request from inbound parts.
    ///
    /// The body is read before anything is sent, so a truncated body fails
    /// the request without contacting the upstream.
    pub async fn build(
        method: &Method,
        headers: &HeaderMap,
        body: Body,
        tenant: &TenantContext,
        kind: RouteKind,
        url: Uri,
    ) -> Result<Self, ProxyError> {
        let method = normalize_method(method);
        let headers = transform_headers(headers, tenant)?;
        let body = BodyPolicy::read(&method, kind, body).await?;

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }

    /// Convert into a request the HTTP client can send.
    pub fn into_request(self) -> Request<Body> {
        let mut request = Request::new(self.body.into_body());
        *request.method_mut() = self.method;
        *request.uri_mut() = self.url;
        *request.headers_mut() = self.headers;
        request
    }
}
