//! Request-level failures and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::routing::RouteError;

/// Why a request could not be forwarded.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Neither the URI nor the `Host` header names a host.
    #[error("request has no host")]
    MissingHost,

    /// The host could not be carried in a header value.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] axum::http::header::InvalidHeaderValue),

    /// The inbound body could not be read in full.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// The configured origin cannot produce an upstream address.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The outbound request failed before a response arrived.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingHost | ProxyError::InvalidHeader(_) | ProxyError::BodyRead(_) => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::Route(_) | ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = match &self {
            ProxyError::MissingHost => "Missing Host header",
            ProxyError::InvalidHeader(_) => "Invalid Host header",
            ProxyError::BodyRead(_) => "Failed to read request body",
            ProxyError::Route(_) => "Upstream misconfigured",
            ProxyError::Upstream(_) => "Upstream request failed",
        };
        (self.status(), message).into_response()
    }
}
