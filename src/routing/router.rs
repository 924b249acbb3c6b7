//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the configured origins
//! - Normalize the request path once, then classify it and pick its origin
//! - Build the upstream URL for the matched route from that same path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) front-end host lookup via HashMap
//! - Origins are parsed per request so a bad origin fails that request only

use std::borrow::Cow;

use axum::http::Uri;

use crate::config::{FrontendConfig, RouterConfig};
use crate::routing::matcher::{classify, RouteKind};
use crate::routing::upstream::{build_upstream_url, normalize_path, RouteError};

/// Static routing table built from configuration.
#[derive(Debug, Clone)]
pub struct RouteTable {
    api_v1: String,
    ws: String,
    emit: String,
    frontend: FrontendConfig,
}

/// A request matched to a route and its origin.
///
/// `path` is the dot-segment free path the route was chosen from; the
/// upstream URL is built from it and never from the raw inbound path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute<'a> {
    pub kind: RouteKind,
    pub origin: &'a str,
    pub path: Cow<'a, str>,
}

impl RouteTable {
    /// Build the table from the router configuration.
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            api_v1: config.origins.api_v1.clone(),
            ws: config.origins.ws.clone(),
            emit: config.origins.emit.clone(),
            frontend: config.frontend.clone(),
        }
    }

    /// Select the route for a request to `host` with `path`.
    pub fn resolve<'a>(&'a self, host: &str, path: &'a str) -> MatchedRoute<'a> {
        let path = normalize_path(path);
        let kind = classify(&path);
        let origin = match kind {
            RouteKind::Api => self.api_v1.as_str(),
            RouteKind::Socket => self.ws.as_str(),
            RouteKind::Emit => self.emit.as_str(),
            RouteKind::Fallback => self.frontend.origin_for(host),
        };
        MatchedRoute { kind, origin, path }
    }
}

impl MatchedRoute<'_> {
    /// Upstream URL for this route given the inbound query.
    pub fn upstream_url(&self, query: Option<&str>) -> Result<Uri, RouteError> {
        build_upstream_url(self.origin, &self.path, query, self.kind.rewrite())
    }
}
