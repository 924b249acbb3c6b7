//! Upstream URL construction.
//!
//! Scheme, host and port always come from the configured origin. Only the
//! path (per [`PathRewrite`]) and the query string come from the inbound
//! request. The inbound path is expected to be dot-segment free already
//! (see [`normalize_path`]); nothing here re-normalizes it, and the query is
//! copied byte-for-byte.

use std::borrow::Cow;

use axum::http::Uri;
use thiserror::Error;
use url::{Position, Url};

use crate::routing::matcher::PathRewrite;

/// Errors raised while turning a route into an upstream address.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid origin {origin}: {source}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: url::ParseError,
    },

    #[error("upstream URL {url} is not a valid request URI: {source}")]
    InvalidUri {
        url: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
}

/// Join a base path and a suffix with exactly one `/` between them.
pub fn join_path(base: &str, suffix: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    if suffix.starts_with('/') {
        format!("{base}{suffix}")
    } else {
        format!("{base}/{suffix}")
    }
}

fn is_current_dir(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_parent_dir(segment: &str) -> bool {
    ["..", ".%2e", "%2e.", "%2e%2e"]
        .iter()
        .any(|dots| segment.eq_ignore_ascii_case(dots))
}

/// Resolve `.` and `..` segments (plain or `%2e`-encoded) in a request path.
///
/// A trailing dot segment leaves a trailing `/`, and `..` never climbs above
/// the root. Paths without dot segments are returned untouched.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let rest = path.strip_prefix('/').unwrap_or(path);
    if !rest
        .split('/')
        .any(|segment| is_current_dir(segment) || is_parent_dir(segment))
    {
        return Cow::Borrowed(path);
    }

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    let mut out: Vec<&str> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.into_iter().enumerate() {
        if is_parent_dir(segment) {
            out.pop();
        } else if !is_current_dir(segment) {
            out.push(segment);
            continue;
        }
        if i == last {
            out.push("");
        }
    }

    Cow::Owned(format!("/{}", out.join("/")))
}

/// Build the upstream URI for `origin` from the inbound path and query.
///
/// The inbound query replaces whatever query the origin carries, and is
/// dropped from the origin when the inbound request has none.
pub fn build_upstream_url(
    origin: &str,
    path: &str,
    query: Option<&str>,
    rewrite: PathRewrite,
) -> Result<Uri, RouteError> {
    let origin_url = Url::parse(origin).map_err(|source| RouteError::InvalidOrigin {
        origin: origin.to_string(),
        source,
    })?;
    let base_path = origin_url.path();

    let upstream_path = match rewrite {
        PathRewrite::StripPrefix(prefix) => {
            let rest = path.strip_prefix(prefix).unwrap_or(path);
            let rest = if rest.is_empty() { "/" } else { rest };
            join_path(base_path, rest)
        }
        PathRewrite::Preserve => join_path(base_path, path),
        PathRewrite::OriginPath => base_path.to_string(),
    };

    let mut target = format!("{}{}", &origin_url[..Position::BeforePath], upstream_path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }

    target
        .parse::<Uri>()
        .map_err(|source| RouteError::InvalidUri { url: target, source })
}
