//! Upgraded connection relay (WebSocket).
//!
//! # Responsibilities
//! - Detect upgrade requests
//! - Join the caller's upgraded connection to the upstream's once the
//!   upstream answers `101 Switching Protocols`
//!
//! # Data Flow
//! ```text
//! Client ←──── raw bytes ────→ Router ←──── raw bytes ────→ Backend
//! ```
//!
//! # Design Decisions
//! - The handshake is negotiated end to end by client and backend
//! - Bytes are copied as-is; frames are never parsed
//! - Each tunnel runs in its own task and ends when either side closes

use axum::http::header::{CONNECTION, UPGRADE};
use axum::http::HeaderMap;
use hyper::upgrade::OnUpgrade;
use hyper_util::rt::TokioIo;

/// True when the request asks for a protocol upgrade.
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    let connection_upgrade = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));

    connection_upgrade && headers.contains_key(UPGRADE)
}

/// Spawn a task copying bytes between the two upgraded connections.
pub fn spawn_tunnel(client: OnUpgrade, upstream: OnUpgrade, tenant: String, target: String) {
    tokio::spawn(async move {
        let (client, upstream) = match tokio::try_join!(client, upstream) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(tenant = %tenant, upstream = %target, error = %e, "Upgrade failed");
                return;
            }
        };

        let mut client = TokioIo::new(client);
        let mut upstream = TokioIo::new(upstream);

        match tokio::io::copy_bidirectional(&mut client, &mut upstream).await {
            Ok((from_client, from_upstream)) => tracing::debug!(
                tenant = %tenant,
                upstream = %target,
                from_client,
                from_upstream,
                "Tunnel closed"
            ),
            Err(e) => tracing::debug!(
                tenant = %tenant,
                upstream = %target,
                error = %e,
                "Tunnel closed with error"
            ),
        }
    });
}
