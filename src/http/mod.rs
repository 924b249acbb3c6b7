//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → [routing layer resolves tenant, route and upstream URL]
//!     → request.rs (headers, method, body policy)
//!     → upstream client
//!     → response.rs (relay status, headers, streamed body)
//!       or websocket.rs (tunnel upgraded connections)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use error::ProxyError;
pub use request::{
    BodyPolicy, OutboundRequest, X_FORWARDED_HOST, X_FORWARDED_PROTO, X_ORIGINAL_HOST, X_TENANT,
};
pub use server::{AppState, HttpServer};
