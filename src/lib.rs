//! Host-based edge router.
//!
//! Classifies each request by path, derives a tenant from the hostname and
//! forwards it to the matching origin with tenant headers attached.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
