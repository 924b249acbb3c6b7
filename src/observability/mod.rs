//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers and lifecycle tasks
//!     → tracing events (structured fields: tenant, route, upstream, status)
//!     → logging.rs subscriber (pretty or JSON on stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - `RUST_LOG` overrides the configured level
//! - HTTP request spans come from tower-http's TraceLayer

pub mod logging;

pub use logging::init_logging;
