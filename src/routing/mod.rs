//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, query)
//!     → upstream.rs (resolve dot segments in the path)
//!     → tenant.rs (hostname → tenant id)
//!     → matcher.rs (path → RouteKind)
//!     → router.rs (RouteKind + host → origin)
//!     → upstream.rs (origin + path + query → upstream URL)
//! ```
//!
//! # Design Decisions
//! - Routes are fixed at compile time, origins at startup
//! - No regex in hot path (prefix and exact matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered rule list)

pub mod matcher;
pub mod router;
pub mod tenant;
pub mod upstream;

pub use matcher::{classify, PathRewrite, RouteKind};
pub use router::{MatchedRoute, RouteTable};
pub use tenant::{resolve_tenant, TenantContext};
pub use upstream::{build_upstream_url, join_path, normalize_path, RouteError};
