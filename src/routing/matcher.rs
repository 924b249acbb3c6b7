//! Route matching logic.
//!
//! # Responsibilities
//! - Match the dot-segment free request path against prefix and exact rules
//! - Classify a path into exactly one [`RouteKind`]
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Query string and fragment never take part in matching
//! - Rules are evaluated in a fixed order; first match wins
//! - No regex to guarantee O(n) matching

/// Route selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// REST API under `/api/v1/`.
    Api,
    /// Socket.IO WebSocket / long-poll gateway under `/socket.io/`.
    Socket,
    /// Event emission endpoint, exactly `/emit`.
    Emit,
    /// Front-end application for everything else.
    Fallback,
}

impl RouteKind {
    /// Name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Api => "api",
            RouteKind::Socket => "socket",
            RouteKind::Emit => "emit",
            RouteKind::Fallback => "fallback",
        }
    }

    /// How the inbound path maps onto the origin's base path.
    pub fn rewrite(&self) -> PathRewrite {
        match self {
            RouteKind::Api => PathRewrite::StripPrefix("/api/v1"),
            RouteKind::Socket => PathRewrite::StripPrefix("/socket.io"),
            RouteKind::Emit => PathRewrite::OriginPath,
            RouteKind::Fallback => PathRewrite::Preserve,
        }
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path rewrite strategy applied when building the upstream URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRewrite {
    /// Remove the literal prefix, then join the remainder onto the base path.
    StripPrefix(&'static str),
    /// Use the origin's path as-is.
    OriginPath,
    /// Join the whole inbound path onto the base path.
    Preserve,
}

/// A single path condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRule {
    Prefix(&'static str),
    Exact(&'static str),
}

impl PathRule {
    /// Returns true if `path` satisfies this rule.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathRule::Prefix(prefix) => path.starts_with(*prefix),
            PathRule::Exact(exact) => path == *exact,
        }
    }
}

/// Ordered routing rules. Anything left over is [`RouteKind::Fallback`].
pub const RULES: &[(PathRule, RouteKind)] = &[
    (PathRule::Prefix("/api/v1/"), RouteKind::Api),
    (PathRule::Prefix("/socket.io/"), RouteKind::Socket),
    (PathRule::Exact("/emit"), RouteKind::Emit),
];

/// Classify a request path.
pub fn classify(path: &str) -> RouteKind {
    RULES
        .iter()
        .find(|(rule, _)| rule.matches(path))
        .map(|(_, kind)| *kind)
        .unwrap_or(RouteKind::Fallback)
}
