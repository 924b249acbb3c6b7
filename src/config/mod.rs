//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → shared via Arc to the request handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routing rules never change at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{
    FrontendConfig, ListenerConfig, LogFormat, ObservabilityConfig, OriginsConfig, RouterConfig,
    TenantConfig,
};
pub use validation::{validate_config, ValidationError};
