//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every origin is an absolute http(s) URL with a host
//! - Check the base domain and bind address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tenant.base_domain must not be empty")]
    EmptyBaseDomain,

    #[error("tenant.base_domain must not start with '.': {0}")]
    LeadingDot(String),

    #[error("{field} is required")]
    MissingOrigin { field: String },

    #[error("{field} is not a valid URL ({value}): {reason}")]
    InvalidOrigin {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{field} must use http or https, got {scheme}")]
    UnsupportedScheme { field: String, scheme: String },

    #[error("listener.bind_address is not a socket address: {0}")]
    InvalidBindAddress(String),

    #[error("PAGES_HOST entry is not host=origin: {0:?}")]
    MalformedHostOverride(String),

    #[error("LOG_FORMAT must be pretty or json, got {0:?}")]
    InvalidLogFormat(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base_domain = &config.tenant.base_domain;
    if base_domain.is_empty() {
        errors.push(ValidationError::EmptyBaseDomain);
    } else if base_domain.starts_with('.') {
        errors.push(ValidationError::LeadingDot(base_domain.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let origins = &config.origins;
    check_origin("origins.api_v1", &origins.api_v1, &mut errors);
    check_origin("origins.ws", &origins.ws, &mut errors);
    check_origin("origins.emit", &origins.emit, &mut errors);
    check_origin(
        "frontend.default_origin",
        &config.frontend.default_origin,
        &mut errors,
    );

    let mut hosts: Vec<_> = config.frontend.hosts.iter().collect();
    hosts.sort();
    for (host, origin) in hosts {
        check_origin(&format!("frontend.hosts.{host}"), origin, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::MissingOrigin {
            field: field.to_string(),
        });
        return;
    }

    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(e) => {
            errors.push(ValidationError::InvalidOrigin {
                field: field.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            });
            return;
        }
    };

    if !matches!(url.scheme(), "http" | "https") {
        errors.push(ValidationError::UnsupportedScheme {
            field: field.to_string(),
            scheme: url.scheme().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RouterConfig {
        let mut config = RouterConfig::default();
        config.tenant.base_domain = "ninechat.com.br".into();
        config.origins.api_v1 = "https://northgate.ninechat.com.br/api/v1".into();
        config.origins.ws = "https://northgate.ninechat.com.br/socket.io".into();
        config.origins.emit = "https://northgate.ninechat.com.br/emit".into();
        config.frontend.default_origin = "https://pages.ninechat.com.br".into();
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = valid_config();
        config.tenant.base_domain = String::new();
        config.origins.api_v1 = String::new();
        config.origins.ws = "not a url".into();
        config.origins.emit = "ftp://northgate.ninechat.com.br/emit".into();
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::EmptyBaseDomain));
        assert!(errors.contains(&ValidationError::MissingOrigin {
            field: "origins.api_v1".into()
        }));
        assert!(errors.contains(&ValidationError::UnsupportedScheme {
            field: "origins.emit".into(),
            scheme: "ftp".into()
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidOrigin { field, .. } if field == "origins.ws")));
        assert!(errors.contains(&ValidationError::InvalidBindAddress("localhost".into())));
    }

    #[test]
    fn rejects_leading_dot_and_bad_frontend_override() {
        let mut config = valid_config();
        config.tenant.base_domain = ".ninechat.com.br".into();
        config
            .frontend
            .hosts
            .insert("portal.ninechat.com.br".into(), "portal-pages".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::LeadingDot(_)));
        assert!(matches!(
            &errors[1],
            ValidationError::InvalidOrigin { field, .. } if field == "frontend.hosts.portal.ninechat.com.br"
        ));
    }
}
