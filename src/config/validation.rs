//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check admin credentials are well formed and unique
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("routing.root_url `{url}` is invalid: {reason}")]
    InvalidRootUrl { url: String, reason: String },

    #[error("routing.cache_path must not be empty")]
    EmptyCachePath,

    #[error("security.login_route must not be empty when login_mode is on")]
    EmptyLoginRoute,

    #[error("admin `{0}` is declared more than once")]
    DuplicateAdmin(String),

    #[error("admin `{0}` has a password_hash that is not 64 hex characters")]
    InvalidPasswordHash(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    match Url::parse(&config.routing.root_url) {
        Ok(url) if url.cannot_be_a_base() => errors.push(ValidationError::InvalidRootUrl {
            url: config.routing.root_url.clone(),
            reason: "not a base URL".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidRootUrl {
            url: config.routing.root_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.routing.cache_path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyCachePath);
    }

    if config.security.login_mode && config.security.login_route.trim().is_empty() {
        errors.push(ValidationError::EmptyLoginRoute);
    }

    let mut seen = HashSet::new();
    for admin in &config.security.admins {
        if !seen.insert(admin.username.as_str()) {
            errors.push(ValidationError::DuplicateAdmin(admin.username.clone()));
        }
        let hash = &admin.password_hash;
        if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            errors.push(ValidationError::InvalidPasswordHash(admin.username.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AdminCredential;
    use crate::security::hash_password;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.routing.root_url = "not a url".into();
        config.timeouts.request_secs = 0;
        config.security.admins = vec![
            AdminCredential {
                username: "root".into(),
                password_hash: hash_password("root", "pw"),
            },
            AdminCredential {
                username: "root".into(),
                password_hash: "short".into(),
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::InvalidBindAddress("nowhere".into())));
        assert!(errors.contains(&ValidationError::DuplicateAdmin("root".into())));
        assert!(errors.contains(&ValidationError::InvalidPasswordHash("root".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(matches!(errors[1], ValidationError::InvalidRootUrl { .. }));
    }

    #[test]
    fn test_login_mode_requires_route() {
        let mut config = RouterConfig::default();
        config.security.login_mode = true;
        config.security.login_route = " ".into();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::EmptyLoginRoute]));
    }
}
