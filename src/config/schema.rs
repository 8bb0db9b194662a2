//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route table and reverse-routing settings.
    pub routing: RoutingConfig,

    /// Admin zone and restricted-site settings.
    pub security: SecurityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Developer mode: rediscover routes on every start, ignoring the cache.
    pub debug: bool,

    /// Location of the persisted route table.
    pub cache_path: PathBuf,

    /// Path or slug of the route that `/` should alias.
    pub home_action: Option<String>,

    /// External root URL used for absolute reverse routes.
    pub root_url: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            cache_path: PathBuf::from("config/urls.json"),
            home_action: None,
            root_url: "http://localhost:8080".to_string(),
        }
    }
}

/// A configured administrator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AdminCredential {
    pub username: String,

    /// SHA-256 hex of `username ‖ password` (see `route-cli hash-password`).
    pub password_hash: String,
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Require admin credentials for the whole site.
    pub restricted: bool,

    /// Send unauthorized visitors to the login route instead of a bare 401.
    pub login_mode: bool,

    /// Slug of the login route.
    pub login_route: String,

    /// Administrators allowed through the gate.
    pub admins: Vec<AdminCredential>,

    /// Optional API key accepted as `Authorization: Bearer <key>`.
    pub api_key: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            restricted: false,
            login_mode: false,
            login_route: "admin-login".to_string(),
            admins: Vec::new(),
            api_key: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(!config.routing.debug);
        assert_eq!(config.routing.cache_path, PathBuf::from("config/urls.json"));
        assert_eq!(config.security.login_route, "admin-login");
    }

    #[test]
    fn test_full_config() {
        let config: RouterConfig = toml::from_str(
            r#"
            [routing]
            debug = true
            cache_path = "/var/cache/urls.json"
            home_action = "blog"
            root_url = "https://example.com"

            [security]
            restricted = true
            login_mode = true

            [[security.admins]]
            username = "root"
            password_hash = "abc"
            "#,
        )
        .unwrap();

        assert!(config.routing.debug);
        assert_eq!(config.routing.home_action.as_deref(), Some("blog"));
        assert!(config.security.restricted);
        assert_eq!(config.security.admins.len(), 1);
        assert_eq!(config.security.admins[0].username, "root");
        // Untouched sections keep their defaults.
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
