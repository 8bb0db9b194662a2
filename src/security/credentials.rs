//! Credential-based `Security` implementation.
//!
//! Admins are configured as `username` + SHA-256 hex of `username ‖ password`.
//! A request is authorized when it carries either HTTP Basic credentials that
//! hash to a configured admin, or `Bearer <api_key>` when an API key is set.

use std::collections::HashMap;

use axum::http::header::AUTHORIZATION;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use sha2::{Digest, Sha256};

use super::Security;
use crate::config::SecurityConfig;
use crate::http::request::RequestContext;

fn finish(hasher: Sha256) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// SHA-256 of `username ‖ password`.
fn credential_digest(username: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    finish(hasher)
}

fn token_digest(token: &str) -> [u8; 32] {
    finish(Sha256::new_with_prefix(token.as_bytes()))
}

/// Hash stored in configuration for an admin.
pub fn hash_password(username: &str, password: &str) -> String {
    hex::encode(credential_digest(username, password))
}

/// Compare two fixed-length digests without short-circuiting on the first
/// differing byte.
fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Clone, Default)]
pub struct CredentialSecurity {
    /// username → decoded password digest.
    admins: HashMap<String, [u8; 32]>,
    /// SHA-256 of the API key; tokens are hashed before comparison.
    api_key: Option<[u8; 32]>,
    login_mode: bool,
}

impl CredentialSecurity {
    pub fn from_config(config: &SecurityConfig) -> Self {
        let admins = config
            .admins
            .iter()
            .filter_map(|a| {
                let digest = hex::decode(&a.password_hash)
                    .ok()
                    .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok());
                if digest.is_none() {
                    tracing::warn!(username = %a.username, "Ignoring admin with malformed password hash");
                }
                digest.map(|d| (a.username.clone(), d))
            })
            .collect();

        Self {
            admins,
            api_key: config
                .api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .map(token_digest),
            login_mode: config.login_mode,
        }
    }

    pub fn has_admins(&self) -> bool {
        !self.admins.is_empty()
    }

    fn check_basic(&self, encoded: &str) -> bool {
        let Ok(decoded) = BASE64_STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let Ok(decoded) = String::from_utf8(decoded) else {
            return false;
        };
        let Some((username, password)) = decoded.split_once(':') else {
            return false;
        };
        self.admins
            .get(username)
            .is_some_and(|expected| digests_match(expected, &credential_digest(username, password)))
    }

    fn check_bearer(&self, token: &str) -> bool {
        let presented = token_digest(token.trim());
        self.api_key
            .as_ref()
            .is_some_and(|key| digests_match(key, &presented))
    }
}

impl Security for CredentialSecurity {
    fn is_admin_authorized(&self, ctx: &RequestContext) -> bool {
        let Some(value) = ctx.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            return false;
        };

        let authorized = if let Some(encoded) = value.strip_prefix("Basic ") {
            self.check_basic(encoded)
        } else if let Some(token) = value.strip_prefix("Bearer ") {
            self.check_bearer(token)
        } else {
            false
        };

        tracing::debug!(path = %ctx.path(), authorized, "Checked admin credentials");
        authorized
    }

    fn is_login_mode_enabled(&self) -> bool {
        self.login_mode
    }
}
