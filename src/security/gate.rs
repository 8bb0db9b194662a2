//! Pre-dispatch access gate.
//!
//! Two ordered stages:
//! 1. `/admin…` requires an authorized admin.
//! 2. With restricted mode on, every path outside `/admin…` and
//!    `/setup-admin…` requires an authorized admin as well.
//!
//! A failing stage asks for the login flow when it is enabled, otherwise it
//! denies with an HTTP Basic challenge.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use super::Security;
use crate::http::request::RequestContext;
use crate::observability::metrics;

const ADMIN_PREFIX: &str = "/admin";
const SETUP_ADMIN_PREFIX: &str = "/setup-admin";

/// Which stage rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Admin,
    Restricted,
}

/// An authentication challenge returned to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub zone: Zone,
    pub realm: &'static str,
    pub message: &'static str,
}

impl Challenge {
    fn for_zone(zone: Zone) -> Self {
        match zone {
            Zone::Admin => Self {
                zone,
                realm: "Admin",
                message: "Administrator credentials are required for this area",
            },
            Zone::Restricted => Self {
                zone,
                realm: "Restricted",
                message: "This site is restricted",
            },
        }
    }
}

impl IntoResponse for Challenge {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::UNAUTHORIZED, self.message).into_response();
        if let Ok(value) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", self.realm)) {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Continue to dispatch.
    Pass,
    /// Hand the request to the login action.
    Login(Challenge),
    /// Stop and answer with the challenge.
    Deny(Challenge),
}

impl GateDecision {
    fn label(&self) -> &'static str {
        match self {
            GateDecision::Pass => "pass",
            GateDecision::Login(_) => "login",
            GateDecision::Deny(_) => "deny",
        }
    }
}

fn has_prefix_ignore_case(path: &str, prefix: &str) -> bool {
    path.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

pub fn is_admin_path(path: &str) -> bool {
    has_prefix_ignore_case(path, ADMIN_PREFIX)
}

fn is_exempt_from_restriction(path: &str) -> bool {
    is_admin_path(path) || has_prefix_ignore_case(path, SETUP_ADMIN_PREFIX)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate {
    restricted: bool,
}

impl AccessGate {
    pub fn new(restricted: bool) -> Self {
        Self { restricted }
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Decide whether `ctx` may reach dispatch.
    pub fn filter(&self, ctx: &RequestContext, security: &dyn Security) -> GateDecision {
        let path = ctx.path();
        let zone = if is_admin_path(path) {
            Some(Zone::Admin)
        } else if self.restricted && !is_exempt_from_restriction(path) {
            Some(Zone::Restricted)
        } else {
            None
        };

        let decision = match zone {
            Some(zone) if !ctx.is_admin(security) => {
                let challenge = Challenge::for_zone(zone);
                if security.is_login_mode_enabled() {
                    GateDecision::Login(challenge)
                } else {
                    GateDecision::Deny(challenge)
                }
            }
            _ => GateDecision::Pass,
        };

        if decision != GateDecision::Pass {
            tracing::info!(path = %path, decision = decision.label(), "Access gate stopped request");
        }
        metrics::record_gate(decision.label());
        decision
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::Method;

    use super::*;

    struct FixedSecurity {
        admin: bool,
        login: bool,
        checks: AtomicUsize,
    }

    impl FixedSecurity {
        fn new(admin: bool, login: bool) -> Self {
            Self {
                admin,
                login,
                checks: AtomicUsize::new(0),
            }
        }
    }

    impl Security for FixedSecurity {
        fn is_admin_authorized(&self, _ctx: &RequestContext) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.admin
        }

        fn is_login_mode_enabled(&self) -> bool {
            self.login
        }
    }

    fn request(path: &str) -> RequestContext {
        RequestContext::new(Method::GET, path)
    }

    #[test]
    fn test_admin_zone_denied_without_login_flow() {
        let gate = AccessGate::new(false);
        let decision = gate.filter(&request("/admin/anything"), &FixedSecurity::new(false, false));
        assert!(matches!(decision, GateDecision::Deny(Challenge { zone: Zone::Admin, .. })));
    }

    #[test]
    fn test_admin_zone_allows_authorized_admin() {
        let gate = AccessGate::new(false);
        assert_eq!(
            gate.filter(&request("/admin/anything"), &FixedSecurity::new(true, false)),
            GateDecision::Pass
        );
    }

    #[test]
    fn test_admin_zone_delegates_to_login() {
        let gate = AccessGate::new(false);
        let decision = gate.filter(&request("/ADMIN/config"), &FixedSecurity::new(false, true));
        assert!(matches!(decision, GateDecision::Login(Challenge { zone: Zone::Admin, .. })));
    }

    #[test]
    fn test_public_paths_pass_when_unrestricted() {
        let gate = AccessGate::new(false);
        let security = FixedSecurity::new(false, false);
        assert_eq!(gate.filter(&request("/blog"), &security), GateDecision::Pass);
        // Nobody asked, nobody checked.
        assert_eq!(security.checks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_restricted_mode() {
        let gate = AccessGate::new(true);
        let anonymous = FixedSecurity::new(false, false);

        let decision = gate.filter(&request("/blog"), &anonymous);
        assert!(matches!(decision, GateDecision::Deny(Challenge { zone: Zone::Restricted, .. })));

        assert_eq!(gate.filter(&request("/setup-admin"), &anonymous), GateDecision::Pass);
        assert_eq!(gate.filter(&request("/blog"), &FixedSecurity::new(true, false)), GateDecision::Pass);
    }

    #[test]
    fn test_admin_check_runs_once_per_request() {
        let gate = AccessGate::new(true);
        let security = FixedSecurity::new(false, false);
        let ctx = request("/admin");

        gate.filter(&ctx, &security);
        gate.filter(&ctx, &security);
        assert_eq!(security.checks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_challenge_response() {
        let response = Challenge::for_zone(Zone::Restricted).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Restricted\""
        );
    }
}
