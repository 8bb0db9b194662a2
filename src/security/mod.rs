//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → gate.rs (admin zone, restricted mode)
//!         → Security::is_admin_authorized (memoized per request)
//!     → Pass / Login / Deny
//! ```
//!
//! # Design Decisions
//! - Identity lives behind the `Security` trait; the gate never inspects headers
//! - Authorization is re-evaluated per request, never cached across requests

pub mod credentials;
pub mod gate;

use crate::http::request::RequestContext;

pub use credentials::{hash_password, CredentialSecurity};
pub use gate::{AccessGate, Challenge, GateDecision, Zone};

/// Identity checks consumed by the access gate.
pub trait Security: Send + Sync {
    /// Whether the caller behind `ctx` is an authorized administrator.
    fn is_admin_authorized(&self, ctx: &RequestContext) -> bool;

    /// Whether rejected requests should be handed to the login action.
    fn is_login_mode_enabled(&self) -> bool;
}
