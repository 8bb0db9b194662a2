//! Per-request context.
//!
//! # Responsibilities
//! - Carry the routing-relevant parts of a request (method, path, headers)
//! - Memoize the admin check so it runs at most once per request
//!
//! # Design Decisions
//! - Built from request parts; the body is never read by the router
//! - Passed explicitly to the gate, the dispatcher and actions

use std::sync::OnceLock;

use axum::http::header::IntoHeaderName;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Method};

use crate::security::Security;

#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    admin: OnceLock<bool>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            admin: OnceLock::new(),
        }
    }

    /// Build a context from the parts of an incoming request.
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
            admin: OnceLock::new(),
        }
    }

    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether the caller is an authorized admin. Asks `security` once.
    pub fn is_admin(&self, security: &dyn Security) -> bool {
        *self.admin.get_or_init(|| security.is_admin_authorized(self))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;

    use super::*;

    #[test]
    fn test_from_parts() {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .uri("http://example.com/users/42?tab=posts")
            .header("x-test", "1")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let ctx = RequestContext::from_parts(&parts);
        assert_eq!(ctx.method(), Method::POST);
        assert_eq!(ctx.path(), "/users/42");
        assert_eq!(ctx.query(), Some("tab=posts"));
        assert_eq!(ctx.headers().get("x-test").unwrap(), "1");
    }
}
