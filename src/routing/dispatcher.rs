//! Path → action dispatch.
//!
//! # Responsibilities
//! - Hold a compiled matcher per route, in table order
//! - Find the first route matching a path and extract its parameters
//! - Resolve the route's controller and invoke the action
//!
//! # Design Decisions
//! - First match wins; no "most specific" search
//! - Linear scan (route tables are small), matchers compiled once up front
//! - Action errors pass through untouched inside `DispatchError::Action`
//! - A path ending in `/` gets one more scan without it, then `None`

use std::sync::Arc;

use axum::response::Response;
use thiserror::Error;

use super::catalog::RouteCatalog;
use super::pattern::{CompiledPattern, PathParams};
use super::table::RouteDescriptor;
use crate::controller::{ActionArgs, ActionContext, ActionError, ControllerRegistry};
use crate::http::request::RequestContext;
use crate::observability::metrics;

/// Errors surfaced by dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The route names a controller the registry does not know (stale cache).
    #[error("route `{pattern}` targets unregistered controller `{target}`")]
    UnresolvedTarget { pattern: String, target: String },

    /// The action itself failed.
    #[error(transparent)]
    Action(ActionError),
}

/// A route with its matcher.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub matcher: CompiledPattern,
    pub descriptor: RouteDescriptor,
}

impl CompiledRoute {
    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    /// Arguments for this route's action, in declared order.
    fn args(&self, params: &PathParams) -> ActionArgs {
        ActionArgs::new(
            self.descriptor
                .params
                .iter()
                .map(|name| params.get(name).map(str::to_string))
                .collect(),
        )
    }
}

pub struct Dispatcher {
    routes: Vec<CompiledRoute>,
    catalog: Arc<RouteCatalog>,
    registry: Arc<ControllerRegistry>,
}

impl Dispatcher {
    pub fn new(catalog: Arc<RouteCatalog>, registry: Arc<ControllerRegistry>) -> Self {
        let routes = catalog
            .table()
            .iter()
            .filter_map(|(pattern, descriptor)| match CompiledPattern::compile(pattern) {
                Ok(matcher) => Some(CompiledRoute {
                    matcher,
                    descriptor: descriptor.clone(),
                }),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Dropping route with invalid pattern");
                    None
                }
            })
            .collect();

        Self {
            routes,
            catalog,
            registry,
        }
    }

    pub fn catalog(&self) -> &Arc<RouteCatalog> {
        &self.catalog
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// First route matching `path`, with its captured parameters.
    pub fn find(&self, path: &str) -> Option<(&CompiledRoute, PathParams)> {
        self.scan(path).or_else(|| {
            path.strip_suffix('/')
                .and_then(|stripped| self.scan(stripped))
        })
    }

    fn scan(&self, path: &str) -> Option<(&CompiledRoute, PathParams)> {
        self.routes
            .iter()
            .find_map(|route| route.matcher.captures(path).map(|params| (route, params)))
    }

    /// Dispatch `path`. `Ok(None)` means no route matched.
    pub fn execute(&self, ctx: &RequestContext, path: &str) -> Result<Option<Response>, DispatchError> {
        let Some((route, params)) = self.find(path) else {
            tracing::debug!(path = %path, "No route matched");
            metrics::record_dispatch("miss");
            return Ok(None);
        };

        tracing::debug!(
            path = %path,
            pattern = %route.pattern(),
            target = %route.descriptor.target,
            action = %route.descriptor.method,
            "Route matched"
        );
        let args = route.args(&params);
        let result = self.invoke(route, ctx, args);
        metrics::record_dispatch(if result.is_ok() { "hit" } else { "error" });
        result.map(Some)
    }

    /// Invoke the route declared with exactly `pattern`, bypassing matching.
    pub fn execute_pattern(
        &self,
        ctx: &RequestContext,
        pattern: &str,
        args: ActionArgs,
    ) -> Option<Result<Response, DispatchError>> {
        let route = self.routes.iter().find(|r| r.pattern() == pattern)?;
        Some(self.invoke(route, ctx, args))
    }

    fn invoke(&self, route: &CompiledRoute, ctx: &RequestContext, args: ActionArgs) -> Result<Response, DispatchError> {
        let descriptor = &route.descriptor;
        let instancing = self
            .registry
            .resolve(&descriptor.target)
            .ok_or_else(|| DispatchError::UnresolvedTarget {
                pattern: route.pattern().to_string(),
                target: descriptor.target.clone(),
            })?;

        let cx = ActionContext {
            request: ctx,
            routes: &self.catalog,
        };
        instancing
            .invoke(&descriptor.method, &cx, args)
            .map_err(DispatchError::Action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::slug::SlugIndex;
    use crate::routing::table::RouteTable;

    fn dispatcher(patterns: &[(&str, &str)]) -> Dispatcher {
        let mut table = RouteTable::new();
        for (pattern, method) in patterns {
            table.insert(*pattern, RouteDescriptor::new("blog::Pages", *method, Vec::new()));
        }
        let slugs = SlugIndex::build(&mut table);
        let catalog = RouteCatalog::new(table, slugs, "http://localhost");
        Dispatcher::new(Arc::new(catalog), Arc::new(ControllerRegistry::new()))
    }

    #[test]
    fn test_exact_match_beats_earlier_slash_stripped_match() {
        let d = dispatcher(&[("/x", "no_slash"), ("/x/", "with_slash")]);

        let (route, _) = d.find("/x/").unwrap();
        assert_eq!(route.pattern(), "/x/");
        assert_eq!(route.descriptor.method, "with_slash");

        let (route, _) = d.find("/x").unwrap();
        assert_eq!(route.pattern(), "/x");
    }

    #[test]
    fn test_trailing_slash_retried_once_after_full_scan() {
        let d = dispatcher(&[("/reports", "index"), ("/archive/", "archive")]);

        assert_eq!(d.find("/reports/").unwrap().0.pattern(), "/reports");
        assert!(d.find("/reports//").is_none());
        assert!(d.find("/archive").is_none());
    }

    #[test]
    fn test_first_matching_route_wins() {
        let d = dispatcher(&[("/posts/{id}", "show"), ("/posts/latest", "latest")]);
        assert_eq!(d.find("/posts/latest").unwrap().0.descriptor.method, "show");
    }

    #[test]
    fn test_unregistered_target_is_reported() {
        let d = dispatcher(&[("/x", "index")]);
        let ctx = RequestContext::new(axum::http::Method::GET, "/x");
        assert!(matches!(
            d.execute(&ctx, "/x"),
            Err(DispatchError::UnresolvedTarget { .. })
        ));
        assert!(matches!(d.execute(&ctx, "/missing"), Ok(None)));
    }
}
