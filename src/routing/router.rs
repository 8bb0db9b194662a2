//! The request router.
//!
//! # Responsibilities
//! - Load (or rebuild) the route table and freeze it
//! - Run the access gate, then dispatch
//! - Turn outcomes into responses (challenge, 404, 500)
//!
//! # Design Decisions
//! - Immutable after construction; reloads build a whole new Router
//! - The gate runs before any route lookup
//! - A gate "login" decision dispatches the configured login route with the
//!   requested path as its argument; without one the request is denied

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;

use super::cache::{load_routes, PersistenceError, TableSource};
use super::catalog::{AdminRoutes, RouteCatalog, RouteError};
use super::dispatcher::{DispatchError, Dispatcher};
use super::slug::SlugIndex;
use super::table::RouteTable;
use crate::config::RouterConfig;
use crate::controller::{ActionArgs, ControllerRegistry};
use crate::http::render::{TemplateRenderer, ERROR_VIEW};
use crate::http::request::RequestContext;
use crate::security::{AccessGate, Challenge, GateDecision, Security};

/// Collaborators the router is built with.
#[derive(Clone)]
pub struct RouterServices {
    pub registry: Arc<ControllerRegistry>,
    pub security: Arc<dyn Security>,
    pub renderer: Arc<dyn TemplateRenderer>,
}

/// What happened to a request.
#[derive(Debug)]
pub enum RouteOutcome {
    Dispatched(Response),
    Unauthorized(Challenge),
    NotFound,
}

pub struct Router {
    dispatcher: Dispatcher,
    gate: AccessGate,
    security: Arc<dyn Security>,
    renderer: Arc<dyn TemplateRenderer>,
    login_route: String,
    source: TableSource,
}

impl Router {
    /// Load the route table per `config` and build a router around it.
    ///
    /// The second value reports whether the table could be persisted; a
    /// failure there does not prevent the router from working.
    pub fn load(config: &RouterConfig, services: RouterServices) -> (Self, Result<(), PersistenceError>) {
        let loaded = load_routes(&config.routing, &services.registry);
        let catalog = RouteCatalog::new(loaded.table, loaded.slugs, config.routing.root_url.clone());
        let router = Self::with_catalog(catalog, loaded.source, config, services);
        (router, loaded.persisted)
    }

    /// Build a router over an already assembled table, bypassing the cache.
    pub fn from_table(mut table: RouteTable, config: &RouterConfig, services: RouterServices) -> Self {
        let slugs = SlugIndex::build(&mut table);
        let catalog = RouteCatalog::new(table, slugs, config.routing.root_url.clone());
        Self::with_catalog(catalog, TableSource::Discovery, config, services)
    }

    fn with_catalog(
        catalog: RouteCatalog,
        source: TableSource,
        config: &RouterConfig,
        services: RouterServices,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::new(catalog), services.registry);
        Self {
            dispatcher,
            gate: AccessGate::new(config.security.restricted),
            security: services.security,
            renderer: services.renderer,
            login_route: config.security.login_route.clone(),
            source,
        }
    }

    pub fn catalog(&self) -> &RouteCatalog {
        self.dispatcher.catalog()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Whether the table came from the cache or from discovery.
    pub fn source(&self) -> TableSource {
        self.source
    }

    pub fn get_route(
        &self,
        slug: &str,
        absolute: bool,
        params: Option<&HashMap<String, String>>,
    ) -> Result<String, RouteError> {
        self.catalog().get_route(slug, absolute, params)
    }

    pub fn get_admin_routes(&self) -> AdminRoutes {
        self.catalog().get_admin_routes()
    }

    pub fn get_slugs(&self) -> &SlugIndex {
        self.catalog().get_slugs()
    }

    /// Gate the request, then dispatch it.
    pub fn handle(&self, ctx: &RequestContext) -> Result<RouteOutcome, DispatchError> {
        match self.gate.filter(ctx, self.security.as_ref()) {
            GateDecision::Pass => {}
            GateDecision::Deny(challenge) => return Ok(RouteOutcome::Unauthorized(challenge)),
            GateDecision::Login(challenge) => return self.login(ctx, challenge),
        }

        Ok(match self.dispatcher.execute(ctx, ctx.path())? {
            Some(response) => RouteOutcome::Dispatched(response),
            None => RouteOutcome::NotFound,
        })
    }

    fn login(&self, ctx: &RequestContext, challenge: Challenge) -> Result<RouteOutcome, DispatchError> {
        let Some(pattern) = self.catalog().get_slugs().pattern_for(&self.login_route) else {
            tracing::warn!(login_route = %self.login_route, "Login mode enabled but no login route registered");
            return Ok(RouteOutcome::Unauthorized(challenge));
        };

        let args = ActionArgs::from(vec![ctx.path().to_string()]);
        match self.dispatcher.execute_pattern(ctx, pattern, args) {
            Some(result) => result.map(RouteOutcome::Dispatched),
            None => Ok(RouteOutcome::Unauthorized(challenge)),
        }
    }

    /// Handle a request all the way to a response.
    pub fn respond(&self, ctx: &RequestContext) -> Response {
        match self.handle(ctx) {
            Ok(RouteOutcome::Dispatched(response)) => response,
            Ok(RouteOutcome::Unauthorized(challenge)) => challenge.into_response(),
            Ok(RouteOutcome::NotFound) => self.http_not_found(ctx),
            Err(e) => self.http_error(ctx, &e),
        }
    }

    /// 404 page for `ctx`.
    pub fn http_not_found(&self, ctx: &RequestContext) -> Response {
        let body = self.renderer.render(
            ERROR_VIEW,
            &json!({
                "status": 404,
                "title": "Not Found",
                "message": "Page not found",
                "path": ctx.path(),
            }),
        );
        (StatusCode::NOT_FOUND, Html(body)).into_response()
    }

    /// 500 page for a failed dispatch.
    pub fn http_error(&self, ctx: &RequestContext, error: &DispatchError) -> Response {
        tracing::error!(path = %ctx.path(), error = %error, "Request failed");
        let body = self.renderer.render(
            ERROR_VIEW,
            &json!({
                "status": 500,
                "title": "Internal Server Error",
                "message": error.to_string(),
                "path": ctx.path(),
            }),
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}
