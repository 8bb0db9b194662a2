//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single catch-all handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Hand every request to the action router
//! - Rebuild and hot-swap the action router on config reload
//!
//! # Design Decisions
//! - Axum does no routing of its own; the action router owns the URL space
//! - The active router sits behind `ArcSwap`: requests in flight keep the
//!   table they started with, new requests see the reloaded one
//! - Reloads touch the filesystem and rebuild on the blocking pool; the
//!   first build happens during startup, before the listener serves

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::Response;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::RouterConfig;
use crate::http::request::RequestContext;
use crate::routing::{Router as ActionRouter, RouterServices};
use crate::security::CredentialSecurity;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ArcSwap<ActionRouter>>,
    pub services: RouterServices,
}

impl AppState {
    /// Rebuild the action router from `config` and swap it in.
    ///
    /// The controller registry is kept; security is rebuilt so credential
    /// and mode changes take effect.
    pub async fn reload(&self, config: RouterConfig) {
        let services = RouterServices {
            security: Arc::new(CredentialSecurity::from_config(&config.security)),
            ..self.services.clone()
        };

        match tokio::task::spawn_blocking(move || load_router(&config, services)).await {
            Ok(router) => {
                let routes = router.catalog().table().len();
                self.router.store(Arc::new(router));
                tracing::info!(routes, "Router reloaded");
            }
            Err(e) => tracing::error!(error = %e, "Router rebuild failed, keeping current table"),
        }
    }
}

/// Load a router, logging (but tolerating) a failed cache write.
fn load_router(config: &RouterConfig, services: RouterServices) -> ActionRouter {
    let (router, persisted) = ActionRouter::load(config, services);
    if let Err(e) = persisted {
        tracing::warn!(error = %e, "Route table could not be persisted");
    }
    tracing::info!(
        source = router.source().as_str(),
        routes = router.catalog().table().len(),
        "Route table ready"
    );
    router
}

/// HTTP front end for the action router.
pub struct HttpServer {
    state: AppState,
    config: RouterConfig,
}

impl HttpServer {
    /// Build the action router per `config` and wrap it in a server.
    pub fn new(config: RouterConfig, services: RouterServices) -> Self {
        let router = load_router(&config, services.clone());
        Self::with_router(router, config, services)
    }

    /// Wrap an already built router.
    pub fn with_router(router: ActionRouter, config: RouterConfig, services: RouterServices) -> Self {
        Self {
            state: AppState {
                router: Arc::new(ArcSwap::from_pointee(router)),
                services,
            },
            config,
        }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    pub fn app(&self) -> axum::Router {
        axum::Router::new()
            .fallback(route_handler)
            .with_state(self.state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router currently serving requests.
    pub fn router(&self) -> Arc<ActionRouter> {
        self.state.router.load_full()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, applying config updates
    /// as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let reloads = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if config.listener.bind_address != addr.to_string() {
                    tracing::warn!(
                        bind_address = %config.listener.bind_address,
                        "Listener changes require a restart"
                    );
                }
                state.reload(config).await;
            }
        });

        axum::serve(listener, self.app())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        reloads.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: gate, dispatch, or render the error page.
async fn route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, _body) = request.into_parts();
    let ctx = RequestContext::from_parts(&parts);

    tracing::debug!(method = %ctx.method(), path = %ctx.path(), "Routing request");

    let router = state.router.load_full();
    router.respond(&ctx)
}
