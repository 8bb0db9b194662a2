//! Startup orchestration.
//!
//! # Responsibilities
//! - Assemble the controller registry (built-in controllers first)
//! - Build the router collaborators (security, renderer) from config
//!
//! # Design Decisions
//! - Fail fast: configuration errors are fatal before anything binds
//! - The registry is complete before the first route table is built

use std::sync::Arc;

use crate::config::RouterConfig;
use crate::controller::{builtin, ControllerRegistry};
use crate::http::render::{PlainRenderer, TemplateRenderer};
use crate::routing::RouterServices;
use crate::security::CredentialSecurity;

/// Collaborators for `Router::load`: built-in controllers plus whatever
/// `modules` registers, credential security and the plain renderer.
pub fn build_services<F>(config: &RouterConfig, modules: F) -> RouterServices
where
    F: FnOnce(&mut ControllerRegistry),
{
    let renderer: Arc<dyn TemplateRenderer> = Arc::new(PlainRenderer);

    let mut registry = ControllerRegistry::new();
    builtin::register(&mut registry, config, renderer.clone());
    modules(&mut registry);
    tracing::debug!(controllers = registry.len(), "Controller registry assembled");

    RouterServices {
        registry: Arc::new(registry),
        security: Arc::new(CredentialSecurity::from_config(&config.security)),
        renderer,
    }
}
