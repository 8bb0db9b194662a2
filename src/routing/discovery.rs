//! Route discovery from the controller manifest.
//!
//! # Responsibilities
//! - Walk registered controllers in scan order (core, then modules)
//! - Read the `route <pattern>` tag of every public action
//! - Alias `/` to the configured home action
//!
//! # Design Decisions
//! - A controller that cannot be routed is skipped, never fatal
//! - A pattern that does not compile is skipped with a warning
//! - Earlier declarations shadow later ones with the same pattern

use super::pattern::CompiledPattern;
use super::slug::slugify;
use super::table::{RouteDescriptor, RouteTable};
use crate::controller::{ControllerRegistry, RegisteredController};

/// Build a fresh route table from `registry`.
pub fn discover(registry: &ControllerRegistry, home_action: Option<&str>) -> RouteTable {
    let mut table = RouteTable::new();
    for controller in registry.scan_order() {
        add_routes(&mut table, controller);
    }

    if let Some(home) = home_action.map(str::trim).filter(|h| !h.is_empty()) {
        alias_home(&mut table, home);
    }

    tracing::info!(routes = table.len(), controllers = registry.len(), "Route discovery finished");
    table
}

fn add_routes(table: &mut RouteTable, controller: &RegisteredController) {
    let descriptor = &controller.descriptor;
    let target = descriptor.target();

    if !descriptor.is_concrete() {
        tracing::debug!(target = %target, kind = ?descriptor.kind, "Skipping non-concrete controller");
        return;
    }
    if controller.instancing.is_none() {
        tracing::warn!(target = %target, "Skipping controller without an instance");
        return;
    }

    for action in descriptor.actions.iter().filter(|a| a.is_public()) {
        let Some(pattern) = action.route_pattern() else {
            continue;
        };

        if let Err(e) = CompiledPattern::compile(pattern) {
            tracing::warn!(target = %target, action = %action.name, error = %e, "Skipping unroutable action");
            continue;
        }

        let route = RouteDescriptor::new(target.clone(), action.name.clone(), action.declared_params(pattern));
        if table.insert(pattern, route) {
            tracing::debug!(pattern = %pattern, target = %target, action = %action.name, "Route registered");
        } else {
            tracing::warn!(
                pattern = %pattern,
                target = %target,
                action = %action.name,
                "Pattern already declared, keeping the earlier route"
            );
        }
    }
}

/// Register `/` as an alias of the route the home action names.
///
/// `home` may be a path (`blog/index`, leading slash optional) or a slug
/// (`blog-index`). The first route in table order that matches wins.
fn alias_home(table: &mut RouteTable, home: &str) {
    let path = format!("/{}", home.trim_start_matches('/'));
    let slug = slugify(home);

    let found = table
        .iter()
        .find(|(pattern, _)| pattern.eq_ignore_ascii_case(&path) || slugify(pattern) == slug)
        .map(|(pattern, descriptor)| (pattern.to_string(), descriptor.clone()));

    match found {
        Some((pattern, descriptor)) => {
            tracing::info!(home = %home, pattern = %pattern, "Aliasing / to home action");
            table.alias("/", descriptor);
        }
        None => tracing::warn!(home = %home, "Home action does not match any route"),
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;
    use crate::controller::{
        ActionArgs, ActionContext, ActionDescriptor, ActionResult, Controller, ControllerDescriptor,
        ControllerKind, Instancing, Namespace,
    };

    struct Noop;

    impl Controller for Noop {
        fn invoke(&self, _action: &str, _cx: &ActionContext<'_>, _args: ActionArgs) -> ActionResult {
            Ok("noop".into_response())
        }
    }

    fn registry() -> ControllerRegistry {
        let mut registry = ControllerRegistry::new();
        registry
            .register(
                ControllerDescriptor::new(Namespace::module("blog"), "Posts")
                    .action(ActionDescriptor::public("list").route("/posts"))
                    .action(ActionDescriptor::public("show").route("/posts/{id}"))
                    .action(ActionDescriptor::public("shadowed").route("/admin"))
                    .action(ActionDescriptor::private("draft").route("/posts/draft"))
                    .action(ActionDescriptor::public("helper")),
                Instancing::shared(Noop),
            )
            .register(
                ControllerDescriptor::new(Namespace::Core, "Admin")
                    .action(ActionDescriptor::public("index").route("/admin")),
                Instancing::shared(Noop),
            )
            .declare(
                ControllerDescriptor::new(Namespace::Core, "Base")
                    .kind(ControllerKind::Abstract)
                    .action(ActionDescriptor::public("base").route("/base")),
            )
            .declare(
                ControllerDescriptor::new(Namespace::module("shop"), "Orphan")
                    .action(ActionDescriptor::public("lost").route("/orphan")),
            );
        registry
    }

    #[test]
    fn test_discovers_public_tagged_actions_in_scan_order() {
        let table = discover(&registry(), None);
        let patterns: Vec<_> = table.iter().map(|(p, _)| p).collect();
        assert_eq!(patterns, vec!["/admin", "/posts", "/posts/{id}"]);

        let show = table.get("/posts/{id}").unwrap();
        assert_eq!(show.target, "blog::Posts");
        assert_eq!(show.method, "show");
        assert_eq!(show.params, vec!["id"]);
    }

    #[test]
    fn test_core_routes_shadow_module_routes() {
        let table = discover(&registry(), None);
        assert_eq!(table.get("/admin").unwrap().target, "core::Admin");
    }

    #[test]
    fn test_skips_abstract_and_uninstantiable_controllers() {
        let table = discover(&registry(), None);
        assert!(table.get("/base").is_none());
        assert!(table.get("/orphan").is_none());
        assert!(table.get("/posts/draft").is_none());
    }

    #[test]
    fn test_home_alias_by_path_and_slug() {
        let by_path = discover(&registry(), Some("posts"));
        assert_eq!(by_path.get("/").unwrap().method, "list");

        let by_slug = discover(&registry(), Some("posts-id"));
        assert_eq!(by_slug.get("/").unwrap().method, "show");
    }

    #[test]
    fn test_no_home_alias_without_match() {
        assert!(discover(&registry(), None).get("/").is_none());
        assert!(discover(&registry(), Some("  ")).get("/").is_none());
        assert!(discover(&registry(), Some("nowhere")).get("/").is_none());
    }
}
