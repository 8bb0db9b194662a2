//! Built-in core controllers.
//!
//! - `core::Admin` (shared): admin route listing, full route table, login page
//! - `core::Setup` (per call): first-run page for configuring administrators
//! - `core::Status` (shared): liveness summary

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::descriptor::{ActionDescriptor, ControllerDescriptor, Namespace};
use super::registry::ControllerRegistry;
use super::{ActionArgs, ActionContext, ActionResult, Controller, Instancing, UnknownAction};
use crate::config::RouterConfig;
use crate::http::render::{TemplateRenderer, LOGIN_VIEW};

/// Register every built-in controller.
pub fn register(registry: &mut ControllerRegistry, config: &RouterConfig, renderer: Arc<dyn TemplateRenderer>) {
    let admin_count = config.security.admins.len();

    registry
        .register(AdminController::descriptor(), Instancing::shared(AdminController { renderer }))
        .register(
            SetupController::descriptor(),
            Instancing::per_call(move || SetupController { admin_count }),
        )
        .register(StatusController::descriptor(), Instancing::shared(StatusController));
}

#[derive(Serialize)]
struct RouteEntry<'a> {
    pattern: &'a str,
    slug: &'a str,
    target: &'a str,
    method: &'a str,
    params: &'a [String],
}

pub struct AdminController {
    renderer: Arc<dyn TemplateRenderer>,
}

impl AdminController {
    pub fn descriptor() -> ControllerDescriptor {
        ControllerDescriptor::new(Namespace::Core, "Admin")
            .action(ActionDescriptor::public("index").metadata("Admin landing page\n@route /admin"))
            .action(ActionDescriptor::public("routes").route("/admin/routes"))
            .action(ActionDescriptor::public("login").route("/admin/login").params(["route"]))
    }

    fn login(&self, args: &ActionArgs) -> ActionResult {
        let requested = args.get(0).unwrap_or("/admin");
        let page = self.renderer.render(
            LOGIN_VIEW,
            &json!({
                "title": "Sign in",
                "message": "Administrator credentials are required",
                "route": requested,
            }),
        );
        Ok((
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"Admin\"")],
            Html(page),
        )
            .into_response())
    }
}

impl Controller for AdminController {
    fn invoke(&self, action: &str, cx: &ActionContext<'_>, args: ActionArgs) -> ActionResult {
        match action {
            "index" => Ok(Json(cx.routes.get_admin_routes()).into_response()),
            "routes" => {
                let entries: Vec<RouteEntry<'_>> = cx
                    .routes
                    .table()
                    .iter()
                    .map(|(pattern, d)| RouteEntry {
                        pattern,
                        slug: &d.slug,
                        target: &d.target,
                        method: &d.method,
                        params: &d.params,
                    })
                    .collect();
                Ok(Json(entries).into_response())
            }
            "login" => self.login(&args),
            other => Err(UnknownAction(other.to_string()).into()),
        }
    }
}

pub struct SetupController {
    admin_count: usize,
}

impl SetupController {
    pub fn descriptor() -> ControllerDescriptor {
        ControllerDescriptor::new(Namespace::Core, "Setup")
            .action(ActionDescriptor::public("index").route("/setup-admin"))
    }
}

impl Controller for SetupController {
    fn invoke(&self, action: &str, _cx: &ActionContext<'_>, _args: ActionArgs) -> ActionResult {
        if action != "index" {
            return Err(UnknownAction(action.to_string()).into());
        }
        let hint = if self.admin_count == 0 {
            "No administrators configured. Generate a hash with `route-cli hash-password <user> <password>` and add it under [[security.admins]]."
        } else {
            "Administrators are configured."
        };
        Ok(Json(json!({
            "admins_configured": self.admin_count,
            "hint": hint,
        }))
        .into_response())
    }
}

pub struct StatusController;

impl StatusController {
    pub fn descriptor() -> ControllerDescriptor {
        ControllerDescriptor::new(Namespace::Core, "Status")
            .action(ActionDescriptor::public("index").route("/status"))
    }
}

impl Controller for StatusController {
    fn invoke(&self, action: &str, cx: &ActionContext<'_>, _args: ActionArgs) -> ActionResult {
        match action {
            "index" => Ok(Json(json!({
                "version": env!("CARGO_PKG_VERSION"),
                "status": "operational",
                "routes": cx.routes.table().len(),
            }))
            .into_response()),
            other => Err(UnknownAction(other.to_string()).into()),
        }
    }
}
