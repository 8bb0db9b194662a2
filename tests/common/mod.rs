//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::to_bytes;
use axum::http::{HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use action_router::config::{AdminCredential, RouterConfig};
use action_router::controller::{
    ActionArgs, ActionContext, ActionDescriptor, ActionResult, Controller, ControllerDescriptor,
    ControllerKind, ControllerRegistry, Instancing, Namespace, UnknownAction,
};
use action_router::http::RequestContext;
use action_router::lifecycle::startup::build_services;
use action_router::routing::RouterServices;
use action_router::security::hash_password;

pub const ADMIN_USER: &str = "root";
pub const ADMIN_PASSWORD: &str = "s3cret";

/// Blog posts; one shared instance counts its calls.
#[derive(Default)]
pub struct Posts {
    hits: AtomicUsize,
}

impl Posts {
    fn descriptor() -> ControllerDescriptor {
        ControllerDescriptor::new(Namespace::module("blog"), "Posts")
            .action(ActionDescriptor::public("index").route("/posts"))
            .action(ActionDescriptor::public("latest").route("/posts/latest"))
            .action(ActionDescriptor::public("hits").route("/posts/hits"))
            .action(ActionDescriptor::public("show").route("/users/{id}/posts/{postId}"))
            .action(ActionDescriptor::public("by_slug").route("/posts/{slug}"))
            .action(ActionDescriptor::public("explode").route("/explode"))
            .action(ActionDescriptor::public("reports").route("/reports"))
            .action(ActionDescriptor::public("archive").route("/archive/"))
            .action(ActionDescriptor::private("draft").route("/drafts"))
    }
}

impl Controller for Posts {
    fn invoke(&self, action: &str, _cx: &ActionContext<'_>, args: ActionArgs) -> ActionResult {
        let body = match action {
            "index" => "posts index".to_string(),
            "latest" => "latest".to_string(),
            "hits" => (self.hits.fetch_add(1, Ordering::SeqCst) + 1).to_string(),
            "show" => format!("user {} post {}", args.require(0)?, args.require(1)?),
            "by_slug" => format!("post {}", args.require(0)?),
            "explode" => return Err(std::io::Error::other("boom").into()),
            "reports" => "reports".to_string(),
            "archive" => "archive".to_string(),
            other => return Err(UnknownAction(other.to_string()).into()),
        };
        Ok(body.into_response())
    }
}

/// Admin pages of the blog module.
pub struct BlogAdmin;

impl Controller for BlogAdmin {
    fn invoke(&self, action: &str, _cx: &ActionContext<'_>, args: ActionArgs) -> ActionResult {
        match action {
            "index" => Ok("blog admin".into_response()),
            "edit" => Ok(format!("edit {}", args.require(0)?).into_response()),
            other => Err(UnknownAction(other.to_string()).into()),
        }
    }
}

/// Built fresh for every call; reports which instance served it.
pub struct Widgets {
    id: usize,
}

impl Controller for Widgets {
    fn invoke(&self, _action: &str, _cx: &ActionContext<'_>, _args: ActionArgs) -> ActionResult {
        Ok(format!("instance {}", self.id).into_response())
    }
}

/// Register the blog and shop modules. `built` counts `Widgets` instances.
pub fn register_modules(registry: &mut ControllerRegistry, built: Arc<AtomicUsize>) {
    registry
        .register(Posts::descriptor(), Instancing::shared(Posts::default()))
        .register(
            ControllerDescriptor::new(Namespace::module("blog"), "BlogAdmin")
                .action(ActionDescriptor::public("index").route("/admin/blog"))
                .action(ActionDescriptor::public("edit").route("/admin/blog/{id}")),
            Instancing::shared(BlogAdmin),
        )
        .register(
            ControllerDescriptor::new(Namespace::module("shop"), "Widgets")
                .action(ActionDescriptor::public("index").route("/widgets")),
            Instancing::per_call(move || Widgets {
                id: built.fetch_add(1, Ordering::SeqCst) + 1,
            }),
        )
        .declare(
            ControllerDescriptor::new(Namespace::module("shop"), "BaseController")
                .kind(ControllerKind::Abstract)
                .action(ActionDescriptor::public("index").route("/base")),
        );
}

/// Config with the route cache inside `dir` and one configured admin.
pub fn test_config(dir: &Path) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.routing.cache_path = dir.join("urls.json");
    config.routing.home_action = Some("posts".into());
    config.security.admins = vec![AdminCredential {
        username: ADMIN_USER.into(),
        password_hash: hash_password(ADMIN_USER, ADMIN_PASSWORD),
    }];
    config
}

/// Built-in controllers plus the test modules.
pub fn services(config: &RouterConfig) -> (RouterServices, Arc<AtomicUsize>) {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let services = build_services(config, move |registry| register_modules(registry, counter));
    (services, built)
}

/// Services with only the built-in controllers.
pub fn builtin_services(config: &RouterConfig) -> RouterServices {
    build_services(config, |_| {})
}

pub fn get(path: &str) -> RequestContext {
    RequestContext::new(Method::GET, path)
}

pub fn basic_auth(username: &str, password: &str) -> HeaderValue {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    HeaderValue::from_str(&format!("Basic {encoded}")).unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
