//! Action router library.
//!
//! Maps request paths onto controller actions declared with `route` tags,
//! persists the discovered table, resolves slugs back to URLs and guards the
//! admin area.

pub mod config;
pub mod controller;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::Router;
