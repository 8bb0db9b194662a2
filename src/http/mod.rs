//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (RequestContext from request parts)
//!     → routing::Router (gate, dispatch)
//!     → render.rs (error and login pages)
//!     → Send to client
//! ```

pub mod render;
pub mod request;
pub mod server;

pub use render::{PlainRenderer, TemplateRenderer};
pub use request::RequestContext;
pub use server::{AppState, HttpServer};
