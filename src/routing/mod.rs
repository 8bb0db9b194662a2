//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     cache.rs (snapshot present and not debug?) ──yes──▶ RouteTable
//!         │ no
//!         ▼
//!     discovery.rs (controller manifest → RouteTable, home alias)
//!         → cache.rs (atomic write)
//!     slug.rs (assign slugs, build reverse index)
//!     dispatcher.rs (compile every pattern once)
//!
//! Per request:
//!     router.rs → security gate → dispatcher.rs (first match wins)
//!         → controller action | 404 | 401 challenge
//! ```
//!
//! # Design Decisions
//! - Tables are built once and frozen; reloads replace the whole router
//! - Declaration order is dispatch order
//! - Patterns compile to anchored, case-insensitive expressions

pub mod cache;
pub mod catalog;
pub mod discovery;
pub mod dispatcher;
pub mod pattern;
pub mod router;
pub mod slug;
pub mod table;

pub use cache::{load_routes, LoadedRoutes, PersistenceError, RouteCache, TableSource};
pub use catalog::{AdminRoutes, RouteCatalog, RouteError};
pub use dispatcher::{DispatchError, Dispatcher};
pub use pattern::{CompiledPattern, PathParams, PatternError};
pub use router::{RouteOutcome, Router, RouterServices};
pub use slug::{slugify, SlugIndex};
pub use table::{RouteDescriptor, RouteTable};
