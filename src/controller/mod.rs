//! Controllers and their registration manifest.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ControllerDescriptor (actions + route tags) + Instancing
//!     → registry.rs (ordered manifest: core first, then modules)
//!     → routing::discovery (builds the RouteTable)
//!
//! Per request:
//!     Dispatcher finds a route → registry resolves its target
//!     → Instancing::Shared reuses one instance / PerCall builds a fresh one
//!     → Controller::invoke(action, cx, args)
//! ```
//!
//! # Design Decisions
//! - Explicit manifest instead of runtime introspection
//! - Shared vs. per-call instantiation is declared, never inferred
//! - Action errors are boxed and handed back untouched

pub mod builtin;
pub mod descriptor;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use axum::response::Response;
use thiserror::Error;

use crate::http::request::RequestContext;
use crate::routing::catalog::RouteCatalog;

pub use descriptor::{
    ActionDescriptor, ControllerDescriptor, ControllerKind, Namespace, Visibility, CORE_NAMESPACE,
};
pub use registry::{ControllerRegistry, RegisteredController};

/// Error raised by an action. Propagated to the caller as-is.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

pub type ActionResult = Result<Response, ActionError>;

/// What an action sees besides its positional arguments.
pub struct ActionContext<'a> {
    pub request: &'a RequestContext,
    pub routes: &'a RouteCatalog,
}

/// Positional action arguments, in the route's declared parameter order.
///
/// A slot is `None` when the matched path did not capture that name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionArgs {
    values: Vec<Option<String>>,
}

/// An action required an argument the route did not supply.
#[derive(Debug, Error)]
#[error("missing argument at position {0}")]
pub struct MissingArgument(pub usize);

impl ActionArgs {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index)?.as_deref()
    }

    /// Like `get`, but a missing value is an action error.
    pub fn require(&self, index: usize) -> Result<&str, ActionError> {
        self.get(index).ok_or_else(|| MissingArgument(index).into())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<String>> for ActionArgs {
    fn from(values: Vec<String>) -> Self {
        Self::new(values.into_iter().map(Some).collect())
    }
}

/// A routable controller.
pub trait Controller: Send + Sync {
    /// Run `action` with positional `args`.
    fn invoke(&self, action: &str, cx: &ActionContext<'_>, args: ActionArgs) -> ActionResult;
}

/// Error for an action name the controller does not implement.
#[derive(Debug, Error)]
#[error("controller has no action `{0}`")]
pub struct UnknownAction(pub String);

type ControllerFactory = dyn Fn() -> Box<dyn Controller> + Send + Sync;

/// How a controller instance is obtained for each call.
#[derive(Clone)]
pub enum Instancing {
    /// One instance shared by every request.
    Shared(Arc<dyn Controller>),
    /// A fresh instance per call.
    PerCall(Arc<ControllerFactory>),
}

impl Instancing {
    pub fn shared<C: Controller + 'static>(controller: C) -> Self {
        Self::Shared(Arc::new(controller))
    }

    pub fn per_call<F, C>(factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        Self::PerCall(Arc::new(move || Box::new(factory()) as Box<dyn Controller>))
    }

    /// Resolve an instance and invoke `action` on it.
    pub fn invoke(&self, action: &str, cx: &ActionContext<'_>, args: ActionArgs) -> ActionResult {
        match self {
            Instancing::Shared(controller) => controller.invoke(action, cx, args),
            Instancing::PerCall(factory) => factory().invoke(action, cx, args),
        }
    }
}

impl fmt::Debug for Instancing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instancing::Shared(_) => f.write_str("Instancing::Shared"),
            Instancing::PerCall(_) => f.write_str("Instancing::PerCall"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_args_positions() {
        let args = ActionArgs::new(vec![Some("42".into()), None]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("42"));
        assert_eq!(args.get(1), None);
        assert_eq!(args.get(5), None);
        assert!(args.require(0).is_ok());

        let err = args.require(1).unwrap_err();
        assert!(err.downcast_ref::<MissingArgument>().is_some());
    }
}
