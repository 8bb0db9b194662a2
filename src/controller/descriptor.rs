//! Controller and action manifests.
//!
//! Controllers do not get scanned for annotations at runtime; they describe
//! themselves up front. Each action may carry a metadata block containing a
//! single-line `route <pattern>` tag, which is what discovery reads.

use crate::routing::pattern::placeholder_names;

/// Namespace holding the framework's own controllers.
pub const CORE_NAMESPACE: &str = "core";

/// Where a controller lives. Core controllers are scanned before modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Core,
    Module(String),
}

impl Namespace {
    pub fn module(name: impl Into<String>) -> Self {
        Self::Module(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Namespace::Core => CORE_NAMESPACE,
            Namespace::Module(name) => name,
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, Namespace::Core)
    }
}

/// Only concrete controllers contribute routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    Concrete,
    Abstract,
    Interface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// One action exposed by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub name: String,
    pub visibility: Visibility,
    /// Free-form metadata; may contain a `route <pattern>` line.
    pub metadata: Option<String>,
    /// Explicit parameter list. Defaults to the pattern's placeholders.
    pub params: Option<Vec<String>>,
}

impl ActionDescriptor {
    /// A public action with no metadata.
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            metadata: None,
            params: None,
        }
    }

    /// A non-public action; never routed.
    pub fn private(name: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::public(name)
        }
    }

    /// Attach a `route <pattern>` tag.
    pub fn route(mut self, pattern: &str) -> Self {
        self.metadata = Some(format!("route {pattern}"));
        self
    }

    /// Attach a raw metadata block.
    pub fn metadata(mut self, text: impl Into<String>) -> Self {
        self.metadata = Some(text.into());
        self
    }

    /// Declare the parameter order explicitly.
    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = Some(params.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// The declared route pattern, if the metadata carries one.
    pub fn route_pattern(&self) -> Option<&str> {
        self.metadata.as_deref()?.lines().find_map(parse_route_tag)
    }

    /// Parameter names for `pattern`, in invocation order.
    pub fn declared_params(&self, pattern: &str) -> Vec<String> {
        match &self.params {
            Some(params) => params.clone(),
            None => placeholder_names(pattern),
        }
    }
}

/// Parse one metadata line of the form `route /<pattern>` (an `@` prefix and
/// doc-comment decoration are tolerated). Prose after `route` is not a tag.
pub fn parse_route_tag(line: &str) -> Option<&str> {
    let line = line.trim().trim_start_matches(['/', '*']).trim_start();
    let rest = line.strip_prefix('@').unwrap_or(line).strip_prefix("route")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let pattern = rest.trim();
    pattern.starts_with('/').then_some(pattern)
}

/// A controller's self-description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescriptor {
    pub name: String,
    pub namespace: Namespace,
    pub kind: ControllerKind,
    pub actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            kind: ControllerKind::Concrete,
            actions: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: ControllerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    /// Identifier stored in route descriptors.
    pub fn target(&self) -> String {
        format!("{}::{}", self.namespace.as_str(), self.name)
    }

    pub fn is_concrete(&self) -> bool {
        self.kind == ControllerKind::Concrete
    }
}
