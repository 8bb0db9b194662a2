//! Controller registry.
//!
//! # Responsibilities
//! - Hold the controller manifest in registration order
//! - Yield controllers in scan order (core namespace first, then modules)
//! - Resolve a route's target identifier to an instancing strategy
//!
//! # Design Decisions
//! - Filled once during startup, read-only afterwards (shared via Arc)
//! - Abstract/interface descriptors may be declared without an instance
//! - A second registration of the same target is ignored, the first one stays

use std::collections::HashMap;

use super::descriptor::ControllerDescriptor;
use super::Instancing;

/// A descriptor plus, for concrete controllers, how to obtain an instance.
#[derive(Debug, Clone)]
pub struct RegisteredController {
    pub descriptor: ControllerDescriptor,
    pub instancing: Option<Instancing>,
}

#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: Vec<RegisteredController>,
    by_target: HashMap<String, usize>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller together with its instancing strategy.
    pub fn register(&mut self, descriptor: ControllerDescriptor, instancing: Instancing) -> &mut Self {
        self.push(descriptor, Some(instancing))
    }

    /// Declare a controller that cannot be instantiated (abstract, interface,
    /// or simply not wired up). It is listed but never routed.
    pub fn declare(&mut self, descriptor: ControllerDescriptor) -> &mut Self {
        self.push(descriptor, None)
    }

    fn push(&mut self, descriptor: ControllerDescriptor, instancing: Option<Instancing>) -> &mut Self {
        let target = descriptor.target();
        if self.by_target.contains_key(&target) {
            tracing::warn!(target = %target, "Controller already registered, ignoring duplicate");
            return self;
        }
        self.by_target.insert(target, self.controllers.len());
        self.controllers.push(RegisteredController {
            descriptor,
            instancing,
        });
        self
    }

    /// Controllers in discovery order: core first, then modules, each group
    /// in registration order.
    pub fn scan_order(&self) -> impl Iterator<Item = &RegisteredController> {
        let core = self
            .controllers
            .iter()
            .filter(|c| c.descriptor.namespace.is_core());
        let modules = self
            .controllers
            .iter()
            .filter(|c| !c.descriptor.namespace.is_core());
        core.chain(modules)
    }

    /// Instancing strategy for a target identifier.
    pub fn resolve(&self, target: &str) -> Option<&Instancing> {
        self.by_target
            .get(target)
            .and_then(|&index| self.controllers[index].instancing.as_ref())
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
