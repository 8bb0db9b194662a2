//! The ordered route table.
//!
//! # Design Decisions
//! - Insertion order is dispatch order; the first declaration of a pattern wins
//! - Serialized as a flat JSON object keyed by pattern, key order preserved
//! - Frozen once built; invalidation means building a fresh table

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::controller::CORE_NAMESPACE;

/// Everything the router knows about one declared pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Controller identifier, `<namespace>::<Controller>`.
    pub target: String,
    /// Action invoked on the controller.
    pub method: String,
    /// Declared parameter names; arguments are passed in this order.
    #[serde(default)]
    pub params: Vec<String>,
    /// Reverse-routing identifier. Assigned by the slug index.
    #[serde(default)]
    pub slug: String,
}

impl RouteDescriptor {
    pub fn new(target: impl Into<String>, method: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            params,
            slug: String::new(),
        }
    }

    /// Whether the owning controller lives in the core namespace.
    pub fn is_core(&self) -> bool {
        self.target
            .strip_prefix(CORE_NAMESPACE)
            .is_some_and(|rest| rest.starts_with("::"))
    }
}

/// Ordered mapping of pattern to descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<(String, RouteDescriptor)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Returns false and keeps the existing entry if the
    /// pattern is already declared.
    pub fn insert(&mut self, pattern: impl Into<String>, descriptor: RouteDescriptor) -> bool {
        let pattern = pattern.into();
        if self.get(&pattern).is_some() {
            return false;
        }
        self.routes.push((pattern, descriptor));
        true
    }

    /// Point `pattern` at `descriptor`, replacing an existing entry in place.
    pub fn alias(&mut self, pattern: impl Into<String>, descriptor: RouteDescriptor) {
        let pattern = pattern.into();
        match self.routes.iter_mut().find(|(p, _)| *p == pattern) {
            Some(entry) => entry.1 = descriptor,
            None => self.routes.push((pattern, descriptor)),
        }
    }

    pub fn get(&self, pattern: &str) -> Option<&RouteDescriptor> {
        self.routes
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, d)| d)
    }

    /// Routes in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteDescriptor)> {
        self.routes.iter().map(|(p, d)| (p.as_str(), d))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut RouteDescriptor)> {
        self.routes.iter_mut().map(|(p, d)| (p.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.routes.len()))?;
        for (pattern, descriptor) in &self.routes {
            map.serialize_entry(pattern, descriptor)?;
        }
        map.end()
    }
}

struct RouteTableVisitor;

impl<'de> Visitor<'de> for RouteTableVisitor {
    type Value = RouteTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of route pattern to descriptor")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = RouteTable::new();
        while let Some((pattern, descriptor)) = access.next_entry::<String, RouteDescriptor>()? {
            table.insert(pattern, descriptor);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for RouteTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RouteTableVisitor)
    }
}
