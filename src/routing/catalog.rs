//! Read-only view of the frozen route table.
//!
//! Handed to actions so they can build URLs (`get_route`) or list the admin
//! area (`get_admin_routes`) without holding the whole router.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;

use super::slug::SlugIndex;
use super::table::RouteTable;

/// Errors raised by reverse routing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("unknown route `{0}`")]
    UnknownRoute(String),
}

/// Parameter-free admin routes split by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminRoutes {
    /// Routes owned by module controllers.
    pub admin: BTreeSet<String>,
    /// Routes owned by core controllers.
    pub superadmin: BTreeSet<String>,
}

/// Whether `pattern` is `/admin` or lives below it.
fn is_admin_pattern(pattern: &str) -> bool {
    pattern
        .strip_prefix("/admin")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[derive(Debug, Clone)]
pub struct RouteCatalog {
    table: RouteTable,
    slugs: SlugIndex,
    root_url: String,
}

impl RouteCatalog {
    pub fn new(table: RouteTable, slugs: SlugIndex, root_url: impl Into<String>) -> Self {
        Self {
            table,
            slugs,
            root_url: root_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Slug → pattern index.
    pub fn get_slugs(&self) -> &SlugIndex {
        &self.slugs
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Build the URL of the route named `slug`.
    ///
    /// Placeholders with a matching entry in `params` are substituted; other
    /// entries are ignored and unmatched placeholders stay as written. An
    /// empty slug names the site root.
    pub fn get_route(
        &self,
        slug: &str,
        absolute: bool,
        params: Option<&HashMap<String, String>>,
    ) -> Result<String, RouteError> {
        let base = if absolute { self.root_url.as_str() } else { "" };
        if slug.is_empty() {
            return Ok(format!("{base}/"));
        }

        let pattern = self
            .slugs
            .pattern_for(slug)
            .ok_or_else(|| RouteError::UnknownRoute(slug.to_string()))?;

        let mut path = pattern.to_string();
        for (name, value) in params.into_iter().flatten() {
            path = path.replace(&format!("{{{name}}}"), value);
        }
        Ok(format!("{base}{path}"))
    }

    /// Admin routes that take no parameters, partitioned by owner and sorted
    /// by slug.
    pub fn get_admin_routes(&self) -> AdminRoutes {
        let mut routes = AdminRoutes::default();
        for (pattern, descriptor) in self.table.iter() {
            if !is_admin_pattern(pattern) || !descriptor.params.is_empty() {
                continue;
            }
            let bucket = if descriptor.is_core() {
                &mut routes.superadmin
            } else {
                &mut routes.admin
            };
            bucket.insert(descriptor.slug.clone());
        }
        routes
    }
}
