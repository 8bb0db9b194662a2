//! Slugs for reverse routing.
//!
//! Every route gets a URL-safe identifier derived from its pattern
//! (`/users/{id}` → `users-id`). The index maps slugs back to patterns so
//! callers can build URLs without hard-coding paths.

use std::collections::HashMap;

use super::table::RouteTable;

/// Slug used when a text has no alphanumeric characters at all.
pub const FALLBACK_SLUG: &str = "n-a";

/// Derive a lowercase ASCII slug from `text`.
///
/// Non-ASCII letters are transliterated, every run of other characters
/// becomes a single `-`, and leading/trailing dashes are dropped.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_ascii_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Reverse mapping of slug → pattern.
#[derive(Debug, Clone, Default)]
pub struct SlugIndex {
    by_slug: HashMap<String, String>,
}

impl SlugIndex {
    /// Assign a slug to every descriptor in `table` and index them.
    ///
    /// Colliding slugs resolve to the pattern declared last.
    pub fn build(table: &mut RouteTable) -> Self {
        let mut by_slug = HashMap::with_capacity(table.len());
        for (pattern, descriptor) in table.iter_mut() {
            let slug = slugify(pattern);
            by_slug.insert(slug.clone(), pattern.to_string());
            descriptor.slug = slug;
        }
        Self { by_slug }
    }

    pub fn pattern_for(&self, slug: &str) -> Option<&str> {
        self.by_slug.get(slug).map(String::as_str)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    /// All slug → pattern pairs.
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.by_slug
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}
