//! Route pattern compilation.
//!
//! # Responsibilities
//! - Turn a declared template (`/users/{id}`) into an anchored matcher
//! - Keep placeholder names in declaration order
//! - Re-associate captured values with their names by position
//!
//! # Design Decisions
//! - A placeholder occupies exactly one full path segment; `{id}.json` is literal text
//! - Literal segments are escaped, so `.` or `+` in a pattern never act as regex syntax
//! - Matching is case-insensitive and anchored at both ends
//! - Matching is exact; the trailing-slash retry belongs to the dispatcher's
//!   whole-table scan

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Expression substituted for a `{name}` segment.
const PLACEHOLDER_EXPR: &str = "([^/]+)";

/// Errors raised while compiling a declared pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The generated expression was rejected by the regex engine.
    #[error("invalid route pattern `{pattern}`: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Returns the placeholder name if `segment` is exactly `{name}`.
fn placeholder_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix('{')?.strip_suffix('}')?;
    if name.is_empty() || name.contains(['{', '}']) {
        return None;
    }
    Some(name)
}

/// Ordered placeholder names declared in `pattern`.
pub fn placeholder_names(pattern: &str) -> Vec<String> {
    pattern
        .split('/')
        .filter_map(placeholder_name)
        .map(str::to_string)
        .collect()
}

/// Values captured from a concrete path, keyed by placeholder name.
///
/// Entries keep the order in which names were first declared. A name that
/// appears twice in a pattern holds the value of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    fn insert(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    /// Captured value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A declared pattern compiled into a whole-path matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    regex: Regex,
    /// Placeholder names; index `i` is capture group `i + 1`.
    placeholders: Vec<String>,
}

impl CompiledPattern {
    /// Compile a declared pattern.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut placeholders = Vec::new();
        let expr = pattern
            .split('/')
            .map(|segment| match placeholder_name(segment) {
                Some(name) => {
                    placeholders.push(name.to_string());
                    PLACEHOLDER_EXPR.to_string()
                }
                None => regex::escape(segment),
            })
            .collect::<Vec<_>>()
            .join("/");

        let regex = RegexBuilder::new(&format!("^{expr}$"))
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Invalid {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            placeholders,
        })
    }

    /// The pattern as declared.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Placeholder names in declaration order (repeats included).
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// Match `path` in full and extract placeholder values.
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let mut params = PathParams::default();
        for (index, name) in self.placeholders.iter().enumerate() {
            if let Some(value) = caps.get(index + 1) {
                params.insert(name, value.as_str());
            }
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_params_in_declared_order() {
        let pattern = CompiledPattern::compile("/users/{id}/posts/{postId}").unwrap();
        assert_eq!(pattern.placeholders(), ["id", "postId"]);

        let params = pattern.captures("/users/42/posts/7").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("postId"), Some("7"));
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("id", "42"), ("postId", "7")]
        );
    }

    #[test]
    fn test_literal_pattern_matches_whole_path_only() {
        let pattern = CompiledPattern::compile("/admin/routes").unwrap();
        assert!(pattern.matches("/admin/routes"));
        assert!(!pattern.matches("/admin/routes/extra"));
        assert!(!pattern.matches("/prefix/admin/routes"));
        assert!(pattern.captures("/admin/routes").unwrap().is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let pattern = CompiledPattern::compile("/Admin/Config").unwrap();
        assert!(pattern.matches("/admin/config"));
        assert!(pattern.matches("/ADMIN/CONFIG"));
    }

    #[test]
    fn test_literal_metacharacters_are_escaped() {
        let pattern = CompiledPattern::compile("/v1.0/items+(all)").unwrap();
        assert!(pattern.matches("/v1.0/items+(all)"));
        assert!(!pattern.matches("/v1x0/items+(all)"));
        assert!(!pattern.matches("/v1.0/itemsss(all)"));
    }

    #[test]
    fn test_placeholder_spans_a_single_segment() {
        let pattern = CompiledPattern::compile("/files/{name}").unwrap();
        assert!(pattern.matches("/files/report"));
        assert!(!pattern.matches("/files/a/b"));
        assert!(!pattern.matches("/files/"));
    }

    #[test]
    fn test_embedded_braces_are_literal() {
        let pattern = CompiledPattern::compile("/files/{name}.json").unwrap();
        assert!(pattern.placeholders().is_empty());
        assert!(pattern.matches("/files/{name}.json"));
        assert!(!pattern.matches("/files/report.json"));
    }

    #[test]
    fn test_repeated_name_keeps_last_value() {
        let pattern = CompiledPattern::compile("/{id}/copy/{id}").unwrap();
        let params = pattern.captures("/a/copy/b").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("b"));
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let pattern = CompiledPattern::compile("/reports").unwrap();
        assert!(!pattern.matches("/reports/"));
    }

    #[test]
    fn test_trailing_slash_on_pattern_is_not_optional() {
        let pattern = CompiledPattern::compile("/reports/").unwrap();
        assert!(pattern.matches("/reports/"));
        assert!(!pattern.matches("/reports"));
    }

    #[test]
    fn test_placeholder_names_helper() {
        assert_eq!(
            placeholder_names("/shop/{category}/{item}"),
            vec!["category".to_string(), "item".to_string()]
        );
        assert!(placeholder_names("/about").is_empty());
        assert!(placeholder_names("/x/{}").is_empty());
    }
}
