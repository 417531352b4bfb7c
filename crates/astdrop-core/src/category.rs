#![forbid(unsafe_code)]

//! MIME type → category classification.
//!
//! A registry is built once from two base entries (`application/json` and
//! `text/plain`) followed by a catalog of parser categories, each contributing
//! its MIME aliases. A later entry for the same MIME type replaces an earlier
//! one. The registry is immutable after construction.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::logging::debug;

/// Category of content declared as serialized AST JSON.
pub const JSON: &str = "JSON";
/// Category of freeform text that may hold serialized AST JSON.
pub const TEXT: &str = "TEXT";
/// Category reported for any successfully converted drop.
pub const JAVASCRIPT: &str = "javascript";

/// One catalog entry: a category id and the MIME types that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDescriptor {
    pub id: String,
    #[serde(default)]
    pub mime_types: Vec<String>,
}

impl CategoryDescriptor {
    pub fn new(id: impl Into<String>, mime_types: &[&str]) -> Self {
        Self {
            id: id.into(),
            mime_types: mime_types.iter().map(|m| (*m).to_string()).collect(),
        }
    }
}

const BUILTIN: &[(&str, &[&str])] = &[
    ("javascript", &["text/javascript", "application/javascript"]),
    ("css", &["text/css"]),
    ("go", &["text/x-go"]),
    ("graphql", &["application/graphql"]),
    ("handlebars", &["text/x-handlebars-template"]),
    ("html", &["text/html"]),
    ("icu", &["text/x-icu"]),
    ("java", &["text/x-java"]),
    ("lua", &["text/x-lua"]),
    ("markdown", &["text/markdown", "text/x-markdown"]),
    ("php", &["text/x-php", "application/x-httpd-php"]),
    ("python", &["text/x-python"]),
    ("regexp", &["text/x-regexp"]),
    ("rust", &["text/rust", "text/x-rustsrc"]),
    ("scala", &["text/x-scala"]),
    ("sql", &["text/x-sql"]),
    ("svelte", &["text/x-svelte"]),
    ("vue", &["text/x-vue"]),
    ("webidl", &["text/x-webidl"]),
    ("yaml", &["text/x-yaml", "application/x-yaml"]),
];

/// Parser categories known to the widget out of the box.
pub fn builtin_catalog() -> Vec<CategoryDescriptor> {
    BUILTIN
        .iter()
        .map(|(id, mimes)| CategoryDescriptor::new(*id, mimes))
        .collect()
}

/// Immutable MIME type → category id map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    entries: HashMap<String, String>,
}

impl CategoryRegistry {
    /// Base entries followed by `catalog`, last write wins.
    pub fn with_catalog<I>(catalog: I) -> Self
    where
        I: IntoIterator<Item = CategoryDescriptor>,
    {
        let mut entries = HashMap::new();
        entries.insert("application/json".to_string(), JSON.to_string());
        entries.insert("text/plain".to_string(), TEXT.to_string());
        for descriptor in catalog {
            for mime in descriptor.mime_types {
                entries.insert(mime, descriptor.id.clone());
            }
        }
        debug!(entries = entries.len(), "category registry built");
        Self { entries }
    }

    /// A copy of `self` extended with `catalog`, last write wins.
    #[must_use]
    pub fn extended<I>(&self, catalog: I) -> Self
    where
        I: IntoIterator<Item = CategoryDescriptor>,
    {
        let mut entries = self.entries.clone();
        for descriptor in catalog {
            for mime in descriptor.mime_types {
                entries.insert(mime, descriptor.id.clone());
            }
        }
        Self { entries }
    }

    /// The process-wide registry over [`builtin_catalog`], built on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<CategoryRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::with_catalog(builtin_catalog()))
    }

    /// Category for an exact MIME type.
    #[must_use]
    pub fn classify(&self, mime_type: &str) -> Option<&str> {
        self.entries.get(mime_type).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(mime_type, category)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_catalog(std::iter::empty())
    }
}

/// True for the categories whose content is run through the converter.
#[must_use]
pub fn is_convertible(category: &str) -> bool {
    category == JSON || category == TEXT
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn base_entries_only() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.classify("application/json"), Some(JSON));
        assert_eq!(registry.classify("text/plain"), Some(TEXT));
        assert_eq!(registry.classify("image/png"), None);
        assert_eq!(registry.classify(""), None);
    }

    #[test]
    fn catalog_aliases_share_a_category() {
        let registry = CategoryRegistry::with_catalog([CategoryDescriptor::new(
            "yaml",
            &["text/x-yaml", "application/x-yaml"],
        )]);
        assert_eq!(registry.classify("text/x-yaml"), Some("yaml"));
        assert_eq!(registry.classify("application/x-yaml"), Some("yaml"));
    }

    #[test]
    fn later_entries_win() {
        let registry = CategoryRegistry::with_catalog([
            CategoryDescriptor::new("first", &["text/x-a"]),
            CategoryDescriptor::new("second", &["text/x-a"]),
            CategoryDescriptor::new("override", &["text/plain"]),
        ]);
        assert_eq!(registry.classify("text/x-a"), Some("second"));
        assert_eq!(registry.classify("text/plain"), Some("override"));

        let mut keys: Vec<&str> = registry.iter().map(|(mime, _)| mime).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["application/json", "text/plain", "text/x-a"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn classification_is_case_sensitive() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.classify("Application/JSON"), None);
    }

    #[test]
    fn global_contains_builtin_catalog() {
        let global = CategoryRegistry::global();
        assert_eq!(global.classify("text/css"), Some("css"));
        assert_eq!(global.classify("application/json"), Some(JSON));
        assert!(std::ptr::eq(global, CategoryRegistry::global()));
    }

    #[test]
    fn extended_keeps_existing_entries() {
        let extended = CategoryRegistry::global()
            .extended([CategoryDescriptor::new("custom", &["text/x-custom", "text/css"])]);
        assert_eq!(extended.classify("text/x-custom"), Some("custom"));
        assert_eq!(extended.classify("text/css"), Some("custom"));
        assert_eq!(extended.classify("text/html"), Some("html"));
    }

    #[test]
    fn descriptor_deserializes_from_catalog_json() {
        let d: CategoryDescriptor =
            serde_json::from_str(r#"{"id": "css", "mimeTypes": ["text/css"]}"#).unwrap();
        assert_eq!(d, CategoryDescriptor::new("css", &["text/css"]));
        let bare: CategoryDescriptor = serde_json::from_str(r#"{"id": "none"}"#).unwrap();
        assert!(bare.mime_types.is_empty());
    }

    #[test]
    fn only_json_and_text_convert() {
        assert!(is_convertible(JSON));
        assert!(is_convertible(TEXT));
        assert!(!is_convertible(JAVASCRIPT));
        assert!(!is_convertible("css"));
    }
}
