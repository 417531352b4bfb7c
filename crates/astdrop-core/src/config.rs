#![forbid(unsafe_code)]

//! Widget configuration.
//!
//! Every field has a default, so hosts may pass a partial JSON object:
//!
//! ```
//! use astdrop_core::config::PasteDropConfig;
//!
//! let config = PasteDropConfig::from_json(r#"{"dragLeaveDelayMs": 80}"#).unwrap();
//! assert_eq!(config.drag_leave_delay_ms, 80);
//! assert_eq!(config.indent, "  ");
//! ```

use core::time::Duration;

use astdrop_codegen::{GenerateOptions, QuoteStyle};
use serde::{Deserialize, Serialize};

use crate::category::CategoryDescriptor;

/// Delay before a `dragleave` releases the drag indicator.
pub const DEFAULT_DRAG_LEAVE_DELAY_MS: u64 = 50;

/// Configuration for a [`PasteDropTarget`](crate::ingest::PasteDropTarget).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasteDropConfig {
    /// Quiet period after `dragleave` before dragging ends.
    /// Default: 50ms
    pub drag_leave_delay_ms: u64,

    /// One indentation level of converted source.
    /// Default: two spaces
    pub indent: String,

    /// Quote style of string literals in converted source.
    pub quotes: QuoteStyle,

    /// Node names (compared case-insensitively) of free-text inputs. A failed
    /// paste into one of these is left to the input as ordinary text.
    /// Default: `["TEXTAREA"]`
    pub text_input_nodes: Vec<String>,

    /// Extra catalog entries layered over the built-in categories.
    pub categories: Vec<CategoryDescriptor>,
}

impl Default for PasteDropConfig {
    fn default() -> Self {
        Self {
            drag_leave_delay_ms: DEFAULT_DRAG_LEAVE_DELAY_MS,
            indent: "  ".to_string(),
            quotes: QuoteStyle::Single,
            text_input_nodes: vec!["TEXTAREA".to_string()],
            categories: Vec::new(),
        }
    }
}

impl PasteDropConfig {
    /// Parse a (possibly partial) JSON options object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bad) = self.indent.chars().find(|c| !matches!(c, ' ' | '\t')) {
            return Err(ConfigError::InvalidIndent(bad));
        }
        if let Some(empty) = self.categories.iter().find(|c| c.id.is_empty()) {
            return Err(ConfigError::EmptyCategoryId {
                mime_types: empty.mime_types.clone(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn drag_leave_delay(&self) -> Duration {
        Duration::from_millis(self.drag_leave_delay_ms)
    }

    /// Code generation options derived from this config.
    #[must_use]
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions::default()
            .with_indent(self.indent.clone())
            .with_quotes(self.quotes)
    }

    /// Whether `node_name` names a free-text input surface.
    #[must_use]
    pub fn is_text_input(&self, node_name: &str) -> bool {
        self.text_input_nodes
            .iter()
            .any(|n| n.eq_ignore_ascii_case(node_name))
    }
}

/// Invalid configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The options are not valid JSON or have the wrong shape.
    Json(serde_json::Error),
    /// The indent unit contains something other than spaces and tabs.
    InvalidIndent(char),
    /// A catalog entry has an empty id.
    EmptyCategoryId { mime_types: Vec<String> },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid options: {err}"),
            Self::InvalidIndent(c) => write!(f, "indent may only contain spaces and tabs, found {c:?}"),
            Self::EmptyCategoryId { mime_types } => {
                write!(f, "category with empty id (mime types: {})", mime_types.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = PasteDropConfig::default();
        assert_eq!(config.drag_leave_delay(), Duration::from_millis(50));
        assert_eq!(config.generate_options(), GenerateOptions::default());
        assert!(config.is_text_input("TEXTAREA"));
        assert!(config.is_text_input("textarea"));
        assert!(!config.is_text_input("INPUT"));
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(PasteDropConfig::from_json("{}").unwrap(), PasteDropConfig::default());
    }

    #[test]
    fn full_options() {
        let config = PasteDropConfig::from_json(
            r#"{
                "dragLeaveDelayMs": 0,
                "indent": "\t",
                "quotes": "double",
                "textInputNodes": ["TEXTAREA", "INPUT"],
                "categories": [{"id": "custom", "mimeTypes": ["text/x-custom"]}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.drag_leave_delay(), Duration::ZERO);
        assert_eq!(config.generate_options().quotes, QuoteStyle::Double);
        assert!(config.is_text_input("input"));
        assert_eq!(config.categories[0].id, "custom");
    }

    #[test]
    fn rejects_bad_json() {
        let err = PasteDropConfig::from_json("{").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
        let err = PasteDropConfig::from_json(r#"{"dragLeaveDelayMs": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn rejects_non_whitespace_indent() {
        let err = PasteDropConfig::from_json(r#"{"indent": "--"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIndent('-')));
    }

    #[test]
    fn rejects_empty_category_id() {
        let err = PasteDropConfig::from_json(r#"{"categories": [{"id": "", "mimeTypes": ["a/b"]}]}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "category with empty id (mime types: a/b)");
    }
}
