#![forbid(unsafe_code)]

//! Output formatting options.

use serde::{Deserialize, Serialize};

/// Quote character used for string literals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
    /// Whichever quote needs fewer escapes; single on a tie.
    Auto,
}

/// Formatting knobs for [`generate`](crate::generate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// One level of indentation.
    pub indent: String,
    pub quotes: QuoteStyle,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            quotes: QuoteStyle::Single,
        }
    }
}

impl GenerateOptions {
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn with_quotes(mut self, quotes: QuoteStyle) -> Self {
        self.quotes = quotes;
        self
    }
}
