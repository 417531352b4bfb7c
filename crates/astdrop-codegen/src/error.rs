#![forbid(unsafe_code)]

//! Error types for parsing and generation.

/// Failure while rendering an already-parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// A value that should be a node is not a JSON object.
    NotANode { found: &'static str },
    /// An object without a string `type` field.
    Untyped,
    /// The root node is neither a statement nor an expression.
    UnknownNodeType(String),
    /// A node appeared where a statement or expression was required.
    UnexpectedNode {
        context: &'static str,
        node_type: String,
    },
    /// A required field is absent (or `null`).
    MissingField {
        node_type: String,
        field: &'static str,
    },
    /// A field is present but holds a value the generator cannot render.
    InvalidValue {
        node_type: String,
        field: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANode { found } => write!(f, "expected an AST node object, found {found}"),
            Self::Untyped => write!(f, "AST node has no `type` field"),
            Self::UnknownNodeType(ty) => write!(f, "Unknown node type: {ty}"),
            Self::UnexpectedNode { context, node_type } => {
                write!(f, "Unknown {context} type: {node_type}")
            }
            Self::MissingField { node_type, field } => {
                write!(f, "{node_type} is missing required field `{field}`")
            }
            Self::InvalidValue {
                node_type,
                field,
                reason,
            } => write!(f, "{node_type}.{field}: {reason}"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Failure of [`json_to_code`](crate::json_to_code).
#[derive(Debug)]
pub enum CodegenError {
    /// The input is not well-formed JSON.
    Parse(serde_json::Error),
    /// The JSON parsed but does not describe a renderable tree.
    Generate(GenerateError),
}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Generate(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Generate(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<GenerateError> for CodegenError {
    fn from(err: GenerateError) -> Self {
        Self::Generate(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn display_matches_unknown_type_wording() {
        let err = GenerateError::UnexpectedNode {
            context: "statement",
            node_type: "Identifier".into(),
        };
        assert_eq!(err.to_string(), "Unknown statement type: Identifier");
    }

    #[test]
    fn parse_error_displays_bare_cause() {
        let err: CodegenError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("EOF"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
