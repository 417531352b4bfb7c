#![forbid(unsafe_code)]

//! Serialized AST → source text conversion contract.

use astdrop_codegen::{CodegenError, GenerateOptions, json_to_code};

/// Why a payload could not be converted.
///
/// Both variants display as the bare cause; callers prepend their own context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The payload is not well-formed serialized data.
    Parse(String),
    /// The payload parsed but cannot be rendered as source text.
    Generation(String),
}

impl ConvertError {
    /// The cause message without the variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Parse(msg) | Self::Generation(msg) => msg,
        }
    }
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ConvertError {}

impl From<CodegenError> for ConvertError {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::Parse(e) => Self::Parse(e.to_string()),
            CodegenError::Generate(e) => Self::Generation(e.to_string()),
        }
    }
}

/// Atomic conversion of a serialized AST into formatted source.
pub trait AstConverter {
    fn convert(&self, serialized: &str) -> Result<String, ConvertError>;
}

impl<F> AstConverter for F
where
    F: Fn(&str) -> Result<String, ConvertError>,
{
    fn convert(&self, serialized: &str) -> Result<String, ConvertError> {
        self(serialized)
    }
}

/// ESTree JSON → JavaScript via `astdrop-codegen`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstreeConverter {
    options: GenerateOptions,
}

impl EstreeConverter {
    #[must_use]
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }
}

impl AstConverter for EstreeConverter {
    fn convert(&self, serialized: &str) -> Result<String, ConvertError> {
        Ok(json_to_code(serialized, &self.options)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    const CALL: &str = r#"{"type":"Program","body":[{"type":"ExpressionStatement",
        "expression":{"type":"CallExpression","callee":{"type":"Identifier","name":"f"},"arguments":[]}}]}"#;

    #[test]
    fn converts_estree_json() {
        assert_eq!(EstreeConverter::default().convert(CALL).unwrap(), "f();");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EstreeConverter::default().convert("{not json").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
        assert!(!err.message().is_empty());
    }

    #[test]
    fn unrenderable_tree_is_a_generation_error() {
        let err = EstreeConverter::default()
            .convert(r#"{"type": "Bogus"}"#)
            .unwrap_err();
        assert_eq!(err, ConvertError::Generation("Unknown node type: Bogus".into()));
        assert_eq!(err.to_string(), "Unknown node type: Bogus");
    }

    #[test]
    fn plain_text_is_not_an_ast() {
        let err = EstreeConverter::default().convert("hello world").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn closures_are_converters() {
        let upper = |s: &str| -> Result<String, ConvertError> { Ok(s.to_uppercase()) };
        assert_eq!(upper.convert("ab").unwrap(), "AB");
    }

    #[test]
    fn indent_option_is_used() {
        let json = r#"{"type":"BlockStatement","body":[{"type":"EmptyStatement"}]}"#;
        let tabs = EstreeConverter::new(GenerateOptions::default().with_indent("\t"));
        assert_eq!(tabs.convert(json).unwrap(), "{\n\t;\n}");
    }
}
