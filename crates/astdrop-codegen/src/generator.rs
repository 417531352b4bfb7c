#![forbid(unsafe_code)]

use serde_json::Value;

use crate::error::GenerateError;
use crate::node::{Node, is_expression, is_statement};
use crate::options::GenerateOptions;
use crate::precedence::{ExprFlags, Precedence};

pub(crate) type GenResult = Result<String, GenerateError>;

/// Output state shared by the statement and expression renderers.
///
/// Rendered fragments never carry their own leading indentation; lines after
/// the first are indented absolutely, relative to `base`.
pub(crate) struct Generator<'o> {
    pub(crate) options: &'o GenerateOptions,
    /// Indentation of the line currently being produced.
    pub(crate) base: String,
}

impl<'o> Generator<'o> {
    pub(crate) fn new(options: &'o GenerateOptions) -> Self {
        Self {
            options,
            base: String::new(),
        }
    }

    pub(crate) fn root(&mut self, value: &Value) -> GenResult {
        let node = Node::new(value)?;
        if is_statement(node.ty()) {
            self.statement(node, StmtFlags::default())
        } else if is_expression(node.ty()) {
            self.expression(node, Precedence::SEQUENCE, ExprFlags::TTT)
        } else {
            Err(GenerateError::UnknownNodeType(node.ty().to_string()))
        }
    }

    /// Run `f` one indentation level deeper.
    pub(crate) fn with_indent<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, GenerateError>,
    ) -> Result<T, GenerateError> {
        let len = self.base.len();
        self.base.push_str(&self.options.indent);
        let out = f(self);
        self.base.truncate(len);
        out
    }

    /// Indentation one level below `base`.
    pub(crate) fn inner_indent(&self) -> String {
        let mut s = self.base.clone();
        s.push_str(&self.options.indent);
        s
    }
}

/// Context carried into a statement position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StmtFlags {
    /// `in` may appear unparenthesized in declarator initializers.
    pub(crate) allow_in: bool,
    /// Emit the terminating `;` (false for `for (...)` heads).
    pub(crate) semicolon: bool,
}

impl Default for StmtFlags {
    fn default() -> Self {
        Self {
            allow_in: true,
            semicolon: true,
        }
    }
}

impl StmtFlags {
    /// Flags for a declaration inside a `for` head.
    pub(crate) const FOR_HEAD: Self = Self {
        allow_in: false,
        semicolon: false,
    };

    pub(crate) fn semicolon(self) -> &'static str {
        if self.semicolon { ";" } else { "" }
    }
}

/// True when the generated text already ends with a newline.
pub(crate) fn ends_with_line_terminator(s: &str) -> bool {
    s.ends_with('\n') || s.ends_with('\r')
}

/// Concatenate with a single space unless one side already supplies whitespace.
pub(crate) fn join(left: &str, right: &str) -> String {
    let left_ws = left.chars().last().is_none_or(char::is_whitespace);
    let right_ws = right.chars().next().is_none_or(char::is_whitespace);
    if left_ws || right_ws {
        format!("{left}{right}")
    } else {
        format!("{left} {right}")
    }
}
