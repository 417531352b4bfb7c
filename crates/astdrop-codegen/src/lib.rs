#![forbid(unsafe_code)]

//! ESTree JSON → formatted JavaScript source.
//!
//! The input is the JSON serialization of an ESTree-shaped syntax tree (the
//! format produced by acorn, esprima, espree, babel's `estree` plugin, ...).
//! Output follows escodegen's default layout: one statement per line, blocks
//! opened on the same line, configurable indentation, single-quoted strings,
//! and the minimum parentheses needed to preserve the tree's structure.
//!
//! # Example
//!
//! ```
//! use astdrop_codegen::{json_to_code, GenerateOptions};
//!
//! let json = r#"{"type":"Program","body":[{"type":"ExpressionStatement",
//!     "expression":{"type":"CallExpression","callee":{"type":"Identifier","name":"f"},
//!     "arguments":[{"type":"Literal","value":1}]}}]}"#;
//! assert_eq!(json_to_code(json, &GenerateOptions::default()).unwrap(), "f(1);");
//! ```
//!
//! # Failure Modes
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Input is not JSON | [`CodegenError::Parse`] |
//! | Root is not a node object | [`GenerateError::NotANode`] / [`GenerateError::Untyped`] |
//! | Unknown `type` | [`GenerateError::UnknownNodeType`] / [`GenerateError::UnexpectedNode`] |
//! | Required child missing | [`GenerateError::MissingField`] |
//! | Negative numeric literal, unknown operator, ... | [`GenerateError::InvalidValue`] |

mod error;
mod expr;
mod generator;
mod literal;
mod node;
mod options;
mod precedence;
mod stmt;

pub use error::{CodegenError, GenerateError};
pub use options::{GenerateOptions, QuoteStyle};

use serde_json::Value;

use crate::generator::Generator;

/// Render an already-parsed tree.
///
/// Statements (including `Program`) and expressions are accepted as the root.
pub fn generate(ast: &Value, options: &GenerateOptions) -> Result<String, GenerateError> {
    Generator::new(options).root(ast)
}

/// Parse `json` and render it.
pub fn json_to_code(json: &str, options: &GenerateOptions) -> Result<String, CodegenError> {
    let ast: Value = serde_json::from_str(json)?;
    Ok(generate(&ast, options)?)
}
