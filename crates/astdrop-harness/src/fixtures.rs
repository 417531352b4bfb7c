#![forbid(unsafe_code)]

//! Canned ESTree payloads.

use serde_json::{Value, json};

/// `Program` whose body is the single expression statement `expression`.
pub fn expression_program(expression: Value) -> Value {
    json!({
        "type": "Program",
        "sourceType": "script",
        "body": [{ "type": "ExpressionStatement", "expression": expression }],
    })
}

pub fn identifier(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

/// `callee(arg0, arg1, ...)` with identifier arguments.
pub fn call(callee: &str, args: &[&str]) -> Value {
    json!({
        "type": "CallExpression",
        "callee": identifier(callee),
        "arguments": args.iter().map(|a| identifier(a)).collect::<Vec<_>>(),
        "optional": false,
    })
}

/// `const name = value;` with a numeric literal.
pub fn const_number(name: &str, value: u32) -> Value {
    json!({
        "type": "Program",
        "sourceType": "module",
        "body": [{
            "type": "VariableDeclaration",
            "kind": "const",
            "declarations": [{
                "type": "VariableDeclarator",
                "id": identifier(name),
                "init": { "type": "Literal", "value": value, "raw": value.to_string() },
            }],
        }],
    })
}

/// `function name() { return value; }` with a string literal.
pub fn returning_function(name: &str, value: &str) -> Value {
    json!({
        "type": "Program",
        "body": [{
            "type": "FunctionDeclaration",
            "id": identifier(name),
            "params": [],
            "generator": false,
            "async": false,
            "body": {
                "type": "BlockStatement",
                "body": [{
                    "type": "ReturnStatement",
                    "argument": { "type": "Literal", "value": value },
                }],
            },
        }],
    })
}

/// Compact JSON text of `ast`, as a clipboard or file would carry it.
pub fn serialize(ast: &Value) -> String {
    ast.to_string()
}

/// Text that is not JSON at all.
pub const MALFORMED: &str = "{\"type\": \"Program\", \"body\": [";
