#![forbid(unsafe_code)]

//! Typed access to ESTree nodes held as untyped JSON.

use serde_json::Value;

use crate::error::GenerateError;

/// JSON kind name used in error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Borrowed view of one AST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node<'a> {
    value: &'a Value,
    ty: &'a str,
}

impl<'a> Node<'a> {
    pub(crate) fn new(value: &'a Value) -> Result<Self, GenerateError> {
        let Value::Object(map) = value else {
            return Err(GenerateError::NotANode {
                found: json_kind(value),
            });
        };
        match map.get("type") {
            Some(Value::String(ty)) => Ok(Self {
                value,
                ty: ty.as_str(),
            }),
            _ => Err(GenerateError::Untyped),
        }
    }

    #[inline]
    pub(crate) fn ty(&self) -> &'a str {
        self.ty
    }

    /// Raw field value; `None` when absent or `null`.
    pub(crate) fn get(&self, field: &str) -> Option<&'a Value> {
        match self.value.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v),
        }
    }

    pub(crate) fn missing(&self, field: &'static str) -> GenerateError {
        GenerateError::MissingField {
            node_type: self.ty.to_string(),
            field,
        }
    }

    pub(crate) fn invalid(&self, field: &'static str, reason: impl Into<String>) -> GenerateError {
        GenerateError::InvalidValue {
            node_type: self.ty.to_string(),
            field,
            reason: reason.into(),
        }
    }

    /// Required child node.
    pub(crate) fn child(&self, field: &'static str) -> Result<Node<'a>, GenerateError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        Node::new(value)
    }

    /// Optional child node.
    pub(crate) fn opt_child(&self, field: &'static str) -> Result<Option<Node<'a>>, GenerateError> {
        self.get(field).map(Node::new).transpose()
    }

    /// Required list of nodes. Holes (`null`) are kept as `None`.
    pub(crate) fn list(&self, field: &'static str) -> Result<Vec<Option<Node<'a>>>, GenerateError> {
        let Some(value) = self.get(field) else {
            return Err(self.missing(field));
        };
        let Value::Array(items) = value else {
            return Err(self.invalid(field, format!("expected an array, found {}", json_kind(value))));
        };
        items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(None),
                other => Node::new(other).map(Some),
            })
            .collect()
    }

    /// Like [`list`](Self::list) but an absent field is an empty list and holes are errors.
    pub(crate) fn nodes(&self, field: &'static str) -> Result<Vec<Node<'a>>, GenerateError> {
        if self.get(field).is_none() {
            return Ok(Vec::new());
        }
        self.list(field)?
            .into_iter()
            .map(|item| item.ok_or_else(|| self.invalid(field, "unexpected hole")))
            .collect()
    }

    pub(crate) fn str(&self, field: &'static str) -> Result<&'a str, GenerateError> {
        match self.get(field) {
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(self.invalid(field, format!("expected a string, found {}", json_kind(other)))),
            None => Err(self.missing(field)),
        }
    }

    pub(crate) fn opt_str(&self, field: &'static str) -> Option<&'a str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Boolean flag, `false` when absent.
    pub(crate) fn flag(&self, field: &str) -> bool {
        self.get(field).and_then(Value::as_bool).unwrap_or(false)
    }

    pub(crate) fn is(&self, ty: &str) -> bool {
        self.ty == ty
    }
}

/// Node types rendered by the statement generator.
pub(crate) fn is_statement(ty: &str) -> bool {
    matches!(
        ty,
        "Program"
            | "BlockStatement"
            | "BreakStatement"
            | "ClassBody"
            | "ClassDeclaration"
            | "ContinueStatement"
            | "DebuggerStatement"
            | "Directive"
            | "DoWhileStatement"
            | "EmptyStatement"
            | "ExportAllDeclaration"
            | "ExportDefaultDeclaration"
            | "ExportNamedDeclaration"
            | "ExpressionStatement"
            | "ForInStatement"
            | "ForOfStatement"
            | "ForStatement"
            | "FunctionDeclaration"
            | "IfStatement"
            | "ImportDeclaration"
            | "LabeledStatement"
            | "ReturnStatement"
            | "StaticBlock"
            | "SwitchStatement"
            | "ThrowStatement"
            | "TryStatement"
            | "VariableDeclaration"
            | "WhileStatement"
            | "WithStatement"
    )
}

/// Node types rendered by the expression generator (patterns included).
pub(crate) fn is_expression(ty: &str) -> bool {
    matches!(
        ty,
        "ArrayExpression"
            | "ArrayPattern"
            | "ArrowFunctionExpression"
            | "AssignmentExpression"
            | "AssignmentPattern"
            | "AwaitExpression"
            | "BinaryExpression"
            | "CallExpression"
            | "ChainExpression"
            | "ClassExpression"
            | "ConditionalExpression"
            | "FunctionExpression"
            | "Identifier"
            | "ImportExpression"
            | "Literal"
            | "LogicalExpression"
            | "MemberExpression"
            | "MetaProperty"
            | "MethodDefinition"
            | "NewExpression"
            | "ObjectExpression"
            | "ObjectPattern"
            | "ParenthesizedExpression"
            | "PrivateIdentifier"
            | "Property"
            | "PropertyDefinition"
            | "RestElement"
            | "SequenceExpression"
            | "SpreadElement"
            | "Super"
            | "TaggedTemplateExpression"
            | "TemplateElement"
            | "TemplateLiteral"
            | "ThisExpression"
            | "UnaryExpression"
            | "UpdateExpression"
            | "YieldExpression"
            | "ImportSpecifier"
            | "ImportDefaultSpecifier"
            | "ImportNamespaceSpecifier"
            | "ExportSpecifier"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rejects_non_objects() {
        let err = Node::new(&json!(3)).unwrap_err();
        assert_eq!(err, GenerateError::NotANode { found: "a number" });
    }

    #[test]
    fn null_fields_count_as_absent() {
        let v = json!({"type": "ReturnStatement", "argument": null});
        let node = Node::new(&v).unwrap();
        assert!(node.opt_child("argument").unwrap().is_none());
        assert_eq!(
            node.child("argument").unwrap_err(),
            GenerateError::MissingField {
                node_type: "ReturnStatement".into(),
                field: "argument",
            }
        );
    }

    #[test]
    fn list_keeps_holes() {
        let v = json!({"type": "ArrayExpression", "elements": [null, {"type": "Identifier", "name": "a"}]});
        let node = Node::new(&v).unwrap();
        let items = node.list("elements").unwrap();
        assert!(items[0].is_none());
        assert_eq!(items[1].unwrap().ty(), "Identifier");
    }
}
