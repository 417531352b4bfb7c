#![forbid(unsafe_code)]

//! Expression and pattern rendering.

use serde_json::Value;

use crate::error::GenerateError;
use crate::generator::{GenResult, Generator, StmtFlags, ends_with_line_terminator, join};
use crate::literal::{format_number, quote_string};
use crate::node::{Node, is_statement};
use crate::precedence::{ExprFlags, Precedence, parenthesize};

impl Generator<'_> {
    pub(crate) fn expression(
        &mut self,
        node: Node<'_>,
        prec: Precedence,
        flags: ExprFlags,
    ) -> GenResult {
        match node.ty() {
            "SequenceExpression" => self.sequence(node, prec, flags),
            "AssignmentExpression" => self.assignment(
                node.child("left")?,
                node.child("right")?,
                node.str("operator")?,
                prec,
                flags,
            ),
            "AssignmentPattern" => {
                self.assignment(node.child("left")?, node.child("right")?, "=", prec, flags)
            }
            "ArrowFunctionExpression" => {
                let mut out = async_prefix(node).to_string();
                out.push_str(&self.function_body(node)?);
                Ok(parenthesize(out, Precedence::ARROW_FUNCTION, prec))
            }
            "ConditionalExpression" => self.conditional(node, prec, flags),
            "LogicalExpression" | "BinaryExpression" => self.binary(node, prec, flags),
            "CallExpression" => self.call(node, prec, flags),
            "ChainExpression" => {
                let inner = self.expression(
                    node.child("expression")?,
                    Precedence::OPTIONAL_CHAINING,
                    ExprFlags::TTT,
                )?;
                Ok(parenthesize(inner, Precedence::OPTIONAL_CHAINING, prec))
            }
            "NewExpression" => self.new_expression(node, prec),
            "MemberExpression" => self.member(node, prec, flags),
            "MetaProperty" => {
                let meta = self.name_of(node, "meta")?;
                let property = self.name_of(node, "property")?;
                Ok(format!("{meta}.{property}"))
            }
            "UnaryExpression" => self.unary(node, prec),
            "UpdateExpression" => self.update(node, prec),
            "YieldExpression" => {
                let mut out = String::from(if node.flag("delegate") { "yield*" } else { "yield" });
                if let Some(arg) = node.opt_child("argument")? {
                    out = join(&out, &self.expression(arg, Precedence::YIELD, ExprFlags::TTT)?);
                }
                Ok(parenthesize(out, Precedence::YIELD, prec))
            }
            "AwaitExpression" => {
                let arg = self.expression(node.child("argument")?, Precedence::AWAIT, ExprFlags::TTT)?;
                Ok(parenthesize(join("await", &arg), Precedence::AWAIT, prec))
            }
            "FunctionExpression" => self.function_expression(node),
            "ArrayExpression" => self.array(node, false),
            "ArrayPattern" => self.array(node, true),
            "RestElement" => Ok(format!("...{}", self.pattern(node.child("argument")?)?)),
            "SpreadElement" => {
                let arg =
                    self.expression(node.child("argument")?, Precedence::ASSIGNMENT, ExprFlags::TTT)?;
                Ok(format!("...{arg}"))
            }
            "ClassExpression" => self.class(node),
            "MethodDefinition" => self.method_definition(node),
            "PropertyDefinition" => self.property_definition(node),
            "Property" => self.property(node),
            "ObjectExpression" => self.object(node),
            "ObjectPattern" => self.object_pattern(node),
            "ThisExpression" => Ok("this".to_string()),
            "Super" => Ok("super".to_string()),
            "Identifier" => Ok(node.str("name")?.to_string()),
            "PrivateIdentifier" => Ok(format!("#{}", node.str("name")?)),
            "ImportDefaultSpecifier" => self.pattern(node.child("local")?),
            "ImportNamespaceSpecifier" => Ok(format!("* as {}", self.pattern(node.child("local")?)?)),
            "ImportSpecifier" => {
                let imported = self.module_export_name(node.child("imported")?)?;
                let local = match node.opt_child("local")? {
                    Some(local) => self.pattern(local)?,
                    None => imported.clone(),
                };
                Ok(aliased(imported, local))
            }
            "ExportSpecifier" => {
                let local = self.module_export_name(node.child("local")?)?;
                let exported = match node.opt_child("exported")? {
                    Some(exported) => self.module_export_name(exported)?,
                    None => local.clone(),
                };
                Ok(aliased(local, exported))
            }
            "Literal" => self.literal(node),
            "TemplateLiteral" => self.template_literal(node),
            "TemplateElement" => template_raw(node).map(str::to_string),
            "TaggedTemplateExpression" => {
                let tag_flags = if flags.contains(ExprFlags::ALLOW_CALL) {
                    ExprFlags::TTF
                } else {
                    ExprFlags::TFF
                };
                let tag = self.expression(node.child("tag")?, Precedence::CALL, tag_flags)?;
                let quasi =
                    self.expression(node.child("quasi")?, Precedence::PRIMARY, ExprFlags::TTT)?;
                Ok(parenthesize(
                    format!("{tag}{quasi}"),
                    Precedence::TAGGED_TEMPLATE,
                    prec,
                ))
            }
            "ImportExpression" => {
                let mut args = vec![self.expression(
                    node.child("source")?,
                    Precedence::ASSIGNMENT,
                    ExprFlags::TTT,
                )?];
                if let Some(options) = node.opt_child("options")? {
                    args.push(self.expression(options, Precedence::ASSIGNMENT, ExprFlags::TTT)?);
                }
                Ok(parenthesize(
                    format!("import({})", args.join(", ")),
                    Precedence::CALL,
                    prec,
                ))
            }
            "ParenthesizedExpression" => {
                let inner =
                    self.expression(node.child("expression")?, Precedence::SEQUENCE, ExprFlags::TTT)?;
                Ok(format!("({inner})"))
            }
            other => Err(GenerateError::UnexpectedNode {
                context: "expression",
                node_type: other.to_string(),
            }),
        }
    }

    /// Binding position: identifiers verbatim, anything else as an expression.
    pub(crate) fn pattern(&mut self, node: Node<'_>) -> GenResult {
        if node.is("Identifier") {
            return Ok(node.str("name")?.to_string());
        }
        self.expression(node, Precedence::ASSIGNMENT, ExprFlags::TTT)
    }

    /// Parameter list plus body, shared by functions, methods and arrows.
    pub(crate) fn function_body(&mut self, node: Node<'_>) -> GenResult {
        let params = node.nodes("params")?;
        let arrow = node.is("ArrowFunctionExpression");

        let mut out = if arrow && params.len() == 1 && params[0].is("Identifier") {
            self.pattern(params[0])?
        } else {
            let rendered = params
                .iter()
                .map(|p| self.pattern(*p))
                .collect::<Result<Vec<_>, _>>()?;
            format!("({})", rendered.join(", "))
        };

        let body = node.child("body")?;
        if arrow {
            out.push_str(" =>");
        }
        if body.is("BlockStatement") {
            out.push(' ');
            out.push_str(&self.statement(body, StmtFlags::default())?);
        } else if arrow {
            let mut expr = self.expression(body, Precedence::ASSIGNMENT, ExprFlags::TTT)?;
            if expr.starts_with('{') {
                expr = format!("({expr})");
            }
            out.push(' ');
            out.push_str(&expr);
        } else {
            return Err(node.invalid("body", "function body must be a BlockStatement"));
        }
        Ok(out)
    }

    /// `class Name extends Base { ... }`, for both declarations and expressions.
    pub(crate) fn class(&mut self, node: Node<'_>) -> GenResult {
        let mut out = String::from("class");
        if let Some(id) = node.opt_child("id")? {
            out = join(&out, &self.pattern(id)?);
        }
        if let Some(base) = node.opt_child("superClass")? {
            let base = self.expression(base, Precedence::UNARY, ExprFlags::TTT)?;
            out = join(&join(&out, "extends"), &base);
        }
        out.push(' ');
        out.push_str(&self.statement(node.child("body")?, StmtFlags::default())?);
        Ok(out)
    }

    fn function_expression(&mut self, node: Node<'_>) -> GenResult {
        let mut out = async_prefix(node).to_string();
        out.push_str("function");
        out.push_str(if node.flag("generator") { "* " } else { " " });
        if let Some(id) = node.opt_child("id")? {
            out.push_str(&self.pattern(id)?);
        }
        out.push_str(&self.function_body(node)?);
        Ok(out)
    }

    fn sequence(&mut self, node: Node<'_>, prec: Precedence, mut flags: ExprFlags) -> GenResult {
        if Precedence::SEQUENCE < prec {
            flags |= ExprFlags::ALLOW_IN;
        }
        let items = node
            .nodes("expressions")?
            .into_iter()
            .map(|e| self.expression(e, Precedence::ASSIGNMENT, flags))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parenthesize(items.join(", "), Precedence::SEQUENCE, prec))
    }

    fn assignment(
        &mut self,
        left: Node<'_>,
        right: Node<'_>,
        operator: &str,
        prec: Precedence,
        mut flags: ExprFlags,
    ) -> GenResult {
        if Precedence::ASSIGNMENT < prec {
            flags |= ExprFlags::ALLOW_IN;
        }
        let left = self.expression(left, Precedence::CALL, flags)?;
        let right = self.expression(right, Precedence::ASSIGNMENT, flags)?;
        Ok(parenthesize(
            format!("{left} {operator} {right}"),
            Precedence::ASSIGNMENT,
            prec,
        ))
    }

    fn conditional(&mut self, node: Node<'_>, prec: Precedence, mut flags: ExprFlags) -> GenResult {
        if Precedence::CONDITIONAL < prec {
            flags |= ExprFlags::ALLOW_IN;
        }
        let test = self.expression(node.child("test")?, Precedence::COALESCE, flags)?;
        let consequent = self.expression(node.child("consequent")?, Precedence::ASSIGNMENT, flags)?;
        let alternate = self.expression(node.child("alternate")?, Precedence::ASSIGNMENT, flags)?;
        Ok(parenthesize(
            format!("{test} ? {consequent} : {alternate}"),
            Precedence::CONDITIONAL,
            prec,
        ))
    }

    fn binary(&mut self, node: Node<'_>, prec: Precedence, mut flags: ExprFlags) -> GenResult {
        let operator = node.str("operator")?;
        let current = Precedence::of_binary(operator)
            .ok_or_else(|| node.invalid("operator", format!("unknown operator `{operator}`")))?;
        // `**` is right-associative and its left operand may not be a bare unary.
        let (left_prec, right_prec) = if operator == "**" {
            (Precedence::POSTFIX, current)
        } else {
            (current, current.tighter())
        };
        if current < prec {
            flags |= ExprFlags::ALLOW_IN;
        }

        let left_node = node.child("left")?;
        let right_node = node.child("right")?;
        let mut left = self.expression(left_node, left_prec, flags)?;
        let mut right = self.expression(right_node, right_prec, flags)?;

        // `??` may not be mixed with `||`/`&&` without parentheses.
        if operator == "??" {
            if is_short_circuit(left_node) {
                left = format!("({left})");
            }
            if is_short_circuit(right_node) {
                right = format!("({right})");
            }
        }

        let text = format!("{left} {operator} {right}");
        if operator == "in" && !flags.contains(ExprFlags::ALLOW_IN) {
            return Ok(format!("({text})"));
        }
        Ok(parenthesize(text, current, prec))
    }

    fn call(&mut self, node: Node<'_>, prec: Precedence, flags: ExprFlags) -> GenResult {
        let callee = self.expression(node.child("callee")?, Precedence::CALL, ExprFlags::TTF)?;
        let args = self.arguments(node)?;
        let optional = if node.flag("optional") { "?." } else { "" };
        let text = format!("{callee}{optional}({args})");
        if !flags.contains(ExprFlags::ALLOW_CALL) {
            return Ok(format!("({text})"));
        }
        Ok(parenthesize(text, Precedence::CALL, prec))
    }

    fn new_expression(&mut self, node: Node<'_>, prec: Precedence) -> GenResult {
        let callee = self.expression(node.child("callee")?, Precedence::NEW, ExprFlags::TFF)?;
        let args = self.arguments(node)?;
        Ok(parenthesize(
            format!("{}({args})", join("new", &callee)),
            Precedence::NEW,
            prec,
        ))
    }

    fn arguments(&mut self, node: Node<'_>) -> GenResult {
        let args = node
            .nodes("arguments")?
            .into_iter()
            .map(|a| self.expression(a, Precedence::ASSIGNMENT, ExprFlags::TTT))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(args.join(", "))
    }

    fn member(&mut self, node: Node<'_>, prec: Precedence, flags: ExprFlags) -> GenResult {
        let allow_call = flags.contains(ExprFlags::ALLOW_CALL);
        let object_node = node.child("object")?;
        let object_flags = if allow_call { ExprFlags::TTF } else { ExprFlags::TFF };
        let mut out = self.expression(object_node, Precedence::CALL, object_flags)?;
        let optional = node.flag("optional");

        if node.flag("computed") {
            if optional {
                out.push_str("?.");
            }
            let property_flags = if allow_call { ExprFlags::TTT } else { ExprFlags::TFT };
            let property =
                self.expression(node.child("property")?, Precedence::SEQUENCE, property_flags)?;
            out.push('[');
            out.push_str(&property);
            out.push(']');
        } else {
            // `1.toString()` would lex as a malformed number.
            if !optional && is_number_literal(object_node) && needs_member_space(&out) {
                out.push(' ');
            }
            out.push_str(if optional { "?." } else { "." });
            let property =
                self.expression(node.child("property")?, Precedence::SEQUENCE, ExprFlags::TTT)?;
            out.push_str(&property);
        }
        Ok(parenthesize(out, Precedence::MEMBER, prec))
    }

    fn unary(&mut self, node: Node<'_>, prec: Precedence) -> GenResult {
        let operator = node.str("operator")?;
        let argument = self.expression(node.child("argument")?, Precedence::UNARY, ExprFlags::TTT)?;
        let text = if operator.len() > 2 {
            join(operator, &argument)
        } else {
            let last = operator.chars().last();
            let first = argument.chars().next();
            let clash = match (last, first) {
                (Some(l @ ('+' | '-')), Some(r)) => l == r,
                (Some(l), Some(r)) => is_identifier_char(l) && is_identifier_char(r),
                _ => false,
            };
            if clash {
                format!("{operator} {argument}")
            } else {
                format!("{operator}{argument}")
            }
        };
        Ok(parenthesize(text, Precedence::UNARY, prec))
    }

    fn update(&mut self, node: Node<'_>, prec: Precedence) -> GenResult {
        let operator = node.str("operator")?;
        let argument = node.child("argument")?;
        if node.flag("prefix") {
            let arg = self.expression(argument, Precedence::UNARY, ExprFlags::TTT)?;
            Ok(parenthesize(format!("{operator}{arg}"), Precedence::UNARY, prec))
        } else {
            let arg = self.expression(argument, Precedence::POSTFIX, ExprFlags::TTT)?;
            Ok(parenthesize(format!("{arg}{operator}"), Precedence::POSTFIX, prec))
        }
    }

    fn array(&mut self, node: Node<'_>, is_pattern: bool) -> GenResult {
        let elements = node.list("elements")?;
        if elements.is_empty() {
            return Ok("[]".to_string());
        }
        let multiline = !is_pattern && elements.len() > 1;
        let len = elements.len();
        let mut out = String::from(if multiline { "[\n" } else { "[" });

        self.with_indent(|g| {
            let indent = g.base.clone();
            for (i, element) in elements.iter().enumerate() {
                if multiline {
                    out.push_str(&indent);
                }
                match element {
                    Some(element) => {
                        out.push_str(&g.expression(*element, Precedence::ASSIGNMENT, ExprFlags::TTT)?);
                    }
                    None if i + 1 == len => out.push(','),
                    None => {}
                }
                if i + 1 < len {
                    out.push_str(if multiline { ",\n" } else { ", " });
                }
            }
            Ok(())
        })?;

        if multiline {
            if !ends_with_line_terminator(&out) {
                out.push('\n');
            }
            out.push_str(&self.base);
        }
        out.push(']');
        Ok(out)
    }

    fn object(&mut self, node: Node<'_>) -> GenResult {
        let properties = node.nodes("properties")?;
        let Some(first) = properties.first().copied() else {
            return Ok("{}".to_string());
        };
        let multiline = properties.len() > 1;
        let first = self.with_indent(|g| g.expression(first, Precedence::SEQUENCE, ExprFlags::TTT))?;
        if !multiline && !first.contains('\n') {
            return Ok(format!("{{ {first} }}"));
        }

        let mut out = String::from("{\n");
        self.with_indent(|g| {
            let indent = g.base.clone();
            out.push_str(&indent);
            out.push_str(&first);
            for property in properties.iter().skip(1) {
                out.push_str(",\n");
                out.push_str(&indent);
                out.push_str(&g.expression(*property, Precedence::SEQUENCE, ExprFlags::TTT)?);
            }
            Ok(())
        })?;
        if !ends_with_line_terminator(&out) {
            out.push('\n');
        }
        out.push_str(&self.base);
        out.push('}');
        Ok(out)
    }

    fn object_pattern(&mut self, node: Node<'_>) -> GenResult {
        let properties = node.nodes("properties")?;
        if properties.is_empty() {
            return Ok("{}".to_string());
        }
        let is_complex = |p: &Node<'_>| -> Result<bool, GenerateError> {
            if !p.is("Property") {
                return Ok(false);
            }
            if properties.len() == 1 {
                Ok(!p.child("value")?.is("Identifier"))
            } else {
                Ok(!p.flag("shorthand"))
            }
        };
        let mut multiline = false;
        for property in &properties {
            if is_complex(property)? {
                multiline = true;
                break;
            }
        }

        let len = properties.len();
        let mut out = String::from(if multiline { "{\n" } else { "{" });
        self.with_indent(|g| {
            let indent = g.base.clone();
            for (i, property) in properties.iter().enumerate() {
                if multiline {
                    out.push_str(&indent);
                }
                out.push_str(&g.expression(*property, Precedence::SEQUENCE, ExprFlags::TTT)?);
                if i + 1 < len {
                    out.push_str(if multiline { ",\n" } else { ", " });
                }
            }
            Ok(())
        })?;
        if multiline {
            if !ends_with_line_terminator(&out) {
                out.push('\n');
            }
            out.push_str(&self.base);
        }
        out.push('}');
        Ok(out)
    }

    fn property_key(&mut self, node: Node<'_>) -> GenResult {
        let key = node.child("key")?;
        if node.flag("computed") {
            let key = self.expression(key, Precedence::ASSIGNMENT, ExprFlags::TTT)?;
            Ok(format!("[{key}]"))
        } else {
            self.expression(key, Precedence::SEQUENCE, ExprFlags::TTT)
        }
    }

    fn property(&mut self, node: Node<'_>) -> GenResult {
        let value = node.child("value")?;
        let kind = node.opt_str("kind").unwrap_or("init");
        if matches!(kind, "get" | "set") {
            let key = self.property_key(node)?;
            let body = self.function_body(value)?;
            return Ok(join(kind, &format!("{key}{body}")));
        }
        if node.flag("shorthand") {
            if value.is("AssignmentPattern") {
                return self.expression(value, Precedence::SEQUENCE, ExprFlags::TTT);
            }
            return self.property_key(node);
        }
        if node.flag("method") {
            let prefix = method_prefix(value);
            let key = self.property_key(node)?;
            let body = self.function_body(value)?;
            return Ok(format!("{prefix}{key}{body}"));
        }
        let key = self.property_key(node)?;
        let value = self.expression(value, Precedence::ASSIGNMENT, ExprFlags::TTT)?;
        Ok(format!("{key}: {value}"))
    }

    fn method_definition(&mut self, node: Node<'_>) -> GenResult {
        let value = node.child("value")?;
        let mut out = String::from(if node.flag("static") { "static " } else { "" });
        let key = self.property_key(node)?;
        let body = self.function_body(value)?;
        match node.opt_str("kind").unwrap_or("method") {
            kind @ ("get" | "set") => out.push_str(&join(kind, &format!("{key}{body}"))),
            _ => {
                out.push_str(method_prefix(value));
                out.push_str(&key);
                out.push_str(&body);
            }
        }
        Ok(out)
    }

    fn property_definition(&mut self, node: Node<'_>) -> GenResult {
        let mut out = String::from(if node.flag("static") { "static " } else { "" });
        out.push_str(&self.property_key(node)?);
        if let Some(value) = node.opt_child("value")? {
            out.push_str(" = ");
            out.push_str(&self.expression(value, Precedence::ASSIGNMENT, ExprFlags::TTT)?);
        }
        out.push(';');
        Ok(out)
    }

    fn literal(&mut self, node: Node<'_>) -> GenResult {
        if let Some(regex) = node.get("regex") {
            let pattern = regex.get("pattern").and_then(Value::as_str).unwrap_or_default();
            let flags = regex.get("flags").and_then(Value::as_str).unwrap_or_default();
            return Ok(format!("/{pattern}/{flags}"));
        }
        if let Some(bigint) = node.opt_str("bigint") {
            return Ok(format!("{bigint}n"));
        }
        match node.get("value") {
            None => Ok("null".to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(Value::String(s)) => Ok(quote_string(s, self.options.quotes)),
            Some(Value::Number(n)) => n
                .as_f64()
                .and_then(format_number)
                .ok_or_else(|| node.invalid("value", format!("numeric literal {n} is negative"))),
            Some(_) => Err(node.invalid("value", "unsupported literal value")),
        }
    }

    fn template_literal(&mut self, node: Node<'_>) -> GenResult {
        let quasis = node.nodes("quasis")?;
        let expressions = node.nodes("expressions")?;
        let mut out = String::from("`");
        for (i, quasi) in quasis.iter().enumerate() {
            out.push_str(template_raw(*quasi)?);
            if i + 1 == quasis.len() {
                break;
            }
            if let Some(expr) = expressions.get(i) {
                out.push_str("${ ");
                out.push_str(&self.expression(*expr, Precedence::SEQUENCE, ExprFlags::TTT)?);
                out.push_str(" }");
            }
        }
        out.push('`');
        Ok(out)
    }

    /// Identifier or string used as an import/export binding name.
    fn module_export_name(&mut self, node: Node<'_>) -> GenResult {
        if node.is("Literal") {
            return self.literal(node);
        }
        self.pattern(node)
    }

    /// `meta`/`property` of a MetaProperty; older trees store a bare string.
    fn name_of(&mut self, node: Node<'_>, field: &'static str) -> GenResult {
        match node.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => self.pattern(node.child(field)?),
            None => Err(node.missing(field)),
        }
    }
}

fn async_prefix(node: Node<'_>) -> &'static str {
    if node.flag("async") { "async " } else { "" }
}

fn method_prefix(function: Node<'_>) -> &'static str {
    match (function.flag("async"), function.flag("generator")) {
        (true, true) => "async *",
        (true, false) => "async ",
        (false, true) => "*",
        (false, false) => "",
    }
}

fn aliased(name: String, alias: String) -> String {
    if name == alias {
        name
    } else {
        format!("{name} as {alias}")
    }
}

fn template_raw<'a>(node: Node<'a>) -> Result<&'a str, GenerateError> {
    node.get("value")
        .and_then(|v| v.get("raw").or_else(|| v.get("cooked")))
        .and_then(Value::as_str)
        .ok_or_else(|| node.missing("value"))
}

fn is_short_circuit(node: Node<'_>) -> bool {
    node.is("LogicalExpression") && matches!(node.opt_str("operator"), Some("||" | "&&"))
}

fn is_number_literal(node: Node<'_>) -> bool {
    node.is("Literal") && node.get("value").is_some_and(Value::is_number)
}

/// A decimal integer literal needs a space before `.` to stay a member access.
fn needs_member_space(rendered: &str) -> bool {
    !rendered.contains(['.', 'e', 'E', 'x', 'X'])
        && rendered.ends_with(|c: char| c.is_ascii_digit())
        && !(rendered.len() >= 2 && rendered.starts_with('0'))
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Declarations allowed after `export default` are rendered as statements.
pub(crate) fn is_declaration_like(node: Node<'_>) -> bool {
    is_statement(node.ty())
}
