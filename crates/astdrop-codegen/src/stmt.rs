#![forbid(unsafe_code)]

//! Statement, declaration and module-item rendering.

use crate::error::GenerateError;
use crate::expr::{is_declaration_like, is_identifier_char};
use crate::generator::{GenResult, Generator, StmtFlags, ends_with_line_terminator, join};
use crate::node::Node;
use crate::precedence::{ExprFlags, Precedence};

impl Generator<'_> {
    pub(crate) fn statement(&mut self, node: Node<'_>, flags: StmtFlags) -> GenResult {
        match node.ty() {
            "Program" => self.program(node),
            "BlockStatement" => self.block(node),
            "StaticBlock" => Ok(format!("static {}", self.block(node)?)),
            "ClassBody" => self.class_body(node),
            "ClassDeclaration" => self.class(node),
            "FunctionDeclaration" => self.function_declaration(node),
            "EmptyStatement" => Ok(";".to_string()),
            "DebuggerStatement" => Ok(format!("debugger{}", flags.semicolon())),
            "ExpressionStatement" => self.expression_statement(node, flags),
            "Directive" => {
                let directive = node.str("directive")?;
                let quote = if directive.contains('\'') { '"' } else { '\'' };
                Ok(format!("{quote}{directive}{quote}{}", flags.semicolon()))
            }
            "VariableDeclaration" => self.variable_declaration(node, flags),
            "VariableDeclarator" => self.variable_declarator(node, flags),
            "ReturnStatement" => self.keyword_argument("return", node, flags),
            "ThrowStatement" => {
                let arg = self.expression(node.child("argument")?, Precedence::SEQUENCE, ExprFlags::TTT)?;
                Ok(format!("{}{}", join("throw", &arg), flags.semicolon()))
            }
            "BreakStatement" => self.jump("break", node, flags),
            "ContinueStatement" => self.jump("continue", node, flags),
            "LabeledStatement" => {
                let label = self.pattern(node.child("label")?)?;
                let body = self.maybe_block(node.child("body")?)?;
                Ok(format!("{label}:{body}"))
            }
            "IfStatement" => self.if_statement(node),
            "WhileStatement" => {
                let head = self.head("while", node.child("test")?)?;
                Ok(format!("{head}{}", self.maybe_block(node.child("body")?)?))
            }
            "WithStatement" => {
                let head = self.head("with", node.child("object")?)?;
                Ok(format!("{head}{}", self.maybe_block(node.child("body")?)?))
            }
            "DoWhileStatement" => {
                let body = node.child("body")?;
                let out = join("do", &self.maybe_block(body)?);
                let out = self.maybe_block_suffix(body, out);
                let test = self.expression(node.child("test")?, Precedence::SEQUENCE, ExprFlags::TTT)?;
                Ok(join(&out, &format!("while ({test}){}", flags.semicolon())))
            }
            "ForStatement" => self.for_statement(node),
            "ForInStatement" => self.for_iteration(node, "in", Precedence::SEQUENCE),
            "ForOfStatement" => self.for_iteration(node, "of", Precedence::ASSIGNMENT),
            "SwitchStatement" => self.switch(node),
            "SwitchCase" => self.switch_case(node),
            "TryStatement" => self.try_statement(node),
            "CatchClause" => self.catch_clause(node),
            "ImportDeclaration" => self.import(node, flags),
            "ExportDefaultDeclaration" => {
                let declaration = node.child("declaration")?;
                let out = join("export", "default");
                if is_declaration_like(declaration) {
                    Ok(join(&out, &self.statement(declaration, StmtFlags::default())?))
                } else {
                    let expr = self.expression(declaration, Precedence::ASSIGNMENT, ExprFlags::TTT)?;
                    Ok(format!("{}{}", join(&out, &expr), flags.semicolon()))
                }
            }
            "ExportNamedDeclaration" => self.export_named(node, flags),
            "ExportAllDeclaration" => {
                let mut out = String::from("export *");
                if let Some(exported) = node.opt_child("exported")? {
                    out = join(&join(&out, "as"), &self.expression(exported, Precedence::SEQUENCE, ExprFlags::TTT)?);
                }
                let source = self.expression(node.child("source")?, Precedence::SEQUENCE, ExprFlags::TTT)?;
                Ok(format!("{} from {source}{}", out, flags.semicolon()))
            }
            other => Err(GenerateError::UnexpectedNode {
                context: "statement",
                node_type: other.to_string(),
            }),
        }
    }

    fn program(&mut self, node: Node<'_>) -> GenResult {
        let body = node.nodes("body")?;
        let mut out = String::new();
        for (i, stmt) in body.iter().enumerate() {
            let fragment = self.statement(*stmt, StmtFlags::default())?;
            out.push_str(&self.base);
            out.push_str(&fragment);
            if i + 1 < body.len() && !ends_with_line_terminator(&fragment) {
                out.push('\n');
            }
        }
        Ok(out)
    }

    /// `{`, one indented statement per line, `}` at the current level.
    fn block(&mut self, node: Node<'_>) -> GenResult {
        let body = node.nodes("body")?;
        let mut out = String::from("{\n");
        self.with_indent(|g| {
            for stmt in body {
                let fragment = g.statement(stmt, StmtFlags::default())?;
                out.push_str(&g.base);
                out.push_str(&fragment);
                if !ends_with_line_terminator(&fragment) {
                    out.push('\n');
                }
            }
            Ok(())
        })?;
        out.push_str(&self.base);
        out.push('}');
        Ok(out)
    }

    fn class_body(&mut self, node: Node<'_>) -> GenResult {
        let members = node.nodes("body")?;
        let mut out = String::from("{\n");
        self.with_indent(|g| {
            for (i, member) in members.iter().enumerate() {
                out.push_str(&g.base);
                out.push_str(&g.expression(*member, Precedence::SEQUENCE, ExprFlags::TTT)?);
                if i + 1 < members.len() {
                    out.push('\n');
                }
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

    /// Body of a compound statement: blocks stay on the same line, anything
    /// else moves to its own indented line.
    fn maybe_block(&mut self, body: Node<'_>) -> GenResult {
        match body.ty() {
            "BlockStatement" => Ok(format!(" {}", self.block(body)?)),
            "EmptyStatement" => Ok(";".to_string()),
            _ => self.with_indent(|g| {
                let stmt = g.statement(body, StmtFlags::default())?;
                Ok(format!("\n{}{stmt}", g.base))
            }),
        }
    }

    /// Prepare `out` for a trailing keyword (`else`, `while`, `catch`, ...).
    fn maybe_block_suffix(&self, body: Node<'_>, mut out: String) -> String {
        let ends = ends_with_line_terminator(&out);
        if body.is("BlockStatement") && !ends {
            out.push(' ');
        } else if ends {
            out.push_str(&self.base);
        } else {
            out.push('\n');
            out.push_str(&self.base);
        }
        out
    }

    /// `keyword (expr)` with the expression rendered one level deeper.
    fn head(&mut self, keyword: &str, expr: Node<'_>) -> GenResult {
        let expr = self.with_indent(|g| g.expression(expr, Precedence::SEQUENCE, ExprFlags::TTT))?;
        Ok(format!("{keyword} ({expr})"))
    }

    fn function_declaration(&mut self, node: Node<'_>) -> GenResult {
        let mut out = String::from(if node.flag("async") { "async function" } else { "function" });
        out.push_str(if node.flag("generator") { "* " } else { " " });
        if let Some(id) = node.opt_child("id")? {
            out.push_str(&self.pattern(id)?);
        }
        out.push_str(&self.function_body(node)?);
        Ok(out)
    }

    fn expression_statement(&mut self, node: Node<'_>, flags: StmtFlags) -> GenResult {
        let expr = self.expression(node.child("expression")?, Precedence::SEQUENCE, ExprFlags::TTT)?;
        if needs_statement_parens(&expr) {
            Ok(format!("({expr}){}", flags.semicolon()))
        } else {
            Ok(format!("{expr}{}", flags.semicolon()))
        }
    }

    fn variable_declaration(&mut self, node: Node<'_>, flags: StmtFlags) -> GenResult {
        let kind = node.str("kind")?;
        let declarators = node.nodes("declarations")?;
        let inner = StmtFlags {
            allow_in: flags.allow_in,
            semicolon: false,
        };
        let render = |g: &mut Self| -> GenResult {
            let mut out = String::from(kind);
            for (i, declarator) in declarators.iter().enumerate() {
                out.push_str(if i == 0 { " " } else { ", " });
                out.push_str(&g.statement(*declarator, inner)?);
            }
            Ok(out)
        };
        let mut out = if declarators.len() > 1 {
            self.with_indent(render)?
        } else {
            render(self)?
        };
        out.push_str(flags.semicolon());
        Ok(out)
    }

    fn variable_declarator(&mut self, node: Node<'_>, flags: StmtFlags) -> GenResult {
        let id = self.pattern(node.child("id")?)?;
        let Some(init) = node.opt_child("init")? else {
            return Ok(id);
        };
        let expr_flags = if flags.allow_in { ExprFlags::TTT } else { ExprFlags::FTT };
        let init = self.expression(init, Precedence::ASSIGNMENT, expr_flags)?;
        Ok(format!("{id} = {init}"))
    }

    fn keyword_argument(&mut self, keyword: &str, node: Node<'_>, flags: StmtFlags) -> GenResult {
        match node.opt_child("argument")? {
            Some(arg) => {
                let arg = self.expression(arg, Precedence::SEQUENCE, ExprFlags::TTT)?;
                Ok(format!("{}{}", join(keyword, &arg), flags.semicolon()))
            }
            None => Ok(format!("{keyword}{}", flags.semicolon())),
        }
    }

    fn jump(&mut self, keyword: &str, node: Node<'_>, flags: StmtFlags) -> GenResult {
        match node.opt_child("label")? {
            Some(label) => Ok(format!("{keyword} {}{}", self.pattern(label)?, flags.semicolon())),
            None => Ok(format!("{keyword}{}", flags.semicolon())),
        }
    }

    fn if_statement(&mut self, node: Node<'_>) -> GenResult {
        let mut out = self.head("if", node.child("test")?)?;
        let consequent = node.child("consequent")?;
        out.push_str(&self.maybe_block(consequent)?);
        let Some(alternate) = node.opt_child("alternate")? else {
            return Ok(out);
        };
        let out = self.maybe_block_suffix(consequent, out);
        if alternate.is("IfStatement") {
            let chained = self.statement(alternate, StmtFlags::default())?;
            Ok(join(&out, &format!("else {chained}")))
        } else {
            let alternate = self.maybe_block(alternate)?;
            Ok(join(&out, &join("else", &alternate)))
        }
    }

    fn for_statement(&mut self, node: Node<'_>) -> GenResult {
        let head = self.with_indent(|g| {
            let mut head = String::from("for (");
            match node.opt_child("init")? {
                Some(init) if init.is("VariableDeclaration") => {
                    head.push_str(&g.statement(init, StmtFlags::FOR_HEAD)?);
                }
                Some(init) => {
                    head.push_str(&g.expression(init, Precedence::SEQUENCE, ExprFlags::FTT)?);
                }
                None => {}
            }
            head.push(';');
            if let Some(test) = node.opt_child("test")? {
                head.push(' ');
                head.push_str(&g.expression(test, Precedence::SEQUENCE, ExprFlags::TTT)?);
            }
            head.push(';');
            if let Some(update) = node.opt_child("update")? {
                head.push(' ');
                head.push_str(&g.expression(update, Precedence::SEQUENCE, ExprFlags::TTT)?);
            }
            head.push(')');
            Ok(head)
        })?;
        Ok(format!("{head}{}", self.maybe_block(node.child("body")?)?))
    }

    fn for_iteration(&mut self, node: Node<'_>, operator: &str, right_prec: Precedence) -> GenResult {
        let keyword = if node.flag("await") { "for await (" } else { "for (" };
        let head = self.with_indent(|g| {
            let left = node.child("left")?;
            let left = if left.is("VariableDeclaration") {
                let kind = left.str("kind")?;
                let first = left
                    .nodes("declarations")?
                    .into_iter()
                    .next()
                    .ok_or_else(|| left.invalid("declarations", "expected one declarator"))?;
                g.with_indent(|g| {
                    let declarator = g.statement(first, StmtFlags::FOR_HEAD)?;
                    Ok(format!("{kind} {declarator}"))
                })?
            } else {
                g.expression(left, Precedence::CALL, ExprFlags::TTT)?
            };
            let right = g.expression(node.child("right")?, right_prec, ExprFlags::TTT)?;
            Ok(format!("{keyword}{})", join(&join(&left, operator), &right)))
        })?;
        Ok(format!("{head}{}", self.maybe_block(node.child("body")?)?))
    }

    fn switch(&mut self, node: Node<'_>) -> GenResult {
        let mut out = self.head("switch", node.child("discriminant")?)?;
        out.push_str(" {\n");
        for case in node.nodes("cases")? {
            let fragment = self.statement(case, StmtFlags::default())?;
            out.push_str(&self.base);
            out.push_str(&fragment);
            if !ends_with_line_terminator(&fragment) {
                out.push('\n');
            }
        }
        out.push_str(&self.base);
        out.push('}');
        Ok(out)
    }

    fn switch_case(&mut self, node: Node<'_>) -> GenResult {
        self.with_indent(|g| {
            let mut out = match node.opt_child("test")? {
                Some(test) => {
                    let test = g.expression(test, Precedence::SEQUENCE, ExprFlags::TTT)?;
                    format!("{}:", join("case", &test))
                }
                None => "default:".to_string(),
            };
            let consequent = node.nodes("consequent")?;
            let mut rest = consequent.as_slice();
            if let Some(first) = rest.first().filter(|s| s.is("BlockStatement")) {
                out.push_str(&g.maybe_block(*first)?);
                rest = &rest[1..];
            }
            if !rest.is_empty() && !ends_with_line_terminator(&out) {
                out.push('\n');
            }
            for (i, stmt) in rest.iter().enumerate() {
                let fragment = g.statement(*stmt, StmtFlags::default())?;
                out.push_str(&g.base);
                out.push_str(&fragment);
                if i + 1 < rest.len() && !ends_with_line_terminator(&fragment) {
                    out.push('\n');
                }
            }
            Ok(out)
        })
    }

    fn try_statement(&mut self, node: Node<'_>) -> GenResult {
        let block = node.child("block")?;
        let out = format!("try{}", self.maybe_block(block)?);
        let mut out = self.maybe_block_suffix(block, out);
        let finalizer = node.opt_child("finalizer")?;

        if let Some(handler) = node.opt_child("handler")? {
            out = join(&out, &self.statement(handler, StmtFlags::default())?);
            if finalizer.is_some() {
                out = self.maybe_block_suffix(handler.child("body")?, out);
            }
        }
        if let Some(finalizer) = finalizer {
            out = join(&out, &format!("finally{}", self.maybe_block(finalizer)?));
        }
        Ok(out)
    }

    fn catch_clause(&mut self, node: Node<'_>) -> GenResult {
        let mut out = match node.opt_child("param")? {
            Some(param) => {
                let param =
                    self.with_indent(|g| g.expression(param, Precedence::SEQUENCE, ExprFlags::TTT))?;
                format!("catch ({param})")
            }
            None => "catch".to_string(),
        };
        out.push_str(&self.maybe_block(node.child("body")?)?);
        Ok(out)
    }

    fn import(&mut self, node: Node<'_>, flags: StmtFlags) -> GenResult {
        let source = self.expression(node.child("source")?, Precedence::SEQUENCE, ExprFlags::TTT)?;
        let specifiers = node.nodes("specifiers")?;
        if specifiers.is_empty() {
            return Ok(format!("import {source}{}", flags.semicolon()));
        }

        let mut out = String::from("import");
        let mut rest = specifiers.as_slice();
        if rest[0].is("ImportDefaultSpecifier") {
            out = join(&out, &self.expression(rest[0], Precedence::SEQUENCE, ExprFlags::TTT)?);
            rest = &rest[1..];
        }
        if let Some(first) = rest.first() {
            if rest.len() < specifiers.len() {
                out.push(',');
            }
            if first.is("ImportNamespaceSpecifier") {
                out.push(' ');
                out.push_str(&self.expression(*first, Precedence::SEQUENCE, ExprFlags::TTT)?);
            } else if rest.len() == 1 {
                let named = self.expression(*first, Precedence::SEQUENCE, ExprFlags::TTT)?;
                out.push_str(&format!(" {{ {named} }} "));
            } else {
                out.push_str(" {");
                out.push_str(&self.specifier_lines(rest)?);
                out.push(' ');
            }
        }
        Ok(format!("{}{}", join(&out, &format!("from {source}")), flags.semicolon()))
    }

    fn export_named(&mut self, node: Node<'_>, flags: StmtFlags) -> GenResult {
        if let Some(declaration) = node.opt_child("declaration")? {
            return Ok(join("export", &self.statement(declaration, StmtFlags::default())?));
        }
        let specifiers = node.nodes("specifiers")?;
        let mut out = if specifiers.is_empty() {
            "export { }".to_string()
        } else {
            format!("export {{{}", self.specifier_lines(&specifiers)?)
        };
        if let Some(source) = node.opt_child("source")? {
            let source = self.expression(source, Precedence::SEQUENCE, ExprFlags::TTT)?;
            out = join(&out, &format!("from {source}"));
        }
        out.push_str(flags.semicolon());
        Ok(out)
    }

    /// Specifiers one per line, closed by `}` at the current level.
    fn specifier_lines(&mut self, specifiers: &[Node<'_>]) -> GenResult {
        let mut out = String::from("\n");
        self.with_indent(|g| {
            for (i, specifier) in specifiers.iter().enumerate() {
                out.push_str(&g.base);
                out.push_str(&g.expression(*specifier, Precedence::SEQUENCE, ExprFlags::TTT)?);
                if i + 1 < specifiers.len() {
                    out.push_str(",\n");
                }
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
}

/// True when `keyword` starts `text` as a whole word.
fn starts_with_word(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword)
        .is_some_and(|rest| !rest.starts_with(is_identifier_char))
}

/// Expression statements that would otherwise parse as a block, a
/// declaration or a `let` binding.
fn needs_statement_parens(expr: &str) -> bool {
    if expr.starts_with('{') || starts_with_word(expr, "class") || starts_with_word(expr, "function") {
        return true;
    }
    let async_function = expr.strip_prefix("async").is_some_and(|rest| {
        rest.starts_with([' ', '\t'])
            && starts_with_word(rest.trim_start_matches([' ', '\t']), "function")
    });
    if async_function {
        return true;
    }
    expr.strip_prefix("let")
        .is_some_and(|rest| rest.trim_start().starts_with('['))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn statement_prefixes_that_need_parens() {
        assert!(needs_statement_parens("{ a: 1 }"));
        assert!(needs_statement_parens("function () {\n}"));
        assert!(needs_statement_parens("class {\n}.x"));
        assert!(needs_statement_parens("async function () {\n}"));
        assert!(needs_statement_parens("let [a]"));
        assert!(!needs_statement_parens("functional()"));
        assert!(!needs_statement_parens("classes"));
        assert!(!needs_statement_parens("async()"));
        assert!(!needs_statement_parens("letter[0]"));
    }

    #[test]
    fn word_prefix_requires_boundary() {
        assert_eq!(starts_with_word("class A", "class"), true);
        assert_eq!(starts_with_word("class", "class"), true);
        assert_eq!(starts_with_word("class$", "class"), false);
    }
}
