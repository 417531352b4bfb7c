//! Rendering of representative ESTree programs.
//!
//! Each case pins the exact text produced for a small tree, covering the
//! layout rules for blocks, declarations, control flow, modules and classes.

use astdrop_codegen::{CodegenError, GenerateError, GenerateOptions, QuoteStyle, generate, json_to_code};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

// ── Builders ────────────────────────────────────────────────────────────

fn id(name: &str) -> Value {
    json!({"type": "Identifier", "name": name})
}

fn num(n: u32) -> Value {
    json!({"type": "Literal", "value": n})
}

fn string(s: &str) -> Value {
    json!({"type": "Literal", "value": s})
}

fn call(callee: Value, args: Vec<Value>) -> Value {
    json!({"type": "CallExpression", "callee": callee, "arguments": args, "optional": false})
}

fn expr_stmt(expression: Value) -> Value {
    json!({"type": "ExpressionStatement", "expression": expression})
}

fn block(body: Vec<Value>) -> Value {
    json!({"type": "BlockStatement", "body": body})
}

fn program(body: Vec<Value>) -> Value {
    json!({"type": "Program", "sourceType": "module", "body": body})
}

fn declare(kind: &str, declarators: Vec<(&str, Option<Value>)>) -> Value {
    let declarations: Vec<Value> = declarators
        .into_iter()
        .map(|(name, init)| json!({"type": "VariableDeclarator", "id": id(name), "init": init}))
        .collect();
    json!({"type": "VariableDeclaration", "kind": kind, "declarations": declarations})
}

fn render(ast: Value) -> String {
    generate(&ast, &GenerateOptions::default()).unwrap()
}

// ═════════════════════════════════════════════════════════════════════════
// Declarations
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn single_declarator() {
    let ast = program(vec![declare("let", vec![("a", Some(num(1)))])]);
    assert_eq!(render(ast), "let a = 1;");
}

#[test]
fn multiple_declarators_indent_their_initializers() {
    let array = json!({"type": "ArrayExpression", "elements": [num(1), num(2)]});
    let ast = program(vec![declare("const", vec![("a", None), ("b", Some(array))])]);
    assert_eq!(render(ast), "const a, b = [\n    1,\n    2\n  ];");
}

#[test]
fn function_declaration() {
    let sum = json!({"type": "BinaryExpression", "operator": "+", "left": id("a"), "right": id("b")});
    let ast = program(vec![json!({
        "type": "FunctionDeclaration",
        "id": id("add"),
        "params": [id("a"), id("b")],
        "body": block(vec![json!({"type": "ReturnStatement", "argument": sum})]),
        "generator": false,
        "async": false
    })]);
    assert_eq!(render(ast), "function add(a, b) {\n  return a + b;\n}");
}

#[test]
fn async_generator_function() {
    let ast = json!({
        "type": "FunctionDeclaration",
        "id": id("g"),
        "params": [],
        "body": block(vec![]),
        "generator": true,
        "async": true
    });
    assert_eq!(render(ast), "async function* g() {\n}");
}

#[test]
fn class_with_members() {
    let ctor = json!({
        "type": "MethodDefinition",
        "kind": "constructor",
        "static": false,
        "computed": false,
        "key": id("constructor"),
        "value": {
            "type": "FunctionExpression",
            "id": null,
            "params": [],
            "body": block(vec![expr_stmt(call(json!({"type": "Super"}), vec![]))])
        }
    });
    let field = json!({
        "type": "PropertyDefinition",
        "static": true,
        "computed": false,
        "key": id("x"),
        "value": num(1)
    });
    let ast = json!({
        "type": "ClassDeclaration",
        "id": id("A"),
        "superClass": id("B"),
        "body": {"type": "ClassBody", "body": [ctor, field]}
    });
    assert_eq!(
        render(ast),
        "class A extends B {\n  constructor() {\n    super();\n  }\n  static x = 1;\n}"
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Control flow
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn if_else_blocks() {
    let ast = json!({
        "type": "IfStatement",
        "test": id("a"),
        "consequent": block(vec![expr_stmt(call(id("b"), vec![]))]),
        "alternate": block(vec![expr_stmt(call(id("c"), vec![]))])
    });
    assert_eq!(render(ast), "if (a) {\n  b();\n} else {\n  c();\n}");
}

#[test]
fn else_if_chain() {
    let inner = json!({"type": "IfStatement", "test": id("b"), "consequent": block(vec![]), "alternate": null});
    let ast = json!({"type": "IfStatement", "test": id("a"), "consequent": block(vec![]), "alternate": inner});
    assert_eq!(render(ast), "if (a) {\n} else if (b) {\n}");
}

#[test]
fn unbraced_bodies_go_on_their_own_line() {
    let ast = json!({
        "type": "IfStatement",
        "test": id("a"),
        "consequent": expr_stmt(call(id("b"), vec![])),
        "alternate": expr_stmt(call(id("c"), vec![]))
    });
    assert_eq!(render(ast), "if (a)\n  b();\nelse\n  c();");
}

#[test]
fn classic_for_loop() {
    let ast = json!({
        "type": "ForStatement",
        "init": declare("let", vec![("i", Some(num(0)))]),
        "test": {"type": "BinaryExpression", "operator": "<", "left": id("i"), "right": id("n")},
        "update": {"type": "UpdateExpression", "operator": "++", "prefix": false, "argument": id("i")},
        "body": block(vec![])
    });
    assert_eq!(render(ast), "for (let i = 0; i < n; i++) {\n}");
}

#[test]
fn empty_for_head() {
    let ast = json!({"type": "ForStatement", "init": null, "test": null, "update": null, "body": block(vec![])});
    assert_eq!(render(ast), "for (;;) {\n}");
}

#[test]
fn for_of_with_declaration() {
    let ast = json!({
        "type": "ForOfStatement",
        "await": false,
        "left": declare("const", vec![("x", None)]),
        "right": id("xs"),
        "body": block(vec![])
    });
    assert_eq!(render(ast), "for (const x of xs) {\n}");
}

#[test]
fn switch_cases_sit_at_switch_level() {
    let ast = json!({
        "type": "SwitchStatement",
        "discriminant": id("x"),
        "cases": [
            {"type": "SwitchCase", "test": num(1), "consequent": [
                expr_stmt(call(id("a"), vec![])),
                {"type": "BreakStatement", "label": null}
            ]},
            {"type": "SwitchCase", "test": null, "consequent": [expr_stmt(call(id("b"), vec![]))]}
        ]
    });
    assert_eq!(
        render(ast),
        "switch (x) {\ncase 1:\n  a();\n  break;\ndefault:\n  b();\n}"
    );
}

#[test]
fn try_catch_finally() {
    let ast = json!({
        "type": "TryStatement",
        "block": block(vec![]),
        "handler": {"type": "CatchClause", "param": id("e"), "body": block(vec![])},
        "finalizer": block(vec![])
    });
    assert_eq!(render(ast), "try {\n} catch (e) {\n} finally {\n}");
}

#[test]
fn do_while() {
    let ast = json!({"type": "DoWhileStatement", "body": block(vec![]), "test": id("a")});
    assert_eq!(render(ast), "do {\n} while (a);");
}

#[test]
fn labeled_loop_moves_to_its_own_line() {
    let ast = json!({
        "type": "LabeledStatement",
        "label": id("outer"),
        "body": {"type": "WhileStatement", "test": {"type": "Literal", "value": true},
            "body": block(vec![json!({"type": "ContinueStatement", "label": id("outer")})])}
    });
    assert_eq!(render(ast), "outer:\n  while (true) {\n    continue outer;\n  }");
}

// ═════════════════════════════════════════════════════════════════════════
// Expression statements
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn object_literal_statement_is_parenthesized() {
    let obj = json!({"type": "ObjectExpression", "properties": [
        {"type": "Property", "kind": "init", "key": id("a"), "value": num(1),
         "shorthand": false, "method": false, "computed": false}
    ]});
    assert_eq!(render(program(vec![expr_stmt(obj)])), "({ a: 1 });");
}

#[test]
fn immediately_invoked_function() {
    let func = json!({"type": "FunctionExpression", "id": null, "params": [], "body": block(vec![])});
    assert_eq!(render(expr_stmt(call(func, vec![]))), "(function () {\n}());");
}

#[test]
fn multi_property_object_breaks_lines() {
    let obj = json!({"type": "ObjectExpression", "properties": [
        {"type": "Property", "kind": "init", "key": id("a"), "value": num(1), "shorthand": false},
        {"type": "Property", "kind": "init", "key": id("b"), "value": id("b"), "shorthand": true}
    ]});
    let assign = json!({"type": "AssignmentExpression", "operator": "=", "left": id("x"), "right": obj});
    assert_eq!(render(expr_stmt(assign)), "x = {\n  a: 1,\n  b\n};");
}

#[test]
fn directive_prologue_keeps_string_form() {
    let ast = program(vec![
        json!({"type": "ExpressionStatement", "expression": string("use strict"), "directive": "use strict"}),
        expr_stmt(call(id("f"), vec![])),
    ]);
    assert_eq!(render(ast), "'use strict';\nf();");
}

// ═════════════════════════════════════════════════════════════════════════
// Modules
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn import_default_and_single_named() {
    let ast = json!({
        "type": "ImportDeclaration",
        "specifiers": [
            {"type": "ImportDefaultSpecifier", "local": id("a")},
            {"type": "ImportSpecifier", "imported": id("b"), "local": id("c")}
        ],
        "source": string("m")
    });
    assert_eq!(render(ast), "import a, { b as c } from 'm';");
}

#[test]
fn import_many_named_breaks_lines() {
    let ast = json!({
        "type": "ImportDeclaration",
        "specifiers": [
            {"type": "ImportSpecifier", "imported": id("a"), "local": id("a")},
            {"type": "ImportSpecifier", "imported": id("b"), "local": id("b")}
        ],
        "source": string("m")
    });
    assert_eq!(render(ast), "import {\n  a,\n  b\n} from 'm';");
}

#[test]
fn import_namespace_and_bare() {
    let ns = json!({
        "type": "ImportDeclaration",
        "specifiers": [{"type": "ImportNamespaceSpecifier", "local": id("ns")}],
        "source": string("m")
    });
    assert_eq!(render(ns), "import * as ns from 'm';");
    let bare = json!({"type": "ImportDeclaration", "specifiers": [], "source": string("m")});
    assert_eq!(render(bare), "import 'm';");
}

#[test]
fn export_forms() {
    let named = json!({
        "type": "ExportNamedDeclaration",
        "declaration": null,
        "specifiers": [{"type": "ExportSpecifier", "local": id("a"), "exported": id("b")}],
        "source": null
    });
    assert_eq!(render(named), "export {\n  a as b\n};");

    let empty = json!({"type": "ExportNamedDeclaration", "declaration": null, "specifiers": [], "source": null});
    assert_eq!(render(empty), "export { };");

    let decl = json!({
        "type": "ExportNamedDeclaration",
        "declaration": declare("const", vec![("x", Some(num(1)))]),
        "specifiers": [],
        "source": null
    });
    assert_eq!(render(decl), "export const x = 1;");

    let default = json!({"type": "ExportDefaultDeclaration", "declaration": num(1)});
    assert_eq!(render(default), "export default 1;");

    let all = json!({"type": "ExportAllDeclaration", "exported": id("ns"), "source": string("m")});
    assert_eq!(render(all), "export * as ns from 'm';");
}

// ═════════════════════════════════════════════════════════════════════════
// Options and roots
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn custom_indent_and_quotes() {
    let ast = program(vec![json!({
        "type": "FunctionDeclaration",
        "id": id("f"),
        "params": [],
        "body": block(vec![json!({"type": "ReturnStatement", "argument": string("x")})])
    })]);
    let options = GenerateOptions::default()
        .with_indent("\t")
        .with_quotes(QuoteStyle::Double);
    assert_eq!(generate(&ast, &options).unwrap(), "function f() {\n\treturn \"x\";\n}");
}

#[test]
fn expression_root_renders_without_semicolon() {
    let ast = json!({"type": "BinaryExpression", "operator": "+", "left": id("a"), "right": num(2)});
    assert_eq!(render(ast), "a + 2");
}

#[test]
fn empty_program_is_empty_text() {
    assert_eq!(render(program(vec![])), "");
}

// ═════════════════════════════════════════════════════════════════════════
// Failures
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn malformed_json_is_a_parse_error() {
    let err = json_to_code("{", &GenerateOptions::default()).unwrap_err();
    assert!(matches!(err, CodegenError::Parse(_)));
}

#[test]
fn non_node_root_is_rejected() {
    let err = json_to_code("[1, 2]", &GenerateOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        CodegenError::Generate(GenerateError::NotANode { found: "an array" })
    ));
    let err = json_to_code(r#"{"a": 1}"#, &GenerateOptions::default()).unwrap_err();
    assert!(matches!(err, CodegenError::Generate(GenerateError::Untyped)));
}

#[test]
fn unknown_root_type_is_reported() {
    let err = json_to_code(r#"{"type": "Foo"}"#, &GenerateOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown node type: Foo");
}

#[test]
fn unknown_nested_statement_is_reported() {
    let json = r#"{"type": "Program", "body": [{"type": "Foo"}]}"#;
    let err = json_to_code(json, &GenerateOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown statement type: Foo");
}

#[test]
fn missing_child_is_reported() {
    let json = r#"{"type": "ExpressionStatement"}"#;
    let err = json_to_code(json, &GenerateOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "ExpressionStatement is missing required field `expression`"
    );
}
