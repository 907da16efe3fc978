use ecma_pt::{parse_script, ErrorCode, Node, ParserOptions};
use pretty_assertions::assert_eq;

fn script(source: &str) -> Vec<Node> {
    let (program, errors) = parse_script(source, ParserOptions::script()).unwrap();
    assert!(errors.is_empty(), "unexpected diagnostics: {errors:?}");
    let Node::Program(p) = program else { unreachable!() };
    p.body
}

#[test]
fn for_loop_with_ordinary_head() {
    let body = script("for (let i = 0; i < 10; i++) {}");
    let Node::ForStatement(f) = &body[0] else {
        panic!("expected a for statement, got {:?}", body[0])
    };
    assert!(f.init.is_some());
    assert!(f.test.is_some());
    assert!(f.update.is_some());
}

#[test]
fn for_in_head_is_disambiguated_from_ordinary_for() {
    let body = script("for (let k in obj) {}");
    let Node::ForInStatement(f) = &body[0] else {
        panic!("expected a for-in statement, got {:?}", body[0])
    };
    assert!(matches!(&*f.left, Node::VariableDeclaration(_)));
}

#[test]
fn for_of_with_existing_binding_as_left_hand_side() {
    let body = script("for (x of list) {}");
    let Node::ForOfStatement(f) = &body[0] else {
        panic!("expected a for-of statement, got {:?}", body[0])
    };
    assert!(matches!(&*f.left, Node::Identifier(_)));
    assert!(!f.is_await);
}

#[test]
fn for_await_of_requires_async_context() {
    let (program, errors) = parse_script(
        "async function f() { for await (const x of xs) {} }",
        ParserOptions::script(),
    )
    .unwrap();
    assert!(errors.is_empty());
    let Node::Program(p) = program else { unreachable!() };
    let Node::FunctionDeclaration(func) = &p.body[0] else {
        unreachable!()
    };
    let Node::BlockStatement(block) = &*func.body else {
        unreachable!()
    };
    let Node::ForOfStatement(f) = &block.body[0] else {
        panic!("expected a for-await-of statement")
    };
    assert!(f.is_await);
}

#[test]
fn break_to_unknown_label_is_an_error() {
    let err = parse_script("outer: { break inner; }", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownLabel);
}

#[test]
fn continue_to_a_non_loop_label_is_rejected() {
    let err = parse_script("outer: { continue outer; }", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::IllegalBreakOrContinueTarget);
}

#[test]
fn continue_to_a_loop_label_is_accepted() {
    let body = script("outer: for (;;) { continue outer; }");
    assert!(matches!(body[0], Node::LabeledStatement(_)));
}

#[test]
fn continue_to_a_label_chained_directly_onto_a_loop_is_accepted() {
    let body = script("outer: inner: for (;;) { continue outer; }");
    assert!(matches!(body[0], Node::LabeledStatement(_)));
}

#[test]
fn return_outside_a_function_is_rejected_by_default() {
    let err = parse_script("return 1;", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::ReturnOutsideFunction);
}

#[test]
fn return_outside_a_function_can_be_allowed() {
    let options = ParserOptions {
        allow_return_outside_function: true,
        ..ParserOptions::script()
    };
    let (_, errors) = parse_script("return 1;", options).unwrap();
    assert!(errors.is_empty());
}

#[test]
fn catch_binds_a_simple_identifier_without_a_pattern() {
    let body = script("try {} catch (e) { e; }");
    let Node::TryStatement(t) = &body[0] else {
        panic!("expected a try statement")
    };
    let Some(handler) = &t.handler else {
        panic!("expected a catch clause")
    };
    let Node::CatchClause(c) = &**handler else {
        unreachable!()
    };
    assert!(matches!(c.param.as_deref(), Some(Node::Identifier(_))));
}

#[test]
fn catch_without_a_binding_parameter_is_allowed() {
    let body = script("try {} catch { }");
    let Node::TryStatement(t) = &body[0] else {
        panic!("expected a try statement")
    };
    let Node::CatchClause(c) = &**t.handler.as_ref().unwrap() else {
        unreachable!()
    };
    assert!(c.param.is_none());
}

#[test]
fn switch_rejects_more_than_one_default_case() {
    let err = parse_script(
        "switch (x) { default: break; default: break; }",
        ParserOptions::script(),
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedToken);
}

#[test]
fn redeclaring_a_lexical_binding_in_the_same_scope_is_rejected() {
    let err = parse_script("let x = 1; let x = 2;", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateLexicalBinding);
}

#[test]
fn var_redeclaration_across_nested_blocks_is_fine() {
    let (_, errors) = parse_script("var x = 1; { var x = 2; }", ParserOptions::script()).unwrap();
    assert!(errors.is_empty());
}

#[test]
fn with_statement_is_rejected_in_strict_mode() {
    let err = parse_script("\"use strict\"; with (x) {}", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedToken);
}

#[test]
fn with_statement_is_allowed_in_sloppy_mode() {
    let body = script("with (x) { y; }");
    assert!(matches!(body[0], Node::WithStatement(_)));
}

#[test]
fn automatic_semicolon_insertion_across_a_line_break() {
    let body = script("let a = 1\nlet b = 2\n");
    assert_eq!(body.len(), 2);
}

#[test]
fn no_line_break_allowed_between_throw_and_its_argument() {
    let err = parse_script("throw\n1;", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedToken);
}
