use ecma_pt::{parse_expression, parse_script, ErrorCode, Node, ParserOptions};
use pretty_assertions::assert_eq;

fn expr(source: &str) -> Node {
    parse_expression(source, ParserOptions::default()).unwrap()
}

fn script(source: &str) -> Vec<Node> {
    let (program, errors) = parse_script(source, ParserOptions::script()).unwrap();
    assert!(errors.is_empty(), "unexpected diagnostics: {errors:?}");
    let Node::Program(p) = program else { unreachable!() };
    p.body
}

#[test]
fn binary_precedence_climbs_over_additive() {
    let node = expr("1 + 2 * 3");
    let Node::BinaryExpression(add) = node else {
        panic!("expected a binary expression, got {node:?}")
    };
    assert_eq!(&*add.operator, "+");
    assert!(matches!(&*add.left, Node::Literal(_)));
    let Node::BinaryExpression(mul) = &*add.right else {
        panic!("right operand should itself be a binary expression")
    };
    assert_eq!(&*mul.operator, "*");
}

#[test]
fn exponent_is_right_associative() {
    // 2 ** 3 ** 2 parses as 2 ** (3 ** 2), not (2 ** 3) ** 2.
    let node = expr("2 ** 3 ** 2");
    let Node::BinaryExpression(outer) = node else {
        panic!("expected a binary expression")
    };
    assert_eq!(&*outer.operator, "**");
    assert!(matches!(&*outer.left, Node::Literal(_)));
    let Node::BinaryExpression(inner) = &*outer.right else {
        panic!("right operand should be the nested exponentiation")
    };
    assert_eq!(&*inner.operator, "**");
}

#[test]
fn unparenthesized_unary_before_exponent_is_rejected() {
    let err = parse_expression("-2 ** 3", ParserOptions::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnparenthesizedUnaryExponent);
    // Parenthesizing the unary operand fixes it.
    assert!(parse_expression("(-2) ** 3", ParserOptions::default()).is_ok());
}

#[test]
fn yield_in_a_generators_own_parameter_default_is_rejected() {
    let err = parse_script("function* g(a = yield) {}", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::YieldOutsidePermittedPosition);
}

#[test]
fn await_in_an_async_functions_own_parameter_default_is_rejected() {
    let err = parse_script("async function f(a = await 1) {}", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::AwaitOutsidePermittedPosition);
}

#[test]
fn await_in_an_async_arrows_own_parameter_default_is_rejected() {
    let err = parse_script("const f = async (a = await 1) => a;", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::AwaitOutsidePermittedPosition);
}

#[test]
fn yield_in_an_ordinary_arrows_parameter_default_borrows_the_enclosing_generator() {
    // The arrow's own params are reinterpreted from an already-parsed parenthesized
    // expression, so they use the *enclosing* generator's `yield`, not their own.
    let body = script("function* g() { const h = (a = yield 1) => a; }");
    assert!(matches!(body[0], Node::FunctionDeclaration(_)));
}

#[test]
fn logical_operators_cannot_mix_without_parens() {
    let err = parse_expression("a ?? b || c", ParserOptions::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::MixedLogicalNullish);
    assert!(parse_expression("(a ?? b) || c", ParserOptions::default()).is_ok());
}

#[test]
fn optional_chain_wraps_the_whole_chain_once() {
    let node = expr("a?.b.c");
    let Node::ChainExpression(chain) = node else {
        panic!("expected a chain expression wrapping the optional access, got {node:?}")
    };
    let Node::MemberExpression(outer) = &*chain.expression else {
        panic!("expected the chain body to be a member expression")
    };
    assert!(!outer.optional, "the trailing .c access is not itself optional");
    assert!(matches!(&*outer.object, Node::MemberExpression(_)));
}

#[test]
fn division_after_identifier_is_not_a_regex() {
    let node = expr("a / b / c");
    assert!(matches!(node, Node::BinaryExpression(_)));
}

#[test]
fn regex_literal_after_keyword_is_allowed() {
    let node = expr("(function () { return /foo/g; })");
    // Just confirm it parses as a function expression wrapping a regex-literal return.
    assert!(matches!(node, Node::ParenthesizedExpression(_) | Node::FunctionExpression(_)));
}

#[test]
fn arrow_function_vs_parenthesized_expression() {
    let node = expr("(a, b) => a + b");
    let Node::ArrowFunctionExpression(f) = node else {
        panic!("expected an arrow function expression, got {node:?}")
    };
    assert_eq!(f.params.len(), 2);
    assert!(f.expression, "a bare-expression arrow body is not a BlockStatement");

    let node = expr("(a, b)");
    assert!(matches!(node, Node::SequenceExpression(_) | Node::ParenthesizedExpression(_)));
}

#[test]
fn async_arrow_vs_async_identifier_call() {
    let node = expr("async (x) => x");
    let Node::ArrowFunctionExpression(f) = node else {
        panic!("expected an async arrow function, got {node:?}")
    };
    assert!(f.is_async);

    let node = expr("async(x)");
    assert!(matches!(node, Node::CallExpression(_)));
}

#[test]
fn template_literal_round_trips_expressions_and_quasis() {
    let node = expr("`a${1 + 1}b`");
    let Node::TemplateLiteral(t) = node else {
        panic!("expected a template literal, got {node:?}")
    };
    assert_eq!(t.quasis.len(), 2);
    assert_eq!(t.expressions.len(), 1);
    assert!(matches!(&t.expressions[0], Node::BinaryExpression(_)));
}

#[test]
fn array_and_object_destructuring_targets_convert_from_literal_cover_grammar() {
    let (program, errors) = parse_script("let [a, {b, c = 1}] = x;", ParserOptions::script()).unwrap();
    assert!(errors.is_empty());
    let Node::Program(p) = program else { unreachable!() };
    assert_eq!(p.body.len(), 1);
    let Node::VariableDeclaration(decl) = &p.body[0] else {
        panic!("expected a variable declaration")
    };
    let Node::VariableDeclarator(d) = &decl.declarations[0] else {
        panic!("expected a single declarator")
    };
    assert!(matches!(&*d.id, Node::ArrayPattern(_)));
}

#[test]
fn node_ranges_cover_the_full_source_text() {
    let source = "1 + 2";
    let node = expr(source);
    let Node::BinaryExpression(b) = node else { unreachable!() };
    assert_eq!(b.base.range.start, 0);
    assert_eq!(b.base.range.end, source.len());
}

#[test]
fn trailing_input_after_a_standalone_expression_is_an_error() {
    assert!(parse_expression("1 + 2 3", ParserOptions::default()).is_err());
}
