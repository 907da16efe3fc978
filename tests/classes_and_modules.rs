use ecma_pt::{parse_module, parse_script, ErrorCode, Node, ParserOptions};

fn script_body(source: &str) -> Vec<Node> {
    let (program, errors) = parse_script(source, ParserOptions::script()).unwrap();
    assert!(errors.is_empty(), "unexpected diagnostics: {errors:?}");
    let Node::Program(p) = program else { unreachable!() };
    p.body
}

fn module_body(source: &str) -> Vec<Node> {
    let (program, errors) = parse_module(source, ParserOptions::module()).unwrap();
    assert!(errors.is_empty(), "unexpected diagnostics: {errors:?}");
    let Node::Program(p) = program else { unreachable!() };
    p.body
}

#[test]
fn class_with_constructor_and_method_reclassifies_constructor() {
    let body = script_body(
        "class Point { constructor(x) { this.x = x; } dist() { return this.x; } }",
    );
    let Node::ClassDeclaration(c) = &body[0] else {
        panic!("expected a class declaration")
    };
    let Node::ClassBody(cb) = &*c.body else { unreachable!() };
    assert_eq!(cb.body.len(), 2);
    let Node::MethodDefinition(ctor) = &cb.body[0] else {
        panic!("expected a method definition")
    };
    assert_eq!(ctor.kind, ecma_pt::ast::MethodKind::Constructor);
    let Node::MethodDefinition(m) = &cb.body[1] else {
        panic!("expected a method definition")
    };
    assert_eq!(m.kind, ecma_pt::ast::MethodKind::Method);
}

#[test]
fn getter_and_setter_share_a_private_name() {
    let body = script_body(
        "class C { get #x() { return 1; } set #x(v) {} }",
    );
    let Node::ClassDeclaration(c) = &body[0] else { unreachable!() };
    let Node::ClassBody(cb) = &*c.body else { unreachable!() };
    assert_eq!(cb.body.len(), 2);
}

#[test]
fn duplicate_private_method_name_is_rejected() {
    let err = parse_script("class C { #x() {} #x() {} }", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicatePrivateName);
}

#[test]
fn private_name_clashing_with_an_accessor_is_rejected() {
    let err = parse_script("class C { get #x() { return 1; } #x() {} }", ParserOptions::script())
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicatePrivateName);
}

#[test]
fn static_block_runs_in_method_context_so_super_is_legal() {
    let body = script_body("class C extends Base { static { super.ready; } }");
    let Node::ClassDeclaration(c) = &body[0] else { unreachable!() };
    let Node::ClassBody(cb) = &*c.body else { unreachable!() };
    assert!(matches!(cb.body[0], Node::StaticBlock(_)));
}

#[test]
fn class_field_initializer_may_reference_super_property() {
    let body = script_body("class C extends Base { x = super.y; }");
    let Node::ClassDeclaration(c) = &body[0] else { unreachable!() };
    let Node::ClassBody(cb) = &*c.body else { unreachable!() };
    assert!(matches!(cb.body[0], Node::PropertyDefinition(_)));
}

#[test]
fn class_body_is_always_strict_even_in_sloppy_script() {
    // An octal numeric literal is only an error in strict mode; inside any class body it
    // must be rejected regardless of the surrounding script's mode.
    let err = parse_script("class C { m() { return 010; } }", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::LegacyOctalLiteralInStrictMode);
}

#[test]
fn default_import_and_named_imports_share_one_declaration() {
    let body = module_body("import def, { a, b as c } from \"mod\";");
    let Node::ImportDeclaration(imp) = &body[0] else {
        panic!("expected an import declaration")
    };
    assert_eq!(imp.specifiers.len(), 3);
    assert!(matches!(imp.specifiers[0], Node::ImportDefaultSpecifier(_)));
    assert!(matches!(imp.specifiers[1], Node::ImportSpecifier(_)));
}

#[test]
fn namespace_import() {
    let body = module_body("import * as ns from \"mod\";");
    let Node::ImportDeclaration(imp) = &body[0] else { unreachable!() };
    assert!(matches!(imp.specifiers[0], Node::ImportNamespaceSpecifier(_)));
}

#[test]
fn export_default_expression() {
    let body = module_body("export default 42;");
    assert!(matches!(body[0], Node::ExportDefaultDeclaration(_)));
}

#[test]
fn export_named_list_and_re_export_star() {
    let body = module_body("const a = 1; export { a };\nexport * from \"other\";");
    assert!(matches!(body[1], Node::ExportNamedDeclaration(_)));
    assert!(matches!(body[2], Node::ExportAllDeclaration(_)));
}

#[test]
fn duplicate_export_name_across_declarations_is_rejected() {
    let err = parse_module(
        "export const a = 1;\nexport { a as a };",
        ParserOptions::module(),
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateExportName);
}

#[test]
fn import_declarations_are_rejected_in_plain_scripts() {
    let err = parse_script("import x from \"mod\";", ParserOptions::script()).unwrap_err();
    assert_eq!(err.code, ErrorCode::ModuleSyntaxInScript);
}

#[test]
fn import_attributes_are_parsed() {
    let body = module_body("import data from \"./data.json\" with { type: \"json\" };");
    let Node::ImportDeclaration(imp) = &body[0] else { unreachable!() };
    assert_eq!(imp.attributes.len(), 1);
}
