//! A hand-written recursive-descent tokenizer and parser for ECMAScript, producing an
//! [ESTree](https://github.com/estree/estree)-shaped abstract syntax tree.
//!
//! # Overview
//!
//! Parsers for languages like JavaScript are usually hand-written rather than generated,
//! because the grammar is full of context-sensitive disambiguation (`/` as division vs. a
//! regex literal, `(a, b) => ...` vs. a parenthesized comma expression, automatic semicolon
//! insertion) that doesn't map cleanly onto a generic combinator toolkit. This crate commits
//! to that: one fixed grammar, scanned and parsed directly, with every syntax ambiguity
//! resolved by an explicit disambiguation rule rather than backtracking over arbitrary
//! productions.
//!
//! # Example
//!
//! ```
//! use ecma_pt::{parse_script, ParserOptions};
//!
//! let options = ParserOptions::script();
//! let (program, errors) = parse_script("const x = 1 + 2;", options).unwrap();
//! assert!(errors.is_empty());
//! let json = serde_json::to_string(&program).unwrap();
//! assert!(json.contains("\"type\":\"Program\""));
//! ```
//!
//! # Design
//!
//! - [`source`] wraps the input text and answers the byte-offset/line-column/Unicode-category
//!   questions the scanner needs.
//! - [`token`] and [`keyword`] define the token family and reserved-word classification.
//! - [`lexer`] is the character-level scanner, including the regex-vs-division rescan and the
//!   template-literal re-entry after `${ ... }`.
//! - [`scope`] tracks declarations for the early errors that need them (duplicate bindings,
//!   `let`/`const` redeclaration, etc.).
//! - [`ast`] is the closed ESTree `Node` enum, with `serde::Serialize` for JSON output and a
//!   `ptree`-based pretty printer for debugging.
//! - [`parser`] drives the above into a `Program`.
//! - [`options`] holds the parser configuration (spec §6).
//! - [`error`] holds the diagnostics: [`ParseError`], [`ErrorCode`], and the tolerant-mode
//!   [`Diagnostics`] collector.
pub mod ast;
mod error;
mod keyword;
mod lexer;
mod options;
mod parser;
mod position;
mod scope;
mod source;
mod token;

pub use ast::Node;
pub use error::{Diagnostics, ErrorCode, ImplementationError, Log, ParseError};
pub use options::{AllowReserved, EcmaVersion, ParserOptions, SourceType};
pub use parser::Parser;
pub use position::{Loc, Position, Range};
pub use source::Code;

/// Parse a complete ECMAScript script (non-module) source, returning the `Program` node and
/// any diagnostics accumulated in tolerant mode. Non-tolerant mode raises the first error
/// through `Err` instead, leaving the returned `Vec` always empty.
pub fn parse_script(source: &str, mut options: ParserOptions) -> Result<(Node, Vec<ParseError>), ParseError> {
    options.source_type = SourceType::Script;
    let code = Code::new(source);
    Parser::new(&code, options)?.parse_program()
}

/// Parse a complete ECMAScript module source, returning the `Program` node and any
/// diagnostics accumulated in tolerant mode.
pub fn parse_module(source: &str, mut options: ParserOptions) -> Result<(Node, Vec<ParseError>), ParseError> {
    options.source_type = SourceType::Module;
    let code = Code::new(source);
    Parser::new(&code, options)?.parse_program()
}

/// Parse a single standalone expression, rejecting any trailing input after it.
pub fn parse_expression(source: &str, options: ParserOptions) -> Result<Node, ParseError> {
    let code = Code::new(source);
    Parser::new(&code, options)?.parse_single_expression()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_trivial_script() {
        let (program, errors) = parse_script("let x = 1;", ParserOptions::script()).unwrap();
        assert!(errors.is_empty());
        assert!(matches!(program, Node::Program(_)));
    }

    #[test]
    fn parses_a_trivial_module() {
        let (program, errors) =
            parse_module("export default 1;", ParserOptions::module()).unwrap();
        assert!(errors.is_empty());
        assert!(matches!(program, Node::Program(_)));
    }

    #[test]
    fn rejects_module_syntax_in_a_script() {
        let err = parse_script("export default 1;", ParserOptions::script()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ModuleSyntaxInScript);
    }

    #[test]
    fn parse_expression_rejects_trailing_input() {
        assert!(parse_expression("1 + 2", ParserOptions::default()).is_ok());
        assert!(parse_expression("1 + 2 3", ParserOptions::default()).is_err());
    }
}
