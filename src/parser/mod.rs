//! The recursive-descent ECMAScript parser. `Parser` drives a [`Lexer`] token-at-a-time,
//! dispatching across five files split by grammar area (spec §4.3): [`expr`] (expressions,
//! precedence climbing, the arrow/destructuring cover grammars), [`stmt`] (statements, ASI),
//! [`pattern`] (binding patterns), [`class`] (class bodies) and [`module`] (import/export).
//!
//! Generalizes the teacher crate's `DefaultParser`/`LexerlessParser` (`src/parsing.rs`) —
//! which drive a caller-supplied `Rc<dyn IProduction>` grammar — into a parser for one fixed,
//! already-known grammar: the entry points (`new`, `parse_program`) keep the same shape, but
//! there is no grammar object to thread through; the grammar is simply the rest of this module.

mod class;
mod expr;
mod module;
mod pattern;
mod stmt;

use crate::ast::*;
use crate::error::{Diagnostics, ErrorCode, ParseError};
use crate::keyword;
use crate::lexer::Lexer;
use crate::options::{ParserOptions, SourceType};
use crate::position::{Loc, Marker, NodeBase, Position, Range};
use crate::scope::ScopeTracker;
use crate::source::Code;
use crate::token::{NumberValue, Punct, Token, TokenKind, TokenValue};

fn base(start: Marker, end: Marker) -> NodeBase {
    NodeBase::new(Range::new(start.index, end.index), Loc::new(start.position(), end.position()))
}

#[derive(Debug, Clone, Copy)]
struct Context {
    strict: bool,
    module: bool,
    in_function: bool,
    in_generator: bool,
    in_async: bool,
    in_loop: bool,
    in_switch: bool,
    /// The `[In]` grammar parameter: `false` while parsing a `for(;;)` head's init expression,
    /// where a bare `in` must end the expression rather than be parsed as the `in` operator.
    allow_in: bool,
    /// Set while parsing the body of a class method/getter/setter/constructor, where `super`
    /// (as a property access or, in the constructor of a derived class, a call) is legal.
    in_method: bool,
    /// Set while parsing a function's own formal parameter list (default value expressions).
    /// A generator/async function's own `yield`/`await` may not appear there — the binding
    /// values are evaluated before the function's own generator/async machinery is active.
    in_parameters: bool,
}

/// One enclosing class body's private-name bookkeeping: the names declared so far, and the
/// `this.#x`/`obj.#x` references seen so far that haven't yet been resolved against them.
/// Private names are lexically scoped to the whole class body regardless of declaration order
/// (a method may reference a field declared later in the same class), so references are
/// deferred rather than checked the moment they're parsed — see `Parser::pop_class_private_scope`.
#[derive(Default)]
struct ClassPrivateScope {
    declared: std::collections::HashSet<String>,
    pending_uses: Vec<(String, usize)>,
}

pub struct Parser<'c> {
    lexer: Lexer<'c>,
    cur: Token,
    prev_end: Marker,
    diagnostics: Diagnostics,
    scope: ScopeTracker,
    ctx: Context,
    labels: Vec<(String, bool)>,
    /// Names already exported by this program, for the duplicate-export-name early error —
    /// the one module-level check that needs a whole-program view rather than local context.
    exported_names: std::collections::HashSet<String>,
    /// One frame per lexically enclosing class body, innermost last (spec §8).
    class_private_scopes: Vec<ClassPrivateScope>,
    /// `export { local }` names with no re-export `source`, checked once the whole program has
    /// been parsed against what `scope` actually declared (spec §4.3's "all exported names must
    /// be declared or re-exported").
    pending_export_checks: Vec<(String, usize)>,
}

/// A snapshot of parser position, used to backtrack when a grammar needs lookahead past
/// what a single buffered token can answer (arrow-function-params vs parenthesized
/// expression, `async` followed by an arrow parameter list).
struct Snapshot {
    lexer_marker: Marker,
    cur: Token,
    prev_end: Marker,
}

impl<'c> Parser<'c> {
    pub fn new(code: &'c Code<'c>, options: ParserOptions) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(code, options);
        let cur = lexer.next_token()?;
        let module = options.source_type == SourceType::Module;
        // Top-level `await` (spec.md overview, SPEC_FULL.md §9): every module top level is an
        // implicit async context, and a script may opt into the same via
        // `allow_await_outside_function`. A nested ordinary (non-async) function overwrites
        // `ctx.in_async = false` on entry and restores this value on exit, so this only ever
        // reaches code actually at the top level.
        let top_level_await = module || options.allow_await_outside_function;
        Ok(Self {
            lexer,
            cur,
            prev_end: Marker::new(0, 1, 0),
            diagnostics: Diagnostics::new(options.tolerant),
            scope: ScopeTracker::new(),
            ctx: Context {
                strict: module,
                module,
                in_function: false,
                in_generator: false,
                in_async: top_level_await,
                in_loop: false,
                in_switch: false,
                allow_in: true,
                in_method: false,
                in_parameters: false,
            },
            labels: Vec::new(),
            exported_names: std::collections::HashSet::new(),
            class_private_scopes: Vec::new(),
            pending_export_checks: Vec::new(),
        })
    }

    /// Whether the program's directive prologue contains `"use strict"`, checked without
    /// committing to a full parse since it must be known before the rest of the program (every
    /// statement's strict-mode rules) is parsed. Mirrors `expr::body_starts_with_use_strict`,
    /// generalized from a `{ ... }` function body to a bare statement list with no brace.
    fn program_starts_with_use_strict(&mut self) -> Result<bool, ParseError> {
        let snap = self.snapshot();
        let result = (|| -> Result<bool, ParseError> {
            loop {
                if self.cur.kind != TokenKind::Str {
                    return Ok(false);
                }
                let raw = self.raw_text(self.cur.range);
                let is_use_strict = &*raw == "\"use strict\"" || &*raw == "'use strict'";
                self.bump()?;
                let ends_directive = self.eat(Punct::Semi)? || self.can_insert_semicolon() || self.is_eof();
                if !ends_directive {
                    return Ok(false);
                }
                if is_use_strict {
                    return Ok(true);
                }
            }
        })();
        self.restore(snap);
        result
    }

    /// Parse a full program, returning the `Program` node and whatever errors tolerant mode
    /// accumulated along the way (always empty in non-tolerant mode, which raises the first
    /// error as `Err` instead).
    pub fn parse_program(mut self) -> Result<(Node, Vec<ParseError>), ParseError> {
        let start = self.marker();
        if self.program_starts_with_use_strict()? {
            self.ctx.strict = true;
        }
        let body = self.parse_statement_list_until(|p| p.is_eof())?;
        self.check_unresolved_exports()?;
        let end = self.prev_end;
        let source_type = if self.ctx.module {
            SourceTypeTag::Module
        } else {
            SourceTypeTag::Script
        };
        let program = Node::Program(Program {
            base: base(start, end),
            body,
            source_type,
        });
        Ok((program, self.diagnostics.into_errors()))
    }

    /// Parse a single standalone expression (used by [`crate::parse_expression`]).
    pub fn parse_single_expression(mut self) -> Result<Node, ParseError> {
        let expr = self.parse_expression()?;
        if !self.is_eof() {
            return Err(self.unexpected("unexpected trailing input"));
        }
        Ok(expr)
    }

    // --- token plumbing -----------------------------------------------------------------

    fn marker(&self) -> Marker {
        Marker::new(self.cur.range.start, self.cur.loc.start.line, self.cur.loc.start.column)
    }

    fn base(&self, start: Marker) -> NodeBase {
        base(start, self.prev_end)
    }

    fn raw_text(&self, range: Range) -> Box<str> {
        self.lexer.code().value[range.start..range.end].into()
    }

    fn bump(&mut self) -> Result<Token, ParseError> {
        self.prev_end = Marker::new(self.cur.range.end, self.cur.loc.end.line, self.cur.loc.end.column);
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.cur, next))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            lexer_marker: self.lexer.marker(),
            cur: self.cur.clone(),
            prev_end: self.prev_end,
        }
    }

    fn restore(&mut self, snap: Snapshot) {
        self.lexer.seek(snap.lexer_marker);
        self.cur = snap.cur;
        self.prev_end = snap.prev_end;
    }

    fn is_punct(&self, p: Punct) -> bool {
        self.cur.is_punct(p)
    }

    fn is_eof(&self) -> bool {
        self.cur.is_eof()
    }

    fn is_word(&self, w: &str) -> bool {
        self.cur.kind == TokenKind::Name && !self.cur.contains_escape && self.cur.word() == Some(w)
    }

    /// True for any of the given bare words, unescaped — used for the multi-word contextual
    /// keyword checks (`async function`, `let`/`const`/`var` dispatch).
    fn is_any_word(&self, words: &[&str]) -> bool {
        self.cur.kind == TokenKind::Name
            && !self.cur.contains_escape
            && self.cur.word().map_or(false, |w| words.contains(&w))
    }

    fn eat(&mut self, p: Punct) -> Result<bool, ParseError> {
        if self.is_punct(p) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn eat_word(&mut self, w: &str) -> Result<bool, ParseError> {
        if self.is_word(w) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, p: Punct) -> Result<Token, ParseError> {
        if self.is_punct(p) {
            self.bump()
        } else {
            Err(self.unexpected(&format!("expected '{:?}'", p)))
        }
    }

    fn expect_word(&mut self, w: &str) -> Result<Token, ParseError> {
        if self.is_word(w) {
            self.bump()
        } else {
            Err(self.unexpected(&format!("expected '{}'", w)))
        }
    }

    fn unexpected(&self, msg: &str) -> ParseError {
        ParseError::new(self.cur.range.start, ErrorCode::UnexpectedToken, msg.to_string(), self.lexer.code())
    }

    fn error_at(&self, pos: usize, code: ErrorCode, msg: impl Into<String>) -> ParseError {
        ParseError::new(pos, code, msg.into(), self.lexer.code())
    }

    fn can_insert_semicolon(&self) -> bool {
        self.cur.preceded_by_line_terminator || self.is_punct(Punct::BraceR) || self.is_eof()
    }

    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.eat(Punct::Semi)? {
            return Ok(());
        }
        if self.can_insert_semicolon() {
            return Ok(());
        }
        Err(self.unexpected("missing semicolon"))
    }

    fn recover_to_statement_boundary(&mut self) -> Result<(), ParseError> {
        loop {
            if self.is_eof() || self.is_punct(Punct::BraceR) {
                break;
            }
            if self.is_punct(Punct::Semi) {
                self.bump()?;
                break;
            }
            self.bump()?;
        }
        Ok(())
    }

    fn parse_statement_list_until(&mut self, stop: impl Fn(&Self) -> bool) -> Result<Vec<Node>, ParseError> {
        let mut body = Vec::new();
        while !stop(self) {
            match self.parse_statement_list_item() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    if self.diagnostics.is_tolerant() {
                        let _ = self.diagnostics.push(err);
                        self.recover_to_statement_boundary()?;
                    } else {
                        return Err(err);
                    }
                }
            }
        }
        Ok(body)
    }

    // --- identifiers ---------------------------------------------------------------------

    /// An identifier reference (an identifier used as a value, e.g. the callee of a call
    /// expression) — rejects ordinary reserved words but not the strict-mode-only
    /// `eval`/`arguments` binding restriction, which only applies to binding positions.
    fn parse_identifier_reference(&mut self) -> Result<Node, ParseError> {
        if self.cur.kind != TokenKind::Name {
            return Err(self.unexpected("expected identifier"));
        }
        let start = self.marker();
        let name = self.cur.word().unwrap().to_string();
        let escaped = self.cur.contains_escape;
        if keyword::is_reserved_word(
            &name,
            self.lexer.options().ecma_version,
            self.ctx.module,
            self.ctx.strict,
            escaped,
            self.lexer.options().allow_reserved,
        ) {
            return Err(self.error_at(
                start.index,
                ErrorCode::ReservedWordAsIdentifier,
                format!("'{}' is a reserved word", name),
            ));
        }
        self.bump()?;
        Ok(Node::Identifier(Identifier {
            base: self.base(start),
            name: name.into_boxed_str(),
        }))
    }

    /// An identifier in a binding position (declared name, parameter name) — additionally
    /// rejects `eval`/`arguments` in strict mode.
    fn parse_binding_identifier(&mut self) -> Result<Node, ParseError> {
        if self.cur.kind != TokenKind::Name {
            return Err(self.unexpected("expected identifier"));
        }
        let start = self.marker();
        let name = self.cur.word().unwrap().to_string();
        let escaped = self.cur.contains_escape;
        if keyword::is_reserved_binding(
            &name,
            self.lexer.options().ecma_version,
            self.ctx.module,
            self.ctx.strict,
            escaped,
            self.lexer.options().allow_reserved,
        ) {
            return Err(self.error_at(
                start.index,
                ErrorCode::LetOrConstAsIdentifierInStrictMode,
                format!("'{}' cannot be bound as an identifier here", name),
            ));
        }
        self.bump()?;
        Ok(Node::Identifier(Identifier {
            base: self.base(start),
            name: name.into_boxed_str(),
        }))
    }

    /// A property/method/binding-pattern key: `[computed]`, a string or number literal, or a
    /// bare name (any word, including reserved ones — `{ if: 1 }` is valid). Returns the key
    /// node and whether it was computed. Class bodies parse keys separately (`class.rs`) to
    /// additionally allow `#private` names.
    fn parse_property_key(&mut self) -> Result<(Node, bool), ParseError> {
        if self.eat(Punct::BracketL)? {
            let expr = self.parse_assignment_expression()?;
            self.expect_punct(Punct::BracketR)?;
            return Ok((expr, true));
        }
        let start = self.marker();
        if self.cur.kind == TokenKind::Str {
            let raw = self.raw_text(self.cur.range);
            let value = match &self.cur.value {
                TokenValue::Str(s) => s.clone(),
                _ => unreachable!(),
            };
            self.bump()?;
            return Ok((
                Node::Literal(Literal {
                    base: self.base(start),
                    value: Some(LiteralScalar::Str(value)),
                    raw,
                    regex: None,
                    bigint: None,
                }),
                false,
            ));
        }
        if self.cur.kind == TokenKind::Num {
            let raw = self.raw_text(self.cur.range);
            let (value, bigint) = match &self.cur.value {
                TokenValue::Number(NumberValue::Float(f)) => (Some(LiteralScalar::Number(*f)), None),
                TokenValue::Number(NumberValue::BigInt(b)) => (None, Some(b.clone())),
                _ => unreachable!(),
            };
            self.bump()?;
            return Ok((
                Node::Literal(Literal {
                    base: self.base(start),
                    value,
                    raw,
                    regex: None,
                    bigint,
                }),
                false,
            ));
        }
        self.parse_identifier_name().map(|n| (n, false))
    }

    /// Any property/method key word, including ordinary reserved words (`obj.class`, `{ if: 1 }`).
    fn parse_identifier_name(&mut self) -> Result<Node, ParseError> {
        if self.cur.kind != TokenKind::Name {
            return Err(self.unexpected("expected identifier name"));
        }
        let start = self.marker();
        let name = self.cur.word().unwrap().to_string();
        self.bump()?;
        Ok(Node::Identifier(Identifier {
            base: self.base(start),
            name: name.into_boxed_str(),
        }))
    }
}
