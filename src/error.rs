//! Diagnostics: structured parse errors with source position and a stable message-key
//! (`ErrorCode`), plus the tolerant-mode collector and the `Log<T>` verbosity ladder used to
//! trace tokenizer/parser decisions under `cfg(debug_assertions)`.
//!
//! Generalized from the teacher crate's single `ParseError { pointer, message }` /
//! `ImplementationError { what, message }` (`src/error.rs`) and `Log<T>` (`src/util/logger.rs`).

use crate::position::Position;
use crate::source::Code;
use std::fmt::{Display, Formatter};

/// A stable key for every diagnostic this crate can raise, one variant per taxonomy entry
/// in the error-handling design (lexical / syntactic / early-error / structural).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexical
    UnterminatedString,
    UnterminatedTemplate,
    UnterminatedRegex,
    UnterminatedComment,
    InvalidUnicodeEscape,
    InvalidEscapeSequence,
    InvalidNumericLiteral,
    InvalidNumericSeparator,
    LegacyOctalEscapeInStrictMode,
    LegacyOctalLiteralInStrictMode,
    InvalidPrivateIdentifierPosition,
    // Syntactic
    UnexpectedToken,
    UnexpectedEof,
    MissingSemicolon,
    InvalidLeftHandSide,
    InvalidDestructuringTarget,
    MixedLogicalNullish,
    UnparenthesizedUnaryExponent,
    // Early errors
    DuplicateLexicalBinding,
    LetOrConstAsIdentifierInStrictMode,
    DuplicateParameterName,
    SuperOutsideClass,
    NewTargetOutsideFunction,
    AwaitOutsidePermittedPosition,
    YieldOutsidePermittedPosition,
    DuplicateProtoKey,
    ReservedWordAsIdentifier,
    InvalidRegexFlags,
    DuplicatePrivateName,
    PrivateFieldNotDeclared,
    DuplicateExportName,
    UnresolvedExportName,
    // Structural
    ModuleSyntaxInScript,
    ReturnOutsideFunction,
    UnknownLabel,
    IllegalBreakOrContinueTarget,
    DuplicateLabel,
}

/// An error returned when the parser failed to parse the input because of a language
/// syntax error (or, in tolerant mode, one of possibly several collected errors).
#[derive(Debug, Clone)]
pub struct ParseError {
    pub pointer: usize,
    pub code: ErrorCode,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(pointer: usize, code: ErrorCode, message: String, code_src: &Code) -> Self {
        let position = code_src.obtain_position(pointer);
        Self {
            pointer,
            code,
            message,
            line: position.line,
            column: position.column,
        }
    }

    /// Build an error without a source reference, using an already-resolved position.
    /// Used when a position has been snapshotted earlier and the source buffer is not at hand.
    pub fn at_position(pointer: usize, code: ErrorCode, message: String, position: Position) -> Self {
        Self {
            pointer,
            code,
            message,
            line: position.line,
            column: position.column,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SyntaxError: {} ({}:{})",
            self.message, self.line, self.column
        )
    }
}

/// An error returned due to invalid parser configuration or other API misuse — the
/// generalization of the teacher's grammar-validation `ImplementationError` to "the caller
/// asked for something this parser cannot do", since there is no user-supplied grammar left
/// to validate.
#[derive(Debug)]
pub struct ImplementationError {
    what: String,
    message: String,
}

impl ImplementationError {
    pub fn new(what: String, message: String) -> Self {
        Self { message, what }
    }
}

impl Display for ImplementationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImplementationError: {}-{}", self.what, self.message)
    }
}

/// The tolerant-mode error collector. A non-tolerant [`crate::Parser`] raises the first
/// diagnostic pushed here as an `Err`; a tolerant one keeps accumulating and the caller
/// inspects [`Diagnostics::errors`] after the (possibly partial) parse completes.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    tolerant: bool,
    errors: Vec<ParseError>,
}

impl Diagnostics {
    pub fn new(tolerant: bool) -> Self {
        Self {
            tolerant,
            errors: Vec::new(),
        }
    }

    pub fn is_tolerant(&self) -> bool {
        self.tolerant
    }

    /// Record an error. Returns `Err` with the same error when not tolerant, so call sites
    /// can propagate it with `?` in one line; returns `Ok(())` in tolerant mode so the
    /// caller keeps parsing.
    pub fn push(&mut self, error: ParseError) -> Result<(), ParseError> {
        if self.tolerant {
            self.errors.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}

/// A verbosity ladder for tracing tokenizer/parser decisions, gated entirely behind
/// `cfg(debug_assertions)` call sites — kept identical in shape to the teacher's
/// `Log<T>` (`src/util/logger.rs`), generalized from "lexeme success/failure" tracing to
/// "token scanned / statement recognized / error recovered".
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_aborts_when_not_tolerant() {
        let code = Code::new("x");
        let mut diags = Diagnostics::new(false);
        let err = ParseError::new(0, ErrorCode::UnexpectedToken, "boom".into(), &code);
        assert!(diags.push(err).is_err());
        assert!(!diags.has_errors());
    }

    #[test]
    fn diagnostics_accumulates_when_tolerant() {
        let code = Code::new("x");
        let mut diags = Diagnostics::new(true);
        let err = ParseError::new(0, ErrorCode::UnexpectedToken, "boom".into(), &code);
        assert!(diags.push(err).is_ok());
        assert_eq!(diags.errors().len(), 1);
    }

    #[test]
    fn log_order_ladder() {
        assert!(Log::Verbose(()).order() > Log::Success(()).order());
        assert!(Log::Success(()).order() > Log::Default(()).order());
        assert!(Log::Default(()).order() > Log::None.order());
    }
}
