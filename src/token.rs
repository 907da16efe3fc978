//! The closed token family. Generalizes the teacher's generic `Lex<TToken>` (`src/lib.rs`,
//! a bare `{ token: TToken, start, end }` tuple over a caller-supplied token type) into a
//! concrete ECMAScript token carrying its decoded value, full position, and the side-channel
//! flags the parser needs for ASI and keyword reclassification.

use crate::position::{Loc, Range};

/// Every punctuator the tokenizer recognizes, matched longest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    BraceL,
    BraceR,
    ParenL,
    ParenR,
    BracketL,
    BracketR,
    Dot,
    Ellipsis,
    Semi,
    Comma,
    Colon,
    QuestionMark,
    Arrow,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    Increment,
    Decrement,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,
    LogicalAnd,
    LogicalOr,
    Nullish,
    OptionalChain,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    StarStarAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    UnsignedShiftRightAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishAssign,
    At,
}

/// The decoded value carried by a token, kind-dependent.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    /// Raw text of an identifier/keyword word token (the tokenizer does not classify
    /// keywords itself — see `crate::keyword` — so `Name` doubles for both).
    Word(Box<str>),
    /// `#name`, text excludes the leading `#`.
    PrivateName(Box<str>),
    Number(NumberValue),
    /// Cooked (escape-decoded) contents of a string literal.
    Str(Box<str>),
    Template {
        raw: Box<str>,
        cooked: Option<Box<str>>,
    },
    Regex {
        pattern: Box<str>,
        flags: Box<str>,
    },
    Punct(Punct),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    Float(f64),
    /// The digit string of a BigInt literal (`123n` -> `"123"`), kept as text since the
    /// parser only ever forwards it into a `Literal` node's `bigint` field.
    BigInt(Box<str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Name,
    PrivateName,
    Num,
    Str,
    Regex,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,
    NoSubstitutionTemplate,
    Punct,
}

/// A single scanned token: kind, value, range, and the side-channel flags the parser needs
/// for ASI (`preceded_by_line_terminator`) and keyword reclassification (`contains_escape`).
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub range: Range,
    pub loc: Loc,
    pub preceded_by_line_terminator: bool,
    pub contains_escape: bool,
    /// Set on a number token scanned from a legacy octal literal (`0123`) or a string token
    /// whose cooked value contains a legacy octal escape (`"\251"`) — both are early errors in
    /// strict mode, but the lexer itself is mode-agnostic, so the check is deferred to whatever
    /// is in scope when the token is consumed (spec §4.2).
    pub legacy_octal: bool,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_punct(&self, p: Punct) -> bool {
        matches!(&self.value, TokenValue::Punct(v) if *v == p)
    }

    /// The raw word text of a `Name`/`PrivateName` token.
    pub fn word(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Word(w) => Some(w),
            TokenValue::PrivateName(w) => Some(w),
            _ => None,
        }
    }

    /// True for a `Name` token whose text equals `word` and which is not the product of a
    /// Unicode escape (an escaped identifier is never classified as a keyword — invariant 4).
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Name && !self.contains_escape && self.word() == Some(word)
    }
}
