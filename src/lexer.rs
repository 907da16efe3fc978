//! The character-level scanner. Turns source text into [`Token`]s one at a time; the parser
//! drives it explicitly rather than the lexer maintaining its own lookahead, since JS
//! tokenization is context-sensitive (regex-vs-division, template continuation) in ways only
//! the parser can resolve (spec §4.1, §9 "Lexer/parser interface").
//!
//! Generalizes the teacher crate's `ILexeme`/pattern-matching scan functions (`src/lexeme/*`)
//! from "match one of a caller-registered set of lexeme patterns" to a fixed, hand-written
//! ECMAScript scan table, the same shape `scan_punct`'s longest-match dispatch uses.

use crate::error::{ErrorCode, ParseError};
use crate::options::ParserOptions;
use crate::position::{Loc, Marker, Position, Range};
use crate::source::{is_id_continue, is_id_start, is_line_terminator, is_whitespace, Code};
use crate::token::{NumberValue, Punct, Token, TokenKind, TokenValue};

pub struct Lexer<'c> {
    code: &'c Code<'c>,
    options: ParserOptions,
    pos: usize,
    line: usize,
    line_start: usize,
}

enum NumericRadix {
    Hex,
    Octal,
    Binary,
    Decimal,
    LegacyOctalOrDecimal,
}

impl<'c> Lexer<'c> {
    pub fn new(code: &'c Code<'c>, options: ParserOptions) -> Self {
        let mut lexer = Self {
            code,
            options,
            pos: 0,
            line: 1,
            line_start: 0,
        };
        lexer.skip_hashbang();
        lexer
    }

    fn skip_hashbang(&mut self) {
        if self.options.allow_hashbang && self.code.value.starts_with("#!") {
            self.pos = 2;
            while let Some(ch) = self.peek_char() {
                if is_line_terminator(ch) {
                    break;
                }
                self.pos += ch.len_utf8();
            }
        }
    }

    pub fn code(&self) -> &'c Code<'c> {
        self.code
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.code.len()
    }

    pub fn marker(&self) -> Marker {
        Marker::new(self.pos, self.line, self.pos - self.line_start)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.pos - self.line_start)
    }

    pub fn range_from(&self, start: Marker) -> Range {
        Range::new(start.index, self.pos)
    }

    pub fn loc_from(&self, start: Marker) -> Loc {
        Loc::new(start.position(), self.position())
    }

    /// Reset scanning to a previously captured marker, for regex re-scan.
    pub fn seek(&mut self, marker: Marker) {
        self.pos = marker.index;
        self.line = marker.line;
        self.line_start = marker.index - marker.column;
    }

    fn peek_char(&self) -> Option<char> {
        self.code.char_at(self.pos)
    }

    fn nth_char(&self, n: usize) -> Option<char> {
        self.code.value[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        match ch {
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.line_start = self.pos;
            }
            '\r' => {
                if self.peek_char() != Some('\n') {
                    self.line += 1;
                    self.line_start = self.pos;
                }
            }
            _ => {}
        }
        Some(ch)
    }

    fn error_at(&self, start: Marker, code: ErrorCode, message: String) -> ParseError {
        ParseError::new(start.index, code, message, self.code)
    }

    fn error_here(&self, code: ErrorCode, message: String) -> ParseError {
        ParseError::new(self.pos, code, message, self.code)
    }

    fn skip_space_and_comments(&mut self) -> Result<bool, ParseError> {
        let mut saw_newline = false;
        loop {
            match self.peek_char() {
                Some(ch) if is_line_terminator(ch) => {
                    saw_newline = true;
                    self.bump();
                }
                Some(ch) if is_whitespace(ch) => {
                    self.bump();
                }
                Some('/') if self.nth_char(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    while let Some(ch) = self.peek_char() {
                        if is_line_terminator(ch) {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.nth_char(1) == Some('*') => {
                    let start = self.marker();
                    self.bump();
                    self.bump();
                    let mut closed = false;
                    while let Some(ch) = self.peek_char() {
                        if ch == '*' && self.nth_char(1) == Some('/') {
                            self.bump();
                            self.bump();
                            closed = true;
                            break;
                        }
                        if is_line_terminator(ch) {
                            saw_newline = true;
                        }
                        self.bump();
                    }
                    if !closed {
                        return Err(self.error_at(
                            start,
                            ErrorCode::UnterminatedComment,
                            "unterminated comment".into(),
                        ));
                    }
                }
                _ => break,
            }
        }
        Ok(saw_newline)
    }

    /// Scan the next ordinary token. Division and regex-literal-start both begin with `/`;
    /// this always produces a `/`/`/ =` punctuator, and the parser re-enters via
    /// [`Lexer::rescan_as_regex`] when it determines a regex was meant instead.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        let preceded_by_line_terminator = self.skip_space_and_comments()?;
        let start = self.marker();
        let Some(ch) = self.peek_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                value: TokenValue::None,
                range: self.range_from(start),
                loc: self.loc_from(start),
                preceded_by_line_terminator,
                contains_escape: false,
                legacy_octal: false,
            });
        };
        if is_id_start(ch) || ch == '\\' {
            return self.scan_word(start, preceded_by_line_terminator);
        }
        if ch.is_ascii_digit() || (ch == '.' && matches!(self.nth_char(1), Some(c) if c.is_ascii_digit()))
        {
            return self.scan_number(start, preceded_by_line_terminator);
        }
        if ch == '"' || ch == '\'' {
            return self.scan_string(start, preceded_by_line_terminator);
        }
        if ch == '`' {
            self.bump();
            return self.scan_template(start, preceded_by_line_terminator, true);
        }
        if ch == '#' {
            return self.scan_private_name(start, preceded_by_line_terminator);
        }
        self.scan_punct(start, preceded_by_line_terminator)
    }

    /// Re-scan from `slash_start` (the marker of an already-returned `/`/`/ =` token) as a
    /// regular expression literal, once the parser has decided the grammar position expects
    /// an expression, not a continuation of a division.
    pub fn rescan_as_regex(&mut self, slash_start: Marker) -> Result<Token, ParseError> {
        self.seek(slash_start);
        let start = self.marker();
        self.bump();
        let mut in_class = false;
        let mut pattern = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error_at(
                        start,
                        ErrorCode::UnterminatedRegex,
                        "unterminated regular expression".into(),
                    ))
                }
                Some(ch) if is_line_terminator(ch) => {
                    return Err(self.error_at(
                        start,
                        ErrorCode::UnterminatedRegex,
                        "unterminated regular expression".into(),
                    ))
                }
                Some('\\') => {
                    pattern.push('\\');
                    self.bump();
                    if let Some(c) = self.peek_char() {
                        pattern.push(c);
                        self.bump();
                    }
                }
                Some('[') => {
                    in_class = true;
                    pattern.push('[');
                    self.bump();
                }
                Some(']') if in_class => {
                    in_class = false;
                    pattern.push(']');
                    self.bump();
                }
                Some('/') if !in_class => {
                    self.bump();
                    break;
                }
                Some(ch) => {
                    pattern.push(ch);
                    self.bump();
                }
            }
        }
        let mut flags = String::new();
        while let Some(ch) = self.peek_char() {
            if is_id_continue(ch) {
                flags.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        Ok(Token {
            kind: TokenKind::Regex,
            value: TokenValue::Regex {
                pattern: pattern.into_boxed_str(),
                flags: flags.into_boxed_str(),
            },
            range: self.range_from(start),
            loc: self.loc_from(start),
            preceded_by_line_terminator: false,
            contains_escape: false,
            legacy_octal: false,
        })
    }

    /// Re-scan a template continuation, called when the parser has just consumed the `}`
    /// closing a `${ }` substitution and wants the next `TemplateMiddle`/`TemplateTail`.
    pub fn rescan_template_continuation(&mut self) -> Result<Token, ParseError> {
        let start = self.marker();
        self.scan_template(start, false, false)
    }

    fn scan_word(&mut self, start: Marker, preceded: bool) -> Result<Token, ParseError> {
        let mut text = String::new();
        let mut contains_escape = false;
        let mut first = true;
        loop {
            if self.peek_char() == Some('\\') && self.nth_char(1) == Some('u') {
                contains_escape = true;
                self.bump();
                self.bump();
                let ch = self.scan_unicode_escape_value()?;
                let ok = if first {
                    is_id_start(ch)
                } else {
                    is_id_continue(ch)
                };
                if !ok {
                    return Err(self.error_here(
                        ErrorCode::InvalidUnicodeEscape,
                        "invalid identifier escape".into(),
                    ));
                }
                text.push(ch);
            } else if let Some(ch) = self.peek_char() {
                let ok = if first {
                    is_id_start(ch)
                } else {
                    is_id_continue(ch)
                };
                if !ok {
                    break;
                }
                text.push(ch);
                self.bump();
            } else {
                break;
            }
            first = false;
        }
        Ok(Token {
            kind: TokenKind::Name,
            value: TokenValue::Word(text.into_boxed_str()),
            range: self.range_from(start),
            loc: self.loc_from(start),
            preceded_by_line_terminator: preceded,
            contains_escape,
            legacy_octal: false,
        })
    }

    fn scan_unicode_escape_value(&mut self) -> Result<char, ParseError> {
        if self.peek_char() == Some('{') {
            self.bump();
            let mut value: u32 = 0;
            let mut any = false;
            while let Some(ch) = self.peek_char() {
                if ch == '}' {
                    break;
                }
                let digit = ch.to_digit(16).ok_or_else(|| {
                    self.error_here(ErrorCode::InvalidUnicodeEscape, "invalid unicode escape".into())
                })?;
                value = value
                    .checked_mul(16)
                    .and_then(|v| v.checked_add(digit))
                    .filter(|v| *v <= 0x10FFFF)
                    .ok_or_else(|| {
                        self.error_here(
                            ErrorCode::InvalidUnicodeEscape,
                            "unicode escape out of range".into(),
                        )
                    })?;
                any = true;
                self.bump();
            }
            if !any || self.peek_char() != Some('}') {
                return Err(self.error_here(
                    ErrorCode::InvalidUnicodeEscape,
                    "invalid unicode escape".into(),
                ));
            }
            self.bump();
            char::from_u32(value).ok_or_else(|| {
                self.error_here(ErrorCode::InvalidUnicodeEscape, "lone surrogate in \\u{...}".into())
            })
        } else {
            let mut value: u32 = 0;
            for _ in 0..4 {
                let ch = self.peek_char().ok_or_else(|| {
                    self.error_here(ErrorCode::InvalidUnicodeEscape, "invalid unicode escape".into())
                })?;
                let digit = ch.to_digit(16).ok_or_else(|| {
                    self.error_here(ErrorCode::InvalidUnicodeEscape, "invalid unicode escape".into())
                })?;
                value = value * 16 + digit;
                self.bump();
            }
            char::from_u32(value).ok_or_else(|| {
                self.error_here(
                    ErrorCode::InvalidUnicodeEscape,
                    "lone surrogate in \\uXXXX".into(),
                )
            })
        }
    }

    fn scan_private_name(&mut self, start: Marker, preceded: bool) -> Result<Token, ParseError> {
        self.bump();
        match self.peek_char() {
            Some(ch) if is_id_start(ch) || ch == '\\' => {}
            _ => {
                return Err(self.error_here(
                    ErrorCode::InvalidPrivateIdentifierPosition,
                    "expected identifier after '#'".into(),
                ))
            }
        }
        let name_start = self.marker();
        let word_token = self.scan_word(name_start, false)?;
        let name = match word_token.value {
            TokenValue::Word(w) => w,
            _ => unreachable!("scan_word always produces TokenValue::Word"),
        };
        Ok(Token {
            kind: TokenKind::PrivateName,
            value: TokenValue::PrivateName(name),
            range: self.range_from(start),
            loc: self.loc_from(start),
            preceded_by_line_terminator: preceded,
            contains_escape: word_token.contains_escape,
            legacy_octal: false,
        })
    }

    fn scan_digits_into(&mut self, out: &mut String, pred: impl Fn(char) -> bool) -> Result<(), ParseError> {
        let mut last_was_separator = false;
        let mut any = false;
        loop {
            match self.peek_char() {
                Some('_') => {
                    if !any || last_was_separator {
                        return Err(self.error_here(
                            ErrorCode::InvalidNumericSeparator,
                            "numeric separator not allowed here".into(),
                        ));
                    }
                    last_was_separator = true;
                    self.bump();
                }
                Some(c) if pred(c) => {
                    out.push(c);
                    any = true;
                    last_was_separator = false;
                    self.bump();
                }
                _ => break,
            }
        }
        if last_was_separator {
            return Err(self.error_here(
                ErrorCode::InvalidNumericSeparator,
                "trailing numeric separator".into(),
            ));
        }
        Ok(())
    }

    fn scan_number(&mut self, start: Marker, preceded: bool) -> Result<Token, ParseError> {
        let mut text = String::new();
        let first = self.peek_char().unwrap();

        if first == '0' && matches!(self.nth_char(1), Some('x') | Some('X')) {
            self.bump();
            self.bump();
            self.scan_digits_into(&mut text, |c| c.is_ascii_hexdigit())?;
            if text.is_empty() {
                return Err(self.error_at(
                    start,
                    ErrorCode::InvalidNumericLiteral,
                    "missing hex digits".into(),
                ));
            }
            let is_bigint = self.consume_bigint_suffix();
            return self.finish_number(start, preceded, text, is_bigint, false, NumericRadix::Hex);
        }
        if first == '0' && matches!(self.nth_char(1), Some('o') | Some('O')) {
            self.bump();
            self.bump();
            self.scan_digits_into(&mut text, |c| ('0'..='7').contains(&c))?;
            if text.is_empty() {
                return Err(self.error_at(
                    start,
                    ErrorCode::InvalidNumericLiteral,
                    "missing octal digits".into(),
                ));
            }
            let is_bigint = self.consume_bigint_suffix();
            return self.finish_number(start, preceded, text, is_bigint, false, NumericRadix::Octal);
        }
        if first == '0' && matches!(self.nth_char(1), Some('b') | Some('B')) {
            self.bump();
            self.bump();
            self.scan_digits_into(&mut text, |c| c == '0' || c == '1')?;
            if text.is_empty() {
                return Err(self.error_at(
                    start,
                    ErrorCode::InvalidNumericLiteral,
                    "missing binary digits".into(),
                ));
            }
            let is_bigint = self.consume_bigint_suffix();
            return self.finish_number(start, preceded, text, is_bigint, false, NumericRadix::Binary);
        }
        if first == '0' && matches!(self.nth_char(1), Some(c) if c.is_ascii_digit()) {
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            if self.peek_char() == Some('n') {
                return Err(self.error_here(
                    ErrorCode::InvalidNumericLiteral,
                    "BigInt literal cannot have a leading zero".into(),
                ));
            }
            return self.finish_number(
                start,
                preceded,
                text,
                false,
                true,
                NumericRadix::LegacyOctalOrDecimal,
            );
        }

        self.scan_digits_into(&mut text, |c| c.is_ascii_digit())?;
        let mut is_float = false;
        if self.peek_char() == Some('.') {
            is_float = true;
            text.push('.');
            self.bump();
            self.scan_digits_into(&mut text, |c| c.is_ascii_digit())?;
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            is_float = true;
            text.push(self.peek_char().unwrap());
            self.bump();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                text.push(self.peek_char().unwrap());
                self.bump();
            }
            let exp_start = text.len();
            self.scan_digits_into(&mut text, |c| c.is_ascii_digit())?;
            if text.len() == exp_start {
                return Err(self.error_here(
                    ErrorCode::InvalidNumericLiteral,
                    "missing exponent digits".into(),
                ));
            }
        }
        let is_bigint = !is_float && self.consume_bigint_suffix();
        self.finish_number(start, preceded, text, is_bigint, false, NumericRadix::Decimal)
    }

    fn consume_bigint_suffix(&mut self) -> bool {
        if self.peek_char() == Some('n') {
            self.bump();
            true
        } else {
            false
        }
    }

    fn finish_number(
        &mut self,
        start: Marker,
        preceded: bool,
        digits: String,
        is_bigint: bool,
        legacy_octal: bool,
        radix: NumericRadix,
    ) -> Result<Token, ParseError> {
        if let Some(ch) = self.peek_char() {
            if is_id_start(ch) || ch.is_ascii_digit() {
                return Err(self.error_here(
                    ErrorCode::InvalidNumericLiteral,
                    "identifier starts immediately after numeric literal".into(),
                ));
            }
        }
        let value = if is_bigint {
            NumberValue::BigInt(digits.into_boxed_str())
        } else {
            let parsed = match radix {
                NumericRadix::Hex => u128::from_str_radix(&digits, 16)
                    .map(|v| v as f64)
                    .unwrap_or(f64::INFINITY),
                NumericRadix::Octal => u128::from_str_radix(&digits, 8)
                    .map(|v| v as f64)
                    .unwrap_or(f64::INFINITY),
                NumericRadix::Binary => u128::from_str_radix(&digits, 2)
                    .map(|v| v as f64)
                    .unwrap_or(f64::INFINITY),
                NumericRadix::LegacyOctalOrDecimal => {
                    if !digits.is_empty() && digits.chars().all(|c| ('0'..='7').contains(&c)) {
                        u128::from_str_radix(&digits, 8)
                            .map(|v| v as f64)
                            .unwrap_or(f64::INFINITY)
                    } else {
                        digits.parse::<f64>().unwrap_or(f64::NAN)
                    }
                }
                NumericRadix::Decimal => digits.parse::<f64>().unwrap_or(f64::NAN),
            };
            NumberValue::Float(parsed)
        };
        Ok(Token {
            kind: TokenKind::Num,
            value: TokenValue::Number(value),
            range: self.range_from(start),
            loc: self.loc_from(start),
            preceded_by_line_terminator: preceded,
            contains_escape: false,
            legacy_octal,
        })
    }

    fn scan_string(&mut self, start: Marker, preceded: bool) -> Result<Token, ParseError> {
        let quote = self.peek_char().unwrap();
        self.bump();
        let mut cooked = String::new();
        let mut legacy_octal = false;
        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error_at(
                        start,
                        ErrorCode::UnterminatedString,
                        "unterminated string literal".into(),
                    ))
                }
                Some(ch) if ch == quote => {
                    self.bump();
                    break;
                }
                Some(ch) if is_line_terminator(ch) => {
                    return Err(self.error_at(
                        start,
                        ErrorCode::UnterminatedString,
                        "unterminated string literal".into(),
                    ))
                }
                Some('\\') => {
                    self.bump();
                    if let Some(ch) = self.peek_char() {
                        if is_line_terminator(ch) {
                            if ch == '\r' {
                                self.bump();
                                if self.peek_char() == Some('\n') {
                                    self.bump();
                                }
                            } else {
                                self.bump();
                            }
                            continue;
                        }
                    }
                    let (decoded, was_octal) = self.scan_escape_sequence()?;
                    if was_octal {
                        legacy_octal = true;
                    }
                    if let Some(c) = decoded {
                        cooked.push(c);
                    }
                }
                Some(ch) => {
                    cooked.push(ch);
                    self.bump();
                }
            }
        }
        Ok(Token {
            kind: TokenKind::Str,
            value: TokenValue::Str(cooked.into_boxed_str()),
            range: self.range_from(start),
            loc: self.loc_from(start),
            preceded_by_line_terminator: preceded,
            contains_escape: false,
            legacy_octal,
        })
    }

    /// Decode the escape sequence starting right after the backslash. Returns the decoded
    /// character (`None` for `\<newline>` line continuations, handled by the caller before
    /// this is reached, or a recoverable failure) and whether it was a legacy octal escape.
    fn scan_escape_sequence(&mut self) -> Result<(Option<char>, bool), ParseError> {
        let Some(ch) = self.peek_char() else {
            return Err(self.error_here(ErrorCode::UnterminatedString, "unterminated escape".into()));
        };
        match ch {
            'n' => {
                self.bump();
                Ok((Some('\n'), false))
            }
            't' => {
                self.bump();
                Ok((Some('\t'), false))
            }
            'b' => {
                self.bump();
                Ok((Some('\u{8}'), false))
            }
            'f' => {
                self.bump();
                Ok((Some('\u{C}'), false))
            }
            'v' => {
                self.bump();
                Ok((Some('\u{B}'), false))
            }
            'r' => {
                self.bump();
                Ok((Some('\r'), false))
            }
            'x' => {
                self.bump();
                let mut value = 0u32;
                for _ in 0..2 {
                    let c = self.peek_char().ok_or_else(|| {
                        self.error_here(ErrorCode::InvalidEscapeSequence, "invalid hex escape".into())
                    })?;
                    let d = c.to_digit(16).ok_or_else(|| {
                        self.error_here(ErrorCode::InvalidEscapeSequence, "invalid hex escape".into())
                    })?;
                    value = value * 16 + d;
                    self.bump();
                }
                Ok((char::from_u32(value), false))
            }
            'u' => {
                self.bump();
                Ok((Some(self.scan_unicode_escape_value()?), false))
            }
            '0'..='7' => {
                let max_len = if ch <= '3' { 3 } else { 2 };
                let mut value = 0u32;
                let mut len = 0;
                while len < max_len {
                    match self.peek_char() {
                        Some(c @ '0'..='7') => {
                            value = value * 8 + c.to_digit(8).unwrap();
                            self.bump();
                            len += 1;
                        }
                        _ => break,
                    }
                }
                let is_zero_escape = value == 0 && len == 1;
                Ok((char::from_u32(value), !is_zero_escape))
            }
            other => {
                self.bump();
                Ok((Some(other), false))
            }
        }
    }

    fn scan_template(&mut self, start: Marker, preceded: bool, is_head: bool) -> Result<Token, ParseError> {
        let mut raw = String::new();
        let mut cooked = String::new();
        let mut cooked_valid = true;
        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error_at(
                        start,
                        ErrorCode::UnterminatedTemplate,
                        "unterminated template literal".into(),
                    ))
                }
                Some('`') => {
                    self.bump();
                    let kind = if is_head {
                        TokenKind::NoSubstitutionTemplate
                    } else {
                        TokenKind::TemplateTail
                    };
                    return Ok(self.finish_template(start, preceded, kind, raw, cooked, cooked_valid));
                }
                Some('$') if self.nth_char(1) == Some('{') => {
                    self.bump();
                    self.bump();
                    let kind = if is_head {
                        TokenKind::TemplateHead
                    } else {
                        TokenKind::TemplateMiddle
                    };
                    return Ok(self.finish_template(start, preceded, kind, raw, cooked, cooked_valid));
                }
                Some('\\') => {
                    raw.push('\\');
                    self.bump();
                    if let Some(ch) = self.peek_char() {
                        if is_line_terminator(ch) {
                            if ch == '\r' {
                                self.bump();
                                if self.peek_char() == Some('\n') {
                                    self.bump();
                                }
                            } else {
                                self.bump();
                            }
                            raw.push('\n');
                            continue;
                        }
                    }
                    let esc_start = self.pos;
                    match self.scan_escape_sequence() {
                        Ok((decoded, _)) => {
                            raw.push_str(&self.code.value[esc_start..self.pos]);
                            if let Some(c) = decoded {
                                cooked.push(c);
                            }
                        }
                        Err(_) => {
                            cooked_valid = false;
                            if let Some(ch) = self.peek_char() {
                                raw.push(ch);
                                self.bump();
                            }
                        }
                    }
                }
                Some('\r') => {
                    self.bump();
                    if self.peek_char() == Some('\n') {
                        self.bump();
                    }
                    raw.push('\n');
                    cooked.push('\n');
                }
                Some(ch) => {
                    raw.push(ch);
                    cooked.push(ch);
                    self.bump();
                }
            }
        }
    }

    fn finish_template(
        &self,
        start: Marker,
        preceded: bool,
        kind: TokenKind,
        raw: String,
        cooked: String,
        cooked_valid: bool,
    ) -> Token {
        Token {
            kind,
            value: TokenValue::Template {
                raw: raw.into_boxed_str(),
                cooked: cooked_valid.then(|| cooked.into_boxed_str()),
            },
            range: self.range_from(start),
            loc: self.loc_from(start),
            preceded_by_line_terminator: preceded,
            contains_escape: false,
            legacy_octal: false,
        }
    }

    fn scan_punct(&mut self, start: Marker, preceded: bool) -> Result<Token, ParseError> {
        let rest = &self.code.value[self.pos..];
        if rest.starts_with("?.")
            && !matches!(rest[2..].chars().next(), Some(c) if c.is_ascii_digit())
        {
            self.bump();
            self.bump();
            return Ok(self.finish_punct(start, preceded, Punct::OptionalChain));
        }
        let (punct, len) = match_punct(rest).ok_or_else(|| {
            self.error_here(
                ErrorCode::UnexpectedToken,
                format!("unexpected character '{}'", self.peek_char().unwrap_or(' ')),
            )
        })?;
        for _ in 0..len {
            self.bump();
        }
        Ok(self.finish_punct(start, preceded, punct))
    }

    fn finish_punct(&self, start: Marker, preceded: bool, punct: Punct) -> Token {
        Token {
            kind: TokenKind::Punct,
            value: TokenValue::Punct(punct),
            range: self.range_from(start),
            loc: self.loc_from(start),
            preceded_by_line_terminator: preceded,
            contains_escape: false,
            legacy_octal: false,
        }
    }
}

/// Longest-match punctuator lookup. `s` is always ASCII for the prefix that matters here, so
/// byte length equals char length throughout.
fn match_punct(s: &str) -> Option<(Punct, usize)> {
    use Punct::*;
    macro_rules! try_match {
        ($($lit:literal => $p:expr),* $(,)?) => {
            $(if s.starts_with($lit) { return Some(($p, $lit.len())); })*
        };
    }
    try_match!(
        ">>>=" => UnsignedShiftRightAssign,
        "..." => Ellipsis,
        "===" => StrictEq,
        "!==" => StrictNotEq,
        "**=" => StarStarAssign,
        "<<=" => ShiftLeftAssign,
        ">>=" => ShiftRightAssign,
        ">>>" => UnsignedShiftRight,
        "&&=" => LogicalAndAssign,
        "||=" => LogicalOrAssign,
        "??=" => NullishAssign,
        "=>" => Arrow,
        "==" => Eq,
        "!=" => NotEq,
        "<=" => Le,
        ">=" => Ge,
        "+=" => PlusAssign,
        "-=" => MinusAssign,
        "*=" => StarAssign,
        "/=" => SlashAssign,
        "%=" => PercentAssign,
        "**" => StarStar,
        "++" => Increment,
        "--" => Decrement,
        "<<" => ShiftLeft,
        ">>" => ShiftRight,
        "&&" => LogicalAnd,
        "||" => LogicalOr,
        "??" => Nullish,
        "&=" => AmpAssign,
        "|=" => PipeAssign,
        "^=" => CaretAssign,
        "{" => BraceL,
        "}" => BraceR,
        "(" => ParenL,
        ")" => ParenR,
        "[" => BracketL,
        "]" => BracketR,
        "." => Dot,
        ";" => Semi,
        "," => Comma,
        ":" => Colon,
        "?" => QuestionMark,
        "<" => Lt,
        ">" => Gt,
        "+" => Plus,
        "-" => Minus,
        "*" => Star,
        "/" => Slash,
        "%" => Percent,
        "&" => Amp,
        "|" => Pipe,
        "^" => Caret,
        "!" => Bang,
        "~" => Tilde,
        "=" => Assign,
        "@" => At,
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &'static str) -> (Code<'static>, ParserOptions) {
        (Code::new(src), ParserOptions::default())
    }

    #[test]
    fn scans_identifier_and_number() {
        let (code, opts) = lex("let x1 = 42;");
        let mut lexer = Lexer::new(&code, opts);
        let t1 = lexer.next_token().unwrap();
        assert_eq!(t1.word(), Some("let"));
        let t2 = lexer.next_token().unwrap();
        assert_eq!(t2.word(), Some("x1"));
        let t3 = lexer.next_token().unwrap();
        assert!(t3.is_punct(Punct::Assign));
        let t4 = lexer.next_token().unwrap();
        assert!(matches!(t4.value, TokenValue::Number(NumberValue::Float(n)) if n == 42.0));
    }

    #[test]
    fn tracks_preceded_by_line_terminator_for_asi() {
        let (code, opts) = lex("a\nb");
        let mut lexer = Lexer::new(&code, opts);
        let a = lexer.next_token().unwrap();
        assert!(!a.preceded_by_line_terminator);
        let b = lexer.next_token().unwrap();
        assert!(b.preceded_by_line_terminator);
    }

    #[test]
    fn scans_string_with_escapes() {
        let (code, opts) = lex(r#"'a\nbA'"#);
        let mut lexer = Lexer::new(&code, opts);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.value, TokenValue::Str("a\nbA".into()));
    }

    #[test]
    fn legacy_octal_literal_is_flagged() {
        let (code, opts) = lex("0755");
        let mut lexer = Lexer::new(&code, opts);
        let tok = lexer.next_token().unwrap();
        assert!(tok.legacy_octal);
        assert!(matches!(tok.value, TokenValue::Number(NumberValue::Float(n)) if n == 493.0));
    }

    #[test]
    fn bigint_suffix_is_preserved_as_text() {
        let (code, opts) = lex("123n");
        let mut lexer = Lexer::new(&code, opts);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.value, TokenValue::Number(NumberValue::BigInt("123".into())));
    }

    #[test]
    fn rescans_division_as_regex() {
        let (code, opts) = lex("/ab+c/g");
        let mut lexer = Lexer::new(&code, opts);
        let div = lexer.next_token().unwrap();
        assert!(div.is_punct(Punct::Slash));
        let marker = Marker::new(div.range.start, div.loc.start.line, div.loc.start.column);
        let regex = lexer.rescan_as_regex(marker).unwrap();
        assert_eq!(
            regex.value,
            TokenValue::Regex {
                pattern: "ab+c".into(),
                flags: "g".into(),
            }
        );
    }

    #[test]
    fn template_head_and_tail() {
        let (code, opts) = lex("`a${b}c`");
        let mut lexer = Lexer::new(&code, opts);
        let head = lexer.next_token().unwrap();
        assert_eq!(head.kind, TokenKind::TemplateHead);
        // parser would now parse `b` as an expression, then consume `}` and ask for the tail
        lexer.seek(Marker::new(6, 1, 6));
        let tail = lexer.rescan_template_continuation().unwrap();
        assert_eq!(tail.kind, TokenKind::TemplateTail);
    }

    #[test]
    fn optional_chain_not_confused_with_ternary_decimal() {
        let (code, opts) = lex("a ? .5 : 1");
        let mut lexer = Lexer::new(&code, opts);
        let _a = lexer.next_token().unwrap();
        let q = lexer.next_token().unwrap();
        assert!(q.is_punct(Punct::QuestionMark));
        let num = lexer.next_token().unwrap();
        assert!(matches!(num.value, TokenValue::Number(NumberValue::Float(n)) if n == 0.5));
    }
}
