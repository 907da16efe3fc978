//! Expression grammar: precedence climbing for binary/logical operators, unary/update/LHS
//! expressions, and primary expressions — including the two places a cover grammar is needed
//! (arrow-function-params-vs-parenthesized-expression, array/object-literal-vs-pattern, the
//! latter resolved post hoc by `pattern::expr_to_pattern`) (spec §4.3).
//!
//! The arrow/parenthesized-expression ambiguity is resolved by speculative parsing
//! (`Parser::snapshot`/`restore`) rather than a dedicated cover-grammar struct: an attempt to
//! parse `(...)` as an arrow parameter list either succeeds and is followed by `=>`, or fails
//! and the parser backtracks to reparse the same text as a parenthesized expression. This
//! generalizes the teacher's `Alt`/backtracking combinators (`src/production/choice.rs`) from
//! "try productions in order" to "try one grammar, then another, over the same input".

use super::*;

/// Binary operator precedence table, lowest to highest. `??`/`||`/`&&` are excluded — they are
/// parsed by dedicated functions below because ECMAScript forbids mixing them without explicit
/// parentheses (invariant; spec §4.3).
fn binop_info(p: Punct, in_word: bool) -> Option<(&'static str, u8, bool)> {
    use Punct::*;
    let _ = in_word;
    Some(match p {
        Pipe => ("|", 4, false),
        Caret => ("^", 5, false),
        Amp => ("&", 6, false),
        Eq => ("==", 7, false),
        NotEq => ("!=", 7, false),
        StrictEq => ("===", 7, false),
        StrictNotEq => ("!==", 7, false),
        Lt => ("<", 8, false),
        Gt => (">", 8, false),
        Le => ("<=", 8, false),
        Ge => (">=", 8, false),
        ShiftLeft => ("<<", 9, false),
        ShiftRight => (">>", 9, false),
        UnsignedShiftRight => (">>>", 9, false),
        Plus => ("+", 10, false),
        Minus => ("-", 10, false),
        Star => ("*", 11, false),
        Slash => ("/", 11, false),
        Percent => ("%", 11, false),
        StarStar => ("**", 12, true),
        _ => return None,
    })
}

fn assignment_operator_text(p: Punct) -> Option<&'static str> {
    use Punct::*;
    Some(match p {
        Assign => "=",
        PlusAssign => "+=",
        MinusAssign => "-=",
        StarAssign => "*=",
        SlashAssign => "/=",
        PercentAssign => "%=",
        StarStarAssign => "**=",
        ShiftLeftAssign => "<<=",
        ShiftRightAssign => ">>=",
        UnsignedShiftRightAssign => ">>>=",
        AmpAssign => "&=",
        PipeAssign => "|=",
        CaretAssign => "^=",
        LogicalAndAssign => "&&=",
        LogicalOrAssign => "||=",
        NullishAssign => "??=",
        _ => return None,
    })
}

impl<'c> Parser<'c> {
    // --- comma / assignment / conditional -------------------------------------------------

    pub(super) fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let first = self.parse_assignment_expression()?;
        if !self.is_punct(Punct::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(Punct::Comma)? {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(Node::SequenceExpression(SequenceExpression {
            base: self.base(start),
            expressions,
        }))
    }

    pub(super) fn parse_assignment_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        if self.ctx.in_generator && self.is_word("yield") {
            if self.ctx.in_parameters {
                return Err(self.error_at(
                    start.index,
                    ErrorCode::YieldOutsidePermittedPosition,
                    "'yield' cannot appear in a generator's own parameter defaults",
                ));
            }
            return self.parse_yield_expression();
        }
        let left = self.parse_conditional_expression()?;
        let op = match &self.cur.value {
            TokenValue::Punct(p) => assignment_operator_text(*p),
            _ => None,
        };
        let Some(op) = op else { return Ok(left) };
        self.bump()?;
        let right = self.parse_assignment_expression()?;
        let target = if op == "=" {
            self.expr_to_pattern(left, true)?
        } else {
            self.check_simple_assignment_target(&left)?;
            left
        };
        Ok(Node::AssignmentExpression(BinaryLike {
            base: self.base(start),
            operator: op.into(),
            left: Box::new(target),
            right: Box::new(right),
        }))
    }

    fn check_simple_assignment_target(&self, node: &Node) -> Result<(), ParseError> {
        match node {
            Node::Identifier(i) => {
                if self.ctx.strict && matches!(&*i.name, "eval" | "arguments") {
                    return Err(self.error_at(
                        node.range().start,
                        ErrorCode::LetOrConstAsIdentifierInStrictMode,
                        format!("'{}' cannot be assigned to in strict mode", i.name),
                    ));
                }
                Ok(())
            }
            Node::MemberExpression(_) => Ok(()),
            _ => Err(self.error_at(
                node.range().start,
                ErrorCode::InvalidLeftHandSide,
                "invalid assignment target",
            )),
        }
    }

    fn parse_conditional_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let test = self.parse_nullish_expression()?;
        if !self.eat(Punct::QuestionMark)? {
            return Ok(test);
        }
        let allow_in = self.ctx.allow_in;
        self.ctx.allow_in = true;
        let consequent = self.parse_assignment_expression()?;
        self.ctx.allow_in = allow_in;
        self.expect_punct(Punct::Colon)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(Node::ConditionalExpression(ConditionalExpression {
            base: self.base(start),
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }))
    }

    // --- logical / nullish, kept apart from the precedence table because mixing them
    // without parentheses is a syntax error, not just a precedence question -------------------

    fn parse_nullish_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let left = self.parse_logical_or_expression()?;
        if !self.is_punct(Punct::Nullish) {
            return Ok(left);
        }
        if matches!(&left, Node::LogicalExpression(l) if &*l.operator != "??") {
            return Err(self.error_at(
                left.range().start,
                ErrorCode::MixedLogicalNullish,
                "'??' cannot be mixed with '&&'/'||' without parentheses",
            ));
        }
        let mut left = left;
        while self.eat(Punct::Nullish)? {
            let right = self.parse_logical_or_expression()?;
            if matches!(&right, Node::LogicalExpression(r) if &*r.operator != "??") {
                return Err(self.error_at(
                    right.range().start,
                    ErrorCode::MixedLogicalNullish,
                    "'??' cannot be mixed with '&&'/'||' without parentheses",
                ));
            }
            left = Node::LogicalExpression(BinaryLike {
                base: self.base(start),
                operator: "??".into(),
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_logical_or_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let mut left = self.parse_logical_and_expression()?;
        while self.is_punct(Punct::LogicalOr) {
            self.bump()?;
            let right = self.parse_logical_and_expression()?;
            left = Node::LogicalExpression(BinaryLike {
                base: self.base(start),
                operator: "||".into(),
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let mut left = self.parse_binary_expression(4)?;
        while self.is_punct(Punct::LogicalAnd) {
            self.bump()?;
            let right = self.parse_binary_expression(4)?;
            left = Node::LogicalExpression(BinaryLike {
                base: self.base(start),
                operator: "&&".into(),
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// Precedence climbing over `|  ^  &  ==  <  <<  +  *  **` (spec's binary operator table,
    /// excluding the logical/nullish operators handled above). `min_prec` is the lowest
    /// precedence this call is allowed to consume; a right-associative operator (`**`) recurses
    /// at its own precedence, a left-associative one at `prec + 1`.
    fn parse_binary_expression(&mut self, min_prec: u8) -> Result<Node, ParseError> {
        let start = self.marker();
        let mut left = self.parse_unary_expression()?;
        loop {
            let info = match &self.cur.value {
                TokenValue::Punct(p) => binop_info(*p, false),
                _ => None,
            };
            let info = info.or_else(|| {
                if self.ctx.allow_in && self.is_word("in") {
                    Some(("in", 8, false))
                } else if self.is_word("instanceof") {
                    Some(("instanceof", 8, false))
                } else {
                    None
                }
            });
            let Some((op, prec, right_assoc)) = info else { break };
            if prec < min_prec {
                break;
            }
            if op == "**" && matches!(left, Node::UnaryExpression(_)) {
                return Err(self.error_at(
                    left.range().start,
                    ErrorCode::UnparenthesizedUnaryExponent,
                    "unparenthesized unary expression cannot be the left operand of '**'",
                ));
            }
            self.bump()?;
            let next_min = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_binary_expression(next_min)?;
            left = Node::BinaryExpression(BinaryLike {
                base: self.base(start),
                operator: op.into(),
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    // --- unary / update ---------------------------------------------------------------------

    fn parse_unary_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        if self.is_any_word(&["typeof", "void", "delete"]) {
            let op = self.cur.word().unwrap().to_string();
            self.bump()?;
            let argument = self.parse_unary_expression()?;
            if op == "delete" && self.ctx.strict && matches!(&argument, Node::Identifier(_)) {
                return Err(self.error_at(
                    start.index,
                    ErrorCode::UnexpectedToken,
                    "'delete' of an unqualified identifier is not allowed in strict mode",
                ));
            }
            return Ok(Node::UnaryExpression(UnaryLike {
                base: self.base(start),
                operator: op.into_boxed_str(),
                prefix: true,
                argument: Box::new(argument),
            }));
        }
        let unary_punct = match &self.cur.value {
            TokenValue::Punct(Punct::Plus) => Some("+"),
            TokenValue::Punct(Punct::Minus) => Some("-"),
            TokenValue::Punct(Punct::Bang) => Some("!"),
            TokenValue::Punct(Punct::Tilde) => Some("~"),
            _ => None,
        };
        if let Some(op) = unary_punct {
            self.bump()?;
            let argument = self.parse_unary_expression()?;
            return Ok(Node::UnaryExpression(UnaryLike {
                base: self.base(start),
                operator: op.into(),
                prefix: true,
                argument: Box::new(argument),
            }));
        }
        if self.is_punct(Punct::Increment) || self.is_punct(Punct::Decrement) {
            let op = if self.is_punct(Punct::Increment) { "++" } else { "--" };
            self.bump()?;
            let argument = self.parse_unary_expression()?;
            self.check_simple_assignment_target(&argument)?;
            return Ok(Node::UpdateExpression(UnaryLike {
                base: self.base(start),
                operator: op.into(),
                prefix: true,
                argument: Box::new(argument),
            }));
        }
        if self.ctx.in_async && self.is_word("await") {
            if self.ctx.in_parameters {
                return Err(self.error_at(
                    start.index,
                    ErrorCode::AwaitOutsidePermittedPosition,
                    "'await' cannot appear in an async function's own parameter defaults",
                ));
            }
            self.bump()?;
            let argument = self.parse_unary_expression()?;
            return Ok(Node::AwaitExpression(ArgumentWrapper {
                base: self.base(start),
                argument: Box::new(argument),
            }));
        }
        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let expr = self.parse_lhs_expression()?;
        if !self.cur.preceded_by_line_terminator
            && (self.is_punct(Punct::Increment) || self.is_punct(Punct::Decrement))
        {
            self.check_simple_assignment_target(&expr)?;
            let op = if self.is_punct(Punct::Increment) { "++" } else { "--" };
            self.bump()?;
            return Ok(Node::UpdateExpression(UnaryLike {
                base: self.base(start),
                operator: op.into(),
                prefix: false,
                argument: Box::new(expr),
            }));
        }
        Ok(expr)
    }

    // --- left-hand-side: new / call / member / optional chaining / tagged templates --------

    pub(super) fn parse_lhs_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let mut expr = if self.is_word("new") {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let mut has_optional = false;
        loop {
            if self.eat(Punct::Dot)? {
                let prop = self.parse_member_property_name()?;
                expr = Node::MemberExpression(MemberExpression {
                    base: self.base(start),
                    object: Box::new(expr),
                    property: Box::new(prop),
                    computed: false,
                    optional: false,
                });
            } else if self.is_punct(Punct::OptionalChain) {
                has_optional = true;
                self.bump()?;
                if self.is_punct(Punct::ParenL) {
                    let arguments = self.parse_arguments()?;
                    expr = Node::CallExpression(CallExpression {
                        base: self.base(start),
                        callee: Box::new(expr),
                        arguments,
                        optional: true,
                    });
                } else if self.eat(Punct::BracketL)? {
                    let prop = self.parse_expression()?;
                    self.expect_punct(Punct::BracketR)?;
                    expr = Node::MemberExpression(MemberExpression {
                        base: self.base(start),
                        object: Box::new(expr),
                        property: Box::new(prop),
                        computed: true,
                        optional: true,
                    });
                } else {
                    let prop = self.parse_member_property_name()?;
                    expr = Node::MemberExpression(MemberExpression {
                        base: self.base(start),
                        object: Box::new(expr),
                        property: Box::new(prop),
                        computed: false,
                        optional: true,
                    });
                }
            } else if self.eat(Punct::BracketL)? {
                let prop = self.parse_expression()?;
                self.expect_punct(Punct::BracketR)?;
                expr = Node::MemberExpression(MemberExpression {
                    base: self.base(start),
                    object: Box::new(expr),
                    property: Box::new(prop),
                    computed: true,
                    optional: false,
                });
            } else if self.is_punct(Punct::ParenL) {
                let arguments = self.parse_arguments()?;
                expr = Node::CallExpression(CallExpression {
                    base: self.base(start),
                    callee: Box::new(expr),
                    arguments,
                    optional: false,
                });
            } else if matches!(self.cur.kind, TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead) {
                let quasi = self.parse_template_literal()?;
                expr = Node::TaggedTemplateExpression(TaggedTemplateExpression {
                    base: self.base(start),
                    tag: Box::new(expr),
                    quasi: Box::new(quasi),
                });
            } else {
                break;
            }
        }
        if has_optional {
            let base = *expr.base();
            expr = Node::ChainExpression(ChainExpression {
                base,
                expression: Box::new(expr),
            });
        }
        Ok(expr)
    }

    fn parse_new_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let new_tok = self.bump()?;
        if self.eat(Punct::Dot)? {
            let prop = self.parse_identifier_name()?;
            if !matches!(&prop, Node::Identifier(i) if &*i.name == "target") {
                return Err(self.unexpected("expected 'target' after 'new.'"));
            }
            if !self.ctx.in_function {
                return Err(self.error_at(
                    start.index,
                    ErrorCode::NewTargetOutsideFunction,
                    "'new.target' outside a function",
                ));
            }
            let meta = Node::Identifier(Identifier {
                base: NodeBase::new(new_tok.range, new_tok.loc),
                name: "new".into(),
            });
            return Ok(Node::MetaProperty(MetaProperty {
                base: self.base(start),
                meta: Box::new(meta),
                property: Box::new(prop),
            }));
        }
        let callee = self.parse_member_expression_for_new()?;
        let arguments = if self.is_punct(Punct::ParenL) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Node::NewExpression(NewExpression {
            base: self.base(start),
            callee: Box::new(callee),
            arguments,
        }))
    }

    /// The callee of a `new` expression: a chain of `.`/`[...]` member accesses with no calls
    /// (a parenthesized call immediately after belongs to `new`, not to this chain).
    fn parse_member_expression_for_new(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let mut expr = if self.is_word("new") {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        loop {
            if self.eat(Punct::Dot)? {
                let prop = self.parse_member_property_name()?;
                expr = Node::MemberExpression(MemberExpression {
                    base: self.base(start),
                    object: Box::new(expr),
                    property: Box::new(prop),
                    computed: false,
                    optional: false,
                });
            } else if self.eat(Punct::BracketL)? {
                let prop = self.parse_expression()?;
                self.expect_punct(Punct::BracketR)?;
                expr = Node::MemberExpression(MemberExpression {
                    base: self.base(start),
                    object: Box::new(expr),
                    property: Box::new(prop),
                    computed: true,
                    optional: false,
                });
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// A member-access property name after `.`/`?.`: an ordinary identifier name, or a private
    /// name (`obj.#x`), which is recorded for resolution against the enclosing class body's
    /// declared private names once that class body finishes parsing (`class::pop_class_private_scope`).
    fn parse_member_property_name(&mut self) -> Result<Node, ParseError> {
        if self.cur.kind == TokenKind::PrivateName {
            let start = self.marker();
            let name = match &self.cur.value {
                TokenValue::PrivateName(n) => n.clone(),
                _ => unreachable!(),
            };
            self.bump()?;
            self.record_private_field_use(&name, start.index);
            return Ok(Node::PrivateIdentifier(PrivateIdentifier {
                base: self.base(start),
                name,
            }));
        }
        self.parse_identifier_name()
    }

    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct(Punct::ParenL)?;
        let mut args = Vec::new();
        while !self.is_punct(Punct::ParenR) {
            let start = self.marker();
            if self.eat(Punct::Ellipsis)? {
                let arg = self.parse_assignment_expression()?;
                args.push(Node::SpreadElement(ArgumentWrapper {
                    base: self.base(start),
                    argument: Box::new(arg),
                }));
            } else {
                args.push(self.parse_assignment_expression()?);
            }
            if !self.is_punct(Punct::ParenR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::ParenR)?;
        Ok(args)
    }

    // --- primary expressions -----------------------------------------------------------------

    fn parse_primary_expression(&mut self) -> Result<Node, ParseError> {
        match self.cur.kind {
            TokenKind::Num => self.parse_number_literal(),
            TokenKind::Str => self.parse_string_literal(),
            TokenKind::Regex => self.parse_regex_literal_token(),
            TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => self.parse_template_literal(),
            TokenKind::PrivateName => {
                // The brand-check form `#x in obj`.
                let start = self.marker();
                let name = match &self.cur.value {
                    TokenValue::PrivateName(n) => n.clone(),
                    _ => unreachable!(),
                };
                self.bump()?;
                self.record_private_field_use(&name, start.index);
                Ok(Node::PrivateIdentifier(PrivateIdentifier {
                    base: self.base(start),
                    name,
                }))
            }
            TokenKind::Name => self.parse_identifier_or_keyword_primary(),
            TokenKind::Punct => match &self.cur.value {
                TokenValue::Punct(Punct::Slash) | TokenValue::Punct(Punct::SlashAssign) => {
                    let slash_start = self.marker();
                    let tok = self.lexer.rescan_as_regex(slash_start)?;
                    self.cur = tok;
                    self.parse_regex_literal_token()
                }
                TokenValue::Punct(Punct::ParenL) => self.parse_paren_or_arrow(),
                TokenValue::Punct(Punct::BracketL) => self.parse_array_literal(),
                TokenValue::Punct(Punct::BraceL) => self.parse_object_literal(),
                _ => Err(self.unexpected("unexpected token")),
            },
            _ => Err(self.unexpected("unexpected token")),
        }
    }

    fn parse_identifier_or_keyword_primary(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        if self.is_word("this") {
            self.bump()?;
            return Ok(Node::ThisExpression(Leaf { base: self.base(start) }));
        }
        if self.is_word("super") {
            self.bump()?;
            if !self.ctx.in_method {
                return Err(self.error_at(start.index, ErrorCode::SuperOutsideClass, "'super' outside a class method"));
            }
            return Ok(Node::Super(Leaf { base: self.base(start) }));
        }
        if self.is_word("null") {
            self.bump()?;
            return Ok(Node::Literal(Literal {
                base: self.base(start),
                value: None,
                raw: "null".into(),
                regex: None,
                bigint: None,
            }));
        }
        if self.is_word("true") || self.is_word("false") {
            let value = self.is_word("true");
            self.bump()?;
            return Ok(Node::Literal(Literal {
                base: self.base(start),
                value: Some(LiteralScalar::Bool(value)),
                raw: if value { "true".into() } else { "false".into() },
                regex: None,
                bigint: None,
            }));
        }
        if self.is_word("function") {
            return self.parse_function_expression(false);
        }
        if self.is_word("class") {
            return self.parse_class_expression();
        }
        if self.is_word("import") {
            return self.parse_import_call_or_meta();
        }
        if self.is_word("async") {
            if self.next_is_function_keyword_same_line()? {
                self.bump()?;
                return self.parse_function_expression(true);
            }
            if self.is_async_arrow_ahead()? {
                return self.parse_async_arrow_function();
            }
        }
        let ident = self.parse_identifier_reference()?;
        if self.is_punct(Punct::Arrow) && !self.cur.preceded_by_line_terminator {
            return self.finish_arrow_function(start, vec![ident], false);
        }
        Ok(ident)
    }

    /// `self.cur` is the `async` word, not yet consumed: true if it is immediately (same line)
    /// followed by `function`.
    pub(super) fn next_is_function_keyword_same_line(&mut self) -> Result<bool, ParseError> {
        let snap = self.snapshot();
        self.bump()?;
        let result = !self.cur.preceded_by_line_terminator && self.is_word("function");
        self.restore(snap);
        Ok(result)
    }

    /// `self.cur` is the `async` word, not yet consumed: true if `async` starts an async arrow
    /// function (`async x => ...` or `async (...) => ...`), found by speculatively consuming
    /// the parameter list and checking for a following `=>`.
    fn is_async_arrow_ahead(&mut self) -> Result<bool, ParseError> {
        let snap = self.snapshot();
        self.bump()?;
        let result = if self.cur.preceded_by_line_terminator {
            false
        } else if self.cur.kind == TokenKind::Name && !self.is_word("function") {
            self.bump()?;
            self.is_punct(Punct::Arrow) && !self.cur.preceded_by_line_terminator
        } else if self.is_punct(Punct::ParenL) {
            if self.skip_balanced_parens().is_ok() {
                self.is_punct(Punct::Arrow)
            } else {
                false
            }
        } else {
            false
        };
        self.restore(snap);
        Ok(result)
    }

    fn skip_balanced_parens(&mut self) -> Result<(), ParseError> {
        debug_assert!(self.is_punct(Punct::ParenL));
        let mut depth = 0i32;
        loop {
            if self.is_punct(Punct::ParenL) {
                depth += 1;
            } else if self.is_punct(Punct::ParenR) {
                depth -= 1;
                if depth == 0 {
                    self.bump()?;
                    return Ok(());
                }
            } else if self.is_eof() {
                return Err(self.unexpected("unexpected end of input"));
            }
            self.bump()?;
        }
    }

    fn parse_async_arrow_function(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.bump()?; // 'async'
        // Unlike an ordinary arrow's params (reinterpreted from an already-parsed parenthesized
        // expression under the *enclosing* context), an async arrow's param list is parsed fresh
        // as its own [+Await] production, so its own `await` in a default value is as disallowed
        // here as in an `async function`'s own params.
        let saved_in_async = self.ctx.in_async;
        let saved_in_parameters = self.ctx.in_parameters;
        self.ctx.in_async = true;
        self.ctx.in_parameters = true;
        let params = if self.is_punct(Punct::ParenL) {
            self.parse_arrow_params_list()?
        } else {
            vec![self.parse_binding_identifier()?]
        };
        self.ctx.in_async = saved_in_async;
        self.ctx.in_parameters = saved_in_parameters;
        self.finish_arrow_function(start, params, true)
    }

    fn parse_paren_or_arrow(&mut self) -> Result<Node, ParseError> {
        let snap = self.snapshot();
        match self.try_parse_arrow_function_from_parens() {
            Ok(node) => Ok(node),
            Err(_) => {
                self.restore(snap);
                self.parse_parenthesized_expression()
            }
        }
    }

    fn try_parse_arrow_function_from_parens(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let params = self.parse_arrow_params_list()?;
        if self.cur.preceded_by_line_terminator || !self.is_punct(Punct::Arrow) {
            return Err(self.unexpected("expected '=>'"));
        }
        self.finish_arrow_function(start, params, false)
    }

    fn parse_arrow_params_list(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct(Punct::ParenL)?;
        let mut params = Vec::new();
        while !self.is_punct(Punct::ParenR) {
            if self.is_punct(Punct::Ellipsis) {
                let rest_start = self.marker();
                self.bump()?;
                let target = self.parse_binding_target()?;
                params.push(Node::RestElement(ArgumentWrapper {
                    base: self.base(rest_start),
                    argument: Box::new(target),
                }));
                break;
            }
            params.push(self.parse_binding_element()?);
            if !self.is_punct(Punct::ParenR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::ParenR)?;
        Ok(params)
    }

    fn finish_arrow_function(&mut self, start: Marker, params: Vec<Node>, is_async: bool) -> Result<Node, ParseError> {
        self.expect_punct(Punct::Arrow)?;
        self.check_duplicate_params(&params, true)?;
        let saved = self.ctx;
        self.ctx.in_function = true;
        self.ctx.in_generator = false;
        self.ctx.in_async = is_async;
        self.ctx.in_loop = false;
        self.ctx.in_switch = false;
        self.ctx.allow_in = true;
        let (body, expression) = if self.is_punct(Punct::BraceL) {
            (self.parse_function_body()?, false)
        } else {
            (self.parse_assignment_expression()?, true)
        };
        self.ctx = saved;
        Ok(Node::ArrowFunctionExpression(Function {
            base: self.base(start),
            id: None,
            params,
            body: Box::new(body),
            generator: false,
            is_async,
            expression,
        }))
    }

    fn parse_parenthesized_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_punct(Punct::ParenL)?;
        let allow_in = self.ctx.allow_in;
        self.ctx.allow_in = true;
        let expr = self.parse_expression()?;
        self.ctx.allow_in = allow_in;
        self.expect_punct(Punct::ParenR)?;
        if self.lexer.options().preserve_parens {
            Ok(Node::ParenthesizedExpression(ArgumentWrapper {
                base: self.base(start),
                argument: Box::new(expr),
            }))
        } else {
            Ok(expr)
        }
    }

    // --- array / object literals (cover grammar for destructuring targets) -----------------

    fn parse_array_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_punct(Punct::BracketL)?;
        let mut elements = Vec::new();
        while !self.is_punct(Punct::BracketR) {
            if self.eat(Punct::Comma)? {
                elements.push(None);
                continue;
            }
            if self.is_punct(Punct::Ellipsis) {
                let rest_start = self.marker();
                self.bump()?;
                let arg = self.parse_assignment_expression()?;
                elements.push(Some(Node::SpreadElement(ArgumentWrapper {
                    base: self.base(rest_start),
                    argument: Box::new(arg),
                })));
                if !self.is_punct(Punct::BracketR) {
                    self.expect_punct(Punct::Comma)?;
                }
                continue;
            }
            elements.push(Some(self.parse_assignment_expression()?));
            if !self.is_punct(Punct::BracketR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::BracketR)?;
        Ok(Node::ArrayExpression(ArrayExprPat {
            base: self.base(start),
            elements,
        }))
    }

    fn parse_object_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_punct(Punct::BraceL)?;
        let mut properties = Vec::new();
        let mut proto_key_seen = false;
        while !self.is_punct(Punct::BraceR) {
            if self.is_punct(Punct::Ellipsis) {
                let rest_start = self.marker();
                self.bump()?;
                let arg = self.parse_assignment_expression()?;
                properties.push(Node::SpreadElement(ArgumentWrapper {
                    base: self.base(rest_start),
                    argument: Box::new(arg),
                }));
            } else {
                let (prop, is_proto) = self.parse_object_member()?;
                if is_proto {
                    if proto_key_seen {
                        return Err(self.error_at(
                            prop.range().start,
                            ErrorCode::DuplicateProtoKey,
                            "duplicate '__proto__' key in object literal",
                        ));
                    }
                    proto_key_seen = true;
                }
                properties.push(prop);
            }
            if !self.is_punct(Punct::BraceR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::BraceR)?;
        Ok(Node::ObjectExpression(ObjectExprPat {
            base: self.base(start),
            properties,
        }))
    }

    /// One object literal member. Returns whether it is a plain (non-computed, non-method,
    /// non-shorthand) `__proto__` key, the one case ECMAScript gives special meaning to.
    fn parse_object_member(&mut self) -> Result<(Node, bool), ParseError> {
        let start = self.marker();
        let is_async = self.is_word("async") && !self.next_is_punct_after_word(&[Punct::Colon, Punct::Comma, Punct::ParenL, Punct::BraceR]);
        if is_async {
            self.bump()?;
        }
        let generator = self.eat(Punct::Star)?;
        let mut kind = PropertyKind::Init;
        if !is_async && !generator && self.is_any_word(&["get", "set"]) {
            let which = self.cur.word().unwrap().to_string();
            if !self.next_is_punct_after_word(&[Punct::Colon, Punct::Comma, Punct::ParenL, Punct::BraceR]) {
                self.bump()?;
                kind = if which == "get" { PropertyKind::Get } else { PropertyKind::Set };
            }
        }
        let (key, computed) = self.parse_property_key()?;
        if self.is_punct(Punct::ParenL) || kind != PropertyKind::Init {
            let params = self.parse_function_params()?;
            let body = self.parse_function_body()?;
            let value = Node::FunctionExpression(Function {
                base: self.base(start),
                id: None,
                params,
                body: Box::new(body),
                generator,
                is_async,
                expression: false,
            });
            return Ok((
                Node::Property(Property {
                    base: self.base(start),
                    key: Box::new(key),
                    value: Box::new(value),
                    kind,
                    computed,
                    method: true,
                    shorthand: false,
                }),
                false,
            ));
        }
        let is_proto_key = !computed && matches!(&key, Node::Identifier(i) if &*i.name == "__proto__");
        if self.eat(Punct::Colon)? {
            let value = self.parse_assignment_expression()?;
            return Ok((
                Node::Property(Property {
                    base: self.base(start),
                    key: Box::new(key),
                    value: Box::new(value),
                    kind: PropertyKind::Init,
                    computed,
                    method: false,
                    shorthand: false,
                }),
                is_proto_key,
            ));
        }
        // shorthand `{ a }` / `{ a = default }` (the latter only valid under the
        // destructuring-assignment cover grammar; `expr_to_pattern` re-validates it).
        let value = if self.eat(Punct::Assign)? {
            let default = self.parse_assignment_expression()?;
            Node::AssignmentPattern(AssignmentPattern {
                base: self.base(start),
                left: Box::new(key.clone()),
                right: Box::new(default),
            })
        } else {
            key.clone()
        };
        Ok((
            Node::Property(Property {
                base: self.base(start),
                key: Box::new(key),
                value: Box::new(value),
                kind: PropertyKind::Init,
                computed,
                method: false,
                shorthand: true,
            }),
            false,
        ))
    }

    /// `self.cur` is the `async`/`get`/`set` contextual keyword, not yet consumed: true if the
    /// token after it is one of `follow`, meaning the word is itself the property key (e.g.
    /// `{ async: 1 }`) rather than a modifier.
    pub(super) fn next_is_punct_after_word(&mut self, follow: &[Punct]) -> bool {
        let snap = self.snapshot();
        let result = (|| -> Result<bool, ParseError> {
            self.bump()?;
            Ok(follow.iter().any(|p| self.is_punct(*p)))
        })();
        self.restore(snap);
        result.unwrap_or(false)
    }

    // --- literals ----------------------------------------------------------------------------

    fn parse_number_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let raw = self.raw_text(self.cur.range);
        if self.cur.legacy_octal && self.ctx.strict {
            return Err(self.error_at(
                start.index,
                ErrorCode::LegacyOctalLiteralInStrictMode,
                "octal literals are not allowed in strict mode",
            ));
        }
        let (value, bigint) = match &self.cur.value {
            TokenValue::Number(NumberValue::Float(f)) => (Some(LiteralScalar::Number(*f)), None),
            TokenValue::Number(NumberValue::BigInt(b)) => (None, Some(b.clone())),
            _ => unreachable!(),
        };
        self.bump()?;
        Ok(Node::Literal(Literal {
            base: self.base(start),
            value,
            raw,
            regex: None,
            bigint,
        }))
    }

    pub(super) fn parse_string_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let raw = self.raw_text(self.cur.range);
        if self.cur.legacy_octal && self.ctx.strict {
            return Err(self.error_at(
                start.index,
                ErrorCode::LegacyOctalEscapeInStrictMode,
                "octal escape sequences are not allowed in strict mode",
            ));
        }
        let value = match &self.cur.value {
            TokenValue::Str(s) => s.clone(),
            _ => unreachable!(),
        };
        self.bump()?;
        Ok(Node::Literal(Literal {
            base: self.base(start),
            value: Some(LiteralScalar::Str(value)),
            raw,
            regex: None,
            bigint: None,
        }))
    }

    fn parse_regex_literal_token(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let raw = self.raw_text(self.cur.range);
        let (pattern, flags) = match &self.cur.value {
            TokenValue::Regex { pattern, flags } => (pattern.clone(), flags.clone()),
            _ => unreachable!(),
        };
        self.validate_regex_flags(&flags, start.index)?;
        self.bump()?;
        Ok(Node::Literal(Literal {
            base: self.base(start),
            value: None,
            raw,
            regex: Some(RegexMeta { pattern, flags }),
            bigint: None,
        }))
    }

    fn validate_regex_flags(&self, flags: &str, pos: usize) -> Result<(), ParseError> {
        let mut seen = std::collections::HashSet::new();
        for c in flags.chars() {
            if !matches!(c, 'd' | 'g' | 'i' | 'm' | 's' | 'u' | 'v' | 'y') || !seen.insert(c) {
                return Err(self.error_at(
                    pos,
                    ErrorCode::InvalidRegexFlags,
                    format!("invalid regular expression flag '{}'", c),
                ));
            }
        }
        Ok(())
    }

    pub(super) fn parse_template_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let (is_tail, elem) = self.parse_template_element()?;
            quasis.push(elem);
            if is_tail {
                break;
            }
            let expr = self.parse_expression()?;
            expressions.push(expr);
            if !self.is_punct(Punct::BraceR) {
                return Err(self.unexpected("expected '}' in template literal"));
            }
            let after_brace = Marker::new(self.cur.range.end, self.cur.loc.end.line, self.cur.loc.end.column);
            self.lexer.seek(after_brace);
            self.cur = self.lexer.rescan_template_continuation()?;
        }
        Ok(Node::TemplateLiteral(TemplateLiteral {
            base: self.base(start),
            quasis,
            expressions,
        }))
    }

    fn parse_template_element(&mut self) -> Result<(bool, Node), ParseError> {
        let start = self.marker();
        let kind = self.cur.kind;
        let (raw, cooked) = match &self.cur.value {
            TokenValue::Template { raw, cooked } => (raw.clone(), cooked.clone()),
            _ => return Err(self.unexpected("expected template chunk")),
        };
        let is_tail = matches!(kind, TokenKind::NoSubstitutionTemplate | TokenKind::TemplateTail);
        self.bump()?;
        Ok((
            is_tail,
            Node::TemplateElement(TemplateElement {
                base: self.base(start),
                tail: is_tail,
                value: TemplateElementValue { raw, cooked },
            }),
        ))
    }

    // --- function expressions, shared with function declarations (stmt.rs) -----------------

    pub(super) fn parse_function_expression(&mut self, is_async: bool) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("function")?;
        let generator = self.eat(Punct::Star)?;
        let id = if self.cur.kind == TokenKind::Name {
            Some(Box::new(self.parse_binding_identifier()?))
        } else {
            None
        };
        let saved = self.ctx;
        self.ctx.in_function = true;
        self.ctx.in_generator = generator;
        self.ctx.in_async = is_async;
        self.ctx.in_loop = false;
        self.ctx.in_switch = false;
        self.ctx.allow_in = true;
        self.ctx.in_parameters = true;
        let params = self.parse_function_params()?;
        self.ctx.in_parameters = false;
        let body = self.parse_function_body()?;
        self.check_duplicate_params(&params, self.ctx.strict || generator || is_async)?;
        self.ctx = saved;
        Ok(Node::FunctionExpression(Function {
            base: self.base(start),
            id,
            params,
            body: Box::new(body),
            generator,
            is_async,
            expression: false,
        }))
    }

    pub(super) fn parse_function_params(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct(Punct::ParenL)?;
        let mut params = Vec::new();
        while !self.is_punct(Punct::ParenR) {
            if self.is_punct(Punct::Ellipsis) {
                let start = self.marker();
                self.bump()?;
                let target = self.parse_binding_target()?;
                params.push(Node::RestElement(ArgumentWrapper {
                    base: self.base(start),
                    argument: Box::new(target),
                }));
                break;
            }
            params.push(self.parse_binding_element()?);
            if !self.is_punct(Punct::ParenR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::ParenR)?;
        Ok(params)
    }

    /// Whether the upcoming `{ ... }` function body begins with a `"use strict"` directive,
    /// determined without committing to a full parse — a binding's strict-mode legality (e.g.
    /// `eval`/`arguments` as a parameter name) depends on it, and the directive only appears
    /// after the parameter list is already behind us.
    fn body_starts_with_use_strict(&mut self) -> Result<bool, ParseError> {
        let snap = self.snapshot();
        let result = (|| -> Result<bool, ParseError> {
            self.bump()?; // consume '{'
            loop {
                if self.cur.kind != TokenKind::Str {
                    return Ok(false);
                }
                let raw = self.raw_text(self.cur.range);
                let is_use_strict = &*raw == "\"use strict\"" || &*raw == "'use strict'";
                self.bump()?;
                let ends_directive = self.eat(Punct::Semi)? || self.can_insert_semicolon();
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

    pub(super) fn parse_function_body(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        if self.body_starts_with_use_strict()? {
            self.ctx.strict = true;
        }
        self.expect_punct(Punct::BraceL)?;
        let body = self.parse_statement_list_until(|p| p.is_punct(Punct::BraceR));
        let body = body?;
        self.expect_punct(Punct::BraceR)?;
        Ok(Node::BlockStatement(BlockStatement {
            base: self.base(start),
            body,
        }))
    }

    /// Duplicate parameter names are forbidden whenever the caller already requires it (strict
    /// mode, generators, async functions, arrows — all pass `true`) and, independent of that,
    /// whenever the parameter list itself is non-simple (a default, a destructuring pattern, or
    /// a rest element) — that restriction applies even in a plain sloppy-mode function.
    pub(super) fn check_duplicate_params(&self, params: &[Node], forbid_duplicates: bool) -> Result<(), ParseError> {
        let forbid_duplicates = forbid_duplicates || !params_are_simple(params);
        if !forbid_duplicates {
            return Ok(());
        }
        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();
        for p in params {
            collect_pattern_names(p, &mut names);
        }
        for (name, range) in names {
            if !seen.insert(name.clone()) {
                return Err(self.error_at(
                    range.start,
                    ErrorCode::DuplicateParameterName,
                    format!("duplicate parameter name '{}'", name),
                ));
            }
        }
        Ok(())
    }

    // --- yield / dynamic import / import.meta -----------------------------------------------

    fn parse_yield_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("yield")?;
        let delegate = self.eat(Punct::Star)?;
        let can_have_argument = !self.cur.preceded_by_line_terminator
            && !self.is_punct(Punct::Semi)
            && !self.is_punct(Punct::ParenR)
            && !self.is_punct(Punct::BracketR)
            && !self.is_punct(Punct::BraceR)
            && !self.is_punct(Punct::Comma)
            && !self.is_punct(Punct::Colon)
            && !self.is_eof();
        let argument = if delegate || can_have_argument {
            Some(Box::new(self.parse_assignment_expression()?))
        } else {
            None
        };
        Ok(Node::YieldExpression(YieldExpression {
            base: self.base(start),
            argument,
            delegate,
        }))
    }

    fn parse_import_call_or_meta(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let import_tok = self.expect_word("import")?;
        if self.eat(Punct::Dot)? {
            let prop = self.parse_identifier_name()?;
            if !matches!(&prop, Node::Identifier(i) if &*i.name == "meta") {
                return Err(self.unexpected("expected 'meta' after 'import.'"));
            }
            if !self.ctx.module {
                return Err(self.error_at(
                    start.index,
                    ErrorCode::ModuleSyntaxInScript,
                    "'import.meta' is only valid in a module",
                ));
            }
            let meta = Node::Identifier(Identifier {
                base: NodeBase::new(import_tok.range, import_tok.loc),
                name: "import".into(),
            });
            return Ok(Node::MetaProperty(MetaProperty {
                base: self.base(start),
                meta: Box::new(meta),
                property: Box::new(prop),
            }));
        }
        self.expect_punct(Punct::ParenL)?;
        let source = self.parse_assignment_expression()?;
        let options = if self.eat(Punct::Comma)? && !self.is_punct(Punct::ParenR) {
            Some(Box::new(self.parse_assignment_expression()?))
        } else {
            None
        };
        if self.is_punct(Punct::Comma) {
            self.bump()?;
        }
        self.expect_punct(Punct::ParenR)?;
        Ok(Node::ImportExpression(ImportExpression {
            base: self.base(start),
            source: Box::new(source),
            options,
        }))
    }
}

/// Flatten a binding pattern into its leaf identifier names, for duplicate-parameter checking.
fn collect_pattern_names(node: &Node, out: &mut Vec<(String, Range)>) {
    match node {
        Node::Identifier(i) => out.push((i.name.to_string(), i.base.range)),
        Node::AssignmentPattern(a) => collect_pattern_names(&a.left, out),
        Node::RestElement(r) => collect_pattern_names(&r.argument, out),
        Node::ArrayPattern(a) => {
            for el in a.elements.iter().flatten() {
                collect_pattern_names(el, out);
            }
        }
        Node::ObjectPattern(o) => {
            for prop in &o.properties {
                match prop {
                    Node::Property(p) => collect_pattern_names(&p.value, out),
                    Node::RestElement(r) => collect_pattern_names(&r.argument, out),
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

/// A parameter list is "simple" if every parameter is a bare identifier with no default value,
/// destructuring pattern, or rest element (spec §4.4) — duplicate parameter names are only ever
/// tolerated when every parameter is simple.
fn params_are_simple(params: &[Node]) -> bool {
    params.iter().all(|p| matches!(p, Node::Identifier(_)))
}
