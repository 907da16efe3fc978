//! Statement grammar: the statement dispatch, declarations (`var`/`let`/`const`, function,
//! class), control flow, and ASI (spec §4.3, §4.5). `for` head disambiguation — ordinary
//! `for(;;)` vs `for...in`/`for...of`/`for await...of` — lives here since it is the one place
//! a statement and a declaration share a prefix long enough to need real backtracking.

use super::*;
use crate::scope::{BindingKind, ScopeKind};

fn ident_name(node: &Node) -> &str {
    match node {
        Node::Identifier(i) => &i.name,
        _ => "",
    }
}

impl<'c> Parser<'c> {
    pub(super) fn parse_statement_list_item(&mut self) -> Result<Node, ParseError> {
        if self.is_word("function") {
            return self.parse_function_declaration(false);
        }
        if self.is_word("async") && self.next_is_function_keyword_same_line()? {
            return self.parse_function_declaration(true);
        }
        if self.is_word("class") {
            return self.parse_class_declaration();
        }
        if self.is_any_word(&["let", "const"]) && self.next_word_starts_binding()? {
            return self.parse_lexical_declaration();
        }
        if self.is_word("var") {
            return self.parse_variable_statement();
        }
        if self.is_word("import") && !self.is_import_call_or_meta_ahead()? {
            return self.parse_import_declaration();
        }
        if self.is_word("export") {
            return self.parse_export_declaration();
        }
        self.parse_statement()
    }

    fn next_word_starts_binding(&mut self) -> Result<bool, ParseError> {
        let snap = self.snapshot();
        self.bump()?;
        let result = self.cur.kind == TokenKind::Name || self.is_punct(Punct::BracketL) || self.is_punct(Punct::BraceL);
        self.restore(snap);
        Ok(result)
    }

    fn is_import_call_or_meta_ahead(&mut self) -> Result<bool, ParseError> {
        let snap = self.snapshot();
        self.bump()?;
        let result = self.is_punct(Punct::ParenL) || self.is_punct(Punct::Dot);
        self.restore(snap);
        Ok(result)
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        if self.is_punct(Punct::BraceL) {
            return self.parse_block_statement();
        }
        if self.is_punct(Punct::Semi) {
            let start = self.marker();
            self.bump()?;
            return Ok(Node::EmptyStatement(Leaf { base: self.base(start) }));
        }
        if self.is_word("var") {
            return self.parse_variable_statement();
        }
        if self.is_word("if") {
            return self.parse_if_statement();
        }
        if self.is_word("for") {
            return self.parse_for_statement();
        }
        if self.is_word("while") {
            return self.parse_while_statement();
        }
        if self.is_word("do") {
            return self.parse_do_while_statement();
        }
        if self.is_word("switch") {
            return self.parse_switch_statement();
        }
        if self.is_word("try") {
            return self.parse_try_statement();
        }
        if self.is_word("throw") {
            return self.parse_throw_statement();
        }
        if self.is_word("return") {
            return self.parse_return_statement();
        }
        if self.is_word("break") {
            return self.parse_break_continue(true);
        }
        if self.is_word("continue") {
            return self.parse_break_continue(false);
        }
        if self.is_word("with") {
            return self.parse_with_statement();
        }
        if self.is_word("debugger") {
            let start = self.marker();
            self.bump()?;
            self.consume_semicolon()?;
            return Ok(Node::DebuggerStatement(Leaf { base: self.base(start) }));
        }
        if self.is_word("function") {
            return self.parse_function_declaration(false);
        }
        if self.is_word("class") {
            return self.parse_class_declaration();
        }
        if self.cur.kind == TokenKind::Name {
            return self.parse_labeled_or_expression_statement();
        }
        self.parse_expression_statement()
    }

    fn parse_block_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_punct(Punct::BraceL)?;
        self.scope.push(ScopeKind::Block);
        let body = self.parse_statement_list_until(|p| p.is_punct(Punct::BraceR));
        self.scope.pop();
        let body = body?;
        self.expect_punct(Punct::BraceR)?;
        Ok(Node::BlockStatement(BlockStatement {
            base: self.base(start),
            body,
        }))
    }

    // --- declarations --------------------------------------------------------------------

    pub(super) fn declare_pattern(&mut self, node: &Node, kind: BindingKind) -> Result<(), ParseError> {
        match node {
            Node::Identifier(i) => {
                self.scope.declare(&i.name, kind).map_err(|_| {
                    self.error_at(
                        i.base.range.start,
                        ErrorCode::DuplicateLexicalBinding,
                        format!("identifier '{}' has already been declared", i.name),
                    )
                })?;
            }
            Node::AssignmentPattern(a) => self.declare_pattern(&a.left, kind)?,
            Node::RestElement(r) => self.declare_pattern(&r.argument, kind)?,
            Node::ArrayPattern(a) => {
                for el in a.elements.iter().flatten() {
                    self.declare_pattern(el, kind)?;
                }
            }
            Node::ObjectPattern(o) => {
                for prop in &o.properties {
                    match prop {
                        Node::Property(p) => self.declare_pattern(&p.value, kind)?,
                        Node::RestElement(r) => self.declare_pattern(&r.argument, kind)?,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn parse_variable_declarator(&mut self, binding_kind: BindingKind) -> Result<Node, ParseError> {
        let start = self.marker();
        let id = self.parse_binding_target()?;
        self.declare_pattern(&id, binding_kind)?;
        let init = if self.eat(Punct::Assign)? {
            Some(Box::new(self.parse_assignment_expression()?))
        } else {
            None
        };
        Ok(Node::VariableDeclarator(VariableDeclarator {
            base: self.base(start),
            id: Box::new(id),
            init,
        }))
    }

    fn parse_variable_declaration_list(&mut self, binding_kind: BindingKind) -> Result<Vec<Node>, ParseError> {
        let mut decls = vec![self.parse_variable_declarator(binding_kind)?];
        while self.eat(Punct::Comma)? {
            decls.push(self.parse_variable_declarator(binding_kind)?);
        }
        Ok(decls)
    }

    fn parse_variable_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("var")?;
        let declarations = self.parse_variable_declaration_list(BindingKind::Var)?;
        self.consume_semicolon()?;
        Ok(Node::VariableDeclaration(VariableDeclaration {
            base: self.base(start),
            declarations,
            kind: "var".into(),
        }))
    }

    fn parse_lexical_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let kind_word = self.cur.word().unwrap().to_string();
        self.bump()?;
        let declarations = self.parse_variable_declaration_list(BindingKind::Lexical)?;
        self.consume_semicolon()?;
        Ok(Node::VariableDeclaration(VariableDeclaration {
            base: self.base(start),
            declarations,
            kind: kind_word.into_boxed_str(),
        }))
    }

    pub(super) fn parse_function_declaration(&mut self, is_async: bool) -> Result<Node, ParseError> {
        let start = self.marker();
        if is_async {
            self.bump()?;
        }
        self.expect_word("function")?;
        let generator = self.eat(Punct::Star)?;
        let id = self.parse_binding_identifier()?;
        self.declare_pattern(&id, BindingKind::Function)?;
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
        Ok(Node::FunctionDeclaration(Function {
            base: self.base(start),
            id: Some(Box::new(id)),
            params,
            body: Box::new(body),
            generator,
            is_async,
            expression: false,
        }))
    }

    // --- control flow --------------------------------------------------------------------

    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("if")?;
        self.expect_punct(Punct::ParenL)?;
        let test = self.parse_expression()?;
        self.expect_punct(Punct::ParenR)?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat_word("else")? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Node::IfStatement(IfStatement {
            base: self.base(start),
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate,
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("while")?;
        self.expect_punct(Punct::ParenL)?;
        let test = self.parse_expression()?;
        self.expect_punct(Punct::ParenR)?;
        let saved = self.ctx.in_loop;
        self.ctx.in_loop = true;
        let body = self.parse_statement()?;
        self.ctx.in_loop = saved;
        Ok(Node::WhileStatement(WhileStatement {
            base: self.base(start),
            test: Box::new(test),
            body: Box::new(body),
        }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("do")?;
        let saved = self.ctx.in_loop;
        self.ctx.in_loop = true;
        let body = self.parse_statement()?;
        self.ctx.in_loop = saved;
        self.expect_word("while")?;
        self.expect_punct(Punct::ParenL)?;
        let test = self.parse_expression()?;
        self.expect_punct(Punct::ParenR)?;
        self.eat(Punct::Semi)?;
        Ok(Node::DoWhileStatement(WhileStatement {
            base: self.base(start),
            test: Box::new(test),
            body: Box::new(body),
        }))
    }

    fn parse_for_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("for")?;
        let is_await = self.ctx.in_async && self.eat_word("await")?;
        self.expect_punct(Punct::ParenL)?;
        self.scope.push(ScopeKind::Block);

        if self.is_punct(Punct::Semi) {
            return self.finish_for_statement(start, None);
        }

        if self.is_word("var") || (self.is_any_word(&["let", "const"]) && self.next_word_starts_binding()?) {
            let decl_start = self.marker();
            let (kind_word, binding_kind) = if self.is_word("var") {
                ("var".to_string(), BindingKind::Var)
            } else {
                (self.cur.word().unwrap().to_string(), BindingKind::Lexical)
            };
            self.bump()?;
            let saved_allow_in = self.ctx.allow_in;
            self.ctx.allow_in = false;
            let first_target = self.parse_binding_target()?;
            self.ctx.allow_in = saved_allow_in;

            if self.is_word("in") || self.is_word("of") {
                self.declare_pattern(&first_target, binding_kind)?;
                let decl = Node::VariableDeclaration(VariableDeclaration {
                    base: self.base(decl_start),
                    declarations: vec![Node::VariableDeclarator(VariableDeclarator {
                        base: self.base(decl_start),
                        id: Box::new(first_target),
                        init: None,
                    })],
                    kind: kind_word.into_boxed_str(),
                });
                return self.finish_for_in_of(start, decl, is_await);
            }

            self.declare_pattern(&first_target, binding_kind)?;
            let saved_allow_in = self.ctx.allow_in;
            self.ctx.allow_in = false;
            let first_init = if self.eat(Punct::Assign)? {
                Some(Box::new(self.parse_assignment_expression()?))
            } else {
                None
            };
            let mut declarations = vec![Node::VariableDeclarator(VariableDeclarator {
                base: self.base(decl_start),
                id: Box::new(first_target),
                init: first_init,
            })];
            while self.eat(Punct::Comma)? {
                declarations.push(self.parse_variable_declarator(binding_kind)?);
            }
            self.ctx.allow_in = saved_allow_in;
            let decl = Node::VariableDeclaration(VariableDeclaration {
                base: self.base(decl_start),
                declarations,
                kind: kind_word.into_boxed_str(),
            });
            return self.finish_for_statement(start, Some(decl));
        }

        let saved_allow_in = self.ctx.allow_in;
        self.ctx.allow_in = false;
        let expr = self.parse_expression()?;
        self.ctx.allow_in = saved_allow_in;
        if self.is_word("in") || self.is_word("of") {
            let target = self.expr_to_pattern(expr, true)?;
            return self.finish_for_in_of(start, target, is_await);
        }
        self.finish_for_statement(start, Some(expr))
    }

    fn finish_for_statement(&mut self, start: Marker, init: Option<Node>) -> Result<Node, ParseError> {
        self.expect_punct(Punct::Semi)?;
        let test = if self.is_punct(Punct::Semi) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_punct(Punct::Semi)?;
        let update = if self.is_punct(Punct::ParenR) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect_punct(Punct::ParenR)?;
        let saved_loop = self.ctx.in_loop;
        self.ctx.in_loop = true;
        let body = self.parse_statement()?;
        self.ctx.in_loop = saved_loop;
        self.scope.pop();
        Ok(Node::ForStatement(ForStatement {
            base: self.base(start),
            init: init.map(Box::new),
            test,
            update,
            body: Box::new(body),
        }))
    }

    fn finish_for_in_of(&mut self, start: Marker, left: Node, is_await: bool) -> Result<Node, ParseError> {
        let is_of = self.is_word("of");
        self.bump()?; // 'in' or 'of'
        let right = if is_of {
            self.parse_assignment_expression()?
        } else {
            self.parse_expression()?
        };
        self.expect_punct(Punct::ParenR)?;
        let saved_loop = self.ctx.in_loop;
        self.ctx.in_loop = true;
        let body = self.parse_statement()?;
        self.ctx.in_loop = saved_loop;
        self.scope.pop();
        let node = ForInOfStatement {
            base: self.base(start),
            left: Box::new(left),
            right: Box::new(right),
            body: Box::new(body),
            is_await,
        };
        Ok(if is_of {
            Node::ForOfStatement(node)
        } else {
            Node::ForInStatement(node)
        })
    }

    fn parse_switch_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("switch")?;
        self.expect_punct(Punct::ParenL)?;
        let discriminant = self.parse_expression()?;
        self.expect_punct(Punct::ParenR)?;
        self.expect_punct(Punct::BraceL)?;
        self.scope.push(ScopeKind::Block);
        let saved_switch = self.ctx.in_switch;
        self.ctx.in_switch = true;
        let mut cases = Vec::new();
        let mut default_seen = false;
        while !self.is_punct(Punct::BraceR) {
            let case_start = self.marker();
            let test = if self.eat_word("case")? {
                Some(Box::new(self.parse_expression()?))
            } else {
                self.expect_word("default")?;
                if default_seen {
                    return Err(self.unexpected("multiple 'default' clauses in switch"));
                }
                default_seen = true;
                None
            };
            self.expect_punct(Punct::Colon)?;
            let mut consequent = Vec::new();
            while !self.is_punct(Punct::BraceR) && !self.is_word("case") && !self.is_word("default") {
                consequent.push(self.parse_statement_list_item()?);
            }
            cases.push(Node::SwitchCase(SwitchCase {
                base: self.base(case_start),
                test,
                consequent,
            }));
        }
        self.ctx.in_switch = saved_switch;
        self.scope.pop();
        self.expect_punct(Punct::BraceR)?;
        Ok(Node::SwitchStatement(SwitchStatement {
            base: self.base(start),
            discriminant: Box::new(discriminant),
            cases,
        }))
    }

    fn parse_try_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("try")?;
        let block = self.parse_block_statement()?;
        let handler = if self.eat_word("catch")? {
            let catch_start = self.marker();
            let param = if self.eat(Punct::ParenL)? {
                let p = self.parse_binding_target()?;
                self.expect_punct(Punct::ParenR)?;
                Some(Box::new(p))
            } else {
                None
            };
            self.scope.push(ScopeKind::Block);
            if let Some(p) = &param {
                let kind = if matches!(**p, Node::Identifier(_)) {
                    BindingKind::SimpleCatch
                } else {
                    BindingKind::Lexical
                };
                self.declare_pattern(p, kind)?;
            }
            let body_start = self.marker();
            self.expect_punct(Punct::BraceL)?;
            let body_stmts = self.parse_statement_list_until(|p| p.is_punct(Punct::BraceR));
            self.scope.pop();
            let body_stmts = body_stmts?;
            self.expect_punct(Punct::BraceR)?;
            let body = Node::BlockStatement(BlockStatement {
                base: self.base(body_start),
                body: body_stmts,
            });
            Some(Box::new(Node::CatchClause(CatchClause {
                base: self.base(catch_start),
                param,
                body: Box::new(body),
            })))
        } else {
            None
        };
        let finalizer = if self.eat_word("finally")? {
            Some(Box::new(self.parse_block_statement()?))
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("missing catch or finally after try"));
        }
        Ok(Node::TryStatement(TryStatement {
            base: self.base(start),
            block: Box::new(block),
            handler,
            finalizer,
        }))
    }

    fn parse_throw_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("throw")?;
        if self.cur.preceded_by_line_terminator {
            return Err(self.error_at(start.index, ErrorCode::UnexpectedToken, "no line break allowed after 'throw'"));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Node::ThrowStatement(ArgumentStatement {
            base: self.base(start),
            argument: Some(Box::new(argument)),
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("return")?;
        if !self.ctx.in_function && !self.lexer.options().allow_return_outside_function {
            return Err(self.error_at(start.index, ErrorCode::ReturnOutsideFunction, "'return' outside a function"));
        }
        let can_have_argument =
            !self.cur.preceded_by_line_terminator && !self.is_punct(Punct::Semi) && !self.is_punct(Punct::BraceR) && !self.is_eof();
        let argument = if can_have_argument {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(Node::ReturnStatement(ArgumentStatement {
            base: self.base(start),
            argument,
        }))
    }

    fn parse_break_continue(&mut self, is_break: bool) -> Result<Node, ParseError> {
        let start = self.marker();
        self.bump()?; // 'break' or 'continue'
        let label = if !self.cur.preceded_by_line_terminator && self.cur.kind == TokenKind::Name {
            let ident = self.parse_identifier_reference()?;
            let name = ident_name(&ident).to_string();
            if !self.labels.iter().any(|(n, _)| *n == name) {
                return Err(self.error_at(ident.range().start, ErrorCode::UnknownLabel, format!("undefined label '{}'", name)));
            }
            Some((ident, name))
        } else {
            None
        };
        match &label {
            None => {
                if is_break && !self.ctx.in_loop && !self.ctx.in_switch {
                    return Err(self.error_at(start.index, ErrorCode::IllegalBreakOrContinueTarget, "'break' outside a loop or switch"));
                }
                if !is_break && !self.ctx.in_loop {
                    return Err(self.error_at(start.index, ErrorCode::IllegalBreakOrContinueTarget, "'continue' outside a loop"));
                }
            }
            Some((_, name)) if !is_break => {
                let attached_to_loop = self.labels.iter().find(|(n, _)| n == name).map(|(_, is_loop)| *is_loop).unwrap_or(false);
                if !attached_to_loop {
                    return Err(self.error_at(
                        start.index,
                        ErrorCode::IllegalBreakOrContinueTarget,
                        "'continue' label must label an enclosing loop",
                    ));
                }
            }
            _ => {}
        }
        self.consume_semicolon()?;
        let label = label.map(|(ident, _)| Box::new(ident));
        Ok(if is_break {
            Node::BreakStatement(LabelStatement {
                base: self.base(start),
                label,
            })
        } else {
            Node::ContinueStatement(LabelStatement {
                base: self.base(start),
                label,
            })
        })
    }

    fn parse_with_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("with")?;
        if self.ctx.strict {
            return Err(self.error_at(start.index, ErrorCode::UnexpectedToken, "'with' statements are not allowed in strict mode"));
        }
        self.expect_punct(Punct::ParenL)?;
        let object = self.parse_expression()?;
        self.expect_punct(Punct::ParenR)?;
        let body = self.parse_statement()?;
        Ok(Node::WithStatement(WithStatement {
            base: self.base(start),
            object: Box::new(object),
            body: Box::new(body),
        }))
    }

    /// Whether the statement that follows — possibly after a run of further directly chained
    /// labels — is a `for`/`while`/`do` loop. Label sets propagate transitively through a chain
    /// of labels with nothing but other labels between them and the loop (`outer: inner: for
    /// (;;) { continue outer; }` is legal), so this can't be decided by looking at only the
    /// single token immediately after the current label's colon.
    fn upcoming_statement_is_loop(&mut self) -> Result<bool, ParseError> {
        if self.is_any_word(&["for", "while", "do"]) {
            return Ok(true);
        }
        if self.cur.kind != TokenKind::Name {
            return Ok(false);
        }
        let snap = self.snapshot();
        let result = (|| -> Result<bool, ParseError> {
            self.bump()?;
            if !self.eat(Punct::Colon)? {
                return Ok(false);
            }
            self.upcoming_statement_is_loop()
        })();
        self.restore(snap);
        result
    }

    fn parse_labeled_or_expression_statement(&mut self) -> Result<Node, ParseError> {
        let snap = self.snapshot();
        let start = self.marker();
        if let Ok(ident) = self.parse_identifier_reference() {
            if self.eat(Punct::Colon)? {
                let name = ident_name(&ident).to_string();
                if self.labels.iter().any(|(n, _)| *n == name) {
                    return Err(self.error_at(
                        start.index,
                        ErrorCode::DuplicateLabel,
                        format!("label '{}' has already been declared", name),
                    ));
                }
                let is_loop_label = self.upcoming_statement_is_loop()?;
                self.labels.push((name, is_loop_label));
                let body = self.parse_statement()?;
                self.labels.pop();
                return Ok(Node::LabeledStatement(LabeledStatement {
                    base: self.base(start),
                    label: Box::new(ident),
                    body: Box::new(body),
                }));
            }
        }
        self.restore(snap);
        self.parse_expression_statement()
    }

    fn parse_expression_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let expr = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Node::ExpressionStatement(ExpressionStatement {
            base: self.base(start),
            expression: Box::new(expr),
        }))
    }
}
