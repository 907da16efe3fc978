//! Class declarations/expressions: the heritage clause, method/field/static-block members, and
//! private name (`#x`) uniqueness (spec §4.3, §4.4). Toggles `Context.in_method` around every
//! method body, field initializer, and static block, which is what makes `super` legal there
//! and nowhere else.

use super::*;
use crate::scope::{BindingKind, ScopeKind};
use std::collections::HashMap;

/// Tracks which accessor kinds a private name has already been declared with, so `#x`'s getter
/// and setter can coexist but nothing else collides (spec's private-name uniqueness rule).
#[derive(Default)]
struct PrivateUse {
    get: bool,
    set: bool,
    other: bool,
}

impl<'c> Parser<'c> {
    pub(super) fn parse_class_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("class")?;
        let id = if self.cur.kind == TokenKind::Name {
            Some(Box::new(self.parse_binding_identifier()?))
        } else {
            None
        };
        if let Some(id) = &id {
            self.declare_pattern(id, BindingKind::Lexical)?;
        }
        let (super_class, body) = self.parse_class_tail()?;
        Ok(Node::ClassDeclaration(Class {
            base: self.base(start),
            id,
            super_class,
            body: Box::new(body),
        }))
    }

    pub(super) fn parse_class_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_word("class")?;
        let id = if self.cur.kind == TokenKind::Name && !self.is_word("extends") {
            Some(Box::new(self.parse_binding_identifier()?))
        } else {
            None
        };
        let (super_class, body) = self.parse_class_tail()?;
        Ok(Node::ClassExpression(Class {
            base: self.base(start),
            id,
            super_class,
            body: Box::new(body),
        }))
    }

    /// A class body is always strict, regardless of the surrounding code (spec invariant).
    fn parse_class_tail(&mut self) -> Result<(Option<Box<Node>>, Node), ParseError> {
        let saved_strict = self.ctx.strict;
        self.ctx.strict = true;
        let super_class = if self.eat_word("extends")? {
            Some(Box::new(self.parse_lhs_expression()?))
        } else {
            None
        };
        let body = self.parse_class_body();
        self.ctx.strict = saved_strict;
        Ok((super_class, body?))
    }

    fn parse_class_body(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_punct(Punct::BraceL)?;
        let mut private_names: HashMap<String, PrivateUse> = HashMap::new();
        self.class_private_scopes.push(ClassPrivateScope::default());
        let body = (|| -> Result<Vec<Node>, ParseError> {
            let mut body = Vec::new();
            while !self.is_punct(Punct::BraceR) {
                if self.eat(Punct::Semi)? {
                    continue;
                }
                body.push(self.parse_class_member(&mut private_names)?);
            }
            Ok(body)
        })();
        let body = match body {
            Ok(body) => {
                self.pop_class_private_scope()?;
                body
            }
            Err(err) => {
                self.class_private_scopes.pop();
                return Err(err);
            }
        };
        self.expect_punct(Punct::BraceR)?;
        Ok(Node::ClassBody(ClassBody {
            base: self.base(start),
            body,
        }))
    }

    /// Resolve this class body's deferred private-field references (`this.#x`/`obj.#x`) once
    /// every member has been parsed and its full set of declared private names is known.
    /// Anything still unresolved is handed up to the lexically enclosing class, if any — a
    /// nested class may reference an outer class's private names — and only raised as an error
    /// once there is no further enclosing scope left to check against.
    fn pop_class_private_scope(&mut self) -> Result<(), ParseError> {
        let scope = self.class_private_scopes.pop().expect("class private scope stack imbalance");
        if !self.lexer.options().check_private_fields {
            return Ok(());
        }
        for (name, pos) in scope.pending_uses {
            if scope.declared.contains(&name) {
                continue;
            }
            if let Some(parent) = self.class_private_scopes.last_mut() {
                parent.pending_uses.push((name, pos));
                continue;
            }
            return Err(self.error_at(
                pos,
                ErrorCode::PrivateFieldNotDeclared,
                format!("private field '#{}' must be declared in an enclosing class", name),
            ));
        }
        Ok(())
    }

    /// Record a `this.#x`/`obj.#x` reference for later resolution against the enclosing class
    /// body's declared private names (spec §8). A private name used with no enclosing class
    /// body at all (e.g. inside a function declared at the top level) has nothing to defer
    /// against and is silently left unchecked — the grammar still accepts it as a
    /// `PrivateIdentifier` node either way.
    pub(super) fn record_private_field_use(&mut self, name: &str, pos: usize) {
        if let Some(scope) = self.class_private_scopes.last_mut() {
            scope.pending_uses.push((name.to_string(), pos));
        }
    }

    fn parse_class_member(&mut self, private_names: &mut HashMap<String, PrivateUse>) -> Result<Node, ParseError> {
        const MODIFIER_STOP: &[Punct] = &[Punct::Assign, Punct::Semi, Punct::ParenL, Punct::BraceR];
        let start = self.marker();

        let is_static = self.is_word("static") && !self.next_is_punct_after_word(MODIFIER_STOP);
        if is_static {
            self.bump()?;
            if self.is_punct(Punct::BraceL) {
                return self.parse_static_block(start);
            }
        }

        let is_async = self.is_word("async") && !self.next_is_punct_after_word(MODIFIER_STOP);
        if is_async {
            self.bump()?;
        }
        let generator = self.eat(Punct::Star)?;
        let mut kind = MethodKind::Method;
        if !is_async && !generator && self.is_any_word(&["get", "set"]) && !self.next_is_punct_after_word(MODIFIER_STOP) {
            let which = self.cur.word().unwrap().to_string();
            self.bump()?;
            kind = if which == "get" { MethodKind::Get } else { MethodKind::Set };
        }

        let (key, computed) = self.parse_class_element_key()?;
        self.check_private_name_usage(&key, private_names, kind)?;

        if self.is_punct(Punct::ParenL) {
            if !is_static && !computed && kind == MethodKind::Method && matches!(&key, Node::Identifier(i) if &*i.name == "constructor")
            {
                kind = MethodKind::Constructor;
            }
            let saved = self.ctx;
            self.ctx.in_function = true;
            self.ctx.in_generator = generator;
            self.ctx.in_async = is_async;
            self.ctx.in_loop = false;
            self.ctx.in_switch = false;
            self.ctx.allow_in = true;
            self.ctx.in_method = true;
            self.ctx.in_parameters = true;
            let params = self.parse_function_params()?;
            self.ctx.in_parameters = false;
            let body = self.parse_function_body()?;
            self.check_duplicate_params(&params, true)?;
            self.ctx = saved;
            let value = Node::FunctionExpression(Function {
                base: self.base(start),
                id: None,
                params,
                body: Box::new(body),
                generator,
                is_async,
                expression: false,
            });
            return Ok(Node::MethodDefinition(MethodDefinition {
                base: self.base(start),
                key: Box::new(key),
                value: Box::new(value),
                kind,
                computed,
                is_static,
            }));
        }

        let value = if self.eat(Punct::Assign)? {
            let saved_in_method = self.ctx.in_method;
            self.ctx.in_method = true;
            let v = self.parse_assignment_expression()?;
            self.ctx.in_method = saved_in_method;
            Some(Box::new(v))
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(Node::PropertyDefinition(PropertyDefinition {
            base: self.base(start),
            key: Box::new(key),
            value,
            computed,
            is_static,
        }))
    }

    fn parse_static_block(&mut self, start: Marker) -> Result<Node, ParseError> {
        let saved_in_method = self.ctx.in_method;
        self.ctx.in_method = true;
        self.scope.push(ScopeKind::Function);
        self.expect_punct(Punct::BraceL)?;
        let stmts = self.parse_statement_list_until(|p| p.is_punct(Punct::BraceR));
        self.scope.pop();
        let stmts = stmts?;
        self.expect_punct(Punct::BraceR)?;
        self.ctx.in_method = saved_in_method;
        Ok(Node::StaticBlock(BlockStatement {
            base: self.base(start),
            body: stmts,
        }))
    }

    fn parse_class_element_key(&mut self) -> Result<(Node, bool), ParseError> {
        if self.cur.kind == TokenKind::PrivateName {
            let start = self.marker();
            let name = match &self.cur.value {
                TokenValue::PrivateName(n) => n.clone(),
                _ => unreachable!(),
            };
            self.bump()?;
            return Ok((
                Node::PrivateIdentifier(PrivateIdentifier {
                    base: self.base(start),
                    name,
                }),
                false,
            ));
        }
        self.parse_property_key()
    }

    fn check_private_name_usage(
        &mut self,
        key: &Node,
        private_names: &mut HashMap<String, PrivateUse>,
        kind: MethodKind,
    ) -> Result<(), ParseError> {
        let Node::PrivateIdentifier(p) = key else { return Ok(()) };
        if let Some(scope) = self.class_private_scopes.last_mut() {
            scope.declared.insert(p.name.to_string());
        }
        let entry = private_names.entry(p.name.to_string()).or_default();
        let conflict = match kind {
            MethodKind::Get => std::mem::replace(&mut entry.get, true) || entry.other,
            MethodKind::Set => std::mem::replace(&mut entry.set, true) || entry.other,
            MethodKind::Method | MethodKind::Constructor => {
                let had_other = std::mem::replace(&mut entry.other, true);
                had_other || entry.get || entry.set
            }
        };
        if conflict {
            return Err(self.error_at(
                p.base.range.start,
                ErrorCode::DuplicatePrivateName,
                format!("private name '#{}' is already declared", p.name),
            ));
        }
        Ok(())
    }
}
