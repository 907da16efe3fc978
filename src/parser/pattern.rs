//! Binding pattern parsing (formal parameters, `var`/`let`/`const` declarators, catch params)
//! and the expression-to-pattern conversion the array/object destructuring cover grammar needs
//! once the parser commits to the pattern interpretation (spec §4.3, §9 "Cover grammars").

use super::*;

impl<'c> Parser<'c> {
    pub(super) fn parse_binding_target(&mut self) -> Result<Node, ParseError> {
        if self.is_punct(Punct::BracketL) {
            self.parse_array_binding_pattern()
        } else if self.is_punct(Punct::BraceL) {
            self.parse_object_binding_pattern()
        } else {
            self.parse_binding_identifier()
        }
    }

    pub(super) fn parse_binding_element(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        let target = self.parse_binding_target()?;
        if self.eat(Punct::Assign)? {
            let default = self.parse_assignment_expression()?;
            Ok(Node::AssignmentPattern(AssignmentPattern {
                base: self.base(start),
                left: Box::new(target),
                right: Box::new(default),
            }))
        } else {
            Ok(target)
        }
    }

    fn parse_array_binding_pattern(&mut self) -> Result<Node, ParseError> {
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
                let arg = self.parse_binding_target()?;
                elements.push(Some(Node::RestElement(ArgumentWrapper {
                    base: self.base(rest_start),
                    argument: Box::new(arg),
                })));
                break;
            }
            let el = self.parse_binding_element()?;
            elements.push(Some(el));
            if !self.is_punct(Punct::BracketR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::BracketR)?;
        Ok(Node::ArrayPattern(ArrayExprPat {
            base: self.base(start),
            elements,
        }))
    }

    fn parse_object_binding_pattern(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.expect_punct(Punct::BraceL)?;
        let mut properties = Vec::new();
        while !self.is_punct(Punct::BraceR) {
            if self.is_punct(Punct::Ellipsis) {
                let rest_start = self.marker();
                self.bump()?;
                let arg = self.parse_binding_identifier()?;
                properties.push(Node::RestElement(ArgumentWrapper {
                    base: self.base(rest_start),
                    argument: Box::new(arg),
                }));
                break;
            }
            let prop_start = self.marker();
            let (key, computed) = self.parse_property_key()?;
            let (value, shorthand) = if self.eat(Punct::Colon)? {
                (self.parse_binding_element()?, false)
            } else {
                let ident = key.clone();
                if self.eat(Punct::Assign)? {
                    let default = self.parse_assignment_expression()?;
                    (
                        Node::AssignmentPattern(AssignmentPattern {
                            base: self.base(prop_start),
                            left: Box::new(ident),
                            right: Box::new(default),
                        }),
                        true,
                    )
                } else {
                    (ident, true)
                }
            };
            properties.push(Node::Property(Property {
                base: self.base(prop_start),
                key: Box::new(key),
                value: Box::new(value),
                kind: PropertyKind::Init,
                computed,
                method: false,
                shorthand,
            }));
            if !self.is_punct(Punct::BraceR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::BraceR)?;
        Ok(Node::ObjectPattern(ObjectExprPat {
            base: self.base(start),
            properties,
        }))
    }

    /// Reinterpret an expression parsed under the array/object literal cover grammar as the
    /// equivalent pattern. `allow_member` is `true` for a destructuring *assignment* target
    /// (where `a.b` / `a[0]` are valid) and `false` for a *binding* target (declarations,
    /// parameters), where they are not.
    pub(super) fn expr_to_pattern(&mut self, node: Node, allow_member: bool) -> Result<Node, ParseError> {
        match node {
            Node::Identifier(ref i) if self.ctx.strict && matches!(&*i.name, "eval" | "arguments") => {
                Err(self.error_at(
                    node.range().start,
                    ErrorCode::LetOrConstAsIdentifierInStrictMode,
                    format!("'{}' cannot be a binding target in strict mode", i.name),
                ))
            }
            Node::Identifier(_) | Node::ArrayPattern(_) | Node::ObjectPattern(_) | Node::AssignmentPattern(_) => {
                Ok(node)
            }
            Node::MemberExpression(_) if allow_member => Ok(node),
            Node::MemberExpression(m) => Err(self.error_at(
                m.base.range.start,
                ErrorCode::InvalidDestructuringTarget,
                "member expression cannot be a binding target",
            )),
            Node::ParenthesizedExpression(p) => self.expr_to_pattern(*p.argument, allow_member),
            Node::ArrayExpression(arr) => {
                let mut elements = Vec::with_capacity(arr.elements.len());
                for el in arr.elements {
                    let Some(el) = el else {
                        elements.push(None);
                        continue;
                    };
                    let converted = match el {
                        Node::SpreadElement(s) => Node::RestElement(ArgumentWrapper {
                            base: s.base,
                            argument: Box::new(self.expr_to_pattern(*s.argument, allow_member)?),
                        }),
                        other => self.expr_to_pattern(other, allow_member)?,
                    };
                    elements.push(Some(converted));
                }
                Ok(Node::ArrayPattern(ArrayExprPat {
                    base: arr.base,
                    elements,
                }))
            }
            Node::ObjectExpression(obj) => {
                let mut properties = Vec::with_capacity(obj.properties.len());
                for prop in obj.properties {
                    let converted = match prop {
                        Node::Property(p) => {
                            let value = self.expr_to_pattern(*p.value, allow_member)?;
                            Node::Property(Property {
                                base: p.base,
                                key: p.key,
                                value: Box::new(value),
                                kind: p.kind,
                                computed: p.computed,
                                method: p.method,
                                shorthand: p.shorthand,
                            })
                        }
                        Node::SpreadElement(s) => Node::RestElement(ArgumentWrapper {
                            base: s.base,
                            argument: Box::new(self.expr_to_pattern(*s.argument, allow_member)?),
                        }),
                        other => other,
                    };
                    properties.push(converted);
                }
                Ok(Node::ObjectPattern(ObjectExprPat {
                    base: obj.base,
                    properties,
                }))
            }
            Node::AssignmentExpression(a) if &*a.operator == "=" => {
                let left = self.expr_to_pattern(*a.left, allow_member)?;
                Ok(Node::AssignmentPattern(AssignmentPattern {
                    base: a.base,
                    left: Box::new(left),
                    right: a.right,
                }))
            }
            other => Err(self.error_at(
                other.range().start,
                ErrorCode::InvalidDestructuringTarget,
                "invalid destructuring target",
            )),
        }
    }
}
