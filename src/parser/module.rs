//! `import`/`export` declarations (spec §4.3). Only reachable in module source — both entry
//! points check that up front, since everything below assumes it.

use super::*;
use crate::scope::BindingKind;

impl<'c> Parser<'c> {
    fn check_module_syntax(&self, pos: Marker) -> Result<(), ParseError> {
        if !self.ctx.module && !self.lexer.options().allow_import_export_everywhere {
            return Err(self.error_at(
                pos.index,
                ErrorCode::ModuleSyntaxInScript,
                "'import'/'export' declarations are only valid in a module",
            ));
        }
        Ok(())
    }

    fn parse_source_string(&mut self) -> Result<Node, ParseError> {
        if self.cur.kind != TokenKind::Str {
            return Err(self.unexpected("expected a string literal module source"));
        }
        self.parse_string_literal()
    }

    fn parse_module_export_name(&mut self) -> Result<Node, ParseError> {
        if self.cur.kind == TokenKind::Str {
            self.parse_string_literal()
        } else {
            self.parse_identifier_name()
        }
    }

    fn record_export_name(&mut self, name: &str, pos: usize) -> Result<(), ParseError> {
        if !self.exported_names.insert(name.to_string()) {
            return Err(self.error_at(
                pos,
                ErrorCode::DuplicateExportName,
                format!("multiple exports of name '{}'", name),
            ));
        }
        Ok(())
    }

    fn record_pattern_export_names(&mut self, node: &Node, pos: usize) -> Result<(), ParseError> {
        match node {
            Node::Identifier(i) => {
                let name = i.name.to_string();
                self.record_export_name(&name, pos)
            }
            Node::AssignmentPattern(a) => self.record_pattern_export_names(&a.left, pos),
            Node::RestElement(r) => self.record_pattern_export_names(&r.argument, pos),
            Node::ArrayPattern(a) => {
                for el in a.elements.iter().flatten() {
                    self.record_pattern_export_names(el, pos)?;
                }
                Ok(())
            }
            Node::ObjectPattern(o) => {
                for prop in &o.properties {
                    match prop {
                        Node::Property(p) => self.record_pattern_export_names(&p.value, pos)?,
                        Node::RestElement(r) => self.record_pattern_export_names(&r.argument, pos)?,
                        _ => {}
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn record_declaration_export_names(&mut self, node: &Node, pos: usize) -> Result<(), ParseError> {
        match node {
            Node::VariableDeclaration(v) => {
                for d in &v.declarations {
                    if let Node::VariableDeclarator(decl) = d {
                        self.record_pattern_export_names(&decl.id, pos)?;
                    }
                }
                Ok(())
            }
            Node::FunctionDeclaration(f) => {
                if let Some(id) = &f.id {
                    if let Node::Identifier(i) = &**id {
                        let name = i.name.to_string();
                        self.record_export_name(&name, pos)?;
                    }
                }
                Ok(())
            }
            Node::ClassDeclaration(c) => {
                if let Some(id) = &c.id {
                    if let Node::Identifier(i) = &**id {
                        let name = i.name.to_string();
                        self.record_export_name(&name, pos)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Resolve every source-less `export { local }` name recorded during parsing against what
    /// `scope` actually declared, once the whole program has been parsed (spec §4.3: "all
    /// exported names must be declared or re-exported"). Called once, from `parse_program`.
    pub(super) fn check_unresolved_exports(&mut self) -> Result<(), ParseError> {
        let checks = std::mem::take(&mut self.pending_export_checks);
        for (name, pos) in checks {
            if !self.scope.is_declared_in_current_block(&name) {
                let err = self.error_at(
                    pos,
                    ErrorCode::UnresolvedExportName,
                    format!("export '{}' has no matching declaration", name),
                );
                self.diagnostics.push(err)?;
            }
        }
        Ok(())
    }

    // --- import ----------------------------------------------------------------------------

    pub(super) fn parse_import_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.check_module_syntax(start)?;
        self.expect_word("import")?;

        if self.cur.kind == TokenKind::Str {
            let source = self.parse_string_literal()?;
            let attributes = self.parse_import_attributes_opt()?;
            self.consume_semicolon()?;
            return Ok(Node::ImportDeclaration(ImportDeclaration {
                base: self.base(start),
                specifiers: Vec::new(),
                source: Box::new(source),
                attributes,
            }));
        }

        let mut specifiers = Vec::new();
        if self.cur.kind == TokenKind::Name {
            let local = self.parse_binding_identifier()?;
            self.declare_pattern(&local, BindingKind::Lexical)?;
            specifiers.push(Node::ImportDefaultSpecifier(SpecifierWithLocal {
                base: self.base(start),
                local: Box::new(local),
            }));
            if self.eat(Punct::Comma)? {
                self.parse_named_or_namespace_import(&mut specifiers)?;
            }
        } else {
            self.parse_named_or_namespace_import(&mut specifiers)?;
        }

        self.expect_word("from")?;
        let source = self.parse_source_string()?;
        let attributes = self.parse_import_attributes_opt()?;
        self.consume_semicolon()?;
        Ok(Node::ImportDeclaration(ImportDeclaration {
            base: self.base(start),
            specifiers,
            source: Box::new(source),
            attributes,
        }))
    }

    fn parse_named_or_namespace_import(&mut self, specifiers: &mut Vec<Node>) -> Result<(), ParseError> {
        if self.is_punct(Punct::Star) {
            let ns_start = self.marker();
            self.bump()?;
            self.expect_word("as")?;
            let local = self.parse_binding_identifier()?;
            self.declare_pattern(&local, BindingKind::Lexical)?;
            specifiers.push(Node::ImportNamespaceSpecifier(SpecifierWithLocal {
                base: self.base(ns_start),
                local: Box::new(local),
            }));
            return Ok(());
        }
        self.expect_punct(Punct::BraceL)?;
        while !self.is_punct(Punct::BraceR) {
            let spec_start = self.marker();
            let imported = self.parse_module_export_name()?;
            let local = if self.eat_word("as")? {
                self.parse_binding_identifier()?
            } else {
                imported.clone()
            };
            self.declare_pattern(&local, BindingKind::Lexical)?;
            specifiers.push(Node::ImportSpecifier(ImportSpecifier {
                base: self.base(spec_start),
                imported: Box::new(imported),
                local: Box::new(local),
            }));
            if !self.is_punct(Punct::BraceR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::BraceR)?;
        Ok(())
    }

    fn parse_import_attributes_opt(&mut self) -> Result<Vec<Node>, ParseError> {
        if !self.eat_word("with")? {
            return Ok(Vec::new());
        }
        self.expect_punct(Punct::BraceL)?;
        let mut attrs = Vec::new();
        while !self.is_punct(Punct::BraceR) {
            let attr_start = self.marker();
            let (key, _computed) = self.parse_property_key()?;
            self.expect_punct(Punct::Colon)?;
            let value = self.parse_source_string()?;
            attrs.push(Node::ImportAttribute(ImportAttribute {
                base: self.base(attr_start),
                key: Box::new(key),
                value: Box::new(value),
            }));
            if !self.is_punct(Punct::BraceR) {
                self.expect_punct(Punct::Comma)?;
            }
        }
        self.expect_punct(Punct::BraceR)?;
        Ok(attrs)
    }

    // --- export ----------------------------------------------------------------------------

    pub(super) fn parse_export_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.marker();
        self.check_module_syntax(start)?;
        self.expect_word("export")?;

        if self.eat_word("default")? {
            let declaration = if self.is_word("function") {
                self.parse_function_declaration(false)?
            } else if self.is_word("async") && self.next_is_function_keyword_same_line()? {
                self.parse_function_declaration(true)?
            } else if self.is_word("class") {
                self.parse_class_declaration()?
            } else {
                let expr = self.parse_assignment_expression()?;
                self.consume_semicolon()?;
                expr
            };
            self.record_export_name("default", start.index)?;
            return Ok(Node::ExportDefaultDeclaration(ExportDefaultDeclaration {
                base: self.base(start),
                declaration: Box::new(declaration),
            }));
        }

        if self.is_punct(Punct::Star) {
            self.bump()?;
            let exported = if self.eat_word("as")? {
                Some(Box::new(self.parse_module_export_name()?))
            } else {
                None
            };
            if let Some(exported) = &exported {
                if let Node::Identifier(i) = &**exported {
                    let name = i.name.to_string();
                    self.record_export_name(&name, start.index)?;
                }
            }
            self.expect_word("from")?;
            let source = self.parse_source_string()?;
            let attributes = self.parse_import_attributes_opt()?;
            self.consume_semicolon()?;
            return Ok(Node::ExportAllDeclaration(ExportAllDeclaration {
                base: self.base(start),
                source: Box::new(source),
                exported,
                attributes,
            }));
        }

        if self.is_punct(Punct::BraceL) {
            self.bump()?;
            let mut specifiers = Vec::new();
            while !self.is_punct(Punct::BraceR) {
                let spec_start = self.marker();
                let local = self.parse_module_export_name()?;
                let exported = if self.eat_word("as")? {
                    self.parse_module_export_name()?
                } else {
                    local.clone()
                };
                if let Node::Identifier(i) = &exported {
                    let name = i.name.to_string();
                    self.record_export_name(&name, spec_start.index)?;
                }
                specifiers.push(Node::ExportSpecifier(ExportSpecifier {
                    base: self.base(spec_start),
                    local: Box::new(local),
                    exported: Box::new(exported),
                }));
                if !self.is_punct(Punct::BraceR) {
                    self.expect_punct(Punct::Comma)?;
                }
            }
            self.expect_punct(Punct::BraceR)?;
            let source = if self.eat_word("from")? {
                Some(Box::new(self.parse_source_string()?))
            } else {
                None
            };
            // A re-export's `local` names a binding in the re-exported module, not this one —
            // only a source-less export list names a binding that must resolve here.
            if source.is_none() {
                for spec in &specifiers {
                    if let Node::ExportSpecifier(es) = spec {
                        if let Node::Identifier(i) = &*es.local {
                            self.pending_export_checks.push((i.name.to_string(), es.local.range().start));
                        }
                    }
                }
            }
            let attributes = if source.is_some() { self.parse_import_attributes_opt()? } else { Vec::new() };
            self.consume_semicolon()?;
            return Ok(Node::ExportNamedDeclaration(ExportNamedDeclaration {
                base: self.base(start),
                declaration: None,
                specifiers,
                source,
                attributes,
            }));
        }

        let declaration = self.parse_statement_list_item()?;
        self.record_declaration_export_names(&declaration, start.index)?;
        Ok(Node::ExportNamedDeclaration(ExportNamedDeclaration {
            base: self.base(start),
            declaration: Some(Box::new(declaration)),
            specifiers: Vec::new(),
            source: None,
            attributes: Vec::new(),
        }))
    }
}
