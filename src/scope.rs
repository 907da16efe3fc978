//! Declaration tracking: `var`-vs-lexical scoping and the redeclaration rules that fall out of
//! it (spec §4.4). The teacher's grammar has no concept of a binding — its productions don't
//! know what a variable is — so this module has no direct teacher analogue; it is grounded
//! in spec §4.4 and modeled after the same two-tier (function-scope / block-scope) stack every
//! ECMAScript implementation uses.

use std::collections::HashMap;

/// How a name entered a scope, which determines where it is actually recorded (`var` punches
/// through block scopes to the nearest function/program scope) and what collides with what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `var`, function declarations in sloppy-mode nested blocks (Annex B) — hoisted to the
    /// nearest function or program scope.
    Var,
    /// `let`/`const`/class bindings — confined to the block they're declared in.
    Lexical,
    /// A function declaration at function/program top level — hoisted like `var` but also
    /// participates in lexical-redeclaration checks within its own block.
    Function,
    /// A `catch (e)` parameter with a simple (non-destructured) identifier — per spec, allowed
    /// to be redeclared by a `var` in the catch body, unlike an ordinary lexical binding.
    SimpleCatch,
    /// A parameter name or other binding that lives outside the ordinary var/lexical table
    /// (used for the function-parameter scope, checked separately from the body).
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
}

#[derive(Debug, Default)]
struct ScopeFrame {
    kind: Option<ScopeKind>,
    lexical: HashMap<String, BindingKind>,
    var: HashMap<String, BindingKind>,
}

/// A stack of scope frames, pushed on entry to a program/function/block and popped on exit.
/// Mirrors the lexical/var split every engine's binding resolution implements: a `var` walks
/// up to the nearest function-or-program frame; a lexical binding stays in the current frame.
#[derive(Debug)]
pub struct ScopeTracker {
    frames: Vec<ScopeFrame>,
}

impl Default for ScopeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self {
            frames: vec![ScopeFrame {
                kind: Some(ScopeKind::Program),
                ..Default::default()
            }],
        }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.frames.push(ScopeFrame {
            kind: Some(kind),
            ..Default::default()
        });
    }

    pub fn pop(&mut self) {
        self.frames.pop();
        debug_assert!(!self.frames.is_empty(), "popped the program scope frame");
    }

    fn nearest_var_frame_index(&self) -> usize {
        self.frames
            .iter()
            .rposition(|f| matches!(f.kind, Some(ScopeKind::Function) | Some(ScopeKind::Program)))
            .unwrap_or(0)
    }

    /// Declare `name` with the given kind in the current scope, returning `Err(existing)` if
    /// that violates a redeclaration rule: two lexical bindings of the same name in one block,
    /// or a lexical binding colliding with a `var` that reaches the same frame.
    pub fn declare(&mut self, name: &str, kind: BindingKind) -> Result<(), BindingKind> {
        match kind {
            BindingKind::Lexical | BindingKind::Function => {
                let frame = self.frames.last_mut().expect("scope stack is never empty");
                if let Some(existing) = frame.lexical.get(name) {
                    return Err(*existing);
                }
                if frame.var.contains_key(name) {
                    return Err(BindingKind::Var);
                }
                frame.lexical.insert(name.to_string(), kind);
                Ok(())
            }
            BindingKind::Var => {
                let target = self.nearest_var_frame_index();
                // A `var` may coexist with a `SimpleCatch` binding of the same name (it is
                // attached to the function scope, not the catch block, and does not collide),
                // but not with an ordinary lexical binding anywhere between here and `target`.
                for frame in &self.frames[target..] {
                    if let Some(existing) = frame.lexical.get(name) {
                        if *existing != BindingKind::SimpleCatch {
                            return Err(*existing);
                        }
                    }
                }
                self.frames[target]
                    .var
                    .insert(name.to_string(), BindingKind::Var);
                Ok(())
            }
            BindingKind::SimpleCatch | BindingKind::Outside => {
                let frame = self.frames.last_mut().expect("scope stack is never empty");
                frame.lexical.insert(name.to_string(), kind);
                Ok(())
            }
        }
    }

    pub fn is_declared_in_current_block(&self, name: &str) -> bool {
        let frame = self.frames.last().expect("scope stack is never empty");
        frame.lexical.contains_key(name) || frame.var.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_lexical_binding_in_same_block_is_rejected() {
        let mut scope = ScopeTracker::new();
        scope.declare("x", BindingKind::Lexical).unwrap();
        assert_eq!(
            scope.declare("x", BindingKind::Lexical),
            Err(BindingKind::Lexical)
        );
    }

    #[test]
    fn var_hoists_through_block_scopes() {
        let mut scope = ScopeTracker::new();
        scope.push(ScopeKind::Function);
        scope.push(ScopeKind::Block);
        scope.declare("x", BindingKind::Var).unwrap();
        scope.pop();
        assert!(scope.is_declared_in_current_block("x"));
    }

    #[test]
    fn var_colliding_with_lexical_in_an_intervening_block_is_rejected() {
        let mut scope = ScopeTracker::new();
        scope.push(ScopeKind::Function);
        scope.push(ScopeKind::Block);
        scope.declare("x", BindingKind::Lexical).unwrap();
        let err = scope.declare("x", BindingKind::Var);
        assert_eq!(err, Err(BindingKind::Lexical));
    }

    #[test]
    fn simple_catch_param_allows_var_redeclaration() {
        let mut scope = ScopeTracker::new();
        scope.push(ScopeKind::Function);
        scope.push(ScopeKind::Block);
        scope.declare("e", BindingKind::SimpleCatch).unwrap();
        assert!(scope.declare("e", BindingKind::Var).is_ok());
    }
}
