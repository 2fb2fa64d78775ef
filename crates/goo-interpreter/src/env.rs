//! Environment and bindings for the Goo interpreter.
//!
//! Name resolution is lexical: the block scopes of the current call frame,
//! innermost first, then the globals. A frame never sees its caller's locals.

use std::collections::HashMap;

use goo_syntax::ast::Type;

use crate::error::{fail, ErrorKind, Result};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Binding {
    /// Current value; never a boolean result
    pub value: Value,
    /// Declared type, fixed for the binding's lifetime
    pub ty: Type,
    /// False for constants
    pub mutable: bool,
    /// An integer constant declared without a type; converts to `float32` on use
    pub untyped: bool,
}

impl Binding {
    pub fn var(value: Value, ty: Type) -> Self {
        Self { value, ty, mutable: true, untyped: false }
    }

    pub fn constant(value: Value, ty: Type) -> Self {
        Self { value, ty, mutable: false, untyped: false }
    }

    pub fn untyped_constant(value: Value, ty: Type) -> Self {
        Self { untyped: true, ..Self::constant(value, ty) }
    }
}

#[derive(Debug, Default)]
struct Scope {
    vars: HashMap<String, Binding>,
}

#[derive(Debug, Default)]
pub struct Env {
    globals: Scope,
    /// One entry per active call, each a stack of block scopes
    frames: Vec<Vec<Scope>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_frame(&mut self) {
        self.frames.push(vec![Scope::default()]);
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Opens a block scope in the current frame. Global code has no blocks.
    pub(crate) fn push_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(Scope::default());
        }
    }

    pub(crate) fn pop_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pop();
        }
    }

    fn current_scope(&mut self) -> &mut Scope {
        match self.frames.last_mut().and_then(|f| f.last_mut()) {
            Some(scope) => scope,
            None => &mut self.globals,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let locals = self.frames.last().into_iter().flat_map(|f| f.iter().rev());
        for scope in locals {
            if let Some(b) = scope.vars.get(name) {
                return Some(b);
            }
        }
        self.globals.vars.get(name)
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        if let Some(frame) = self.frames.last_mut() {
            for scope in frame.iter_mut().rev() {
                if let Some(b) = scope.vars.get_mut(name) {
                    return Some(b);
                }
            }
        }
        self.globals.vars.get_mut(name)
    }

    pub fn global(&self, name: &str) -> Option<&Binding> {
        self.globals.vars.get(name)
    }

    /// Binds `name` in the innermost scope; fails if that scope already has it.
    pub(crate) fn declare(&mut self, name: &str, binding: Binding) -> Result<()> {
        let scope = self.current_scope();
        if scope.vars.contains_key(name) {
            return fail(ErrorKind::Redeclared(name.to_string()));
        }
        tracing::trace!(name, ty = %binding.ty, "declare");
        scope.vars.insert(name.to_string(), binding);
        Ok(())
    }

    /// Replaces the value of the nearest binding. The value is already
    /// checked against the binding's type.
    pub(crate) fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        match self.lookup_mut(name) {
            Some(b) if !b.mutable => fail(ErrorKind::ImmutableTarget(format!("constant {}", name))),
            Some(b) => {
                b.value = value;
                Ok(())
            }
            None => fail(ErrorKind::UnboundIdentifier(name.to_string())),
        }
    }

    /// Number of active call frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_see_globals_not_callers() {
        let mut env = Env::new();
        env.declare("g", Binding::var(Value::Int(1), Type::Int)).unwrap();
        env.push_frame();
        env.declare("local", Binding::var(Value::Int(2), Type::Int)).unwrap();
        env.push_frame();
        assert!(env.lookup("g").is_some());
        assert!(env.lookup("local").is_none());
        env.pop_frame();
        assert_eq!(env.lookup("local").map(|b| b.value.clone()), Some(Value::Int(2)));
        env.pop_frame();
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn test_block_shadowing() {
        let mut env = Env::new();
        env.push_frame();
        env.declare("x", Binding::var(Value::Int(1), Type::Int)).unwrap();
        env.push_scope();
        env.declare("x", Binding::var(Value::Int(2), Type::Int)).unwrap();
        assert_eq!(env.lookup("x").map(|b| b.value.clone()), Some(Value::Int(2)));
        env.pop_scope();
        assert_eq!(env.lookup("x").map(|b| b.value.clone()), Some(Value::Int(1)));
    }

    #[test]
    fn test_declare_and_assign_errors() {
        let mut env = Env::new();
        env.declare("c", Binding::constant(Value::Int(1), Type::Int)).unwrap();
        let err = env.declare("c", Binding::var(Value::Int(2), Type::Int)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redeclared("c".into()));
        let err = env.assign("c", Value::Int(3)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ImmutableTarget(_)));
        let err = env.assign("nope", Value::Int(3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnboundIdentifier("nope".into()));
    }
}
