//! Call frames and function invocation.
//!
//! A frame moves through `Pushed -> Executing -> Returned | Errored`, or
//! straight from `Pushed` to `Overflowed` when it would exceed the configured
//! depth. Whatever the outcome, it is popped before control returns to the
//! caller, so a failed call never leaves a stale frame behind.

use std::rc::Rc;

use goo_syntax::ast::{Expr, Function, Param, Span, Type};

use crate::env::Binding;
use crate::error::{fail, ErrorKind, Result, RuntimeError};
use crate::flow::Flow;
use crate::interpreter::Interpreter;
use crate::stack::ensure_sufficient_stack;
use crate::value::{check_declarable, store_into, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Pushed,
    Executing,
    Returned,
    Overflowed,
    Errored,
}

#[derive(Debug)]
pub struct CallFrame {
    pub function: String,
    /// Where the call appeared in the caller
    pub call_site: Span,
    /// Declared result type; `None` for void functions
    pub result: Option<Type>,
    pub state: FrameState,
    /// Unset until a `return` executes
    return_slot: Option<Value>,
}

#[derive(Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    pub fn current(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    pub(crate) fn push(&mut self, function: &Function, call_site: Span) -> Result<()> {
        self.frames.push(CallFrame {
            function: function.name.clone(),
            call_site,
            result: function.result.clone(),
            state: FrameState::Pushed,
            return_slot: None,
        });
        if self.frames.len() > self.max_depth {
            if let Some(frame) = self.frames.last_mut() {
                frame.state = FrameState::Overflowed;
            }
            self.frames.pop();
            tracing::debug!(function = %function.name, max_depth = self.max_depth, "call depth limit reached");
            return fail(ErrorKind::StackOverflow(self.max_depth));
        }
        tracing::trace!(function = %function.name, depth = self.frames.len(), "frame pushed");
        Ok(())
    }

    fn set_state(&mut self, state: FrameState) {
        if let Some(frame) = self.frames.last_mut() {
            frame.state = state;
        }
    }

    pub(crate) fn set_return(&mut self, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.return_slot = Some(value);
            frame.state = FrameState::Returned;
        }
    }

    /// Pops the current frame, yielding its return slot (or `Unit` for a void
    /// call that ran off its end) when `outcome` succeeded.
    pub(crate) fn pop(&mut self, outcome: Result<()>) -> Result<Value> {
        if outcome.is_err() {
            self.set_state(FrameState::Errored);
        } else if self.current().map(|f| f.state) == Some(FrameState::Executing) {
            self.set_state(FrameState::Returned);
        }
        let frame = self.frames.pop();
        if let Some(frame) = &frame {
            tracing::trace!(function = %frame.function, state = ?frame.state, "frame popped");
        }
        outcome?;
        Ok(frame.and_then(|f| f.return_slot).unwrap_or(Value::Unit))
    }
}

impl Interpreter {
    /// Calls `name` with `args`, evaluated left to right in the caller's
    /// environment before the callee's frame exists.
    #[tracing::instrument(level = "debug", skip(self, args, call_site), fields(depth = self.calls.depth()))]
    pub(crate) fn invoke(&mut self, name: &str, args: &[Expr], call_site: Span) -> Result<Value> {
        let func = match self.functions.get(name) {
            Some(f) => Rc::clone(f),
            None => return fail(ErrorKind::UnboundIdentifier(name.to_string())),
        };
        if func.params.len() != args.len() {
            return fail(ErrorKind::ArityMismatch {
                name: name.to_string(),
                expected: func.params.len(),
                found: args.len(),
            });
        }

        let mut bound = Vec::with_capacity(args.len());
        for (param, arg) in func.params.iter().zip(args) {
            let value = self.eval_expr(arg)?;
            let target = format!("argument {} of {}", param.name, name);
            let value = store_into(&param.ty, value, self.is_untyped_int(arg), &target)
                .map_err(|e| e.with_span(arg.span))?;
            bound.push((param, value));
        }

        self.calls.push(&func, call_site)?;
        self.env.push_frame();
        let outcome = ensure_sufficient_stack(|| self.run_frame(&func, bound));
        self.env.pop_frame();
        self.calls.pop(outcome)
    }

    fn run_frame(&mut self, func: &Function, args: Vec<(&Param, Value)>) -> Result<()> {
        for (param, value) in args {
            self.env.declare(&param.name, Binding::var(value, param.ty.clone()))
                .map_err(|e| e.with_span(func.span))?;
        }
        self.calls.set_state(FrameState::Executing);
        match self.exec_stmts(&func.body)? {
            Flow::Return(value) => self.calls.set_return(value),
            Flow::Continue if func.result.is_some() => {
                return Err(RuntimeError::at(
                    ErrorKind::MissingReturn(func.name.clone()),
                    func.span,
                ))
            }
            Flow::Continue => {}
        }
        Ok(())
    }
}

/// Rejects signatures that would need boolean storage. A plain `bool` result
/// is fine since it is consumed by the caller, never stored.
pub(crate) fn check_signature(func: &Function) -> Result<()> {
    for param in &func.params {
        check_declarable(&param.ty).map_err(|e| e.with_span(func.span))?;
    }
    if let Some(ty @ Type::Array { .. }) = &func.result {
        check_declarable(ty).map_err(|e| e.with_span(func.span))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str) -> Function {
        Function {
            name: name.to_string(),
            params: Vec::new(),
            result: None,
            body: Vec::new(),
            span: Span::new(1, 1),
        }
    }

    #[test]
    fn test_overflow_leaves_stack_unchanged() {
        let mut calls = CallStack::new(2);
        calls.push(&func("a"), Span::default()).unwrap();
        calls.push(&func("b"), Span::default()).unwrap();
        let err = calls.push(&func("c"), Span::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StackOverflow(2));
        assert_eq!(calls.depth(), 2);
        assert_eq!(calls.current().map(|f| f.function.as_str()), Some("b"));
    }

    #[test]
    fn test_pop_yields_return_slot() {
        let mut calls = CallStack::new(8);
        calls.push(&func("f"), Span::default()).unwrap();
        calls.set_state(FrameState::Executing);
        calls.set_return(Value::Int(720));
        assert_eq!(calls.current().map(|f| f.state), Some(FrameState::Returned));
        assert_eq!(calls.pop(Ok(())), Ok(Value::Int(720)));

        calls.push(&func("g"), Span::default()).unwrap();
        assert_eq!(calls.pop(Ok(())), Ok(Value::Unit));

        calls.push(&func("h"), Span::default()).unwrap();
        let failed = calls.pop(Err(ErrorKind::DivisionByZero.into()));
        assert!(failed.is_err());
        assert_eq!(calls.depth(), 0);
    }
}
