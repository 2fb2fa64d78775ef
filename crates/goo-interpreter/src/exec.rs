//! Statement execution.

use goo_syntax::ast::{AssignOp, BinaryOp, Expr, ExprKind, Stmt, StmtKind, Type, UnaryOp};

use crate::array::ArrayRef;
use crate::env::Binding;
use crate::error::{fail, ErrorKind, Result, RuntimeError};
use crate::eval::binary_op;
use crate::flow::Flow;
use crate::interpreter::Interpreter;
use crate::stack::ensure_sufficient_stack;
use crate::value::{check_declarable, store_into, Value};

/// A resolved assignment target.
enum Place {
    Var(String),
    Element(ArrayRef, i64),
}

impl Interpreter {
    /// Runs `body` in a fresh block scope.
    pub(crate) fn exec_block(&mut self, body: &[Stmt]) -> Result<Flow> {
        self.env.push_scope();
        let flow = self.exec_stmts(body);
        self.env.pop_scope();
        flow
    }

    /// Runs `body` in the current scope, stopping at the first `return`.
    pub(crate) fn exec_stmts(&mut self, body: &[Stmt]) -> Result<Flow> {
        for stmt in body {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Continue)
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow> {
        ensure_sufficient_stack(|| self.exec_kind(stmt)).map_err(|e| e.with_span(stmt.span))
    }

    fn exec_kind(&mut self, stmt: &Stmt) -> Result<Flow> {
        match &stmt.kind {
            StmtKind::Var { name, ty, init } => {
                self.declare(name, ty.as_ref(), init.as_ref(), true)?;
            }
            StmtKind::Const { name, ty, value } => {
                self.declare(name, ty.as_ref(), Some(value), false)?;
            }
            StmtKind::Assign { target, op, value } => self.exec_assign(target, *op, value)?,
            StmtKind::IncDec { target, increment } => {
                let place = self.resolve_place(target)?;
                let current = self.read_place(&place)?;
                let one = match current {
                    Value::Float(_) => Value::Float(1.0),
                    _ => Value::Int(1),
                };
                let op = if *increment { BinaryOp::Add } else { BinaryOp::Sub };
                let next = binary_op(op, current, one)?;
                self.write_place(place, next, false)?;
            }
            StmtKind::If {
                init,
                cond,
                then_body,
                else_body,
            } => {
                // the init statement's bindings are visible in both branches
                self.env.push_scope();
                let flow = self.exec_if(init.as_deref(), cond, then_body, else_body.as_deref());
                self.env.pop_scope();
                return flow;
            }
            StmtKind::Return(value) => return self.exec_return(value.as_ref()),
            StmtKind::Block(body) => return self.exec_block(body),
            StmtKind::ExprStmt(expr) => {
                self.eval_expr(expr)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn declare(&mut self, name: &str, declared: Option<&Type>, init: Option<&Expr>, mutable: bool) -> Result<()> {
        let (ty, value) = match (declared, init) {
            (Some(ty), None) => (ty.clone(), Value::zero(ty)?),
            (Some(ty), Some(init)) => {
                check_declarable(ty)?;
                let value = self.eval_expr(init)?;
                let value = store_into(ty, value, self.is_untyped_int(init), name)?;
                (ty.clone(), value)
            }
            (None, Some(init)) => {
                let value = self.eval_expr(init)?;
                (value.storage_type(name)?, value)
            }
            (None, None) => {
                return fail(ErrorKind::TypeMismatch(format!(
                    "declaration of {} needs a type or an initializer",
                    name
                )))
            }
        };
        let binding = match (mutable, init) {
            (true, _) => Binding::var(value, ty),
            // `const c = 2` stays an untyped constant, `const c int = 2` does not
            (false, Some(init)) if declared.is_none() && self.is_untyped_int(init) => {
                Binding::untyped_constant(value, ty)
            }
            (false, _) => Binding::constant(value, ty),
        };
        self.env.declare(name, binding)
    }

    fn exec_assign(&mut self, target: &Expr, op: AssignOp, value: &Expr) -> Result<()> {
        let place = self.resolve_place(target)?;
        let rhs = self.eval_expr(value)?;
        match op.binary() {
            None => {
                let untyped = self.is_untyped_int(value);
                self.write_place(place, rhs, untyped)
            }
            Some(bop) => {
                let current = self.read_place(&place)?;
                let (current, rhs) = self.promote_constants(current, target, rhs, value);
                let next = binary_op(bop, current, rhs).map_err(|e| e.with_span(value.span))?;
                self.write_place(place, next, false)
            }
        }
    }

    /// Resolves an lvalue, evaluating any index operands. Anything other than
    /// a variable or an array element has no storage.
    fn resolve_place(&mut self, target: &Expr) -> Result<Place> {
        match &target.kind {
            ExprKind::Ident(name) => match self.env.lookup(name) {
                Some(b) if !b.mutable => fail(ErrorKind::ImmutableTarget(format!("constant {}", name))),
                Some(_) => Ok(Place::Var(name.clone())),
                None => fail(ErrorKind::UnboundIdentifier(name.clone())),
            },
            ExprKind::Index { array, index } => {
                let arr = self.eval_array(array)?;
                let i = self.eval_index(index)?;
                Ok(Place::Element(arr, i))
            }
            _ => Err(RuntimeError::at(
                ErrorKind::ImmutableTarget(describe_non_lvalue(target)),
                target.span,
            )),
        }
    }

    fn read_place(&self, place: &Place) -> Result<Value> {
        match place {
            Place::Var(name) => match self.env.lookup(name) {
                Some(b) => Ok(b.value.clone()),
                None => fail(ErrorKind::UnboundIdentifier(name.clone())),
            },
            Place::Element(arr, i) => arr.get(*i),
        }
    }

    fn write_place(&mut self, place: Place, value: Value, untyped: bool) -> Result<()> {
        match place {
            Place::Var(name) => {
                let ty = match self.env.lookup(&name) {
                    Some(b) => b.ty.clone(),
                    None => return fail(ErrorKind::UnboundIdentifier(name)),
                };
                let value = store_into(&ty, value, untyped, &name)?;
                self.env.assign(&name, value)
            }
            Place::Element(arr, i) => {
                let value = store_into(&arr.elem(), value, untyped, "array element")?;
                arr.set(i, value)
            }
        }
    }

    fn exec_if(
        &mut self,
        init: Option<&Stmt>,
        cond: &Expr,
        then_body: &[Stmt],
        else_body: Option<&Stmt>,
    ) -> Result<Flow> {
        if let Some(init) = init {
            self.exec_stmt(init)?;
        }
        let value = self.eval_expr(cond)?;
        let taken = match value.as_condition() {
            Some(b) => b,
            None => {
                return Err(RuntimeError::at(
                    ErrorKind::TypeMismatch(format!(
                        "non-boolean condition in if statement: {}",
                        value.type_name()
                    )),
                    cond.span,
                ))
            }
        };
        if taken {
            self.exec_block(then_body)
        } else if let Some(else_body) = else_body {
            self.exec_stmt(else_body)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn exec_return(&mut self, value: Option<&Expr>) -> Result<Flow> {
        let expected = self.calls.current().and_then(|f| f.result.clone());
        let result = match (value, expected) {
            (None, None) => Value::Unit,
            (Some(expr), Some(ty)) => {
                let v = self.eval_expr(expr)?;
                check_result(&ty, v, self.is_untyped_int(expr)).map_err(|e| e.with_span(expr.span))?
            }
            (Some(expr), None) => {
                return Err(RuntimeError::at(
                    ErrorKind::TypeMismatch("too many return values".to_string()),
                    expr.span,
                ))
            }
            (None, Some(ty)) => {
                return fail(ErrorKind::TypeMismatch(format!(
                    "not enough return values, want {}",
                    ty
                )))
            }
        };
        Ok(Flow::Return(result))
    }
}

/// A `bool` result accepts only a boolean outcome; every other result type
/// follows the store rules.
fn check_result(ty: &Type, value: Value, untyped: bool) -> Result<Value> {
    let bool_result = *ty == Type::Bool;
    match value {
        Value::Bool(_) if bool_result => Ok(value),
        v if bool_result || matches!(v, Value::Bool(_)) => fail(ErrorKind::TypeMismatch(format!(
            "cannot use {} value as {} value in return statement",
            v.type_name(),
            ty
        ))),
        v => store_into(ty, v, untyped, "return value"),
    }
}

fn describe_non_lvalue(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Binary(op, ..) if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) => {
            "boolean-valued expression (it has no storage)".to_string()
        }
        ExprKind::Unary(UnaryOp::Not, _) | ExprKind::LiteralBool(_) => {
            "boolean-valued expression (it has no storage)".to_string()
        }
        ExprKind::Call { name, .. } => format!("result of {}() (it has no storage)", name),
        _ => "expression (it has no storage)".to_string(),
    }
}
