//! Expression evaluation.

use goo_syntax::ast::{BinaryOp, Expr, ExprKind, PrintStyle, Type, UnaryOp};

use crate::array::ArrayRef;
use crate::error::{fail, ErrorKind, Result, RuntimeError};
use crate::format;
use crate::interpreter::Interpreter;
use crate::output::FormatArg;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

impl Interpreter {
    /// Evaluates `expr`, tagging any failure with the innermost node's position.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        ensure_sufficient_stack(|| self.eval_kind(expr)).map_err(|e| e.with_span(expr.span))
    }

    /// True for integer constants that still convert implicitly, including
    /// arithmetic over them and untyped `const` names.
    pub(crate) fn is_untyped_int(&self, expr: &Expr) -> bool {
        expr.is_untyped_int_with(|name| self.env.lookup(name).map_or(false, |b| b.untyped))
    }

    /// Gives an untyped integer constant the float32 type of the other operand.
    pub(crate) fn promote_constants(&self, l: Value, lhs: &Expr, r: Value, rhs: &Expr) -> (Value, Value) {
        match (l, r) {
            (Value::Int(n), r @ Value::Float(_)) if self.is_untyped_int(lhs) => (Value::Float(n as f32), r),
            (l @ Value::Float(_), Value::Int(n)) if self.is_untyped_int(rhs) => (l, Value::Float(n as f32)),
            pair => pair,
        }
    }

    fn eval_kind(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::LiteralInt(n) => int_constant(*n),
            ExprKind::LiteralFloat(x) => Ok(Value::Float(*x as f32)),
            ExprKind::LiteralBool(b) => Ok(Value::Bool(*b)),
            ExprKind::LiteralString(_) => fail(ErrorKind::TypeMismatch(
                "string literals are only allowed as print arguments".to_string(),
            )),
            ExprKind::Ident(name) => match self.env.lookup(name) {
                Some(b) => Ok(b.value.clone()),
                None => fail(ErrorKind::UnboundIdentifier(name.clone())),
            },
            ExprKind::Unary(op, operand) => self.eval_unary(*op, operand),
            ExprKind::Binary(BinaryOp::And, lhs, rhs) => {
                // `false && x` never evaluates x
                if !self.logical_operand(lhs, "&&")? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.logical_operand(rhs, "&&")?))
            }
            ExprKind::Binary(BinaryOp::Or, lhs, rhs) => {
                if self.logical_operand(lhs, "||")? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.logical_operand(rhs, "||")?))
            }
            ExprKind::Binary(op, lhs, rhs) => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                let (l, r) = self.promote_constants(l, lhs, r, rhs);
                binary_op(*op, l, r)
            }
            ExprKind::Convert { to, expr: inner } => {
                let value = self.eval_expr(inner)?;
                convert(to, value)
            }
            ExprKind::Index { array, index } => {
                let arr = self.eval_array(array)?;
                let i = self.eval_index(index)?;
                arr.get(i)
            }
            ExprKind::Call { name, args } => self.invoke(name, args, expr.span),
            ExprKind::Print { package, style, args } => self.eval_print(package, *style, args),
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<Value> {
        // -2147483648 is only representable once the sign is applied
        if let (UnaryOp::Neg, ExprKind::LiteralInt(n)) = (op, &operand.kind) {
            return int_constant(-*n);
        }
        if op == UnaryOp::Not {
            return Ok(Value::Bool(!self.logical_operand(operand, "!")?));
        }
        match (op, self.eval_expr(operand)?) {
            (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
            (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
            (UnaryOp::Plus, v @ (Value::Int(_) | Value::Float(_))) => Ok(v),
            (op, v) => fail(ErrorKind::TypeMismatch(format!(
                "operator {} not defined on {}",
                if op == UnaryOp::Neg { "-" } else { "+" },
                v.type_name()
            ))),
        }
    }

    /// Evaluates an operand of `!`, `&&` or `||`: a boolean result, or an
    /// integer that is exactly 0 or 1.
    fn logical_operand(&mut self, expr: &Expr, op: &str) -> Result<bool> {
        let value = self.eval_expr(expr)?;
        match value.as_logical() {
            Some(b) => Ok(b),
            None => Err(RuntimeError::at(
                ErrorKind::TypeMismatch(format!(
                    "operator {} not defined on {} value {}",
                    op,
                    value.type_name(),
                    value
                )),
                expr.span,
            )),
        }
    }

    pub(crate) fn eval_array(&mut self, expr: &Expr) -> Result<ArrayRef> {
        match self.eval_expr(expr)? {
            Value::Array(a) => Ok(a),
            other => Err(RuntimeError::at(
                ErrorKind::TypeMismatch(format!("cannot index {} value", other.type_name())),
                expr.span,
            )),
        }
    }

    pub(crate) fn eval_index(&mut self, expr: &Expr) -> Result<i64> {
        match self.eval_expr(expr)? {
            Value::Int(i) => Ok(i64::from(i)),
            other => Err(RuntimeError::at(
                ErrorKind::TypeMismatch(format!(
                    "array index must be int, not {}",
                    other.type_name()
                )),
                expr.span,
            )),
        }
    }

    /// Evaluates every argument, then hands one template to the output hook.
    fn eval_print(&mut self, package: &str, style: PrintStyle, args: &[Expr]) -> Result<Value> {
        if !self.imports.contains(package) {
            return fail(ErrorKind::UnboundIdentifier(package.to_string()));
        }
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_print_arg(arg)?);
        }
        let template = match style {
            PrintStyle::Println => format::println_template(values.len()),
            PrintStyle::Print => format::print_template(&values),
            PrintStyle::Printf => {
                if values.is_empty() {
                    return fail(ErrorKind::ArityMismatch {
                        name: format!("{}.Printf", package),
                        expected: 1,
                        found: 0,
                    });
                }
                match values.remove(0) {
                    FormatArg::Text(t) => t,
                    FormatArg::Value(v) => {
                        return fail(ErrorKind::TypeMismatch(format!(
                            "{}.Printf format must be a string, not {}",
                            package,
                            v.type_name()
                        )))
                    }
                }
            }
        };
        self.out.emit(&template, &values);
        Ok(Value::Unit)
    }

    fn eval_print_arg(&mut self, arg: &Expr) -> Result<FormatArg> {
        if let ExprKind::LiteralString(s) = &arg.kind {
            return Ok(FormatArg::Text(s.clone()));
        }
        match self.eval_expr(arg)? {
            Value::Unit => Err(RuntimeError::at(
                ErrorKind::TypeMismatch("void call used as value".to_string()),
                arg.span,
            )),
            v => Ok(FormatArg::Value(v)),
        }
    }
}

fn int_constant(n: i64) -> Result<Value> {
    match i32::try_from(n) {
        Ok(v) => Ok(Value::Int(v)),
        Err(_) => fail(ErrorKind::TypeMismatch(format!("constant {} overflows int", n))),
    }
}

/// Arithmetic and comparison on already-evaluated operands.
pub(crate) fn binary_op(op: BinaryOp, l: Value, r: Value) -> Result<Value> {
    use BinaryOp::*;
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(match op {
            Add => Value::Int(a.wrapping_add(b)),
            Sub => Value::Int(a.wrapping_sub(b)),
            Mul => Value::Int(a.wrapping_mul(b)),
            Div | Rem if b == 0 => return fail(ErrorKind::DivisionByZero),
            Div => Value::Int(a.wrapping_div(b)),
            Rem => Value::Int(a.wrapping_rem(b)),
            Eq => Value::Bool(a == b),
            Ne => Value::Bool(a != b),
            Lt => Value::Bool(a < b),
            Le => Value::Bool(a <= b),
            Gt => Value::Bool(a > b),
            Ge => Value::Bool(a >= b),
            And | Or => return not_defined(op, "int"),
        }),
        (Value::Float(a), Value::Float(b)) => Ok(match op {
            Add => Value::Float(a + b),
            Sub => Value::Float(a - b),
            Mul => Value::Float(a * b),
            Div => Value::Float(a / b),
            Eq => Value::Bool(a == b),
            Ne => Value::Bool(a != b),
            Lt => Value::Bool(a < b),
            Le => Value::Bool(a <= b),
            Gt => Value::Bool(a > b),
            Ge => Value::Bool(a >= b),
            Rem | And | Or => return not_defined(op, "float32"),
        }),
        (Value::Bool(a), Value::Bool(b)) => match op {
            Eq => Ok(Value::Bool(a == b)),
            Ne => Ok(Value::Bool(a != b)),
            _ => not_defined(op, "bool"),
        },
        (l, r) if l.type_name() == r.type_name() => not_defined(op, &l.type_name()),
        (l, r) => fail(ErrorKind::TypeMismatch(format!(
            "mismatched types {} and {} for operator {}",
            l.type_name(),
            r.type_name(),
            op.symbol()
        ))),
    }
}

fn not_defined<T>(op: BinaryOp, ty: &str) -> Result<T> {
    fail(ErrorKind::TypeMismatch(format!(
        "operator {} not defined on {}",
        op.symbol(),
        ty
    )))
}

fn convert(to: &Type, value: Value) -> Result<Value> {
    match (to, value) {
        (Type::Int, v @ Value::Int(_)) | (Type::Float32, v @ Value::Float(_)) => Ok(v),
        (Type::Int, Value::Float(x)) => Ok(Value::Int(x as i32)),
        (Type::Float32, Value::Int(n)) => Ok(Value::Float(n as f32)),
        (Type::Bool, v @ Value::Bool(_)) => Ok(v),
        (to, v) => fail(ErrorKind::TypeMismatch(format!(
            "cannot convert {} value to {}",
            v.type_name(),
            to
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_arithmetic_wraps() {
        assert_eq!(binary_op(BinaryOp::Add, Value::Int(i32::MAX), Value::Int(1)), Ok(Value::Int(i32::MIN)));
        assert_eq!(binary_op(BinaryOp::Mul, Value::Int(65536), Value::Int(65536)), Ok(Value::Int(0)));
        assert_eq!(binary_op(BinaryOp::Div, Value::Int(i32::MIN), Value::Int(-1)), Ok(Value::Int(i32::MIN)));
        assert_eq!(binary_op(BinaryOp::Rem, Value::Int(-7), Value::Int(3)), Ok(Value::Int(-1)));
    }

    #[test]
    fn test_division_by_zero() {
        let err = binary_op(BinaryOp::Div, Value::Int(1), Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = binary_op(BinaryOp::Rem, Value::Int(1), Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        assert!(matches!(
            binary_op(BinaryOp::Div, Value::Float(1.0), Value::Float(0.0)),
            Ok(Value::Float(x)) if x.is_infinite()
        ));
    }

    #[test]
    fn test_operand_type_rules() {
        assert!(binary_op(BinaryOp::Rem, Value::Float(1.0), Value::Float(2.0)).is_err());
        assert!(binary_op(BinaryOp::Add, Value::Int(1), Value::Float(2.0)).is_err());
        assert!(binary_op(BinaryOp::Lt, Value::Bool(true), Value::Bool(false)).is_err());
        assert_eq!(binary_op(BinaryOp::Eq, Value::Bool(true), Value::Bool(true)), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(convert(&Type::Int, Value::Float(-2.9)), Ok(Value::Int(-2)));
        assert_eq!(convert(&Type::Float32, Value::Int(81)), Ok(Value::Float(81.0)));
        assert!(convert(&Type::Int, Value::Bool(true)).is_err());
    }
}
