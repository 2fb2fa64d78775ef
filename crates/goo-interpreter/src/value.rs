//! Value types for the Goo interpreter.

use std::fmt;

use goo_syntax::ast::Type;

use crate::array::ArrayRef;
use crate::error::{fail, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 32-bit signed integer; arithmetic wraps
    Int(i32),
    /// A 32-bit float
    Float(f32),
    /// Outcome of a boolean-valued expression. Never stored in a binding.
    Bool(bool),
    /// Shared handle to a fixed-size array
    Array(ArrayRef),
    /// Result of a void call or a print
    Unit,
}

impl Value {
    /// The zero value a declaration without initializer starts from.
    pub fn zero(ty: &Type) -> Result<Value> {
        check_declarable(ty)?;
        Ok(match ty {
            Type::Float32 => Value::Float(0.0),
            Type::Array { len, elem } => Value::Array(ArrayRef::new(*len, (**elem).clone())),
            _ => Value::Int(0),
        })
    }

    /// Go-style type name used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float32".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Array(a) => a.ty().to_string(),
            Value::Unit => "void".to_string(),
        }
    }

    /// Truth value when used as an operand of `!`, `&&` or `||`.
    /// Integers participate only as the 0/1 encoding of a boolean result.
    pub fn as_logical(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Truth value in an `if` condition, where any nonzero integer is true.
    pub fn as_condition(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(n) => Some(*n != 0),
            _ => None,
        }
    }

    /// The declared type a `var x = e` / `x := e` binding receives.
    pub(crate) fn storage_type(&self, target: &str) -> Result<Type> {
        match self {
            Value::Int(_) => Ok(Type::Int),
            Value::Float(_) => Ok(Type::Float32),
            Value::Array(a) => Ok(a.ty()),
            Value::Bool(_) => fail(ErrorKind::ImmutableTarget(format!(
                "{} (boolean values have no storage)",
                target
            ))),
            Value::Unit => fail(ErrorKind::TypeMismatch(format!(
                "void call used as value in declaration of {}",
                target
            ))),
        }
    }
}

/// Rejects types that cannot back a variable: `bool` anywhere, and arrays of arrays.
pub(crate) fn check_declarable(ty: &Type) -> Result<()> {
    if ty.mentions_bool() {
        return fail(ErrorKind::ImmutableTarget(format!(
            "storage of type {} (bool variables are not supported)",
            ty
        )));
    }
    if let Type::Array { elem, .. } = ty {
        if matches!(**elem, Type::Array { .. }) {
            return fail(ErrorKind::TypeMismatch(format!(
                "multi-dimensional array type {} is not supported",
                ty
            )));
        }
    }
    Ok(())
}

/// Checks `value` against the declared type of the slot it is about to be
/// stored in. `untyped` marks an integer constant, which converts to `float32`.
pub(crate) fn store_into(ty: &Type, value: Value, untyped: bool, target: &str) -> Result<Value> {
    match (ty, value) {
        (_, Value::Bool(_)) => fail(ErrorKind::ImmutableTarget(format!(
            "{} (boolean values have no storage)",
            target
        ))),
        (_, Value::Unit) => fail(ErrorKind::TypeMismatch(format!(
            "void call used as value in assignment to {}",
            target
        ))),
        (Type::Int, v @ Value::Int(_)) => Ok(v),
        (Type::Float32, v @ Value::Float(_)) => Ok(v),
        (Type::Float32, Value::Int(n)) if untyped => Ok(Value::Float(n as f32)),
        (Type::Array { len, elem }, Value::Array(a)) if a.len() == *len && a.elem() == **elem => {
            Ok(Value::Array(a))
        }
        (ty, v) => fail(ErrorKind::TypeMismatch(format!(
            "cannot use {} value as {} value in assignment to {}",
            v.type_name(),
            ty,
            target
        ))),
    }
}

/// Shortest Go `%v` rendering of a float32: plain decimal, or `e` notation
/// when the exponent is below -4 or at least 6.
pub fn go_float(x: f32) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf".to_string() } else { "-Inf".to_string() };
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0".to_string() } else { "0".to_string() };
    }
    let sci = format!("{:e}", x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };
    if exp < -4 || exp >= 6 {
        format!("{}{}", mantissa, go_exponent(exp))
    } else {
        format!("{}", x)
    }
}

/// `e+06` / `e-05`: signed, at least two digits.
pub(crate) fn go_exponent(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("e{}{:02}", sign, exp.unsigned_abs())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", go_float(*x)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Array(a) => {
                write!(f, "[")?;
                for (i, it) in a.values().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", it)?;
                }
                write!(f, "]")
            }
            Value::Unit => write!(f, "<void>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_float_rendering() {
        assert_eq!(go_float(81.0), "81");
        assert_eq!(go_float(0.0), "0");
        assert_eq!(go_float(2.5), "2.5");
        assert_eq!(go_float(0.0001), "0.0001");
        assert_eq!(go_float(0.00001), "1e-05");
        assert_eq!(go_float(123456.0), "123456");
        assert_eq!(go_float(1000000.0), "1e+06");
        assert_eq!(go_float(1234567.0), "1.234567e+06");
        assert_eq!(go_float(-3.0), "-3");
    }

    #[test]
    fn test_logical_and_condition_truth() {
        assert_eq!(Value::Int(1).as_logical(), Some(true));
        assert_eq!(Value::Int(2).as_logical(), None);
        assert_eq!(Value::Int(2).as_condition(), Some(true));
        assert_eq!(Value::Float(1.0).as_condition(), None);
    }

    #[test]
    fn test_store_rules() {
        assert_eq!(store_into(&Type::Float32, Value::Int(3), true, "f"), Ok(Value::Float(3.0)));
        let typed = store_into(&Type::Float32, Value::Int(3), false, "f").unwrap_err();
        assert!(matches!(typed.kind, ErrorKind::TypeMismatch(_)));
        let boolean = store_into(&Type::Int, Value::Bool(true), false, "x").unwrap_err();
        assert!(matches!(boolean.kind, ErrorKind::ImmutableTarget(_)));
        assert!(Value::zero(&Type::Bool).is_err());
        assert!(Value::zero(&Type::array(2, Type::array(2, Type::Int))).is_err());
    }
}
