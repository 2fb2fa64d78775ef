//! Control flow for the interpreter.

use crate::value::Value;

#[derive(Debug)]
pub(crate) enum Flow {
    /// Fall through to the next statement
    Continue,
    /// Unwind to the enclosing call with the given value
    Return(Value),
}
