//! Runtime failures raised while evaluating a Goo program.
//!
//! Every failure is one of the [`ErrorKind`] variants, tagged with the source
//! position of the innermost expression or statement that raised it. The
//! position is attached on the way out: the first node to see an untagged
//! error claims it, so outer nodes never overwrite a more precise location.

use std::fmt;

use goo_syntax::ast::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("undefined: {0}")]
    UnboundIdentifier(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("cannot assign to {0}")]
    ImmutableTarget(String),
    #[error("index out of range [{index}] with length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("missing return at end of function {0}")]
    MissingReturn(String),
    #[error("stack overflow: call depth exceeds {0}")]
    StackOverflow(usize),
    #[error("integer divide by zero")]
    DivisionByZero,
    #[error("wrong number of arguments in call to {name}: have {found}, want {expected}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("{0} redeclared in this block")]
    Redeclared(String),
}

/// An [`ErrorKind`] plus where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, span: None }
    }

    pub fn at(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span: Some(span) }
    }

    /// Attach `span` unless an inner node already did.
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl From<ErrorKind> for RuntimeError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} at {}:{}", self.kind, span.line, span.col),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<RuntimeError> for goo_syntax::Error {
    fn from(err: RuntimeError) -> Self {
        match err.span {
            Some(span) => goo_syntax::Error::at(err.kind.to_string(), span),
            None => goo_syntax::Error::new(err.kind.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Shorthand for an untagged failure.
pub(crate) fn fail<T>(kind: ErrorKind) -> Result<T> {
    Err(RuntimeError::new(kind))
}
