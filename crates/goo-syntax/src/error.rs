//! Front-end error type shared by the Goo lexer, parser and CLI.
//!
//! Every error carries a human-readable message and, when it can be pinned to
//! source text, a 1-based line and column. The interpreter has its own typed
//! runtime error, which converts into this one so the CLI renders every stage
//! the same way.
//!
//! ```rust
//! use goo_syntax::error::{error_at, Error, Result};
//!
//! fn expect_digit(c: char, line: usize, col: usize) -> Result<u32> {
//!     match c.to_digit(10) {
//!         Some(d) => Ok(d),
//!         None => error_at(line, col, format!("Unexpected character '{}'", c)),
//!     }
//! }
//!
//! let err = expect_digit('x', 3, 7).unwrap_err();
//! assert_eq!(err.to_string(), "Unexpected character 'x' at 3:7");
//! assert_eq!(Error::new("no span").to_string(), "no span");
//! ```

use std::fmt;

use crate::ast::Span;

/// An error raised while reading, parsing or running a Goo program.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error with no source location.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates an error pinned to `line:col`.
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }

    pub fn at(msg: impl Into<String>, span: Span) -> Self {
        Self::with_span(msg, span.line, span.col)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}

/// Result alias used by the front end.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(msg))`.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}

/// Shorthand for `Err(Error::with_span(msg, line, col))`.
pub fn error_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(msg, line, col))
}
