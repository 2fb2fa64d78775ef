//! Shared syntax definitions for the Goo toolchain: tokens, AST and the
//! front-end error type.

pub mod ast;
pub mod error;
pub mod token;

pub use ast::*;
pub use error::*;
pub use token::*;
