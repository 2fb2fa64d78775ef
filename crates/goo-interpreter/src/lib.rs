//! Goo interpreter: runs a parsed Goo program by walking its syntax tree.
//!
//! Values are 32-bit `int`, `float32` and fixed-size arrays of either. Boolean
//! results exist only in flight: they drive `if`, `&&`, `||` and `!` and can be
//! printed, but no variable, element, parameter or constant can hold one.
//! Functions run in their own call frame, chained to the package-level
//! globals and never to the caller. Every runtime failure is a typed
//! [`ErrorKind`] tagged with the position of the node that raised it.
//!
//! ```rust
//! use goo_interpreter::{run, BufferOutput, ExitStatus, InterpreterConfig};
//! use goo_lexer::Lexer;
//! use goo_parser::Parser;
//!
//! let src = "package main\nimport \"fmt\"\nfunc main() { fmt.Println(6 * 7) }\n";
//! let tokens = Lexer::new(src).tokenize().unwrap();
//! let program = Parser::new(tokens).parse_program().unwrap();
//! let out = BufferOutput::new();
//! let status = run(&program, InterpreterConfig::default(), Box::new(out.clone()));
//! assert_eq!(status, ExitStatus::Success);
//! assert_eq!(out.contents(), "42\n");
//! ```

pub mod array;
pub mod call;
pub mod config;
pub mod env;
pub mod error;
mod eval;
mod exec;
mod flow;
pub mod format;
pub mod interpreter;
pub mod output;
mod stack;
pub mod value;

pub use array::ArrayRef;
pub use call::{CallFrame, CallStack, FrameState};
pub use config::{InterpreterConfig, DEFAULT_MAX_CALL_DEPTH, MAX_CALL_DEPTH_VAR};
pub use env::{Binding, Env};
pub use error::{ErrorKind, RuntimeError};
pub use interpreter::{run, ExitStatus, Interpreter};
pub use output::{BufferOutput, FormatArg, Output, SilentOutput, StdoutOutput};
pub use value::Value;
