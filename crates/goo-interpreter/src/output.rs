//! Where `fmt.Print`, `fmt.Println` and `fmt.Printf` send their text.
//!
//! The interpreter hands every print to an [`Output`] as a Printf-style
//! template plus its evaluated arguments. [`format::render`](crate::format::render)
//! turns that into text; sinks decide what to do with it.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::format;
use crate::value::Value;

/// One argument of a print call.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    /// A string literal argument
    Text(String),
    Value(Value),
}

impl FormatArg {
    pub fn type_name(&self) -> String {
        match self {
            FormatArg::Text(_) => "string".to_string(),
            FormatArg::Value(v) => v.type_name(),
        }
    }
}

pub trait Output {
    fn emit(&mut self, template: &str, args: &[FormatArg]);
}

/// Writes to the process's standard output.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn emit(&mut self, template: &str, args: &[FormatArg]) {
        let text = format::render(template, args);
        if let Err(err) = write_text(&mut io::stdout().lock(), &text) {
            tracing::warn!(error = %err, "failed to write program output");
        }
    }
}

/// Writes `text` and flushes, so output interleaves with diagnostics on stderr.
fn write_text(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// Collects output in memory. Clones share one buffer, so a test can keep a
/// handle while the interpreter owns another.
#[derive(Debug, Default, Clone)]
pub struct BufferOutput {
    buf: Rc<RefCell<String>>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buf.borrow().clone()
    }
}

impl Output for BufferOutput {
    fn emit(&mut self, template: &str, args: &[FormatArg]) {
        self.buf.borrow_mut().push_str(&format::render(template, args));
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct SilentOutput;

impl Output for SilentOutput {
    fn emit(&mut self, _template: &str, _args: &[FormatArg]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_are_reported() {
        let err = write_text(&mut ClosedPipe, "lost\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let mut sink = Vec::new();
        write_text(&mut sink, "kept\n").unwrap();
        assert_eq!(sink, b"kept\n");
    }

    #[test]
    fn test_buffer_clones_share_contents() {
        let out = BufferOutput::new();
        let mut handle: Box<dyn Output> = Box::new(out.clone());
        handle.emit("%v %v\n", &[FormatArg::Value(Value::Int(1)), FormatArg::Text("x".into())]);
        assert_eq!(out.contents(), "1 x\n");
    }
}
