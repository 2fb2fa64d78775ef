//! Program loading and the `main` entry point.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use goo_syntax::ast::{Function, Program, Span, Stmt, StmtKind};

use crate::call::{check_signature, CallStack};
use crate::config::InterpreterConfig;
use crate::env::Env;
use crate::error::{fail, ErrorKind, Result, RuntimeError};
use crate::output::{Output, StdoutOutput};
use crate::value::Value;

pub struct Interpreter {
    config: InterpreterConfig,
    /// Function definitions, visible from every frame
    pub(crate) functions: HashMap<String, Rc<Function>>,
    /// Packages named by `import` declarations
    pub(crate) imports: HashSet<String>,
    pub(crate) env: Env,
    pub(crate) calls: CallStack,
    pub(crate) out: Box<dyn Output>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default(), Box::new(StdoutOutput))
    }
}

impl Interpreter {
    pub fn new(config: InterpreterConfig, out: Box<dyn Output>) -> Self {
        let calls = CallStack::new(config.max_call_depth);
        Self {
            config,
            functions: HashMap::new(),
            imports: HashSet::new(),
            env: Env::new(),
            calls,
            out,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Frames currently on the call stack; zero whenever `run` has returned.
    pub fn call_depth(&self) -> usize {
        self.calls.depth()
    }

    /// Current value of a package-level variable or constant.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.env.global(name).map(|b| b.value.clone())
    }

    /// Loads `program` and calls its `main`.
    #[tracing::instrument(level = "debug", skip_all, fields(package = %program.package))]
    pub fn run(&mut self, program: &Program) -> Result<()> {
        self.load(program)?;
        self.call_main()?;
        tracing::debug!("main returned");
        Ok(())
    }

    /// Registers imports and functions, then initializes globals in
    /// declaration order.
    pub fn load(&mut self, program: &Program) -> Result<()> {
        if program.package != "main" {
            return fail(ErrorKind::TypeMismatch(format!(
                "package {} is not runnable; expected package main",
                program.package
            )));
        }
        self.imports.extend(program.imports.iter().cloned());

        for func in program.functions() {
            check_signature(func)?;
            if self.functions.contains_key(&func.name) {
                return Err(RuntimeError::at(ErrorKind::Redeclared(func.name.clone()), func.span));
            }
            self.functions.insert(func.name.clone(), Rc::clone(func));
        }

        let mut globals = 0usize;
        for stmt in program.globals() {
            if let Some(name) = declared_name(stmt) {
                if self.functions.contains_key(name) {
                    return Err(RuntimeError::at(ErrorKind::Redeclared(name.to_string()), stmt.span));
                }
            }
            self.exec_stmt(stmt)?;
            globals += 1;
        }
        tracing::debug!(functions = self.functions.len(), globals, "program loaded");
        Ok(())
    }

    fn call_main(&mut self) -> Result<()> {
        let main = match self.functions.get("main") {
            Some(f) => Rc::clone(f),
            None => return fail(ErrorKind::UnboundIdentifier("main".to_string())),
        };
        if !main.params.is_empty() || main.result.is_some() {
            return Err(RuntimeError::at(
                ErrorKind::TypeMismatch("func main must have no arguments and no return values".to_string()),
                main.span,
            ));
        }
        self.invoke("main", &[], Span::default())?;
        Ok(())
    }
}

fn declared_name(stmt: &Stmt) -> Option<&str> {
    match &stmt.kind {
        StmtKind::Var { name, .. } | StmtKind::Const { name, .. } => Some(name.as_str()),
        _ => None,
    }
}

/// Outcome of running a whole program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure(RuntimeError),
}

impl ExitStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    /// Process exit code: 0 on success, 2 for a runtime failure.
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure(_) => 2,
        }
    }
}

/// Runs `program` to completion on a fresh interpreter.
pub fn run(program: &Program, config: InterpreterConfig, out: Box<dyn Output>) -> ExitStatus {
    let mut interp = Interpreter::new(config, out);
    match interp.run(program) {
        Ok(()) => ExitStatus::Success,
        Err(err) => ExitStatus::Failure(err),
    }
}
