//! AST (abstract syntax tree) types for the Goo language.

use std::fmt;
use std::rc::Rc;

/// 1-based source position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Declared types. `Bool` is parseable but never storable.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float32,
    Bool,
    Array { len: usize, elem: Box<Type> },
}

impl Type {
    pub fn array(len: usize, elem: Type) -> Self {
        Type::Array { len, elem: Box::new(elem) }
    }

    /// Resolve a predeclared type name.
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Int),
            "float32" => Some(Type::Float32),
            "bool" => Some(Type::Bool),
            _ => None,
        }
    }

    /// True if this type, or an array's element type, is `bool`.
    pub fn mentions_bool(&self) -> bool {
        match self {
            Type::Bool => true,
            Type::Array { elem, .. } => elem.mentions_bool(),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float32 => write!(f, "float32"),
            Type::Bool => write!(f, "bool"),
            Type::Array { len, elem } => write!(f, "[{}]{}", len, elem),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // comparisons
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // logical, short-circuit
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

/// Which `fmt` printing function a print node calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintStyle {
    Print,
    Println,
    Printf,
}

/// Expressions (literals, operations, calls, element access).
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    LiteralInt(i64),
    LiteralFloat(f64),
    LiteralBool(bool),
    /// Only meaningful as a print argument.
    LiteralString(String),
    Ident(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// `int(e)` / `float32(e)`
    Convert { to: Type, expr: Box<Expr> },
    Index { array: Box<Expr>, index: Box<Expr> },
    Call { name: String, args: Vec<Expr> },
    /// `fmt.Println(...)` and friends
    Print { package: String, style: PrintStyle, args: Vec<Expr> },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// An integer constant that has not been given a type yet, e.g. `2`, `-1`
    /// or `2 * 3`.
    pub fn is_untyped_int(&self) -> bool {
        self.is_untyped_int_with(|_| false)
    }

    /// Like [`Expr::is_untyped_int`], with `untyped_name` deciding whether an
    /// identifier names an untyped integer constant.
    ///
    /// Walks the tree with an explicit worklist, so arbitrarily long operator
    /// chains do not consume host stack.
    pub fn is_untyped_int_with(&self, untyped_name: impl Fn(&str) -> bool) -> bool {
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match &expr.kind {
                ExprKind::LiteralInt(_) => {}
                ExprKind::Ident(name) if untyped_name(name.as_str()) => {}
                ExprKind::Unary(UnaryOp::Neg | UnaryOp::Plus, inner) => pending.push(inner),
                ExprKind::Binary(op, lhs, rhs) if op.is_arithmetic() => {
                    pending.push(lhs);
                    pending.push(rhs);
                }
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    /// The arithmetic applied by a compound assignment.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Set => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Rem => Some(BinaryOp::Rem),
        }
    }
}

/// Statements (declarations, assignments, control flow).
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `var x T`, `var x T = e`, `var x = e` and `x := e`
    Var {
        name: String,
        ty: Option<Type>,
        init: Option<Expr>,
    },
    Const {
        name: String,
        ty: Option<Type>,
        value: Expr,
    },
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
    IncDec {
        target: Expr,
        increment: bool,
    },
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then_body: Vec<Stmt>,
        /// Either a `Block` or a nested `If`.
        else_body: Option<Box<Stmt>>,
    },
    Return(Option<Expr>),
    Block(Vec<Stmt>),
    ExprStmt(Expr),
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Function parameter. Goo parameters always carry a type.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// Function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub result: Option<Type>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Top-level program items: functions and package-level `var`/`const`.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Shared so the interpreter can hold on to bodies without copying them
    Function(Rc<Function>),
    Stmt(Stmt),
}

/// A whole source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub package: String,
    pub imports: Vec<String>,
    pub items: Vec<Item>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &Rc<Function>> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            Item::Stmt(_) => None,
        })
    }

    pub fn globals(&self) -> impl Iterator<Item = &Stmt> {
        self.items.iter().filter_map(|item| match item {
            Item::Stmt(s) => Some(s),
            Item::Function(_) => None,
        })
    }
}
