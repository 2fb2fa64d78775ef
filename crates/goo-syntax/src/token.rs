//! Token definitions produced by the Goo lexer.
//!
//! Goo follows Go's lexical rules for the subset it supports: `//` and `/* */`
//! comments, and a semicolon inserted at a newline when the line ends in a
//! token that can end a statement. The inserted semicolons appear in the token
//! stream as ordinary [`TokenKind::Semicolon`] tokens.
//!
//! ```rust
//! use goo_syntax::{Token, TokenKind};
//!
//! let name = Token {
//!     kind: TokenKind::Ident("factorial".to_string()),
//!     line: 1,
//!     col: 6,
//! };
//! assert!(name.kind.ends_statement());
//! ```

/// Token types that can be produced by the Goo lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Variable, function, package and type names
    Ident(String),
    /// Integer literal; range-checked against `int` by the interpreter
    Int(i64),
    /// Floating-point literal such as `2.5` or `1e3`
    Float(f64),
    /// Interpreted string literal, escapes already resolved
    Str(String),

    // === Keywords ===
    Package,
    Import,
    Func,
    Var,
    Const,
    If,
    Else,
    Return,

    // === Punctuation ===
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    /// Explicit `;` or one inserted at a line end
    Semicolon,
    Dot,

    // === Assignment ===
    /// `=`
    Assign,
    /// `:=`
    Define,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    AndAnd,
    OrOr,
    Bang,

    /// End-of-file marker
    Eof,
}

impl TokenKind {
    /// Whether a newline directly after this token terminates the statement.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::Return
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }
}

/// A token with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,
    /// Line number in the source file (1-based)
    pub line: usize,
    /// Column number in the source file (1-based)
    pub col: usize,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TokenKind::Ident(name) => return write!(f, "identifier '{}'", name),
            TokenKind::Int(n) => return write!(f, "number {}", n),
            TokenKind::Float(x) => return write!(f, "number {}", x),
            TokenKind::Str(s) => return write!(f, "string {:?}", s),
            TokenKind::Package => "package",
            TokenKind::Import => "import",
            TokenKind::Func => "func",
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Assign => "=",
            TokenKind::Define => ":=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            TokenKind::PercentAssign => "%=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEq => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Eof => return write!(f, "end of file"),
        };
        write!(f, "'{}'", text)
    }
}
