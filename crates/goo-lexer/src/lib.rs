//! Goo lexer: converts source text into tokens.
use goo_syntax::error::{error_at, Error, Result};
use goo_syntax::token::{Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    /// Consume `next` if it follows, choosing between two token kinds.
    fn either(&mut self, next: char, yes: TokenKind, no: TokenKind) -> TokenKind {
        if self.peek() == Some(next) {
            self.advance();
            yes
        } else {
            no
        }
    }

    /// Skip whitespace and comments. When `newline_ends_stmt` is set, stops at
    /// the first line break and returns where the implicit `;` belongs.
    fn skip_trivia(&mut self, newline_ends_stmt: bool) -> Result<Option<(usize, usize)>> {
        while let Some(c) = self.peek() {
            if c == '\n' {
                let at = (self.line, self.col);
                self.advance();
                if newline_ends_stmt {
                    return Ok(Some(at));
                }
            } else if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if c == '/' && self.peek_next() == Some('*') {
                let (line, col) = (self.line, self.col);
                self.advance();
                self.advance();
                let mut crossed_line = false;
                loop {
                    match self.advance() {
                        None => return error_at(line, col, "Unterminated block comment"),
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        Some('\n') => crossed_line = true,
                        Some(_) => {}
                    }
                }
                // a comment spanning lines acts like a newline
                if crossed_line && newline_ends_stmt {
                    return Ok(Some((line, col)));
                }
            } else {
                break;
            }
        }
        Ok(None)
    }

    fn read_number(&mut self) -> Result<TokenKind> {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else if c == '.' && !is_float && self.peek_next().map_or(false, |n| n.is_ascii_digit()) {
                is_float = true;
                s.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E') && !s.contains(['e', 'E']) {
                let signed = matches!(self.peek_next(), Some('+') | Some('-'));
                let digit_at = if signed { self.pos + 2 } else { self.pos + 1 };
                if !self.src.get(digit_at).map_or(false, |d| d.is_ascii_digit()) {
                    break;
                }
                is_float = true;
                s.push(c);
                self.advance();
                if signed {
                    if let Some(sign) = self.advance() {
                        s.push(sign);
                    }
                }
            } else {
                break;
            }
        }
        let invalid = || Error::with_span(format!("Invalid number '{}'", s), start_line, start_col);
        if is_float {
            s.parse::<f64>().map(TokenKind::Float).map_err(|_| invalid())
        } else {
            s.parse::<i64>().map(TokenKind::Int).map_err(|_| invalid())
        }
    }

    fn read_ident_or_keyword(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match s.as_str() {
            "package" => TokenKind::Package,
            "import" => TokenKind::Import,
            "func" => TokenKind::Func,
            "var" => TokenKind::Var,
            "const" => TokenKind::Const,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident(s),
        }
    }

    /// Reads the body of a string literal; the opening quote is already consumed.
    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<TokenKind> {
        let mut s = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => return Ok(TokenKind::Str(s)),
                '\n' => break,
                '\\' => {
                    let esc = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(other) => {
                            return error_at(
                                self.line,
                                self.col - 1,
                                format!("Unknown escape sequence '\\{}'", other),
                            )
                        }
                        None => break,
                    };
                    s.push(esc);
                }
                other => s.push(other),
            }
        }
        error_at(start_line, start_col, "Unterminated string")
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens: Vec<Token> = Vec::new();
        loop {
            let newline_ends_stmt = tokens.last().map_or(false, |t| t.kind.ends_statement());
            if let Some((line, col)) = self.skip_trivia(newline_ends_stmt)? {
                tokens.push(Token { kind: TokenKind::Semicolon, line, col });
                continue;
            }
            let line = self.line;
            let col = self.col;
            let c = match self.peek() {
                None => {
                    if newline_ends_stmt {
                        tokens.push(Token { kind: TokenKind::Semicolon, line, col });
                    }
                    tokens.push(Token { kind: TokenKind::Eof, line, col });
                    break;
                }
                Some(c) => c,
            };
            let kind = if c.is_ascii_digit() {
                self.read_number()?
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.read_ident_or_keyword()
            } else {
                self.advance();
                match c {
                    '"' => self.read_string(line, col)?,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    '.' => TokenKind::Dot,
                    '=' => self.either('=', TokenKind::EqEq, TokenKind::Assign),
                    '!' => self.either('=', TokenKind::NotEq, TokenKind::Bang),
                    '<' => self.either('=', TokenKind::LessEq, TokenKind::Less),
                    '>' => self.either('=', TokenKind::GreaterEq, TokenKind::Greater),
                    '*' => self.either('=', TokenKind::StarAssign, TokenKind::Star),
                    '/' => self.either('=', TokenKind::SlashAssign, TokenKind::Slash),
                    '%' => self.either('=', TokenKind::PercentAssign, TokenKind::Percent),
                    '+' => match self.peek() {
                        Some('+') => {
                            self.advance();
                            TokenKind::PlusPlus
                        }
                        _ => self.either('=', TokenKind::PlusAssign, TokenKind::Plus),
                    },
                    '-' => match self.peek() {
                        Some('-') => {
                            self.advance();
                            TokenKind::MinusMinus
                        }
                        _ => self.either('=', TokenKind::MinusAssign, TokenKind::Minus),
                    },
                    ':' if self.peek() == Some('=') => {
                        self.advance();
                        TokenKind::Define
                    }
                    '&' if self.peek() == Some('&') => {
                        self.advance();
                        TokenKind::AndAnd
                    }
                    '|' if self.peek() == Some('|') => {
                        self.advance();
                        TokenKind::OrOr
                    }
                    '&' => return error_at(line, col, "Unexpected '&' (did you mean '&&'?)"),
                    '|' => return error_at(line, col, "Unexpected '|' (did you mean '||'?)"),
                    other => {
                        return error_at(line, col, format!("Unexpected character '{}'", other));
                    }
                }
            };
            tokens.push(Token { kind, line, col });
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .expect("Lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a := b += c -= 1 ++ -- && || != <= >= == !"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Define,
                TokenKind::Ident("b".into()),
                TokenKind::PlusAssign,
                TokenKind::Ident("c".into()),
                TokenKind::MinusAssign,
                TokenKind::Int(1),
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::NotEq,
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::EqEq,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(kinds("42")[0], TokenKind::Int(42));
        assert_eq!(kinds("2.5")[0], TokenKind::Float(2.5));
        assert_eq!(kinds("1e3")[0], TokenKind::Float(1000.0));
        assert_eq!(kinds("6.25e-2")[0], TokenKind::Float(0.0625));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(kinds("\"a\\tb\\n\"")[0], TokenKind::Str("a\tb\n".into()));
    }

    #[test]
    fn test_semicolon_insertion() {
        let ks = kinds("x = f(1)\nreturn\n}\n");
        assert_eq!(
            ks,
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Ident("f".into()),
                TokenKind::LParen,
                TokenKind::Int(1),
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Return,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        let ks = kinds("a &&\nb");
        assert!(!ks[..3].contains(&TokenKind::Semicolon));
    }

    #[test]
    fn test_comments_are_skipped() {
        let ks = kinds("// line\nx /* block */ = 1 /* multi\nline */ y");
        assert_eq!(
            ks,
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Int(1),
                TokenKind::Semicolon,
                TokenKind::Ident("y".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("var x\n  y").tokenize().unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (1, 5));
        assert_eq!((tokens[3].line, tokens[3].col), (2, 3));
    }

    #[test]
    fn test_errors() {
        let err = Lexer::new("x & y").tokenize().unwrap_err();
        assert_eq!((err.line, err.col), (Some(1), Some(3)));
        assert!(Lexer::new("\"open").tokenize().is_err());
        assert!(Lexer::new("/* open").tokenize().is_err());
        assert!(Lexer::new("x # y").tokenize().is_err());
        assert!(Lexer::new("99999999999999999999").tokenize().is_err());
    }
}
