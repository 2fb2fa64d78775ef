//! Recursive-descent parser for Goo source files.

use std::rc::Rc;

use goo_syntax::ast::*;
use goo_syntax::error::{Error, Result};
use goo_syntax::token::{Token, TokenKind};

/// Parser over a token vector produced by the lexer (must end with `Eof`).
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn span(&self) -> Span {
        let t = self.peek();
        Span::new(t.line, t.col)
    }

    fn advance(&mut self) -> Token {
        let t = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T> {
        let t = self.peek();
        Err(Error::with_span(
            format!("Expected {}, found {}", expected, t.kind),
            t.line,
            t.col,
        ))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            self.unexpected(&kind.to_string())
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span)> {
        let span = self.span();
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, span))
            }
            _ => self.unexpected("identifier"),
        }
    }

    /// `;` or the closing token of the enclosing list may end a declaration.
    fn expect_terminator(&mut self, closer: &TokenKind) -> Result<()> {
        if self.eat(&TokenKind::Semicolon) || self.check(closer) {
            Ok(())
        } else {
            self.unexpected("';' or newline")
        }
    }

    /// Parse a whole source file.
    pub fn parse_program(&mut self) -> Result<Program> {
        self.expect(TokenKind::Package)?;
        let (package, _) = self.expect_ident()?;
        self.expect_terminator(&TokenKind::Eof)?;

        let mut imports = Vec::new();
        while self.eat(&TokenKind::Import) {
            if self.eat(&TokenKind::LParen) {
                while !self.check(&TokenKind::RParen) {
                    imports.push(self.parse_import_path()?);
                    self.expect_terminator(&TokenKind::RParen)?;
                }
                self.expect(TokenKind::RParen)?;
            } else {
                imports.push(self.parse_import_path()?);
            }
            self.expect_terminator(&TokenKind::Eof)?;
        }

        let mut items = Vec::new();
        while !self.check(&TokenKind::Eof) {
            let item = match self.peek_kind() {
                TokenKind::Func => Item::Function(Rc::new(self.parse_function()?)),
                TokenKind::Var => Item::Stmt(self.parse_var_decl()?),
                TokenKind::Const => Item::Stmt(self.parse_const_decl()?),
                _ => return self.unexpected("'func', 'var' or 'const' at package level"),
            };
            items.push(item);
            self.expect_terminator(&TokenKind::Eof)?;
        }
        Ok(Program { package, imports, items })
    }

    fn parse_import_path(&mut self) -> Result<String> {
        match self.peek_kind().clone() {
            TokenKind::Str(path) => {
                self.advance();
                Ok(path)
            }
            _ => self.unexpected("import path string"),
        }
    }

    fn parse_function(&mut self) -> Result<Function> {
        let span = self.expect(TokenKind::Func).map(|t| Span::new(t.line, t.col))?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen)?;
        let result = if self.check(&TokenKind::LBrace) {
            None
        } else if self.eat(&TokenKind::LParen) {
            let ty = self.parse_type()?;
            self.expect(TokenKind::RParen)?;
            Some(ty)
        } else {
            Some(self.parse_type()?)
        };
        let body = self.parse_block()?;
        Ok(Function { name, params, result, body, span })
    }

    /// Parameters, with Go's grouped form `a, b int`.
    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let (name, _) = self.expect_ident()?;
            if self.eat(&TokenKind::Comma) {
                pending.push(name);
                continue;
            }
            let ty = self.parse_type()?;
            for p in pending.drain(..).chain(std::iter::once(name)) {
                params.push(Param { name: p, ty: ty.clone() });
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        if !pending.is_empty() {
            return self.unexpected("parameter type");
        }
        Ok(params)
    }

    fn parse_type(&mut self) -> Result<Type> {
        let span = self.span();
        match self.peek_kind().clone() {
            TokenKind::LBracket => {
                self.advance();
                let len = match self.peek_kind().clone() {
                    TokenKind::Int(n) if n >= 0 => {
                        self.advance();
                        n as usize
                    }
                    _ => return self.unexpected("array length"),
                };
                self.expect(TokenKind::RBracket)?;
                let elem = self.parse_type()?;
                Ok(Type::array(len, elem))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Type::from_name(&name)
                    .ok_or_else(|| Error::at(format!("Unknown type '{}'", name), span))
            }
            _ => self.unexpected("type"),
        }
    }

    fn parse_var_decl(&mut self) -> Result<Stmt> {
        let span = self.span();
        self.expect(TokenKind::Var)?;
        let (name, _) = self.expect_ident()?;
        let ty = if self.check(&TokenKind::Assign) { None } else { Some(self.parse_type()?) };
        let init = if self.eat(&TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
        Ok(Stmt::new(StmtKind::Var { name, ty, init }, span))
    }

    fn parse_const_decl(&mut self) -> Result<Stmt> {
        let span = self.span();
        self.expect(TokenKind::Const)?;
        let (name, _) = self.expect_ident()?;
        let ty = if self.check(&TokenKind::Assign) { None } else { Some(self.parse_type()?) };
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        Ok(Stmt::new(StmtKind::Const { name, ty, value }, span))
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            body.push(self.parse_stmt()?);
            self.expect_terminator(&TokenKind::RBrace)?;
        }
        Ok(body)
    }

    pub fn parse_stmt(&mut self) -> Result<Stmt> {
        let span = self.span();
        match self.peek_kind() {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Const => self.parse_const_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::LBrace => Ok(Stmt::new(StmtKind::Block(self.parse_block()?), span)),
            TokenKind::Return => {
                self.advance();
                let value = if matches!(self.peek_kind(), TokenKind::Semicolon | TokenKind::RBrace) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                Ok(Stmt::new(StmtKind::Return(value), span))
            }
            _ => self.parse_simple_stmt(),
        }
    }

    /// Expression statements, assignments, `++`/`--` and `:=`.
    fn parse_simple_stmt(&mut self) -> Result<Stmt> {
        let span = self.span();
        let lhs = self.parse_expr()?;
        let op = match self.peek_kind() {
            TokenKind::Assign => AssignOp::Set,
            TokenKind::PlusAssign => AssignOp::Add,
            TokenKind::MinusAssign => AssignOp::Sub,
            TokenKind::StarAssign => AssignOp::Mul,
            TokenKind::SlashAssign => AssignOp::Div,
            TokenKind::PercentAssign => AssignOp::Rem,
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let increment = self.advance().kind == TokenKind::PlusPlus;
                return Ok(Stmt::new(StmtKind::IncDec { target: lhs, increment }, span));
            }
            TokenKind::Define => {
                let op_span = self.span();
                self.advance();
                let name = match lhs.kind {
                    ExprKind::Ident(name) => name,
                    _ => return Err(Error::at("Non-name on left side of ':='", op_span)),
                };
                let init = self.parse_expr()?;
                return Ok(Stmt::new(StmtKind::Var { name, ty: None, init: Some(init) }, span));
            }
            _ => return Ok(Stmt::new(StmtKind::ExprStmt(lhs), span)),
        };
        self.advance();
        let value = self.parse_expr()?;
        Ok(Stmt::new(StmtKind::Assign { target: lhs, op, value }, span))
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let span = self.span();
        self.expect(TokenKind::If)?;
        let first = self.parse_simple_stmt()?;
        let (init, cond) = if self.eat(&TokenKind::Semicolon) {
            (Some(Box::new(first)), self.parse_expr()?)
        } else {
            match first.kind {
                StmtKind::ExprStmt(cond) => (None, cond),
                _ => return Err(Error::at("Expected condition after 'if'", first.span)),
            }
        };
        let then_body = self.parse_block()?;
        let else_body = if self.eat(&TokenKind::Else) {
            let else_span = self.span();
            if self.check(&TokenKind::If) {
                Some(Box::new(self.parse_if()?))
            } else {
                Some(Box::new(Stmt::new(StmtKind::Block(self.parse_block()?), else_span)))
            }
        } else {
            None
        };
        Ok(Stmt::new(StmtKind::If { init, cond, then_body, else_body }, span))
    }

    /// Parse a single expression.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, span: Span) -> Expr {
        Expr::new(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), span)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.check(&TokenKind::OrOr) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Self::binary(BinaryOp::Or, lhs, rhs, span);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_comparison()?;
        while self.check(&TokenKind::AndAnd) {
            let span = self.span();
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = Self::binary(BinaryOp::And, lhs, rhs, span);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::LessEq => BinaryOp::Le,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::GreaterEq => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Self::binary(op, lhs, rhs, span);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Self::binary(op, lhs, rhs, span);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            let span = self.span();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Self::binary(op, lhs, rhs, span);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let span = self.span();
        let op = match self.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::new(ExprKind::Unary(op, Box::new(operand)), span))
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.check(&TokenKind::LBracket) {
            self.advance();
            let index = self.parse_expr()?;
            self.expect(TokenKind::RBracket)?;
            let span = expr.span;
            expr = Expr::new(ExprKind::Index { array: Box::new(expr), index: Box::new(index) }, span);
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.span();
        let kind = match self.peek_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                ExprKind::LiteralInt(n)
            }
            TokenKind::Float(x) => {
                self.advance();
                ExprKind::LiteralFloat(x)
            }
            TokenKind::Str(s) => {
                self.advance();
                ExprKind::LiteralString(s)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(&TokenKind::Dot) {
                    return self.parse_package_call(name, span);
                }
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_args()?;
                    return match Type::from_name(&name) {
                        Some(to) => {
                            let mut args = args;
                            if args.len() != 1 {
                                return Err(Error::at(
                                    format!("Conversion to {} takes exactly one argument", to),
                                    span,
                                ));
                            }
                            let expr = Box::new(args.remove(0));
                            Ok(Expr::new(ExprKind::Convert { to, expr }, span))
                        }
                        None => Ok(Expr::new(ExprKind::Call { name, args }, span)),
                    };
                }
                match name.as_str() {
                    "true" => ExprKind::LiteralBool(true),
                    "false" => ExprKind::LiteralBool(false),
                    _ => ExprKind::Ident(name),
                }
            }
            _ => return self.unexpected("expression"),
        };
        Ok(Expr::new(kind, span))
    }

    /// `pkg.Member(args)`; only the `fmt` printing functions exist.
    fn parse_package_call(&mut self, package: String, span: Span) -> Result<Expr> {
        self.expect(TokenKind::Dot)?;
        let (member, member_span) = self.expect_ident()?;
        let style = match (package.as_str(), member.as_str()) {
            ("fmt", "Print") => PrintStyle::Print,
            ("fmt", "Println") => PrintStyle::Println,
            ("fmt", "Printf") => PrintStyle::Printf,
            _ => {
                return Err(Error::at(
                    format!("Unsupported package function {}.{}", package, member),
                    member_span,
                ))
            }
        };
        if !self.check(&TokenKind::LParen) {
            return self.unexpected("'(' after package function");
        }
        let args = self.parse_args()?;
        Ok(Expr::new(ExprKind::Print { package, style, args }, span))
    }
}
