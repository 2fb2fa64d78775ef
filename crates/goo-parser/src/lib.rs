pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use goo_lexer::Lexer;
    use goo_syntax::ast::*;

    fn parse_expr_str(input: &str) -> Expr {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Program {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize().expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_program().expect("Parsing should succeed")
    }

    fn parse_program_err(input: &str) -> goo_syntax::Error {
        let tokens = Lexer::new(input).tokenize().expect("Lexing should succeed");
        Parser::new(tokens).parse_program().expect_err("Parsing should fail")
    }

    fn main_body(input: &str) -> Vec<Stmt> {
        let src = format!("package main\nfunc main() {{\n{}\n}}\n", input);
        let program = parse_program_str(&src);
        match program.items.into_iter().next() {
            Some(Item::Function(f)) => f.body.clone(),
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_expressions() {
        assert!(matches!(parse_expr_str("42").kind, ExprKind::LiteralInt(42)));
        assert!(matches!(parse_expr_str("2.5").kind, ExprKind::LiteralFloat(x) if x == 2.5));
        assert!(matches!(parse_expr_str("\"hi\"").kind, ExprKind::LiteralString(s) if s == "hi"));
        assert!(matches!(parse_expr_str("true").kind, ExprKind::LiteralBool(true)));
        assert!(matches!(parse_expr_str("k").kind, ExprKind::Ident(s) if s == "k"));
    }

    #[test]
    fn test_operator_precedence() {
        // a || b && c  ==>  a || (b && c)
        match parse_expr_str("a || b && c").kind {
            ExprKind::Binary(BinaryOp::Or, _, rhs) => {
                assert!(matches!(rhs.kind, ExprKind::Binary(BinaryOp::And, _, _)))
            }
            other => panic!("Expected ||, got {:?}", other),
        }
        // k*factorial(k-1) + 1  ==>  (k * call) + 1
        match parse_expr_str("k*factorial(k-1) + 1").kind {
            ExprKind::Binary(BinaryOp::Add, lhs, _) => {
                assert!(matches!(lhs.kind, ExprKind::Binary(BinaryOp::Mul, _, _)))
            }
            other => panic!("Expected +, got {:?}", other),
        }
        // (1 == 0) && f()  ==>  && at the top
        assert!(matches!(
            parse_expr_str("(1 == 0) && f()").kind,
            ExprKind::Binary(BinaryOp::And, _, _)
        ));
    }

    #[test]
    fn test_unary_chains() {
        match parse_expr_str("!!(1 == 1)").kind {
            ExprKind::Unary(UnaryOp::Not, inner) => {
                assert!(matches!(inner.kind, ExprKind::Unary(UnaryOp::Not, _)))
            }
            other => panic!("Expected !, got {:?}", other),
        }
        assert!(parse_expr_str("-1").is_untyped_int());
        assert!(!parse_expr_str("-k").is_untyped_int());
        assert!(parse_expr_str("2 * (3 - 1)").is_untyped_int());
        assert!(!parse_expr_str("2 * k").is_untyped_int());
        assert!(!parse_expr_str("1 == 1").is_untyped_int());
        assert!(!parse_expr_str("int(2.5) + 1").is_untyped_int());
        assert!(parse_expr_str("c + 1").is_untyped_int_with(|name| name == "c"));
    }

    #[test]
    fn test_calls_conversions_and_prints() {
        match parse_expr_str("add(1, 2)").kind {
            ExprKind::Call { name, args } => {
                assert_eq!(name, "add");
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected Call, got {:?}", other),
        }
        assert!(matches!(
            parse_expr_str("float32(k*k)").kind,
            ExprKind::Convert { to: Type::Float32, .. }
        ));
        match parse_expr_str("fmt.Printf(\"%d\\n\", x)").kind {
            ExprKind::Print { package, style, args } => {
                assert_eq!(package, "fmt");
                assert_eq!(style, PrintStyle::Printf);
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected Print, got {:?}", other),
        }
        assert!(matches!(parse_expr_str("arr[k]").kind, ExprKind::Index { .. }));
    }

    #[test]
    fn test_program_structure() {
        let program = parse_program_str(
            "package main\n\nimport \"fmt\"\n\nvar arr [10]float32\n\nfunc main() {\n    fill(10)\n}\n\nfunc fill( k int ) {\n}\n",
        );
        assert_eq!(program.package, "main");
        assert_eq!(program.imports, vec!["fmt".to_string()]);
        assert_eq!(program.items.len(), 3);
        match &program.items[0] {
            Item::Stmt(Stmt { kind: StmtKind::Var { name, ty, init: None }, .. }) => {
                assert_eq!(name, "arr");
                assert_eq!(ty, &Some(Type::array(10, Type::Float32)));
            }
            other => panic!("Expected var, got {:?}", other),
        }
        let fill = program.functions().find(|f| f.name == "fill").unwrap();
        assert_eq!(fill.params, vec![Param { name: "k".into(), ty: Type::Int }]);
        assert_eq!(fill.result, None);
    }

    #[test]
    fn test_grouped_imports_and_params() {
        let program = parse_program_str(
            "package main\nimport (\n  \"fmt\"\n)\nfunc add(a, b int, c float32) (int) { return a }\n",
        );
        assert_eq!(program.imports, vec!["fmt".to_string()]);
        let add = program.functions().next().unwrap();
        let tys: Vec<_> = add.params.iter().map(|p| p.ty.clone()).collect();
        assert_eq!(tys, vec![Type::Int, Type::Int, Type::Float32]);
        assert_eq!(add.result, Some(Type::Int));
    }

    #[test]
    fn test_statements() {
        let body = main_body(
            "var x int\nx = 1\nk := 2\nk -= 1\narr[k] += 3\nk++\nconst n = 4\nreturn\n{ x = 2 }",
        );
        assert!(matches!(body[0].kind, StmtKind::Var { ty: Some(Type::Int), init: None, .. }));
        assert!(matches!(body[1].kind, StmtKind::Assign { op: AssignOp::Set, .. }));
        assert!(matches!(body[2].kind, StmtKind::Var { ty: None, init: Some(_), .. }));
        assert!(matches!(body[3].kind, StmtKind::Assign { op: AssignOp::Sub, .. }));
        assert!(matches!(
            &body[4].kind,
            StmtKind::Assign { target: Expr { kind: ExprKind::Index { .. }, .. }, op: AssignOp::Add, .. }
        ));
        assert!(matches!(body[5].kind, StmtKind::IncDec { increment: true, .. }));
        assert!(matches!(body[6].kind, StmtKind::Const { .. }));
        assert!(matches!(body[7].kind, StmtKind::Return(None)));
        assert!(matches!(body[8].kind, StmtKind::Block(_)));
    }

    #[test]
    fn test_if_forms() {
        let body = main_body("if k < 2 {\n return 1\n}\nif (k > 0) { k -= 1; } else if k == 0 { } else { }\nif v := k; v > 1 { }");
        match &body[0].kind {
            StmtKind::If { init: None, then_body, else_body: None, .. } => {
                assert!(matches!(then_body[0].kind, StmtKind::Return(Some(_))))
            }
            other => panic!("Expected if, got {:?}", other),
        }
        match &body[1].kind {
            StmtKind::If { else_body: Some(else_body), .. } => {
                assert!(matches!(else_body.kind, StmtKind::If { else_body: Some(_), .. }))
            }
            other => panic!("Expected if/else, got {:?}", other),
        }
        assert!(matches!(body[2].kind, StmtKind::If { init: Some(_), .. }));
    }

    #[test]
    fn test_spans() {
        let body = main_body("x = 1 +\n  y");
        match &body[0].kind {
            StmtKind::Assign { value, .. } => assert_eq!(value.span, Span::new(3, 7)),
            other => panic!("Expected assignment, got {:?}", other),
        }
        assert_eq!(body[0].span, Span::new(3, 1));
    }

    #[test]
    fn test_parse_errors() {
        // no semicolon follows `=`, so the closing brace is what fails
        let err = parse_program_err("package main\nfunc main() {\n  x = \n}\n");
        assert_eq!(err.line, Some(4));
        parse_program_err("func main() {}");
        parse_program_err("package main\nfunc f(a, b) {}");
        parse_program_err("package main\nvar s string");
        parse_program_err("package main\nfunc main() { os.Exit(1) }");
        parse_program_err("package main\nfunc main() { 1 := 2 }");
        parse_program_err("package main\nx = 1");
    }
}
