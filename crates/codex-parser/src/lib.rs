pub mod parser;

pub use parser::{Parsed, Parser, SYNC_SET};

/// Parse an already tokenized program.
pub fn parse(tokens: Vec<codex_syntax::Token>) -> Parsed {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_lexer::tokenize;
    use codex_syntax::ast::*;
    use codex_syntax::error::ErrorKind;
    use codex_syntax::token::{Literal, TokenKind};

    fn parse_expr_str(input: &str) -> Expr {
        let tokens = tokenize(input).expect("Lexing should succeed");
        let mut parser = Parser::new(tokens);
        parser.parse_expr().expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Parsed {
        let tokens = tokenize(input).expect("Lexing should succeed");
        Parser::new(tokens).parse()
    }

    fn parse_ok(input: &str) -> Vec<Stmt> {
        let parsed = parse_program_str(input);
        assert!(parsed.errors.is_empty(), "Unexpected errors: {:?}", parsed.errors);
        parsed.statements
    }

    fn int(e: &Expr) -> i32 {
        match e {
            Expr::Constant(Literal::Int(n)) => *n,
            other => panic!("Expected int constant, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_expressions() {
        assert!(matches!(parse_expr_str("42"), Expr::Constant(Literal::Int(42))));
        assert!(matches!(parse_expr_str("2.5"), Expr::Constant(Literal::Float(x)) if x == 2.5));
        assert!(matches!(
            parse_expr_str("\"hello\""),
            Expr::Constant(Literal::Str(s)) if s == "hello"
        ));
        assert!(matches!(parse_expr_str("'z'"), Expr::Constant(Literal::Char('z'))));
        assert!(matches!(parse_expr_str("true"), Expr::Constant(Literal::Bool(true))));
    }

    #[test]
    fn test_identifier_expressions() {
        assert!(matches!(parse_expr_str("count"), Expr::Identifier(t) if t.lexeme == "count"));
    }

    #[test]
    fn test_print_precedence() {
        let stmts = parse_ok("XOUT(1+2*3);");
        assert_eq!(stmts.len(), 1);
        let Stmt::Print(Expr::Additive { lhs, op, rhs }) = &stmts[0] else {
            panic!("Expected print of an additive expression, got {:?}", stmts[0]);
        };
        assert_eq!(int(lhs), 1);
        assert_eq!(op.kind, TokenKind::Plus);
        let Expr::Multiplicative { lhs, op, rhs } = &**rhs else {
            panic!("Expected multiplicative rhs, got {:?}", rhs);
        };
        assert_eq!((int(lhs), op.kind, int(rhs)), (2, TokenKind::Star, 3));
    }

    #[test]
    fn test_each_level_builds_its_own_node() {
        assert!(matches!(parse_expr_str("a & b"), Expr::LogAnd { .. }));
        assert!(matches!(parse_expr_str("a | b"), Expr::LogOr { .. }));
        assert!(matches!(parse_expr_str("a == b"), Expr::Equality { .. }));
        assert!(matches!(parse_expr_str("a ~= b"), Expr::Equality { .. }));
        assert!(matches!(parse_expr_str("a >= b"), Expr::Relational { .. }));
        assert!(matches!(parse_expr_str("a - b"), Expr::Additive { .. }));
        assert!(matches!(parse_expr_str("a % b"), Expr::Multiplicative { .. }));
        assert!(matches!(parse_expr_str("~a"), Expr::Unary { .. }));
        assert!(matches!(parse_expr_str("(a)"), Expr::Grouped(_)));
    }

    #[test]
    fn test_logical_precedence() {
        // & binds tighter than |
        let Expr::LogOr { lhs, rhs, .. } = parse_expr_str("a | b & c") else {
            panic!("Expected LogOr at the root");
        };
        assert!(matches!(*lhs, Expr::Identifier(_)));
        assert!(matches!(*rhs, Expr::LogAnd { .. }));
    }

    #[test]
    fn test_left_associative_chains() {
        let Expr::Additive { lhs, rhs, .. } = parse_expr_str("10 - 4 - 3") else {
            panic!("Expected Additive at the root");
        };
        assert!(matches!(*lhs, Expr::Additive { .. }));
        assert_eq!(int(&rhs), 3);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let Expr::Assignment { target, value, .. } = parse_expr_str("a = b = 3") else {
            panic!("Expected Assignment at the root");
        };
        assert!(matches!(*target, Expr::Identifier(ref t) if t.lexeme == "a"));
        assert!(matches!(*value, Expr::Assignment { .. }));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let parsed = parse_program_str("1 = 2;");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].to_string(),
            "[line 1] Error at '=': Invalid assignment target"
        );
    }

    #[test]
    fn test_declarations() {
        let stmts = parse_ok("INT x = 5;");
        let Stmt::Declaration(decl) = &stmts[0] else {
            panic!("Expected declaration");
        };
        assert_eq!(decl.ty, DataType::Int);
        assert_eq!(decl.name().map(|t| t.lexeme.as_str()), Some("x"));
        assert!(matches!(decl.init, Expr::Assignment { .. }));

        let stmts = parse_ok("FP a, b = 2.0, c;");
        let Stmt::DeclarationList(decls) = &stmts[0] else {
            panic!("Expected declaration list");
        };
        let names: Vec<&str> = decls
            .iter()
            .filter_map(|d| d.name())
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(decls.iter().all(|d| d.ty == DataType::Float));

        let parsed = parse_program_str("INT 5;");
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].msg.contains("variable name"));
    }

    #[test]
    fn test_control_flow_statements() {
        let stmts =
            parse_ok("IF (a) XOUT(1); ELSE XOUT(2);\nWHILE (i < 3) { i = i + 1; }\nXIN(n);");
        assert!(matches!(&stmts[0], Stmt::If { else_branch: Some(_), .. }));
        let Stmt::While { body, .. } = &stmts[1] else {
            panic!("Expected while");
        };
        assert!(matches!(&**body, Stmt::Block(b) if b.len() == 1));
        assert!(matches!(&stmts[2], Stmt::Input(Expr::Identifier(_))));
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let stmts = parse_ok("IF (a) IF (b) XOUT(1); ELSE XOUT(2);");
        let Stmt::If { then_branch, else_branch, .. } = &stmts[0] else {
            panic!("Expected if");
        };
        assert!(else_branch.is_none());
        assert!(matches!(&**then_branch, Stmt::If { else_branch: Some(_), .. }));
    }

    #[test]
    fn test_input_takes_only_a_primary() {
        let parsed = parse_program_str("XIN(a + b);");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].to_string(),
            "[line 1] Error at '+': Expected ')' after XIN target"
        );
    }

    #[test]
    fn test_stray_token_recovers() {
        let parsed = parse_program_str("XOUT(1);\n) XOUT(2);\nINT y = 3;");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].kind, ErrorKind::Syntax);
        assert_eq!(parsed.errors[0].to_string(), "[line 2] Error at ')': Unexpected token ')'");
        assert_eq!(parsed.statements.len(), 3);
    }

    #[test]
    fn test_missing_semicolon_reports_once() {
        let parsed = parse_program_str("INT x = 1\nXOUT(x);");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].to_string(),
            "[line 2] Error at 'XOUT': Expected ';' after declaration"
        );
        assert!(matches!(
            &parsed.statements[..],
            [Stmt::Print(Expr::Identifier(t))] if t.lexeme == "x" && t.line == 2
        ));
    }

    #[test]
    fn test_error_at_end() {
        let parsed = parse_program_str("XOUT(1)");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(
            parsed.errors[0].to_string(),
            "[line 1] Error at end: Expected ';' after XOUT statement"
        );
    }

    #[test]
    fn test_recovery_inside_block() {
        let parsed = parse_program_str("{ XOUT(1 + ); XOUT(2); }\nXOUT(3);");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.statements.len(), 2);
        assert!(matches!(&parsed.statements[0], Stmt::Block(b) if b.len() == 1));
    }

    #[test]
    fn test_top_level_brace_is_part_of_the_skipped_region() {
        let parsed = parse_program_str("XOUT(1 }\nXOUT(2);");
        assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
        assert_eq!(
            parsed.errors[0].to_string(),
            "[line 1] Error at '}': Expected ')' after XOUT expression"
        );
        assert_eq!(parsed.statements.len(), 1);
    }

    #[test]
    fn test_else_of_a_faulted_if_is_not_reported_again() {
        let parsed = parse_program_str("IF (x XOUT(1); ELSE XOUT(2);");
        assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
        assert_eq!(
            parsed.errors[0].to_string(),
            "[line 1] Error at 'XOUT': Expected ')' after IF condition"
        );

        let parsed = parse_program_str("IF (x) XOUT(1 ; ELSE XOUT(2);");
        assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    }

    #[test]
    fn test_unrelated_else_is_still_reported() {
        let parsed = parse_program_str("IF (x XOUT(1); XOUT(3); ELSE XOUT(2);");
        assert_eq!(parsed.errors.len(), 2, "{:?}", parsed.errors);
        assert_eq!(
            parsed.errors[1].to_string(),
            "[line 1] Error at 'ELSE': Unexpected token 'ELSE'"
        );
    }

    #[test]
    fn test_faulted_if_does_not_close_enclosing_block() {
        let parsed = parse_program_str("{ IF (x { XOUT(1); } XOUT(2); }");
        assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
        assert!(matches!(&parsed.statements[..], [Stmt::Block(b)] if b.len() == 2));
    }

    #[test]
    fn test_caret_has_no_grammar_rule() {
        let parsed = parse_program_str("XOUT(2 ^ 3);");
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].to_string().contains("at '^'"));
    }

    #[test]
    fn test_parsing_twice_is_identical() {
        let src = "INT i = 0, j;\nWHILE (i < 3 & ~(j == 2)) { XOUT(i); i = i + 1; }";
        assert_eq!(parse_program_str(src), parse_program_str(src));
    }
}
