//! CodeX interpreter: executes parsed statements with a tree-walking evaluator.
//!
//! The interpreter keeps its environment between calls to
//! [`Interpreter::run`], which is what lets the REPL build a program up one
//! statement at a time. Output goes to any [`std::io::Write`] sink and `XIN`
//! reads from any [`InputSource`], so the whole runtime can be driven from
//! memory in tests.

pub mod env;
pub mod input;
pub mod interpreter;
pub mod value;

pub use env::{Binding, Env};
pub use input::{InputSource, ScriptedInput, StdinInput};
pub use interpreter::{Dialect, Interpreter};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use codex_syntax::{DataType, Expr};

    fn run_with(input: &str, lines: &[&str], dialect: Dialect) -> (String, Vec<String>) {
        let tokens = codex_lexer::tokenize(input)
            .unwrap_or_else(|e| panic!("Lex error: {}\nInput: {}", e, input));
        let parsed = codex_parser::parse(tokens);
        assert!(parsed.is_ok(), "Parse errors {:?}\nInput: {}", parsed.errors, input);
        let mut interp = Interpreter::new(Vec::new(), ScriptedInput::new(lines.iter().copied()))
            .with_dialect(dialect);
        let errors = interp.run(&parsed.statements);
        let out = String::from_utf8(interp.into_output()).expect("utf8 output");
        (out, errors.iter().map(|e| e.to_string()).collect())
    }

    fn run_program(input: &str) -> (String, Vec<String>) {
        run_with(input, &[], Dialect::Standard)
    }

    fn expect_output(input: &str, expected: &str) {
        let (out, errors) = run_program(input);
        assert!(errors.is_empty(), "Program failed: {:?}\nInput: {}", errors, input);
        assert_eq!(out, expected, "Program: {}", input);
    }

    fn expect_error(input: &str, expected: &str) {
        let (_, errors) = run_program(input);
        assert!(
            errors.iter().any(|e| e == expected),
            "Expected {:?} in {:?}\nInput: {}",
            expected,
            errors,
            input
        );
    }

    #[test]
    fn test_literal_output() {
        expect_output("XOUT(42);", "42\n");
        expect_output("XOUT(3.0);", "3.\n");
        expect_output("XOUT(2.5);", "2.5\n");
        expect_output("XOUT(\"hello world\");", "hello world\n");
        expect_output("XOUT('c');", "c\n");
        expect_output("XOUT(true);", "true\n");
    }

    #[test]
    fn test_unset_variable_is_null() {
        expect_output("INT x; XOUT(x);", "NULL\n");
    }

    #[test]
    fn test_arithmetic() {
        expect_output("XOUT(2 + 3 * 4);", "14\n");
        expect_output("XOUT((2 + 3) * 4);", "20\n");
        expect_output("XOUT(10 - 4 - 3);", "3\n");
        expect_output("XOUT(100 / 10 / 5);", "2\n");
        expect_output("XOUT(7 % 3);", "1\n");
        expect_output("XOUT(7 / 2);", "3\n");
        expect_output("XOUT(1.5 * 2.0);", "3.\n");
    }

    #[test]
    fn test_relational_and_logic() {
        expect_output("XOUT(3 < 5);", "true\n");
        expect_output("XOUT(5 <= 4);", "false\n");
        expect_output("XOUT(2.5 >= 2.5);", "true\n");
        expect_output("XOUT(~false);", "true\n");
        expect_output("XOUT(true & false);", "false\n");
        expect_output("XOUT(false | true);", "true\n");
    }

    #[test]
    fn test_equality_dialects() {
        expect_output("XOUT(1 == 1); XOUT(1 ~= 1); XOUT(\"a\" == \"b\");", "true\nfalse\nfalse\n");
        let (out, errors) = run_with("XOUT(1 == 1); XOUT(1 ~= 1);", &[], Dialect::Legacy);
        assert!(errors.is_empty());
        assert_eq!(out, "false\ntrue\n");
    }

    #[test]
    fn test_dialect_defaults_to_standard() {
        let interp = Interpreter::new(Vec::new(), ScriptedInput::default());
        assert_eq!(interp.dialect(), Dialect::Standard);
        assert_eq!(interp.with_dialect(Dialect::Legacy).dialect(), Dialect::Legacy);
    }

    #[test]
    fn test_type_mismatch() {
        expect_error(
            "XOUT(1 + 2.0);",
            "[line 1] Error at '+': Type mismatch: cannot apply '+' to INT and FP",
        );
        expect_error(
            "XOUT(\"a\" < \"b\");",
            "[line 1] Error at '<': Type mismatch: cannot apply '<' to STR and STR",
        );
        let (out, errors) = run_with("XOUT(1 + 2.0);", &[], Dialect::Legacy);
        assert!(errors.is_empty());
        assert_eq!(out, "NULL\n");
    }

    #[test]
    fn test_division_by_zero() {
        expect_error("XOUT(1 / 0);", "[line 1] Error at '/': Division by zero");
        expect_error("XOUT(1 % 0);", "[line 1] Error at '%': Division by zero");
        let (_, errors) = run_with("XOUT(1 / 0);", &[], Dialect::Legacy);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_short_circuit() {
        expect_output("INT p = 0; BOOL t = true; XOUT(t | (p = 1)); XOUT(p);", "true\n0\n");
        expect_output("INT p = 0; BOOL f = false; XOUT(f & (p = 1)); XOUT(p);", "false\n0\n");
        expect_output("INT p = 0; BOOL t = true; XOUT(t & (p = 1)); XOUT(p);", "1\n1\n");
    }

    #[test]
    fn test_assignment_is_an_expression() {
        expect_output("INT a; INT b; a = b = 4; XOUT(a); XOUT(b);", "4\n4\n");
    }

    #[test]
    fn test_block_scoping() {
        expect_output("INT x = 1; { INT x = 2; XOUT(x); } XOUT(x);", "2\n1\n");
        expect_output("INT x = 1; { x = 5; } XOUT(x);", "5\n");
        expect_error("{ INT y = 1; } XOUT(y);", "[line 1] Error at 'y': Undefined variable 'y'");
    }

    #[test]
    fn test_redeclaration() {
        expect_error(
            "INT x = 1; INT x = 2;",
            "[line 1] Error at 'x': Variable 'x' is already declared in this scope",
        );
    }

    #[test]
    fn test_control_flow() {
        expect_output("IF (1 < 2) XOUT(\"yes\"); ELSE XOUT(\"no\");", "yes\n");
        expect_output("IF (1 > 2) XOUT(\"yes\"); ELSE XOUT(\"no\");", "no\n");
        expect_output("INT x; IF (x) XOUT(1); ELSE XOUT(0);", "0\n");
    }

    #[test]
    fn test_while_loop() {
        expect_output(
            "INT i = 0; WHILE (i < 3) { XOUT(i); i = i + 1; }",
            "0\n1\n2\n",
        );
    }

    #[test]
    fn test_declaration_list() {
        expect_output("INT a, b = 2, c = 3; XOUT(a); XOUT(b); XOUT(c);", "NULL\n2\n3\n");
    }

    #[test]
    fn test_fault_continues_with_next_statement() {
        let (out, errors) = run_program("XOUT(y);\nXOUT(1);");
        assert_eq!(out, "1\n");
        assert_eq!(errors, vec!["[line 1] Error at 'y': Undefined variable 'y'".to_string()]);
    }

    #[test]
    fn test_fault_inside_block_pops_scope() {
        let tokens = codex_lexer::tokenize("{ INT z = 1; XOUT(1 / 0); }").unwrap();
        let parsed = codex_parser::parse(tokens);
        let mut interp = Interpreter::new(Vec::new(), ScriptedInput::default());
        assert_eq!(interp.run(&parsed.statements).len(), 1);
        assert_eq!(interp.env().depth(), 1);
        assert!(interp.env().get("z").is_none());
    }

    #[test]
    fn test_input_conversion() {
        let program = "INT n; FP f; BOOL b; CHAR c; STR s; XIN(n); XIN(f); XIN(b); XIN(c); XIN(s); \
                       XOUT(n + 1); XOUT(f); XOUT(b); XOUT(c); XOUT(s);";
        let lines = [" 41 ", "0.5", "true", "z", "two words"];
        let (out, errors) = run_with(program, &lines, Dialect::Standard);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(out, "42\n0.5\ntrue\nz\ntwo words\n");
    }

    struct Terminal(ScriptedInput);

    impl InputSource for Terminal {
        fn read_line(&mut self) -> std::io::Result<Option<String>> {
            self.0.read_line()
        }

        fn wants_prompt(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_prompt_goes_to_output_sink() {
        let parsed = codex_parser::parse(codex_lexer::tokenize("INT n; XIN(n); XOUT(n);").unwrap());
        let mut interp = Interpreter::new(Vec::new(), Terminal(ScriptedInput::new(["7"])));
        assert!(interp.run(&parsed.statements).is_empty());
        assert_eq!(interp.output().as_slice(), b"n (INT): 7\n");

        let mut quiet = Interpreter::new(Vec::new(), ScriptedInput::new(["7"]));
        assert!(quiet.run(&parsed.statements).is_empty());
        assert_eq!(quiet.output().as_slice(), b"7\n");
    }

    #[test]
    fn test_input_faults() {
        let (_, errors) = run_with("INT n; XIN(n);", &["forty"], Dialect::Standard);
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'n': Invalid INT input 'forty' for 'n'".to_string()]
        );

        let (_, errors) = run_with("CHAR c; XIN(c);", &["ab"], Dialect::Standard);
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'c': Invalid CHAR input 'ab' for 'c'".to_string()]
        );

        let (_, errors) = run_with("INT n; XIN(n);", &[], Dialect::Standard);
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'n': Unexpected end of input while reading 'n'".to_string()]
        );

        let (_, errors) = run_with("XIN(q);", &["1"], Dialect::Standard);
        assert_eq!(errors, vec!["[line 1] Error at 'q': Undefined variable 'q'".to_string()]);

        let (_, errors) = run_with("XIN(5);", &["1"], Dialect::Standard);
        assert_eq!(errors, vec!["[line 1] Error: XIN target must be a variable".to_string()]);
    }

    #[test]
    fn test_env_persists_across_runs() {
        let mut interp = Interpreter::new(Vec::new(), ScriptedInput::default());
        let first = codex_parser::parse(codex_lexer::tokenize("INT x = 2;").unwrap());
        let second = codex_parser::parse(codex_lexer::tokenize("x = x * 5; XOUT(x);").unwrap());
        assert!(interp.run(&first.statements).is_empty());
        assert!(interp.run(&second.statements).is_empty());
        assert_eq!(interp.output().as_slice(), b"10\n");
        assert_eq!(interp.globals(), vec![("x".to_string(), DataType::Int, Value::Int(10))]);

        interp.reset();
        assert!(interp.globals().is_empty());
    }

    #[test]
    fn test_evaluate_expression() {
        let mut interp = Interpreter::new(Vec::new(), ScriptedInput::default());
        let expr: Expr = codex_parser::Parser::new(codex_lexer::tokenize("(1 + 2) * 3").unwrap())
            .parse_expr()
            .unwrap();
        assert_eq!(interp.evaluate(&expr).unwrap(), Value::Int(9));
    }
}
