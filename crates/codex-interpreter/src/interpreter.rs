//! Main interpreter engine.

use std::io::Write;

use crate::env::Env;
use crate::input::InputSource;
use crate::value::Value;
use codex_syntax::ast::*;
use codex_syntax::error::{error_at, Error, Result};
use codex_syntax::token::{Token, TokenKind};

/// Evaluation rules the interpreter follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `==` is equality, `~=` inequality; mismatched operand types are
    /// runtime faults.
    #[default]
    Standard,
    /// The historical evaluator: `==` and `~=` are swapped and mismatched
    /// operands quietly produce `NULL`.
    Legacy,
}

pub struct Interpreter<W: Write, I: InputSource> {
    /// Scope chain; the root scope outlives individual `run` calls
    env: Env,
    /// Sink for `XOUT`
    out: W,
    /// Source for `XIN`
    input: I,
    dialect: Dialect,
}

impl<W: Write, I: InputSource> Interpreter<W, I> {
    pub fn new(out: W, input: I) -> Self {
        Self {
            env: Env::new_root(),
            out,
            input,
            dialect: Dialect::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Top-level variables as `(name, declared type, value)`, sorted by name.
    pub fn globals(&self) -> Vec<(String, DataType, Value)> {
        self.env.vars_snapshot()
    }

    /// Forget every variable.
    pub fn reset(&mut self) {
        self.env = Env::new_root();
    }

    /// Execute `program` statement by statement.
    ///
    /// A runtime fault aborts only the top-level statement that raised it;
    /// the faults are returned in order of occurrence.
    pub fn run(&mut self, program: &[Stmt]) -> Vec<Error> {
        let mut errors = Vec::new();
        for stmt in program {
            if let Err(e) = self.exec_stmt(stmt) {
                errors.push(e);
            }
        }
        if let Err(e) = self.out.flush() {
            errors.push(Error::new(format!("Failed to flush output: {}", e)));
        }
        errors
    }

    /// Evaluate a single expression against the current environment.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        self.eval_expr(expr)
    }

    fn exec_block(&mut self, body: &[Stmt]) -> Result<()> {
        self.env.push_scope();
        let result = body.iter().try_for_each(|s| self.exec_stmt(s));
        self.env.pop_scope();
        result
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Declaration(decl) => self.declare(decl),
            Stmt::DeclarationList(decls) => decls.iter().try_for_each(|d| self.declare(d)),
            Stmt::Print(expr) => {
                let v = self.eval_expr(expr)?;
                writeln!(self.out, "{}", v).map_err(|e| {
                    Error::new(format!("Failed to write output: {}", e)).or_line(expr.line())
                })
            }
            Stmt::Input(target) => self.read_into(target),
            Stmt::Expression(expr) => self.eval_expr(expr).map(|_| ()),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition)?.is_truthy() {
                    self.exec_stmt(then_branch)
                } else if let Some(branch) = else_branch {
                    self.exec_stmt(branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.eval_expr(condition)?.is_truthy() {
                    self.exec_stmt(body)?;
                }
                Ok(())
            }
            Stmt::Block(body) => self.exec_block(body),
        }
    }

    fn declare(&mut self, decl: &Declaration) -> Result<()> {
        let (name, value) = match &decl.init {
            Expr::Identifier(tok) => (tok, Value::Null),
            Expr::Assignment { target, op, value } => match target.as_identifier() {
                Some(tok) => (tok, self.eval_expr(value)?),
                None => return error_at(op, "Invalid assignment target"),
            },
            other => {
                let err = Error::new("Expected variable name in declaration");
                return Err(err.or_line(other.line()));
            }
        };
        self.env
            .define(&name.lexeme, value, decl.ty)
            .map_err(|e| e.or_at(name))
    }

    /// `XIN(x)`: read one line and store it in `x`, converted per its declared type.
    fn read_into(&mut self, target: &Expr) -> Result<()> {
        let Some(tok) = target.as_identifier() else {
            return Err(Error::new("XIN target must be a variable").or_line(target.line()));
        };
        let ty = match self.env.get(&tok.lexeme) {
            Some(binding) => binding.ty,
            None => return error_at(tok, format!("Undefined variable '{}'", tok.lexeme)),
        };
        if self.input.wants_prompt() {
            write!(self.out, "{} ({}): ", tok.lexeme, ty)
                .and_then(|_| self.out.flush())
                .map_err(|e| Error::runtime_at(tok, format!("Failed to write output: {}", e)))?;
        }
        let line = self
            .input
            .read_line()
            .map_err(|e| Error::runtime_at(tok, format!("Failed to read input: {}", e)))?
            .ok_or_else(|| {
                let msg = format!("Unexpected end of input while reading '{}'", tok.lexeme);
                Error::runtime_at(tok, msg)
            })?;
        let value = parse_input(&line, ty).ok_or_else(|| {
            Error::runtime_at(
                tok,
                format!("Invalid {} input '{}' for '{}'", ty, line.trim(), tok.lexeme),
            )
        })?;
        self.env.assign(&tok.lexeme, value).map_err(|e| e.or_at(tok))
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Constant(lit) => Ok(Value::from(lit.clone())),
            Expr::Identifier(tok) => match self.env.get(&tok.lexeme) {
                Some(b) => Ok(b.value.clone()),
                None => error_at(tok, format!("Undefined variable '{}'", tok.lexeme)),
            },
            Expr::Grouped(inner) => self.eval_expr(inner),
            Expr::Unary { op, operand } => {
                let v = self.eval_expr(operand)?;
                match op.kind {
                    TokenKind::Not => Ok(Value::Bool(!v.is_truthy())),
                    _ => error_at(op, format!("Unsupported unary operator '{}'", op.lexeme)),
                }
            }
            Expr::Multiplicative { lhs, op, rhs } | Expr::Additive { lhs, op, rhs } => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                match (&l, &r) {
                    (Value::Int(a), Value::Int(b)) => int_arith(op, *a, *b),
                    (Value::Float(a), Value::Float(b)) => float_arith(op, *a, *b),
                    _ => self.mismatch(op, &l, &r),
                }
            }
            Expr::Relational { lhs, op, rhs } => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                let ordering = match (&l, &r) {
                    (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
                    (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
                    _ => return self.mismatch(op, &l, &r),
                };
                let holds = match (op.kind, ordering) {
                    (_, None) => false, // NaN
                    (TokenKind::Greater, Some(o)) => o.is_gt(),
                    (TokenKind::GreaterEq, Some(o)) => o.is_ge(),
                    (TokenKind::Less, Some(o)) => o.is_lt(),
                    (TokenKind::LessEq, Some(o)) => o.is_le(),
                    _ => {
                        let msg = format!("Unsupported relational operator '{}'", op.lexeme);
                        return error_at(op, msg);
                    }
                };
                Ok(Value::Bool(holds))
            }
            Expr::Equality { lhs, op, rhs } => {
                let equal = self.eval_expr(lhs)? == self.eval_expr(rhs)?;
                let result = match (op.kind, self.dialect) {
                    (TokenKind::EqualTo, Dialect::Standard)
                    | (TokenKind::NotEqualTo, Dialect::Legacy) => equal,
                    (TokenKind::NotEqualTo, Dialect::Standard)
                    | (TokenKind::EqualTo, Dialect::Legacy) => !equal,
                    _ => {
                        let msg = format!("Unsupported equality operator '{}'", op.lexeme);
                        return error_at(op, msg);
                    }
                };
                Ok(Value::Bool(result))
            }
            Expr::LogAnd { lhs, rhs, .. } => {
                let l = self.eval_expr(lhs)?;
                if !l.is_truthy() {
                    return Ok(l);
                }
                self.eval_expr(rhs)
            }
            Expr::LogOr { lhs, rhs, .. } => {
                let l = self.eval_expr(lhs)?;
                if l.is_truthy() {
                    return Ok(l);
                }
                self.eval_expr(rhs)
            }
            Expr::Assignment { target, op, value } => {
                let Some(tok) = target.as_identifier() else {
                    return error_at(op, "Invalid assignment target");
                };
                let v = self.eval_expr(value)?;
                self.env.assign(&tok.lexeme, v.clone()).map_err(|e| e.or_at(tok))?;
                Ok(v)
            }
        }
    }

    fn mismatch(&self, op: &Token, l: &Value, r: &Value) -> Result<Value> {
        match self.dialect {
            Dialect::Legacy => Ok(Value::Null),
            Dialect::Standard => error_at(
                op,
                format!(
                    "Type mismatch: cannot apply '{}' to {} and {}",
                    op.lexeme,
                    l.type_name(),
                    r.type_name()
                ),
            ),
        }
    }
}

fn int_arith(op: &Token, a: i32, b: i32) -> Result<Value> {
    if b == 0 && matches!(op.kind, TokenKind::Slash | TokenKind::Percent) {
        return error_at(op, "Division by zero");
    }
    let n = match op.kind {
        TokenKind::Plus => a.wrapping_add(b),
        TokenKind::Minus => a.wrapping_sub(b),
        TokenKind::Star => a.wrapping_mul(b),
        TokenKind::Slash => a.wrapping_div(b),
        TokenKind::Percent => a.wrapping_rem(b),
        _ => return error_at(op, format!("Unsupported arithmetic operator '{}'", op.lexeme)),
    };
    Ok(Value::Int(n))
}

fn float_arith(op: &Token, a: f32, b: f32) -> Result<Value> {
    let x = match op.kind {
        TokenKind::Plus => a + b,
        TokenKind::Minus => a - b,
        TokenKind::Star => a * b,
        TokenKind::Slash => a / b,
        TokenKind::Percent => a % b,
        _ => return error_at(op, format!("Unsupported arithmetic operator '{}'", op.lexeme)),
    };
    Ok(Value::Float(x))
}

/// Converts a line of input to a value of the declared type.
fn parse_input(text: &str, ty: DataType) -> Option<Value> {
    match ty {
        DataType::Int => text.trim().parse().ok().map(Value::Int),
        DataType::Float => text.trim().parse().ok().map(Value::Float),
        DataType::Boolean => match text.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        DataType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        DataType::String => Some(Value::Str(text.to_string())),
    }
}
