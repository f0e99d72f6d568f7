//! AST (abstract syntax tree) types for the CodeX language.
//!
//! Every node owns its children exclusively; the tree has no sharing and no
//! cycles. Nodes are never mutated after the parser links them into a parent.

use std::fmt;

use crate::token::{Literal, Token, TokenKind};

/// Declared type of a variable.
///
/// Recorded on declarations and used to convert text read by `XIN`; values
/// are not checked against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Float,
    Boolean,
    Char,
    String,
}

impl DataType {
    /// Maps a type keyword to its data type.
    pub fn from_keyword(kind: TokenKind) -> Option<DataType> {
        match kind {
            TokenKind::Int => Some(DataType::Int),
            TokenKind::Fp => Some(DataType::Float),
            TokenKind::Bool => Some(DataType::Boolean),
            TokenKind::Char => Some(DataType::Char),
            TokenKind::Str => Some(DataType::String),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kw = match self {
            DataType::Int => "INT",
            DataType::Float => "FP",
            DataType::Boolean => "BOOL",
            DataType::Char => "CHAR",
            DataType::String => "STR",
        };
        f.write_str(kw)
    }
}

/// Expressions. Operator nodes keep the operator token so the evaluator can
/// dispatch on its kind and cite its line.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Literal),
    Identifier(Token),
    Grouped(Box<Expr>),
    /// Logical negation `~`
    Unary {
        op: Token,
        operand: Box<Expr>,
    },
    /// `*`, `/` and `%`
    Multiplicative {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// `+` and `-`
    Additive {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// `>`, `>=`, `<` and `<=`
    Relational {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// `==` and `~=`
    Equality {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    LogAnd {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    LogOr {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// Right-associative `target = value`
    Assignment {
        target: Box<Expr>,
        op: Token,
        value: Box<Expr>,
    },
}

impl Expr {
    /// The identifier token this expression names, if it is a bare identifier.
    pub fn as_identifier(&self) -> Option<&Token> {
        match self {
            Expr::Identifier(tok) => Some(tok),
            _ => None,
        }
    }

    /// Best-effort source line of the expression, used to locate runtime faults.
    pub fn line(&self) -> Option<usize> {
        match self {
            Expr::Constant(_) => None,
            Expr::Identifier(tok) => Some(tok.line),
            Expr::Grouped(inner) => inner.line(),
            Expr::Unary { op, .. }
            | Expr::Multiplicative { op, .. }
            | Expr::Additive { op, .. }
            | Expr::Relational { op, .. }
            | Expr::Equality { op, .. }
            | Expr::LogAnd { op, .. }
            | Expr::LogOr { op, .. }
            | Expr::Assignment { op, .. } => Some(op.line),
        }
    }
}

/// A single typed declarator. The declared name lives inside `init`, which is
/// either a bare identifier or an assignment to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub ty: DataType,
    pub init: Expr,
}

impl Declaration {
    /// The identifier token being declared.
    pub fn name(&self) -> Option<&Token> {
        match &self.init {
            Expr::Identifier(tok) => Some(tok),
            Expr::Assignment { target, .. } => target.as_identifier(),
            _ => None,
        }
    }
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration(Declaration),
    /// Two or more declarators sharing one type keyword, e.g. `INT a, b = 2;`
    DeclarationList(Vec<Declaration>),
    /// `XOUT(expr);`
    Print(Expr),
    /// `XIN(target);`
    Input(Expr),
    Expression(Expr),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
}
