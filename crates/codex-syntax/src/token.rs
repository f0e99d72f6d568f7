//! Token definitions for the CodeX language.
//!
//! Tokens are the smallest meaningful units of CodeX source code. The lexer
//! produces them once and the parser consumes them read-only.
//!
//! # Token Categories
//!
//! - **Operators**: arithmetic (`+ - * / % ^`), assignment (`=`), relational
//!   (`> >= < <=`), equality (`== ~=`) and logical (`& | ~`)
//! - **Separators**: `( ) { } ; ,`
//! - **Keywords**: `XOUT`, `XIN`, `IF`, `ELSE`, `WHILE` and the type keywords
//!   `INT`, `FP`, `CHAR`, `BOOL`, `STR`
//! - **Literals**: integer, float, boolean, string and character constants
//! - **Special**: identifiers and the end-of-file marker
//!
//! # Examples
//!
//! ```rust
//! use codex_syntax::{Literal, Token, TokenKind};
//!
//! let five = Token::new(TokenKind::ConstInt, "5", Some(Literal::Int(5)), 1);
//! assert_eq!(five.kind.to_string(), "CONST_INT");
//! assert_eq!(five.literal, Some(Literal::Int(5)));
//! ```

use std::fmt;

/// Token types that can be produced by the CodeX lexer.
///
/// Unlike identifiers and literals in some languages, the kind carries no
/// payload: the source text lives in [`Token::lexeme`] and the parsed value of
/// a constant in [`Token::literal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Arithmetic ===
    /// Addition operator `+`
    Plus,
    /// Subtraction operator `-`
    Minus,
    /// Multiplication operator `*`
    Star,
    /// Division operator `/`
    Slash,
    /// Remainder operator `%`
    Percent,
    /// Exponent operator `^` (recognized, but no grammar rule uses it)
    Caret,
    /// Assignment operator `=`
    Equal,

    // === Relational ===
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `==`
    EqualTo,
    /// `~=`
    NotEqualTo,

    // === Logical ===
    /// Logical AND `&`
    And,
    /// Logical OR `|`
    Or,
    /// Logical NOT `~`
    Not,

    // === Separators ===
    /// Left parenthesis `(`
    LParen,
    /// Right parenthesis `)`
    RParen,
    /// Left brace `{`
    LBrace,
    /// Right brace `}`
    RBrace,
    /// Statement terminator `;`
    Semi,
    /// Declarator separator `,`
    Comma,

    // === Keywords ===
    /// `XOUT` - print statement
    Xout,
    /// `XIN` - read statement
    Xin,
    /// `IF`
    If,
    /// `ELSE`
    Else,
    /// `WHILE`
    While,
    /// `INT` type keyword
    Int,
    /// `FP` type keyword (32-bit float)
    Fp,
    /// `CHAR` type keyword
    Char,
    /// `BOOL` type keyword
    Bool,
    /// `STR` type keyword
    Str,

    // === Literals ===
    /// Integer constant, e.g. `42`
    ConstInt,
    /// Floating constant, e.g. `3.5`
    ConstFloat,
    /// `true` or `false`
    ConstBool,
    /// String constant, e.g. `"hello"`
    ConstStr,
    /// Character constant, e.g. `'a'`
    ConstChar,
    /// Identifier (variable name)
    Ident,

    /// End-of-file marker, always the last token
    Eof,
}

impl TokenKind {
    /// Returns the keyword kind for `word`, if it is reserved.
    ///
    /// Keywords are case-sensitive: `IF` is a keyword, `if` is an identifier.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "XOUT" => TokenKind::Xout,
            "XIN" => TokenKind::Xin,
            "IF" => TokenKind::If,
            "ELSE" => TokenKind::Else,
            "WHILE" => TokenKind::While,
            "INT" => TokenKind::Int,
            "FP" => TokenKind::Fp,
            "CHAR" => TokenKind::Char,
            "BOOL" => TokenKind::Bool,
            "STR" => TokenKind::Str,
            _ => return None,
        };
        Some(kind)
    }

    /// True for the five type keywords that open a declaration.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Fp | TokenKind::Char | TokenKind::Bool | TokenKind::Str
        )
    }

    /// True for the constant kinds accepted as a primary expression.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::ConstInt
                | TokenKind::ConstFloat
                | TokenKind::ConstBool
                | TokenKind::ConstStr
                | TokenKind::ConstChar
        )
    }

    /// Upper-case name used in token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MULTI",
            TokenKind::Slash => "DIV",
            TokenKind::Percent => "MOD",
            TokenKind::Caret => "EXP",
            TokenKind::Equal => "EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEq => "GREATEREQ",
            TokenKind::Less => "LESS",
            TokenKind::LessEq => "LESSEQ",
            TokenKind::EqualTo => "EQUALTO",
            TokenKind::NotEqualTo => "NEQUALTO",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Semi => "SEMI",
            TokenKind::Comma => "COMMA",
            TokenKind::Xout => "XOUT",
            TokenKind::Xin => "XIN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Int => "INT",
            TokenKind::Fp => "FP",
            TokenKind::Char => "CHAR",
            TokenKind::Bool => "BOOL",
            TokenKind::Str => "STR",
            TokenKind::ConstInt => "CONST_INT",
            TokenKind::ConstFloat => "CONST_FLOAT",
            TokenKind::ConstBool => "CONST_BOOL",
            TokenKind::ConstStr => "CONST_STR",
            TokenKind::ConstChar => "CONST_CHAR",
            TokenKind::Ident => "IDENT",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The parsed value of a constant token.
///
/// Integers are 32-bit signed and floats are 32-bit, matching the runtime
/// value model.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Float(f32),
    Bool(bool),
    Char(char),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Char(c) => write!(f, "'{}'", c),
            Literal::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// A token with its source text and line.
///
/// # Fields
///
/// - `kind`: the syntactic category
/// - `lexeme`: the text the token was scanned from (empty for `Eof`)
/// - `literal`: the parsed value, present only for constant kinds
/// - `line`: 1-based line the token starts on
///
/// # Usage in Error Reporting
///
/// Diagnostics cite the token's line and lexeme:
///
/// ```text
/// [line 3] Error at ')': Expected expression
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type of this token
    pub kind: TokenKind,

    /// Source text of the token
    pub lexeme: String,

    /// Parsed constant value, if any
    pub literal: Option<Literal>,

    /// Line number in the source file (1-based)
    pub line: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        literal: Option<Literal>,
        line: usize,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    /// The end-of-file marker at `line`.
    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", None, line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.literal) {
            (TokenKind::Eof, _) => write!(f, "EOF"),
            (kind, Some(lit)) => write!(f, "{}({})", kind, lit),
            (TokenKind::Ident, None) => write!(f, "IDENT({})", self.lexeme),
            (kind, None) => write!(f, "{}", kind),
        }
    }
}
