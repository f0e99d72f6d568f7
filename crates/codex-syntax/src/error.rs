//! Error handling types and utilities for the CodeX toolchain.
//!
//! Every phase reports faults through the same [`Error`] type so the front
//! end can print them uniformly. The rendered form is fixed, since editors
//! and graders parse it:
//!
//! ```text
//! [line {n}] Error{where}: {message}
//! ```
//!
//! where `{where}` is ` at end` for a fault at end of input, ` at '{lexeme}'`
//! for a fault located at a token, and empty otherwise.
//!
//! # Examples
//!
//! ## Basic error creation
//!
//! ```rust
//! use codex_syntax::error::{Error, ErrorKind, Result, error};
//!
//! let located = Error::lexical(3, "1.2.3", "Invalid numerical constant");
//! assert_eq!(located.to_string(), "[line 3] Error at '1.2.3': Invalid numerical constant");
//!
//! fn might_fail() -> Result<i32> {
//!     error("Operation failed")
//! }
//! assert_eq!(might_fail().unwrap_err().kind, ErrorKind::Runtime);
//! ```
//!
//! ## Errors at a token
//!
//! ```rust
//! use codex_syntax::{Error, ErrorKind, Token, TokenKind};
//!
//! let eof = Token::eof(7);
//! let err = Error::at_token(ErrorKind::Syntax, &eof, "Expected ';'");
//! assert_eq!(err.to_string(), "[line 7] Error at end: Expected ';'");
//! ```

use std::fmt;

use crate::token::{Token, TokenKind};

/// The phase that produced a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unterminated comment or literal, invalid number or identifier.
    /// Aborts tokenization.
    Lexical,
    /// Unexpected or missing token. Recovered from by the parser.
    Syntax,
    /// Undefined variable, type mismatch, division by zero and friends.
    /// Aborts the current top-level statement.
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "Lex error"),
            ErrorKind::Syntax => write!(f, "Parse error"),
            ErrorKind::Runtime => write!(f, "Runtime error"),
        }
    }
}

/// Where in the source a fault sits, as rendered after `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Nothing more precise than the line (or nothing at all).
    Unknown,
    /// The fault was found at the end of input.
    AtEnd,
    /// The fault was found at this lexeme.
    At(String),
}

/// An error that occurred while processing CodeX source.
///
/// # Fields
///
/// - `kind`: which phase raised it
/// - `msg`: human-readable description
/// - `line`: optional 1-based source line
/// - `location`: what to cite after `Error` in the rendered diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Phase that raised the error
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Lexeme or end-of-input marker to cite
    pub location: Location,
}

impl Error {
    /// Creates a runtime error without location information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use codex_syntax::Error;
    ///
    /// let error = Error::new("Undefined variable 'x'");
    /// assert_eq!(error.to_string(), "Error: Undefined variable 'x'");
    /// ```
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            msg: msg.into(),
            line: None,
            location: Location::Unknown,
        }
    }

    /// Creates a lexical error on `line`, citing `lexeme` unless it is empty.
    pub fn lexical(line: usize, lexeme: impl Into<String>, msg: impl Into<String>) -> Self {
        let lexeme = lexeme.into();
        Self {
            kind: ErrorKind::Lexical,
            msg: msg.into(),
            line: Some(line),
            location: if lexeme.is_empty() {
                Location::Unknown
            } else {
                Location::At(lexeme)
            },
        }
    }

    /// Creates an error located at `token`.
    ///
    /// The end-of-file token renders as ` at end`; any other token renders
    /// its lexeme.
    pub fn at_token(kind: ErrorKind, token: &Token, msg: impl Into<String>) -> Self {
        let location = if token.kind == TokenKind::Eof {
            Location::AtEnd
        } else {
            Location::At(token.lexeme.clone())
        };
        Self {
            kind,
            msg: msg.into(),
            line: Some(token.line),
            location,
        }
    }

    /// Shorthand for a syntax error at `token`.
    pub fn syntax(token: &Token, msg: impl Into<String>) -> Self {
        Self::at_token(ErrorKind::Syntax, token, msg)
    }

    /// Shorthand for a runtime error at `token`.
    pub fn runtime_at(token: &Token, msg: impl Into<String>) -> Self {
        Self::at_token(ErrorKind::Runtime, token, msg)
    }

    /// Attaches `token`'s position unless the error already has one.
    pub fn or_at(mut self, token: &Token) -> Self {
        if self.line.is_none() {
            let located = Self::at_token(self.kind, token, "");
            self.line = located.line;
            self.location = located.location;
        }
        self
    }

    /// Fills in the line if the error does not have one yet.
    pub fn or_line(mut self, line: Option<usize>) -> Self {
        if self.line.is_none() {
            self.line = line;
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "[line {}] ", line)?;
        }
        write!(f, "Error")?;
        match &self.location {
            Location::Unknown => {}
            Location::AtEnd => write!(f, " at end")?,
            Location::At(lexeme) => write!(f, " at '{}'", lexeme)?,
        }
        write!(f, ": {}", self.msg)
    }
}

impl std::error::Error for Error {}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}

/// A specialized `Result` type for CodeX operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create a runtime error result.
///
/// Shorthand for `Err(Error::new(msg))`.
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}

/// Convenience function to create a runtime error result located at `token`.
pub fn error_at<T>(token: &Token, msg: impl Into<String>) -> Result<T> {
    Err(Error::runtime_at(token, msg))
}
