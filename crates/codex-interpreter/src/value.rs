//! Value types for the CodeX interpreter.

use std::fmt;

use codex_syntax::token::Literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 32-bit signed integer value
    Int(i32),
    /// A 32-bit floating point value
    Float(f32),
    /// A boolean value (true or false)
    Bool(bool),
    /// A single character
    Char(char),
    /// A string value
    Str(String),
    /// No value: an unset variable or an unresolved operation
    Null,
}

impl Value {
    /// `Null` is false, booleans are themselves, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "INT",
            Value::Float(_) => "FP",
            Value::Bool(_) => "BOOL",
            Value::Char(_) => "CHAR",
            Value::Str(_) => "STR",
            Value::Null => "NULL",
        }
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Int(n) => Value::Int(n),
            Literal::Float(x) => Value::Float(x),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Char(c) => Value::Char(c),
            Literal::Str(s) => Value::Str(s),
        }
    }
}

/// Renders a float the way the language always has: decimal notation for
/// moderate magnitudes with a redundant trailing zero dropped (`3.0` is `3.`),
/// `1.0E10` style outside that range.
fn format_float(x: f32) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = x.abs();
    let text = if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        format!("{:?}", x)
    } else {
        let sci = format!("{:E}", x);
        match sci.split_once('E') {
            Some((mantissa, exp)) if !mantissa.contains('.') => format!("{}.0E{}", mantissa, exp),
            _ => sci,
        }
    };
    match text.strip_suffix(".0") {
        Some(head) => format!("{}.", head),
        None => text,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::Null => write!(f, "NULL"),
        }
    }
}
