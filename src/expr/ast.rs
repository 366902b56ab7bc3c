//! Syntax tree and runtime values for placeholder expressions

use std::fmt;

/// Byte range in fragment text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A placeholder expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `"text"`, `42`, `true`, `null`, ...
    Literal(Value),
    /// Reference to a bound argument
    Variable(String),
    /// `object.member`
    Member {
        object: Box<Spanned<Expr>>,
        member: Spanned<String>,
    },
    /// `object.method(args)`
    Call {
        object: Box<Spanned<Expr>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    /// `lhs + rhs`
    Add(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
}

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Undefined,
}

impl Value {
    /// Name of the value's type, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Num(n) => {
                if *n == 0.0 {
                    // -0 renders as 0
                    f.write_str("0")
                } else if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else if n.is_nan() {
                    f.write_str("NaN")
                } else if n.is_infinite() {
                    f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
        }
    }
}
