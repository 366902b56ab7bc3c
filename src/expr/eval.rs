//! Evaluates fragment text against a scope of argument bindings

use std::collections::HashMap;

use super::ast::{Expr, Spanned, Value};
use super::error::EvalError;
use super::grammar::parse_expression;
use super::template::{scan, Segment};

/// Keywords of the expression language; they cannot be bound as argument names
pub const RESERVED_WORDS: &[&str] = &["true", "false", "null", "undefined"];

/// Named string bindings visible to a single fragment evaluation
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, String>,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable, replacing any earlier binding of the same name
    pub fn bind(&mut self, name: &str, value: impl Into<String>) -> Result<(), EvalError> {
        if RESERVED_WORDS.contains(&name) {
            return Err(EvalError::ReservedName {
                name: name.to_string(),
            });
        }
        if !is_identifier(name) {
            return Err(EvalError::InvalidName {
                name: name.to_string(),
            });
        }
        self.bindings.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Look up a bound variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Evaluate fragment text, substituting every placeholder
pub fn evaluate(fragment: &str, scope: &Scope) -> Result<String, EvalError> {
    let mut out = String::with_capacity(fragment.len());
    for segment in scan(fragment)? {
        match segment {
            Segment::Text(text) => out.push_str(&text),
            Segment::Placeholder { source, offset } => {
                let expr = parse_expression(&source, offset)?;
                let value = eval_expr(&expr, scope)?;
                out.push_str(&value.to_string());
            }
        }
    }
    Ok(out)
}

fn eval_expr(expr: &Spanned<Expr>, scope: &Scope) -> Result<Value, EvalError> {
    match &expr.node {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Variable(name) => scope
            .get(name)
            .map(|v| Value::Str(v.to_string()))
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: name.clone(),
                span: expr.span.clone(),
            }),
        Expr::Member { object, member } => {
            let value = eval_expr(object, scope)?;
            match (&value, member.node.as_str()) {
                (Value::Str(s), "length") => Ok(Value::Num(s.encode_utf16().count() as f64)),
                _ => Err(EvalError::UnknownMember {
                    member: member.node.clone(),
                    kind: value.kind(),
                    span: member.span.clone(),
                }),
            }
        }
        Expr::Call {
            object,
            method,
            args,
        } => {
            let value = eval_expr(object, scope)?;
            // Arguments are evaluated even though no supported method takes any
            for arg in args {
                eval_expr(arg, scope)?;
            }
            call_method(value, method, args.len(), expr)
        }
        Expr::Add(lhs, rhs) => {
            let lhs = eval_expr(lhs, scope)?;
            let rhs = eval_expr(rhs, scope)?;
            Ok(match (lhs, rhs) {
                (Value::Num(a), Value::Num(b)) => Value::Num(a + b),
                (a, b) => Value::Str(format!("{}{}", a, b)),
            })
        }
    }
}

fn call_method(
    value: Value,
    method: &Spanned<String>,
    arg_count: usize,
    call: &Spanned<Expr>,
) -> Result<Value, EvalError> {
    let s = match value {
        Value::Str(s) => s,
        other => {
            return Err(EvalError::UnknownMember {
                member: method.node.clone(),
                kind: other.kind(),
                span: method.span.clone(),
            })
        }
    };

    let apply: fn(&str) -> String = match method.node.as_str() {
        "trim" => |s: &str| s.trim().to_string(),
        "toUpperCase" => |s: &str| s.to_uppercase(),
        "toLowerCase" => |s: &str| s.to_lowercase(),
        "length" => {
            return Err(EvalError::NotCallable {
                member: method.node.clone(),
                span: call.span.clone(),
            })
        }
        _ => {
            return Err(EvalError::UnknownMember {
                member: method.node.clone(),
                kind: "string",
                span: method.span.clone(),
            })
        }
    };

    if arg_count != 0 {
        return Err(EvalError::Arity {
            method: method.node.clone(),
            expected: 0,
            found: arg_count,
            span: call.span.clone(),
        });
    }
    Ok(Value::Str(apply(&s)))
}
