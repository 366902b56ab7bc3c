//! Expression evaluator for template fragments
//!
//! A fragment is a template string: literal markup with `${ ... }` placeholders.
//! Placeholders hold a deliberately small expression language: variable lookup,
//! string/number/keyword literals, `+`, and a handful of string members.
//!
//! # Example
//!
//! ```rust
//! use html_tmpl::expr::{evaluate, Scope};
//!
//! let mut scope = Scope::new();
//! scope.bind("name", "World").unwrap();
//!
//! let html = evaluate("<p>Hello, ${name.toUpperCase()}!</p>", &scope).unwrap();
//! assert_eq!(html, "<p>Hello, WORLD!</p>");
//! ```

pub mod ast;
mod error;
mod eval;
mod grammar;
pub mod lexer;
mod template;

pub use ast::{Expr, Span, Spanned, Value};
pub use error::EvalError;
pub use eval::{evaluate, Scope, RESERVED_WORDS};
pub use grammar::parse_expression;
pub use template::{scan, Segment};
