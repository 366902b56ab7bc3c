//! Evaluation errors for template fragments

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use super::ast::Span;
use super::lexer::Token;

/// Failure while evaluating a fragment
///
/// The `Display` output is the message shown to the user unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("{message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("{name} is not defined")]
    UndefinedVariable { name: String, span: Span },

    #[error("{kind} has no member '{member}'")]
    UnknownMember {
        member: String,
        kind: &'static str,
        span: Span,
    },

    #[error("{member} is not a function")]
    NotCallable { member: String, span: Span },

    #[error("{method}() takes {expected} argument(s) but {found} were given")]
    Arity {
        method: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("'{name}' is a reserved word and cannot be used as an argument name")]
    ReservedName { name: String },

    #[error("'{name}' is not a valid argument name")]
    InvalidName { name: String },
}

impl EvalError {
    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        Self::Syntax {
            span,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    /// Location in the fragment text, when the error points at one
    pub fn span(&self) -> Option<Span> {
        match self {
            EvalError::Syntax { span, .. }
            | EvalError::UndefinedVariable { span, .. }
            | EvalError::UnknownMember { span, .. }
            | EvalError::NotCallable { span, .. }
            | EvalError::Arity { span, .. } => Some(span.clone()),
            EvalError::ReservedName { .. } | EvalError::InvalidName { .. } => None,
        }
    }

    /// Format the error with fragment context using ariadne
    ///
    /// Errors without a location fall back to the plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {}\n", self);
        };
        // ariadne counts characters, spans count bytes
        let span = char_offset(source, span.start)..char_offset(source, span.end);

        let label = match self {
            EvalError::Syntax { expected, .. } if !expected.is_empty() => {
                format!("{}\nExpected: {}", self, expected.join(", "))
            }
            _ => self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("Error: {}\n", self),
        }
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    let byte = byte.min(source.len());
    source
        .char_indices()
        .take_while(|(i, _)| *i < byte)
        .count()
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for EvalError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        EvalError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::True => "keyword 'true'".to_string(),
        Token::False => "keyword 'false'".to_string(),
        Token::Null => "keyword 'null'".to_string(),
        Token::Undefined => "keyword 'undefined'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Comma => "','".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
    }
}
