//! Splits fragment text into literal runs and `${ ... }` placeholders

use logos::{Lexer, Logos};

use super::error::EvalError;

/// A piece of a scanned fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text with escapes already resolved
    Text(String),
    /// Placeholder expression source; `offset` is where it starts in the fragment
    Placeholder { source: String, offset: usize },
}

/// Tokens of literal fragment text
#[derive(Logos, Debug, Clone, PartialEq)]
enum TextToken {
    #[token("${")]
    PlaceholderOpen,

    #[regex(r"\\[^\n]", |lex| unescape_char(lex.slice()))]
    Escaped(char),

    // line continuation
    #[token("\\\n")]
    Continuation,

    // a trailing backslash stays literal
    #[token("\\")]
    Backslash,

    #[token("$")]
    Dollar,

    #[regex(r"[^\\$]+")]
    Run,
}

/// Tokens inside a placeholder, only as fine as brace matching needs
#[derive(Logos, Debug, Clone, PartialEq)]
enum PlaceholderToken {
    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[regex(r#""([^"\\]|\\[\s\S])*""#)]
    #[regex(r#"'([^'\\]|\\[\s\S])*'"#)]
    Quoted,

    #[regex(r#"["']"#)]
    StrayQuote,

    #[regex(r#"[^{}"']+"#)]
    Other,
}

fn unescape_char(slice: &str) -> Option<char> {
    slice[1..].chars().next().map(|c| match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    })
}

/// Scan fragment text into segments
///
/// A fragment wrapped in one outer pair of backticks (ignoring surrounding
/// whitespace) is treated as an explicit template literal and unwrapped first.
pub fn scan(fragment: &str) -> Result<Vec<Segment>, EvalError> {
    let (body, base) = unwrap_backticks(fragment);

    let mut segments = Vec::new();
    let mut text = String::new();
    let mut lex = TextToken::lexer(body);

    while let Some(token) = lex.next() {
        match token {
            Ok(TextToken::Escaped(c)) => text.push(c),
            Ok(TextToken::Continuation) => {}
            Ok(TextToken::PlaceholderOpen) => {
                let open = lex.span().start;
                let start = lex.span().end;
                let mut inner = lex.morph::<PlaceholderToken>();
                let close = closing_brace(&mut inner).ok_or_else(|| {
                    EvalError::syntax(base + open..base + body.len(), "Unterminated placeholder")
                })?;

                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Placeholder {
                    source: body[start..close].to_string(),
                    offset: base + start,
                });
                lex = inner.morph();
            }
            Ok(TextToken::Backslash | TextToken::Dollar | TextToken::Run) | Err(()) => {
                text.push_str(lex.slice())
            }
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

/// Advance past the `}` that closes the current placeholder, returning its byte position
///
/// Nested braces are counted and quoted strings are skipped.
fn closing_brace(lex: &mut Lexer<PlaceholderToken>) -> Option<usize> {
    let mut depth = 0usize;
    while let Some(token) = lex.next() {
        match token {
            Ok(PlaceholderToken::BraceOpen) => depth += 1,
            Ok(PlaceholderToken::BraceClose) if depth == 0 => return Some(lex.span().start),
            Ok(PlaceholderToken::BraceClose) => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Returns the inner text and its byte offset when the fragment is backtick-wrapped
fn unwrap_backticks(fragment: &str) -> (&str, usize) {
    let trimmed = fragment.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
        let start = fragment.len() - fragment.trim_start().len() + 1;
        (&trimmed[1..trimmed.len() - 1], start)
    } else {
        (fragment, 0)
    }
}
