//! Placeholder expression parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::{Expr, Spanned, Value};
use super::error::EvalError;
use super::lexer::{lex, Token};

/// Parse the source of one `${ ... }` placeholder
///
/// `offset` is the byte position of `input` within the fragment, so spans in the
/// result and in errors point into the fragment text.
pub fn parse_expression(input: &str, offset: usize) -> Result<Spanned<Expr>, EvalError> {
    let tokens = lex(input, offset)
        .map_err(|span| EvalError::syntax(span, "Invalid or unexpected token"))?;
    let eoi = offset + input.len();

    let token_stream = Stream::from_iter(tokens.into_iter().map(|(tok, span)| (tok, span.into())))
        // Split (Token, SimpleSpan) into token and span parts
        .map((eoi..eoi).into(), |(t, s): (_, _)| (t, s));

    expression_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => err.into(),
            None => EvalError::syntax(offset..eoi, "Invalid expression"),
        })
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn expression_parser<'a, I>() -> impl Parser<'a, I, Spanned<Expr>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|expr| {
        let identifier = select! {
            Token::Ident(s) => s,
        }
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

        let literal = select! {
            Token::String(s) => Value::Str(s),
            Token::Number(n) => Value::Num(n),
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Null => Value::Null,
            Token::Undefined => Value::Undefined,
        }
        .map_with(|v, e| Spanned::new(Expr::Literal(v), span_range(&e.span())));

        let variable = identifier
            .clone()
            .map(|id| Spanned::new(Expr::Variable(id.node), id.span));

        let atom = choice((
            literal,
            variable,
            expr.clone()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        ));

        // Call arguments keep the span of the closing paren so the call's span covers it
        let call_args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
            .map_with(|args, e| (args, span_range(&e.span())));

        let member = just(Token::Dot)
            .ignore_then(identifier)
            .then(call_args.or_not());

        let postfix = atom.foldl(member.repeated(), |object, (name, call)| match call {
            Some((args, call_span)) => {
                let span = object.span.start..call_span.end;
                Spanned::new(
                    Expr::Call {
                        object: Box::new(object),
                        method: name,
                        args,
                    },
                    span,
                )
            }
            None => {
                let span = object.span.start..name.span.end;
                Spanned::new(
                    Expr::Member {
                        object: Box::new(object),
                        member: name,
                    },
                    span,
                )
            }
        });

        postfix
            .clone()
            .foldl(
                just(Token::Plus).ignore_then(postfix).repeated(),
                |lhs, rhs| {
                    let span = lhs.span.start..rhs.span.end;
                    Spanned::new(Expr::Add(Box::new(lhs), Box::new(rhs)), span)
                },
            )
            .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression("name", 2).expect("Should parse");
        assert_eq!(expr.node, Expr::Variable("name".to_string()));
        assert_eq!(expr.span, 2..6);
    }

    #[test]
    fn test_parse_member_chain() {
        let expr = parse_expression("title.trim().length", 0).expect("Should parse");
        match expr.node {
            Expr::Member { object, member } => {
                assert_eq!(member.node, "length");
                assert!(matches!(object.node, Expr::Call { ref method, .. } if method.node == "trim"));
            }
            other => panic!("Expected member access, got {:?}", other),
        }
        assert_eq!(expr.span, 0..19);
    }

    #[test]
    fn test_parse_concatenation_is_left_associative() {
        let expr = parse_expression("a + 'b' + c", 0).expect("Should parse");
        match expr.node {
            Expr::Add(lhs, rhs) => {
                assert!(matches!(lhs.node, Expr::Add(_, _)));
                assert_eq!(rhs.node, Expr::Variable("c".to_string()));
            }
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_parenthesized() {
        let expr = parse_expression("(a + b).toUpperCase()", 0).expect("Should parse");
        assert!(matches!(expr.node, Expr::Call { .. }));
    }

    #[test]
    fn test_empty_placeholder_is_syntax_error() {
        let err = parse_expression("", 5).unwrap_err();
        assert!(matches!(err, EvalError::Syntax { .. }));
        assert_eq!(err.to_string(), "Unexpected end of input");
    }

    #[test]
    fn test_trailing_operator_is_syntax_error() {
        let err = parse_expression("a +", 0).unwrap_err();
        assert!(matches!(err, EvalError::Syntax { .. }));
    }

    #[test]
    fn test_unknown_character_is_syntax_error() {
        let err = parse_expression("a; b", 0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid or unexpected token");
        assert_eq!(err.span(), Some(1..2));
    }
}
