//! Tokenizer for profile expressions, built with logos.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::ExprError;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum Token<'src> {
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Number(&'src str),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Ident(&'src str),

    #[token("**")]
    DoubleStar,
    // Accepted as a power operator, the same way `x^2` is read as `x**2`.
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(literal) => write!(f, "number {}", literal),
            Token::Ident(name) => write!(f, "identifier {:?}", name),
            Token::DoubleStar => f.write_str("'**'"),
            Token::Caret => f.write_str("'^'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
        }
    }
}

pub(crate) type Spanned<'src> = (Token<'src>, Range<usize>);

/// Splits `source` into tokens, failing on the first character outside the grammar.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, ExprError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(ExprError::UnexpectedCharacter {
                    offset: lexer.span().start,
                    found: lexer.slice().to_owned(),
                })
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        tokenize(source)
            .expect("tokenize")
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn tokenizes_profile_call() {
        assert_eq!(
            kinds("interpolated_alcubierre(r)"),
            vec![
                Token::Ident("interpolated_alcubierre"),
                Token::LParen,
                Token::Ident("r"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn double_star_is_one_token() {
        assert_eq!(
            kinds("r**2 * 3"),
            vec![
                Token::Ident("r"),
                Token::DoubleStar,
                Token::Number("2"),
                Token::Star,
                Token::Number("3"),
            ]
        );
    }

    #[test]
    fn number_forms() {
        assert_eq!(
            kinds("1 2.5 .5 1e-3"),
            vec![
                Token::Number("1"),
                Token::Number("2.5"),
                Token::Number(".5"),
                Token::Number("1e-3"),
            ]
        );
    }

    #[test]
    fn rejects_characters_outside_grammar() {
        for (source, offset) in [("r; import os", 1), ("θ + r", 0), ("r[0]", 1), ("'r'", 0)] {
            let err = tokenize(source).expect_err("expected lexer error");
            match err {
                ExprError::UnexpectedCharacter { offset: got, .. } => {
                    assert_eq!(got, offset, "{source}")
                }
                other => panic!("unexpected error for {source}: {other:?}"),
            }
        }
    }
}
