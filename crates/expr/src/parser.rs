//! Recursive-descent parser with Python operator precedence.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('**' | '^') unary)?
//! primary := number | ident | ident '(' expr (',' expr)* ')' | '(' expr ')'
//! ```

use crate::ast::{BinaryOp, Expr};
use crate::lexer::{Spanned, Token};
use crate::symbols::{Binding, SymbolTable};
use crate::{ExprError, MAX_DEPTH};

pub(crate) struct Parser<'src, 'tbl> {
    tokens: Vec<Spanned<'src>>,
    pos: usize,
    depth: usize,
    table: &'tbl SymbolTable,
}

impl<'src, 'tbl> Parser<'src, 'tbl> {
    pub(crate) fn new(tokens: Vec<Spanned<'src>>, table: &'tbl SymbolTable) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            table,
        }
    }

    /// Parses the whole token stream as one expression.
    pub(crate) fn parse(mut self) -> Result<Expr, ExprError> {
        if self.tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let expr = self.expr()?;
        match self.tokens.get(self.pos) {
            None => Ok(expr),
            Some((token, span)) => Err(ExprError::UnexpectedToken {
                offset: span.start,
                found: token.to_string(),
            }),
        }
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn bump(&mut self) -> Option<Spanned<'src>> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn expect(&mut self, expected: Token<'src>) -> Result<(), ExprError> {
        match self.bump() {
            Some((token, _)) if token == expected => Ok(()),
            Some((token, span)) => Err(ExprError::UnexpectedToken {
                offset: span.start,
                found: token.to_string(),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    // Every recursive path passes through here, so this is where nesting is bounded.
    fn unary(&mut self) -> Result<Expr, ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep(MAX_DEPTH));
        }

        let result = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.unary().map(|inner| -inner)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        };

        self.depth -= 1;
        result
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.primary()?;
        match self.peek() {
            Some(Token::DoubleStar | Token::Caret) => {
                self.pos += 1;
                let exponent = self.unary()?;
                Ok(base.pow(exponent))
            }
            _ => Ok(base),
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let (token, span) = self.bump().ok_or(ExprError::UnexpectedEnd)?;
        match token {
            Token::Number(literal) => match literal.parse::<f64>() {
                Ok(value) => Ok(Expr::literal(literal, value)),
                Err(_) => Err(ExprError::UnexpectedToken {
                    offset: span.start,
                    found: token.to_string(),
                }),
            },
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => {
                let called = self.peek() == Some(Token::LParen);
                match (self.table.lookup(name), called) {
                    (None, _) => Err(ExprError::UnknownIdentifier {
                        name: name.to_owned(),
                        offset: span.start,
                    }),
                    (Some(Binding::Symbol), false) => Ok(Expr::symbol(name)),
                    (Some(Binding::Symbol), true) => Err(ExprError::NotCallable {
                        name: name.to_owned(),
                        offset: span.start,
                    }),
                    (Some(Binding::Function), false) => Err(ExprError::MissingArguments {
                        name: name.to_owned(),
                        offset: span.start,
                    }),
                    (Some(Binding::Function), true) => {
                        self.pos += 1;
                        let args = self.arguments(name, span.start)?;
                        Ok(Expr::call(name, args))
                    }
                }
            }
            other => Err(ExprError::UnexpectedToken {
                offset: span.start,
                found: other.to_string(),
            }),
        }
    }

    fn arguments(&mut self, name: &str, offset: usize) -> Result<Vec<Expr>, ExprError> {
        if self.peek() == Some(Token::RParen) {
            return Err(ExprError::MissingArguments {
                name: name.to_owned(),
                offset,
            });
        }

        let mut args = vec![self.expr()?];
        loop {
            match self.bump() {
                Some((Token::Comma, _)) => args.push(self.expr()?),
                Some((Token::RParen, _)) => return Ok(args),
                Some((token, span)) => {
                    return Err(ExprError::UnexpectedToken {
                        offset: span.start,
                        found: token.to_string(),
                    })
                }
                None => {
                    return Err(ExprError::UnexpectedEnd);
                }
            }
        }
    }
}
