//! Restricted symbolic expressions for metric profile functions.
//!
//! Profile definitions arrive as text from remote sources, so this crate treats them as
//! untrusted input:
//! - only arithmetic syntax is accepted (`+ - * / ** ^`, parentheses, calls, numbers)
//! - every identifier must be declared in a [`SymbolTable`]
//! - parsing builds an [`Expr`] tree and never evaluates anything
//!
//! ```
//! use ansatz_expr::{parse, SymbolTable};
//!
//! let table = SymbolTable::spherical();
//! let profile = parse("interpolated_alcubierre(r)", &table).unwrap();
//! assert_eq!(profile.to_string(), "interpolated_alcubierre(r)");
//! assert!(parse("__import__(r)", &table).is_err());
//! ```

mod ast;
mod lexer;
mod parser;
mod symbols;

pub use ast::{BinaryOp, Expr, Number};
pub use symbols::{Binding, SymbolTable, COORDINATES, PROFILE_FUNCTIONS};

/// Maximum nesting of unary operators, parentheses, powers and call arguments.
pub const MAX_DEPTH: usize = 128;

/// Maximum accepted length of an expression, in bytes.
pub const MAX_LENGTH: usize = 4096;

/// Errors returned while parsing an expression.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExprError {
    #[error("expression is empty")]
    Empty,

    #[error("expression exceeds maximum length of {0} bytes")]
    TooLong(usize),

    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedCharacter { offset: usize, found: String },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { offset: usize, found: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown identifier {name:?} at offset {offset}")]
    UnknownIdentifier { name: String, offset: usize },

    #[error("symbol {name:?} at offset {offset} cannot be called")]
    NotCallable { name: String, offset: usize },

    #[error("function {name:?} at offset {offset} must be called with at least one argument")]
    MissingArguments { name: String, offset: usize },

    #[error("expression nesting exceeds {0} levels")]
    TooDeep(usize),
}

/// Parses `text` against `table`.
///
/// # Errors
///
/// Returns an [`ExprError`] if the text is not valid expression syntax, references an
/// identifier missing from `table`, or exceeds [`MAX_LENGTH`] / [`MAX_DEPTH`].
pub fn parse(text: &str, table: &SymbolTable) -> Result<Expr, ExprError> {
    if text.len() > MAX_LENGTH {
        return Err(ExprError::TooLong(MAX_LENGTH));
    }
    let tokens = lexer::tokenize(text)?;
    parser::Parser::new(tokens, table).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spherical(text: &str) -> Result<Expr, ExprError> {
        parse(text, &SymbolTable::spherical())
    }

    #[test]
    fn parses_profile_placeholders() {
        let expr = spherical("interpolated_alcubierre(r)").expect("parse");
        assert_eq!(
            expr,
            Expr::call("interpolated_alcubierre", vec![Expr::symbol("r")])
        );

        let expr = spherical("interpolated_natario(r, t)").expect("parse");
        assert_eq!(expr.to_string(), "interpolated_natario(r, t)");
    }

    #[test]
    fn follows_python_precedence() {
        let expr = spherical("-r**2").expect("parse");
        assert_eq!(expr, -(Expr::symbol("r").pow(Expr::number(2.0))));

        let expr = spherical("2**3**2").expect("parse");
        assert_eq!(expr.constant_value(), Some(512.0));

        let expr = spherical("1 - 2 - 3").expect("parse");
        assert_eq!(expr.constant_value(), Some(-4.0));

        let expr = spherical("r^2 / (1 + t)").expect("parse");
        assert_eq!(expr.to_string(), "r**2/(1 + t)");
    }

    #[test]
    fn numbers_keep_their_source_literal() {
        let expr = spherical("interpolated_alcubierre(r) + 1e309").expect("parse");
        assert_eq!(expr.to_string(), "interpolated_alcubierre(r) + 1e309");

        let expr = spherical(".50 * r").expect("parse");
        assert_eq!(expr.to_string(), ".50*r");
        assert_eq!(expr, Expr::number(0.5) * Expr::symbol("r"));
    }

    #[test]
    fn rejects_identifiers_outside_table() {
        for (text, name) in [
            ("f(r)", "f"),
            ("interpolated_alcubierre(x)", "x"),
            ("sin(theta)", "sin"),
            ("__import__(r)", "__import__"),
            ("r + eval", "eval"),
        ] {
            match spherical(text) {
                Err(ExprError::UnknownIdentifier { name: got, .. }) => assert_eq!(got, name),
                other => panic!("{text}: expected unknown identifier, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_misused_bindings() {
        assert!(matches!(
            spherical("r(t)"),
            Err(ExprError::NotCallable { .. })
        ));
        assert!(matches!(
            spherical("1 - interpolated_natario"),
            Err(ExprError::MissingArguments { .. })
        ));
        assert!(matches!(
            spherical("interpolated_natario()"),
            Err(ExprError::MissingArguments { .. })
        ));
    }

    #[test]
    fn rejects_malformed_syntax() {
        assert_eq!(spherical("   "), Err(ExprError::Empty));
        assert_eq!(spherical("r +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(spherical("(r"), Err(ExprError::UnexpectedEnd));
        assert!(matches!(
            spherical("r r"),
            Err(ExprError::UnexpectedToken { offset: 2, .. })
        ));
        assert!(matches!(
            spherical("r = 1"),
            Err(ExprError::UnexpectedCharacter { offset: 2, .. })
        ));
    }

    #[test]
    fn bounds_nesting_and_length() {
        let deep = format!("{}r{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(spherical(&deep), Err(ExprError::TooDeep(MAX_DEPTH)));

        let long = "r + ".repeat(MAX_LENGTH / 4) + "r";
        assert_eq!(spherical(&long), Err(ExprError::TooLong(MAX_LENGTH)));
    }
}
