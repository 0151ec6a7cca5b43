//! Expression tree for profile functions and metric entries.

use std::collections::BTreeSet;
use std::fmt;
use std::ops;

/// Binary operators, in the SymPy/Python sense (`Pow` is `**`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 4,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

const NEG_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

/// Largest magnitude at which every integer is exactly representable as `f64`.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// A numeric constant.
///
/// Numbers read by the parser keep the literal they were written as, so diagnostics and
/// `Display` show `1e309` rather than the folded `inf`. Equality compares values only.
#[derive(Debug, Clone)]
pub struct Number {
    value: f64,
    literal: Option<String>,
}

impl Number {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            literal: None,
        }
    }

    pub fn from_literal(literal: impl Into<String>, value: f64) -> Self {
        Self {
            value,
            literal: Some(literal.into()),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The source text, when the number came from parsed input.
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Zero as written, independent of rounding: `1e-400` folds to `0.0` but is not zero.
    fn is_zero(&self) -> bool {
        match &self.literal {
            Some(text) => {
                let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
                mantissa.bytes().all(|b| b == b'0' || b == b'.')
            }
            None => self.value == 0.0,
        }
    }

    fn exact_integer(&self) -> Option<i128> {
        match &self.literal {
            Some(text) if text.bytes().all(|b| b.is_ascii_digit()) => text.parse().ok(),
            Some(_) => None,
            None if self.value.fract() == 0.0 && self.value.abs() < EXACT_INTEGER_LIMIT => {
                Some(self.value as i128)
            }
            None => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Some(text) => f.write_str(text),
            None => write!(f, "{}", self.value),
        }
    }
}

/// A symbolic expression.
///
/// Trees are only ever built from parsed input or by the metric builder; nothing here
/// evaluates user-supplied code.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Number),
    /// A declared coordinate symbol such as `r` or `theta`.
    Symbol(String),
    /// Application of a declared placeholder function, e.g. `interpolated_alcubierre(r)`.
    Call {
        function: String,
        args: Vec<Expr>,
    },
    /// `sin(x)`; only produced by the metric builder, never by the parser.
    Sin(Box<Expr>),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Number(Number::new(value))
    }

    /// A number read from source text, keeping `literal` for display.
    pub fn literal(literal: impl Into<String>, value: f64) -> Self {
        Expr::Number(Number::from_literal(literal, value))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            function: function.into(),
            args,
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn sin(arg: Expr) -> Self {
        Expr::Sin(Box::new(arg))
    }

    /// `self ** exponent`.
    pub fn pow(self, exponent: Expr) -> Self {
        Expr::binary(BinaryOp::Pow, self, exponent)
    }

    /// Returns the symbol name if this expression is a bare symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Collects the names of all symbols occurring in the expression.
    pub fn free_symbols(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => {
                out.insert(name);
            }
            Expr::Call { args, .. } => args.iter().for_each(|arg| arg.collect_symbols(out)),
            Expr::Sin(inner) | Expr::Neg(inner) => inner.collect_symbols(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
        }
    }

    /// Folds the expression to a number if it contains no symbols or function calls.
    pub fn constant_value(&self) -> Option<f64> {
        match self {
            Expr::Number(number) => Some(number.value()),
            Expr::Symbol(_) | Expr::Call { .. } => None,
            Expr::Sin(inner) => inner.constant_value().map(f64::sin),
            Expr::Neg(inner) => inner.constant_value().map(|v| -v),
            Expr::Binary { op, lhs, rhs } => {
                Some(op.apply(lhs.constant_value()?, rhs.constant_value()?))
            }
        }
    }

    /// Returns the innermost sub-expression that is undefined whatever its symbols stand
    /// for: a division by an exact zero (`1/0`, `r/(2 - 2)`) or an exact zero raised to a
    /// negative power (`0**-1`).
    ///
    /// Large or complex intermediate values such as `10**400` or `(-1)**0.5` are not
    /// failures; nothing here relies on floating-point overflow.
    pub fn find_undefined(&self) -> Option<&Expr> {
        let from_children = match self {
            Expr::Number(_) | Expr::Symbol(_) => None,
            Expr::Call { args, .. } => args.iter().find_map(Expr::find_undefined),
            Expr::Sin(inner) | Expr::Neg(inner) => inner.find_undefined(),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.find_undefined().or_else(|| rhs.find_undefined())
            }
        };

        from_children.or_else(|| match self {
            Expr::Binary {
                op: BinaryOp::Div,
                rhs,
                ..
            } if rhs.is_exact_zero() => Some(self),
            Expr::Binary {
                op: BinaryOp::Pow,
                lhs,
                rhs,
            } if lhs.is_exact_zero() && rhs.constant_value().is_some_and(|e| e < 0.0) => {
                Some(self)
            }
            _ => None,
        })
    }

    /// True when the expression is zero for every value of its symbols, decided
    /// structurally or with exact integer arithmetic.
    fn is_exact_zero(&self) -> bool {
        if self.exact_integer() == Some(0) {
            return true;
        }
        match self {
            Expr::Number(number) => number.is_zero(),
            Expr::Symbol(_) | Expr::Call { .. } => false,
            Expr::Sin(inner) | Expr::Neg(inner) => inner.is_exact_zero(),
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::Add | BinaryOp::Sub => lhs.is_exact_zero() && rhs.is_exact_zero(),
                BinaryOp::Mul => lhs.is_exact_zero() || rhs.is_exact_zero(),
                BinaryOp::Div => lhs.is_exact_zero() && !rhs.is_exact_zero(),
                BinaryOp::Pow => {
                    lhs.is_exact_zero() && rhs.constant_value().is_some_and(|e| e > 0.0)
                }
            },
        }
    }

    fn exact_integer(&self) -> Option<i128> {
        match self {
            Expr::Number(number) => number.exact_integer(),
            Expr::Neg(inner) => inner.exact_integer()?.checked_neg(),
            Expr::Binary { op, lhs, rhs } => {
                let (a, b) = (lhs.exact_integer()?, rhs.exact_integer()?);
                match op {
                    BinaryOp::Add => a.checked_add(b),
                    BinaryOp::Sub => a.checked_sub(b),
                    BinaryOp::Mul => a.checked_mul(b),
                    BinaryOp::Pow => a.checked_pow(u32::try_from(b).ok()?),
                    BinaryOp::Div => None,
                }
            }
            Expr::Symbol(_) | Expr::Call { .. } | Expr::Sin(_) => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(number) if number.value().is_sign_negative() => NEG_PRECEDENCE,
            Expr::Number(_) | Expr::Symbol(_) | Expr::Call { .. } | Expr::Sin(_) => {
                ATOM_PRECEDENCE
            }
            Expr::Neg(_) => NEG_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(number) => write!(f, "{}", number),
            Expr::Symbol(name) => f.write_str(name),
            Expr::Call { function, args } => {
                write!(f, "{}(", function)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expr::Sin(inner) => write!(f, "sin({})", inner),
            Expr::Neg(inner) => {
                f.write_str("-")?;
                write_operand(f, inner, inner.precedence() < NEG_PRECEDENCE)
            }
            Expr::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                let (lhs_parens, rhs_parens) = match op {
                    // Right associative: (a**b)**c needs parentheses, a**(b**c) does not.
                    BinaryOp::Pow => (lhs.precedence() <= prec, rhs.precedence() < prec),
                    BinaryOp::Sub | BinaryOp::Div => {
                        (lhs.precedence() < prec, rhs.precedence() <= prec)
                    }
                    BinaryOp::Add | BinaryOp::Mul => {
                        (lhs.precedence() < prec, rhs.precedence() < prec)
                    }
                };
                write_operand(f, lhs, lhs_parens)?;
                f.write_str(op.symbol())?;
                write_operand(f, rhs, rhs_parens)
            }
        }
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl ops::$trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, self, rhs)
            }
        }
    };
}

binary_operator!(Add, add, BinaryOp::Add);
binary_operator!(Sub, sub, BinaryOp::Sub);
binary_operator!(Mul, mul, BinaryOp::Mul);
binary_operator!(Div, div, BinaryOp::Div);

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r() -> Expr {
        Expr::symbol("r")
    }

    #[test]
    fn display_uses_minimal_parentheses() {
        let expr = Expr::number(1.0) - Expr::call("interpolated_alcubierre", vec![r()]);
        assert_eq!(expr.to_string(), "1 - interpolated_alcubierre(r)");

        let expr = r().pow(Expr::number(2.0)) * Expr::sin(Expr::symbol("theta")).pow(Expr::number(2.0));
        assert_eq!(expr.to_string(), "r**2*sin(theta)**2");

        let expr = r() - (r() - Expr::number(1.0));
        assert_eq!(expr.to_string(), "r - (r - 1)");

        let expr = (-r()).pow(Expr::number(2.0));
        assert_eq!(expr.to_string(), "(-r)**2");

        let expr = r().pow(-Expr::number(1.0));
        assert_eq!(expr.to_string(), "r**(-1)");
    }

    #[test]
    fn free_symbols_walks_calls() {
        let expr = Expr::call("interpolated_natario", vec![r(), Expr::symbol("t")]) + r();
        let symbols: Vec<&str> = expr.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["r", "t"]);
    }

    #[test]
    fn constant_value_folds_only_symbol_free_trees() {
        let expr = (Expr::number(2.0) + Expr::number(3.0)) * Expr::number(4.0);
        assert_eq!(expr.constant_value(), Some(20.0));
        assert_eq!((r() + Expr::number(1.0)).constant_value(), None);
    }

    #[test]
    fn find_undefined_reports_innermost_division_by_zero() {
        let bad = Expr::literal("1", 1.0) / Expr::literal("0", 0.0);
        let expr = r() * (bad.clone() + Expr::number(2.0));
        assert_eq!(expr.find_undefined(), Some(&bad));
        assert_eq!(r().find_undefined(), None);

        let cancelled = r() / (Expr::number(2.0) - Expr::number(2.0));
        assert_eq!(cancelled.find_undefined(), Some(&cancelled));

        let zero_to_negative = Expr::number(0.0).pow(-Expr::number(1.0));
        assert_eq!(zero_to_negative.find_undefined(), Some(&zero_to_negative));
    }

    #[test]
    fn find_undefined_ignores_overflow_and_complex_powers() {
        let huge = Expr::literal("10", 10.0).pow(Expr::literal("400", 400.0));
        assert_eq!(huge.constant_value(), Some(f64::INFINITY));
        assert_eq!(huge.find_undefined(), None);

        let imaginary = (-Expr::number(1.0)).pow(Expr::literal("0.5", 0.5));
        assert_eq!(imaginary.find_undefined(), None);

        // 1e-400 underflows to 0.0 but is not zero.
        let tiny = r() / Expr::literal("1e-400", 0.0);
        assert_eq!(tiny.find_undefined(), None);

        // (1/3)*3 rounds to exactly 1.0; only integer arithmetic may prove a zero.
        let third = Expr::number(1.0) / Expr::number(3.0) * Expr::number(3.0);
        assert_eq!((r() / (Expr::number(1.0) - third)).find_undefined(), None);
    }

    #[test]
    fn literal_numbers_display_as_written() {
        assert_eq!(Expr::literal("1e309", f64::INFINITY).to_string(), "1e309");
        assert_eq!(Expr::literal("2.50", 2.5).to_string(), "2.50");
        assert_eq!(Expr::literal("2.50", 2.5), Expr::number(2.5));
        assert_eq!(Expr::number(2.5).to_string(), "2.5");
    }
}
