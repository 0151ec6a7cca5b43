//! Metric builder for the spherically-symmetric ansatz.
//!
//! Coordinates are ordered `(t, r, theta, phi)` and the signature is `(-, +, +, +)`:
//!
//! ```text
//! g = diag(-1, 1 - f, r**2, r**2*sin(theta)**2)
//! ```
//!
//! Only the radial entry depends on the profile `f`.

use ansatz_expr::Expr;

/// Errors raised while substituting a profile into the metric template.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BuildError {
    #[error("{role} coordinate must be a bare symbol, got {found}")]
    NotASymbol { role: &'static str, found: String },
    #[error("profile divides by zero: {0}")]
    DivisionByZero(String),
}

/// A 4×4 symbolic metric in `(t, r, theta, phi)` coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricMatrix {
    entries: [[Expr; 4]; 4],
}

impl MetricMatrix {
    fn zero() -> Self {
        Self {
            entries: std::array::from_fn(|_| std::array::from_fn(|_| Expr::number(0.0))),
        }
    }

    /// Returns the entry at `(row, col)`, or `None` outside the 4×4 range.
    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        self.entries.get(row).and_then(|r| r.get(col))
    }

    pub fn diagonal(&self) -> [&Expr; 4] {
        std::array::from_fn(|i| &self.entries[i][i])
    }

    /// True when every off-diagonal entry is the literal zero.
    pub fn is_diagonal(&self) -> bool {
        (0..4).all(|row| {
            (0..4).all(|col| row == col || self.entries[row][col] == Expr::number(0.0))
        })
    }
}

/// Builds `diag(-1, 1 - profile, r**2, r**2*sin(theta)**2)`.
///
/// The profile is taken as given; no physical constraints are checked. Construction fails
/// only if `r`/`theta` are not symbols or the profile divides by an exact zero (`1/0`,
/// `0**-1`). Constants that merely overflow `f64`, such as `10**400`, are accepted.
pub fn build_metric(profile: &Expr, r: &Expr, theta: &Expr) -> Result<MetricMatrix, BuildError> {
    for (role, expr) in [("radial", r), ("polar", theta)] {
        if expr.as_symbol().is_none() {
            return Err(BuildError::NotASymbol {
                role,
                found: expr.to_string(),
            });
        }
    }

    if let Some(bad) = profile.find_undefined() {
        return Err(BuildError::DivisionByZero(bad.to_string()));
    }

    let two = || Expr::number(2.0);
    let mut g = MetricMatrix::zero();
    g.entries[0][0] = Expr::number(-1.0);
    g.entries[1][1] = Expr::number(1.0) - profile.clone();
    g.entries[2][2] = r.clone().pow(two());
    g.entries[3][3] = r.clone().pow(two()) * Expr::sin(theta.clone()).pow(two());

    tracing::debug!(
        "metric diagonal: [{}, {}, {}, {}]",
        g.entries[0][0],
        g.entries[1][1],
        g.entries[2][2],
        g.entries[3][3]
    );

    Ok(g)
}
