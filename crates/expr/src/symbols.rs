//! The allow-list of identifiers a profile expression may reference.

use std::collections::BTreeSet;

/// Coordinate symbols of the spherically-symmetric chart, in metric order.
pub const COORDINATES: [&str; 4] = ["t", "r", "theta", "phi"];

/// Placeholder functions for the known profile families.
pub const PROFILE_FUNCTIONS: [&str; 2] = ["interpolated_alcubierre", "interpolated_natario"];

/// What a declared identifier stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Symbol,
    Function,
}

/// Declared symbols and placeholder functions.
///
/// Identifiers not present here are rejected by the parser; there is no fallback to
/// built-in names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: BTreeSet<String>,
    functions: BTreeSet<String>,
}

impl SymbolTable {
    /// An empty table: every identifier is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinates `t, r, theta, phi` plus the Alcubierre and Natário profile placeholders.
    pub fn spherical() -> Self {
        let table = COORDINATES
            .iter()
            .fold(Self::new(), |table, name| table.with_symbol(*name));
        PROFILE_FUNCTIONS
            .iter()
            .fold(table, |table, name| table.with_function(*name))
    }

    pub fn with_symbol(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.functions.remove(&name);
        self.symbols.insert(name);
        self
    }

    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.symbols.remove(&name);
        self.functions.insert(name);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<Binding> {
        if self.symbols.contains(name) {
            Some(Binding::Symbol)
        } else if self.functions.contains(name) {
            Some(Binding::Function)
        } else {
            None
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }
}
