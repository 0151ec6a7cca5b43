//! Validated primitives shared across the metric ansatz crates.
//!
//! - [`ShapeName`]: the display name of a shape, safe to emit inside a LaTeX section title.
//! - [`Locator`]: where a shape definition is fetched from (remote URL or local file).

use std::path::PathBuf;

/// Errors that can occur when creating validated types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The shape name contains a character that would break the section title
    #[error("shape name contains reserved character {0:?}")]
    ReservedCharacter(char),
    /// The locator looked like a URL but used an unsupported scheme
    #[error("unsupported URL scheme in locator: {0}")]
    UnsupportedScheme(String),
}

/// Characters that are not allowed in a shape name.
///
/// Names are emitted verbatim inside `\section*{...}`; braces would unbalance the group,
/// a backslash would start a control sequence and `%` would comment out the rest of the line.
const RESERVED_NAME_CHARS: [char; 4] = ['{', '}', '\\', '%'];

/// The display name of a shape.
///
/// The input is trimmed of leading and trailing whitespace during construction and must be
/// non-empty. Non-ASCII names such as `Natário` are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeName(String);

impl ShapeName {
    /// Creates a new `ShapeName` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::Empty` if the trimmed input is empty, or
    /// `TypesError::ReservedCharacter` if it contains `{`, `}`, `\` or `%`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        if let Some(c) = trimmed.chars().find(|c| RESERVED_NAME_CHARS.contains(c)) {
            return Err(TypesError::ReservedCharacter(c));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShapeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ShapeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a shape definition lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// An `http://` or `https://` URL.
    Url(String),
    /// A path to a JSON file on the local filesystem.
    File(PathBuf),
}

impl Locator {
    /// Creates a URL locator.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::Empty` for blank input and `TypesError::UnsupportedScheme` when the
    /// URL does not start with `http://` or `https://`.
    pub fn url(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(TypesError::UnsupportedScheme(trimmed.to_owned()));
        }
        Ok(Self::Url(trimmed.to_owned()))
    }

    /// Creates a file locator.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Parses a locator, choosing the variant from the input's shape.
    ///
    /// Anything containing `://` is treated as a URL (and must be http/https); everything else
    /// is a file path.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        if trimmed.contains("://") {
            Self::url(trimmed)
        } else {
            Ok(Self::file(trimmed))
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Url(url) => write!(f, "{}", url),
            Locator::File(path) => write!(f, "{}", path.display()),
        }
    }
}
