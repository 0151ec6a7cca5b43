use std::path::PathBuf;

use crate::metric::BuildError;

/// Why a shape definition or its profile expression could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid shape data from {locator}: {source}")]
    ShapeData {
        locator: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid profile expression for {shape}: {source}")]
    Expression {
        shape: String,
        #[source]
        source: ansatz_expr::ExprError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AnsatzError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to fetch shape from {locator}: {reason}")]
    Fetch { locator: String, reason: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to build metric for {shape}: {source}")]
    Build {
        shape: String,
        #[source]
        source: BuildError,
    },
    #[error("failed to write document {path}: {source}", path = path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ansatz_types::TypesError> for AnsatzError {
    fn from(err: ansatz_types::TypesError) -> Self {
        AnsatzError::InvalidInput(err.to_string())
    }
}

pub type AnsatzResult<T> = std::result::Result<T, AnsatzError>;
