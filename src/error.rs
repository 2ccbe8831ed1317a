// ABOUTME: Application-wide error types for devconf.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::config::Shape;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("devcontainer configuration not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error(
        "no container source specified: expected one of `build.dockerfile`, `dockerComposeFile` or `image`"
    )]
    MissingOriginVariant,

    #[error("unsupported command in `{field}`: expected text or a list of text, found {shape}")]
    UnsupportedCommandShape { field: String, shape: Shape },

    #[error("`{field}` does not contain a command")]
    EmptyCommand { field: String },

    #[error("type mismatch in `{field}`: {reason}")]
    TypeMismatch { field: String, reason: String },
}

impl Error {
    /// Shape mismatch between what a field declares and what the document holds.
    pub fn type_mismatch(field: impl Into<String>, expected: &str, found: Shape) -> Self {
        Error::TypeMismatch {
            field: field.into(),
            reason: format!("expected {expected}, found {found}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
