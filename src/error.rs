//! error types
//!
//! structured errors for loading, parsing, and semantic model construction.

use crate::document::OperationKind;
use std::path::PathBuf;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for loaders and model builders
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// file that could not be read or written
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unexpected http status {status}: {body}")]
    Status {
        /// http status code
        status: u16,
        /// raw response body
        body: String,
    },

    #[error("failed to parse {source_name}: {message}")]
    Parse {
        /// file path or label of the parsed text
        source_name: String,
        /// parser message
        message: String,
    },

    /// a named type matched none of the six graphql categories
    #[error("unexpected graphql type definition: {0}")]
    Classification(String),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("unknown field {field} on type {parent}")]
    UnknownField { parent: String, field: String },

    #[error("schema has no root type for {0} operations")]
    MissingRootType(OperationKind),
}

impl Error {
    pub(crate) fn parse(source_name: impl Into<String>, err: impl ToString) -> Self {
        Error::Parse {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }
}
