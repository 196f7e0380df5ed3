use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Document pipeline error: {0}")]
    Document(#[from] DocumentError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of a single document's fetch/extract pipeline.
///
/// Both variants render as the bare underlying text; the caller wraps it into
/// the `Error parsing document {id}: ...` line no matter which stage failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("{0}")]
    FetchFailed(String),

    #[error("{0}")]
    ParseFailed(String),
}

impl From<reqwest::Error> for DocumentError {
    fn from(err: reqwest::Error) -> Self {
        DocumentError::FetchFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
