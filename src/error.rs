use thiserror::Error;

/// Unified error type for the crate.
///
/// Transport failures (`Http`) and backend envelope failures (`Backend`)
/// are deliberately distinct variants: the former means the request never
/// produced a usable response, the latter means the backend answered with
/// `errno != 0` inside a well-formed envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error [{errno}]: {errmsg}")]
    Backend { errno: i64, errmsg: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
