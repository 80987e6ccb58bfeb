use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error("Not authenticated: sign in first")]
    NotAuthenticated,

    #[error("A sign-in attempt is already in progress")]
    SignInInProgress,

    #[error("{context}: {status} - {body}")]
    Fetch {
        context: String,
        status: StatusCode,
        body: String,
    },

    #[error("Unsupported file format '{mime_type}': convert the file to Google Sheets instead")]
    UnsupportedFormat { mime_type: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
