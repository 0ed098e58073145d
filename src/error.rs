//! Error handling for melcookie

use thiserror::Error;

/// Main error type for melcookie operations
#[derive(Error, Debug)]
pub enum MelcookieError {
    #[error("No cookies found for {0}")]
    NotLoggedIn(String),

    #[error("No session cookies found for {0}")]
    SessionCookiesMissing(String),

    #[error("Browser cookie error: {0}")]
    BrowserCookie(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("No cached cookie string available")]
    CacheEmpty,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("An extraction is already in progress")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for melcookie operations
pub type Result<T> = std::result::Result<T, MelcookieError>;
