//! Custom error types for translation operations

use thiserror::Error;

/// Fixed message reported when a response body has no usable translation.
pub const JSON_ERROR_MESSAGE: &str = "JSON parse error";

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Server answered with a non-success status
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Server-provided error text, or the raw body
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// What went wrong
        message: String,
    },

    /// Response body was not JSON or had no `translatedText` of a known shape
    #[error("{}", JSON_ERROR_MESSAGE)]
    JsonParse,

    /// Engine is switched off in the preferences
    #[error("Engine disabled: {name}")]
    Disabled {
        /// Engine display name
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What went wrong
        message: String,
    },

    /// Preference store could not be read or written
    #[error("Preference error: {path} - {message}")]
    PreferenceError {
        /// File being read or written
        path: String,
        /// Underlying failure
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
