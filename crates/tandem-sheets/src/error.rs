//! Spreadsheet client error types.

use tandem_core::CompletionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not a values range.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<SheetsError> for CompletionError {
    fn from(error: SheetsError) -> Self {
        match error {
            SheetsError::Http(e) if e.is_decode() => Self::Malformed(e.to_string()),
            SheetsError::Parse(message) => Self::Malformed(message),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
