//! Gateway client error types.

use tandem_core::MarketplaceError;
use thiserror::Error;

/// Errors that can occur when talking to the marketplace gateway.
#[derive(Debug, Error)]
pub enum MarketClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the gateway.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The gateway returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

impl From<MarketClientError> for MarketplaceError {
    fn from(error: MarketClientError) -> Self {
        match error {
            MarketClientError::Http(e) if e.is_decode() => Self::Decode(e.to_string()),
            MarketClientError::Http(e) => Self::Transport(e.to_string()),
            MarketClientError::Api { status, message } => Self::Api { status, message },
            MarketClientError::RateLimited { retry_after_secs } => {
                Self::RateLimited { retry_after_secs }
            }
        }
    }
}
