//! Retry policy and HTTP error classification.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of attempts for a network operation.
pub const MAX_RETRIES: usize = 3;

/// Delay between attempts in milliseconds.
#[cfg(not(test))]
pub const RETRY_DELAY_MS: u64 = 1000;
#[cfg(test)]
pub const RETRY_DELAY_MS: u64 = 10;

/// Failures that will not succeed on a retry.
#[derive(Debug, Error)]
pub enum NonRetryableError {
    #[error("Rate limit exceeded: {0}. Try again later.")]
    RateLimitExceeded(String),
    #[error("Authentication failed: {0}. Check your username, password or token.")]
    AuthenticationFailed(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Access forbidden: {0}. You may need to log in again.")]
    Forbidden(String),
    #[error("Request error: {0}")]
    ClientError(String),
    #[error("Local I/O error: {0}")]
    LocalIo(String),
}

/// Returns `Ok(())` for retryable errors (connection problems, 5xx) and the
/// matching [`NonRetryableError`] for client errors.
pub fn classify_error(error: &reqwest::Error) -> Result<(), NonRetryableError> {
    let Some(status) = error.status() else {
        return Ok(());
    };

    match status {
        StatusCode::UNAUTHORIZED => Err(NonRetryableError::AuthenticationFailed(
            "the server rejected the supplied credentials".to_string(),
        )),
        StatusCode::FORBIDDEN => Err(NonRetryableError::Forbidden(
            "access to this resource is forbidden".to_string(),
        )),
        StatusCode::TOO_MANY_REQUESTS => Err(NonRetryableError::RateLimitExceeded(
            "too many requests".to_string(),
        )),
        StatusCode::NOT_FOUND => Err(NonRetryableError::NotFound(
            error
                .url()
                .map(|u| u.path().to_string())
                .unwrap_or_else(|| "the requested resource".to_string()),
        )),
        s if s.is_client_error() => Err(NonRetryableError::ClientError(format!(
            "HTTP {} error",
            s.as_u16()
        ))),
        _ => Ok(()),
    }
}

/// Wraps an `error_for_status()` failure, converting client errors into
/// [`NonRetryableError`] so the retry loop stops early.
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Ok(()) => anyhow::Error::from(error),
        Err(non_retryable) => anyhow::Error::from(non_retryable),
    }
}
