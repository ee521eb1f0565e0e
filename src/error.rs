//! Error classification for backend calls.
//!
//! Every failure is bucketed into one of four classes; the class decides
//! whether the list fetch retries and which message the user sees.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout - anything before a status code
    #[error("network error: {0}")]
    Network(String),

    /// 401/403 - the token is missing, expired or lacks admin rights
    #[error("authentication failed: {message}")]
    Auth { status: u16, message: String },

    /// Other 4xx - the server rejected the request data
    #[error("request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    /// 5xx - the server itself failed
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn from_status(status: u16, message: String) -> ApiError {
        match status {
            401 | 403 => ApiError::Auth { status, message },
            400..=499 => ApiError::Client { status, message },
            _ => ApiError::Server { status, message },
        }
    }

    /// Network and server failures are worth retrying; auth and validation
    /// failures will not get better on their own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }

    /// Delay before the given retry attempt, scaled by attempt number.
    /// Network errors get more headroom than server errors.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        match self {
            ApiError::Network(_) => Duration::from_millis(2000 * attempt as u64),
            ApiError::Server { .. } => Duration::from_millis(1000 * attempt as u64),
            _ => Duration::ZERO,
        }
    }

    /// Stable user-facing message per error class
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                String::from("Network problem. Check your connection and try again.")
            }
            ApiError::Auth { .. } => String::from("Authentication failed. Please log in again."),
            ApiError::Client { message, .. } => message.clone(),
            ApiError::Server { .. } => {
                String::from("Server temporarily unavailable. Try again later.")
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(String::from("request timed out"))
        } else if e.is_connect() {
            ApiError::Network(format!("connection failed: {}", e))
        } else if let Some(status) = e.status() {
            ApiError::from_status(status.as_u16(), e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(401, "no".into()),
            ApiError::Auth { .. }
        ));
        assert!(matches!(
            ApiError::from_status(404, "missing".into()),
            ApiError::Client { .. }
        ));
        assert!(matches!(
            ApiError::from_status(503, "down".into()),
            ApiError::Server { .. }
        ));
    }

    #[test]
    fn test_retryability() {
        assert!(ApiError::Network("refused".into()).is_retryable());
        assert!(ApiError::from_status(500, "boom".into()).is_retryable());
        assert!(!ApiError::from_status(401, "expired".into()).is_retryable());
        assert!(!ApiError::from_status(400, "bad".into()).is_retryable());
    }

    #[test]
    fn test_retry_delay_scales_with_attempt() {
        let net = ApiError::Network("refused".into());
        assert_eq!(net.retry_delay(1), Duration::from_millis(2000));
        assert_eq!(net.retry_delay(2), Duration::from_millis(4000));

        let srv = ApiError::from_status(502, "bad gateway".into());
        assert_eq!(srv.retry_delay(1), Duration::from_millis(1000));
        assert_eq!(srv.retry_delay(2), Duration::from_millis(2000));

        let auth = ApiError::from_status(401, "expired".into());
        assert_eq!(auth.retry_delay(3), Duration::ZERO);
    }

    #[test]
    fn test_client_message_passes_through() {
        let err = ApiError::from_status(400, "Failed to create record.".into());
        assert_eq!(err.user_message(), "Failed to create record.");
    }
}
