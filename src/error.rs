// src/error.rs
use thiserror::Error;

/// Failure taxonomy for calls against the scoring service.
///
/// Rate limiting, server errors and timeouts get fixed user-facing messages;
/// every other non-2xx status propagates unchanged. Nothing is retried at
/// this layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Too many requests. Please try again later.")]
    RateLimited,

    #[error("Server error. Please try again later.")]
    Server,

    #[error("Request timeout. Please try again.")]
    Timeout,

    #[error("HTTP {status} error: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response from scoring service: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Map a reqwest-level failure (no HTTP status available) to the taxonomy.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// Map a non-2xx response to the taxonomy. 429 and 500 get dedicated
    /// variants; everything else carries the raw status and body.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => ApiError::RateLimited,
            500 => ApiError::Server,
            _ => ApiError::Http {
                status,
                message: body,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_mapping() {
        let err = ApiError::from_status(429, "slow down".to_string());
        assert!(matches!(err, ApiError::RateLimited));
        assert_eq!(err.to_string(), "Too many requests. Please try again later.");
    }

    #[test]
    fn test_server_error_mapping() {
        let err = ApiError::from_status(500, "boom".to_string());
        assert!(matches!(err, ApiError::Server));
        assert_eq!(err.to_string(), "Server error. Please try again later.");
    }

    #[test]
    fn test_other_status_propagates_unchanged() {
        let err = ApiError::from_status(404, "job not found".to_string());
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "job not found");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
