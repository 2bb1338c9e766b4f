//! Gateway error types.

use thiserror::Error;

/// Failure taxonomy for identity-service operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Malformed or policy-violating input, user-correctable
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Duplicate registration identity (email or username taken)
    #[error("Already registered: {0}")]
    Conflict(String),

    /// Wrong email/password, or wrong current password
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Credential rejected by the server (invalid or expired)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transport failure (connection, timeout, malformed response body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response status the endpoint contract does not account for
    #[error("Unexpected HTTP {status}: {detail}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        detail: String,
    },
}

impl GatewayError {
    /// Returns true if this failure says nothing about credential validity.
    ///
    /// Network-class failures are inconclusive: the server never saw or
    /// never answered the request, so the caller must not treat them like
    /// a rejection.
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Http(_))
    }
}

/// Result type alias using GatewayError.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_not_network() {
        assert!(!GatewayError::Unauthorized("expired".to_string()).is_network());
    }

    #[test]
    fn test_invalid_credentials_is_not_network() {
        assert!(!GatewayError::InvalidCredentials("bad password".to_string()).is_network());
    }

    #[test]
    fn test_unexpected_status_is_not_network() {
        let err = GatewayError::UnexpectedStatus {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            detail: "boom".to_string(),
        };
        assert!(!err.is_network());
    }
}
