//! Session error types.

use auth_gateway::GatewayError;
use thiserror::Error;

/// Error type for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Invalid transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),

    /// Failure reported by the identity service
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
