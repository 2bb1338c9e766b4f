//! The process-wide session snapshot.

use crate::SessionStatus;
use auth_gateway::Identity;

/// Immutable snapshot of the authentication state exposed to views.
///
/// Fields are private and values are built only through the constructors,
/// so `identity` and `credential` are non-null exactly when the status is
/// `Authenticated` and no reachable snapshot can violate that.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    status: SessionStatus,
    identity: Option<Identity>,
    credential: Option<String>,
}

impl Session {
    /// The snapshot that exists before bootstrap has run.
    pub fn uninitialized() -> Self {
        Self {
            status: SessionStatus::Uninitialized,
            identity: None,
            credential: None,
        }
    }

    /// A persisted credential is being validated.
    pub fn restoring() -> Self {
        Self {
            status: SessionStatus::Restoring,
            identity: None,
            credential: None,
        }
    }

    /// No session.
    pub fn anonymous() -> Self {
        Self {
            status: SessionStatus::Anonymous,
            identity: None,
            credential: None,
        }
    }

    /// Live session for `identity`, carrying `credential`.
    pub fn authenticated(identity: Identity, credential: String) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            identity: Some(identity),
            credential: Some(credential),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Shorthand for `status().is_authenticated()`.
    pub fn is_authenticated(&self) -> bool {
        self.status.is_authenticated()
    }
}
