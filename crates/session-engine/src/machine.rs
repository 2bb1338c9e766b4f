//! Session state machine using rust-fsm.
//!
//! This module defines an explicit finite state machine for the session
//! lifecycle, replacing implicit state derivation from storage checks.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │  Uninitialized  │ (initial, gone after bootstrap starts)
//! └────────┬────────┘
//!          │ CredentialFound          CredentialMissing
//!          ▼                                  │
//! ┌─────────────────┐                         │
//! │    Restoring    │                         │
//! └────────┬────────┘                         │
//!          │                                  │
//!          │ RestoreConfirmed /               │
//!          │ LoginSucceeded                   │ RestoreRejected
//!          ▼                                  ▼
//! ┌─────────────────┐  LoginSucceeded ┌─────────────────┐
//! │  Authenticated  │ ◄───────────────│    Anonymous    │
//! └────────┬────────┘                 └─────────────────┘
//!          │ LoggedOut                        ▲
//!          └──────────────────────────────────┘
//! ```
//!
//! `LoggedOut` is accepted in every state so teardown is always legal and
//! idempotent. `LoginSucceeded` is accepted while `Restoring` because a
//! user can log in manually before a slow background restore resolves.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `session_machine` with:
// - session_machine::State (enum)
// - session_machine::Input (enum)
// - session_machine::StateMachine (type alias)
// - session_machine::Impl (trait impl)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Uninitialized)

    Uninitialized => {
        CredentialFound => Restoring,
        CredentialMissing => Anonymous,
        LoggedOut => Anonymous
    },
    Restoring => {
        RestoreConfirmed => Authenticated,
        RestoreRejected => Anonymous,
        LoginSucceeded => Authenticated,
        LoggedOut => Anonymous
    },
    Anonymous => {
        LoginSucceeded => Authenticated,
        LoggedOut => Anonymous
    },
    Authenticated => {
        LoginSucceeded => Authenticated,
        LoggedOut => Anonymous
    }
}

// Re-export the generated types with clearer names
pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Session status for external consumption.
///
/// This is the status carried by the exposed [`crate::Session`] snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Process just started; bootstrap has not run yet.
    Uninitialized,
    /// A persisted credential is being validated with the server.
    Restoring,
    /// Live session with a verified identity.
    Authenticated,
    /// No session.
    Anonymous,
}

impl SessionStatus {
    /// Returns true if a verified session exists.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }

    /// Returns true if the status may still resolve to Authenticated
    /// without any user action.
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionStatus::Uninitialized | SessionStatus::Restoring)
    }
}

impl From<&SessionMachineState> for SessionStatus {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Uninitialized => SessionStatus::Uninitialized,
            SessionMachineState::Restoring => SessionStatus::Restoring,
            SessionMachineState::Authenticated => SessionStatus::Authenticated,
            SessionMachineState::Anonymous => SessionStatus::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_uninitialized() {
        let machine = SessionMachine::new();
        assert_eq!(*machine.state(), SessionMachineState::Uninitialized);
    }

    #[test]
    fn test_bootstrap_with_credential() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialFound)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Restoring);

        machine
            .consume(&SessionMachineInput::RestoreConfirmed)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticated);
    }

    #[test]
    fn test_bootstrap_without_credential() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialMissing)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Anonymous);
    }

    #[test]
    fn test_restore_rejection_lands_anonymous() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialFound)
            .unwrap();
        machine
            .consume(&SessionMachineInput::RestoreRejected)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Anonymous);
    }

    #[test]
    fn test_login_from_anonymous() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialMissing)
            .unwrap();
        machine
            .consume(&SessionMachineInput::LoginSucceeded)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticated);
    }

    #[test]
    fn test_login_wins_over_pending_restore() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialFound)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Restoring);

        // Manual login resolves while the restore is still in flight.
        machine
            .consume(&SessionMachineInput::LoginSucceeded)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticated);
    }

    #[test]
    fn test_relogin_while_authenticated() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialMissing)
            .unwrap();
        machine
            .consume(&SessionMachineInput::LoginSucceeded)
            .unwrap();
        machine
            .consume(&SessionMachineInput::LoginSucceeded)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticated);
    }

    #[test]
    fn test_logout_from_every_state() {
        // Uninitialized
        let mut machine = SessionMachine::new();
        machine.consume(&SessionMachineInput::LoggedOut).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Anonymous);

        // Restoring
        let mut machine = SessionMachine::new();
        machine
            .consume(&SessionMachineInput::CredentialFound)
            .unwrap();
        machine.consume(&SessionMachineInput::LoggedOut).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Anonymous);

        // Authenticated
        let mut machine = SessionMachine::new();
        machine
            .consume(&SessionMachineInput::CredentialMissing)
            .unwrap();
        machine
            .consume(&SessionMachineInput::LoginSucceeded)
            .unwrap();
        machine.consume(&SessionMachineInput::LoggedOut).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Anonymous);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialMissing)
            .unwrap();
        machine.consume(&SessionMachineInput::LoggedOut).unwrap();
        machine.consume(&SessionMachineInput::LoggedOut).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Anonymous);
    }

    #[test]
    fn test_invalid_transition_returns_error() {
        let mut machine = SessionMachine::new();

        // Can't confirm a restore that never started.
        let result = machine.consume(&SessionMachineInput::RestoreConfirmed);
        assert!(result.is_err());

        // Can't log in before bootstrap has settled the initial state.
        let result = machine.consume(&SessionMachineInput::LoginSucceeded);
        assert!(result.is_err());
    }

    #[test]
    fn test_restore_cannot_resolve_twice() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::CredentialFound)
            .unwrap();
        machine
            .consume(&SessionMachineInput::RestoreConfirmed)
            .unwrap();

        // A second resolution of the same restore is not a legal input.
        let result = machine.consume(&SessionMachineInput::RestoreConfirmed);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(
            SessionStatus::from(&SessionMachineState::Uninitialized),
            SessionStatus::Uninitialized
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::Restoring),
            SessionStatus::Restoring
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::Authenticated),
            SessionStatus::Authenticated
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::Anonymous),
            SessionStatus::Anonymous
        );
    }

    #[test]
    fn test_status_is_authenticated() {
        assert!(!SessionStatus::Uninitialized.is_authenticated());
        assert!(!SessionStatus::Restoring.is_authenticated());
        assert!(SessionStatus::Authenticated.is_authenticated());
        assert!(!SessionStatus::Anonymous.is_authenticated());
    }

    #[test]
    fn test_status_is_transient() {
        assert!(SessionStatus::Uninitialized.is_transient());
        assert!(SessionStatus::Restoring.is_transient());
        assert!(!SessionStatus::Authenticated.is_transient());
        assert!(!SessionStatus::Anonymous.is_transient());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&SessionStatus::Restoring).unwrap();
        assert_eq!(json, r#""restoring""#);
    }
}
