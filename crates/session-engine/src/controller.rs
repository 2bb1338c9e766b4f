//! Session controller: the single writer of session state.
//!
//! The controller orchestrates the credential store, the auth gateway, and
//! the request authorizer into one process-wide [`Session`] value. All
//! effects for a transition (persistence, header attachment, snapshot
//! replacement) are applied under one lock, so no reader can observe an
//! authenticated session without its credential attached, or vice versa.

use crate::machine::{SessionMachine, SessionMachineInput, SessionMachineState};
use crate::{Session, SessionError, SessionResult, SessionStatus};
use auth_gateway::{AuthGateway, GatewayError, Identity, ProfileUpdate, RequestAuthorizer};
use client_storage::CredentialStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a bootstrap validation may run before it is treated as a
/// transport failure.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Callback type for session change notifications.
pub type SessionCallback = Box<dyn Fn(Session) + Send + Sync>;

struct ControllerState {
    fsm: SessionMachine,
    session: Session,
}

/// Orchestrates store, gateway, and authorizer into one session value.
///
/// Every in-flight validation is tagged with the generation counter read
/// when it started; an explicit login or logout bumps the counter, and a
/// validation whose tag went stale is discarded instead of applied. That
/// is what keeps a slow restore of an old credential from overwriting a
/// fresh manual login, or resurrecting a session after logout.
pub struct SessionController {
    store: CredentialStore,
    gateway: AuthGateway,
    authorizer: RequestAuthorizer,
    state: Mutex<ControllerState>,
    /// Bumped on every explicit login/logout; stale restores are dropped.
    generation: AtomicU64,
    /// Bootstrap runs at most once per process, however often views mount.
    bootstrap_started: AtomicBool,
    bootstrap_timeout: Duration,
    /// Optional callback for session change notifications.
    state_callback: Mutex<Option<SessionCallback>>,
}

impl SessionController {
    /// Create a new controller.
    pub fn new(store: CredentialStore, gateway: AuthGateway, authorizer: RequestAuthorizer) -> Self {
        Self {
            store,
            gateway,
            authorizer,
            state: Mutex::new(ControllerState {
                fsm: SessionMachine::new(),
                session: Session::uninitialized(),
            }),
            generation: AtomicU64::new(0),
            bootstrap_started: AtomicBool::new(false),
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
            state_callback: Mutex::new(None),
        }
    }

    /// Override the bootstrap validation timeout.
    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    /// Set a callback to be notified after every session change.
    pub fn set_state_callback(&self, callback: SessionCallback) {
        let mut cb = self.state_callback.lock().unwrap();
        *cb = Some(callback);
    }

    /// The current session snapshot.
    pub fn session(&self) -> Session {
        self.state.lock().unwrap().session.clone()
    }

    /// Shorthand for `session().status()`.
    pub fn status(&self) -> SessionStatus {
        self.state.lock().unwrap().session.status()
    }

    /// Consume an FSM input and replace the snapshot, in one step.
    fn apply_transition(
        state: &mut ControllerState,
        input: &SessionMachineInput,
        next: Session,
    ) -> SessionResult<()> {
        state.fsm.consume(input).map_err(|_| {
            SessionError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                state.fsm.state()
            ))
        })?;
        debug!(status = ?next.status(), "Session transition");
        state.session = next;
        Ok(())
    }

    /// Notify the callback of a session change.
    fn notify_state_change(&self, session: &Session) {
        let cb = self.state_callback.lock().unwrap();
        if let Some(callback) = cb.as_ref() {
            callback(session.clone());
        }
    }

    /// Validate any persisted credential into a live session.
    ///
    /// Runs at most once per process; later calls return the current
    /// snapshot without issuing another validation. The validation is
    /// bounded by the bootstrap timeout and its result is discarded when
    /// an explicit login/logout happened while it was in flight.
    ///
    /// Outcome policy:
    /// - identity fetched: `Authenticated`
    /// - credential rejected by the server: `Anonymous`, stored
    ///   credential cleared
    /// - transport failure or timeout: `Anonymous` for this process, but
    ///   the untested stored credential is kept for the next start
    pub async fn bootstrap(&self) -> SessionResult<Session> {
        if self.bootstrap_started.swap(true, Ordering::SeqCst) {
            return Ok(self.session());
        }

        let credential = match self.store.load() {
            Some(credential) => credential,
            None => {
                let mut state = self.state.lock().unwrap();
                if *state.fsm.state() != SessionMachineState::Uninitialized {
                    // A login/logout already settled the session.
                    return Ok(state.session.clone());
                }
                info!("No persisted credential found");
                Self::apply_transition(
                    &mut state,
                    &SessionMachineInput::CredentialMissing,
                    Session::anonymous(),
                )?;
                let snapshot = state.session.clone();
                drop(state);
                self.notify_state_change(&snapshot);
                return Ok(snapshot);
            }
        };

        let (generation, restoring) = {
            let mut state = self.state.lock().unwrap();
            if *state.fsm.state() != SessionMachineState::Uninitialized {
                return Ok(state.session.clone());
            }
            self.authorizer.set_credential(&credential);
            Self::apply_transition(
                &mut state,
                &SessionMachineInput::CredentialFound,
                Session::restoring(),
            )?;
            (self.generation.load(Ordering::SeqCst), state.session.clone())
        };
        self.notify_state_change(&restoring);

        debug!("Validating persisted credential with the server");
        let outcome = tokio::time::timeout(
            self.bootstrap_timeout,
            self.gateway.fetch_current_identity(&credential),
        )
        .await;

        let mut state = self.state.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding restore result superseded by a login/logout");
            return Ok(state.session.clone());
        }

        match outcome {
            Ok(Ok(identity)) => {
                info!(user_id = identity.id, "Session restored");
                Self::apply_transition(
                    &mut state,
                    &SessionMachineInput::RestoreConfirmed,
                    Session::authenticated(identity, credential),
                )?;
            }
            Ok(Err(GatewayError::Unauthorized(detail))) => {
                warn!(detail = %detail, "Persisted credential rejected, clearing it");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear rejected credential");
                }
                self.authorizer.clear_credential();
                Self::apply_transition(
                    &mut state,
                    &SessionMachineInput::RestoreRejected,
                    Session::anonymous(),
                )?;
            }
            Ok(Err(e)) => {
                // Inconclusive: the server never vouched for or against the
                // credential, so it stays persisted for the next start.
                warn!(error = %e, "Restore inconclusive, keeping persisted credential");
                self.authorizer.clear_credential();
                Self::apply_transition(
                    &mut state,
                    &SessionMachineInput::RestoreRejected,
                    Session::anonymous(),
                )?;
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.bootstrap_timeout.as_secs(),
                    "Restore timed out, keeping persisted credential"
                );
                self.authorizer.clear_credential();
                Self::apply_transition(
                    &mut state,
                    &SessionMachineInput::RestoreRejected,
                    Session::anonymous(),
                )?;
            }
        }

        let snapshot = state.session.clone();
        drop(state);
        self.notify_state_change(&snapshot);
        Ok(snapshot)
    }

    /// Log in with email and password.
    ///
    /// On failure nothing changes; on success the credential is persisted,
    /// attached to outgoing requests, and the session becomes
    /// `Authenticated`, atomically from a reader's perspective.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<Identity> {
        let response = self.gateway.login(email, password).await?;
        let credential = response.access_token;

        let mut state = self.state.lock().unwrap();
        // Consume the FSM input first: when it is rejected, no effect has
        // been applied yet and the session really is untouched.
        Self::apply_transition(
            &mut state,
            &SessionMachineInput::LoginSucceeded,
            Session::authenticated(response.user.clone(), credential.clone()),
        )?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.store.save(&credential) {
            // The in-memory session still works; only restore-on-restart
            // is lost.
            warn!(error = %e, "Failed to persist credential");
        }
        self.authorizer.set_credential(&credential);
        let snapshot = state.session.clone();
        drop(state);

        info!(user_id = response.user.id, "Login successful");
        self.notify_state_change(&snapshot);
        Ok(response.user)
    }

    /// Create a new account. The session is left untouched; callers decide
    /// whether to chain a login.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> SessionResult<Identity> {
        let identity = self.gateway.register(email, username, password).await?;
        info!(user_id = identity.id, "Account registered");
        Ok(identity)
    }

    /// Log out: clear persistence, detach the credential, and land
    /// `Anonymous`. Idempotent, and legal in every state.
    pub fn logout(&self) {
        self.clear_session("logout");
    }

    /// Force the logout transition after a credential was rejected outside
    /// an explicit login (e.g. a protected request answered with 401).
    pub fn invalidate_session(&self) {
        self.clear_session("credential rejected mid-session");
    }

    fn clear_session(&self, reason: &str) {
        let mut state = self.state.lock().unwrap();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted credential");
        }
        self.authorizer.clear_credential();
        // LoggedOut is accepted in every state, so this cannot fail.
        let _ = Self::apply_transition(
            &mut state,
            &SessionMachineInput::LoggedOut,
            Session::anonymous(),
        );
        let snapshot = state.session.clone();
        drop(state);

        info!(reason = %reason, "Session cleared");
        self.notify_state_change(&snapshot);
    }

    /// Update the authenticated profile.
    ///
    /// The replacement identity is swapped into the session wholesale. A
    /// 401 here means the credential died mid-session and forces the same
    /// transition as an explicit logout.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> SessionResult<Identity> {
        let generation = self.generation.load(Ordering::SeqCst);

        match self.gateway.update_profile(update).await {
            Ok(identity) => {
                let mut state = self.state.lock().unwrap();
                let stale = self.generation.load(Ordering::SeqCst) != generation;
                if !stale {
                    if let Some(credential) = state.session.credential().map(String::from) {
                        state.session = Session::authenticated(identity.clone(), credential);
                    }
                }
                let snapshot = state.session.clone();
                drop(state);
                self.notify_state_change(&snapshot);
                Ok(identity)
            }
            Err(GatewayError::Unauthorized(detail)) => {
                // A 401 for a credential that is no longer the session's
                // says nothing about the current one.
                if self.generation.load(Ordering::SeqCst) == generation {
                    self.invalidate_session();
                }
                Err(GatewayError::Unauthorized(detail).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Change the account password. No session state changes on any
    /// outcome: a 401 here means the wrong current password, not a dead
    /// credential.
    pub async fn change_password(&self, current: &str, next: &str) -> SessionResult<()> {
        self.gateway.change_password(current, next).await?;
        info!("Password changed");
        Ok(())
    }
}
