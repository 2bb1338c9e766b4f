//! Command implementations.

pub mod auth;
pub mod receipts;

use auth_gateway::{AuthGateway, RequestAuthorizer};
use client_config_and_utils::{Config, Paths};
use client_storage::create_credential_store;
use session_engine::guard::{self, RouteDecision, RouteSensitivity};
use session_engine::{Session, SessionController};
use std::sync::Arc;

/// Shared wiring for all commands.
pub struct App {
    pub controller: Arc<SessionController>,
    pub gateway: AuthGateway,
}

impl App {
    /// Wire store, gateway, authorizer, and controller together.
    pub fn build(paths: &Paths, config: &Config) -> Self {
        tracing::debug!(api_base_url = %config.api_base_url, "Building client");
        let store = create_credential_store(paths);
        let authorizer = RequestAuthorizer::new();
        let gateway = AuthGateway::new(config.api_base_url.clone(), authorizer.clone());
        let controller = Arc::new(SessionController::new(
            store,
            gateway.clone(),
            authorizer,
        ));

        Self {
            controller,
            gateway,
        }
    }

    /// Restore any persisted session and return the settled snapshot.
    pub async fn bootstrap(&self) -> anyhow::Result<Session> {
        Ok(self.controller.bootstrap().await?)
    }
}

/// Gate a protected command on the current session.
///
/// Returns true when the view may render; otherwise prints the redirect
/// hint (the CLI's stand-in for navigating to the login screen).
pub fn require_authenticated(session: &Session, view: &str) -> bool {
    match guard::evaluate(RouteSensitivity::Protected, session.status(), Some(view)) {
        RouteDecision::Render => true,
        RouteDecision::Placeholder => {
            println!("Session is still being restored, try again in a moment.");
            false
        }
        RouteDecision::RedirectToLogin { .. } => {
            println!("Not logged in. Run `shopsense login` first.");
            false
        }
    }
}
