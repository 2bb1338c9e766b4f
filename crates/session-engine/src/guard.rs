//! Render-policy decisions for requested views.

use crate::SessionStatus;

/// Declared sensitivity of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSensitivity {
    /// Always renderable, session or not.
    Public,
    /// Requires a live session.
    Protected,
}

/// What to do with a requested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the view.
    Render,
    /// Show a neutral loading placeholder; the session may still resolve.
    Placeholder,
    /// Send the user to the login entry point, remembering where they
    /// wanted to go.
    RedirectToLogin { return_to: Option<String> },
}

/// Decide the render policy for a route.
///
/// A protected route never redirects while the session is still resolving:
/// a slow restore that lands `Authenticated` must find the user where they
/// navigated, not bounced to the login screen.
pub fn evaluate(
    sensitivity: RouteSensitivity,
    status: SessionStatus,
    requested_path: Option<&str>,
) -> RouteDecision {
    match sensitivity {
        RouteSensitivity::Public => RouteDecision::Render,
        RouteSensitivity::Protected => match status {
            SessionStatus::Uninitialized | SessionStatus::Restoring => RouteDecision::Placeholder,
            SessionStatus::Authenticated => RouteDecision::Render,
            SessionStatus::Anonymous => RouteDecision::RedirectToLogin {
                return_to: requested_path.map(String::from),
            },
        },
    }
}
