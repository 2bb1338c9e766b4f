//! Bearer-credential attachment for outgoing requests.

use reqwest::RequestBuilder;
use std::sync::{Arc, Mutex};

/// Single point of truth for the credential attached to outgoing requests.
///
/// Cloning shares the underlying slot, so the gateway and the session
/// controller observe the same value. Only the session controller may call
/// `set_credential`/`clear_credential`; a request still in flight when the
/// slot is cleared keeps the header it was built with, and its response is
/// discarded upstream by the controller's generation check.
#[derive(Clone, Default)]
pub struct RequestAuthorizer {
    credential: Arc<Mutex<Option<String>>>,
}

impl RequestAuthorizer {
    /// Create an authorizer with no credential attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `credential` to all subsequent requests.
    pub fn set_credential(&self, credential: &str) {
        let mut slot = self.credential.lock().unwrap();
        *slot = Some(credential.to_string());
    }

    /// Stop attaching any credential. Idempotent.
    pub fn clear_credential(&self) {
        let mut slot = self.credential.lock().unwrap();
        *slot = None;
    }

    /// The currently attached credential, if any.
    pub fn current(&self) -> Option<String> {
        self.credential.lock().unwrap().clone()
    }

    /// Apply the attached credential, if any, to a request being built.
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.current() {
            Some(credential) => builder.bearer_auth(credential),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let authorizer = RequestAuthorizer::new();
        assert_eq!(authorizer.current(), None);
    }

    #[test]
    fn test_set_and_clear() {
        let authorizer = RequestAuthorizer::new();

        authorizer.set_credential("tok-A");
        assert_eq!(authorizer.current(), Some("tok-A".to_string()));

        authorizer.clear_credential();
        assert_eq!(authorizer.current(), None);
    }

    #[test]
    fn test_set_replaces_previous_credential() {
        let authorizer = RequestAuthorizer::new();

        authorizer.set_credential("tok-A");
        authorizer.set_credential("tok-B");
        assert_eq!(authorizer.current(), Some("tok-B".to_string()));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let authorizer = RequestAuthorizer::new();
        authorizer.clear_credential();
        authorizer.clear_credential();
        assert_eq!(authorizer.current(), None);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let authorizer = RequestAuthorizer::new();
        let clone = authorizer.clone();

        authorizer.set_credential("tok-shared");
        assert_eq!(clone.current(), Some("tok-shared".to_string()));

        clone.clear_credential();
        assert_eq!(authorizer.current(), None);
    }
}
