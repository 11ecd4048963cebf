//! Process-wide authenticated identity.
//!
//! Every component that issues a request reads the same session: set on
//! successful login, cleared on explicit logout or on any 401 response.
//! Clearing is idempotent, so concurrent in-flight requests that all hit a
//! 401 converge on the same cleared state. The token and the last-known user
//! profile live only for the process lifetime; correctness never depends on
//! them surviving a restart (a fresh login re-derives both).

use std::sync::{Arc, RwLock};

use ekos_core::models::{Role, User};

#[derive(Debug, Clone)]
struct Identity {
    token: String,
    /// Unknown until login or a `/auth/me` refresh when the token came from
    /// the environment.
    user: Option<User>,
}

/// Shared handle to the current identity. Cheap to clone; all clones observe
/// the same state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Identity>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh identity after a successful login.
    pub fn establish(&self, token: String, user: User) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Identity {
            token,
            user: Some(user),
        });
    }

    /// Install a bearer token whose profile is not known yet (token taken
    /// from the environment). A `/auth/me` call fills in the user.
    pub fn install_token(&self, token: String) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Identity { token, user: None });
    }

    /// Drop the identity. Safe to call repeatedly and from any clone.
    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Replace the cached user profile, keeping the token.
    pub fn update_user(&self, user: User) {
        let mut guard = self.inner.write().unwrap_or_else(|p| p.into_inner());
        if let Some(identity) = guard.as_mut() {
            identity.user = Some(user);
        }
    }

    pub fn token(&self) -> Option<String> {
        let guard = self.inner.read().unwrap_or_else(|p| p.into_inner());
        guard.as_ref().map(|i| i.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        let guard = self.inner.read().unwrap_or_else(|p| p.into_inner());
        guard.as_ref().and_then(|i| i.user.clone())
    }

    pub fn role(&self) -> Option<Role> {
        let guard = self.inner.read().unwrap_or_else(|p| p.into_inner());
        guard.as_ref().and_then(|i| i.user.as_ref()).map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        let guard = self.inner.read().unwrap_or_else(|p| p.into_inner());
        guard.is_some()
    }

    /// Whether the current identity may perform write operations. Viewer
    /// sessions, unknown profiles, and missing sessions may not; the managers
    /// use this to withhold the operation entirely.
    pub fn can_edit(&self) -> bool {
        self.role().map(Role::can_edit).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: "u-1".to_string(),
            username: "denetci".to_string(),
            email: "denetci@example.com".to_string(),
            role,
            email_verified: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn establish_then_clear_is_idempotent() {
        let session = Session::new();
        session.establish("tok".to_string(), user(Role::Inspector));
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok"));

        let other_handle = session.clone();
        session.clear();
        other_handle.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn clones_observe_the_same_identity() {
        let session = Session::new();
        let clone = session.clone();
        session.establish("tok".to_string(), user(Role::Admin));
        assert!(clone.can_edit());
        clone.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn installed_token_cannot_edit_until_profile_arrives() {
        let session = Session::new();
        session.install_token("tok".to_string());
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
        assert!(!session.can_edit());

        session.update_user(user(Role::Inspector));
        assert!(session.can_edit());
    }

    #[test]
    fn update_user_without_identity_is_a_no_op() {
        let session = Session::new();
        session.update_user(user(Role::Admin));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn viewer_cannot_edit() {
        let session = Session::new();
        session.establish("tok".to_string(), user(Role::Viewer));
        assert!(session.is_authenticated());
        assert!(!session.can_edit());
    }
}
