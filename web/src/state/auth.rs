//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! A signal-friendly mirror of the core `SessionSnapshot`. The composition
//! root copies every published snapshot into an `RwSignal<AuthState>` so
//! route guards and user-aware components re-render on session changes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use olahub::session::SessionSnapshot;
use olahub::types::UserIdentity;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserIdentity>,
    /// True until startup session restoration has finished.
    pub loading: bool,
    /// True while a login or register request is in flight.
    pub busy: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::from(SessionSnapshot::default())
    }
}

impl From<SessionSnapshot> for AuthState {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self { user: snapshot.current_user, loading: snapshot.is_initializing, busy: snapshot.busy }
    }
}

impl AuthState {
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }

    /// Whether `username` names the signed-in user.
    #[must_use]
    pub fn is_self(&self, username: &str) -> bool {
        self.username() == Some(username)
    }
}
