//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetching, toggles, redirects)
//! and keeps input validation and state transitions in pure helpers that the
//! sibling `*_test.rs` files cover.


pub mod catalog;
pub mod detail;
pub mod home;
pub mod login;
pub mod profile;
pub mod register;

use olahub::error::{ApiError, SessionError};

/// Sequence number of a route fetch. A page keeps the newest one it issued
/// and drops any response whose ticket no longer matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FetchTicket(u64);

impl FetchTicket {
    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Message shown for a failed hub call.
pub(crate) fn api_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Network(_) => "Cannot reach the hub. Check your connection and try again.".to_owned(),
        ApiError::Unauthorized { .. } => "Your session has expired. Please sign in again.".to_owned(),
        ApiError::Http { .. } => err
            .server_message()
            .unwrap_or_else(|| "The request failed. Please try again later.".to_owned()),
        ApiError::Decode(_) | ApiError::Encode(_) => "Unexpected response from the hub.".to_owned(),
    }
}

/// Message shown for a failed login or registration, or `None` when the
/// attempt was superseded and nothing should be shown.
pub(crate) fn session_error_message(err: &SessionError) -> Option<String> {
    match err {
        SessionError::Api(ApiError::Unauthorized { .. }) => Some("Invalid email or password.".to_owned()),
        SessionError::Api(api) => Some(api_error_message(api)),
        SessionError::Storage(storage) => Some(format!("Signed in, but the session could not be saved: {storage}")),
        SessionError::Superseded => None,
    }
}
