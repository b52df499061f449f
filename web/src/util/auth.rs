//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded routes apply identical unauthenticated redirect behavior, and the
//! composition root sends the browser to the login entry when the API client
//! reports an invalidated session.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

pub const LOGIN_ROUTE: &str = "/login";

/// True once restoration finished and nobody is signed in.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// Redirect to `/login` whenever auth has loaded and no user is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate(LOGIN_ROUTE, NavigateOptions::default());
        }
    });
}

/// Full-page navigation to the login entry; a no-op when already there.
pub fn navigate_to_login() {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            let on_login = window.location().pathname().is_ok_and(|path| path == LOGIN_ROUTE);
            if !on_login {
                let _ = window.location().set_href(LOGIN_ROUTE);
            }
        }
    }
}
