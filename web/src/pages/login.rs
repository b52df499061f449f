//! Login page: email + password credential exchange.
//!
//! SYSTEM CONTEXT
//! ==============
//! Also the landing route after the API client reports an invalidated
//! session. A successful login goes to the home page; a failure leaves the
//! session untouched and shows the reason inline.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::app::AppServices;
use crate::pages::session_error_message;
use crate::state::auth::AuthState;
use crate::state::notice::{NoticeKind, NoticeState, notify};
use crate::util::i18n::{Locale, Text, tr};

/// Loose address check: one `@`, non-empty local part, dotted domain, no
/// whitespace. The server does the authoritative check.
pub(crate) fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

/// Trim the email and require both fields. The password is passed through
/// untouched.
pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Enter your email.");
    }
    if !is_email_shaped(email) {
        return Err("Enter a valid email address.");
    }
    if password.is_empty() {
        return Err("Enter your password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let locale = expect_context::<RwSignal<Locale>>();
    let notices = expect_context::<RwSignal<NoticeState>>();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().busy {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get_untracked(), &password.get_untracked()) {
            Ok(values) => values,
            Err(message) => {
                error.set(Some(message.to_owned()));
                return;
            }
        };
        error.set(None);

        let session = services.session.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match session.login(&email_value, &password_value).await {
                Ok(user) => {
                    log::info!("signed in as {}", user.username);
                    notify(notices, NoticeKind::Success, tr(locale.get_untracked(), Text::LoginSuccess));
                    navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
                }
                Err(err) => error.set(session_error_message(&err)),
            }
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-form__label">
                        "Email"
                        <input
                            class="auth-input"
                            type="email"
                            autocomplete="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="auth-form__label">
                        "Password"
                        <input
                            class="auth-input"
                            type="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <button class="btn btn--primary auth-form__submit" type="submit" disabled=move || auth.get().busy>
                        {move || if auth.get().busy { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="auth-message auth-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <p class="auth-card__footer">
                    "No account yet? "
                    <A href="/register">"Create one"</A>
                </p>
            </div>
        </div>
    }
}
