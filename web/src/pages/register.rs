//! Registration page: create an account and sign in with it.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::app::AppServices;
use crate::pages::login::is_email_shaped;
use crate::pages::session_error_message;
use crate::state::auth::AuthState;
use crate::state::notice::{NoticeKind, NoticeState, notify};
use crate::util::i18n::{Locale, Text, tr};

pub(crate) const MIN_USERNAME_LEN: usize = 3;
pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Validated registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Check every field, first failure wins. Username and email are trimmed;
/// passwords are compared and measured as typed.
pub(crate) fn validate_register_input(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<RegisterForm, &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Enter a username.");
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err("Username must be at least 3 characters.");
    }
    if !username.chars().all(is_username_char) {
        return Err("Username may only contain letters, numbers, underscores and hyphens.");
    }
    let email = email.trim();
    if email.is_empty() {
        return Err("Enter your email.");
    }
    if !is_email_shaped(email) {
        return Err("Enter a valid email address.");
    }
    if password.is_empty() {
        return Err("Enter a password.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters.");
    }
    if confirm.is_empty() {
        return Err("Confirm your password.");
    }
    if confirm != password {
        return Err("Passwords do not match.");
    }
    Ok(RegisterForm { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let locale = expect_context::<RwSignal<Locale>>();
    let notices = expect_context::<RwSignal<NoticeState>>();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().busy {
            return;
        }
        let form = match validate_register_input(
            &username.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &confirm.get_untracked(),
        ) {
            Ok(form) => form,
            Err(message) => {
                error.set(Some(message.to_owned()));
                return;
            }
        };
        error.set(None);

        let session = services.session.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match session.register(&form.username, &form.email, &form.password).await {
                Ok(user) => {
                    log::info!("registered {}", user.username);
                    notify(notices, NoticeKind::Success, tr(locale.get_untracked(), Text::RegisterSuccess));
                    navigate("/", NavigateOptions::default());
                }
                Err(err) => error.set(session_error_message(&err)),
            }
        });
    };

    let field = move |label: &'static str, kind: &'static str, autocomplete: &'static str, value: RwSignal<String>| {
        view! {
            <label class="auth-form__label">
                {label}
                <input
                    class="auth-input"
                    type=kind
                    autocomplete=autocomplete
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create an account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    {field("Username", "text", "username", username)}
                    {field("Email", "email", "email", email)}
                    {field("Password", "password", "new-password", password)}
                    {field("Confirm password", "password", "new-password", confirm)}
                    <button class="btn btn--primary auth-form__submit" type="submit" disabled=move || auth.get().busy>
                        {move || if auth.get().busy { "Creating account..." } else { "Sign up" }}
                    </button>
                </form>
                <Show when=move || error.get().is_some()>
                    <p class="auth-message auth-message--error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <p class="auth-card__footer">
                    "Already registered? "
                    <A href="/login">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
