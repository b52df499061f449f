//! Top navigation with section links, the language switcher and the session
//! menu.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::app::AppServices;
use crate::state::auth::AuthState;
use crate::state::notice::{NoticeKind, NoticeState, notify};
use crate::util::i18n::{Locale, Text, save_locale, tr};

/// Site header. Shows login/register links when anonymous and the user's
/// profile link plus a logout button when signed in.
#[component]
pub fn NavBar() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let locale = expect_context::<RwSignal<Locale>>();
    let notices = expect_context::<RwSignal<NoticeState>>();
    let navigate = use_navigate();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        services.session.logout();
        notify(notices, NoticeKind::Success, tr(locale.get_untracked(), Text::LogoutSuccess));
        navigate("/", NavigateOptions::default());
    };

    let on_switch_locale = move |_: leptos::ev::MouseEvent| {
        let next = locale.get_untracked().toggled();
        save_locale(next);
        locale.set(next);
    };

    view! {
        <header class="nav-bar">
            <A href="/" attr:class="nav-bar__brand">"Olahub"</A>
            <nav class="nav-bar__links">
                <A href="/models">{move || tr(locale.get(), Text::Models)}</A>
                <A href="/datasets">{move || tr(locale.get(), Text::Datasets)}</A>
            </nav>
            <span class="nav-bar__spacer"></span>
            <button
                class="btn nav-bar__locale"
                title=move || locale.get().toggled().label()
                on:click=on_switch_locale
            >
                {move || locale.get().label()}
            </button>
            {move || {
                let state = auth.get();
                let lang = locale.get();
                match state.username() {
                    Some(username) => {
                        let username = username.to_owned();
                        let on_logout = on_logout.clone();
                        view! {
                            <A href=format!("/profile/{username}") attr:class="nav-bar__user">
                                {username}
                            </A>
                            <button class="btn nav-bar__logout" on:click=on_logout>
                                {tr(lang, Text::SignOut)}
                            </button>
                        }
                            .into_any()
                    }
                    None if state.loading => ().into_any(),
                    None => {
                        view! {
                            <A href="/login" attr:class="btn">{tr(lang, Text::SignIn)}</A>
                            <A href="/register" attr:class="btn btn--primary">{tr(lang, Text::SignUp)}</A>
                        }
                            .into_any()
                    }
                }
            }}
        </header>
    }
}
