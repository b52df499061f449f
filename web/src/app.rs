//! Root application component and the composition root.
//!
//! SYSTEM CONTEXT
//! ==============
//! Builds the one `ApiClient` and `SessionManager` for the page, provides
//! them (plus a signal mirror of the session, the interface locale and the
//! notice banner) through context, starts session restoration, and declares
//! routes.
//!
//! DESIGN
//! ======
//! The session manager registers its 401 listener first, when it is
//! constructed; the navigation listener is registered after it, so by the
//! time the browser leaves for `/login` the stored token is already gone.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use olahub::hub::ItemKind;
use olahub::{ApiClient, ClientConfig, HubApi, SessionManager};

use crate::components::nav_bar::NavBar;
use crate::components::notice_bar::NoticeBar;
use crate::net::transport::FetchTransport;
use crate::pages::catalog::CatalogPage;
use crate::pages::detail::DetailPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::profile::ProfilePage;
use crate::pages::register::RegisterPage;
use crate::state::auth::AuthState;
use crate::state::notice::NoticeState;
use crate::util::auth::navigate_to_login;
use crate::util::i18n::load_locale;
use crate::util::storage::LocalStorageTokenStore;

/// Core services shared with every page through context.
#[derive(Clone, Debug)]
pub struct AppServices {
    pub session: SessionManager,
    pub hub: HubApi,
}

/// Resolve the API base address baked in at build time, falling back to the
/// default when unset, blank or malformed.
pub(crate) fn resolve_config(api_url: Option<&str>) -> ClientConfig {
    let Some(url) = api_url.filter(|url| !url.trim().is_empty()) else {
        return ClientConfig::default();
    };
    match ClientConfig::with_api_url(url) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ignoring OLAHUB_API_URL: {err}");
            ClientConfig::default()
        }
    }
}

fn build_services() -> AppServices {
    let config = resolve_config(option_env!("OLAHUB_API_URL"));
    let client = ApiClient::new(&config, Arc::new(FetchTransport), Arc::new(LocalStorageTokenStore));
    let session = SessionManager::new(client.clone());
    client.on_unauthorized(|_event| navigate_to_login());
    AppServices { session, hub: HubApi::new(client) }
}

/// Root component: context, session bridge, and routes.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let services = build_services();
    let auth = RwSignal::new(AuthState::from(services.session.snapshot()));
    provide_context(services.clone());
    provide_context(auth);
    provide_context(RwSignal::new(load_locale()));
    provide_context(RwSignal::new(NoticeState::default()));

    // Mirror session snapshots into the auth signal.
    let mut updates = services.session.subscribe();
    leptos::task::spawn_local(async move {
        while updates.changed().await.is_ok() {
            let next = AuthState::from(updates.borrow_and_update().clone());
            auth.set(next);
        }
    });

    let session = services.session.clone();
    leptos::task::spawn_local(async move {
        session.restore().await;
    });

    view! {
        <Title text="Olahub" />
        <Router>
            <NavBar />
            <NoticeBar />
            <main class="page">
                <Routes fallback=|| view! { <p class="page__empty">"Page not found."</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/register") view=RegisterPage />
                    <Route path=path!("/models") view=|| view! { <CatalogPage kind=ItemKind::Model /> } />
                    <Route path=path!("/models/:id") view=|| view! { <DetailPage kind=ItemKind::Model /> } />
                    <Route path=path!("/datasets") view=|| view! { <CatalogPage kind=ItemKind::Dataset /> } />
                    <Route path=path!("/datasets/:id") view=|| view! { <DetailPage kind=ItemKind::Dataset /> } />
                    <Route path=path!("/profile/:username") view=ProfilePage />
                </Routes>
            </main>
        </Router>
    }
}
