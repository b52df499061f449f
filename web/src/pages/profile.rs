//! Public profile of a hub user with their models and datasets.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded route keyed by `:username`: anonymous visitors are sent to
//! `/login` once restoration finishes. The follow button is hidden on the
//! signed-in user's own profile. Navigating between profiles drops responses
//! that arrive for the previous username.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use olahub::hub::ItemKind;
use olahub::types::{CatalogItem, UserProfile};

use crate::app::AppServices;
use crate::components::item_card::ItemCard;
use crate::pages::{FetchTicket, api_error_message};
use crate::state::auth::AuthState;
use crate::util::auth::install_unauth_redirect;
use crate::util::format::{avatar_initial, format_count, format_date};

/// Follow relationship as shown on the profile header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FollowState {
    pub following: bool,
    pub followers: u64,
}

impl FollowState {
    pub(crate) fn from_profile(profile: &UserProfile) -> Self {
        Self { following: profile.is_following, followers: profile.followers }
    }

    /// State after a successful follow or unfollow.
    pub(crate) fn toggled(self) -> Self {
        if self.following {
            Self { following: false, followers: self.followers.saturating_sub(1) }
        } else {
            Self { following: true, followers: self.followers.saturating_add(1) }
        }
    }

    pub(crate) fn button_label(self) -> &'static str {
        if self.following { "Unfollow" } else { "Follow" }
    }
}

/// Whether to offer a follow button for `profile`.
pub(crate) fn can_follow(profile: &UserProfile, auth: &AuthState) -> bool {
    auth.user.is_some() && !profile.is_current_user && !auth.is_self(&profile.username)
}

/// Which item tab is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Models,
    Datasets,
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let auth = expect_context::<RwSignal<AuthState>>();
    install_unauth_redirect(auth, use_navigate());

    let params = use_params_map();
    let username = move || params.read().get("username").unwrap_or_default();

    let profile = RwSignal::new(None::<UserProfile>);
    let error = RwSignal::new(None::<String>);
    let follow = RwSignal::new(FollowState::default());
    let models = RwSignal::new(Vec::<CatalogItem>::new());
    let datasets = RwSignal::new(Vec::<CatalogItem>::new());
    let tab = RwSignal::new(Tab::Models);
    let latest = StoredValue::new(FetchTicket::default());

    let hub = services.hub.clone();
    Effect::new(move || {
        let name = username();
        if name.is_empty() {
            return;
        }
        let ticket = latest.get_value().next();
        latest.set_value(ticket);
        let hub_profile = hub.clone();
        let lookup = name.clone();
        leptos::task::spawn_local(async move {
            let result = hub_profile.user_profile(&lookup).await;
            if latest.get_value() != ticket {
                log::debug!("profile of {lookup} arrived after navigation; dropped");
                return;
            }
            match result {
                Ok(found) => {
                    follow.set(FollowState::from_profile(&found));
                    profile.set(Some(found));
                    error.set(None);
                }
                Err(err) => {
                    profile.set(None);
                    error.set(Some(api_error_message(&err)));
                }
            }
        });
        for (kind, target) in [(ItemKind::Model, models), (ItemKind::Dataset, datasets)] {
            let hub = hub.clone();
            let name = name.clone();
            leptos::task::spawn_local(async move {
                let result = hub.user_items(&name, kind).await;
                if latest.get_value() != ticket {
                    return;
                }
                match result {
                    Ok(items) => target.set(items),
                    Err(err) => {
                        log::warn!("{kind} for {name} failed: {err}");
                        target.set(Vec::new());
                    }
                }
            });
        }
    });

    let hub = services.hub.clone();
    let on_follow = move |_: leptos::ev::MouseEvent| {
        let current = follow.get_untracked();
        let name = username();
        let hub = hub.clone();
        leptos::task::spawn_local(async move {
            let result = if current.following { hub.unfollow(&name).await } else { hub.follow(&name).await };
            match result {
                Ok(()) => follow.set(current.toggled()),
                Err(err) => error.set(Some(api_error_message(&err))),
            }
        });
    };

    let items_view = move || {
        let (kind, items) = match tab.get() {
            Tab::Models => (ItemKind::Model, models.get()),
            Tab::Datasets => (ItemKind::Dataset, datasets.get()),
        };
        if items.is_empty() {
            return view! { <p class="page__empty">"Nothing published yet."</p> }.into_any();
        }
        view! {
            <div class="catalog-page__grid">
                {items.into_iter().map(|item| view! { <ItemCard kind=kind item=item /> }).collect_view()}
            </div>
        }
        .into_any()
    };

    view! {
        <div class="profile-page">
            <Show when=move || error.get().is_some()>
                <p class="profile-page__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            {move || {
                let on_follow = on_follow.clone();
                profile
                    .get()
                    .map(|user| {
                        let display = if user.name.is_empty() { user.username.clone() } else { user.name.clone() };
                        let show_follow = can_follow(&user, &auth.get());
                        let joined = user.join_date.as_deref().map(format_date).map(str::to_owned);
                        view! {
                            <header class="profile-page__header">
                                <div class="profile-page__avatar">
                                    {match user.avatar.clone() {
                                        Some(src) => view! { <img src=src alt="" /> }.into_any(),
                                        None => view! { <span>{avatar_initial(&display)}</span> }.into_any(),
                                    }}
                                </div>
                                <div>
                                    <h1>{display}</h1>
                                    <p class="profile-page__handle">"@" {user.username.clone()}</p>
                                    <p class="profile-page__bio">{user.bio.clone()}</p>
                                    {joined.map(|date| view! { <p class="profile-page__joined">"Joined " {date}</p> })}
                                </div>
                                {show_follow
                                    .then(|| {
                                        view! {
                                            <button class="btn btn--primary" on:click=on_follow>
                                                {move || follow.get().button_label()}
                                            </button>
                                        }
                                    })}
                            </header>
                            <section class="profile-page__stats">
                                <span>{move || format_count(follow.get().followers)} " followers"</span>
                                <span>{format_count(user.following)} " following"</span>
                                <span>{format_count(user.stats.models)} " models"</span>
                                <span>{format_count(user.stats.datasets)} " datasets"</span>
                                <span>{format_count(user.stats.downloads)} " downloads"</span>
                                <span>{format_count(user.stats.stars)} " stars"</span>
                            </section>
                        }
                    })
            }}
            <nav class="profile-page__tabs">
                <button
                    class="btn"
                    class:btn--active=move || tab.get() == Tab::Models
                    on:click=move |_| tab.set(Tab::Models)
                >
                    "Models"
                </button>
                <button
                    class="btn"
                    class:btn--active=move || tab.get() == Tab::Datasets
                    on:click=move |_| tab.set(Tab::Datasets)
                >
                    "Datasets"
                </button>
            </nav>
            {items_view}
        </div>
    }
}
