//! Landing page: site counters, trending items, and a catalog search box.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public route. Stats and both trending lists load independently; a failed
//! load leaves zeros or an empty list in place.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

use olahub::hub::ItemKind;
use olahub::types::{CatalogItem, HubStats};

use crate::app::AppServices;
use crate::components::item_card::ItemCard;
use crate::util::format::format_count;
use crate::util::i18n::{Locale, Text, tr};

/// Trending cards shown per kind.
const TRENDING_LIMIT: usize = 6;

/// Model catalog URL carrying `query` as `?q=`, or the bare catalog when the
/// query is blank.
pub(crate) fn search_href(query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        "/models".to_owned()
    } else {
        format!("/models?q={}", urlencoding::encode(query))
    }
}

/// Labelled counters in display order.
pub(crate) fn stat_tiles(stats: &HubStats) -> [(&'static str, String); 4] {
    [
        ("Models", format_count(stats.total_models)),
        ("Datasets", format_count(stats.total_datasets)),
        ("Users", format_count(stats.total_users)),
        ("Downloads", format_count(stats.total_downloads)),
    ]
}

#[component]
pub fn HomePage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let navigate = use_navigate();
    let locale = expect_context::<RwSignal<Locale>>();

    let stats = RwSignal::new(HubStats::default());
    let models = RwSignal::new(Vec::<CatalogItem>::new());
    let datasets = RwSignal::new(Vec::<CatalogItem>::new());
    let search = RwSignal::new(String::new());

    let hub = services.hub.clone();
    leptos::task::spawn_local(async move {
        match hub.stats().await {
            Ok(next) => stats.set(next),
            Err(err) => log::warn!("stats failed: {err}"),
        }
    });
    for (kind, target) in [(ItemKind::Model, models), (ItemKind::Dataset, datasets)] {
        let hub = services.hub.clone();
        leptos::task::spawn_local(async move {
            match hub.trending(kind).await {
                Ok(mut items) => {
                    items.truncate(TRENDING_LIMIT);
                    target.set(items);
                }
                Err(err) => log::warn!("trending {kind} failed: {err}"),
            }
        });
    }

    let trending_section = move |title: &'static str, kind: ItemKind, items: RwSignal<Vec<CatalogItem>>| {
        view! {
            <section class="home-page__trending">
                <header>
                    <h2>{title}</h2>
                    <A href=format!("/{}", kind.collection())>"View all"</A>
                </header>
                <Show
                    when=move || !items.get().is_empty()
                    fallback=|| view! { <p class="page__empty">"Nothing trending yet."</p> }
                >
                    <div class="catalog-page__grid">
                        {move || {
                            items.get()
                                .into_iter()
                                .map(|item| view! { <ItemCard kind=kind item=item /> })
                                .collect_view()
                        }}
                    </div>
                </Show>
            </section>
        }
    };

    view! {
        <div class="home-page">
            <section class="home-page__hero">
                <h1>"Olahub"</h1>
                <p>{move || tr(locale.get(), Text::Tagline)}</p>
                <form
                    class="home-page__search"
                    on:submit=move |ev: leptos::ev::SubmitEvent| {
                        ev.prevent_default();
                        navigate(&search_href(&search.get_untracked()), NavigateOptions::default());
                    }
                >
                    <input
                        type="search"
                        placeholder="Search models"
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" type="submit">{move || tr(locale.get(), Text::Search)}</button>
                </form>
            </section>

            <section class="home-page__stats">
                {move || {
                    stat_tiles(&stats.get())
                        .into_iter()
                        .map(|(label, value)| {
                            view! {
                                <div class="stat-tile">
                                    <span class="stat-tile__value">{value}</span>
                                    <span class="stat-tile__label">{label}</span>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </section>

            {trending_section("Trending models", ItemKind::Model, models)}
            {trending_section("Trending datasets", ItemKind::Dataset, datasets)}
        </div>
    }
}
