//! Catalog list page for models or datasets.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public route. Search, sort, filters and pagination live in one
//! `CatalogQuery` signal; every change refetches the page. A failed fetch
//! shows an empty list rather than an error screen.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use olahub::hub::{CatalogPage as Page, CatalogQuery, ItemKind, PAGE_SIZES, SortKey};

use crate::app::AppServices;
use crate::components::item_card::ItemCard;
use crate::pages::FetchTicket;

pub(crate) const TASK_OPTIONS: &[&str] = &[
    "text-classification",
    "token-classification",
    "question-answering",
    "translation",
    "sentiment-analysis",
    "image-classification",
    "object-detection",
    "speech-recognition",
    "text-to-speech",
];

pub(crate) const LANGUAGE_OPTIONS: &[&str] = &[
    "zh", "en", "multilingual", "ja", "ko", "fr", "de", "ru", "es", "pt", "ar",
];

/// Sort keys offered for `kind`. Sample count only applies to datasets.
pub(crate) fn sort_options(kind: ItemKind) -> &'static [SortKey] {
    match kind {
        ItemKind::Model => &SortKey::ALL[..4],
        ItemKind::Dataset => &SortKey::ALL,
    }
}

pub(crate) fn sort_label(key: SortKey) -> &'static str {
    match key {
        SortKey::Downloads => "Most downloads",
        SortKey::Stars => "Most stars",
        SortKey::Newest => "Newest",
        SortKey::Oldest => "Oldest",
        SortKey::Samples => "Most samples",
    }
}

/// Starting query, seeded from a `?q=` search carried over from the home page.
pub(crate) fn initial_query(search: Option<String>) -> CatalogQuery {
    CatalogQuery { search: search.unwrap_or_default(), ..CatalogQuery::default() }
}

// Every filter change returns to the first page.

pub(crate) fn with_search(query: CatalogQuery, search: &str) -> CatalogQuery {
    CatalogQuery { search: search.trim().to_owned(), page: 1, ..query }
}

pub(crate) fn with_sort(query: CatalogQuery, sort: SortKey) -> CatalogQuery {
    CatalogQuery { sort, page: 1, ..query }
}

pub(crate) fn with_page_size(query: CatalogQuery, limit: u32) -> CatalogQuery {
    let limit = if PAGE_SIZES.contains(&limit) { limit } else { query.limit };
    CatalogQuery { limit, page: 1, ..query }
}

pub(crate) fn with_toggled_task(query: CatalogQuery, task: &str) -> CatalogQuery {
    let tasks = toggle_value(&query.tasks, task);
    CatalogQuery { tasks, page: 1, ..query }
}

pub(crate) fn with_toggled_language(query: CatalogQuery, language: &str) -> CatalogQuery {
    let languages = toggle_value(&query.languages, language);
    CatalogQuery { languages, page: 1, ..query }
}

/// Reset search, sort and filters; the page size stays.
pub(crate) fn cleared(query: &CatalogQuery) -> CatalogQuery {
    CatalogQuery { limit: query.limit, ..CatalogQuery::default() }
}

/// Move to `page`, clamped to the pages `total` allows.
pub(crate) fn with_page(query: CatalogQuery, page: u32, total: u64) -> CatalogQuery {
    let last = u32::try_from(query.page_count(total)).unwrap_or(u32::MAX).max(1);
    CatalogQuery { page: page.clamp(1, last), ..query }
}

fn toggle_value(values: &[String], value: &str) -> Vec<String> {
    if values.iter().any(|v| v == value) {
        values.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = values.to_vec();
        next.push(value.to_owned());
        next
    }
}

fn heading(kind: ItemKind) -> (&'static str, &'static str) {
    match kind {
        ItemKind::Model => ("Models", "Browse and download pretrained models."),
        ItemKind::Dataset => ("Datasets", "Browse and download datasets to train your models."),
    }
}

#[component]
pub fn CatalogPage(kind: ItemKind) -> impl IntoView {
    let services = expect_context::<AppServices>();
    let search_param = use_query_map().get_untracked().get("q");

    let query = RwSignal::new(initial_query(search_param));
    let search_input = RwSignal::new(query.get_untracked().search);
    let page = RwSignal::new(Page::default());
    let loading = RwSignal::new(true);
    let filters_open = RwSignal::new(false);
    let latest = StoredValue::new(FetchTicket::default());

    let hub = services.hub.clone();
    Effect::new(move || {
        let current = query.get();
        let ticket = latest.get_value().next();
        latest.set_value(ticket);
        loading.set(true);
        let hub = hub.clone();
        leptos::task::spawn_local(async move {
            let result = hub.list(kind, &current).await;
            if latest.get_value() != ticket {
                return;
            }
            match result {
                Ok(next) => page.set(next),
                Err(err) => {
                    log::warn!("{} list failed: {err}", kind.collection());
                    page.set(Page::default());
                }
            }
            loading.set(false);
        });
    });

    let (title, subtitle) = heading(kind);
    let total_pages = move || query.get().page_count(page.get().total).max(1);

    view! {
        <div class="catalog-page">
            <header class="catalog-page__header">
                <h1>{title}</h1>
                <p class="catalog-page__subtitle">{subtitle}</p>
            </header>

            <div class="catalog-page__controls">
                <form
                    class="catalog-page__search"
                    on:submit=move |ev: leptos::ev::SubmitEvent| {
                        ev.prevent_default();
                        query.update(|q| *q = with_search(q.clone(), &search_input.get_untracked()));
                    }
                >
                    <input
                        type="search"
                        placeholder="Search by name, description or author"
                        prop:value=move || search_input.get()
                        on:input=move |ev| search_input.set(event_target_value(&ev))
                    />
                    <button class="btn" type="submit">"Search"</button>
                </form>
                <select
                    class="catalog-page__sort"
                    on:change=move |ev| {
                        if let Some(sort) = SortKey::parse(&event_target_value(&ev)) {
                            query.update(|q| *q = with_sort(q.clone(), sort));
                        }
                    }
                >
                    {sort_options(kind)
                        .iter()
                        .map(|&key| {
                            view! {
                                <option value=key.as_str() selected=move || query.get().sort == key>
                                    {sort_label(key)}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button class="btn" on:click=move |_| filters_open.update(|open| *open = !*open)>
                    "Filters"
                </button>
            </div>

            <Show when=move || filters_open.get()>
                <section class="catalog-page__filters">
                    <fieldset>
                        <legend>"Tasks"</legend>
                        {TASK_OPTIONS
                            .iter()
                            .map(|&task| {
                                view! {
                                    <label class="filter-option">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || query.get().tasks.iter().any(|t| t == task)
                                            on:change=move |_| query.update(|q| *q = with_toggled_task(q.clone(), task))
                                        />
                                        {task}
                                    </label>
                                }
                            })
                            .collect_view()}
                    </fieldset>
                    <fieldset>
                        <legend>"Languages"</legend>
                        {LANGUAGE_OPTIONS
                            .iter()
                            .map(|&language| {
                                view! {
                                    <label class="filter-option">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || query.get().languages.iter().any(|l| l == language)
                                            on:change=move |_| query.update(|q| *q = with_toggled_language(q.clone(), language))
                                        />
                                        {language}
                                    </label>
                                }
                            })
                            .collect_view()}
                    </fieldset>
                    <button
                        class="btn"
                        on:click=move |_| {
                            search_input.set(String::new());
                            query.update(|q| *q = cleared(q));
                        }
                    >
                        "Clear filters"
                    </button>
                </section>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! { <p class="catalog-page__loading">"Loading..."</p> }
            >
                <Show
                    when=move || !page.get().items.is_empty()
                    fallback=|| view! { <p class="page__empty">"Nothing found."</p> }
                >
                    <div class="catalog-page__grid">
                        {move || {
                            page.get()
                                .items
                                .into_iter()
                                .map(|item| view! { <ItemCard kind=kind item=item /> })
                                .collect_view()
                        }}
                    </div>
                </Show>
            </Show>

            <nav class="pagination">
                <button
                    class="btn"
                    disabled=move || query.get().page <= 1
                    on:click=move |_| {
                        let total = page.get_untracked().total;
                        query.update(|q| *q = with_page(q.clone(), q.page.saturating_sub(1), total));
                    }
                >
                    "Previous"
                </button>
                <span class="pagination__status">
                    {move || format!("Page {} of {} ({} total)", query.get().page, total_pages(), page.get().total)}
                </span>
                <button
                    class="btn"
                    disabled=move || u64::from(query.get().page) >= total_pages()
                    on:click=move |_| {
                        let total = page.get_untracked().total;
                        query.update(|q| *q = with_page(q.clone(), q.page.saturating_add(1), total));
                    }
                >
                    "Next"
                </button>
                <select on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                        query.update(|q| *q = with_page_size(q.clone(), size));
                    }
                }>
                    {PAGE_SIZES
                        .iter()
                        .map(|&size| {
                            view! {
                                <option value=size.to_string() selected=move || query.get().limit == size>
                                    {format!("{size} / page")}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </nav>
        </div>
    }
}
