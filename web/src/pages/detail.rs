//! Detail page for one model or dataset.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public route keyed by `:id`. Loads the item, records a view, and offers
//! star toggling (signed-in users only), file downloads, and copy buttons for
//! the page link and usage snippets.
//!
//! DESIGN
//! ======
//! Download progress is cosmetic: while the download request is in flight a
//! ticker adds a random 0-9 percent every 300 ms, capped at 95; the bar jumps
//! to 100 when the request resolves and clears shortly after.

#[cfg(test)]
#[path = "detail_test.rs"]
mod detail_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use pulldown_cmark::{Event, Options, Parser, html};

use olahub::hub::ItemKind;
use olahub::types::ItemDetail;

use crate::app::AppServices;
use crate::pages::api_error_message;
use crate::state::auth::AuthState;
use crate::util::clipboard::{copy_text, current_href};
use crate::util::format::{format_count, format_date};
use crate::util::i18n::{Locale, Text, tr};

pub(crate) const DOWNLOAD_TICK_MS: u64 = 300;
pub(crate) const DOWNLOAD_CAP: u8 = 95;
pub(crate) const DOWNLOAD_CLEAR_MS: u64 = 500;

// =============================================================================
// PURE STATE
// =============================================================================

/// Simulated progress for one file download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DownloadProgress {
    pub file: String,
    pub percent: u8,
    pub done: bool,
}

impl DownloadProgress {
    pub(crate) fn start(file: &str) -> Self {
        Self { file: file.to_owned(), percent: 0, done: false }
    }

    /// Advance by `step` percent without passing the cap. No-op once done.
    #[must_use]
    pub(crate) fn tick(self, step: u8) -> Self {
        if self.done {
            return self;
        }
        let percent = self.percent.saturating_add(step).min(DOWNLOAD_CAP);
        Self { percent, ..self }
    }

    #[must_use]
    pub(crate) fn finish(self) -> Self {
        Self { percent: 100, done: true, ..self }
    }
}

/// Star flag and count as shown on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StarState {
    pub starred: bool,
    pub count: u64,
}

impl StarState {
    pub(crate) fn from_detail(item: &ItemDetail) -> Self {
        Self { starred: item.is_starred, count: item.stars }
    }

    /// State after a successful star or unstar call.
    #[must_use]
    pub(crate) fn toggled(self) -> Self {
        if self.starred {
            Self { starred: false, count: self.count.saturating_sub(1) }
        } else {
            Self { starred: true, count: self.count.saturating_add(1) }
        }
    }
}

/// Render markdown to HTML, dropping raw HTML blocks and inline tags.
pub(crate) fn render_markdown_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(_) | Event::InlineHtml(_) => None,
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Message for a finished copy attempt: `done` on success, a failure notice
/// otherwise.
pub(crate) fn copy_outcome(copied: bool, done: Text) -> Text {
    if copied { done } else { Text::CopyFailed }
}

/// Random progress step in `0..=9`.
fn random_step() -> u8 {
    #[cfg(feature = "csr")]
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step = (js_sys::Math::random() * 10.0).floor() as u8;
        step.min(9)
    }
    #[cfg(not(feature = "csr"))]
    {
        5
    }
}

async fn sleep_ms(ms: u64) {
    #[cfg(feature = "csr")]
    gloo_timers::future::sleep(std::time::Duration::from_millis(ms)).await;
    #[cfg(not(feature = "csr"))]
    let _ = ms;
}

// =============================================================================
// PAGE
// =============================================================================

#[component]
pub fn DetailPage(kind: ItemKind) -> impl IntoView {
    let services = expect_context::<AppServices>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let locale = expect_context::<RwSignal<Locale>>();
    let params = use_params_map();
    let item_id = move || params.read().get("id").unwrap_or_default();

    let detail = RwSignal::new(None::<ItemDetail>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let star = RwSignal::new(StarState::default());
    let notice = RwSignal::new(None::<String>);
    let progress = RwSignal::new(None::<DownloadProgress>);

    let hub = services.hub.clone();
    Effect::new(move || {
        let id = item_id();
        if id.is_empty() {
            return;
        }
        loading.set(true);
        let hub = hub.clone();
        leptos::task::spawn_local(async move {
            match hub.detail(kind, &id).await {
                Ok(item) => {
                    star.set(StarState::from_detail(&item));
                    detail.set(Some(item));
                    error.set(None);
                    loading.set(false);
                    if let Err(err) = hub.record_view(kind, &id).await {
                        log::debug!("view not recorded for {id}: {err}");
                    }
                }
                Err(err) => {
                    detail.set(None);
                    error.set(Some(api_error_message(&err)));
                    loading.set(false);
                }
            }
        });
    });

    let hub = services.hub.clone();
    let on_star = move |()| {
        if auth.get_untracked().user.is_none() {
            notice.set(Some("Sign in to star items.".to_owned()));
            return;
        }
        let current = star.get_untracked();
        let id = item_id();
        let hub = hub.clone();
        leptos::task::spawn_local(async move {
            let result = if current.starred { hub.unstar(kind, &id).await } else { hub.star(kind, &id).await };
            match result {
                Ok(()) => star.set(current.toggled()),
                Err(err) => notice.set(Some(api_error_message(&err))),
            }
        });
    };

    let hub = services.hub.clone();
    let start_download = move |file_name: String| {
        if progress.get_untracked().is_some_and(|p| !p.done) {
            return;
        }
        progress.set(Some(DownloadProgress::start(&file_name)));

        #[cfg(feature = "csr")]
        {
            let ticking = file_name.clone();
            leptos::task::spawn_local(async move {
                loop {
                    sleep_ms(DOWNLOAD_TICK_MS).await;
                    match progress.get_untracked() {
                        Some(p) if !p.done && p.file == ticking => progress.set(Some(p.tick(random_step()))),
                        _ => break,
                    }
                }
            });
        }

        let id = item_id();
        let hub = hub.clone();
        leptos::task::spawn_local(async move {
            match hub.request_download(kind, &id, &file_name).await {
                Ok(_) => {
                    progress.update(|p| *p = p.take().map(DownloadProgress::finish));
                    notice.set(Some(format!("{file_name} downloaded.")));
                    sleep_ms(DOWNLOAD_CLEAR_MS).await;
                    progress.set(None);
                }
                Err(err) => {
                    progress.set(None);
                    notice.set(Some(api_error_message(&err)));
                }
            }
        });
    };

    let on_copy = move |(text, done): (Option<String>, Text)| {
        let copied = text.is_some_and(|text| copy_text(&text));
        let message = tr(locale.get_untracked(), copy_outcome(copied, done));
        notice.set(Some(message.to_owned()));
    };

    view! {
        <div class="detail-page">
            <Show when=move || notice.get().is_some()>
                <p class="detail-page__notice" on:click=move |_| notice.set(None)>
                    {move || notice.get().unwrap_or_default()}
                </p>
            </Show>
            <Show when=move || error.get().is_some()>
                <p class="detail-page__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || loading.get()>
                <p class="detail-page__loading">"Loading..."</p>
            </Show>
            {move || {
                let start_download = start_download.clone();
                let on_star = on_star.clone();
                detail
                    .get()
                    .map(|item| {
                        view! {
                            <DetailBody
                                kind=kind
                                item=item
                                star=star
                                progress=progress
                                on_star=Callback::new(on_star)
                                on_download=Callback::new(start_download)
                                on_copy=Callback::new(on_copy)
                            />
                        }
                    })
            }}
        </div>
    }
}

#[component]
fn DetailBody(
    kind: ItemKind,
    item: ItemDetail,
    star: RwSignal<StarState>,
    progress: RwSignal<Option<DownloadProgress>>,
    on_star: Callback<()>,
    on_download: Callback<String>,
    on_copy: Callback<(Option<String>, Text)>,
) -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    let description_html = render_markdown_html(&item.long_description);
    let author_href = format!("/profile/{}", item.author);
    let facts = [
        ("Framework", item.framework.clone()),
        ("Task", item.task.clone()),
        ("License", item.license.clone()),
        ("Size", item.size.clone()),
        ("Languages", (!item.language.is_empty()).then(|| item.language.join(", "))),
        ("Samples", item.sample_count.map(format_count)),
        ("Created", item.created_at.as_deref().map(|d| format_date(d).to_owned())),
        ("Updated", item.last_updated.as_deref().map(|d| format_date(d).to_owned())),
    ];

    let files = item.files.clone();
    let versions = item.versions.clone();
    let schema = item.schema.clone();
    let samples = item.samples.clone();
    let usage = item.usage_code.clone();

    view! {
        <header class="detail-page__header">
            <span class="detail-page__kind">{kind.to_string()}</span>
            <h1>{item.name.clone()}</h1>
            <A href=author_href attr:class="detail-page__author">{item.author.clone()}</A>
            <p class="detail-page__description">{item.description.clone()}</p>
            <div class="detail-page__tags">
                {item.tags.iter().map(|tag| view! { <span class="tag">{tag.clone()}</span> }).collect_view()}
            </div>
            <div class="detail-page__actions">
                <button class="btn" on:click=move |_| on_star.run(())>
                    {move || if star.get().starred { "★ Starred" } else { "☆ Star" }}
                </button>
                <button class="btn" on:click=move |_| on_copy.run((current_href(), Text::LinkCopied))>
                    {move || tr(locale.get(), Text::CopyLink)}
                </button>
            </div>
        </header>

        <section class="detail-page__stats">
            <div class="stat"><span class="stat__value">{format_count(item.downloads)}</span>" downloads"</div>
            <div class="stat"><span class="stat__value">{move || format_count(star.get().count)}</span>" stars"</div>
            <div class="stat"><span class="stat__value">{format_count(item.views)}</span>" views"</div>
        </section>

        <section class="detail-page__facts">
            <dl>
                {facts
                    .into_iter()
                    .filter_map(|(label, value)| value.map(|value| view! { <dt>{label}</dt><dd>{value}</dd> }))
                    .collect_view()}
            </dl>
        </section>

        <section class="detail-page__overview markdown-body" inner_html=description_html></section>

        <section class="detail-page__files">
            <h2>"Files"</h2>
            <Show when={
                let empty = files.is_empty();
                move || empty
            }>
                <p class="page__empty">"No files published."</p>
            </Show>
            <ul>
                {files
                    .into_iter()
                    .map(|file| {
                        let name = file.name.clone();
                        let tracked = file.name.clone();
                        let shown = file.name.clone();
                        let active = move || progress.get().filter(|p| p.file == tracked);
                        view! {
                            <li class="file-row">
                                <span class="file-row__name">{shown}</span>
                                <span class="file-row__size">{file.size.clone()}</span>
                                <button
                                    class="btn"
                                    disabled=move || progress.get().is_some_and(|p| !p.done)
                                    on:click=move |_| on_download.run(name.clone())
                                >
                                    "Download"
                                </button>
                                {move || {
                                    active()
                                        .map(|p| {
                                            view! {
                                                <div class="progress">
                                                    <div class="progress__bar" style=format!("width: {}%", p.percent)></div>
                                                    <span class="progress__label">{format!("{}%", p.percent)}</span>
                                                </div>
                                            }
                                        })
                                }}
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </section>

        {(!versions.is_empty())
            .then(|| {
                view! {
                    <section class="detail-page__versions">
                        <h2>"Versions"</h2>
                        <ul>
                            {versions
                                .into_iter()
                                .map(|v| {
                                    view! {
                                        <li>
                                            <strong>{v.version}</strong>
                                            " "
                                            <span class="muted">{format_date(&v.date).to_owned()}</span>
                                            <p>{v.description}</p>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    </section>
                }
            })}

        {(!schema.is_empty())
            .then(|| {
                view! {
                    <section class="detail-page__schema">
                        <h2>"Schema"</h2>
                        <table>
                            <thead><tr><th>"Field"</th><th>"Type"</th><th>"Description"</th></tr></thead>
                            <tbody>
                                {schema
                                    .into_iter()
                                    .map(|f| view! { <tr><td>{f.field}</td><td>{f.kind}</td><td>{f.description}</td></tr> })
                                    .collect_view()}
                            </tbody>
                        </table>
                    </section>
                }
            })}

        {(!samples.is_empty())
            .then(|| {
                view! {
                    <section class="detail-page__samples">
                        <h2>"Samples"</h2>
                        {samples
                            .iter()
                            .map(|sample| {
                                let text = serde_json::to_string_pretty(sample).unwrap_or_else(|_| sample.to_string());
                                view! { <pre class="code-block">{text}</pre> }
                            })
                            .collect_view()}
                    </section>
                }
            })}

        {(!usage.python.is_empty())
            .then(|| {
                let python = usage.python.clone();
                view! {
                    <section class="detail-page__usage">
                        <h2>"Usage"</h2>
                        <h3>"Python"</h3>
                        <UsageSnippet code=python on_copy=on_copy />
                        {usage
                            .javascript
                            .clone()
                            .map(|js| view! { <h3>"JavaScript"</h3><UsageSnippet code=js on_copy=on_copy /> })}
                    </section>
                }
            })}
    }
}

/// Code block with a copy button in its corner.
#[component]
fn UsageSnippet(code: String, on_copy: Callback<(Option<String>, Text)>) -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    let copied = code.clone();
    view! {
        <div class="code-snippet">
            <button
                class="btn code-snippet__copy"
                on:click=move |_| on_copy.run((Some(copied.clone()), Text::Copied))
            >
                {move || tr(locale.get(), Text::Copy)}
            </button>
            <pre class="code-block">{code}</pre>
        </div>
    }
}
