//! Summary card linking to a model or dataset detail page.

use leptos::prelude::*;
use leptos_router::components::A;

use olahub::hub::ItemKind;
use olahub::types::CatalogItem;

use crate::util::format::{format_count, format_date};

/// Number of tags shown on a card before truncating.
const MAX_CARD_TAGS: usize = 3;

pub(crate) fn detail_href(kind: ItemKind, id: &str) -> String {
    format!("/{}/{id}", kind.collection())
}

#[component]
pub fn ItemCard(kind: ItemKind, item: CatalogItem) -> impl IntoView {
    let href = detail_href(kind, &item.id);
    let tags = item.tags.iter().take(MAX_CARD_TAGS).cloned().collect::<Vec<_>>();
    let updated = item.last_updated.as_deref().map(format_date).map(str::to_owned);

    view! {
        <article class="item-card">
            <A href=href attr:class="item-card__title">{item.name.clone()}</A>
            <p class="item-card__author">{item.author.clone()}</p>
            <p class="item-card__description">{item.description.clone()}</p>
            <div class="item-card__tags">
                {tags.into_iter().map(|tag| view! { <span class="tag">{tag}</span> }).collect_view()}
            </div>
            <footer class="item-card__meta">
                <span title="Downloads">"⤓ " {format_count(item.downloads)}</span>
                <span title="Stars">"★ " {format_count(item.stars)}</span>
                {updated.map(|date| view! { <span class="item-card__updated">{date}</span> })}
            </footer>
        </article>
    }
}
