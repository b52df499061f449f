//! Banner for the app-wide notice context.

use leptos::prelude::*;

use crate::state::notice::NoticeState;

#[component]
pub fn NoticeBar() -> impl IntoView {
    let notices = expect_context::<RwSignal<NoticeState>>();

    move || {
        notices.get().current.map(|notice| {
            let serial = notice.serial;
            let class = notice.class();
            view! {
                <p class=class role="status" on:click=move |_| notices.update(|state| state.expire(serial))>
                    {notice.text}
                </p>
            }
        })
    }
}
