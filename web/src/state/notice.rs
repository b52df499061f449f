//! Transient app-wide notices ("Signed in.", "Signed out.").
//!
//! SYSTEM CONTEXT
//! ==============
//! Auth flows navigate away right after they finish, so their confirmations
//! live in a context signal rendered by the root `NoticeBar` instead of page
//! state. Each notice carries a serial so a clear timer only removes the
//! notice it was started for.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use leptos::prelude::*;

/// How long a notice stays up.
pub const NOTICE_MS: u32 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub serial: u64,
}

impl Notice {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice notice--success",
            NoticeKind::Error => "notice notice--error",
        }
    }
}

/// Current notice, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    pub current: Option<Notice>,
    next_serial: u64,
}

impl NoticeState {
    /// Replace the current notice; returns the serial to clear it by.
    pub fn show(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        self.next_serial += 1;
        self.current = Some(Notice { kind, text: text.into(), serial: self.next_serial });
        self.next_serial
    }

    /// Drop the notice only if it is still the one numbered `serial`.
    pub fn expire(&mut self, serial: u64) {
        if self.current.as_ref().is_some_and(|notice| notice.serial == serial) {
            self.current = None;
        }
    }
}

/// Show `text` and schedule its clear. Components grab the context signal
/// up front since async handlers run outside the reactive owner.
pub fn notify(notices: RwSignal<NoticeState>, kind: NoticeKind, text: &str) {
    let mut serial = 0;
    notices.update(|state| serial = state.show(kind, text));

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(NOTICE_MS).await;
        notices.update(|state| state.expire(serial));
    });
    #[cfg(not(feature = "csr"))]
    log::debug!("notice {serial} stays until replaced outside the browser");
}
