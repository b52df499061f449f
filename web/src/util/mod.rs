//! Utility helpers shared across pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, navigation) and pure
//! formatting from page logic so both stay testable without a DOM.

pub mod auth;
pub mod clipboard;
pub mod format;
pub mod i18n;
pub mod storage;
