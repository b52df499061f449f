//! Browser front end for the Olahub hub.
//!
//! ARCHITECTURE
//! ============
//! `app` is the composition root: it wires the core `ApiClient` and
//! `SessionManager` to browser adapters (`net::transport`, `util::storage`)
//! and exposes them to pages through Leptos context. Pages own route-level
//! orchestration; pure helpers sit beside them with unit tests.
//!
//! Browser-only glue is compiled behind the `csr` feature so the crate still
//! builds and tests natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install browser logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
