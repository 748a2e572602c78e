//! # postboard
//!
//! Leptos + WASM frontend shell for the postboard blogging platform.
//!
//! The crate holds the route table and navigation guard (`router`), the REST
//! client for the backend (`net`), and thin pages that call it. All business
//! rules live in the backend; this crate decides who may see which page and
//! normalizes how requests and failures look.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod router;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if let Err(err) = console_log::init_with_level(level) {
        leptos::logging::warn!("console logger unavailable: {err}");
    }
    leptos::mount::mount_to_body(app::App);
}
