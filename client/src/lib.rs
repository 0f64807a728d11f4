//! # client
//!
//! Leptos + WASM front-end for DevHive, a project collaboration app.
//!
//! This crate contains the route access gate, the persisted session and the
//! auth state machine, the identity-switch teardown that keeps one user's
//! socket and cached results from leaking into the next, and the pages that
//! sit behind them. The `devhive` host crate renders it with SSR and serves
//! the hydrated bundle.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
