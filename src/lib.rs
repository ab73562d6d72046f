//! # authgate
//!
//! Leptos + WASM client for a cookie-session backend. The server keeps the
//! session in an `HttpOnly` cookie, so this crate never sees a token: it
//! learns who is signed in by asking `/auth/me` and reacts to expiry signals
//! carried on 401 responses.
//!
//! Layering, bottom up:
//!
//! - [`net`]: request sanitizing, the transport with its expiry hook, typed
//!   endpoint calls.
//! - [`state`]: the session store (bootstrap, login, logout, expiry) and the
//!   home page loader.
//! - [`util`]: route guard decisions and form validation.
//! - [`bootstrap`], [`app`], [`pages`], [`components`]: startup and UI.

pub mod app;
pub mod bootstrap;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

/// Browser entry point invoked by the generated WASM loader.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
