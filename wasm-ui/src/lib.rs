//! Web UI for users-rs
//!
//! A Yew single-page interface with a create form, an update form and a
//! table of users, talking to the hosted table from the browser.

mod app;
mod components;
mod store;

use wasm_bindgen::prelude::*;

/// Entry point for the WASM application.
#[wasm_bindgen(start)]
pub fn run_app() {
    // Initialize panic hook for better error messages
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    // Mount the Yew app
    yew::Renderer::<app::App>::new().render();
}
