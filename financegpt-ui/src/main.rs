//! FinanceGPT Web Client
//!
//! Browser front end for the FinanceGPT financial assistant built with
//! Leptos (WASM).
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application. Screen selection, form
//! submission and the streaming chat state machine come from the
//! `financegpt` crate; this crate renders them, talks REST through
//! gloo-net and streams answers over a browser WebSocket.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
