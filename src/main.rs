//! Emotion Detection Dashboard
//!
//! Real-time dashboard for the emotion detection service, built with
//! Leptos (WASM).
//!
//! # Features
//!
//! - Live video feed over WebSocket with per-frame classification results
//! - Aggregate statistics with distribution and hourly charts
//! - Auto-reconnecting channels plus 30-second REST polling as a fallback
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the emotion service over two WebSockets
//! (`/ws/video`, `/ws/data`) and three REST endpoints.

use leptos::*;

mod api;
mod app;
mod components;
mod emotions;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
