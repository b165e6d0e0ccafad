//! App Root Component
//!
//! Provides the application context, opens both WebSocket channels, and
//! closes them again on teardown.

use leptos::*;

use crate::pages::Dashboard;
use crate::state::global::{provide_app_state, AppState};
use crate::state::init_channels;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    let state = use_context::<AppState>().expect("AppState not found");
    let channels = init_channels(state.clone());

    // Best-effort release of both sockets when the app unmounts
    on_cleanup(move || channels.close_all());

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <Header />

            <main class="flex-1 container mx-auto px-4 py-8">
                <Dashboard />
            </main>
        </div>
    }
}

/// Header with brand and today's detection count
#[component]
fn Header() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <div class="flex items-center space-x-3">
                        <span class="text-2xl">"🎭"</span>
                        <span class="text-xl font-bold text-white">"Emotion Dashboard"</span>
                    </div>

                    <div class="text-sm text-gray-400">
                        {move || format!("{} detections today", state.total_detections())}
                    </div>
                </div>
            </div>
        </header>
    }
}
