//! Dashboard Page
//!
//! The single dashboard view: live video feed, stat cards, both charts,
//! and the recent-detections list. Owns the initial REST fetches and the
//! two 30-second poll loops.

use leptos::*;

use crate::api;
use crate::components::{DistributionChart, HourlyChart, RecentList, StatCards, VideoPanel};
use crate::state::AppState;

/// Poll interval for the stats and recent endpoints.
const POLL_INTERVAL_MS: u32 = 30_000;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    // Initial fetches on mount
    let initial_state = state.clone();
    create_effect(move |_| {
        let state = initial_state.clone();
        spawn_local(async move {
            load_stats(&state).await;
            load_recent(&state).await;
            load_hourly(&state).await;
        });
    });

    // The polls run regardless of push-channel health; a silently-dead
    // data channel still leaves the dashboard at most 30 s stale.
    let stats_state = state.clone();
    let stats_poll = gloo_timers::callback::Interval::new(POLL_INTERVAL_MS, move || {
        let state = stats_state.clone();
        spawn_local(async move { load_stats(&state).await });
    });

    let recent_state = state;
    let recent_poll = gloo_timers::callback::Interval::new(POLL_INTERVAL_MS, move || {
        let state = recent_state.clone();
        spawn_local(async move { load_recent(&state).await });
    });

    // Stop polling when the page unmounts, symmetric with channel teardown
    on_cleanup(move || {
        stats_poll.cancel();
        recent_poll.cancel();
    });

    view! {
        <div class="space-y-8">
            <StatCards />

            <div class="grid lg:grid-cols-2 gap-8">
                <VideoPanel />
                <DistributionChart />
            </div>

            <HourlyChart />

            <RecentList />
        </div>
    }
}

/// Fetch the stats snapshot; a failure is logged and the update skipped.
async fn load_stats(state: &AppState) {
    match api::fetch_stats().await {
        Ok(stats) => state.stats.set(Some(stats)),
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to fetch stats: {}", e).into());
        }
    }
}

/// Fetch the recent-detections list.
async fn load_recent(state: &AppState) {
    match api::fetch_recent(api::client::RECENT_LIMIT).await {
        Ok(entries) => state.recent.set(entries),
        Err(e) => {
            web_sys::console::error_1(
                &format!("Failed to fetch recent detections: {}", e).into(),
            );
        }
    }
}

/// Fetch the hourly breakdown.
async fn load_hourly(state: &AppState) {
    match api::fetch_hourly().await {
        Ok(hourly) => state.hourly.set(hourly),
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to fetch hourly data: {}", e).into());
        }
    }
}
