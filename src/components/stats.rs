//! Stat Cards
//!
//! Aggregate figures derived from the latest stats snapshot: total
//! detections, dominant emotion, and weighted average confidence. Every
//! value is recomputed from the snapshot alone.

use leptos::*;

use crate::emotions::{emoji_for, weighted_avg_confidence};
use crate::state::AppState;

/// Row of aggregate stat cards
#[component]
pub fn StatCards() -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
            <TotalCard />
            <DominantCard />
            <ConfidenceCard />
        </div>
    }
}

#[component]
fn TotalCard() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <span class="text-gray-400 text-sm">"Total detections"</span>
            <div class="text-3xl font-bold mt-2">
                {move || state.total_detections()}
            </div>
            <span class="text-gray-500 text-xs">"last 24 hours"</span>
        </div>
    }
}

/// Dominant emotion card.
///
/// A snapshot without a dominant emotion leaves the previous value on
/// screen, so the card only ever moves forward.
#[component]
fn DominantCard() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");
    let dominant = create_rw_signal(None::<(String, u64)>);

    create_effect(move |_| {
        if let Some(stats) = state.stats.get() {
            if let Some(label) = stats.dominant_emotion.clone() {
                let count = stats.emotions.get(&label).map(|b| b.count).unwrap_or(0);
                dominant.set(Some((label, count)));
            }
        }
    });

    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <span class="text-gray-400 text-sm">"Dominant emotion"</span>
            {move || {
                match dominant.get() {
                    Some((label, count)) => view! {
                        <div class="flex items-center space-x-3 mt-2">
                            <span class="text-3xl">{emoji_for(&label)}</span>
                            <div>
                                <div class="text-lg font-semibold">{label.clone()}</div>
                                <div class="text-gray-500 text-xs">
                                    {format!("{} detections", count)}
                                </div>
                            </div>
                        </div>
                    }.into_view(),
                    None => view! {
                        <div class="text-3xl font-bold mt-2 text-gray-500">"—"</div>
                    }.into_view(),
                }
            }}
        </div>
    }
}

#[component]
fn ConfidenceCard() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    let percent = create_memo(move |_| {
        state
            .stats
            .get()
            .map(|s| weighted_avg_confidence(&s.emotions))
            .unwrap_or(0)
    });

    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <span class="text-gray-400 text-sm">"Average confidence"</span>
            <div class="text-3xl font-bold mt-2">
                {move || format!("{}%", percent.get())}
            </div>
            <span class="text-gray-500 text-xs">"weighted by detection count"</span>
        </div>
    }
}
