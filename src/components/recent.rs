//! Recent Detections List
//!
//! The last detections (newest first), fully replaced on every fetch, with
//! a manual refresh action alongside the 30-second poll.

use leptos::*;

use crate::api;
use crate::emotions::{confidence_percent, emoji_for};
use crate::state::global::RecentDetection;
use crate::state::AppState;

/// Display model for one recent-detection row.
#[derive(Clone, Debug, PartialEq)]
pub struct RecentRow {
    pub emoji: &'static str,
    pub emotion: String,
    pub time: String,
    pub percent: u32,
}

/// What the list renders: an explicit empty-state message or the rows.
#[derive(Clone, Debug, PartialEq)]
pub enum RecentContent {
    Empty,
    Rows(Vec<RecentRow>),
}

/// Project the fetched entries onto the list content.
///
/// Zero entries yield the explicit empty state, never a bare container.
pub fn recent_content(entries: &[RecentDetection]) -> RecentContent {
    if entries.is_empty() {
        return RecentContent::Empty;
    }

    let rows = entries
        .iter()
        .map(|entry| RecentRow {
            emoji: emoji_for(&entry.emotion),
            emotion: entry.emotion.clone(),
            time: entry.time_label(),
            percent: confidence_percent(entry.confidence),
        })
        .collect();

    RecentContent::Rows(rows)
}

/// Recent detections panel
#[component]
pub fn RecentList() -> impl IntoView {
    let state = use_context::<AppState>().expect("AppState not found");

    let refresh_state = state.clone();
    let on_refresh = move |_| {
        let state = refresh_state.clone();
        spawn_local(async move {
            match api::fetch_recent(api::client::RECENT_LIMIT).await {
                Ok(entries) => state.recent.set(entries),
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("Failed to refresh recent detections: {}", e).into(),
                    );
                }
            }
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-xl font-semibold">"Recent Detections"</h2>
                <button
                    on:click=on_refresh
                    class="px-3 py-1 rounded-lg text-sm bg-gray-700 text-gray-300 hover:bg-gray-600 transition-colors"
                >
                    "Refresh"
                </button>
            </div>

            <div class="space-y-2">
                {move || {
                    match recent_content(&state.recent.get()) {
                        RecentContent::Empty => view! {
                            <p class="text-gray-400 text-sm text-center py-4">
                                "No recent detections"
                            </p>
                        }.into_view(),
                        RecentContent::Rows(rows) => rows.into_iter().map(|row| {
                            view! {
                                <div class="flex items-center justify-between py-2 border-b border-gray-700 last:border-0">
                                    <div class="flex items-center space-x-3">
                                        <span class="text-2xl">{row.emoji}</span>
                                        <div>
                                            <div class="font-medium">{row.emotion.clone()}</div>
                                            <div class="text-gray-400 text-sm">{row.time.clone()}</div>
                                        </div>
                                    </div>
                                    <span class="font-semibold text-gray-300">
                                        {format!("{}%", row.percent)}
                                    </span>
                                </div>
                            }
                        }).collect_view(),
                    }
                }}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(emotion: &str, confidence: f64, timestamp: &str) -> RecentDetection {
        RecentDetection {
            emotion: emotion.to_string(),
            confidence,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_zero_entries_render_empty_state() {
        assert_eq!(recent_content(&[]), RecentContent::Empty);
    }

    #[test]
    fn test_entries_render_rows_in_order() {
        let entries = vec![
            detection("Felicidad", 0.93, "2025-03-14T09:26:53.589793"),
            detection("Tristeza", 0.5, "2025-03-14T09:25:01.000000"),
        ];

        let RecentContent::Rows(rows) = recent_content(&entries) else {
            panic!("expected rows");
        };

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].emotion, "Felicidad");
        assert_eq!(rows[0].emoji, "😊");
        assert_eq!(rows[0].time, "09:26");
        assert_eq!(rows[0].percent, 93);
        assert_eq!(rows[1].emotion, "Tristeza");
        assert_eq!(rows[1].percent, 50);
    }

    #[test]
    fn test_unknown_label_row_uses_fallback_glyph() {
        let entries = vec![detection("Aburrimiento", 0.4, "not-a-timestamp")];

        let RecentContent::Rows(rows) = recent_content(&entries) else {
            panic!("expected rows");
        };

        assert_eq!(rows[0].emoji, crate::emotions::FALLBACK_EMOJI);
        assert_eq!(rows[0].time, "not-a-timestamp");
    }
}
