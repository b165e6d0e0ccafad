//! Application State
//!
//! Reactive state shared across the dashboard, using Leptos signals. Every
//! update is a wholesale replacement of the previous value; nothing here is
//! accumulated across snapshots.

use leptos::*;
use std::collections::HashMap;

use super::channel::ChannelStatus;

/// Hour-of-day ("0".."23") to per-label detection counts.
pub type HourlyBreakdown = HashMap<String, HashMap<String, u64>>;

/// Application context provided to all components.
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle state of the video channel (drives the status pill)
    pub video_status: RwSignal<ChannelStatus>,
    /// Latest hex-encoded JPEG frame from the video channel
    pub current_frame: RwSignal<Option<String>>,
    /// Latest classification result, overwritten per frame
    pub current_emotion: RwSignal<Option<EmotionReading>>,
    /// Latest stats snapshot (push or poll, whichever arrived last)
    pub stats: RwSignal<Option<EmotionStats>>,
    /// Recent detections, newest first, fully replaced each fetch
    pub recent: RwSignal<Vec<RecentDetection>>,
    /// Per-hour detection counts from the hourly endpoint
    pub hourly: RwSignal<HourlyBreakdown>,
}

/// A single classification result attached to a video frame.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct EmotionReading {
    pub emotion: String,
    pub confidence: f64,
}

/// Aggregate statistics snapshot from the backend.
///
/// Extra fields the backend sends (e.g. `period_hours`) are ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct EmotionStats {
    #[serde(default)]
    pub total_detections: u64,
    #[serde(default)]
    pub dominant_emotion: Option<String>,
    #[serde(default)]
    pub emotions: HashMap<String, EmotionBucket>,
}

/// Per-label aggregate within a stats snapshot.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct EmotionBucket {
    pub count: u64,
    pub avg_confidence: f64,
}

/// A single entry from the recent-detections endpoint.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct RecentDetection {
    pub emotion: String,
    pub confidence: f64,
    /// ISO-8601 timestamp as emitted by the backend
    pub timestamp: String,
}

impl RecentDetection {
    /// Detection time as HH:MM; falls back to the raw string when the
    /// timestamp does not parse.
    pub fn time_label(&self) -> String {
        parse_timestamp(&self.timestamp)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| self.timestamp.clone())
    }
}

/// Parse the backend's ISO-8601 timestamps, with or without an offset.
fn parse_timestamp(raw: &str) -> Option<chrono::NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

impl AppState {
    pub fn new() -> Self {
        Self {
            video_status: create_rw_signal(ChannelStatus::Connecting),
            current_frame: create_rw_signal(None),
            current_emotion: create_rw_signal(None),
            stats: create_rw_signal(None),
            recent: create_rw_signal(Vec::new()),
            hourly: create_rw_signal(HashMap::new()),
        }
    }

    /// Total detections from the latest snapshot, 0 when nothing loaded.
    pub fn total_detections(&self) -> u64 {
        self.stats
            .get()
            .map(|s| s.total_detections)
            .unwrap_or(0)
    }
}

/// Provide the application context to the component tree.
pub fn provide_app_state() {
    provide_context(AppState::new());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_label_from_naive_timestamp() {
        let entry = RecentDetection {
            emotion: "Felicidad".to_string(),
            confidence: 0.91,
            timestamp: "2025-03-14T09:26:53.589793".to_string(),
        };
        assert_eq!(entry.time_label(), "09:26");
    }

    #[test]
    fn test_time_label_from_rfc3339_timestamp() {
        let entry = RecentDetection {
            emotion: "Neutral".to_string(),
            confidence: 0.5,
            timestamp: "2025-03-14T21:04:00+00:00".to_string(),
        };
        assert_eq!(entry.time_label(), "21:04");
    }

    #[test]
    fn test_time_label_unparseable_falls_back_to_raw() {
        let entry = RecentDetection {
            emotion: "Miedo".to_string(),
            confidence: 0.7,
            timestamp: "yesterday".to_string(),
        };
        assert_eq!(entry.time_label(), "yesterday");
    }

    #[test]
    fn test_stats_snapshot_tolerates_missing_fields() {
        let stats: EmotionStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.total_detections, 0);
        assert!(stats.dominant_emotion.is_none());
        assert!(stats.emotions.is_empty());
    }
}
