//! HTTP API Client
//!
//! Functions for the three REST endpoints the dashboard polls. All requests
//! go to same-origin paths; failures come back as readable strings which the
//! callers log and skip — the next poll tick retries.

use gloo_net::http::Request;

use crate::state::global::{EmotionStats, HourlyBreakdown, RecentDetection};

/// How many entries the recent-detections list shows.
pub const RECENT_LIMIT: usize = 10;

/// Standard response envelope from the emotion service.
#[derive(Debug, serde::Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// Fetch the aggregate stats snapshot for the last 24 hours.
pub async fn fetch_stats() -> Result<EmotionStats, String> {
    get_json("/api/emotions/stats?hours=24").await
}

/// Fetch the most recent detections, newest first.
pub async fn fetch_recent(limit: usize) -> Result<Vec<RecentDetection>, String> {
    get_json(&format!("/api/emotions/recent?limit={}", limit)).await
}

/// Fetch today's per-hour detection counts.
pub async fn fetch_hourly() -> Result<HourlyBreakdown, String> {
    get_json("/api/emotions/hourly").await
}

async fn get_json<T: serde::de::DeserializeOwned + Default>(path: &str) -> Result<T, String> {
    let response = Request::get(path)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("Request failed: HTTP {}", response.status()));
    }

    let envelope: ApiResponse<T> = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    if !envelope.success {
        return Err(envelope
            .error
            .unwrap_or_else(|| "Request reported failure".to_string()));
    }

    envelope.data.ok_or_else(|| "Response missing data".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_stats_payload() {
        let raw = r#"{"success":true,"data":{"total_detections":5,"dominant_emotion":"Felicidad","emotions":{"Felicidad":{"count":5,"avg_confidence":0.88}}}}"#;
        let envelope: ApiResponse<EmotionStats> = serde_json::from_str(raw).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap().total_detections, 5);
    }

    #[test]
    fn test_envelope_failure_carries_error() {
        let raw = r#"{"success":false,"error":"database unavailable"}"#;
        let envelope: ApiResponse<EmotionStats> = serde_json::from_str(raw).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("database unavailable"));
    }

    #[test]
    fn test_recent_envelope_ignores_extra_fields() {
        // The backend also sends a `count` field alongside `data`.
        let raw = r#"{"success":true,"count":1,"data":[{"emotion":"Miedo","confidence":0.71,"timestamp":"2025-03-14T10:00:00"}]}"#;
        let envelope: ApiResponse<Vec<RecentDetection>> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data.unwrap().len(), 1);
    }

    #[test]
    fn test_hourly_envelope() {
        let raw = r#"{"success":true,"data":{"9":{"Felicidad":4},"15":{"Tristeza":2}},"date":"2025-03-14"}"#;
        let envelope: ApiResponse<HourlyBreakdown> = serde_json::from_str(raw).unwrap();
        let hourly = envelope.data.unwrap();
        assert_eq!(hourly["9"]["Felicidad"], 4);
        assert_eq!(hourly["15"]["Tristeza"], 2);
    }
}
