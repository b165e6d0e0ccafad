//! Reconnecting WebSocket Channels
//!
//! Two independent channels feed the dashboard: `/ws/video` (frames plus
//! optional classification results) and `/ws/data` (stats snapshots). Each
//! channel re-establishes its connection 3 seconds after any close, forever,
//! with no backoff. The two reconnection loops are uncorrelated; only the
//! video channel's lifecycle is surfaced in the UI.

use leptos::SignalSet;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::global::{AppState, EmotionReading, EmotionStats};

/// Fixed delay before a closed channel reconnects.
pub const RECONNECT_DELAY_MS: u32 = 3_000;

/// Lifecycle state of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelStatus {
    Connecting,
    Connected,
    Error,
    Reconnecting,
}

/// Messages pushed on the video channel.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VideoMessage {
    Frame {
        /// Hex-encoded JPEG bytes
        frame: String,
        #[serde(default)]
        emotion: Option<EmotionReading>,
    },
}

/// Messages pushed on the data channel.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataMessage {
    StatsUpdate { data: EmotionStats },
}

/// Guard ensuring at most one reconnect timer is armed per channel.
///
/// A socket that errors and then closes fires two lifecycle events in
/// succession; both would otherwise schedule a reconnect.
#[derive(Default)]
pub struct ReconnectGuard {
    pending: Cell<bool>,
}

impl ReconnectGuard {
    /// Arm the guard. Returns false if a reconnect is already pending.
    pub fn try_arm(&self) -> bool {
        !self.pending.replace(true)
    }

    /// Release the guard once the pending reconnect has run.
    pub fn disarm(&self) {
        self.pending.set(false);
    }
}

/// A WebSocket connection that re-establishes itself indefinitely.
#[derive(Clone)]
pub struct ReconnectingChannel {
    ws: Rc<RefCell<Option<WebSocket>>>,
    url: String,
    guard: Rc<ReconnectGuard>,
    shutdown: Rc<Cell<bool>>,
    on_message: Rc<dyn Fn(String)>,
    on_status: Rc<dyn Fn(ChannelStatus)>,
}

impl ReconnectingChannel {
    /// Create a channel for an endpoint path (e.g. `/ws/video`).
    pub fn new(
        path: &str,
        on_message: impl Fn(String) + 'static,
        on_status: impl Fn(ChannelStatus) + 'static,
    ) -> Self {
        Self {
            ws: Rc::new(RefCell::new(None)),
            url: ws_url(path),
            guard: Rc::new(ReconnectGuard::default()),
            shutdown: Rc::new(Cell::new(false)),
            on_message: Rc::new(on_message),
            on_status: Rc::new(on_status),
        }
    }

    /// Open the connection; on failure the reconnect timer is armed.
    pub fn connect(&self) {
        if self.shutdown.get() {
            return;
        }

        (self.on_status)(ChannelStatus::Connecting);

        match WebSocket::new(&self.url) {
            Ok(ws) => {
                self.setup_handlers(&ws);
                *self.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                web_sys::console::error_1(
                    &format!("WebSocket connection to {} failed: {:?}", self.url, e).into(),
                );
                (self.on_status)(ChannelStatus::Error);
                self.schedule_reconnect();
            }
        }
    }

    fn setup_handlers(&self, ws: &WebSocket) {
        let url = self.url.clone();

        // On open
        let on_status = Rc::clone(&self.on_status);
        let open_url = url.clone();
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            web_sys::console::log_1(&format!("WebSocket connected: {}", open_url).into());
            on_status(ChannelStatus::Connected);
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        // On message
        let on_message = Rc::clone(&self.on_message);
        let msg_handler = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
                on_message(String::from(text));
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(msg_handler.as_ref().unchecked_ref()));
        msg_handler.forget();

        // On error
        let on_status = Rc::clone(&self.on_status);
        let error_url = url.clone();
        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(
                &format!("WebSocket error on {}: {:?}", error_url, e).into(),
            );
            on_status(ChannelStatus::Error);
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();

        // On close
        let channel = self.clone();
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            web_sys::console::log_1(
                &format!(
                    "WebSocket closed ({}): code={}, reason={}",
                    channel.url,
                    event.code(),
                    event.reason()
                )
                .into(),
            );
            (channel.on_status)(ChannelStatus::Reconnecting);
            channel.schedule_reconnect();
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();
    }

    /// Arm a single reconnect attempt RECONNECT_DELAY_MS from now.
    fn schedule_reconnect(&self) {
        if self.shutdown.get() || !self.guard.try_arm() {
            return;
        }

        let channel = self.clone();
        gloo_timers::callback::Timeout::new(RECONNECT_DELAY_MS, move || {
            channel.guard.disarm();
            channel.connect();
        })
        .forget();
    }

    /// Tear the channel down; suppresses any further reconnects.
    pub fn close(&self) {
        self.shutdown.set(true);
        if let Some(ws) = self.ws.borrow().as_ref() {
            let _ = ws.close();
        }
    }
}

/// Handles to both channels, for teardown from the app root.
pub struct Channels {
    pub video: ReconnectingChannel,
    pub data: ReconnectingChannel,
}

impl Channels {
    pub fn close_all(&self) {
        self.video.close();
        self.data.close();
    }
}

/// Open both channels and wire them to the application state.
pub fn init_channels(state: AppState) -> Channels {
    let video_state = state.clone();
    let status_state = state.clone();
    let video = ReconnectingChannel::new(
        "/ws/video",
        move |text| handle_video_message(&text, &video_state),
        move |status| status_state.video_status.set(status),
    );

    // The data channel's lifecycle is logged but never surfaced in the UI.
    let data_state = state;
    let data = ReconnectingChannel::new(
        "/ws/data",
        move |text| handle_data_message(&text, &data_state),
        |_| {},
    );

    video.connect();
    data.connect();

    Channels { video, data }
}

/// Dispatch one inbound video-channel payload.
///
/// Malformed payloads are logged and dropped; the socket stays open.
fn handle_video_message(text: &str, state: &AppState) {
    match serde_json::from_str::<VideoMessage>(text) {
        Ok(VideoMessage::Frame { frame, emotion }) => {
            state.current_frame.set(Some(frame));
            if let Some(reading) = emotion {
                state.current_emotion.set(Some(reading));
            }
        }
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Dropping malformed video message: {}", e).into(),
            );
        }
    }
}

/// Dispatch one inbound data-channel payload.
fn handle_data_message(text: &str, state: &AppState) {
    match serde_json::from_str::<DataMessage>(text) {
        Ok(DataMessage::StatsUpdate { data }) => {
            state.stats.set(Some(data));
        }
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Dropping malformed data message: {}", e).into(),
            );
        }
    }
}

/// Derive the ws/wss URL for a path from the current page location.
fn ws_url(path: &str) -> String {
    let (protocol, host) = match web_sys::window().map(|w| w.location()) {
        Some(location) => (
            location.protocol().unwrap_or_else(|_| "http:".to_string()),
            location.host().unwrap_or_else(|_| "localhost:8000".to_string()),
        ),
        None => ("http:".to_string(), "localhost:8000".to_string()),
    };

    let ws_protocol = if protocol == "https:" { "wss:" } else { "ws:" };
    format!("{}//{}{}", ws_protocol, host, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_guard_arms_once() {
        let guard = ReconnectGuard::default();
        assert!(guard.try_arm());
        // A second close event while a reconnect is pending must not
        // schedule another attempt.
        assert!(!guard.try_arm());
        assert!(!guard.try_arm());
    }

    #[test]
    fn test_reconnect_guard_rearms_after_disarm() {
        let guard = ReconnectGuard::default();
        assert!(guard.try_arm());
        guard.disarm();
        assert!(guard.try_arm());
    }

    #[test]
    fn test_video_message_with_emotion() {
        let raw = r#"{"type":"frame","frame":"ffd8ffe0","emotion":{"emotion":"Felicidad","confidence":0.93}}"#;
        let VideoMessage::Frame { frame, emotion } = serde_json::from_str(raw).unwrap();
        assert_eq!(frame, "ffd8ffe0");
        assert_eq!(emotion.unwrap().emotion, "Felicidad");
    }

    #[test]
    fn test_video_message_without_emotion() {
        let raw = r#"{"type":"frame","frame":"ffd8"}"#;
        let VideoMessage::Frame { emotion, .. } = serde_json::from_str(raw).unwrap();
        assert!(emotion.is_none());
    }

    #[test]
    fn test_data_message_stats_update() {
        let raw = r#"{"type":"stats_update","data":{"total_detections":3,"dominant_emotion":"Neutral","emotions":{"Neutral":{"count":3,"avg_confidence":0.61}}}}"#;
        let DataMessage::StatsUpdate { data } = serde_json::from_str(raw).unwrap();
        assert_eq!(data.total_detections, 3);
        assert_eq!(data.dominant_emotion.as_deref(), Some("Neutral"));
    }

    #[test]
    fn test_unknown_message_type_is_an_error() {
        assert!(serde_json::from_str::<DataMessage>(r#"{"type":"frame"}"#).is_err());
        assert!(serde_json::from_str::<VideoMessage>(r#"{"no_type":true}"#).is_err());
    }
}
