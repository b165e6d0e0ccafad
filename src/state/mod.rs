//! State Management
//!
//! Application context and WebSocket channel management.

pub mod channel;
pub mod global;

pub use channel::{init_channels, Channels, ChannelStatus, ReconnectingChannel};
pub use global::{
    provide_app_state, AppState, EmotionBucket, EmotionReading, EmotionStats, HourlyBreakdown,
    RecentDetection,
};
