//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod charts;
pub mod recent;
pub mod stats;
pub mod video;

pub use charts::{DistributionChart, HourlyChart};
pub use recent::RecentList;
pub use stats::StatCards;
pub use video::VideoPanel;
