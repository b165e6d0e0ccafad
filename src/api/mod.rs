//! REST API Client
//!
//! Thin client over the emotion service's REST endpoints.

pub mod client;

pub use client::{fetch_hourly, fetch_recent, fetch_stats};
