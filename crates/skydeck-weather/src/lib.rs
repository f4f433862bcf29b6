//! Weather data access for the Skydeck dashboard.
//!
//! Wraps weatherapi.com behind [`WeatherClient`] (7-day forecast with
//! air quality and alerts, plus city lookup) and memoizes snapshots in
//! [`WeatherCache`] with a flat TTL and per-key fetch deduplication.

mod api;
pub mod cache;
pub mod client;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_fixtures;

pub use cache::{Freshness, WeatherCache};
pub use client::{WeatherClient, MIN_SEARCH_QUERY_LEN};
pub use types::*;
