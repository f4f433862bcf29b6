//! Time-bounded memoization of forecast fetches, keyed by city name.
//!
//! Staleness is the only eviction trigger: no size bound, no LRU, and a
//! failed refresh never evicts the stale entry it was replacing. Keys
//! are case-sensitive, exactly as typed by the user or returned by
//! search.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use skydeck_core::WeatherError;

use crate::client::WeatherClient;
use crate::types::CityWeather;

/// Whether a lookup was served from memory or went to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Cached,
    Fetched,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: CityWeather,
    fetched_at_ms: i64,
}

pub struct WeatherCache {
    client: Arc<WeatherClient>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    /// Per-key fetch locks so a manual refresh racing the scheduler
    /// issues at most one outbound request per city.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl WeatherCache {
    pub fn new(client: Arc<WeatherClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Return a snapshot for `city`, fetching from the provider only if
    /// no entry exists or the entry has outlived the TTL.
    pub async fn get(&self, city: &str) -> Result<CityWeather, WeatherError> {
        self.lookup(city).await.map(|(weather, _)| weather)
    }

    /// Like [`get`](Self::get), but also reports whether the snapshot
    /// came from memory. Callers use this to raise alert notifications
    /// only on genuinely fresh data.
    pub async fn lookup(&self, city: &str) -> Result<(CityWeather, Freshness), WeatherError> {
        if let Some(data) = self.fresh_entry(city).await {
            tracing::debug!("Cache hit for {}", city);
            return Ok((data, Freshness::Cached));
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(city.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = key_lock.lock().await;

        // A racing fetch may have landed while we waited for the lock.
        if let Some(data) = self.fresh_entry(city).await {
            tracing::debug!("Cache populated while waiting for {}", city);
            return Ok((data, Freshness::Cached));
        }

        // On failure the existing entry, stale or not, stays in place.
        let data = self.client.forecast(city).await?;

        self.entries.lock().await.insert(
            city.to_string(),
            CacheEntry {
                data: data.clone(),
                fetched_at_ms: now_ms(),
            },
        );

        Ok((data, Freshness::Fetched))
    }

    /// The stored snapshot for `city` regardless of freshness, if any.
    /// Stale entries survive failed refreshes and favorite removal.
    pub async fn peek(&self, city: &str) -> Option<CityWeather> {
        self.entries.lock().await.get(city).map(|e| e.data.clone())
    }

    /// Insert an entry with an explicit fetch timestamp. Used to prewarm
    /// the cache and to pin entry ages in tests.
    pub async fn seed(&self, city: &str, data: CityWeather, fetched_at_ms: i64) {
        self.entries.lock().await.insert(
            city.to_string(),
            CacheEntry {
                data,
                fetched_at_ms,
            },
        );
    }

    async fn fresh_entry(&self, city: &str) -> Option<CityWeather> {
        let entries = self.entries.lock().await;
        let entry = entries.get(city)?;
        let age_ms = now_ms().saturating_sub(entry.fetched_at_ms);
        if age_ms < self.ttl.as_millis() as i64 {
            Some(entry.data.clone())
        } else {
            None
        }
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
