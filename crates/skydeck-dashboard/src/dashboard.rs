//! The dashboard coordinator.
//!
//! Wires the weather cache, the favorites partitions, the identity
//! provider, and the refresh scheduler to the state store. Every public
//! method is a complete user-facing operation: it dispatches its own
//! transitions and converts failures into notifications, so nothing
//! here returns an error to the host.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use skydeck_auth::{Identity, IdentityProvider};
use skydeck_core::{Config, TemperatureUnit, WeatherError};
use skydeck_storage::{get_json, keys, put_json, KeyValueStore};
use skydeck_weather::{
    CityWeather, Freshness, WeatherCache, WeatherClient, MIN_SEARCH_QUERY_LEN,
};

use crate::favorites::FavoritesStore;
use crate::scheduler::RefreshScheduler;
use crate::state::{Action, DashboardState, Notification, NotificationKind, StateStore};

const LOAD_FAILED_MESSAGE: &str = "Failed to load weather data";

/// Stored slice of `user_preferences`. Only the display unit survives
/// sessions today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(rename = "tempUnit")]
    temp_unit: TemperatureUnit,
}

pub struct Dashboard {
    store: Arc<StateStore>,
    cache: Arc<WeatherCache>,
    client: Arc<WeatherClient>,
    kv: Arc<dyn KeyValueStore>,
    favorites: FavoritesStore,
    identity_provider: Arc<dyn IdentityProvider>,
    default_cities: Vec<String>,
    refresh_interval: Duration,
    notification_ttl: Duration,
    scheduler: Mutex<Option<RefreshScheduler>>,
}

impl Dashboard {
    pub fn new(
        config: &Config,
        kv: Arc<dyn KeyValueStore>,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> Result<Arc<Self>, WeatherError> {
        let client = Arc::new(WeatherClient::new_with_base_url(
            &config.weather.api_key,
            &config.weather.api_base_url,
        )?);
        let cache = Arc::new(WeatherCache::new(
            client.clone(),
            Duration::from_millis(config.weather.cache_ttl_ms),
        ));

        let initial = DashboardState {
            temperature_unit: config.dashboard.temperature_unit,
            ..DashboardState::default()
        };

        Ok(Arc::new(Self {
            store: Arc::new(StateStore::new(initial)),
            cache,
            client,
            kv: kv.clone(),
            favorites: FavoritesStore::new(kv),
            identity_provider,
            default_cities: config.dashboard.default_cities.clone(),
            refresh_interval: Duration::from_millis(config.weather.refresh_interval_ms),
            notification_ttl: Duration::from_millis(config.dashboard.notification_ttl_ms),
            scheduler: Mutex::new(None),
        }))
    }

    /// Handle to the state store for snapshots and host-driven
    /// transitions (tab switches, panel toggles, `ClearError`).
    pub fn store(&self) -> Arc<StateStore> {
        self.store.clone()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.store.snapshot()
    }

    /// Restore the session and load the initial dashboard. Storage that
    /// is missing or unreadable falls back to defaults silently; the
    /// sticky error is set only when every initial fetch fails.
    #[tracing::instrument(skip(self))]
    pub async fn init(self: &Arc<Self>) {
        self.store.dispatch(Action::SetLoading(true));

        if let Some(prefs) =
            get_json::<StoredPreferences>(self.kv.as_ref(), keys::USER_PREFERENCES).await
        {
            if prefs.temp_unit != self.snapshot().temperature_unit {
                self.store.dispatch(Action::ToggleTemperatureUnit);
            }
        }

        let identity = self.restore_identity().await;
        let identity_id = identity.as_ref().map(|i| i.id.clone());
        self.store.dispatch(Action::SetIdentity(identity));

        let favorites = self.favorites.load(identity_id.as_deref()).await;
        self.store.dispatch(Action::LoadFavorites(favorites.clone()));

        self.load_cities(self.city_union(&favorites)).await;
        self.store.dispatch(Action::SetLoading(false));

        self.arm_scheduler();
    }

    async fn restore_identity(&self) -> Option<Identity> {
        let mut identity: Identity =
            get_json(self.kv.as_ref(), keys::CURRENT_USER).await?;
        // The token is stored separately so the identity record stays
        // readable after revocation.
        if let Ok(Some(token)) = self.kv.get(keys::ACCESS_TOKEN).await {
            identity.access_token = Some(token);
        }
        tracing::info!("Restored session for {}", identity.email);
        Some(identity)
    }

    /// Defaults plus favorites, deduplicated, defaults first.
    fn city_union(&self, favorites: &[String]) -> Vec<String> {
        let mut names = self.default_cities.clone();
        for city in favorites {
            if !names.contains(city) {
                names.push(city.clone());
            }
        }
        names
    }

    /// Fetch `names` concurrently and replace the dashboard list with
    /// whatever loaded, preserving request order. All-failed with a
    /// non-empty request leaves the previous list and sets the sticky
    /// error instead.
    async fn load_cities(self: &Arc<Self>, names: Vec<String>) {
        let requested = names.len();
        let mut handles = Vec::with_capacity(requested);
        for city in names {
            let this = self.clone();
            handles.push(tokio::spawn(async move {
                this.fetch_city(&city, false).await
            }));
        }

        let mut loaded = Vec::with_capacity(requested);
        for handle in handles {
            match handle.await {
                Ok(Some(weather)) => loaded.push(weather),
                Ok(None) => {}
                Err(e) => tracing::warn!("City load task failed: {}", e),
            }
        }

        if loaded.is_empty() && requested > 0 {
            tracing::error!("All {} initial fetches failed", requested);
            self.store
                .dispatch(Action::SetError(LOAD_FAILED_MESSAGE.to_string()));
        } else {
            self.store.dispatch(Action::SetCities(loaded));
        }
    }

    /// One cache-mediated fetch. Freshly fetched data carrying alerts
    /// raises a warning notification; cache hits never re-raise.
    async fn fetch_city(self: &Arc<Self>, city: &str, notify_on_error: bool) -> Option<CityWeather> {
        match self.cache.lookup(city).await {
            Ok((weather, freshness)) => {
                if freshness == Freshness::Fetched {
                    if let Some(alert) = weather.alerts.first() {
                        self.notify(
                            format!("Weather alert in {}: {}", city, alert.headline),
                            NotificationKind::Warning,
                        );
                    }
                }
                Some(weather)
            }
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", city, e);
                if notify_on_error {
                    self.notify(e.user_message(), NotificationKind::Error);
                }
                None
            }
        }
    }

    /// Add `city` to the active partition. Already-favorited cities are
    /// left alone; a city not yet on the dashboard gets a best-effort
    /// fetch so its card appears immediately.
    #[tracing::instrument(skip(self))]
    pub async fn add_favorite(self: &Arc<Self>, city: &str) {
        let snapshot = self.snapshot();
        if snapshot.is_favorite(city) {
            return;
        }

        let identity_id = snapshot.identity.as_ref().map(|i| i.id.clone());
        self.favorites.add(city, identity_id.as_deref()).await;
        self.store.dispatch(Action::AddFavorite(city.to_string()));
        self.notify(format!("{} added to favorites", city), NotificationKind::Info);

        let on_dashboard = snapshot.cities.iter().any(|c| c.city_name() == city);
        if !on_dashboard {
            if let Some(weather) = self.fetch_city(city, true).await {
                self.store.dispatch(Action::UpdateCacheEntry(weather));
            }
        }
    }

    /// Remove `city` from the active partition. Its card stays on the
    /// dashboard tab and its cache entry is not evicted.
    #[tracing::instrument(skip(self))]
    pub async fn remove_favorite(self: &Arc<Self>, city: &str) {
        let identity_id = self.snapshot().identity.as_ref().map(|i| i.id.clone());
        self.favorites.remove(city, identity_id.as_deref()).await;
        self.store.dispatch(Action::RemoveFavorite(city.to_string()));
        self.notify(
            format!("{} removed from favorites", city),
            NotificationKind::Info,
        );
    }

    /// Open the detail view for `city`. Search hits feed this path
    /// without being auto-favorited.
    pub async fn select_city(self: &Arc<Self>, city: &str) {
        if let Some(weather) = self.fetch_city(city, true).await {
            self.store.dispatch(Action::SelectCity(Some(weather)));
        }
    }

    pub fn clear_selection(&self) {
        self.store.dispatch(Action::SelectCity(None));
    }

    /// Run a city search. Queries under the minimum length resolve to
    /// empty results without touching the provider.
    pub async fn search(self: &Arc<Self>, query: &str) {
        self.store.dispatch(Action::SetSearchQuery(query.to_string()));

        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            self.store.dispatch(Action::SetSearchResults(Vec::new()));
            return;
        }

        match self.client.search(query).await {
            Ok(hits) => self.store.dispatch(Action::SetSearchResults(hits)),
            Err(e) => {
                tracing::warn!("Search failed for '{}': {}", query, e);
                self.notify(e.user_message(), NotificationKind::Error);
                self.store.dispatch(Action::SetSearchResults(Vec::new()));
            }
        }
    }

    /// Flip the display unit, persist the preference, and confirm.
    pub async fn toggle_temperature_unit(self: &Arc<Self>) {
        self.store.dispatch(Action::ToggleTemperatureUnit);
        let unit = self.snapshot().temperature_unit;

        let prefs = StoredPreferences { temp_unit: unit };
        if let Err(e) = put_json(self.kv.as_ref(), keys::USER_PREFERENCES, &prefs).await {
            tracing::warn!("Failed to persist temperature unit: {}", e);
        }

        self.notify(
            format!("Temperature unit changed to {}", unit.symbol()),
            NotificationKind::Success,
        );
    }

    /// Run the interactive sign-in flow and switch to the identity's
    /// favorites partition.
    #[tracing::instrument(skip(self))]
    pub async fn sign_in(self: &Arc<Self>) {
        self.store.dispatch(Action::SetLoading(true));

        match self.identity_provider.sign_in().await {
            Ok(identity) => {
                if let Err(e) = put_json(self.kv.as_ref(), keys::CURRENT_USER, &identity).await {
                    tracing::warn!("Failed to persist identity: {}", e);
                }
                if let Some(token) = &identity.access_token {
                    if let Err(e) = self.kv.set(keys::ACCESS_TOKEN, token).await {
                        tracing::warn!("Failed to persist access token: {}", e);
                    }
                }

                let favorites = self.favorites.load(Some(&identity.id)).await;
                self.store.dispatch(Action::LoadFavorites(favorites.clone()));

                self.notify(
                    format!("Welcome, {}!", identity.first_name()),
                    NotificationKind::Success,
                );
                self.store.dispatch(Action::SetIdentity(Some(identity)));

                self.load_cities(self.city_union(&favorites)).await;
                self.arm_scheduler();
            }
            Err(e) => {
                tracing::info!("Sign-in did not complete: {}", e);
                let kind = match e {
                    skydeck_core::AuthError::Cancelled => NotificationKind::Info,
                    _ => NotificationKind::Error,
                };
                self.notify(e.user_message(), kind);
            }
        }

        self.store.dispatch(Action::SetLoading(false));
    }

    /// End the session: best-effort provider revocation, session keys
    /// deleted, anonymous favorites restored verbatim (no merging), and
    /// the scheduler re-armed over the restored list.
    #[tracing::instrument(skip(self))]
    pub async fn sign_out(self: &Arc<Self>) {
        let Some(identity) = self.snapshot().identity else {
            return;
        };

        self.cancel_scheduler();
        self.identity_provider.sign_out(&identity).await;

        for key in [keys::CURRENT_USER, keys::ACCESS_TOKEN] {
            if let Err(e) = self.kv.delete(key).await {
                tracing::warn!("Failed to clear session key '{}': {}", key, e);
            }
        }

        let favorites = self.favorites.load(None).await;
        self.store.dispatch(Action::LoadFavorites(favorites.clone()));
        self.store.dispatch(Action::SetIdentity(None));
        self.notify(
            format!("Goodbye, {}!", identity.first_name()),
            NotificationKind::Info,
        );

        self.load_cities(self.city_union(&favorites)).await;
        self.arm_scheduler();
    }

    /// Refresh every favorited city through the cache, one task per
    /// city; a failed city neither cancels nor delays the others.
    pub async fn refresh_favorites(self: &Arc<Self>) {
        let favorites = self.snapshot().favorites;
        if favorites.is_empty() {
            tracing::debug!("No favorites; skipping refresh tick");
            return;
        }

        tracing::debug!("Refreshing {} favorited cities", favorites.len());
        let mut handles = Vec::with_capacity(favorites.len());
        for city in favorites {
            let this = self.clone();
            handles.push(tokio::spawn(async move {
                if let Some(weather) = this.fetch_city(&city, true).await {
                    this.store.dispatch(Action::UpdateCacheEntry(weather));
                }
            }));
        }
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("Refresh task failed: {}", e);
            }
        }
    }

    /// Show a toast and schedule its expiry.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) {
        let notification = Notification::new(message, kind);
        let id = notification.id;
        self.store.dispatch(Action::AddNotification(notification));

        let store = self.store.clone();
        let ttl = self.notification_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            store.dispatch(Action::RemoveNotification(id));
        });
    }

    /// (Re-)arm the background refresh timer. The timer holds a weak
    /// handle so an abandoned dashboard is not kept alive by its own
    /// ticks.
    fn arm_scheduler(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let scheduler = RefreshScheduler::start(self.refresh_interval, move || {
            let weak = weak.clone();
            async move {
                if let Some(dashboard) = weak.upgrade() {
                    dashboard.refresh_favorites().await;
                }
            }
        });
        // Replacing the slot drops (and thereby cancels) any old timer.
        *self.scheduler.lock() = Some(scheduler);
    }

    fn cancel_scheduler(&self) {
        if let Some(mut scheduler) = self.scheduler.lock().take() {
            scheduler.cancel();
        }
    }

    /// Stop background work. Idempotent; also happens on drop.
    pub fn shutdown(&self) {
        self.cancel_scheduler();
    }
}
