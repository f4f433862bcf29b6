//! Dashboard state and its closed transition set.
//!
//! All mutation flows through [`reduce`]: the coordinator, the refresh
//! scheduler, and tests dispatch [`Action`] values and read snapshots,
//! never fields behind a lock. The reducer is pure apart from the
//! `SetCities` timestamp.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use skydeck_auth::Identity;
use skydeck_core::TemperatureUnit;
use skydeck_weather::{CitySearchHit, CityWeather};

/// Which list the main view is projecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Favorites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient toast. The id doubles as the creation timestamp in epoch
/// milliseconds and is the handle used to expire it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: chrono::Utc::now().timestamp_millis(),
            message: message.into(),
            kind,
        }
    }
}

/// Everything the dashboard renders from, in one place.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Loaded city snapshots, in load order.
    pub cities: Vec<CityWeather>,
    /// Favorite city names for the active identity partition.
    pub favorites: Vec<String>,
    /// City opened in the detail view, if any.
    pub selected_city: Option<CityWeather>,
    pub search_query: String,
    pub search_results: Vec<CitySearchHit>,
    pub temperature_unit: TemperatureUnit,
    pub loading: bool,
    /// Sticky error banner; survives until `ClearError`.
    pub error: Option<String>,
    /// When `cities` was last replaced wholesale, epoch milliseconds.
    pub last_update_ms: Option<i64>,
    pub identity: Option<Identity>,
    pub show_settings: bool,
    pub active_tab: Tab,
    pub notifications: Vec<Notification>,
}

impl DashboardState {
    /// The cities the active tab shows: everything on the dashboard
    /// tab, only favorited ones on the favorites tab.
    pub fn displayed_cities(&self) -> Vec<&CityWeather> {
        match self.active_tab {
            Tab::Dashboard => self.cities.iter().collect(),
            Tab::Favorites => self
                .cities
                .iter()
                .filter(|c| self.favorites.iter().any(|f| f == c.city_name()))
                .collect(),
        }
    }

    pub fn is_favorite(&self, city: &str) -> bool {
        self.favorites.iter().any(|f| f == city)
    }
}

/// The only transitions the state admits.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the loaded cities and stamp `last_update_ms`.
    SetCities(Vec<CityWeather>),
    /// Append to favorites; a name already present is left alone.
    AddFavorite(String),
    RemoveFavorite(String),
    /// Opening a city also clears the search box and its results.
    SelectCity(Option<CityWeather>),
    SetSearchQuery(String),
    SetSearchResults(Vec<CitySearchHit>),
    ToggleTemperatureUnit,
    SetLoading(bool),
    SetError(String),
    ClearError,
    SetIdentity(Option<Identity>),
    ToggleSettingsPanel,
    /// Upsert one refreshed snapshot without touching `last_update_ms`.
    UpdateCacheEntry(CityWeather),
    /// Replace the favorites list wholesale (partition switch).
    LoadFavorites(Vec<String>),
    SetActiveTab(Tab),
    AddNotification(Notification),
    RemoveNotification(i64),
}

pub fn reduce(mut state: DashboardState, action: Action) -> DashboardState {
    match action {
        Action::SetCities(cities) => {
            state.cities = cities;
            state.last_update_ms = Some(chrono::Utc::now().timestamp_millis());
        }
        Action::AddFavorite(city) => {
            if !state.is_favorite(&city) {
                state.favorites.push(city);
            }
        }
        Action::RemoveFavorite(city) => {
            state.favorites.retain(|f| f != &city);
        }
        Action::SelectCity(city) => {
            if city.is_some() {
                state.search_query.clear();
                state.search_results.clear();
            }
            state.selected_city = city;
        }
        Action::SetSearchQuery(query) => state.search_query = query,
        Action::SetSearchResults(results) => state.search_results = results,
        Action::ToggleTemperatureUnit => {
            state.temperature_unit = state.temperature_unit.toggled();
        }
        Action::SetLoading(loading) => state.loading = loading,
        Action::SetError(message) => state.error = Some(message),
        Action::ClearError => state.error = None,
        Action::SetIdentity(identity) => state.identity = identity,
        Action::ToggleSettingsPanel => state.show_settings = !state.show_settings,
        Action::UpdateCacheEntry(weather) => {
            if let Some(slot) = state
                .cities
                .iter_mut()
                .find(|c| c.city_name() == weather.city_name())
            {
                *slot = weather;
            } else {
                state.cities.push(weather);
            }
        }
        Action::LoadFavorites(favorites) => state.favorites = favorites,
        Action::SetActiveTab(tab) => state.active_tab = tab,
        Action::AddNotification(notification) => state.notifications.push(notification),
        Action::RemoveNotification(id) => {
            state.notifications.retain(|n| n.id != id);
        }
    }
    state
}

/// Shared, lock-guarded state. Readers clone a snapshot; writers go
/// through [`dispatch`](Self::dispatch).
#[derive(Default)]
pub struct StateStore {
    inner: RwLock<DashboardState>,
}

impl StateStore {
    pub fn new(initial: DashboardState) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    pub fn dispatch(&self, action: Action) {
        tracing::debug!(?action, "dispatch");
        let mut guard = self.inner.write();
        let state = std::mem::take(&mut *guard);
        *guard = reduce(state, action);
    }

    pub fn snapshot(&self) -> DashboardState {
        self.inner.read().clone()
    }
}
