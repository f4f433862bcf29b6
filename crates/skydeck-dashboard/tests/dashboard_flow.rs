//! End-to-end flows through the dashboard coordinator, against a mock
//! weather provider and an in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skydeck_auth::{Identity, IdentityProvider};
use skydeck_core::{AuthError, Config, TemperatureUnit};
use skydeck_dashboard::{Dashboard, NotificationKind, Tab};
use skydeck_storage::{put_json, KeyValueStore, MemoryStore};
use skydeck_weather::test_fixtures::{forecast_json, forecast_json_with_alert};

/// Provider that completes the consent flow instantly.
struct FakeProvider {
    identity: Identity,
    sign_outs: AtomicUsize,
}

impl FakeProvider {
    fn for_user(id: &str, name: &str) -> Arc<Self> {
        Arc::new(Self {
            identity: Identity {
                id: id.to_string(),
                name: name.to_string(),
                email: "asha@example.com".to_string(),
                avatar_url: None,
                access_token: Some("ya29.token".to_string()),
            },
            sign_outs: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        Ok(self.identity.clone())
    }

    async fn sign_out(&self, _identity: &Identity) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider where the user always abandons the flow.
struct CancellingProvider;

#[async_trait]
impl IdentityProvider for CancellingProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        Err(AuthError::Cancelled)
    }

    async fn sign_out(&self, _identity: &Identity) {}
}

fn test_config(server: &MockServer, default_cities: &[&str]) -> Config {
    let mut config = Config::default();
    config.weather.api_key = "test-key".to_string();
    config.weather.api_base_url = server.uri();
    config.dashboard.default_cities = default_cities.iter().map(|c| c.to_string()).collect();
    config
}

async fn mount_forecast(server: &MockServer, city: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json(city)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_init_loads_default_cities() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Mumbai").await;
    mount_forecast(&server, "Delhi").await;

    let config = test_config(&server, &["Mumbai", "Delhi"]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    let state = dashboard.snapshot();
    assert_eq!(state.cities.len(), 2);
    assert_eq!(state.cities[0].city_name(), "Mumbai");
    assert_eq!(state.cities[1].city_name(), "Delhi");
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(state.last_update_ms.is_some());
    assert!(state.identity.is_none());
    dashboard.shutdown();
}

#[tokio::test]
async fn test_init_with_all_fetches_failing_sets_sticky_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(&server, &["Mumbai", "Delhi"]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    let state = dashboard.snapshot();
    assert!(state.cities.is_empty());
    assert_eq!(state.error.as_deref(), Some("Failed to load weather data"));
    dashboard.shutdown();
}

#[tokio::test]
async fn test_init_with_partial_failures_loads_the_rest() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Mumbai").await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("q", "Delhi"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(&server, &["Mumbai", "Delhi"]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    let state = dashboard.snapshot();
    assert_eq!(state.cities.len(), 1);
    assert_eq!(state.cities[0].city_name(), "Mumbai");
    assert!(state.error.is_none());
    dashboard.shutdown();
}

#[tokio::test]
async fn test_anonymous_add_favorite_persists_and_appends_card() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Mumbai").await;
    mount_forecast(&server, "Pune").await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = test_config(&server, &["Mumbai"]);
    let dashboard = Dashboard::new(
        &config,
        store.clone(),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    dashboard.add_favorite("Pune").await;

    let state = dashboard.snapshot();
    assert_eq!(state.favorites, vec!["Pune"]);
    assert!(state.cities.iter().any(|c| c.city_name() == "Pune"));
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Info && n.message.contains("Pune")));

    // Persisted under the anonymous partition key.
    let raw = store.get("local_favorites").await.unwrap().unwrap();
    assert!(raw.contains("Pune"));
    dashboard.shutdown();
}

#[tokio::test]
async fn test_duplicate_add_favorite_is_a_no_op() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Pune").await;

    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    dashboard.add_favorite("Pune").await;
    dashboard.add_favorite("Pune").await;

    let state = dashboard.snapshot();
    assert_eq!(state.favorites, vec!["Pune"]);
    assert_eq!(
        state
            .notifications
            .iter()
            .filter(|n| n.message.contains("added"))
            .count(),
        1
    );
    dashboard.shutdown();
}

#[tokio::test]
async fn test_remove_favorite_keeps_the_card() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Pune").await;

    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    dashboard.add_favorite("Pune").await;
    dashboard.remove_favorite("Pune").await;

    let state = dashboard.snapshot();
    assert!(state.favorites.is_empty());
    // The snapshot is not evicted; only the favorites tab stops showing it.
    assert!(state.cities.iter().any(|c| c.city_name() == "Pune"));

    let store = dashboard.store();
    store.dispatch(skydeck_dashboard::Action::SetActiveTab(Tab::Favorites));
    assert!(store.snapshot().displayed_cities().is_empty());
    dashboard.shutdown();
}

#[tokio::test]
async fn test_search_below_minimum_skips_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();

    dashboard.search("p").await;

    let state = dashboard.snapshot();
    assert_eq!(state.search_query, "p");
    assert!(state.search_results.is_empty());
    dashboard.shutdown();
}

#[tokio::test]
async fn test_search_then_select_clears_query_and_results() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Pune").await;
    Mock::given(method("GET"))
        .and(path("/v1/search.json"))
        .and(query_param("q", "pun"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Pune", "region": "Maharashtra", "country": "India"}
        ])))
        .mount(&server)
        .await;

    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();

    dashboard.search("pun").await;
    assert_eq!(dashboard.snapshot().search_results.len(), 1);

    dashboard.select_city("Pune").await;
    let state = dashboard.snapshot();
    assert_eq!(state.selected_city.unwrap().city_name(), "Pune");
    assert!(state.search_query.is_empty());
    assert!(state.search_results.is_empty());
    // Selecting from search does not favorite the city.
    assert!(state.favorites.is_empty());
    dashboard.shutdown();
}

#[tokio::test]
async fn test_toggle_temperature_unit_persists_preference() {
    let server = MockServer::start().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        store.clone(),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();

    dashboard.toggle_temperature_unit().await;

    let state = dashboard.snapshot();
    assert_eq!(state.temperature_unit, TemperatureUnit::F);
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Success && n.message.contains("°F")));

    let raw = store.get("user_preferences").await.unwrap().unwrap();
    assert!(raw.contains(r#""tempUnit":"F""#));
    dashboard.shutdown();
}

#[tokio::test]
async fn test_init_restores_persisted_temperature_unit() {
    let server = MockServer::start().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store
        .set("user_preferences", r#"{"tempUnit":"F"}"#)
        .await
        .unwrap();

    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        store,
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    assert_eq!(dashboard.snapshot().temperature_unit, TemperatureUnit::F);
    dashboard.shutdown();
}

#[tokio::test]
async fn test_sign_in_switches_to_identity_partition() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Mumbai").await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    // The identity partition already has a favorite from a past session.
    put_json(store.as_ref(), "favorites_108234", &vec!["Pune".to_string()])
        .await
        .unwrap();
    mount_forecast(&server, "Pune").await;

    let config = test_config(&server, &["Mumbai"]);
    let dashboard = Dashboard::new(
        &config,
        store.clone(),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;
    assert!(dashboard.snapshot().favorites.is_empty());

    dashboard.sign_in().await;

    let state = dashboard.snapshot();
    assert_eq!(state.identity.as_ref().unwrap().id, "108234");
    assert_eq!(state.favorites, vec!["Pune"]);
    assert!(state.cities.iter().any(|c| c.city_name() == "Pune"));
    assert!(state
        .notifications
        .iter()
        .any(|n| n.message.contains("Welcome, Asha")));

    // Session keys landed in storage.
    assert!(store.get("current_user").await.unwrap().is_some());
    assert_eq!(
        store.get("google_access_token").await.unwrap().as_deref(),
        Some("ya29.token")
    );
    dashboard.shutdown();
}

#[tokio::test]
async fn test_sign_out_restores_anonymous_favorites_without_merging() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Mumbai").await;
    mount_forecast(&server, "Goa").await;
    mount_forecast(&server, "Pune").await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let provider = FakeProvider::for_user("108234", "Asha Rao");
    let config = test_config(&server, &["Mumbai"]);
    let dashboard = Dashboard::new(&config, store.clone(), provider.clone()).unwrap();
    dashboard.init().await;

    dashboard.add_favorite("Goa").await; // anonymous partition
    dashboard.sign_in().await;
    dashboard.add_favorite("Pune").await; // identity partition

    dashboard.sign_out().await;

    let state = dashboard.snapshot();
    assert!(state.identity.is_none());
    // Anonymous list restored verbatim; the signed-in favorite is not
    // folded in.
    assert_eq!(state.favorites, vec!["Goa"]);
    assert_eq!(provider.sign_outs.load(Ordering::SeqCst), 1);
    assert!(store.get("current_user").await.unwrap().is_none());
    assert!(store.get("google_access_token").await.unwrap().is_none());

    // Both partitions still exist in storage.
    let signed_in = store.get("favorites_108234").await.unwrap().unwrap();
    assert!(signed_in.contains("Pune"));
    dashboard.shutdown();
}

#[tokio::test]
async fn test_cancelled_sign_in_leaves_session_anonymous() {
    let server = MockServer::start().await;
    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(CancellingProvider),
    )
    .unwrap();

    dashboard.sign_in().await;

    let state = dashboard.snapshot();
    assert!(state.identity.is_none());
    assert!(!state.loading);
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Info && n.message.contains("cancelled")));
    dashboard.shutdown();
}

#[tokio::test]
async fn test_init_restores_identity_and_its_partition() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Mumbai").await;
    mount_forecast(&server, "Pune").await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let identity = Identity {
        id: "108234".to_string(),
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        avatar_url: None,
        access_token: None,
    };
    put_json(store.as_ref(), "current_user", &identity).await.unwrap();
    store.set("google_access_token", "ya29.token").await.unwrap();
    put_json(store.as_ref(), "favorites_108234", &vec!["Pune".to_string()])
        .await
        .unwrap();

    let config = test_config(&server, &["Mumbai"]);
    let dashboard = Dashboard::new(
        &config,
        store,
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    let state = dashboard.snapshot();
    let restored = state.identity.as_ref().unwrap();
    assert_eq!(restored.id, "108234");
    assert_eq!(restored.access_token.as_deref(), Some("ya29.token"));
    assert_eq!(state.favorites, vec!["Pune"]);
    assert_eq!(state.cities.len(), 2);
    dashboard.shutdown();
}

#[tokio::test]
async fn test_corrupt_identity_record_falls_back_to_anonymous() {
    let server = MockServer::start().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set("current_user", "{not json").await.unwrap();

    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        store,
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    let state = dashboard.snapshot();
    assert!(state.identity.is_none());
    assert!(state.error.is_none());
    dashboard.shutdown();
}

#[tokio::test]
async fn test_fresh_fetch_with_alert_raises_warning_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("q", "Mumbai"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_json_with_alert("Mumbai", "Heavy rain expected")),
        )
        .mount(&server)
        .await;

    let config = test_config(&server, &["Mumbai"]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;

    // The cache hit on selection must not raise a second warning.
    dashboard.select_city("Mumbai").await;

    let warnings: Vec<_> = dashboard
        .snapshot()
        .notifications
        .iter()
        .filter(|n| n.kind == NotificationKind::Warning)
        .cloned()
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("Heavy rain expected"));
    dashboard.shutdown();
}

#[tokio::test]
async fn test_notifications_expire_after_ttl() {
    let server = MockServer::start().await;
    let mut config = test_config(&server, &[]);
    config.dashboard.notification_ttl_ms = 50;

    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();

    dashboard.notify("short-lived", NotificationKind::Info);
    assert_eq!(dashboard.snapshot().notifications.len(), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(dashboard.snapshot().notifications.is_empty());
    dashboard.shutdown();
}

#[tokio::test]
async fn test_refresh_favorites_updates_cards_without_restamping() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Pune").await;

    let config = test_config(&server, &[]);
    let dashboard = Dashboard::new(
        &config,
        Arc::new(MemoryStore::new()),
        FakeProvider::for_user("108234", "Asha Rao"),
    )
    .unwrap();
    dashboard.init().await;
    dashboard.add_favorite("Pune").await;

    let stamped = dashboard.snapshot().last_update_ms;
    dashboard.refresh_favorites().await;

    let state = dashboard.snapshot();
    assert!(state.cities.iter().any(|c| c.city_name() == "Pune"));
    assert_eq!(state.last_update_ms, stamped);
    dashboard.shutdown();
}
