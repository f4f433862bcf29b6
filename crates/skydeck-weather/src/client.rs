//! weatherapi.com client: 7-day forecast and city lookup.

use std::time::Duration;

use tracing::instrument;

use skydeck_core::WeatherError;

use crate::api::{ApiErrorResponse, ForecastResponse};
use crate::types::{CitySearchHit, CityWeather};

const WEATHER_API_BASE: &str = "https://api.weatherapi.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const FORECAST_DAYS: u32 = 7;

/// Queries shorter than this skip the lookup endpoint entirely.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// weatherapi.com error code for "no matching location found".
const API_CODE_NO_MATCH: i32 = 1006;

pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::new_with_base_url(api_key, WEATHER_API_BASE)
    }

    /// Point the client at a different host (tests, proxies).
    pub fn new_with_base_url(api_key: &str, base_url: &str) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions plus a 7-day forecast with air quality
    /// and alerts. An empty alerts array is not an error.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, city: &str) -> Result<CityWeather, WeatherError> {
        let url = format!("{}/v1/forecast.json", self.base_url);
        let days = FORECAST_DAYS.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", days.as_str()),
                ("aqi", "yes"),
                ("alerts", "yes"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(city, response).await);
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(CityWeather::from_api(body))
    }

    /// Look up cities matching `query`, in provider order. Queries under
    /// [`MIN_SEARCH_QUERY_LEN`] characters return empty without a request.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Vec<CitySearchHit>, WeatherError> {
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/search.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(WeatherError::Network(format!("{}: {}", status, text)));
        }

        response
            .json::<Vec<CitySearchHit>>()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }

    async fn error_from_response(city: &str, response: reqwest::Response) -> WeatherError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if let Ok(body) = serde_json::from_str::<ApiErrorResponse>(&text) {
            if body.error.code == API_CODE_NO_MATCH {
                return WeatherError::NotFound(city.to_string());
            }
            return WeatherError::Network(format!("{}: {}", status, body.error.message));
        }

        WeatherError::Network(format!("{}: {}", status, text))
    }
}
