//! weatherapi.com wire shapes.
//!
//! Fields default aggressively: the provider adds and removes optional
//! fields between plan tiers, and a missing minor field must not fail
//! the whole snapshot.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub location: ApiLocation,
    pub current: ApiCurrent,
    pub forecast: ApiForecast,
    #[serde(default)]
    pub alerts: Option<ApiAlerts>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub localtime: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiCondition {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAirQuality {
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(rename = "us-epa-index", default)]
    pub us_epa_index: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrent {
    pub temp_c: f64,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub dewpoint_c: f64,
    #[serde(default)]
    pub condition: ApiCondition,
    #[serde(default)]
    pub humidity: i32,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_degree: i32,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub vis_km: f64,
    #[serde(default)]
    pub uv: f64,
    #[serde(default)]
    pub pressure_mb: f64,
    #[serde(default)]
    pub precip_mm: f64,
    #[serde(default)]
    pub air_quality: Option<ApiAirQuality>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecast {
    #[serde(default)]
    pub forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastDay {
    pub date: String,
    pub day: ApiDay,
    #[serde(default)]
    pub astro: ApiAstro,
    #[serde(default)]
    pub hour: Vec<ApiHour>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiDay {
    #[serde(default)]
    pub maxtemp_c: f64,
    #[serde(default)]
    pub mintemp_c: f64,
    #[serde(default)]
    pub avgtemp_c: f64,
    #[serde(default)]
    pub condition: ApiCondition,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub avghumidity: f64,
    #[serde(default)]
    pub maxwind_kph: f64,
    #[serde(default)]
    pub uv: f64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiAstro {
    #[serde(default)]
    pub sunrise: String,
    #[serde(default)]
    pub sunset: String,
    #[serde(default)]
    pub moonrise: String,
    #[serde(default)]
    pub moonset: String,
    #[serde(default)]
    pub moon_phase: String,
    #[serde(default)]
    pub moon_illumination: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiHour {
    pub time: String,
    #[serde(default)]
    pub temp_c: f64,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub humidity: i32,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub precip_mm: f64,
    #[serde(default)]
    pub uv: f64,
    #[serde(default)]
    pub condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlerts {
    #[serde(default)]
    pub alert: Vec<ApiAlert>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlert {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub severity: String,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}
