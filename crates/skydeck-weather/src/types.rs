//! Domain types for city weather snapshots.
//!
//! A [`CityWeather`] is immutable once fetched; a refetch produces a new
//! snapshot that replaces the old one wholesale. The `api` module holds
//! the weatherapi.com wire shapes, converted here via `from_api`.

use serde::{Deserialize, Serialize};

use crate::api;

/// Where the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    /// Provider-local wall clock, e.g. "2026-08-30 14:05".
    pub localtime: String,
}

/// Pollutant concentrations plus the US EPA index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub pm2_5: f64,
    pub pm10: f64,
    pub o3: f64,
    pub no2: f64,
    pub us_epa_index: i32,
}

/// Current conditions at the location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub dewpoint_c: f64,
    pub condition: String,
    pub humidity: i32,
    pub wind_kph: f64,
    pub wind_degree: i32,
    pub wind_dir: String,
    pub vis_km: f64,
    pub uv: f64,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub air_quality: Option<AirQuality>,
}

/// Sunrise/sunset and moon data for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: String,
}

/// One hour of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourForecast {
    pub time: String,
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub humidity: i32,
    pub wind_kph: f64,
    pub precip_mm: f64,
    pub uv: f64,
    pub condition: String,
}

/// One day of forecast: aggregates plus 24 hourly entries in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub avg_temp_c: f64,
    pub condition: String,
    pub total_precip_mm: f64,
    pub avg_humidity: f64,
    pub max_wind_kph: f64,
    pub uv: f64,
    pub astro: Astro,
    pub hours: Vec<HourForecast>,
}

/// A severe-weather alert. An empty alert list is the normal case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub headline: String,
    pub event: String,
    pub severity: String,
}

/// Complete weather snapshot for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub location: Location,
    pub current: CurrentConditions,
    /// Seven days, in provider order.
    pub forecast_days: Vec<DayForecast>,
    pub alerts: Vec<WeatherAlert>,
}

impl CityWeather {
    /// The city name as the provider resolved it. Cache and favorites
    /// keys use the name as typed by the user, which may differ in case.
    pub fn city_name(&self) -> &str {
        &self.location.name
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub(crate) fn from_api(resp: api::ForecastResponse) -> Self {
        let current = CurrentConditions {
            temp_c: resp.current.temp_c,
            feelslike_c: resp.current.feelslike_c,
            dewpoint_c: resp.current.dewpoint_c,
            condition: resp.current.condition.text,
            humidity: resp.current.humidity,
            wind_kph: resp.current.wind_kph,
            wind_degree: resp.current.wind_degree,
            wind_dir: resp.current.wind_dir,
            vis_km: resp.current.vis_km,
            uv: resp.current.uv,
            pressure_mb: resp.current.pressure_mb,
            precip_mm: resp.current.precip_mm,
            air_quality: resp.current.air_quality.map(|aq| AirQuality {
                pm2_5: aq.pm2_5,
                pm10: aq.pm10,
                o3: aq.o3,
                no2: aq.no2,
                us_epa_index: aq.us_epa_index,
            }),
        };

        let forecast_days = resp
            .forecast
            .forecastday
            .into_iter()
            .map(|fd| DayForecast {
                date: fd.date,
                max_temp_c: fd.day.maxtemp_c,
                min_temp_c: fd.day.mintemp_c,
                avg_temp_c: fd.day.avgtemp_c,
                condition: fd.day.condition.text,
                total_precip_mm: fd.day.totalprecip_mm,
                avg_humidity: fd.day.avghumidity,
                max_wind_kph: fd.day.maxwind_kph,
                uv: fd.day.uv,
                astro: Astro {
                    sunrise: fd.astro.sunrise,
                    sunset: fd.astro.sunset,
                    moonrise: fd.astro.moonrise,
                    moonset: fd.astro.moonset,
                    moon_phase: fd.astro.moon_phase,
                    moon_illumination: fd.astro.moon_illumination,
                },
                hours: fd
                    .hour
                    .into_iter()
                    .map(|h| HourForecast {
                        time: h.time,
                        temp_c: h.temp_c,
                        feelslike_c: h.feelslike_c,
                        humidity: h.humidity,
                        wind_kph: h.wind_kph,
                        precip_mm: h.precip_mm,
                        uv: h.uv,
                        condition: h.condition.text,
                    })
                    .collect(),
            })
            .collect();

        let alerts = resp
            .alerts
            .map(|a| {
                a.alert
                    .into_iter()
                    .map(|al| WeatherAlert {
                        headline: al.headline,
                        event: al.event,
                        severity: al.severity,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            location: Location {
                name: resp.location.name,
                region: resp.location.region,
                country: resp.location.country,
                localtime: resp.location.localtime,
            },
            current,
            forecast_days,
            alerts,
        }
    }
}

/// One hit from the city lookup endpoint, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySearchHit {
    pub name: String,
    pub region: String,
    pub country: String,
}
