//! Canned provider payloads and snapshots shared across crate tests.

use serde_json::{json, Value};

use crate::types::{
    Astro, CitySearchHit, CityWeather, CurrentConditions, DayForecast, HourForecast, Location,
};

/// A trimmed-down forecast body in the provider's wire shape (two days,
/// two hours each; parsing does not depend on the full 7x24 grid).
pub fn forecast_json(city: &str) -> Value {
    json!({
        "location": {
            "name": city,
            "region": "Maharashtra",
            "country": "India",
            "localtime": "2026-08-30 14:05"
        },
        "current": {
            "temp_c": 30.0,
            "feelslike_c": 34.0,
            "dewpoint_c": 24.0,
            "condition": {"text": "Partly cloudy"},
            "humidity": 70,
            "wind_kph": 19.1,
            "wind_degree": 240,
            "wind_dir": "WSW",
            "vis_km": 6.0,
            "uv": 7.0,
            "pressure_mb": 1004.0,
            "precip_mm": 0.1,
            "air_quality": {
                "pm2_5": 18.5, "pm10": 35.0, "o3": 61.0, "no2": 12.3,
                "us-epa-index": 2
            }
        },
        "forecast": {
            "forecastday": [
                {
                    "date": "2026-08-30",
                    "day": {
                        "maxtemp_c": 31.2, "mintemp_c": 26.8, "avgtemp_c": 28.7,
                        "condition": {"text": "Moderate rain"},
                        "totalprecip_mm": 14.2, "avghumidity": 78.0,
                        "maxwind_kph": 24.5, "uv": 6.0
                    },
                    "astro": {
                        "sunrise": "06:21 AM", "sunset": "06:52 PM",
                        "moonrise": "09:14 PM", "moonset": "08:40 AM",
                        "moon_phase": "Waning Gibbous", "moon_illumination": "82"
                    },
                    "hour": [
                        {
                            "time": "2026-08-30 00:00", "temp_c": 27.1, "feelslike_c": 30.0,
                            "humidity": 84, "wind_kph": 12.0, "precip_mm": 0.4, "uv": 1.0,
                            "condition": {"text": "Light rain"}
                        },
                        {
                            "time": "2026-08-30 01:00", "temp_c": 26.9, "feelslike_c": 29.6,
                            "humidity": 85, "wind_kph": 11.2, "precip_mm": 0.2, "uv": 1.0,
                            "condition": {"text": "Patchy rain"}
                        }
                    ]
                },
                {
                    "date": "2026-08-31",
                    "day": {
                        "maxtemp_c": 30.4, "mintemp_c": 26.1, "avgtemp_c": 28.0,
                        "condition": {"text": "Sunny"},
                        "totalprecip_mm": 0.0, "avghumidity": 66.0,
                        "maxwind_kph": 18.3, "uv": 8.0
                    },
                    "astro": {
                        "sunrise": "06:21 AM", "sunset": "06:51 PM",
                        "moonrise": "09:58 PM", "moonset": "09:43 AM",
                        "moon_phase": "Waning Gibbous", "moon_illumination": "73"
                    },
                    "hour": [
                        {
                            "time": "2026-08-31 00:00", "temp_c": 26.5, "feelslike_c": 29.0,
                            "humidity": 80, "wind_kph": 9.7, "precip_mm": 0.0, "uv": 1.0,
                            "condition": {"text": "Clear"}
                        },
                        {
                            "time": "2026-08-31 01:00", "temp_c": 26.3, "feelslike_c": 28.8,
                            "humidity": 81, "wind_kph": 9.0, "precip_mm": 0.0, "uv": 1.0,
                            "condition": {"text": "Clear"}
                        }
                    ]
                }
            ]
        },
        "alerts": {"alert": []}
    })
}

/// Same body with one severe-weather alert attached.
pub fn forecast_json_with_alert(city: &str, headline: &str) -> Value {
    let mut body = forecast_json(city);
    body["alerts"] = json!({
        "alert": [{
            "headline": headline,
            "event": "Heavy Rain",
            "severity": "Moderate"
        }]
    });
    body
}

/// A ready-made domain snapshot, bypassing the wire layer.
pub fn sample_weather(city: &str) -> CityWeather {
    CityWeather {
        location: Location {
            name: city.to_string(),
            region: "Maharashtra".to_string(),
            country: "India".to_string(),
            localtime: "2026-08-30 14:05".to_string(),
        },
        current: CurrentConditions {
            temp_c: 30.0,
            feelslike_c: 34.0,
            dewpoint_c: 24.0,
            condition: "Partly cloudy".to_string(),
            humidity: 70,
            wind_kph: 19.1,
            wind_degree: 240,
            wind_dir: "WSW".to_string(),
            vis_km: 6.0,
            uv: 7.0,
            pressure_mb: 1004.0,
            precip_mm: 0.1,
            air_quality: None,
        },
        forecast_days: vec![DayForecast {
            date: "2026-08-30".to_string(),
            max_temp_c: 31.2,
            min_temp_c: 26.8,
            avg_temp_c: 28.7,
            condition: "Moderate rain".to_string(),
            total_precip_mm: 14.2,
            avg_humidity: 78.0,
            max_wind_kph: 24.5,
            uv: 6.0,
            astro: Astro {
                sunrise: "06:21 AM".to_string(),
                sunset: "06:52 PM".to_string(),
                moonrise: "09:14 PM".to_string(),
                moonset: "08:40 AM".to_string(),
                moon_phase: "Waning Gibbous".to_string(),
                moon_illumination: "82".to_string(),
            },
            hours: vec![HourForecast {
                time: "2026-08-30 00:00".to_string(),
                temp_c: 27.1,
                feelslike_c: 30.0,
                humidity: 84,
                wind_kph: 12.0,
                precip_mm: 0.4,
                uv: 1.0,
                condition: "Light rain".to_string(),
            }],
        }],
        alerts: Vec::new(),
    }
}

/// A pair of search hits in provider order.
pub fn sample_search_hits() -> Vec<CitySearchHit> {
    vec![
        CitySearchHit {
            name: "Pune".to_string(),
            region: "Maharashtra".to_string(),
            country: "India".to_string(),
        },
        CitySearchHit {
            name: "Punta Arenas".to_string(),
            region: "Magallanes".to_string(),
            country: "Chile".to_string(),
        },
    ]
}
