use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Temperature unit preference. The dashboard flips between exactly
/// these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemperatureUnit {
    #[default]
    C,
    F,
}

impl TemperatureUnit {
    /// Flip between Celsius and Fahrenheit.
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::C => TemperatureUnit::F,
            TemperatureUnit::F => TemperatureUnit::C,
        }
    }

    /// Convert a Celsius reading into this unit, rounded for display.
    pub fn display(self, temp_c: f64) -> i32 {
        let value = match self {
            TemperatureUnit::C => temp_c,
            TemperatureUnit::F => temp_c * 9.0 / 5.0 + 32.0,
        };
        value.round() as i32
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::C => "°C",
            TemperatureUnit::F => "°F",
        }
    }
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// weatherapi.com API key
    pub api_key: String,

    /// Provider base URL (overridable for testing)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Cache time-to-live in milliseconds
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Background refresh interval in milliseconds
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

fn default_api_base_url() -> String {
    "https://api.weatherapi.com".to_string()
}

fn default_cache_ttl_ms() -> u64 {
    60_000
}

fn default_refresh_interval_ms() -> u64 {
    60_000
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            cache_ttl_ms: default_cache_ttl_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

/// Google OAuth configuration for the sign-in flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Google OAuth App Client ID
    pub client_id: String,
    /// Google OAuth App Client Secret
    pub client_secret: String,
}

impl GoogleConfig {
    /// Check if credentials are configured (not placeholders)
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.is_empty()
            && !self.client_id.starts_with("YOUR_")
            && !self.client_secret.starts_with("YOUR_")
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: "YOUR_GOOGLE_CLIENT_ID".to_string(),
            client_secret: "YOUR_GOOGLE_CLIENT_SECRET".to_string(),
        }
    }
}

/// Dashboard behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Cities loaded for anonymous sessions and as the signed-in baseline
    #[serde(default = "default_cities")]
    pub default_cities: Vec<String>,

    /// How long a notification stays visible, in milliseconds
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,

    /// Preferred display unit
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

fn default_cities() -> Vec<String> {
    ["Mumbai", "Delhi", "Bangalore", "Kolkata", "Chennai", "Hyderabad"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_notification_ttl_ms() -> u64 {
    5_000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_cities: default_cities(),
            notification_ttl_ms: default_notification_ttl_ms(),
            temperature_unit: TemperatureUnit::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Google OAuth settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Dashboard behaviour settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skydeck");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            google: GoogleConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist.
    /// `SKYDECK_API_KEY` in the environment overrides the stored key.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        if let Ok(key) = std::env::var("SKYDECK_API_KEY") {
            config.weather.api_key = key;
        }

        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.weather.api_key.is_empty() {
            result.add_error("weather.api_key", "weatherapi.com API key is not set");
        }

        if self.weather.cache_ttl_ms == 0 {
            result.add_warning("weather.cache_ttl_ms", "TTL of 0 disables caching entirely");
        }

        if self.weather.refresh_interval_ms < 10_000 {
            result.add_warning(
                "weather.refresh_interval_ms",
                "intervals under 10s will burn through the provider quota",
            );
        }

        if self.dashboard.default_cities.is_empty() {
            result.add_warning("dashboard.default_cities", "anonymous dashboard will be empty");
        }

        if !self.google.is_configured() {
            result.add_warning("google", "OAuth credentials not configured; sign-in disabled");
        }

        result
    }

    /// Save the configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skydeck");
        Ok(dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_toggle_is_involution() {
        assert_eq!(TemperatureUnit::C.toggled(), TemperatureUnit::F);
        assert_eq!(TemperatureUnit::C.toggled().toggled(), TemperatureUnit::C);
    }

    #[test]
    fn test_fahrenheit_display_conversion() {
        assert_eq!(TemperatureUnit::F.display(0.0), 32);
        assert_eq!(TemperatureUnit::F.display(100.0), 212);
        assert_eq!(TemperatureUnit::F.display(37.0), 99); // 98.6 rounds up
        assert_eq!(TemperatureUnit::C.display(21.4), 21);
    }

    #[test]
    fn test_default_cities() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_cities.len(), 6);
        assert_eq!(config.default_cities[0], "Mumbai");
    }

    #[test]
    fn test_validation_requires_api_key() {
        let config = Config::default();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.error_summary().contains("api_key"));
    }

    #[test]
    fn test_validation_passes_with_api_key() {
        let mut config = Config::default();
        config.weather.api_key = "abc123".to_string();
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Config::default();
        config.weather.api_key = "abc123".to_string();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.weather.api_key, "abc123");
        assert_eq!(parsed.dashboard.default_cities, config.dashboard.default_cities);
    }
}
