//! Centralized error types for the Skydeck dashboard core.
//!
//! Every failure crossing a component boundary is one of these variants.
//! Use `user_message()` to get a message suitable for a transient
//! notification or the sticky dashboard error field.

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the dashboard core should be convertible to this type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Weather(e) => e.user_message(),
            AppError::Auth(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Weather provider errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Provider unreachable, timed out, or returned a non-success status.
    #[error("Network error: {0}")]
    Network(String),

    /// The city could not be resolved by the provider.
    #[error("City not found: {0}")]
    NotFound(String),

    /// The provider returned a body we could not decode.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Network(_) => "Failed to fetch weather data".to_string(),
            WeatherError::NotFound(city) => format!("Location not found: {}", city),
            WeatherError::Parse(_) => "Weather service returned unexpected data".to_string(),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Network(e.to_string())
    }
}

/// Identity provider errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The user abandoned the consent flow.
    #[error("Sign-in cancelled by user")]
    Cancelled,

    #[error("Network error during sign-in: {0}")]
    Network(String),

    /// The provider rejected the flow (bad state, bad code, denied consent).
    #[error("Sign-in flow failed: {0}")]
    Flow(String),

    #[error("Access token invalid or expired")]
    InvalidToken,
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Cancelled => "Sign-in was cancelled.".to_string(),
            AuthError::Network(_) => "Sign-in failed. Check your connection.".to_string(),
            AuthError::Flow(_) => "Sign-in failed. Please try again.".to_string(),
            AuthError::InvalidToken => "Your session has expired. Please sign in again.".to_string(),
        }
    }
}

/// Key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn user_message(&self) -> String {
        match self {
            StorageError::Io(_) | StorageError::Backend(_) => {
                "Failed to save your changes. They may not persist.".to_string()
            }
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}
