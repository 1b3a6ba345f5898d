//! Centralized error types for Nimbus.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling in the presentation layer
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Permission error: {0}")]
    Permission(#[from] PermissionError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Storage(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Permission(e) => e.user_message(),
        }
    }
}

/// Local key/value storage errors (preferences, small state files).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Stored data is malformed: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Read { .. } => "Unable to read local settings. Using defaults.",
            StorageError::Write { .. } => "Failed to save local settings.",
            StorageError::Corrupt(_) => "Local settings may be corrupted. Using defaults.",
        }
    }
}

/// Weather refresh errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Locating failed: {0}")]
    LocateFailed(String),

    #[error("Weather API error: {0}")]
    ApiError(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound(_) => "Location not found. Check and try again.",
            WeatherError::LocateFailed(_) => "Unable to get your current position.",
            WeatherError::ApiError(_) => "Weather service error. Please try again.",
        }
    }
}

/// Runtime permission errors.
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("Location permission denied")]
    LocationDenied,
}

impl PermissionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PermissionError::LocationDenied => {
                "Location permission denied. Showing the last known place."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<AppError> = vec![
            StorageError::Corrupt("test".into()).into(),
            WeatherError::ApiError("test".into()).into(),
            WeatherError::LocationNotFound("test".into()).into(),
            PermissionError::LocationDenied.into(),
        ];

        for e in errors {
            assert!(!e.user_message().is_empty(), "empty message for {e}");
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let weather_err = WeatherError::LocateFailed("no fix".into());
        let app_err: AppError = weather_err.into();
        assert!(matches!(app_err, AppError::Weather(WeatherError::LocateFailed(_))));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Permission(PermissionError::LocationDenied);
        assert_eq!(
            app_err.user_message(),
            "Location permission denied. Showing the last known place."
        );
    }

    #[test]
    fn test_storage_error_display_includes_path() {
        let e = StorageError::Write {
            path: "/tmp/prefs.json".into(),
            message: "read-only".into(),
        };
        assert!(e.to_string().contains("/tmp/prefs.json"));
    }
}
