//! The execution context handed to every `MainModel` operation.

use nimbus_core::Config;

use crate::services::{LocationStore, PermissionPlatform, WeatherRepository};

/// Settings the main screen reads on every selection.
pub trait Settings {
    fn polling_interval_hours(&self) -> f32;

    /// Radius under which a resident place duplicates the current position.
    fn close_distance_km(&self) -> f64;
}

impl Settings for Config {
    fn polling_interval_hours(&self) -> f32 {
        self.weather.polling_interval.interval_in_hours()
    }

    fn close_distance_km(&self) -> f64 {
        self.weather.close_distance_km
    }
}

/// Transient UI feedback (snackbar/toast).
pub trait Feedback {
    fn show_transient_message(&self, text: &str);

    /// Whether the screen is currently in the foreground.
    fn is_ui_visible(&self) -> bool;
}

/// Everything a `MainModel` operation may touch.
pub trait MainContext {
    fn store(&self) -> &dyn LocationStore;
    fn permissions(&self) -> &dyn PermissionPlatform;
    fn settings(&self) -> &dyn Settings;
    fn feedback(&self) -> &dyn Feedback;

    /// Called once per model, on first `init`.
    fn create_repository(&self) -> Box<dyn WeatherRepository>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::UpdateInterval;

    #[test]
    fn config_provides_settings() {
        let mut config = Config::default();
        config.weather.polling_interval = UpdateInterval::TwoAndHalfHours;
        config.weather.close_distance_km = 12.5;

        let settings: &dyn Settings = &config;
        assert_eq!(settings.polling_interval_hours(), 2.5);
        assert_eq!(settings.close_distance_km(), 12.5);
    }
}
