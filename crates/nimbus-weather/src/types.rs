use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Formatted id shared by every live-GPS entry.
pub const CURRENT_POSITION_ID: &str = "CURRENT_POSITION";

/// Sky condition of a snapshot or forecast day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

/// A saved place, or the live-GPS entry, shown as one page of the main screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Provider-side identifier; `None` until the live-GPS entry is resolved
    pub city_id: Option<String>,
    pub city: String,
    pub district: String,
    pub province: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: Tz,
    /// Tracks the device's live GPS fix
    pub current_position: bool,
    /// Fixed place that may coincide with the live GPS fix
    pub resident_position: bool,
    #[serde(default)]
    pub weather: Option<Weather>,
}

impl Location {
    /// A saved place with a known provider id.
    pub fn new(
        city_id: impl Into<String>,
        city: impl Into<String>,
        latitude: f64,
        longitude: f64,
        time_zone: Tz,
    ) -> Self {
        Self {
            city_id: Some(city_id.into()),
            city: city.into(),
            district: String::new(),
            province: String::new(),
            country: String::new(),
            latitude,
            longitude,
            time_zone,
            current_position: false,
            resident_position: false,
            weather: None,
        }
    }

    /// The unresolved live-GPS entry, before the first fix.
    pub fn current_position_placeholder() -> Self {
        Self {
            city_id: None,
            city: String::new(),
            district: String::new(),
            province: String::new(),
            country: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            time_zone: Tz::UTC,
            current_position: true,
            resident_position: false,
            weather: None,
        }
    }

    /// Parse an IANA zone name, e.g. "Europe/Berlin".
    pub fn with_time_zone_name(mut self, name: &str) -> Result<Self, WeatherError> {
        self.time_zone = name
            .parse::<Tz>()
            .map_err(|_| WeatherError::UnknownTimeZone(name.to_string()))?;
        Ok(self)
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn resident(mut self) -> Self {
        self.resident_position = true;
        self
    }

    /// Stable key used for lookups across reloads.
    pub fn formatted_id(&self) -> String {
        if self.current_position {
            return CURRENT_POSITION_ID.to_string();
        }
        match self.city_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{:.4},{:.4}", self.latitude, self.longitude),
        }
    }

    pub fn matches_id(&self, formatted_id: &str) -> bool {
        self.formatted_id() == formatted_id
    }

    /// Whether the entry identifies a real place that weather can be fetched for.
    pub fn is_usable(&self) -> bool {
        let has_id = self.city_id.as_deref().is_some_and(|id| !id.is_empty());
        has_id
            && self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Current conditions of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub condition: WeatherCondition,
}

/// Sunrise/sunset of one forecast day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Astro {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
}

/// Daily forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub condition: WeatherCondition,
    pub sun: Astro,
}

/// Weather snapshot attached to a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weather {
    pub fetched_at: DateTime<Utc>,
    pub current: CurrentWeather,
    pub daily_forecast: Vec<DailyForecast>,
}

impl Weather {
    /// Fresh relative to the wall clock.
    pub fn is_valid(&self, polling_interval_hours: f32) -> bool {
        self.is_valid_at(Utc::now(), polling_interval_hours)
    }

    /// Fresh iff fetched no later than `now` and strictly younger than the interval.
    pub fn is_valid_at(&self, now: DateTime<Utc>, polling_interval_hours: f32) -> bool {
        if self.fetched_at > now {
            return false;
        }
        let age_ms = (now - self.fetched_at).num_milliseconds();
        let limit_ms = (f64::from(polling_interval_hours) * 3_600_000.0) as i64;
        age_ms < limit_ms
    }

    /// Sunrise and sunset of the first forecast day, when both are known.
    pub fn first_day_sun(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let sun = &self.daily_forecast.first()?.sun;
        Some((sun.rise?, sun.set?))
    }
}

/// Domain errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}
