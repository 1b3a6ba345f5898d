use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

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
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (preference files live here)
    pub config_dir: PathBuf,

    /// Weather refresh settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

/// How long a fetched weather snapshot stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UpdateInterval {
    #[serde(rename = "30min")]
    HalfHour,
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "1.5h")]
    OneAndHalfHours,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "2.5h")]
    TwoAndHalfHours,
    #[serde(rename = "3h")]
    ThreeHours,
    #[serde(rename = "3.5h")]
    ThreeAndHalfHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "5h")]
    FiveHours,
    #[serde(rename = "6h")]
    SixHours,
}

impl UpdateInterval {
    pub fn interval_in_hours(self) -> f32 {
        match self {
            Self::HalfHour => 0.5,
            Self::OneHour => 1.0,
            Self::OneAndHalfHours => 1.5,
            Self::TwoHours => 2.0,
            Self::TwoAndHalfHours => 2.5,
            Self::ThreeHours => 3.0,
            Self::ThreeAndHalfHours => 3.5,
            Self::FourHours => 4.0,
            Self::FiveHours => 5.0,
            Self::SixHours => 6.0,
        }
    }
}

/// 12h/24h clock display preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClockFormat {
    /// Follow the platform setting
    #[default]
    #[serde(rename = "system")]
    System,
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Polling interval for cached weather
    #[serde(default)]
    pub polling_interval: UpdateInterval,

    /// Resident places closer than this to the current position are treated as duplicates
    #[serde(default = "default_close_distance_km")]
    pub close_distance_km: f64,
}

fn default_close_distance_km() -> f64 {
    20.0
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            polling_interval: UpdateInterval::default(),
            close_distance_km: default_close_distance_km(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub clock_format: ClockFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nimbus")
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
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

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let distance = self.weather.close_distance_km;
        if !distance.is_finite() || distance <= 0.0 {
            result.add_error(
                "weather.close_distance_km",
                "Close distance must be a positive number of kilometers",
            );
        } else if distance > 500.0 {
            result.add_warning(
                "weather.close_distance_km",
                "Close distance is unusually large (>500 km)",
            );
        }

        if self.config_dir.as_os_str().is_empty() {
            result.add_error("config_dir", "Config directory must not be empty");
        } else if self.config_dir.exists() && !self.config_dir.is_dir() {
            result.add_error(
                "config_dir",
                format!("Path is not a directory: {}", self.config_dir.display()),
            );
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the day/night preference file
    pub fn preference_path(&self) -> PathBuf {
        self.config_dir.join("time_preference.json")
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}
