//! Process-wide day/night flag used for theming.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use nimbus_core::ClockFormat;
use nimbus_weather::Location;

use crate::prefs::PreferenceStore;

const KEY_DAY_TIME: &str = "day_time";

/// Fallback daylight window, minutes since midnight.
const DEFAULT_SUNRISE_MINUTES: u32 = 6 * 60;
const DEFAULT_SUNSET_MINUTES: u32 = 18 * 60;

static INSTANCE: OnceLock<DayNightTracker> = OnceLock::new();

pub struct DayNightTracker {
    day_time: AtomicBool,
    prefs: Arc<dyn PreferenceStore>,
}

impl DayNightTracker {
    /// The process-wide tracker. Built on first call from `prefs`; later
    /// calls return the same instance and ignore their argument.
    pub fn instance(prefs: Arc<dyn PreferenceStore>) -> &'static DayNightTracker {
        INSTANCE.get_or_init(|| Self::new(prefs))
    }

    /// The process-wide tracker if it was already built.
    pub fn get() -> Option<&'static DayNightTracker> {
        INSTANCE.get()
    }

    /// Standalone tracker, loading the last persisted flag (day if absent).
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let day_time = prefs.get_bool(KEY_DAY_TIME).unwrap_or(true);
        Self {
            day_time: AtomicBool::new(day_time),
            prefs,
        }
    }

    pub fn is_day_time(&self) -> bool {
        self.day_time.load(Ordering::Relaxed)
    }

    /// Recompute from `location` at the current time. `None` leaves the flag untouched.
    pub fn update(&self, location: Option<&Location>) -> &Self {
        self.update_at(location, Utc::now(), &Local)
    }

    pub fn update_at<Z: TimeZone>(
        &self,
        location: Option<&Location>,
        now: DateTime<Utc>,
        device_zone: &Z,
    ) -> &Self {
        let Some(location) = location else {
            return self;
        };

        let day_time = is_daylight_at(location, now, device_zone);
        self.day_time.store(day_time, Ordering::Relaxed);

        if let Err(e) = self.prefs.put_bool(KEY_DAY_TIME, day_time) {
            tracing::warn!("Failed to persist day/night flag: {}", e);
        }
        self
    }
}

fn minutes_of_day<Z: TimeZone>(time: &DateTime<Z>) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Whether it is daytime at `location` right now.
pub fn is_daylight(location: &Location) -> bool {
    is_daylight_at(location, Utc::now(), &Local)
}

/// The current time is read in the location's zone while sunrise and sunset
/// are read in `device_zone`. Both bounds are exclusive.
// NOTE: the two zones differ for places away from the device; kept as-is, the
// intended reference zone for sunrise/sunset is undecided.
pub fn is_daylight_at<Z: TimeZone>(
    location: &Location,
    now: DateTime<Utc>,
    device_zone: &Z,
) -> bool {
    let time = minutes_of_day(&now.with_timezone(&location.time_zone));

    if let Some((rise, set)) = location.weather.as_ref().and_then(|w| w.first_day_sun()) {
        let sunrise = minutes_of_day(&rise.with_timezone(device_zone));
        let sunset = minutes_of_day(&set.with_timezone(device_zone));
        return sunrise < time && time < sunset;
    }

    DEFAULT_SUNRISE_MINUTES < time && time < DEFAULT_SUNSET_MINUTES
}

/// Source of the user's 12h/24h clock preference.
pub trait ClockPreference {
    fn is_24_hour_format(&self) -> bool;
}

/// Platform setting, derived from the locale environment (`LC_ALL`, `LC_TIME`, `LANG`).
pub struct SystemClock;

const TWELVE_HOUR_LOCALES: &[&str] = &[
    "en_US", "en_CA", "en_AU", "en_NZ", "en_PH", "en_IN", "es_US", "hi_IN", "ko_KR", "ar_EG",
    "ar_SA", "bn_BD", "ur_PK",
];

fn locale_uses_12_hour(locale: &str) -> bool {
    let tag = locale
        .split(|c: char| c == '.' || c == '@')
        .next()
        .unwrap_or_default()
        .replace('-', "_");
    TWELVE_HOUR_LOCALES.contains(&tag.as_str())
}

impl ClockPreference for SystemClock {
    fn is_24_hour_format(&self) -> bool {
        let locale = ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
        match locale {
            Some(locale) => !locale_uses_12_hour(&locale),
            None => true,
        }
    }
}

impl ClockPreference for ClockFormat {
    fn is_24_hour_format(&self) -> bool {
        match self {
            ClockFormat::System => SystemClock.is_24_hour_format(),
            ClockFormat::TwelveHour => false,
            ClockFormat::TwentyFourHour => true,
        }
    }
}

pub fn is_12_hour(clock: &dyn ClockPreference) -> bool {
    !clock.is_24_hour_format()
}
