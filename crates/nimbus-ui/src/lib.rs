//! Presentation layer of the Nimbus main screen.
//!
//! `MainModel` owns the location list, the displayed selection and the paging
//! indicator; `DayNightTracker` holds the process-wide day/night theme flag.
//! Everything the layer talks to (persistence, fetching, permissions, UI
//! feedback, settings) is reached through the traits in `services` and
//! `context`.

pub mod context;
pub mod error_mapping;
pub mod models;
pub mod observable;
pub mod prefs;
pub mod services;

pub use context::{Feedback, MainContext, Settings};
pub use models::day_night::{is_12_hour, ClockPreference, DayNightTracker, SystemClock};
pub use models::main_model::{
    Indicator, LocationResource, MainModel, ResourceSource, ResourceStatus,
};
pub use observable::{Observable, SubscriptionId};
pub use prefs::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};
