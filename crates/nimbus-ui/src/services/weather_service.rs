//! Weather fetch port: requests go out through `WeatherRepository`,
//! results come back as `FetchEvent`s on an mpsc channel owned by the model.

use std::sync::mpsc::Sender;

use nimbus_weather::Location;

use super::permission_service::Permission;

/// Error type for fetch operations
#[derive(Debug, Clone)]
pub enum FetchError {
    Network(String),
    Locate(String),
    NotFound(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(s) => write!(f, "Weather error: {}", s),
            FetchError::Locate(s) => write!(f, "Locate error: {}", s),
            FetchError::NotFound(s) => write!(f, "Location not found: {}", s),
        }
    }
}

impl std::error::Error for FetchError {}

/// One weather refresh, for the displayed location.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Echoed back in the completion event
    pub id: u64,
    pub location: Location,
    /// Snapshot of the whole list, for providers that resolve the GPS entry against saved places
    pub locations: Vec<Location>,
    /// Locate through the device GPS before fetching
    pub gps_backed: bool,
}

/// Messages sent from the repository back to the coordinating thread
#[derive(Debug)]
pub enum FetchEvent {
    /// The request finished; on success carries the location with fresh weather attached
    Completed {
        request_id: u64,
        result: Result<Location, FetchError>,
    },
}

/// Network side of weather refreshing.
pub trait WeatherRepository: Send {
    /// Start a fetch without blocking. Sends exactly one `Completed` unless cancelled.
    fn get_weather(&mut self, request: FetchRequest, events: &Sender<FetchEvent>);

    /// Abort any in-flight fetch.
    fn cancel(&mut self);

    /// Permissions needed to locate the device.
    fn required_location_permissions(&self) -> Vec<Permission>;
}
