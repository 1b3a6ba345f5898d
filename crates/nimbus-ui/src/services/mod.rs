//! Ports to the collaborators the main screen depends on.
//! Implementations live in the platform layer; tests use in-memory fakes.

pub mod location_store;
pub mod permission_service;
pub mod weather_service;

pub use location_store::LocationStore;
pub use permission_service::{Permission, PermissionGrant, PermissionOutcome, PermissionPlatform};
pub use weather_service::{FetchError, FetchEvent, FetchRequest, WeatherRepository};
