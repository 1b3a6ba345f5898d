//! Weather domain types for Nimbus
//!
//! Saved locations, their attached weather snapshots, snapshot freshness and
//! geographic closeness between places.

pub mod geo;
pub mod types;

pub use geo::distance_km;
pub use types::*;
