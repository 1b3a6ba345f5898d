//! Geographic closeness between saved places.

use crate::types::Location;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates (haversine), in kilometers.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

fn same_name(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

impl Location {
    /// Distance to another location in kilometers.
    pub fn distance_to(&self, other: &Location) -> f64 {
        distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Whether two entries describe the same place for paging purposes.
    ///
    /// Same provider id, or same province and city names, or within `radius_km`.
    pub fn is_close_to(&self, other: &Location, radius_km: f64) -> bool {
        if let (Some(a), Some(b)) = (self.city_id.as_deref(), other.city_id.as_deref()) {
            if !a.is_empty() && a == b {
                return true;
            }
        }
        if same_name(&self.province, &other.province) && same_name(&self.city, &other.city) {
            return true;
        }
        self.distance_to(other) < radius_km
    }
}
