use nimbus_weather::{Location, Weather};

/// Read side of the local location/weather database.
pub trait LocationStore {
    /// All saved locations in display order.
    fn read_location_list(&self) -> Vec<Location>;

    /// Last stored weather snapshot of a location.
    fn read_weather(&self, location: &Location) -> Option<Weather>;

    /// Re-read one entry by identity; `None` if it was deleted.
    fn read_location(&self, location: &Location) -> Option<Location>;
}
