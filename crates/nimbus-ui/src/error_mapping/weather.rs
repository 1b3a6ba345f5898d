use crate::services::FetchError;
use nimbus_core::{AppError, WeatherError};

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Network(s) => AppError::Weather(WeatherError::ApiError(s)),
            FetchError::Locate(s) => AppError::Weather(WeatherError::LocateFailed(s)),
            FetchError::NotFound(s) => AppError::Weather(WeatherError::LocationNotFound(s)),
        }
    }
}
