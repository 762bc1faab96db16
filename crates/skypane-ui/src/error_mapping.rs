//! Conversion of lookup failures into the application error hierarchy.

use skypane_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError as CoreWeatherError};
use skypane_weather::WeatherError;

use crate::controller::LookupError;

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Weather(WeatherError::Remote(remote)) => {
                AppError::Weather(CoreWeatherError::from_api_code(remote.code, remote.message))
            }
            LookupError::Weather(WeatherError::Network(e)) => {
                AppError::Network(e.into_network_error())
            }
            LookupError::Weather(WeatherError::Endpoint(e)) => {
                AppError::Network(NetworkError::ConnectionFailed(e.to_string()))
            }
            LookupError::Weather(WeatherError::Parse(s)) => {
                AppError::Network(NetworkError::InvalidResponse(s))
            }
            LookupError::Weather(WeatherError::Shape(s)) => {
                AppError::Weather(CoreWeatherError::UnexpectedData(s))
            }
            LookupError::Render(e) => AppError::Service(e.to_string()),
        }
    }
}
