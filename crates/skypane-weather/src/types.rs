use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RemoteApiError;

/// Location string sent verbatim to the weather API.
///
/// Either `"lat,long"` from a geolocation fix or whatever the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LocationQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for LocationQuery {
    fn from(query: String) -> Self {
        Self(query)
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw `current.json` payload, kept as parsed JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResponse {
    body: serde_json::Value,
}

impl WeatherResponse {
    pub fn from_value(body: serde_json::Value) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// The API's `error` object, if the payload carries a non-null one.
    pub fn remote_error(&self) -> Option<RemoteApiError> {
        self.body
            .get("error")
            .filter(|err| !err.is_null())
            .map(RemoteApiError::from_value)
    }
}

/// Condition descriptor as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Usually scheme-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`
    pub icon: String,
}

/// Flattened current conditions used by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub temp_c: f64,
    pub temp_f: f64,
    pub precip_mm: f64,
    pub humidity: f64,
    pub wind_kph: f64,
    pub city: String,
    pub condition: Condition,
    /// Seconds since the Unix epoch
    pub last_updated_epoch: i64,
}

/// Unit the temperature region is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Geographic location from a geolocation fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `"lat,long"` in shortest number form, e.g. `"10,10"` or `"47.6062,-122.3321"`.
    pub fn to_query(&self) -> LocationQuery {
        LocationQuery(format!("{},{}", self.latitude, self.longitude))
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location error: {0}")]
    Other(String),
}
