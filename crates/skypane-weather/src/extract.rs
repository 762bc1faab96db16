//! Projection of a raw `current.json` payload onto [`WeatherInfo`].
//!
//! Field selection only: no unit conversion and no defaults. A missing
//! group or field is a [`WeatherError::Shape`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::WeatherError;
use crate::types::{Condition, WeatherInfo, WeatherResponse};

#[derive(Debug, Deserialize)]
struct CurrentGroup {
    temp_c: f64,
    temp_f: f64,
    precip_mm: f64,
    humidity: f64,
    wind_kph: f64,
    condition: Condition,
    last_updated_epoch: i64,
}

#[derive(Debug, Deserialize)]
struct LocationGroup {
    name: String,
}

/// Extract the display fields from a successful response.
pub fn extract(response: &WeatherResponse) -> Result<WeatherInfo, WeatherError> {
    if let Some(err) = response.remote_error() {
        return Err(WeatherError::Remote(err));
    }

    let current: CurrentGroup = group(response, "current")?;
    let location: LocationGroup = group(response, "location")?;

    Ok(WeatherInfo {
        temp_c: current.temp_c,
        temp_f: current.temp_f,
        precip_mm: current.precip_mm,
        humidity: current.humidity,
        wind_kph: current.wind_kph,
        city: location.name,
        condition: current.condition,
        last_updated_epoch: current.last_updated_epoch,
    })
}

fn group<T: DeserializeOwned>(response: &WeatherResponse, name: &str) -> Result<T, WeatherError> {
    let value = response
        .body()
        .get(name)
        .ok_or_else(|| WeatherError::shape(format!("missing `{}` group", name)))?;

    T::deserialize(value).map_err(|e| WeatherError::shape(format!("`{}` group: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn sample_body() -> serde_json::Value {
        json!({
            "location": { "name": "Paris", "country": "France", "localtime_epoch": 1700000000 },
            "current": {
                "last_updated_epoch": 1700000000,
                "temp_c": 20.0,
                "temp_f": 68.0,
                "precip_mm": 0.1,
                "humidity": 72,
                "wind_kph": 11.2,
                "wind_dir": "SW",
                "condition": {
                    "text": "Partly cloudy",
                    "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                    "code": 1003
                }
            }
        })
    }

    fn sample() -> WeatherResponse {
        WeatherResponse::from_value(sample_body())
    }

    #[test]
    fn test_extract_selects_fields() {
        let info = extract(&sample()).unwrap();
        assert_eq!(info.temp_c, 20.0);
        assert_eq!(info.temp_f, 68.0);
        assert_eq!(info.precip_mm, 0.1);
        assert_eq!(info.humidity, 72.0);
        assert_eq!(info.wind_kph, 11.2);
        assert_eq!(info.city, "Paris");
        assert_eq!(info.condition.text, "Partly cloudy");
        assert_eq!(
            info.condition.icon,
            "//cdn.weatherapi.com/weather/64x64/day/116.png"
        );
        assert_eq!(info.last_updated_epoch, 1700000000);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let response = sample();
        assert_eq!(extract(&response).unwrap(), extract(&response).unwrap());
    }

    #[test]
    fn test_missing_current_group() {
        let response = WeatherResponse::from_value(json!({ "location": { "name": "Paris" } }));
        let err = extract(&response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("current"));
    }

    #[test]
    fn test_missing_location_group() {
        let mut body = sample_body();
        body.as_object_mut().unwrap().remove("location");
        let err = extract(&WeatherResponse::from_value(body)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn test_missing_field_is_shape_error() {
        let mut body = sample_body();
        body["current"].as_object_mut().unwrap().remove("temp_f");
        let err = extract(&WeatherResponse::from_value(body)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("temp_f"));
    }

    #[test]
    fn test_numbers_pass_through_unvalidated() {
        let mut body = sample_body();
        body["current"]["humidity"] = json!(72.5);
        body["current"]["precip_mm"] = json!(-1);
        let info = extract(&WeatherResponse::from_value(body)).unwrap();
        assert_eq!(info.humidity, 72.5);
        assert_eq!(info.precip_mm, -1.0);

        let mut body = sample_body();
        body["current"]["humidity"] = json!(300);
        let info = extract(&WeatherResponse::from_value(body)).unwrap();
        assert_eq!(info.humidity, 300.0);
    }

    #[test]
    fn test_non_object_payload() {
        let err = extract(&WeatherResponse::from_value(json!([1, 2, 3]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_error_payload_never_yields_info() {
        let response = WeatherResponse::from_value(json!({
            "error": { "message": "no matching location" }
        }));
        let err = extract(&response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remote);
    }
}
