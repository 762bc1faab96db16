use crate::types::{Location, LocationError};

/// Resolve the current geolocation fix.
///
/// The only source is a configured fix; without one the service reports
/// itself unavailable and the caller simply skips the lookup.
pub async fn get_current_location(configured: Option<Location>) -> Result<Location, LocationError> {
    match configured {
        Some(loc) if is_valid(&loc) => Ok(loc),
        Some(loc) => Err(LocationError::Other(format!(
            "coordinates out of range: {}, {}",
            loc.latitude, loc.longitude
        ))),
        None => Err(LocationError::ServiceUnavailable),
    }
}

fn is_valid(loc: &Location) -> bool {
    (-90.0..=90.0).contains(&loc.latitude) && (-180.0..=180.0).contains(&loc.longitude)
}
